use criterion::Criterion;
use photon_kinfit::{
    Event, FitHarness, GaussianSmearing, HarnessConfig, LorentzVector, Particle, ParticleType,
    TaggerHit,
};
use photon_kinfit_test_util::{FourVector, PI0_EVENTS, TrueFinalState};
use std::hint::black_box;

fn lorentz([px, py, pz, e]: FourVector) -> LorentzVector {
    LorentzVector::new(px, py, pz, e)
}

fn event(state: &TrueFinalState) -> Event {
    let mc_true = std::iter::once(Particle::new(ParticleType::Proton, lorentz(state.proton)))
        .chain(
            state
                .photons
                .iter()
                .map(|&g| Particle::new(ParticleType::Photon, lorentz(g))),
        )
        .collect();
    Event {
        mc_true,
        tagger_hits: vec![TaggerHit {
            channel: 0,
            photon_energy: state.beam_energy,
            time: 0.0,
        }],
        ..Default::default()
    }
}

pub fn bench_harness(c: &mut Criterion) {
    const N: usize = 100;
    let events: Vec<_> = PI0_EVENTS.iter().take(N).map(event).collect();

    let configs = [
        ("Harness pi0: energy-momentum", HarnessConfig::default()),
        (
            "Harness pi0: invariant mass",
            HarnessConfig {
                include_im_constraint: true,
                ..Default::default()
            },
        ),
    ];
    for (name, config) in configs {
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut harness =
                    FitHarness::new(config.clone(), GaussianSmearing::seeded(0)).unwrap();
                for event in events.iter() {
                    black_box(harness.process_event(black_box(event)).unwrap());
                }
            })
        });
    }
}
