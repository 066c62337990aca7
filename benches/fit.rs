use criterion::Criterion;
use photon_kinfit::{
    Constraint, ConstraintTrait, EnergyMomentumBalance, FitInputs, FitParticle, GaussianSmearing,
    KinematicFitter, LorentzVector, ParticleType, SmearingModel, VertexConstraint,
};
use photon_kinfit_test_util::{FourVector, PI0_EVENTS};
use std::hint::black_box;

fn fit_particle([px, py, pz, e]: FourVector, mass: f64) -> FitParticle {
    FitParticle::from_four_momentum(&LorentzVector::new(px, py, pz, e), mass)
}

fn smeared_inputs(n: usize) -> Vec<FitInputs> {
    let mut smearing = GaussianSmearing::seeded(0);
    PI0_EVENTS
        .iter()
        .take(n)
        .map(|state| {
            let mut particles = vec![
                ("Beam".to_owned(), fit_particle(state.beam(), 0.0)),
                (
                    "Proton".to_owned(),
                    fit_particle(state.proton, ParticleType::PROTON_MASS),
                ),
            ];
            for (i, &g) in state.photons.iter().enumerate() {
                particles.push((format!("Photon{}", i + 1), fit_particle(g, 0.0)));
            }
            let mut inputs = FitInputs::new();
            for (name, mut particle) in particles {
                smearing.smear(&mut particle);
                inputs.set_measured(&name, &particle.values(), &particle.sigmas());
            }
            inputs
        })
        .collect()
}

fn fitter(vertex: bool) -> KinematicFitter<Constraint> {
    let mut fitter = KinematicFitter::new("bench");
    for name in ["Beam", "Proton", "Photon1", "Photon2"] {
        fitter.link_variable(name, 3).unwrap();
    }
    fitter
        .add_constraint(
            EnergyMomentumBalance::default(),
            &["Beam", "Proton", "Photon1", "Photon2"],
        )
        .unwrap();
    if vertex {
        fitter
            .add_unmeasured_variable(VertexConstraint::VERTEX_VARIABLE)
            .unwrap();
        fitter
            .add_constraint(
                VertexConstraint::new(ParticleType::Pi0.mass()),
                &["Photon1", "Photon2", VertexConstraint::VERTEX_VARIABLE],
            )
            .unwrap();
    }
    fitter
}

pub fn bench_fit(c: &mut Criterion) {
    const N: usize = 100;
    let inputs = smeared_inputs(N);

    for (name, vertex) in [("Fit pi0: energy-momentum", false), ("Fit pi0: vertex", true)] {
        let fitter = fitter(vertex);
        c.bench_function(name, |b| {
            b.iter(|| {
                for inputs in inputs.iter() {
                    black_box(fitter.do_fit(black_box(inputs)).unwrap());
                }
            })
        });
    }
}

pub fn bench_constraints(c: &mut Criterion) {
    let state = &PI0_EVENTS[0];
    let params: Vec<Vec<f64>> = [
        fit_particle(state.beam(), 0.0),
        fit_particle(state.proton, ParticleType::PROTON_MASS),
        fit_particle(state.photons[0], 0.0),
        fit_particle(state.photons[1], 0.0),
    ]
    .iter()
    .map(|p| p.values().to_vec())
    .collect();
    let refs: Vec<&[f64]> = params.iter().map(Vec::as_slice).collect();
    let balance = EnergyMomentumBalance::default();

    c.bench_function("Energy-momentum residuals", |b| {
        b.iter(|| black_box(balance.residuals(black_box(&refs)).unwrap()))
    });
}
