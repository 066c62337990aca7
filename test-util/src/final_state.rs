// We cannot return crate types like `Event`, because it would cause cyclic crate dependencies

/// `(px, py, pz, E)` in MeV
pub type FourVector = [f64; 4];

pub const PROTON_MASS: f64 = 938.272046;
pub const PI0_MASS: f64 = 134.9766;

/// Generated `γ p → p + photons` final state with the beam photon along `+z` and the target at
/// rest
#[derive(Clone, Debug, PartialEq)]
pub struct TrueFinalState {
    pub beam_energy: f64,
    pub proton: FourVector,
    pub photons: Vec<FourVector>,
}

impl TrueFinalState {
    pub fn beam(&self) -> FourVector {
        [0.0, 0.0, self.beam_energy, self.beam_energy]
    }
}

pub fn photon(energy: f64, theta: f64, phi: f64) -> FourVector {
    [
        energy * theta.sin() * phi.cos(),
        energy * theta.sin() * phi.sin(),
        energy * theta.cos(),
        energy,
    ]
}

pub fn invariant_mass(vectors: &[FourVector]) -> f64 {
    let sum = vectors.iter().fold([0.0; 4], |mut acc, v| {
        acc.iter_mut().zip(v).for_each(|(a, x)| *a += x);
        acc
    });
    let m2 = sum[3].powi(2) - sum[0].powi(2) - sum[1].powi(2) - sum[2].powi(2);
    m2.max(0.0).sqrt()
}

/// Beam energy and recoil proton that conserve 4-momentum with the given photons
///
/// Panics if no physical solution exists.
pub fn balance_beam(photons: Vec<FourVector>, target_mass: f64) -> TrueFinalState {
    let [px, py, pz, e] = photons.iter().fold([0.0; 4], |mut acc, v| {
        acc.iter_mut().zip(v).for_each(|(a, x)| *a += x);
        acc
    });
    let a = target_mass - e;
    let p2 = px * px + py * py + pz * pz;
    let beam_energy = (target_mass.powi(2) + p2 - a * a) / (2.0 * (a + pz));
    assert!(
        beam_energy > 0.0 && a + pz > 0.0,
        "photons cannot be balanced by a beam photon"
    );
    TrueFinalState {
        beam_energy,
        proton: [-px, -py, beam_energy - pz, beam_energy + a],
        photons,
    }
}

/// Two photons of 300 and 250 MeV at `theta` 1.0 and 1.5 rad, back to back in `phi`
///
/// The beam energy is about 670.7 MeV and the proton kinetic energy about 120.7 MeV.
pub fn closure_two_photon_event() -> TrueFinalState {
    balance_beam(
        vec![
            photon(300.0, 1.0, 0.0),
            photon(250.0, 1.5, std::f64::consts::PI),
        ],
        PROTON_MASS,
    )
}

/// `n` photons spread in angle, the most energetic ones forward, `n` up to five
pub fn fan_of_photons(n: usize) -> TrueFinalState {
    assert!(
        (1..=5).contains(&n),
        "fan_of_photons supports 1 to 5 photons"
    );
    let photons = (0..n)
        .map(|i| {
            let energy = 120.0 + 25.0 * i as f64;
            let theta = 2.75 - 2.4 * (i + 1) as f64 / (n + 1) as f64;
            let phi = -std::f64::consts::PI
                + 2.0 * std::f64::consts::PI * (i as f64 + 0.5) / n as f64;
            photon(energy, theta, phi)
        })
        .collect();
    balance_beam(photons, PROTON_MASS)
}
