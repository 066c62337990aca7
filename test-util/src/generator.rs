use crate::final_state::{FourVector, PI0_MASS, PROTON_MASS, TrueFinalState};

use lazy_static::lazy_static;
use rand::prelude::*;
use std::f64::consts::PI;

fn boost(v: FourVector, beta: [f64; 3]) -> FourVector {
    let b2: f64 = beta.iter().map(|b| b * b).sum();
    if b2 == 0.0 {
        return v;
    }
    let gamma = 1.0 / (1.0 - b2).sqrt();
    let bp = beta[0] * v[0] + beta[1] * v[1] + beta[2] * v[2];
    let gamma2 = (gamma - 1.0) / b2;
    [
        v[0] + gamma2 * bp * beta[0] + gamma * beta[0] * v[3],
        v[1] + gamma2 * bp * beta[1] + gamma * beta[1] * v[3],
        v[2] + gamma2 * bp * beta[2] + gamma * beta[2] * v[3],
        gamma * (v[3] + bp),
    ]
}

fn isotropic(rng: &mut impl Rng, p: f64, energy: f64) -> FourVector {
    let cos_theta: f64 = rng.random_range(-1.0..=1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi: f64 = rng.random_range(-PI..PI);
    [
        p * sin_theta * phi.cos(),
        p * sin_theta * phi.sin(),
        p * cos_theta,
        energy,
    ]
}

/// `γ p → p π⁰, π⁰ → γγ`, isotropic in the centre-of-mass frame and in the π⁰ rest frame
pub fn pi0_photoproduction(rng: &mut impl Rng, beam_energy: f64) -> TrueFinalState {
    let s = PROTON_MASS.powi(2) + 2.0 * PROTON_MASS * beam_energy;
    let sqrt_s = s.sqrt();
    let e_pi = (s + PI0_MASS.powi(2) - PROTON_MASS.powi(2)) / (2.0 * sqrt_s);
    let e_p = sqrt_s - e_pi;
    let p_star = (e_pi.powi(2) - PI0_MASS.powi(2)).sqrt();

    let pion_cm = isotropic(rng, p_star, e_pi);
    let proton_cm = [-pion_cm[0], -pion_cm[1], -pion_cm[2], e_p];

    let beta_cm = [0.0, 0.0, beam_energy / (beam_energy + PROTON_MASS)];
    let pion = boost(pion_cm, beta_cm);
    let proton = boost(proton_cm, beta_cm);

    let gamma_rest = isotropic(rng, PI0_MASS / 2.0, PI0_MASS / 2.0);
    let beta_pion = [pion[0] / pion[3], pion[1] / pion[3], pion[2] / pion[3]];
    let photons = vec![
        boost(gamma_rest, beta_pion),
        boost(
            [-gamma_rest[0], -gamma_rest[1], -gamma_rest[2], gamma_rest[3]],
            beta_pion,
        ),
    ];

    TrueFinalState {
        beam_energy,
        proton,
        photons,
    }
}

lazy_static! {
    /// 500 π⁰ photoproduction events at 1 GeV beam energy
    pub static ref PI0_EVENTS: Vec<TrueFinalState> = {
        let mut rng = StdRng::seed_from_u64(0);
        (0..500).map(|_| pi0_photoproduction(&mut rng, 1000.0)).collect()
    };
}
