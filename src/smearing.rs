use crate::particle::FitParticle;

use rand::prelude::*;
use rand_distr::StandardNormal;

/// Turns a true particle into a measured one
///
/// Implementations own whatever state they need, e.g. the random generator, so a harness
/// owning its model owns the whole measurement stream.
pub trait SmearingModel {
    fn smear(&mut self, particle: &mut FitParticle);
}

/// Detector-resolution smearing of Monte-Carlo truth
///
/// Sets the sigmas with [FitParticle::estimate_uncertainties] and then adds independent
/// zero-mean Gaussian noise with these sigmas to `Ek`, `theta` and `phi`, in this order. The
/// generator is seeded once when the model is built and is never reseeded, so a run is
/// reproducible from its seed. Workers processing events in parallel need their own model.
#[derive(Clone, Debug)]
pub struct GaussianSmearing<R = StdRng> {
    rng: R,
}

impl GaussianSmearing<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GaussianSmearing<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn gauss(&mut self, sigma: f64) -> f64 {
        let eps: f64 = self.rng.sample(StandardNormal);
        sigma * eps
    }
}

impl<R: Rng> SmearingModel for GaussianSmearing<R> {
    fn smear(&mut self, particle: &mut FitParticle) {
        particle.estimate_uncertainties();
        particle.ek += self.gauss(particle.ek_sigma);
        particle.theta += self.gauss(particle.theta_sigma);
        particle.phi += self.gauss(particle.phi_sigma);
    }
}

/// Perfect measurement: values are untouched and every sigma is zero
///
/// With all sigmas zero the fit cannot move any measured value, which makes this model the
/// closure test of the constraints themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactMeasurement;

impl SmearingModel for ExactMeasurement {
    fn smear(&mut self, particle: &mut FitParticle) {
        particle.clear_uncertainties();
    }
}

/// Resolution without noise: sigmas are estimated, values are untouched
#[derive(Clone, Copy, Debug, Default)]
pub struct ResolutionOnly;

impl SmearingModel for ResolutionOnly {
    fn smear(&mut self, particle: &mut FitParticle) {
        particle.estimate_uncertainties();
    }
}
