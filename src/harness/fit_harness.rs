use crate::constraints::{
    Constraint, EnergyMomentumBalance, InvariantMassConstraint, VertexConstraint,
};
use crate::data::{Event, Particle, TaggerHit};
use crate::diagnostics::{BinSettings, Diagnostics, MetricSummary, metric};
use crate::error::{HarnessError, KinematicError};
use crate::harness::config::{ConstraintMode, HarnessConfig};
use crate::harness::outcome::{RunCounters, TaggerHitOutcome};
use crate::lorentz::LorentzVector;
use crate::nl_fit::{FitInputs, FitResult, KinematicFitter};
use crate::particle::{FitParticle, N_PARAMS, ParticleType};
use crate::smearing::SmearingModel;

const BEAM: &str = "Beam";
const PROTON: &str = "Proton";

/// Per-event driver of the `γ p → p + nγ` kinematic fit
///
/// For every tagger hit of an event the true proton and photons are taken from the Monte-Carlo
/// record, smeared with the injected [SmearingModel], fitted, and the fit diagnostics are
/// histogrammed. The particle slots are reused between tagger hits and events.
#[derive(Debug)]
pub struct FitHarness<S> {
    config: HarnessConfig,
    mode: ConstraintMode,
    smearing: S,
    fitter: KinematicFitter<Constraint>,
    photon_names: Vec<String>,
    inputs: FitInputs,
    beam: FitParticle,
    proton: FitParticle,
    photons: Vec<FitParticle>,
    diagnostics: Diagnostics,
    counters: RunCounters,
}

impl<S> FitHarness<S>
where
    S: SmearingModel,
{
    pub fn new(config: HarnessConfig, smearing: S) -> Result<Self, HarnessError> {
        let mode = config.validate()?;
        let photon_names: Vec<String> = (1..=config.n_photons)
            .map(|i| format!("Photon{i}"))
            .collect();

        let mut fitter = KinematicFitter::new("photoproduction");
        *fitter.settings_mut() = config.fit.clone();
        fitter.link_variable(BEAM, N_PARAMS)?;
        fitter.link_variable(PROTON, N_PARAMS)?;
        for name in &photon_names {
            fitter.link_variable(name, N_PARAMS)?;
        }

        let all_names: Vec<&str> = [BEAM, PROTON]
            .into_iter()
            .chain(photon_names.iter().map(String::as_str))
            .collect();
        fitter.add_constraint(EnergyMomentumBalance::default(), &all_names)?;
        match mode {
            ConstraintMode::EnergyMomentumOnly => {}
            ConstraintMode::InvariantMass => {
                fitter.add_constraint(
                    InvariantMassConstraint::new(config.target_mass),
                    &photon_names,
                )?;
            }
            ConstraintMode::Vertex => {
                fitter.add_unmeasured_variable(VertexConstraint::VERTEX_VARIABLE)?;
                let names: Vec<&str> = photon_names
                    .iter()
                    .map(String::as_str)
                    .chain([VertexConstraint::VERTEX_VARIABLE])
                    .collect();
                fitter.add_constraint(VertexConstraint::new(config.target_mass), &names)?;
            }
        }

        let diagnostics = Self::make_histograms(&config, mode, &fitter)?;
        log::info!(
            "fit harness ready: {} photons, {:?}, constraints {:?}",
            config.n_photons,
            mode,
            fitter.constraint_names()
        );

        Ok(Self {
            mode,
            smearing,
            fitter,
            inputs: FitInputs::new(),
            beam: FitParticle::default(),
            proton: FitParticle::default(),
            photons: vec![FitParticle::default(); config.n_photons],
            photon_names,
            diagnostics,
            counters: RunCounters::default(),
            config,
        })
    }

    fn make_histograms(
        config: &HarnessConfig,
        mode: ConstraintMode,
        fitter: &KinematicFitter<Constraint>,
    ) -> Result<Diagnostics, HarnessError> {
        let mut d = Diagnostics::new();

        let energy = BinSettings::energy(config.energy_scale);
        d.make_2d(metric::PID_BANANAS, energy, BinSettings::veto())?;
        d.make_category(metric::IDENTIFIED_PARTICLES)?;
        d.make_1d(metric::TAGGER_SPECTRUM, BinSettings::tagger())?;
        d.make_1d(metric::TAGGER_HITS, BinSettings::counts(100))?;
        d.make_1d(metric::CB_ENERGY_SUM, energy)?;
        for &particle_type in ParticleType::detectable_types() {
            d.make_1d(&metric::number_of(particle_type), BinSettings::counts(16))?;
        }

        d.make_1d(metric::CHI_SQUARE, BinSettings::chi_square())?;
        d.make_1d(metric::PROBABILITY, BinSettings::probability())?;
        d.make_1d(metric::ITERATIONS, BinSettings::iterations())?;
        for name in fitter.variable_names() {
            if name != VertexConstraint::VERTEX_VARIABLE {
                d.make_1d(&metric::pull(&name), BinSettings::pull())?;
            }
        }

        let im = BinSettings::invariant_mass(config.target_mass);
        d.make_1d(metric::IM_TRUE, im)?;
        d.make_1d(metric::IM_SMEARED, im)?;
        d.make_1d(metric::IM_FIT, im)?;

        if mode == ConstraintMode::Vertex {
            d.make_1d(metric::VERTEX_Z_BEFORE, BinSettings::vertex())?;
            d.make_1d(metric::VERTEX_Z_AFTER, BinSettings::vertex())?;
        }
        Ok(d)
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn mode(&self) -> ConstraintMode {
        self.mode
    }

    pub fn fitter(&self) -> &KinematicFitter<Constraint> {
        &self.fitter
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    /// Beam slot after the last processed tagger hit
    ///
    /// Holds the fitted values once a fit succeeded, with `theta` in `[0, π]` and `phi` in
    /// `(-π, π]`, and the smeared measurement otherwise.
    pub fn beam(&self) -> &FitParticle {
        &self.beam
    }

    pub fn proton(&self) -> &FitParticle {
        &self.proton
    }

    /// Photon slots, filled like [Self::beam]
    pub fn photons(&self) -> &[FitParticle] {
        &self.photons
    }

    /// Fill the overview histograms and fit every tagger hit of the event
    ///
    /// Skipped, rejected and failed tagger hits are reported through the outcomes, `Err` is only
    /// returned when the fitter is inconsistent with its own inputs.
    pub fn process_event(&mut self, event: &Event) -> Result<Vec<TaggerHitOutcome>, HarnessError> {
        self.counters.events += 1;
        self.fill_overview(event);

        let mut outcomes = Vec::with_capacity(event.tagger_hits.len());
        for hit in &event.tagger_hits {
            self.diagnostics
                .fill(metric::TAGGER_SPECTRUM, hit.photon_energy);
            let outcome = self.process_tagger_hit(event, hit)?;
            self.counters.record(&outcome);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    fn fill_overview(&mut self, event: &Event) {
        for track in &event.tracks {
            self.diagnostics.fill_2d(
                metric::PID_BANANAS,
                track.cluster_energy,
                track.veto_energy,
            );
        }
        for particle in &event.particles {
            self.diagnostics.fill_category(
                metric::IDENTIFIED_PARTICLES,
                particle.particle_type.print_name(),
            );
        }
        self.diagnostics
            .fill(metric::TAGGER_HITS, event.tagger_hits.len() as f64);
        self.diagnostics
            .fill(metric::CB_ENERGY_SUM, event.trigger.cb_energy_sum);
        for &particle_type in ParticleType::detectable_types() {
            let n = event.particles_of_type(particle_type).count();
            self.diagnostics
                .fill(&metric::number_of(particle_type), n as f64);
        }
    }

    fn process_tagger_hit(
        &mut self,
        event: &Event,
        hit: &TaggerHit,
    ) -> Result<TaggerHitOutcome, HarnessError> {
        if !self.extract(event) {
            log::debug!(
                "tagger hit {}: final state is not one proton and {} photons",
                hit.channel,
                self.photons.len()
            );
            return Ok(TaggerHitOutcome::TopologyMismatch);
        }
        self.beam
            .assign_from_truth(&hit.photon_beam(), ParticleType::Photon.mass());

        match self.smear_and_record() {
            Ok(()) => {}
            Err(e) => {
                log::debug!("tagger hit {}: rejected, {}", hit.channel, e);
                return Ok(TaggerHitOutcome::KinematicReject(e));
            }
        }

        self.fill_inputs();
        let result = self.fitter.do_fit(&self.inputs)?;
        if !result.is_success() {
            log::debug!("tagger hit {}: fit failed, {}", hit.channel, result.status);
            return Ok(TaggerHitOutcome::FitFailed(result.status));
        }
        log::trace!("tagger hit {}: {}", hit.channel, result);

        self.record_fit(&result);
        Ok(TaggerHitOutcome::Fitted(result))
    }

    /// Copy the true proton and the first photons into the slots, `false` on a topology mismatch
    fn extract(&mut self, event: &Event) -> bool {
        let mut protons = event.true_particles_of_type(ParticleType::Proton);
        let (Some(proton), None) = (protons.next(), protons.next()) else {
            return false;
        };
        let photons: Vec<&Particle> = event
            .true_particles_of_type(ParticleType::Photon)
            .take(self.photons.len())
            .collect();
        if photons.len() != self.photons.len() {
            return false;
        }

        self.proton
            .assign_from_truth(&proton.p4, ParticleType::Proton.mass());
        for (slot, photon) in self.photons.iter_mut().zip(photons) {
            slot.assign_from_truth(&photon.p4, ParticleType::Photon.mass());
        }
        true
    }

    fn smear_and_record(&mut self) -> Result<(), KinematicError> {
        let im_true = photons_invariant_mass(&self.photons)?;

        self.smearing.smear(&mut self.proton);
        for photon in self.photons.iter_mut() {
            self.smearing.smear(photon);
        }
        self.smearing.smear(&mut self.beam);

        let im_smeared = photons_invariant_mass(&self.photons)?;
        self.proton.to_four_momentum(ParticleType::Proton.mass())?;
        self.beam.to_four_momentum(ParticleType::Photon.mass())?;

        self.diagnostics.fill(metric::IM_TRUE, im_true);
        self.diagnostics.fill(metric::IM_SMEARED, im_smeared);
        Ok(())
    }

    fn fill_inputs(&mut self) {
        self.inputs
            .set_measured(BEAM, &self.beam.values(), &self.beam.sigmas());
        self.inputs
            .set_measured(PROTON, &self.proton.values(), &self.proton.sigmas());
        for (name, photon) in self.photon_names.iter().zip(&self.photons) {
            self.inputs
                .set_measured(name, &photon.values(), &photon.sigmas());
        }
        if self.mode == ConstraintMode::Vertex {
            self.inputs
                .set_unmeasured(VertexConstraint::VERTEX_VARIABLE, 0.0);
        }
    }

    fn record_fit(&mut self, result: &FitResult) {
        for variable in result.variables.iter().filter(|v| v.measured) {
            if let Some(pull) = variable.pull {
                self.diagnostics.fill(&metric::pull(&variable.name), pull);
            }
        }
        self.diagnostics.fill(metric::CHI_SQUARE, result.chi_square);
        self.diagnostics.fill(metric::PROBABILITY, result.probability);
        self.diagnostics
            .fill(metric::ITERATIONS, f64::from(result.n_iterations));

        if self.mode == ConstraintMode::Vertex {
            if let Some(v_z) = result.variable(VertexConstraint::VERTEX_VARIABLE) {
                self.diagnostics
                    .fill(metric::VERTEX_Z_BEFORE, v_z.value.before);
                self.diagnostics
                    .fill(metric::VERTEX_Z_AFTER, v_z.value.after);
            }
        }

        match self.write_back(result) {
            Ok(im_fit) => {
                self.diagnostics.fill(metric::IM_FIT, im_fit);
            }
            Err(e) => log::debug!("fitted photons have no invariant mass: {e}"),
        }
    }

    /// Replace the slot values with the fitted ones and return the fitted photon mass
    ///
    /// Stored angles are folded into the canonical range, the fit itself works on unfolded ones.
    fn write_back(&mut self, result: &FitResult) -> Result<f64, KinematicError> {
        self.beam.set_values(&result.values_after(BEAM))?;
        self.beam.normalize_angles();
        self.proton.set_values(&result.values_after(PROTON))?;
        self.proton.normalize_angles();
        for (name, photon) in self.photon_names.iter().zip(self.photons.iter_mut()) {
            photon.set_values(&result.values_after(name))?;
            photon.normalize_angles();
        }
        photons_invariant_mass(&self.photons)
    }

    /// Log the per-metric summary and the run counters
    pub fn finish(&self) -> Vec<MetricSummary> {
        let c = &self.counters;
        log::info!(
            "{} events, {} tagger hits: {} fitted, {} failed, {} rejected, {} topology mismatches",
            c.events,
            c.tagger_hits,
            c.fitted,
            c.fit_failures,
            c.kinematic_rejections,
            c.topology_mismatches
        );
        let summary = self.diagnostics.summary();
        for s in &summary {
            match (s.mean, s.rms) {
                (Some(mean), Some(rms)) => log::info!(
                    "{}: {} entries, mean {:.4}, rms {:.4}",
                    s.name,
                    s.entries,
                    mean,
                    rms
                ),
                _ => log::info!("{}: empty", s.name),
            }
        }
        summary
    }
}

fn photons_invariant_mass(photons: &[FitParticle]) -> Result<f64, KinematicError> {
    let mass = ParticleType::Photon.mass();
    photons
        .iter()
        .map(|photon| photon.to_four_momentum(mass))
        .sum::<Result<LorentzVector, _>>()
        .map(|sum| sum.mass())
}
