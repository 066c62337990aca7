use crate::constraints::ConstraintTrait;
use crate::error::{FitSetupError, KinematicError};
use crate::nl_fit::inputs::FitInputs;
use crate::nl_fit::result::{BeforeAfter, FitResult, FitStatus, FitVariable};
use crate::nl_fit::settings::FitSettings;

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Singular values below this fraction of the largest one are dropped by pseudo-inverses
const RELATIVE_SINGULAR_CUT: f64 = 1e-12;

/// Shortest step tried by the line search is `2^-MAX_STEP_HALVINGS` of the full one
const MAX_STEP_HALVINGS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VariableKind {
    Measured,
    Unmeasured,
}

#[derive(Clone, Debug)]
struct VariableDef {
    name: String,
    dim: usize,
    kind: VariableKind,
}

impl VariableDef {
    fn component_name(&self, component: usize) -> String {
        if self.dim == 1 {
            self.name.clone()
        } else {
            format!("{}[{}]", self.name, component)
        }
    }
}

#[derive(Clone, Debug)]
struct RegisteredConstraint<C> {
    constraint: C,
    variables: Vec<usize>,
}

/// Positions of the free components in the per-variable value lists
struct Layout {
    measured: Vec<(usize, usize)>,
    unmeasured: Vec<(usize, usize)>,
    sigmas: Vec<Vec<f64>>,
}

impl Layout {
    fn gather(components: &[(usize, usize)], values: &[Vec<f64>]) -> DVector<f64> {
        DVector::from_iterator(
            components.len(),
            components.iter().map(|&(v, c)| values[v][c]),
        )
    }

    fn scatter(components: &[(usize, usize)], source: &DVector<f64>, values: &mut [Vec<f64>]) {
        for (&(v, c), &x) in components.iter().zip(source.iter()) {
            values[v][c] = x;
        }
    }
}

/// Diagonal of the post-fit covariance needed for sigmas and pulls
struct PostFitCovariance {
    /// Diagonal of `V Aᵀ W' A V`, the variance removed from each measured component
    measured_reduction: DVector<f64>,
    unmeasured_variance: DVector<f64>,
}

/// Undamped update of the free components
struct Step {
    x: DVector<f64>,
    u: DVector<f64>,
    multipliers: DVector<f64>,
    covariance: PostFitCovariance,
}

/// Point reached by [KinematicFitter::line_search]
struct Trial {
    values: Vec<Vec<f64>>,
    residuals: DVector<f64>,
    full_step: bool,
}

/// Equality-constrained least-squares fitter
///
/// Measured variables carry a value and a sigma per component and may be adjusted by the fit;
/// components with zero sigma stay fixed. Unmeasured variables are free scalars without a prior.
/// Every iteration linearizes the constraints with central-difference derivatives and solves
/// for the Lagrange multipliers:
///
/// ```text
/// r  = f(x, u) + A (x0 - x)
/// W  = (A V Aᵀ)⁺
/// Δu = -(Bᵀ W B)⁺ Bᵀ W r
/// x' = x0 - V Aᵀ W (r + B Δu)
/// ```
///
/// with `A = ∂f/∂x`, `B = ∂f/∂u`, `V = diag(σ²)` and pseudo-inverses so that fixed or redundant
/// directions are ignored. Each update is halved until `χ²/2 + μ Σ|f|` does not grow, `μ` being
/// above the largest multiplier. The fit converges on a full update with every residual below
/// [FitSettings::constraint_accuracy] and the chi-square changed by less than
/// [FitSettings::chi2_accuracy].
#[derive(Clone, Debug)]
pub struct KinematicFitter<C> {
    name: String,
    settings: FitSettings,
    variables: Vec<VariableDef>,
    constraints: Vec<RegisteredConstraint<C>>,
}

impl<C> KinematicFitter<C>
where
    C: ConstraintTrait,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: FitSettings::default(),
            variables: vec![],
            constraints: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &FitSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut FitSettings {
        &mut self.settings
    }

    /// Register a measured variable with `dim` components
    pub fn link_variable(&mut self, name: &str, dim: usize) -> Result<(), FitSetupError> {
        self.add_variable(name, dim, VariableKind::Measured)
    }

    /// Register a free scalar variable, its starting value defaults to zero
    pub fn add_unmeasured_variable(&mut self, name: &str) -> Result<(), FitSetupError> {
        self.add_variable(name, 1, VariableKind::Unmeasured)
    }

    fn add_variable(
        &mut self,
        name: &str,
        dim: usize,
        kind: VariableKind,
    ) -> Result<(), FitSetupError> {
        if dim == 0 {
            return Err(FitSetupError::EmptyVariable(name.to_owned()));
        }
        if self.variable_index(name).is_some() {
            return Err(FitSetupError::DuplicateVariable(name.to_owned()));
        }
        self.variables.push(VariableDef {
            name: name.to_owned(),
            dim,
            kind,
        });
        Ok(())
    }

    fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name == name)
    }

    /// Register a constraint evaluated on the listed variables, in this order
    pub fn add_constraint<S: AsRef<str>>(
        &mut self,
        constraint: impl Into<C>,
        variables: &[S],
    ) -> Result<(), FitSetupError> {
        let constraint = constraint.into();
        if variables.is_empty() {
            return Err(FitSetupError::EmptyConstraint(constraint.name().to_owned()));
        }
        let variables = variables
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.variable_index(name)
                    .ok_or_else(|| FitSetupError::UnknownVariable(name.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.constraints.push(RegisteredConstraint {
            constraint,
            variables,
        });
        Ok(())
    }

    /// Names of all scalar components, in registration order
    pub fn variable_names(&self) -> Vec<String> {
        self.variables
            .iter()
            .flat_map(|def| (0..def.dim).map(move |c| def.component_name(c)))
            .collect()
    }

    pub fn constraint_names(&self) -> Vec<&'static str> {
        self.constraints
            .iter()
            .map(|rc| rc.constraint.name())
            .collect()
    }

    /// Degrees of freedom: constraint equations minus unmeasured components
    pub fn ndf(&self) -> i64 {
        let n_equations: usize = self.constraints.iter().map(|rc| rc.constraint.size()).sum();
        let n_unmeasured: usize = self
            .variables
            .iter()
            .filter(|v| v.kind == VariableKind::Unmeasured)
            .map(|v| v.dim)
            .sum();
        n_equations as i64 - n_unmeasured as i64
    }

    /// Run the fit from the given starting point
    ///
    /// Only inconsistent inputs are reported as `Err`, numerical trouble is reported through
    /// [FitResult::status].
    pub fn do_fit(&self, inputs: &FitInputs) -> Result<FitResult, FitSetupError> {
        if self.constraints.is_empty() {
            return Err(FitSetupError::NoConstraints);
        }
        let (layout, values) = self.layout(inputs)?;
        Ok(self.iterate(&layout, values))
    }

    fn layout(&self, inputs: &FitInputs) -> Result<(Layout, Vec<Vec<f64>>), FitSetupError> {
        let mut layout = Layout {
            measured: vec![],
            unmeasured: vec![],
            sigmas: Vec::with_capacity(self.variables.len()),
        };
        let mut values = Vec::with_capacity(self.variables.len());
        for (i, def) in self.variables.iter().enumerate() {
            match def.kind {
                VariableKind::Measured => {
                    let measurement = inputs
                        .measured(&def.name)
                        .ok_or_else(|| FitSetupError::MissingValues(def.name.clone()))?;
                    if measurement.values.len() != def.dim
                        || measurement.sigmas.len() != def.dim
                    {
                        return Err(FitSetupError::WrongDimension {
                            name: def.name.clone(),
                            expected: def.dim,
                            actual: measurement.values.len(),
                            sigmas: measurement.sigmas.len(),
                        });
                    }
                    if measurement
                        .sigmas
                        .iter()
                        .any(|s| !s.is_finite() || *s < 0.0)
                    {
                        return Err(FitSetupError::InvalidSigma(def.name.clone()));
                    }
                    values.push(measurement.values.clone());
                    layout.sigmas.push(measurement.sigmas.clone());
                    layout.measured.extend((0..def.dim).map(|c| (i, c)));
                }
                VariableKind::Unmeasured => {
                    values.push(vec![inputs.unmeasured(&def.name).unwrap_or(0.0); def.dim]);
                    layout.sigmas.push(vec![0.0; def.dim]);
                    layout.unmeasured.extend((0..def.dim).map(|c| (i, c)));
                }
            }
        }
        Ok((layout, values))
    }

    fn evaluate(&self, values: &[Vec<f64>]) -> Result<DVector<f64>, KinematicError> {
        let mut residuals = vec![];
        for rc in &self.constraints {
            let params: Vec<&[f64]> = rc
                .variables
                .iter()
                .map(|&v| values[v].as_slice())
                .collect();
            let r = rc.constraint.residuals(&params)?;
            if r.len() != rc.constraint.size() {
                return Err(KinematicError::WrongResidualCount {
                    constraint: rc.constraint.name(),
                    expected: rc.constraint.size(),
                    actual: r.len(),
                });
            }
            residuals.extend(r);
        }
        Ok(DVector::from_vec(residuals))
    }

    /// Central-difference derivative of all residuals over one component
    fn derivative(
        &self,
        values: &mut [Vec<f64>],
        (v, c): (usize, usize),
        step: f64,
    ) -> Result<DVector<f64>, KinematicError> {
        let original = values[v][c];
        values[v][c] = original + step;
        let plus = self.evaluate(values);
        values[v][c] = original - step;
        let minus = self.evaluate(values);
        values[v][c] = original;
        Ok((plus? - minus?) / (2.0 * step))
    }

    fn iterate(&self, layout: &Layout, mut values: Vec<Vec<f64>>) -> FitResult {
        let initial = values.clone();
        let x0 = Layout::gather(&layout.measured, &values);
        let variance = Layout::gather(&layout.measured, &layout.sigmas).map(|s| s * s);

        let mut chi2 = 0.0;
        let mut f = match self.evaluate(&values) {
            Ok(f) => f,
            Err(e) => {
                let status = FitStatus::DomainError(e);
                return self.result(layout, &initial, &values, status, 0, chi2, None);
            }
        };

        for iteration in 1..=self.settings.max_iterations {
            let step = match self.step(layout, &mut values, &f, &x0, &variance) {
                Ok(step) => step,
                Err(status) => {
                    return self.result(layout, &initial, &values, status, iteration, chi2, None);
                }
            };
            if step.x.iter().chain(step.u.iter()).any(|x| !x.is_finite()) {
                let status = FitStatus::NonFinite;
                return self.result(layout, &initial, &values, status, iteration, chi2, None);
            }
            let trial = match self.line_search(layout, &values, &f, &step, &x0, &variance) {
                Ok(trial) => trial,
                Err(status) => {
                    return self.result(layout, &initial, &values, status, iteration, chi2, None);
                }
            };
            values = trial.values;
            f = trial.residuals;

            let chi2_new = chi_square(&Layout::gather(&layout.measured, &values), &x0, &variance);
            let converged = trial.full_step
                && f.amax() < self.settings.constraint_accuracy
                && (chi2_new - chi2).abs() < self.settings.chi2_accuracy;
            chi2 = chi2_new;
            if converged {
                return self.result(
                    layout,
                    &initial,
                    &values,
                    FitStatus::Success,
                    iteration,
                    chi2,
                    Some(&step.covariance),
                );
            }
        }

        self.result(
            layout,
            &initial,
            &values,
            FitStatus::NoConvergence,
            self.settings.max_iterations,
            chi2,
            None,
        )
    }

    /// Move along the step, halving it until `χ²/2 + μ Σ|f|` does not grow
    ///
    /// With `μ` above the largest Lagrange multiplier the step is a descent direction of this
    /// merit function, so a short enough step is always accepted unless the constraints cannot
    /// be evaluated there. If no halving decreases the merit, the longest step the constraints
    /// could be evaluated at is taken.
    fn line_search(
        &self,
        layout: &Layout,
        values: &[Vec<f64>],
        f: &DVector<f64>,
        step: &Step,
        x0: &DVector<f64>,
        variance: &DVector<f64>,
    ) -> Result<Trial, FitStatus> {
        let x = Layout::gather(&layout.measured, values);
        let u = Layout::gather(&layout.unmeasured, values);
        let dx = &step.x - &x;
        let du = &step.u - &u;

        let penalty = 2.0 * step.multipliers.amax() + 1.0;
        let merit = |x: &DVector<f64>, f: &DVector<f64>| {
            0.5 * chi_square(x, x0, variance) + penalty * f.lp_norm(1)
        };
        let current = merit(&x, f);

        let mut fallback = None;
        let mut domain_error = None;
        for halvings in 0..=MAX_STEP_HALVINGS {
            let fraction = 0.5_f64.powi(halvings as i32);
            let mut values = values.to_vec();
            let x_trial = &x + &dx * fraction;
            Layout::scatter(&layout.measured, &x_trial, &mut values);
            Layout::scatter(&layout.unmeasured, &(&u + &du * fraction), &mut values);
            match self.evaluate(&values) {
                Ok(residuals) => {
                    let accepted =
                        merit(&x_trial, &residuals) <= current + self.settings.chi2_accuracy;
                    let trial = Trial {
                        values,
                        residuals,
                        full_step: halvings == 0,
                    };
                    if accepted {
                        return Ok(trial);
                    }
                    fallback.get_or_insert(trial);
                }
                Err(e) => {
                    domain_error.get_or_insert(e);
                }
            }
        }
        match (fallback, domain_error) {
            (Some(trial), _) => Ok(trial),
            (None, Some(e)) => Err(FitStatus::DomainError(e)),
            (None, None) => Err(FitStatus::NonFinite),
        }
    }

    fn step(
        &self,
        layout: &Layout,
        values: &mut [Vec<f64>],
        f: &DVector<f64>,
        x0: &DVector<f64>,
        variance: &DVector<f64>,
    ) -> Result<Step, FitStatus> {
        let n_constraints = f.len();

        let mut a = DMatrix::zeros(n_constraints, layout.measured.len());
        for (k, &component) in layout.measured.iter().enumerate() {
            // fixed components never move, their derivatives are not needed
            if variance[k] > 0.0 {
                let step = self.settings.derivative_step * variance[k].sqrt();
                let column = self
                    .derivative(values, component, step)
                    .map_err(FitStatus::DomainError)?;
                a.set_column(k, &column);
            }
        }

        let x = Layout::gather(&layout.measured, values);
        let r = f + &a * (x0 - &x);

        let mut av = a.clone();
        for (k, mut column) in av.column_iter_mut().enumerate() {
            column *= variance[k];
        }
        let w = pseudo_inverse(&av * a.transpose()).ok_or(FitStatus::SingularMatrix)?;

        let u = Layout::gather(&layout.unmeasured, values);
        let (u_new, r_eff, w_eff, unmeasured_variance) = if layout.unmeasured.is_empty() {
            (u, r, w.clone(), DVector::zeros(0))
        } else {
            let mut b = DMatrix::zeros(n_constraints, layout.unmeasured.len());
            for (k, &component) in layout.unmeasured.iter().enumerate() {
                let (v, c) = component;
                let step = self.settings.derivative_step * values[v][c].abs().max(1.0);
                let column = self
                    .derivative(values, component, step)
                    .map_err(FitStatus::DomainError)?;
                b.set_column(k, &column);
            }
            let wb = &w * &b;
            let c_inv = pseudo_inverse(b.transpose() * &wb).ok_or(FitStatus::SingularMatrix)?;
            let du = -(&c_inv * (wb.transpose() * &r));
            let r_eff = &r + &b * &du;
            let w_eff = &w - &wb * &c_inv * wb.transpose();
            (u + du, r_eff, w_eff, c_inv.diagonal())
        };

        let lambda = &w * &r_eff;
        let x_new = x0 - av.transpose() * &lambda;
        let measured_reduction = (av.transpose() * &w_eff * &av).diagonal();

        Ok(Step {
            x: x_new,
            u: u_new,
            multipliers: lambda,
            covariance: PostFitCovariance {
                measured_reduction,
                unmeasured_variance,
            },
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn result(
        &self,
        layout: &Layout,
        initial: &[Vec<f64>],
        values: &[Vec<f64>],
        status: FitStatus,
        n_iterations: u32,
        chi_square: f64,
        covariance: Option<&PostFitCovariance>,
    ) -> FitResult {
        let mut variables = Vec::with_capacity(layout.measured.len() + layout.unmeasured.len());
        let (mut k_measured, mut k_unmeasured) = (0, 0);
        for (i, def) in self.variables.iter().enumerate() {
            for c in 0..def.dim {
                let value = BeforeAfter {
                    before: initial[i][c],
                    after: values[i][c],
                };
                let (sigma, pull) = match def.kind {
                    VariableKind::Measured => {
                        let k = k_measured;
                        k_measured += 1;
                        let sigma_before = layout.sigmas[i][c];
                        match covariance {
                            Some(cov) => post_fit_sigma_and_pull(
                                value,
                                sigma_before,
                                cov.measured_reduction[k],
                            ),
                            None => (
                                BeforeAfter {
                                    before: sigma_before,
                                    after: sigma_before,
                                },
                                None,
                            ),
                        }
                    }
                    VariableKind::Unmeasured => {
                        let k = k_unmeasured;
                        k_unmeasured += 1;
                        let after = covariance
                            .map_or(0.0, |cov| cov.unmeasured_variance[k].max(0.0).sqrt());
                        (BeforeAfter { before: 0.0, after }, None)
                    }
                };
                variables.push(FitVariable {
                    name: def.component_name(c),
                    variable: def.name.clone(),
                    component: c,
                    measured: def.kind == VariableKind::Measured,
                    value,
                    sigma,
                    pull,
                });
            }
        }

        let ndf = self.ndf();
        FitResult {
            status,
            chi_square,
            ndf,
            probability: chi2_probability(chi_square, ndf),
            n_iterations,
            variables,
        }
    }
}

fn post_fit_sigma_and_pull(
    value: BeforeAfter,
    sigma_before: f64,
    reduction: f64,
) -> (BeforeAfter, Option<f64>) {
    let variance_before = sigma_before * sigma_before;
    let sigma = BeforeAfter {
        before: sigma_before,
        after: (variance_before - reduction).max(0.0).sqrt(),
    };
    let pull = (variance_before > 0.0 && reduction > variance_before * RELATIVE_SINGULAR_CUT)
        .then(|| (value.after - value.before) / reduction.sqrt());
    (sigma, pull)
}

fn chi_square(x: &DVector<f64>, x0: &DVector<f64>, variance: &DVector<f64>) -> f64 {
    x.iter()
        .zip(x0.iter())
        .zip(variance.iter())
        .filter(|&(_, &var)| var > 0.0)
        .map(|((&x, &x0), &var)| (x - x0).powi(2) / var)
        .sum()
}

fn pseudo_inverse(m: DMatrix<f64>) -> Option<DMatrix<f64>> {
    let svd = m.svd(true, true);
    let eps = (svd.singular_values.max() * RELATIVE_SINGULAR_CUT).max(f64::MIN_POSITIVE);
    svd.pseudo_inverse(eps).ok()
}

/// Upper-tail chi-square probability, one for fits without degrees of freedom
fn chi2_probability(chi2: f64, ndf: i64) -> f64 {
    if ndf <= 0 {
        return 1.0;
    }
    match ChiSquared::new(ndf as f64) {
        Ok(distribution) => distribution.sf(chi2.max(0.0)),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[derive(Clone, Debug)]
    enum Toy {
        Equal,
        Circle,
        NonNegativeTarget(f64),
        Arctan,
        TwoResiduals,
    }

    impl ConstraintTrait for Toy {
        fn name(&self) -> &'static str {
            "Toy"
        }

        fn size(&self) -> usize {
            1
        }

        fn residuals(&self, params: &[&[f64]]) -> Result<Vec<f64>, KinematicError> {
            match self {
                Self::Equal => Ok(vec![params[0][0] - params[1][0]]),
                Self::Circle => {
                    let (p, r) = (params[0], params[1][0]);
                    Ok(vec![p[0] * p[0] + p[1] * p[1] - r * r])
                }
                Self::NonNegativeTarget(target) => {
                    let a = params[0][0];
                    if a < 0.0 {
                        Err(KinematicError::BelowMassThreshold { ek: a, mass: 0.0 })
                    } else {
                        Ok(vec![a - target])
                    }
                }
                Self::Arctan => Ok(vec![params[0][0] - 1.0 + params[1][0].atan()]),
                Self::TwoResiduals => Ok(vec![params[0][0], params[0][0]]),
            }
        }
    }

    fn equal_fitter() -> KinematicFitter<Toy> {
        let mut fitter = KinematicFitter::new("equal");
        fitter.link_variable("a", 1).unwrap();
        fitter.link_variable("b", 1).unwrap();
        fitter.add_constraint(Toy::Equal, &["a", "b"]).unwrap();
        fitter
    }

    #[test]
    fn linear_constraint_averages_measurements() {
        let fitter = equal_fitter();
        let mut inputs = FitInputs::new();
        inputs.set_measured("a", &[1.0], &[1.0]);
        inputs.set_measured("b", &[3.0], &[1.0]);
        let result = fitter.do_fit(&inputs).unwrap();

        assert_eq!(result.status, FitStatus::Success);
        assert!(result.n_iterations <= 3);
        assert_eq!(result.ndf, 1);
        assert_abs_diff_eq!(result.values_after("a")[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.values_after("b")[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.chi_square, 2.0, epsilon = 1e-6);
        assert_relative_eq!(result.probability, 0.157299207050285, max_relative = 1e-6);

        let a = result.variable("a").unwrap();
        assert_abs_diff_eq!(a.sigma.after, 0.5_f64.sqrt(), epsilon = 1e-6);
        assert_abs_diff_eq!(a.pull.unwrap(), 2.0_f64.sqrt(), epsilon = 1e-5);
        assert_abs_diff_eq!(
            result.variable("b").unwrap().pull.unwrap(),
            -(2.0_f64.sqrt()),
            epsilon = 1e-5
        );
    }

    #[test]
    fn weights_follow_sigmas() {
        let fitter = equal_fitter();
        let mut inputs = FitInputs::new();
        inputs.set_measured("a", &[1.0], &[1.0]);
        inputs.set_measured("b", &[3.0], &[0.0]);
        let result = fitter.do_fit(&inputs).unwrap();
        assert!(result.is_success());
        assert_abs_diff_eq!(result.values_after("a")[0], 3.0, epsilon = 1e-6);
        assert_eq!(result.values_after("b")[0], 3.0);
        assert_eq!(result.variable("b").unwrap().pull, None);
    }

    #[test]
    fn unmeasured_radius() {
        let mut fitter: KinematicFitter<Toy> = KinematicFitter::new("circle");
        fitter.link_variable("p", 2).unwrap();
        fitter.add_unmeasured_variable("r").unwrap();
        fitter.add_constraint(Toy::Circle, &["p", "r"]).unwrap();
        assert_eq!(fitter.ndf(), 0);
        assert_eq!(fitter.variable_names(), ["p[0]", "p[1]", "r"]);

        let mut inputs = FitInputs::new();
        inputs.set_measured("p", &[3.0, 4.0], &[0.1, 0.1]);
        inputs.set_unmeasured("r", 1.0);
        let result = fitter.do_fit(&inputs).unwrap();

        assert!(result.is_success(), "{result}");
        let r = result.variable("r").unwrap();
        assert_abs_diff_eq!(r.value.after, 5.0, epsilon = 1e-6);
        assert_eq!(r.value.before, 1.0);
        assert_eq!(r.pull, None);
        let p = result.values_after("p");
        assert_abs_diff_eq!(p[0], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p[1], 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.chi_square, 0.0, epsilon = 1e-8);
        assert_eq!(result.probability, 1.0);
    }

    #[test]
    fn fixed_variables_cannot_satisfy_constraint() {
        let mut fitter = equal_fitter();
        fitter.settings_mut().max_iterations = 5;
        let mut inputs = FitInputs::new();
        inputs.set_measured("a", &[1.0], &[0.0]);
        inputs.set_measured("b", &[3.0], &[0.0]);
        let result = fitter.do_fit(&inputs).unwrap();
        assert_eq!(result.status, FitStatus::NoConvergence);
        assert_eq!(result.n_iterations, 5);
        assert_eq!(result.values_after("a"), [1.0]);
    }

    #[test]
    fn unphysical_iterate_fails_the_fit() {
        let mut fitter: KinematicFitter<Toy> = KinematicFitter::new("domain");
        fitter.link_variable("a", 1).unwrap();
        fitter
            .add_constraint(Toy::NonNegativeTarget(-5.0), &["a"])
            .unwrap();
        let mut inputs = FitInputs::new();
        inputs.set_measured("a", &[1.0], &[1.0]);
        let result = fitter.do_fit(&inputs).unwrap();
        assert!(matches!(result.status, FitStatus::DomainError(_)));
        assert!(!result.is_success());
    }

    #[test]
    fn overshooting_step_is_halved() {
        // Undamped Newton iterations of atan(u) = 0 diverge for |u| above 1.39
        let mut fitter: KinematicFitter<Toy> = KinematicFitter::new("arctan");
        fitter.link_variable("a", 1).unwrap();
        fitter.add_unmeasured_variable("u").unwrap();
        fitter.add_constraint(Toy::Arctan, &["a", "u"]).unwrap();
        let mut inputs = FitInputs::new();
        inputs.set_measured("a", &[1.0], &[1e-3]);
        inputs.set_unmeasured("u", 3.0);
        let result = fitter.do_fit(&inputs).unwrap();

        assert!(result.is_success(), "{result}");
        assert!(result.n_iterations < 10);
        assert_abs_diff_eq!(result.values_after("u")[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.values_after("a")[0], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn wrong_residual_count_fails_the_fit() {
        let mut fitter: KinematicFitter<Toy> = KinematicFitter::new("two residuals");
        fitter.link_variable("a", 1).unwrap();
        fitter.add_constraint(Toy::TwoResiduals, &["a"]).unwrap();
        let mut inputs = FitInputs::new();
        inputs.set_measured("a", &[1.0], &[1.0]);
        let result = fitter.do_fit(&inputs).unwrap();
        assert_eq!(
            result.status,
            FitStatus::DomainError(KinematicError::WrongResidualCount {
                constraint: "Toy",
                expected: 1,
                actual: 2,
            })
        );
        assert_eq!(result.n_iterations, 0);
        assert_eq!(result.values_after("a"), [1.0]);
    }

    #[test]
    fn setup_errors() {
        let mut fitter = equal_fitter();
        assert_eq!(
            fitter.link_variable("a", 1),
            Err(FitSetupError::DuplicateVariable("a".to_owned()))
        );
        assert_eq!(
            fitter.link_variable("c", 0),
            Err(FitSetupError::EmptyVariable("c".to_owned()))
        );
        assert_eq!(
            fitter.add_constraint(Toy::Equal, &["a", "z"]),
            Err(FitSetupError::UnknownVariable("z".to_owned()))
        );
        assert_eq!(
            fitter.add_constraint(Toy::Equal, &[] as &[&str]),
            Err(FitSetupError::EmptyConstraint("Toy".to_owned()))
        );

        let mut inputs = FitInputs::new();
        inputs.set_measured("a", &[1.0], &[1.0]);
        assert_eq!(
            fitter.do_fit(&inputs),
            Err(FitSetupError::MissingValues("b".to_owned()))
        );
        inputs.set_measured("b", &[1.0, 2.0], &[1.0]);
        assert!(matches!(
            fitter.do_fit(&inputs),
            Err(FitSetupError::WrongDimension { .. })
        ));
        inputs.set_measured("b", &[1.0], &[-1.0]);
        assert_eq!(
            fitter.do_fit(&inputs),
            Err(FitSetupError::InvalidSigma("b".to_owned()))
        );

        let empty: KinematicFitter<Toy> = KinematicFitter::new("empty");
        assert_eq!(
            empty.do_fit(&FitInputs::new()),
            Err(FitSetupError::NoConstraints)
        );
    }
}
