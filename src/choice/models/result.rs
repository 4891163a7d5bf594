//! Estimated discrete-choice model and its summary table.
//!
//! [`Model`] is the only long-lived artifact of an estimation. It owns the
//! coefficient names and values (free first, then fixed), the embedded
//! covariance matrix, the initial and final log-likelihoods, and optimizer
//! diagnostics. Derived statistics (standard errors, z statistics, p-values,
//! McFadden pseudo-R²) are computed on demand from those fields.
use crate::{
    choice::core::coefficients::CoefficientSet,
    optimization::loglik_optimizer::{FnEvalMap, OptimOutcome},
};
use ndarray::{Array1, Array2};
use statrs::function::erf::erfc;
use std::fmt;

/// Model — result of a multinomial logit estimation.
///
/// Purpose
/// -------
/// Package point estimates, their asymptotic covariance, and fit statistics
/// in an immutable value object.
///
/// Key behaviors
/// -------------
/// - Coefficients are laid out as `free ++ fixed`: free coefficients in
///   parameter-vector order with their estimated values, then fixed
///   coefficients with their input values unchanged.
/// - The covariance matrix is `(n_free + n_fixed)²`. Every cell touching a
///   fixed coefficient is `NaN`; the free block is `NaN` too when standard
///   errors were not requested or the information matrix was singular.
/// - Standard errors, z statistics, and two-sided normal p-values are
///   derived element-wise and propagate `NaN`.
///
/// Invariants
/// ----------
/// - `names.len() == values.len() == covariance.nrows() == covariance.ncols()`.
/// - `initial_log_likelihood` and `final_log_likelihood` are finite.
///
/// Notes
/// -----
/// - Constructed only by the estimator; there is no public constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    names: Vec<String>,
    values: Array1<f64>,
    n_free: usize,
    covariance: Array2<f64>,
    standard_errors_available: bool,
    initial_log_likelihood: f64,
    final_log_likelihood: f64,
    n_observations: usize,
    iterations: usize,
    fn_evals: FnEvalMap,
    status: String,
    gradient_norm: Option<f64>,
}

/// One row of the coefficient table.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientEstimate {
    pub name: String,
    pub value: f64,
    pub std_error: f64,
    pub z_stat: f64,
    pub p_value: f64,
    pub is_fixed: bool,
}

impl Model {
    /// Assemble a model from the optimizer outcome and the embedded
    /// covariance.
    pub(crate) fn assemble(
        coefficients: &CoefficientSet, outcome: &OptimOutcome, covariance: Array2<f64>,
        standard_errors_available: bool, initial_log_likelihood: f64, n_observations: usize,
    ) -> Model {
        let names = coefficients
            .free()
            .chain(coefficients.fixed())
            .map(|c| c.name.clone())
            .collect();
        let values = outcome
            .theta_hat
            .iter()
            .copied()
            .chain(coefficients.fixed().map(|c| c.value))
            .collect();
        Model {
            names,
            values,
            n_free: coefficients.n_free(),
            covariance,
            standard_errors_available,
            initial_log_likelihood,
            final_log_likelihood: outcome.value,
            n_observations,
            iterations: outcome.iterations,
            fn_evals: outcome.fn_evals.clone(),
            status: outcome.status.clone(),
            gradient_norm: outcome.grad_norm,
        }
    }

    /// Coefficient names, free first then fixed.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    pub fn n_free(&self) -> usize {
        self.n_free
    }

    pub fn n_fixed(&self) -> usize {
        self.names.len() - self.n_free
    }

    /// `false` when the free covariance block is `NaN`.
    pub fn standard_errors_available(&self) -> bool {
        self.standard_errors_available
    }

    /// `√diag(Σ)`.
    pub fn standard_errors(&self) -> Array1<f64> {
        self.covariance.diag().mapv(f64::sqrt)
    }

    /// `value / std_error`.
    pub fn z_stats(&self) -> Array1<f64> {
        &self.values / &self.standard_errors()
    }

    /// Two-sided normal p-values `erfc(|z| / √2)`.
    pub fn p_values(&self) -> Array1<f64> {
        self.z_stats().mapv(two_sided_p_value)
    }

    pub fn initial_log_likelihood(&self) -> f64 {
        self.initial_log_likelihood
    }

    pub fn final_log_likelihood(&self) -> f64 {
        self.final_log_likelihood
    }

    /// McFadden pseudo-R² `1 − ℓ(θ̂)/ℓ(θ₀)`, measured against the starting
    /// values.
    pub fn mcfadden_r2(&self) -> f64 {
        1.0 - self.final_log_likelihood / self.initial_log_likelihood
    }

    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Evaluation counters reported by the optimizer backend
    /// (`cost_count`, `gradient_count`, `hessian_count`).
    pub fn fn_evals(&self) -> &FnEvalMap {
        &self.fn_evals
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// `‖∇ℓ(θ̂)‖₂` at the returned estimate.
    pub fn gradient_norm(&self) -> Option<f64> {
        self.gradient_norm
    }

    /// Table row for the coefficient called `name`.
    pub fn coefficient(&self, name: &str) -> Option<CoefficientEstimate> {
        let index = self.names.iter().position(|n| n == name)?;
        Some(self.estimate_at(index))
    }

    /// All table rows in `names()` order.
    pub fn estimates(&self) -> Vec<CoefficientEstimate> {
        (0..self.names.len()).map(|i| self.estimate_at(i)).collect()
    }

    /// Printable summary; see [`ModelSummary`].
    pub fn summary(&self) -> ModelSummary<'_> {
        ModelSummary { model: self }
    }

    fn estimate_at(&self, index: usize) -> CoefficientEstimate {
        let value = self.values[index];
        let std_error = self.covariance[[index, index]].sqrt();
        let z_stat = value / std_error;
        CoefficientEstimate {
            name: self.names[index].clone(),
            value,
            std_error,
            z_stat,
            p_value: two_sided_p_value(z_stat),
            is_fixed: index >= self.n_free,
        }
    }
}

fn two_sided_p_value(z: f64) -> f64 {
    if z.is_nan() { f64::NAN } else { erfc(z.abs() / std::f64::consts::SQRT_2) }
}

/// Text summary: fit statistics followed by the coefficient table.
#[derive(Debug, Clone, Copy)]
pub struct ModelSummary<'a> {
    model: &'a Model,
}

impl fmt::Display for ModelSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.model;
        writeln!(f, "Multinomial logit estimation")?;
        writeln!(f, "{:<26}{}", "Observations:", m.n_observations)?;
        writeln!(f, "{:<26}{} / {}", "Free / fixed:", m.n_free, m.n_fixed())?;
        writeln!(f, "{:<26}{}", "Iterations:", m.iterations)?;
        writeln!(f, "{:<26}{:.4}", "Initial log-likelihood:", m.initial_log_likelihood)?;
        writeln!(f, "{:<26}{:.4}", "Final log-likelihood:", m.final_log_likelihood)?;
        writeln!(f, "{:<26}{:.4}", "McFadden R²:", m.mcfadden_r2())?;
        writeln!(f, "{:<26}{}", "Status:", m.status)?;
        if !m.standard_errors_available {
            writeln!(f, "Standard errors unavailable.")?;
        }
        writeln!(f)?;
        let width = m.names.iter().map(|n| n.len()).max().unwrap_or(0).max(11);
        writeln!(
            f,
            "{:<width$}  {:>12}  {:>12}  {:>9}  {:>8}",
            "Coefficient", "Estimate", "Std. error", "z", "p-value"
        )?;
        for row in m.estimates() {
            let name = if row.is_fixed { format!("{} (fixed)", row.name) } else { row.name };
            writeln!(
                f,
                "{:<width$}  {:>12.6}  {:>12.6}  {:>9.3}  {:>8.4}",
                name, row.value, row.std_error, row.z_stat, row.p_value
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{choice::core::coefficients::Coefficient, inference::embed_covariance};
    use argmin::core::{TerminationReason, TerminationStatus};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - free ++ fixed layout and fixed values passing through unchanged.
    // - Derived statistics (standard errors, z, p-values, McFadden R²).
    // - NaN propagation when the covariance is unavailable.
    // - The rendered summary.
    // -------------------------------------------------------------------------

    fn model(cov: Option<Array2<f64>>) -> Model {
        let coefs = CoefficientSet::new(vec![
            Coefficient::free("asc", 0.0),
            Coefficient::fixed("b_fix", 1.5),
            Coefficient::free("b_time", 0.0),
        ])
        .expect("valid coefficients");
        let outcome = OptimOutcome::new(
            Some(array![0.4, -2.0]),
            -80.0,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            6,
            FnEvalMap::new(),
            Some(1e-9),
            Some(1e-6),
        )
        .expect("valid outcome");
        let available = cov.is_some();
        let covariance = embed_covariance(cov.as_ref(), 2, 1);
        Model::assemble(&coefs, &outcome, covariance, available, -100.0, 90)
    }

    #[test]
    // Purpose
    // -------
    // Free estimates come first, fixed coefficients keep their input value.
    //
    // Given
    // -----
    // - Free `asc`, `b_time` and fixed `b_fix = 1.5`.
    //
    // Expect
    // ------
    // - names = [asc, b_time, b_fix]; values = [0.4, -2.0, 1.5].
    fn layout_is_free_then_fixed() {
        // Act
        let m = model(None);

        // Assert
        assert_eq!(m.names(), &["asc".to_string(), "b_time".into(), "b_fix".into()]);
        assert_eq!(m.values(), &array![0.4, -2.0, 1.5]);
        assert_eq!((m.n_free(), m.n_fixed()), (2, 1));
        assert_eq!(m.iterations(), 6);
        assert_eq!(m.n_observations(), 90);
    }

    #[test]
    // Purpose
    // -------
    // Standard errors, z, and p-values follow from the covariance diagonal.
    //
    // Given
    // -----
    // - Free covariance diag(0.04, 1.0).
    //
    // Expect
    // ------
    // - se = (0.2, 1.0, NaN); z = (2, −2, NaN); p(±2) ≈ 0.0455; the fixed
    //   coefficient's statistics are NaN.
    fn derived_statistics_follow_covariance() {
        // Arrange
        let m = model(Some(array![[0.04, 0.0], [0.0, 1.0]]));

        // Act
        let se = m.standard_errors();
        let z = m.z_stats();
        let p = m.p_values();

        // Assert
        assert!((se[0] - 0.2).abs() < 1e-12 && (se[1] - 1.0).abs() < 1e-12);
        assert!(se[2].is_nan() && z[2].is_nan() && p[2].is_nan());
        assert!((z[0] - 2.0).abs() < 1e-12 && (z[1] + 2.0).abs() < 1e-12);
        assert!((p[0] - 0.04550026389635842).abs() < 1e-10);
        assert!((p[0] - p[1]).abs() < 1e-15);
        assert!((m.mcfadden_r2() - 0.2).abs() < 1e-12);
        let fixed = m.coefficient("b_fix").expect("declared coefficient");
        assert!(fixed.is_fixed && fixed.std_error.is_nan());
        assert!(m.coefficient("missing").is_none());
    }

    #[test]
    // Purpose
    // -------
    // A missing free covariance block yields NaN statistics, not an error.
    //
    // Given
    // -----
    // - No covariance.
    //
    // Expect
    // ------
    // - `standard_errors_available` is false and every se is NaN.
    fn unavailable_covariance_is_all_nan() {
        // Act
        let m = model(None);

        // Assert
        assert!(!m.standard_errors_available());
        assert!(m.standard_errors().iter().all(|v| v.is_nan()));
        assert!(m.covariance().iter().all(|v| v.is_nan()));
    }

    #[test]
    // Purpose
    // -------
    // The summary lists fit statistics and one line per coefficient.
    //
    // Given
    // -----
    // - The model with an available covariance.
    //
    // Expect
    // ------
    // - The text mentions each coefficient, marks the fixed one, and shows
    //   McFadden R².
    fn summary_renders_table() {
        // Arrange
        let m = model(Some(array![[0.04, 0.0], [0.0, 1.0]]));

        // Act
        let text = m.summary().to_string();

        // Assert
        assert!(text.contains("McFadden R²:"));
        assert!(text.contains("b_time"));
        assert!(text.contains("b_fix (fixed)"));
        assert!(!text.contains("Standard errors unavailable."));
    }
}
