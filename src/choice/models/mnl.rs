//! Multinomial logit: per-record log-likelihood, aggregate objective, and
//! the estimation driver.
//!
//! Purpose
//! -------
//! Evaluate `ℓ(θ) = Σ_n log P_n(c_n | θ)` with
//! `P_n(c) = exp(u_c) / Σ_{i available} exp(u_i)`, supply its exact gradient
//! and Hessian through hyper-dual arithmetic, maximize it, and assemble a
//! [`Model`] with standard errors from the observed information.
//!
//! Key behaviors
//! -------------
//! - [`row_log_likelihood`] visits the alternatives once, is generic over
//!   [`Scalar`], and never allocates.
//! - [`MnlObjective`] closes over the resolved chosen positions and
//!   availability table, and implements [`LogLikelihood`]. Records are
//!   reduced in fixed chunks of [`CHUNK_ROWS`] in parallel; chunk partials
//!   are summed in chunk order, so results do not depend on thread count.
//! - [`estimate`] validates every input before the optimizer starts, treats
//!   non-convergence as fatal, and recovers from a singular information
//!   matrix with a `NaN` covariance and a warning event.
//!
//! Invariants & assumptions
//! ------------------------
//! - Each row contribution is `≤ 0`; with one alternative it is exactly 0.
//! - A chosen alternative that is unavailable contributes `-∞`; `estimate`
//!   rejects such inputs up front with [`ChoiceError::ChosenUnavailable`].
//! - Gradients take `p` seeded passes per chunk and Hessians `p(p + 1)/2`;
//!   the seed vector is allocated once per chunk.
use crate::{
    choice::{
        core::{
            coefficients::CoefficientSet,
            data::{ChoiceData, Row},
            options::{EstimationOptions, ExpStabilization, Verbosity},
            reporter::{EstimationEvent, ReportFilter, Reporter, TracingReporter},
            selection::{Availability, AvailabilityTable, ChoiceSelector},
            utility::UtilityFunctionSet,
        },
        errors::{ChoiceError, ChoiceResult},
        models::result::Model,
    },
    inference::hessian::{CovarianceEstimate, embed_covariance, invert_information},
    optimization::{
        autodiff::{HyperDual64, Scalar, seed},
        errors::{OptError, OptResult},
        loglik_optimizer::{
            Grad, Hessian, LogLikelihood, ProgressObserver, Theta, maximize,
            validation::validate_theta,
        },
    },
};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use std::{ops::Range, sync::Arc};

/// Records per parallel work unit.
pub const CHUNK_ROWS: usize = 2048;

/// row_log_likelihood — log-probability of the chosen alternative for one record.
///
/// Purpose
/// -------
/// Evaluate `log P_n(c) = u_c − log Σ_{i available} exp(u_i)` in one pass over
/// the alternatives, generically over [`Scalar`] so the same code gives
/// plain values and hyper-dual derivatives.
///
/// Parameters
/// ----------
/// - `utilities`: `&U`
///   Utility functions; `N = utilities.n_alternatives()`.
/// - `params`: `&[S]`
///   Free coefficients in coefficient-set order.
/// - `row`: `Row<'_>`
///   The record.
/// - `chosen`: `usize`
///   0-based chosen alternative, `< N`.
/// - `available`: `Option<&[bool]>`
///   One flag per alternative; `None` means every alternative is
///   available. Unavailable alternatives are not evaluated.
/// - `stabilization`: `ExpStabilization`
///   `Undamped` exponentiates utilities directly; `MaxShift` subtracts the
///   running maximum first.
///
/// Returns
/// -------
/// `S`
///   - A value `≤ 0`, exactly `0` with one available alternative.
///   - `-∞` (as a constant) when `chosen` is unavailable.
///
/// Panics
/// ------
/// - If `available` has fewer than `N` entries.
/// - If `utilities` panics for an alternative index `< N`.
///
/// Notes
/// -----
/// - Never allocates.
#[inline]
pub fn row_log_likelihood<S: Scalar, U: UtilityFunctionSet>(
    utilities: &U, params: &[S], row: Row<'_>, chosen: usize, available: Option<&[bool]>,
    stabilization: ExpStabilization,
) -> S {
    match stabilization {
        ExpStabilization::Undamped => undamped(utilities, params, row, chosen, available),
        ExpStabilization::MaxShift => max_shift(utilities, params, row, chosen, available),
    }
}

#[inline]
fn is_available(available: Option<&[bool]>, alt: usize) -> bool {
    available.is_none_or(|mask| mask[alt])
}

// ln exp(u_c) − ln Σ exp(u_i); the sum contains exp(u_c) plus non-negative
// terms, so the difference is ≤ 0, and exactly 0 with one alternative.
fn undamped<S: Scalar, U: UtilityFunctionSet>(
    utilities: &U, params: &[S], row: Row<'_>, chosen: usize, available: Option<&[bool]>,
) -> S {
    let mut total = S::constant(0.0);
    let mut numerator: Option<S> = None;
    for alt in 0..utilities.n_alternatives() {
        if !is_available(available, alt) {
            continue;
        }
        let e = utilities.utility(alt, params, row).exp();
        total += e;
        if alt == chosen {
            numerator = Some(e);
        }
    }
    match numerator {
        Some(e) => e.ln() - total.ln(),
        None => S::constant(f64::NEG_INFINITY),
    }
}

// Online log-sum-exp: `shift` tracks the running maximum and `total` the sum
// of exp(u_i − shift).
fn max_shift<S: Scalar, U: UtilityFunctionSet>(
    utilities: &U, params: &[S], row: Row<'_>, chosen: usize, available: Option<&[bool]>,
) -> S {
    let mut shift: Option<S> = None;
    let mut total = S::constant(0.0);
    let mut chosen_utility: Option<S> = None;
    for alt in 0..utilities.n_alternatives() {
        if !is_available(available, alt) {
            continue;
        }
        let u = utilities.utility(alt, params, row);
        match shift {
            None => {
                shift = Some(u);
                total = S::constant(1.0);
            }
            Some(m) if u.value() > m.value() => {
                total = total * (m - u).exp() + 1.0;
                shift = Some(u);
            }
            Some(m) => total += (u - m).exp(),
        }
        if alt == chosen {
            chosen_utility = Some(u);
        }
    }
    match (chosen_utility, shift) {
        (Some(u), Some(m)) => (u - m) - total.ln(),
        _ => S::constant(f64::NEG_INFINITY),
    }
}

/// Aggregate MNL log-likelihood over a [`ChoiceData`] table.
///
/// Built once per estimation; the chosen positions and availability are
/// resolved against the table at construction.
#[derive(Debug, Clone)]
pub struct MnlObjective<'a, U: UtilityFunctionSet> {
    utilities: &'a U,
    chosen: Vec<usize>,
    availability: Option<AvailabilityTable>,
    n_free: usize,
    stabilization: ExpStabilization,
}

impl<'a, U: UtilityFunctionSet> MnlObjective<'a, U> {
    /// Resolve the choice selector and availability against `data`.
    ///
    /// # Errors
    /// - [`ChoiceError::NoAlternatives`] for an empty utility set.
    /// - [`ChoiceError::ParameterCountMismatch`] when the utility set
    ///   declares a different number of free parameters.
    /// - [`ChoiceError::CoefficientBindingMismatch`] when the utility set was
    ///   built against a coefficient set that orders, fixes or declares its
    ///   coefficients differently.
    /// - [`ChoiceError::SchemaMismatch`] when a field the utility set uses
    ///   resolves differently in `data`.
    /// - Any resolution error from [`ChoiceSelector::resolve`] or
    ///   [`Availability::resolve`].
    /// - [`ChoiceError::ChosenUnavailable`] for the first offending row.
    pub fn new(
        utilities: &'a U, coefficients: &CoefficientSet, data: &ChoiceData,
        choice: &ChoiceSelector, availability: Option<&Availability>,
        stabilization: ExpStabilization,
    ) -> ChoiceResult<Self> {
        let n_alternatives = utilities.n_alternatives();
        if n_alternatives == 0 {
            return Err(ChoiceError::NoAlternatives);
        }
        let n_free = coefficients.n_free();
        match utilities.n_parameters() {
            Some(expected) if expected != n_free => {
                return Err(ChoiceError::ParameterCountMismatch { expected, found: n_free });
            }
            _ => {}
        }
        if let Some(name) = utilities.mismatched_coefficient(coefficients) {
            return Err(ChoiceError::CoefficientBindingMismatch { name });
        }
        if let Some(field) = utilities.mismatched_field(data) {
            return Err(ChoiceError::SchemaMismatch { field });
        }
        let chosen = choice.resolve(data, n_alternatives)?;
        let availability = match availability {
            Some(av) => {
                let table = av.resolve(data, n_alternatives)?;
                table.check_chosen(&chosen)?;
                Some(table)
            }
            None => None,
        };
        Ok(MnlObjective { utilities, chosen, availability, n_free, stabilization })
    }

    pub fn n_observations(&self) -> usize {
        self.chosen.len()
    }

    pub fn n_free(&self) -> usize {
        self.n_free
    }

    #[inline]
    fn row_value<S: Scalar>(&self, params: &[S], data: &ChoiceData, index: usize) -> S {
        row_log_likelihood(
            self.utilities,
            params,
            data.row_at(index),
            self.chosen[index],
            self.availability.as_ref().map(|table| table.row(index)),
            self.stabilization,
        )
    }

    fn chunk_value(&self, params: &[f64], data: &ChoiceData, rows: Range<usize>) -> f64 {
        rows.map(|i| self.row_value(params, data, i)).sum()
    }

    fn chunk_grad(&self, params: &[f64], data: &ChoiceData, rows: Range<usize>) -> Vec<f64> {
        let mut seeds: Vec<HyperDual64> =
            params.iter().map(|&v| HyperDual64::constant(v)).collect();
        let mut out = vec![0.0; params.len()];
        for j in 0..params.len() {
            seeds[j] = seed(params[j], true, false);
            out[j] = rows.clone().map(|i| self.row_value(&seeds, data, i).eps1).sum();
            seeds[j] = HyperDual64::constant(params[j]);
        }
        out
    }

    // Lower triangle, row-major `p × p`.
    fn chunk_hessian(&self, params: &[f64], data: &ChoiceData, rows: Range<usize>) -> Vec<f64> {
        let p = params.len();
        let mut seeds: Vec<HyperDual64> =
            params.iter().map(|&v| HyperDual64::constant(v)).collect();
        let mut out = vec![0.0; p * p];
        for j in 0..p {
            for k in 0..=j {
                seeds[j] = seed(params[j], true, j == k);
                if k != j {
                    seeds[k] = seed(params[k], false, true);
                }
                out[j * p + k] = rows.clone().map(|i| self.row_value(&seeds, data, i).eps1eps2).sum();
                seeds[j] = HyperDual64::constant(params[j]);
                seeds[k] = HyperDual64::constant(params[k]);
            }
        }
        out
    }
}

/// Evaluate `eval` over consecutive chunks of `n_rows` in parallel and
/// return the partials in chunk order.
fn chunk_partials<T, F>(n_rows: usize, eval: F) -> Vec<T>
where
    T: Send,
    F: Fn(Range<usize>) -> T + Sync + Send,
{
    let n_chunks = n_rows.div_ceil(CHUNK_ROWS);
    (0..n_chunks)
        .into_par_iter()
        .map(|c| {
            let start = c * CHUNK_ROWS;
            eval(start..(start + CHUNK_ROWS).min(n_rows))
        })
        .collect()
}

fn sum_partials(partials: Vec<Vec<f64>>, len: usize) -> Vec<f64> {
    partials.into_iter().fold(vec![0.0; len], |mut acc, part| {
        for (a, v) in acc.iter_mut().zip(part) {
            *a += v;
        }
        acc
    })
}

impl<U: UtilityFunctionSet> LogLikelihood for MnlObjective<'_, U> {
    type Data = ChoiceData;

    fn value(&self, theta: &Theta, data: &ChoiceData) -> OptResult<f64> {
        let params = theta.to_vec();
        let partials = chunk_partials(data.n_rows(), |rows| self.chunk_value(&params, data, rows));
        Ok(partials.into_iter().sum())
    }

    /// # Errors
    /// - [`OptError::ThetaLengthMismatch`] / [`OptError::InvalidThetaInput`].
    /// - [`OptError::DataLengthMismatch`] / [`OptError::DataSchemaMismatch`]
    ///   when `data` is not the table the objective was resolved against.
    fn check(&self, theta: &Theta, data: &ChoiceData) -> OptResult<()> {
        validate_theta(theta, self.n_free)?;
        if data.n_rows() != self.chosen.len() {
            return Err(OptError::DataLengthMismatch {
                expected: self.chosen.len(),
                found: data.n_rows(),
            });
        }
        if let Some(field) = self.utilities.mismatched_field(data) {
            return Err(OptError::DataSchemaMismatch { field });
        }
        Ok(())
    }

    fn grad(&self, theta: &Theta, data: &ChoiceData) -> OptResult<Grad> {
        let params = theta.to_vec();
        let partials = chunk_partials(data.n_rows(), |rows| self.chunk_grad(&params, data, rows));
        Ok(Array1::from(sum_partials(partials, params.len())))
    }

    fn hessian(&self, theta: &Theta, data: &ChoiceData) -> OptResult<Hessian> {
        let params = theta.to_vec();
        let p = params.len();
        let partials =
            chunk_partials(data.n_rows(), |rows| self.chunk_hessian(&params, data, rows));
        let lower = sum_partials(partials, p * p);
        let mut hessian = Array2::<f64>::zeros((p, p));
        for j in 0..p {
            for k in 0..=j {
                hessian[[j, k]] = lower[j * p + k];
                hessian[[k, j]] = lower[j * p + k];
            }
        }
        Ok(hessian)
    }
}

/// Estimate an MNL model, reporting progress through `tracing`.
///
/// Parameters
/// ----------
/// As [`estimate_with_reporter`], with a [`TracingReporter`] as the sink.
///
/// Errors
/// ------
/// - Every error of [`estimate_with_reporter`].
pub fn estimate<U: UtilityFunctionSet>(
    utilities: &U, coefficients: &CoefficientSet, data: &ChoiceData, choice: &ChoiceSelector,
    availability: Option<&Availability>, options: &EstimationOptions,
) -> ChoiceResult<Model> {
    estimate_with_reporter(
        utilities,
        coefficients,
        data,
        choice,
        availability,
        options,
        Arc::new(TracingReporter),
    )
}

/// estimate_with_reporter — maximum-likelihood MNL estimation.
///
/// Purpose
/// -------
/// Validate the inputs, maximize the log-likelihood, and assemble a
/// [`Model`] with standard errors from the observed information, sending
/// progress events to `reporter`.
///
/// Parameters
/// ----------
/// - `utilities`: `&U`
///   Utility functions, built against `coefficients` and `data`.
/// - `coefficients`: `&CoefficientSet`
///   Free coefficients with start values and fixed coefficients.
/// - `data`: `&ChoiceData`
///   Records; one observation per row.
/// - `choice`: `&ChoiceSelector`
///   Maps each record to its chosen alternative.
/// - `availability`: `Option<&Availability>`
///   Per-alternative availability; `None` means all available.
/// - `options`: `&EstimationOptions`
///   Optimizer settings, stabilization, verbosity, and whether to compute
///   standard errors.
/// - `reporter`: `Arc<dyn Reporter>`
///   Receives the events that pass `options.verbosity`.
///
/// Returns
/// -------
/// `ChoiceResult<Model>`
///   - `Ok(model)` after convergence. A singular information matrix emits
///     `StandardErrorsUnavailable` and leaves the covariance `NaN`.
///
/// Errors
/// ------
/// - Input validation errors from [`MnlObjective::new`], before any event.
/// - [`ChoiceError::Optimization`] wrapping [`OptError::NonFiniteCost`] when
///   `ℓ` at the starting values is not finite, or any optimizer failure.
/// - [`ChoiceError::NonConvergence`] when the convergence test fails
///   within the iteration budget.
/// - [`ChoiceError::Inference`] for a non-finite Hessian or one that is not
///   negative semi-definite at the estimate.
///
/// Panics
/// ------
/// - Never panics for a [`LinearUtilities`](crate::choice::core::utility::LinearUtilities)
///   set; a custom [`UtilityFunctionSet`] may panic from `utility`.
///
/// Notes
/// -----
/// - Events, in order: `Started`, one `Iteration` per optimizer iteration
///   at `Verbosity::Trace`, `Converged`, optionally
///   `StandardErrorsUnavailable`, then `Finished`.
pub fn estimate_with_reporter<U: UtilityFunctionSet>(
    utilities: &U, coefficients: &CoefficientSet, data: &ChoiceData, choice: &ChoiceSelector,
    availability: Option<&Availability>, options: &EstimationOptions, reporter: Arc<dyn Reporter>,
) -> ChoiceResult<Model> {
    let objective =
        MnlObjective::new(utilities, coefficients, data, choice, availability, options.stabilization)?;
    let filter = ReportFilter::new(reporter, options.verbosity);

    let theta0 = coefficients.start_values();
    let initial_log_likelihood = objective.value(&theta0, data)?;
    if !initial_log_likelihood.is_finite() {
        return Err(OptError::NonFiniteCost { value: -initial_log_likelihood }.into());
    }
    filter.emit(EstimationEvent::Started {
        n_observations: data.n_rows(),
        n_alternatives: utilities.n_alternatives(),
        n_free: coefficients.n_free(),
        n_fixed: coefficients.n_fixed(),
        method: options.method(),
        initial_log_likelihood,
    });

    let progress = (filter.verbosity() >= Verbosity::Trace)
        .then(|| ProgressObserver::new(Arc::new(filter.clone())));
    let outcome = maximize(&objective, theta0, data, &options.mle_opts, progress)?;
    if !outcome.converged {
        return Err(ChoiceError::NonConvergence {
            iterations: outcome.iterations,
            log_likelihood: outcome.value,
        });
    }
    filter.emit(EstimationEvent::Converged {
        iterations: outcome.iterations,
        log_likelihood: outcome.value,
        gradient_norm: outcome.grad_norm,
        status: outcome.status.clone(),
    });

    let free_covariance = if options.compute_standard_errors {
        let information = -objective.hessian(&outcome.theta_hat, data)?;
        match invert_information(&information)? {
            CovarianceEstimate::Available(cov) => Some(cov),
            CovarianceEstimate::Singular { min_eigenvalue, max_eigenvalue } => {
                filter.emit(EstimationEvent::StandardErrorsUnavailable {
                    min_eigenvalue,
                    max_eigenvalue,
                });
                None
            }
        }
    } else {
        None
    };
    let covariance =
        embed_covariance(free_covariance.as_ref(), coefficients.n_free(), coefficients.n_fixed());

    let model = Model::assemble(
        coefficients,
        &outcome,
        covariance,
        free_covariance.is_some(),
        initial_log_likelihood,
        data.n_rows(),
    );
    filter.emit(EstimationEvent::Finished {
        initial_log_likelihood,
        final_log_likelihood: model.final_log_likelihood(),
        iterations: model.iterations(),
    });
    Ok(model)
}
