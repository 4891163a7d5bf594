//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! This selects a Newton trust-region or L-BFGS solver from
//! [`MLEOptions::method`], wraps the model in an `ArgMinAdapter` (which
//! *minimizes* `-ℓ(θ)`), and delegates the run to `run_solver`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{
            build_optimizer_hager_zhang, build_optimizer_more_thuente, build_trust_region_cauchy,
            build_trust_region_steihaug,
        },
        observer::ProgressObserver,
        run::run_solver,
        traits::{LineSearcher, LogLikelihood, MLEOptions, Method, Subproblem},
        types::Hessian,
    },
};

/// maximize — maximize a log-likelihood `ℓ(θ)` with the configured method.
///
/// Purpose
/// -------
/// Validate the starting point, build the solver selected by
/// `opts.method`, and run it on `c(θ) = -ℓ(θ)`.
///
/// Parameters
/// ----------
/// - `f`: `&F`
///   The model. Missing gradients and Hessians are finite-differenced.
/// - `theta0`: `Theta`
///   Starting point; checked with `f.check(&theta0, data)`.
/// - `data`: `&F::Data`
///   Passed through to every evaluation.
/// - `opts`: `&MLEOptions`
///   Method, tolerances, L-BFGS memory, and trust-region radii.
///   `NewtonTrustRegion(..)` uses Hessians; `Lbfgs(..)` uses gradients only.
/// - `progress`: `Option<ProgressObserver>`
///   Receives every iteration when supplied.
///
/// Returns
/// -------
/// `OptResult<OptimOutcome>`
///   - `Ok(outcome)` whether or not the run converged; see
///     `outcome.converged`.
///
/// Errors
/// ------
/// - Any error from `f.check`.
/// - Builder errors and runtime errors from the solver.
///
/// Panics
/// ------
/// - Never panics unless `f` does.
///
/// Examples
/// --------
/// ```no_run
/// use ndarray::array;
/// use rust_choice::optimization::errors::OptResult;
/// use rust_choice::optimization::loglik_optimizer::{LogLikelihood, MLEOptions, Theta, maximize};
///
/// struct Concave;
/// impl LogLikelihood for Concave {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Concave, array![1.0, -2.0], &(), &MLEOptions::default(), None)?;
/// assert!(out.converged);
/// # Ok::<(), rust_choice::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions, progress: Option<ProgressObserver>,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.method {
        Method::NewtonTrustRegion(Subproblem::Steihaug) => {
            let solver = build_trust_region_steihaug(opts)?;
            run_solver::<F, _, Hessian>(theta0, opts, problem, solver, progress)
        }
        Method::NewtonTrustRegion(Subproblem::CauchyPoint) => {
            let solver = build_trust_region_cauchy(opts)?;
            run_solver::<F, _, Hessian>(theta0, opts, problem, solver, progress)
        }
        Method::Lbfgs(LineSearcher::MoreThuente) => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_solver::<F, _, ()>(theta0, opts, problem, solver, progress)
        }
        Method::Lbfgs(LineSearcher::HagerZhang) => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_solver::<F, _, ()>(theta0, opts, problem, solver, progress)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{
            observer::IterationSink,
            traits::Tolerances,
            types::{Grad, Hessian},
        },
    };
    use ndarray::array;
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    // ℓ(θ) = −(θ₀ − 1)² − 2(θ₁ + 0.5)², maximized at (1, −0.5) with ℓ = 0.
    struct Bowl;

    impl LogLikelihood for Bowl {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<f64> {
            Ok(-(theta[0] - 1.0).powi(2) - 2.0 * (theta[1] + 0.5).powi(2))
        }

        fn check(&self, theta: &Theta, _data: &()) -> OptResult<()> {
            if theta.len() != 2 {
                return Err(OptError::ThetaLengthMismatch { expected: 2, actual: theta.len() });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, _data: &()) -> OptResult<Grad> {
            Ok(array![-2.0 * (theta[0] - 1.0), -4.0 * (theta[1] + 0.5)])
        }

        fn hessian(&self, _theta: &Theta, _data: &()) -> OptResult<Hessian> {
            Ok(array![[-2.0, 0.0], [0.0, -4.0]])
        }
    }

    // ℓ(θ) = −10⁴·(exp(θ − 1) − θ), maximized at θ = 1 with ℓ = 0. The
    // gradient at θ = 0 is about 6300, the scale of a summed log-likelihood.
    struct SteepValley;

    impl LogLikelihood for SteepValley {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<f64> {
            Ok(-1e4 * ((theta[0] - 1.0).exp() - theta[0]))
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _data: &()) -> OptResult<Grad> {
            Ok(array![-1e4 * ((theta[0] - 1.0).exp() - 1.0)])
        }
    }

    struct Counter(AtomicU64);

    impl IterationSink for Counter {
        fn on_iteration(&self, _iteration: u64, _ll: f64, _best: f64) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn assert_at_optimum(theta: &Theta) {
        assert!((theta[0] - 1.0).abs() < 1e-5, "theta[0] = {}", theta[0]);
        assert!((theta[1] + 0.5).abs() < 1e-5, "theta[1] = {}", theta[1]);
    }

    #[test]
    // Purpose
    // -------
    // Every method finds the maximum of a concave quadratic.
    //
    // Given
    // -----
    // - The `Bowl` log-likelihood started at (0, 0).
    //
    // Expect
    // ------
    // - θ̂ ≈ (1, −0.5), ℓ(θ̂) ≈ 0 and `converged == true` for all methods.
    fn maximize_all_methods_reach_quadratic_optimum() {
        for method in [
            Method::NewtonTrustRegion(Subproblem::Steihaug),
            Method::NewtonTrustRegion(Subproblem::CauchyPoint),
            Method::Lbfgs(LineSearcher::MoreThuente),
            Method::Lbfgs(LineSearcher::HagerZhang),
        ] {
            // Arrange
            let tols = Tolerances::new(Some(1e-8), None, Some(500)).expect("valid tolerances");
            let opts = MLEOptions::new(tols, method, None).expect("valid options");

            // Act
            let out = maximize(&Bowl, array![0.0, 0.0], &(), &opts, None)
                .unwrap_or_else(|e| panic!("{method:?} failed: {e}"));

            // Assert
            assert!(out.converged, "{method:?} did not converge: {}", out.status);
            assert_at_optimum(&out.theta_hat);
            assert!(out.value.abs() < 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // L-BFGS survives a first steepest-descent direction thousands of units
    // long, under both line searches.
    //
    // Given
    // -----
    // - `SteepValley` started at θ = 0 with default radii.
    //
    // Expect
    // ------
    // - Converged runs with θ̂ ≈ 1 for both line searches.
    fn lbfgs_handles_large_initial_gradient() {
        for searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let tols = Tolerances::new(Some(1e-4), None, Some(200)).expect("valid tolerances");
            let opts = MLEOptions::new(tols, Method::Lbfgs(searcher), None).expect("valid options");

            // Act
            let out = maximize(&SteepValley, array![0.0], &(), &opts, None)
                .unwrap_or_else(|e| panic!("{searcher:?} failed: {e}"));

            // Assert
            assert!(out.converged, "{searcher:?} did not converge: {}", out.status);
            assert!((out.theta_hat[0] - 1.0).abs() < 1e-6, "θ̂ = {}", out.theta_hat[0]);
        }
    }

    #[test]
    // Purpose
    // -------
    // `check` runs before the solver and its error is returned unchanged.
    //
    // Given
    // -----
    // - A length-3 starting vector for a 2-parameter model.
    //
    // Expect
    // ------
    // - `ThetaLengthMismatch`.
    fn maximize_rejects_invalid_start_via_check() {
        // Act
        let err = maximize(&Bowl, array![0.0, 0.0, 0.0], &(), &MLEOptions::default(), None)
            .expect_err("check should fail");

        // Assert
        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 2, actual: 3 });
    }

    #[test]
    // Purpose
    // -------
    // A progress observer sees every iteration.
    //
    // Given
    // -----
    // - Trust-region run with an attached counting sink.
    //
    // Expect
    // ------
    // - The counter matches the reported iteration count.
    fn maximize_forwards_iterations_to_progress_sink() {
        // Arrange
        let counter = Arc::new(Counter(AtomicU64::new(0)));
        let tols = Tolerances::new(Some(1e-8), None, Some(20)).expect("valid tolerances");
        let opts = MLEOptions::new(tols, Method::default(), None).expect("valid options");
        let observer = ProgressObserver::new(counter.clone());

        // Act
        let out = maximize(&Bowl, array![3.0, 3.0], &(), &opts, Some(observer))
            .expect("optimization succeeds");

        // Assert
        assert_eq!(counter.0.load(Ordering::Relaxed), out.iterations as u64);
    }
}
