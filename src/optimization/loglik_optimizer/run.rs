//! Execution helper that runs an `argmin` solver on a log-likelihood problem and
//! returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
        observer::ProgressObserver, stopping::GradientStop, types::Cost,
    },
};
use argmin::core::{Executor, Gradient, IterState, Solver, State, observers::ObserverMode};
use argmin_math::ArgminL2Norm;

/// Run an `argmin` optimization for a log-likelihood problem.
///
/// Shared runner for every solver family. `H` is the Hessian slot of the
/// solver state: `Hessian` for trust-region Newton, `()` for L-BFGS.
///
/// Steps:
/// - wrap `solver` in [`GradientStop`] so every method stops on
///   `‖∇c(θ)‖₂ ≤ tol_grad · max(1, |c(θ)|)`;
/// - seed the state with `theta0` and the optional iteration cap;
/// - attach `progress` with `ObserverMode::Always` when supplied;
/// - run, then evaluate the cost gradient at the best parameter so the
///   convergence test in [`OptimOutcome::new`] uses an exact norm even when
///   the solver stopped on its iteration cap.
///
/// # Errors
/// - Any `argmin` runtime error, mapped through `From<argmin::core::Error>`.
/// - Validation errors raised while building the [`OptimOutcome`].
pub fn run_solver<'a, F, S, H>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
    progress: Option<ProgressObserver>,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    H: 'static,
    IterState<Theta, Grad, (), H, (), Cost>: State<Param = Theta, Float = Cost>,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), H, (), Cost>>,
{
    let probe = problem.clone();
    let solver = GradientStop::new(solver, opts.tols.tol_grad);
    let mut optimizer = Executor::new(problem, solver).configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }
    if let Some(observer) = progress {
        optimizer = optimizer.add_observer(observer, ObserverMode::Always);
    }

    let result = optimizer.run()?;
    let state = result.state();
    let theta_hat = state.get_best_param().cloned();
    let grad_norm = match &theta_hat {
        Some(theta) => probe.gradient(theta).ok().map(|g| g.l2_norm()),
        None => None,
    };
    OptimOutcome::new(
        theta_hat,
        -state.get_best_cost(),
        state.get_termination_status().clone(),
        state.get_iter(),
        state.get_func_counts().clone(),
        grad_norm,
        opts.tols.tol_grad,
    )
}
