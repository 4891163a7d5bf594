//! loglik_optimizer::stopping — gradient-norm stopping rule for any solver.
//!
//! Argmin's trust-region solver has no convergence test of its own and runs
//! until the iteration cap. [`GradientStop`] wraps a solver, takes the
//! gradient at the current parameter after every iteration (the one the
//! solver stored in its state, evaluating it only when absent), and
//! terminates with `SolverConverged` once [`gradient_converged`] holds.
//! Without a `tol_grad` it defers entirely to the wrapped solver.
//!
//! The test is scaled by the objective, `‖∇c(θ)‖₂ ≤ tol_grad · max(1, |c(θ)|)`,
//! so summed log-likelihoods over many records are held to the same
//! relative precision as small ones. For `|c| ≤ 1` it is the plain
//! absolute test.
use crate::optimization::loglik_optimizer::types::{Cost, Grad, Theta};
use argmin::core::{
    Error, Gradient, IterState, KV, Problem, Solver, State, TerminationReason, TerminationStatus,
};
use argmin_math::ArgminL2Norm;

/// Scaled gradient-norm convergence test shared by the solver wrapper and
/// [`OptimOutcome::new`](super::traits::OptimOutcome::new).
pub fn gradient_converged(grad_norm: f64, cost: f64, tol_grad: f64) -> bool {
    grad_norm <= tol_grad * cost.abs().max(1.0)
}

/// Solver wrapper adding a gradient-norm convergence test.
#[derive(Debug, Clone)]
pub struct GradientStop<S> {
    inner: S,
    tol_grad: Option<f64>,
    converged: bool,
}

impl<S> GradientStop<S> {
    pub fn new(inner: S, tol_grad: Option<f64>) -> Self {
        GradientStop { inner, tol_grad, converged: false }
    }
}

impl<O, S, H> Solver<O, IterState<Theta, Grad, (), H, (), Cost>> for GradientStop<S>
where
    O: Gradient<Param = Theta, Gradient = Grad>,
    S: Solver<O, IterState<Theta, Grad, (), H, (), Cost>>,
    IterState<Theta, Grad, (), H, (), Cost>: State<Param = Theta, Float = Cost>,
{
    const NAME: &'static str = S::NAME;

    fn init(
        &mut self, problem: &mut Problem<O>, state: IterState<Theta, Grad, (), H, (), Cost>,
    ) -> Result<(IterState<Theta, Grad, (), H, (), Cost>, Option<KV>), Error> {
        self.inner.init(problem, state)
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: IterState<Theta, Grad, (), H, (), Cost>,
    ) -> Result<(IterState<Theta, Grad, (), H, (), Cost>, Option<KV>), Error> {
        let (state, kv) = self.inner.next_iter(problem, state)?;
        if let Some(tol) = self.tol_grad {
            let norm = match (state.get_gradient(), state.get_param()) {
                (Some(grad), _) => Some(grad.l2_norm()),
                (None, Some(param)) => Some(problem.gradient(param)?.l2_norm()),
                (None, None) => None,
            };
            if let Some(norm) = norm {
                self.converged = gradient_converged(norm, state.get_cost(), tol);
            }
        }
        Ok((state, kv))
    }

    fn terminate(&mut self, state: &IterState<Theta, Grad, (), H, (), Cost>) -> TerminationStatus {
        if self.converged {
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        } else {
            self.inner.terminate(state)
        }
    }
}
