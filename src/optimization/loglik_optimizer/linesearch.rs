//! loglik_optimizer::linesearch — step-length bounds for L-BFGS line searches.
//!
//! Purpose
//! -------
//! Keep the first trial point of every line search a bounded distance from
//! the current iterate. L-BFGS starts from the raw steepest-descent
//! direction `d = -∇c(θ)`, whose length for a log-likelihood grows with the
//! sample size; argmin's line searches try a unit step (More–Thuente) or a
//! bracket reaching `10⁵·d` (Hager–Zhang), so the trial points overflow the
//! cost long before the search can shrink them.
//!
//! Key behaviors
//! -------------
//! - [`BoundedLineSearch`] wraps an argmin line search and, each time a new
//!   direction arrives, rescales its step interval by `1/‖d‖`: the initial
//!   step moves `θ` by at most `first_step`, and no trial moves it by more
//!   than `max_step`.
//! - A direction whose length is already below `first_step` keeps the unit
//!   initial step, so quasi-Newton steps are tried in full.
//! - [`StepBounds`] is the seam each concrete line search implements to
//!   receive the rescaled interval.
//!
//! Conventions
//! -----------
//! - `first_step` and `max_step` are the trust-region radii of
//!   [`MLEOptions`](crate::optimization::loglik_optimizer::MLEOptions), so
//!   both solver families share one notion of a reasonable move in `θ`.
use crate::optimization::loglik_optimizer::types::{
    Cost, HagerZhangLS, LineSearchState, MoreThuenteLS, Theta,
};
use argmin::{
    core::{Error, KV, Problem, Solver, TerminationStatus},
    solver::linesearch::LineSearch,
};

/// Line searches whose step interval can be reset between directions.
pub trait StepBounds: Sized {
    /// Return `self` with initial step `initial` and largest step `step_max`,
    /// both in units of the search direction.
    ///
    /// # Errors
    /// Whatever the line search reports for an invalid interval.
    fn bounded(self, initial: Cost, step_max: Cost) -> Result<Self, Error>;
}

impl StepBounds for MoreThuenteLS {
    fn bounded(self, initial: Cost, step_max: Cost) -> Result<Self, Error> {
        let mut search = self.with_bounds(f64::EPSILON.sqrt().min(0.5 * initial), step_max)?;
        search.initial_step_length(initial)?;
        Ok(search)
    }
}

impl StepBounds for HagerZhangLS {
    fn bounded(self, initial: Cost, step_max: Cost) -> Result<Self, Error> {
        let mut search = self.with_bounds(f64::EPSILON.min(0.5 * initial), step_max)?;
        search.initial_step_length(initial)?;
        Ok(search)
    }
}

/// Line search whose steps are scaled to the length of the direction.
#[derive(Clone)]
pub struct BoundedLineSearch<L> {
    inner: L,
    first_step: f64,
    max_step: f64,
}

impl<L: StepBounds + Clone> BoundedLineSearch<L> {
    /// Wrap `inner`; `first_step` and `max_step` are distances in `θ`.
    pub fn new(inner: L, first_step: f64, max_step: f64) -> Self {
        BoundedLineSearch { inner, first_step, max_step }
    }

    fn rescaled(&self, norm: f64) -> Option<L> {
        if !(norm.is_finite() && norm > 0.0) {
            return None;
        }
        let initial = (self.first_step / norm).min(1.0);
        let step_max = (self.max_step / norm).max(initial);
        self.inner.clone().bounded(initial, step_max).ok()
    }
}

impl<L> LineSearch<Theta, Cost> for BoundedLineSearch<L>
where
    L: LineSearch<Theta, Cost> + StepBounds + Clone,
{
    fn search_direction(&mut self, direction: Theta) {
        // A zero or non-finite direction keeps the previous interval; the
        // inner search rejects it on its own.
        if let Some(inner) = self.rescaled(direction.dot(&direction).sqrt()) {
            self.inner = inner;
        }
        self.inner.search_direction(direction);
    }

    fn initial_step_length(&mut self, step_length: Cost) -> Result<(), Error> {
        self.inner.initial_step_length(step_length)
    }
}

impl<O, L> Solver<O, LineSearchState> for BoundedLineSearch<L>
where
    L: Solver<O, LineSearchState>,
{
    const NAME: &'static str = <L as Solver<O, LineSearchState>>::NAME;

    fn init(
        &mut self, problem: &mut Problem<O>, state: LineSearchState,
    ) -> Result<(LineSearchState, Option<KV>), Error> {
        self.inner.init(problem, state)
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: LineSearchState,
    ) -> Result<(LineSearchState, Option<KV>), Error> {
        self.inner.next_iter(problem, state)
    }

    fn terminate(&mut self, state: &LineSearchState) -> TerminationStatus {
        self.inner.terminate(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmin::core::{CostFunction, Executor, Gradient, State};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - A single line search along a very long steepest-descent direction,
    //   for both wrapped searches.
    //
    // They intentionally DO NOT cover:
    // - Full L-BFGS runs (see `api`).
    // -------------------------------------------------------------------------

    // c(θ) = 10⁴·(exp(θ − 1) − θ), minimized at θ = 1 with c = 0.
    struct SteepValley;

    impl CostFunction for SteepValley {
        type Param = Theta;
        type Output = Cost;

        fn cost(&self, theta: &Theta) -> Result<Cost, Error> {
            Ok(1e4 * ((theta[0] - 1.0).exp() - theta[0]))
        }
    }

    impl Gradient for SteepValley {
        type Param = Theta;
        type Gradient = Theta;

        fn gradient(&self, theta: &Theta) -> Result<Theta, Error> {
            Ok(array![1e4 * ((theta[0] - 1.0).exp() - 1.0)])
        }
    }

    fn search_from_origin<L>(inner: L) -> (f64, f64)
    where
        L: LineSearch<Theta, Cost> + StepBounds + Clone + Solver<SteepValley, LineSearchState>,
    {
        let start = array![0.0];
        let grad = SteepValley.gradient(&start).expect("gradient");
        let cost = SteepValley.cost(&start).expect("cost");
        let mut search = BoundedLineSearch::new(inner, 1.0, 100.0);
        search.search_direction(-grad.clone());
        let res = Executor::new(SteepValley, search)
            .configure(|config| config.param(start).gradient(grad).cost(cost).max_iters(50))
            .run()
            .expect("line search runs");
        let state = res.state();
        let theta = state.get_param().expect("final trial point")[0];
        (theta, state.get_cost())
    }

    #[test]
    // Purpose
    // -------
    // A direction of length ~6300 is searched without leaving the
    // region where the cost is finite.
    //
    // Given
    // -----
    // - `SteepValley` at θ = 0, where ∇c ≈ −6321, searched along −∇c with
    //   `first_step = 1` and `max_step = 100`.
    //
    // Expect
    // ------
    // - Both searches end at a finite θ with a cost well below c(0) = 10⁴.
    fn long_direction_is_searched_within_bounds() {
        for (name, (theta, cost)) in [
            ("more-thuente", search_from_origin(MoreThuenteLS::new())),
            ("hager-zhang", search_from_origin(HagerZhangLS::new())),
        ] {
            // Assert
            assert!(theta.is_finite() && theta > 0.0 && theta <= 100.0, "{name}: θ = {theta}");
            assert!(cost < 1e3, "{name}: c = {cost}");
        }
    }

    #[test]
    // Purpose
    // -------
    // The first trial step moves θ by exactly `first_step` when the
    // direction is longer than that.
    //
    // Given
    // -----
    // - Direction of length 6321 and `first_step = 1`.
    //
    // Expect
    // ------
    // - The More–Thuente search, which accepts its first trial when the
    //   Wolfe conditions hold, stops at θ = 1.
    fn first_trial_moves_by_first_step() {
        // Act
        let (theta, cost) = search_from_origin(MoreThuenteLS::new());

        // Assert
        assert!((theta - 1.0).abs() < 1e-9, "θ = {theta}");
        assert!(cost.abs() < 1e-6);
    }
}
