//! Per-iteration progress hook for the optimizer.
//!
//! [`ProgressObserver`] implements Argmin's `Observe` for any solver state
//! and forwards each iteration to an [`IterationSink`], translated back from
//! cost to log-likelihood.
use argmin::core::{Error, KV, State, observers::Observe};
use std::sync::Arc;

/// Receiver of per-iteration optimizer progress.
pub trait IterationSink: Send + Sync {
    /// Called after every iteration with the current and best ℓ(θ).
    fn on_iteration(&self, iteration: u64, log_likelihood: f64, best_log_likelihood: f64);
}

/// Argmin observer forwarding iterations to an [`IterationSink`].
#[derive(Clone)]
pub struct ProgressObserver {
    sink: Arc<dyn IterationSink>,
}

impl ProgressObserver {
    pub fn new(sink: Arc<dyn IterationSink>) -> Self {
        Self { sink }
    }
}

impl std::fmt::Debug for ProgressObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressObserver").finish_non_exhaustive()
    }
}

impl<I> Observe<I> for ProgressObserver
where
    I: State<Float = f64>,
{
    fn observe_iter(&mut self, state: &I, _kv: &KV) -> Result<(), Error> {
        self.sink.on_iteration(state.get_iter(), -state.get_cost(), -state.get_best_cost());
        Ok(())
    }
}
