//! Estimation progress events and the reporters that receive them.
//!
//! Purpose
//! -------
//! Route diagnostics through an injectable [`Reporter`] instead of printing.
//! The estimator emits [`EstimationEvent`]s; a [`ReportFilter`] drops the
//! ones above the configured [`Verbosity`] before they reach the reporter.
//!
//! Key behaviors
//! -------------
//! - [`TracingReporter`] (default) forwards events to the `tracing` facade:
//!   `info!` for lifecycle events, `debug!` for iterations, `warn!` for
//!   unavailable standard errors. Installing a subscriber is up to the
//!   caller.
//! - [`SilentReporter`] discards everything.
//! - [`CollectingReporter`] stores events in memory.
//! - [`ReportFilter`] also implements [`IterationSink`], so it can be handed
//!   to the optimizer as a per-iteration observer.
use crate::{
    choice::core::options::Verbosity,
    optimization::loglik_optimizer::{IterationSink, Method},
};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// One diagnostic event emitted during estimation.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimationEvent {
    Started {
        n_observations: usize,
        n_alternatives: usize,
        n_free: usize,
        n_fixed: usize,
        method: Method,
        initial_log_likelihood: f64,
    },
    Iteration {
        iteration: u64,
        log_likelihood: f64,
        best_log_likelihood: f64,
    },
    Converged {
        iterations: usize,
        log_likelihood: f64,
        gradient_norm: Option<f64>,
        status: String,
    },
    /// The information matrix is singular; covariance is reported as NaN.
    StandardErrorsUnavailable {
        min_eigenvalue: f64,
        max_eigenvalue: f64,
    },
    Finished {
        initial_log_likelihood: f64,
        final_log_likelihood: f64,
        iterations: usize,
    },
}

impl EstimationEvent {
    /// Lowest verbosity at which this event is delivered.
    pub fn level(&self) -> Verbosity {
        match self {
            EstimationEvent::Iteration { .. } => Verbosity::Trace,
            _ => Verbosity::Summary,
        }
    }
}

/// Receiver of estimation events.
pub trait Reporter: Send + Sync {
    fn report(&self, event: &EstimationEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &EstimationEvent) {
        match event {
            EstimationEvent::Started {
                n_observations,
                n_alternatives,
                n_free,
                n_fixed,
                method,
                initial_log_likelihood,
            } => info!(
                n_observations,
                n_alternatives,
                n_free,
                n_fixed,
                method = ?method,
                initial_log_likelihood,
                "starting MNL estimation"
            ),
            EstimationEvent::Iteration { iteration, log_likelihood, best_log_likelihood } => {
                debug!(iteration, log_likelihood, best_log_likelihood, "optimizer iteration")
            }
            EstimationEvent::Converged { iterations, log_likelihood, gradient_norm, status } => {
                info!(
                    iterations,
                    log_likelihood,
                    gradient_norm = ?gradient_norm,
                    status = %status,
                    "optimizer converged"
                )
            }
            EstimationEvent::StandardErrorsUnavailable { min_eigenvalue, max_eigenvalue } => warn!(
                min_eigenvalue,
                max_eigenvalue,
                "information matrix is singular; standard errors are unavailable"
            ),
            EstimationEvent::Finished { initial_log_likelihood, final_log_likelihood, iterations } => {
                info!(
                    initial_log_likelihood,
                    final_log_likelihood,
                    iterations,
                    "MNL estimation finished"
                )
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _event: &EstimationEvent) {}
}

/// Stores every event it receives.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<EstimationEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<EstimationEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, event: &EstimationEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

/// A reporter gated by a verbosity level.
#[derive(Clone)]
pub struct ReportFilter {
    reporter: Arc<dyn Reporter>,
    verbosity: Verbosity,
}

impl ReportFilter {
    pub fn new(reporter: Arc<dyn Reporter>, verbosity: Verbosity) -> Self {
        ReportFilter { reporter, verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Deliver `event` if the configured verbosity admits it.
    pub fn emit(&self, event: EstimationEvent) {
        if self.verbosity != Verbosity::Silent && event.level() <= self.verbosity {
            self.reporter.report(&event);
        }
    }
}

impl std::fmt::Debug for ReportFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportFilter").field("verbosity", &self.verbosity).finish_non_exhaustive()
    }
}

impl IterationSink for ReportFilter {
    fn on_iteration(&self, iteration: u64, log_likelihood: f64, best_log_likelihood: f64) {
        self.emit(EstimationEvent::Iteration { iteration, log_likelihood, best_log_likelihood });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> [EstimationEvent; 3] {
        [
            EstimationEvent::Iteration { iteration: 1, log_likelihood: -5.0, best_log_likelihood: -5.0 },
            EstimationEvent::StandardErrorsUnavailable { min_eigenvalue: 0.0, max_eigenvalue: 1.0 },
            EstimationEvent::Finished {
                initial_log_likelihood: -7.0,
                final_log_likelihood: -5.0,
                iterations: 1,
            },
        ]
    }

    #[test]
    // Purpose
    // -------
    // The filter admits events by verbosity level.
    //
    // Given
    // -----
    // - One iteration event and two summary events, sent through filters at
    //   each verbosity.
    //
    // Expect
    // ------
    // - Silent: 0 events; Summary: 2 (no iteration); Trace: all 3.
    fn filter_gates_events_by_verbosity() {
        for (verbosity, expected) in
            [(Verbosity::Silent, 0), (Verbosity::Summary, 2), (Verbosity::Trace, 3)]
        {
            // Arrange
            let sink = Arc::new(CollectingReporter::new());
            let filter = ReportFilter::new(sink.clone(), verbosity);

            // Act
            for event in sample_events() {
                filter.emit(event);
            }

            // Assert
            let events = sink.events();
            assert_eq!(events.len(), expected, "verbosity {verbosity:?}");
            if verbosity == Verbosity::Summary {
                assert!(events.iter().all(|e| e.level() == Verbosity::Summary));
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Optimizer iterations arrive as `Iteration` events through the sink.
    //
    // Given
    // -----
    // - A `Trace` filter used as an `IterationSink`.
    //
    // Expect
    // ------
    // - One `Iteration` event with the forwarded values.
    fn filter_forwards_optimizer_iterations() {
        // Arrange
        let sink = Arc::new(CollectingReporter::new());
        let filter = ReportFilter::new(sink.clone(), Verbosity::Trace);

        // Act
        filter.on_iteration(4, -10.0, -9.5);

        // Assert
        assert_eq!(
            sink.events(),
            vec![EstimationEvent::Iteration {
                iteration: 4,
                log_likelihood: -10.0,
                best_log_likelihood: -9.5,
            }]
        );
    }

    #[test]
    // Purpose
    // -------
    // The tracing reporter accepts every event without a subscriber.
    //
    // Given
    // -----
    // - No installed subscriber.
    //
    // Expect
    // ------
    // - No panic.
    fn tracing_reporter_handles_all_events() {
        for event in sample_events() {
            TracingReporter.report(&event);
        }
    }
}
