//! Estimation options for discrete-choice models.
//!
//! [`EstimationOptions`] bundles the optimizer configuration
//! ([`MLEOptions`]: method, tolerances, trust-region radii, L-BFGS memory)
//! with model-level switches: whether to compute standard errors, how much
//! progress to report, and how utilities are exponentiated.
use crate::{
    choice::errors::ChoiceError,
    optimization::loglik_optimizer::{MLEOptions, Method},
};
use std::str::FromStr;

/// How much progress the estimator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No events.
    Silent,
    /// Start, convergence, warnings, and finish.
    #[default]
    Summary,
    /// Everything in `Summary` plus one event per optimizer iteration.
    Trace,
}

impl FromStr for Verbosity {
    type Err = ChoiceError;

    /// Parse `"silent"`, `"summary"` or `"trace"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "silent" | "quiet" => Ok(Verbosity::Silent),
            "summary" => Ok(Verbosity::Summary),
            "trace" | "verbose" => Ok(Verbosity::Trace),
            _ => Err(ChoiceError::InvalidOption {
                option: "verbosity",
                value: s.to_string(),
                reason: "Valid options are 'silent', 'summary' or 'trace'.",
            }),
        }
    }
}

/// Exponentiation policy inside the logit probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpStabilization {
    /// `exp(u_i)` as-is; overflow surfaces as a non-finite cost error.
    #[default]
    Undamped,
    /// `exp(u_i − max_j u_j)` over available alternatives.
    MaxShift,
}

impl FromStr for ExpStabilization {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String =
            s.chars().filter(|c| *c != '-' && *c != '_').collect::<String>().to_lowercase();
        match key.as_str() {
            "undamped" | "none" => Ok(ExpStabilization::Undamped),
            "maxshift" | "logsumexp" => Ok(ExpStabilization::MaxShift),
            _ => Err(ChoiceError::InvalidOption {
                option: "exponent stabilization",
                value: s.to_string(),
                reason: "Valid options are 'undamped' or 'max_shift'.",
            }),
        }
    }
}

/// Model-level estimation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationOptions {
    pub mle_opts: MLEOptions,
    pub compute_standard_errors: bool,
    pub verbosity: Verbosity,
    pub stabilization: ExpStabilization,
}

impl EstimationOptions {
    pub fn new(
        mle_opts: MLEOptions, compute_standard_errors: bool, verbosity: Verbosity,
        stabilization: ExpStabilization,
    ) -> EstimationOptions {
        EstimationOptions { mle_opts, compute_standard_errors, verbosity, stabilization }
    }

    pub fn method(&self) -> Method {
        self.mle_opts.method
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.mle_opts.method = method;
        self
    }

    pub fn with_standard_errors(mut self, compute: bool) -> Self {
        self.compute_standard_errors = compute;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_stabilization(mut self, stabilization: ExpStabilization) -> Self {
        self.stabilization = stabilization;
        self
    }
}

impl Default for EstimationOptions {
    fn default() -> Self {
        EstimationOptions {
            mle_opts: MLEOptions::default(),
            compute_standard_errors: true,
            verbosity: Verbosity::default(),
            stabilization: ExpStabilization::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::{LineSearcher, Tolerances};

    #[test]
    // Purpose
    // -------
    // Defaults match the documented baseline.
    //
    // Given
    // -----
    // - `EstimationOptions::default()`.
    //
    // Expect
    // ------
    // - Trust-region Newton, standard errors on, `Summary`, `Undamped`.
    fn defaults_are_trust_region_with_standard_errors() {
        // Act
        let opts = EstimationOptions::default();

        // Assert
        assert_eq!(opts.method(), Method::default());
        assert!(opts.compute_standard_errors);
        assert_eq!(opts.verbosity, Verbosity::Summary);
        assert_eq!(opts.stabilization, ExpStabilization::Undamped);
    }

    #[test]
    // Purpose
    // -------
    // `new` and the `with_*` setters store their inputs unchanged.
    //
    // Given
    // -----
    // - Custom tolerances, L-BFGS, no standard errors, `Trace`, `MaxShift`.
    //
    // Expect
    // ------
    // - Each field reads back as set.
    fn constructors_preserve_fields() {
        // Arrange
        let tols = Tolerances::new(Some(1e-8), None, Some(250)).expect("valid tolerances");
        let mle = MLEOptions::new(tols, Method::default(), None).expect("valid options");

        // Act
        let opts = EstimationOptions::new(mle.clone(), true, Verbosity::Silent, ExpStabilization::Undamped)
            .with_method(Method::Lbfgs(LineSearcher::HagerZhang))
            .with_standard_errors(false)
            .with_verbosity(Verbosity::Trace)
            .with_stabilization(ExpStabilization::MaxShift);

        // Assert
        assert_eq!(opts.mle_opts.tols, mle.tols);
        assert_eq!(opts.method(), Method::Lbfgs(LineSearcher::HagerZhang));
        assert!(!opts.compute_standard_errors);
        assert_eq!(opts.verbosity, Verbosity::Trace);
        assert_eq!(opts.stabilization, ExpStabilization::MaxShift);
    }

    #[test]
    // Purpose
    // -------
    // Option strings parse case-insensitively; unknown strings are errors.
    //
    // Given
    // -----
    // - "TRACE", "Silent", "max_shift", "Undamped", "loud".
    //
    // Expect
    // ------
    // - Matching variants, then `InvalidOption`.
    fn option_strings_parse() {
        // Act / Assert
        assert_eq!("TRACE".parse::<Verbosity>(), Ok(Verbosity::Trace));
        assert_eq!("Silent".parse::<Verbosity>(), Ok(Verbosity::Silent));
        assert_eq!("max_shift".parse::<ExpStabilization>(), Ok(ExpStabilization::MaxShift));
        assert_eq!("Undamped".parse::<ExpStabilization>(), Ok(ExpStabilization::Undamped));
        assert!(matches!("loud".parse::<Verbosity>(), Err(ChoiceError::InvalidOption { .. })));
    }
}
