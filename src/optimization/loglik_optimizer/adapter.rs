//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of a log-likelihood `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. Exact derivatives (if
//! provided by the user) are negated accordingly. Missing derivatives are
//! finite-differenced on the **cost** side, so no sign flip is needed in
//! those branches.
use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::{compute_hessian, fd_gradient},
        traits::LogLikelihood,
        types::{Cost, Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::{CostFunction, Error, Gradient, Hessian as ArgminHessian};
use std::cell::RefCell;

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction`, `Gradient`
/// and `Hessian`.
///
/// - `cost` returns `-ℓ(θ)`.
/// - `gradient` returns `-∇ℓ(θ)` or a finite-difference gradient of the cost.
/// - `hessian` returns `-∇²ℓ(θ)` or a finite-difference Jacobian of the
///   cost gradient.
#[derive(Debug)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> Clone for ArgMinAdapter<'a, F> {
    fn clone(&self) -> Self {
        Self { f: self.f, data: self.data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user's `value`.
    /// - `OptError::NonFiniteCost` if the value is not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Exact gradients are validated and negated. On
    /// `GradientNotImplemented` the cost is finite-differenced (central first,
    /// forward on failure).
    ///
    /// # Errors
    /// - Propagates user errors from `grad` other than `GradientNotImplemented`.
    /// - Propagates cost errors raised during finite differencing.
    /// - Validation errors for wrong dimension or non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                Ok(fd_gradient(theta, &|t: &Theta| self.cost(t))?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgminHessian for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Hessian = Hessian;

    /// Evaluate the Hessian of the cost at `θ`.
    ///
    /// Exact Hessians are validated and negated. On `HessianNotImplemented`
    /// the cost gradient is finite-differenced; the first error raised by a
    /// gradient evaluation is parked and returned in place of the matrix.
    fn hessian(&self, theta: &Self::Param) -> Result<Self::Hessian, Error> {
        match self.f.hessian(theta, self.data) {
            Ok(h) => {
                validate_hessian(&h, theta.len())?;
                Ok(-h)
            }
            Err(OptError::HessianNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let grad_func = |t: &Theta| -> Grad {
                    match self.gradient(t) {
                        Ok(g) => g,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            Grad::from_elem(t.len(), f64::NAN)
                        }
                    }
                };
                let hess = compute_hessian(&grad_func, theta);
                if let Some(err) = closure_err.take() {
                    return Err(err);
                }
                Ok(hess?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}
