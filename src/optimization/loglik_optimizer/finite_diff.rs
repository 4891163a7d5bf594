//! loglik_optimizer::finite_diff — finite-difference derivative fallbacks.
//!
//! Purpose
//! -------
//! Supply gradients and Hessians for [`LogLikelihood`] implementations that
//! do not provide exact derivatives, so the trust-region and L-BFGS solvers
//! can still run. Models in this crate supply exact derivatives through
//! dual-number evaluation; this module is the safety net for the generic
//! trait and the reference used to cross-check exact derivatives in tests.
//!
//! Key behaviors
//! -------------
//! - [`fd_gradient`]: central differences of a cost closure, retried with
//!   forward differences when a cost evaluation fails or the result is not
//!   finite.
//! - [`compute_hessian`]: central-difference Hessian of a gradient map,
//!   falling back to forward differences, validated and symmetrized.
//!
//! Invariants & assumptions
//! ------------------------
//! - Closures cannot return `Result`, so errors raised inside a cost
//!   evaluation are parked in a `RefCell` and the closure returns `NaN`;
//!   a parked error always wins over the numeric result.
//! - Returned gradients/Hessians satisfy [`validate_grad`] /
//!   [`validate_hessian`].
//!
//! [`LogLikelihood`]: crate::optimization::loglik_optimizer::LogLikelihood
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        types::{Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// fd_gradient — finite-difference gradient of a fallible cost function.
///
/// Parameters
/// ----------
/// - `theta`: `&Theta`
///   Evaluation point; its length fixes the gradient dimension.
/// - `cost`: `&G`
///   Fallible cost `θ ↦ c(θ)`.
///
/// Returns
/// -------
/// `OptResult<Grad>`
///   Central-difference gradient when every evaluation succeeds and the
///   result is finite; otherwise the forward-difference gradient.
///
/// Errors
/// ------
/// - Any error raised by `cost` during the forward-difference retry.
/// - `OptError::InvalidGradient` when the forward-difference gradient is
///   still non-finite.
pub fn fd_gradient<G>(theta: &Theta, cost: &G) -> OptResult<Grad>
where
    G: Fn(&Theta) -> Result<f64, Error>,
{
    let closure_err: RefCell<Option<Error>> = RefCell::new(None);
    let cost_func = |x: &Theta| -> f64 {
        match cost(x) {
            Ok(val) => val,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let central = theta.central_diff(&cost_func);
    if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }
    run_fd_diff(theta, &cost_func, &closure_err)
}

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, runs `forward_diff`, then returns any parked error
/// or the validated gradient.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// compute_hessian — finite-difference Hessian with validation and symmetry.
///
/// Central differences of the gradient map `f` are tried first; when they
/// fail validation the forward-difference Hessian is used instead. The
/// result is symmetrized in place.
///
/// # Errors
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when the
///   forward-difference fallback also fails validation.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

/// Replace each off-diagonal pair with its average; diagonal untouched.
pub fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
