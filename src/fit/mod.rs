//! Regression fitting.
//!
//! Responsibilities:
//!
//! - encode records into a design matrix
//! - z-score the columns and prepend an intercept
//! - solve least squares against log-earnings

pub mod regression;

pub use regression::*;
