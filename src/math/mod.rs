//! Mathematical utilities: column normalization and least squares.

pub mod normalize;
pub mod ols;

pub use normalize::*;
pub use ols::*;
