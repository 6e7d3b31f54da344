//! Feature encoding: records → numeric design matrix + feature names.

pub mod encoder;

pub use encoder::*;
