//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the API record shape (`RawRecord`) and the fixed analysis schema (`Record`)
//! - categorical attribute descriptors (`Categorical`)
//! - analysis outputs (`VariableImpact`, `EarningsEntry`, `InsightSnapshot`)

pub mod types;

pub use types::*;
