//! Error types.
//!
//! Two layers:
//!
//! - `AnalysisError` (and its parts) for the pure encode/normalize/solve/rank core.
//!   These are typed so callers and tests can tell *why* a run failed.
//! - `AppError` for the binary: a message plus the process exit code.
//!
//! Exit codes used by the app layer:
//! - 2: configuration, file IO, persistence
//! - 3: no data to work with
//! - 4: analysis failure or upstream API failure

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// The record set could not be turned into a usable design matrix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("No records to encode")]
    NoRecords,

    #[error("Encoding produced a design matrix with zero feature columns")]
    NoFeatures,
}

/// The least-squares system could not be solved meaningfully.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Regression input contains non-finite values ({what})")]
    NonFinite { what: &'static str },

    #[error("Design matrix has {rows} rows and {target_len} targets")]
    ShapeMismatch { rows: usize, target_len: usize },

    #[error("Underdetermined system: {rows} records for {cols} coefficients")]
    Underdetermined { rows: usize, cols: usize },

    #[error("Singular system: rank {rank} of {cols} columns (collinear features)")]
    Singular { rank: usize, cols: usize },

    #[error("Least-squares solve failed: {reason}")]
    Diverged { reason: String },
}

/// Coefficients could not be mapped back onto feature names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("{names} feature names but {coefficients} coefficients")]
    LengthMismatch { names: usize, coefficients: usize },
}

/// Any failure of a single analysis run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Regression failed: {0}")]
    Solver(#[from] SolverError),

    #[error("Impact aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        let exit_code = match err {
            AnalysisError::Encoding(EncodingError::NoRecords) => 3,
            _ => 4,
        };
        AppError::new(exit_code, format!("Analysis failed: {err}"))
    }
}
