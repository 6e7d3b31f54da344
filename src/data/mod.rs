//! Data sources: the paginated records API and a synthetic generator.

pub mod client;
pub mod sample;

pub use client::{ApiConfig, Page, RecordsClient};
pub use sample::generate_records;
