//! `earnings-drivers` library crate.
//!
//! Finds which worker attributes move earnings the most: records are one-hot
//! encoded, z-scored, and regressed against `ln(1 + earnings)`; coefficients are
//! ranked into the top drivers, alongside the top earners.
//!
//! The binary (`drivers`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the analysis core stays free of IO and configuration

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod fit;
pub mod io;
pub mod math;
pub mod report;
