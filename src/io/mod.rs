//! Input/output helpers.
//!
//! - snapshot JSON read/write (`snapshot`)
//! - spreadsheet CSV sink (`sheet`)
//! - local record files (`records`)

pub mod records;
pub mod sheet;
pub mod snapshot;

pub use records::*;
pub use sheet::*;
pub use snapshot::*;
