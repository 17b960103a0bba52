//! Persistence of scored packages.
//!
//! The batch runner hands each finished [`PackageRecord`] to a [`Sink`] and
//! flushes it once at the end of the run, including runs stopped early.

mod json_lines;
mod memory;
mod record;

use crate::Result;

pub use json_lines::JsonLinesSink;
pub use memory::MemorySink;
pub use record::{MetricRecord, PackageRecord};

/// Destination for scored packages, keyed by `(name, version)`.
pub trait Sink {
    fn persist(&mut self, record: PackageRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}
