use super::{PackageRecord, Sink};
use crate::Result;

/// Keeps records in arrival order, replacing any earlier record for the same `(name, version)`.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<PackageRecord>,
    flushes: usize,
}

impl MemorySink {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            flushes: 0,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[PackageRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<PackageRecord> {
        self.records
    }

    #[must_use]
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl Sink for MemorySink {
    fn persist(&mut self, record: PackageRecord) -> Result<()> {
        if let Some(existing) = self.records.iter_mut().find(|r| r.key() == record.key()) {
            *existing = record;
        } else {
            self.records.push(record);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
