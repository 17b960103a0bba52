use super::{PackageRecord, Sink};
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::IntoAppError;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

/// Appends one JSON object per record to a file.
#[derive(Debug)]
pub struct JsonLinesSink {
    path: Utf8PathBuf,
    writer: BufWriter<File>,
}

impl JsonLinesSink {
    pub fn open(path: &Utf8Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .into_app_err_with(|| format!("opening record file {path}"))?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }
}

impl Sink for JsonLinesSink {
    fn persist(&mut self, record: PackageRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &record)
            .into_app_err_with(|| format!("writing record for {}@{} to {}", record.name, record.version, self.path))?;
        self.writer
            .write_all(b"\n")
            .into_app_err_with(|| format!("writing record to {}", self.path))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().into_app_err_with(|| format!("flushing {}", self.path))?;
        self.writer.get_ref().sync_all().into_app_err_with(|| format!("syncing {}", self.path))
    }
}
