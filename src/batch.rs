//! Batch evaluation of package references.
//!
//! Packages are handled one at a time, in input order. A reference that cannot be
//! resolved or scored is skipped; running below the API quota floor, or not being able
//! to tell how much quota is left, stops the batch. The sink is flushed in every case.

use crate::Result;
use crate::identity::Resolver;
use crate::scoring::{Aggregator, StopReason};
use crate::sink::{PackageRecord, Sink};
use crate::summary::write_summary_line;
use std::io::Write;

const LOG_TARGET: &str = "     batch";

/// Process exit code reported when the batch stopped over the API quota.
pub const QUOTA_EXHAUSTED_EXIT_CODE: i32 = 2;

/// Counts reported at the end of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub processed: usize,
    pub skipped: usize,

    /// References left untouched because the batch stopped early.
    pub not_attempted: usize,

    /// Why the batch stopped early, if it did.
    pub stopped: Option<StopReason>,
}

impl BatchOutcome {
    #[must_use]
    pub const fn stopped_early(&self) -> bool {
        self.stopped.is_some()
    }
}

/// Split batch input into references: one per line, trimmed, blank lines ignored.
#[must_use]
pub fn parse_references(text: &str) -> Vec<String> {
    text.lines().map(str::trim).filter(|line| !line.is_empty()).map(String::from).collect()
}

#[derive(Debug)]
pub struct BatchRunner {
    resolver: Resolver,
    aggregator: Aggregator,
    internal_domain: Option<String>,
}

impl BatchRunner {
    #[must_use]
    pub const fn new(resolver: Resolver, aggregator: Aggregator, internal_domain: Option<String>) -> Self {
        Self {
            resolver,
            aggregator,
            internal_domain,
        }
    }

    /// Score every reference, writing a summary line to `out` and a record to `sink` for each.
    ///
    /// Errors are returned only for output and sink failures. The sink is flushed
    /// before any such error is returned.
    pub async fn run<S, W>(&self, refs: &[String], sink: &mut S, out: &mut W) -> Result<BatchOutcome>
    where
        S: Sink + ?Sized,
        W: Write,
    {
        let processed = self.process(refs, sink, out).await;
        let flushed = sink.flush();

        let outcome = processed?;
        flushed?;
        Ok(outcome)
    }

    async fn process<S, W>(&self, refs: &[String], sink: &mut S, out: &mut W) -> Result<BatchOutcome>
    where
        S: Sink + ?Sized,
        W: Write,
    {
        let mut outcome = BatchOutcome::default();

        for (index, reference) in refs.iter().enumerate() {
            log::info!(target: LOG_TARGET, "[{}/{}] {reference}", index + 1, refs.len());

            let package = match self.resolver.resolve(reference).await {
                Ok(package) => package,
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "Skipping '{reference}': {e:#}");
                    outcome.skipped += 1;
                    continue;
                }
            };

            match self.aggregator.score(&package.identity).await {
                Ok(result) => {
                    write_summary_line(out, &result)?;
                    sink.persist(PackageRecord::new(&package, &result, self.internal_domain.as_deref()))?;
                    outcome.processed += 1;
                }

                Err(e) => {
                    if let Some(reason) = e.stop_reason() {
                        outcome.not_attempted = refs.len() - index;
                        log::error!(
                            target: LOG_TARGET,
                            "Stopping batch before '{reference}', {} reference(s) not attempted: {e}",
                            outcome.not_attempted
                        );
                        outcome.stopped = Some(reason);
                        break;
                    }

                    log::error!(target: LOG_TARGET, "Skipping '{reference}': {e}");
                    outcome.skipped += 1;
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_references_ignores_blank_lines() {
        let text = "https://github.com/a/b\n\n   \nhttps://www.npmjs.com/package/c\n";
        assert_eq!(parse_references(text), ["https://github.com/a/b", "https://www.npmjs.com/package/c"]);
    }

    #[test]
    fn test_parse_references_trims() {
        let text = "  https://github.com/a/b  \r\n\thttps://github.com/c/d\r\n";
        assert_eq!(parse_references(text), ["https://github.com/a/b", "https://github.com/c/d"]);
    }

    #[test]
    fn test_parse_references_empty() {
        assert!(parse_references("").is_empty());
        assert!(parse_references("\n\n").is_empty());
    }
}
