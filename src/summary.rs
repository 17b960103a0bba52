//! One-line JSON summary per scored package.
//!
//! Keys come out in a fixed order: `URL`, `NetScore`, `NetScore_Latency`, then a
//! `<Metric>` / `<Metric>_Latency` pair per metric kind.

use crate::Result;
use crate::metrics::MetricKind;
use crate::scoring::NetScoreResult;
use ohno::IntoAppError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::Write;

/// Serializable view of a [`NetScoreResult`].
#[derive(Debug, Clone, Copy)]
pub struct SummaryLine<'a> {
    result: &'a NetScoreResult,
}

impl<'a> SummaryLine<'a> {
    #[must_use]
    pub const fn new(result: &'a NetScoreResult) -> Self {
        Self { result }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl Serialize for SummaryLine<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + 2 * MetricKind::COUNT))?;

        map.serialize_entry("URL", self.result.repository().origin_url())?;
        map.serialize_entry("NetScore", &round3(self.result.net_score()))?;
        map.serialize_entry("NetScore_Latency", &round3(self.result.net_score_latency_seconds()))?;

        for metric in self.result.sub_metrics() {
            let name = metric.kind.to_string();
            map.serialize_entry(&name, &round3(metric.score))?;
            map.serialize_entry(&format!("{name}_Latency"), &round3(metric.latency_seconds()))?;
        }

        map.end()
    }
}

/// Write the summary of one package as a single line.
pub fn write_summary_line(out: &mut impl Write, result: &NetScoreResult) -> Result<()> {
    let line = serde_json::to_string(&SummaryLine::new(result)).into_app_err("serializing summary line")?;
    writeln!(out, "{line}").into_app_err("writing summary line")
}
