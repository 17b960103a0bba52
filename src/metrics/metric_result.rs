use super::MetricKind;
use core::time::Duration;

/// Outcome of one evaluator invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricResult {
    pub kind: MetricKind,
    pub score: f64,
    pub latency: Duration,
}

impl MetricResult {
    /// Build a result, clamping the score into `[0, 1]`; NaN becomes 0.
    #[must_use]
    pub const fn new(kind: MetricKind, score: f64, latency: Duration) -> Self {
        Self {
            kind,
            score: clamp_score(score),
            latency,
        }
    }

    #[must_use]
    pub const fn latency_seconds(&self) -> f64 {
        self.latency.as_secs_f64()
    }
}

#[must_use]
pub const fn clamp_score(score: f64) -> f64 {
    if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) }
}
