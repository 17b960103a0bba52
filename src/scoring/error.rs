use crate::hosting::QuotaStatus;
use crate::metrics::MetricKind;
use core::fmt;
use ohno::AppError;

/// Why a batch was abandoned before its last reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Remaining quota fell below the per-package floor.
    QuotaExhausted,

    /// The remaining quota could not be read, e.g. because the token was rejected.
    QuotaUnavailable(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotaExhausted => write!(f, "API quota exhausted"),
            Self::QuotaUnavailable(cause) => write!(f, "API quota unavailable ({cause})"),
        }
    }
}

/// Failures that stop scoring, at package or batch granularity.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("API quota exhausted: {} of {} call(s) remaining, at least {floor} needed per package", status.remaining, status.limit)]
    QuotaExhausted { status: QuotaStatus, floor: u64 },

    #[error("unable to determine remaining API quota: {0:#}")]
    QuotaUnavailable(AppError),

    #[error("incomplete metric set: missing {missing:?}, duplicated {duplicated:?}")]
    IncompleteMetrics {
        missing: Vec<MetricKind>,
        duplicated: Vec<MetricKind>,
    },
}

impl ScoreError {
    /// Why the rest of the batch must be abandoned, or `None` when only this package fails.
    #[must_use]
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::QuotaExhausted { .. } => Some(StopReason::QuotaExhausted),
            Self::QuotaUnavailable(e) => {
                let message = e.to_string();
                let cause = message.lines().next().unwrap_or_default().to_string();
                Some(StopReason::QuotaUnavailable(cause))
            }
            Self::IncompleteMetrics { .. } => None,
        }
    }
}
