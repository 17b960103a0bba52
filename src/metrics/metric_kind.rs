use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The closed set of sub-metrics that make up a net score.
///
/// Declaration order is the canonical order used in results, summaries and records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display, Serialize, Deserialize)]
pub enum MetricKind {
    RampUp,
    BusFactor,
    Correctness,
    License,
    Maintainability,
}

impl MetricKind {
    pub const ALL: [Self; 5] = [
        Self::RampUp,
        Self::BusFactor,
        Self::Correctness,
        Self::License,
        Self::Maintainability,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position of this kind in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Contribution of this metric to the net score. Weights sum to 1.0.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::RampUp | Self::Maintainability => 0.15,
            Self::BusFactor => 0.20,
            Self::Correctness | Self::License => 0.25,
        }
    }

    /// Hosting API calls one evaluation is expected to spend.
    ///
    /// The issue listing is fetched once per package and read by both Correctness and
    /// Maintainability, so it is charged to Correctness only.
    #[must_use]
    pub const fn expected_call_cost(self) -> u64 {
        match self {
            Self::Maintainability => 0,
            Self::BusFactor | Self::License => 1,
            Self::RampUp => 2,
            Self::Correctness => 3,
        }
    }

    /// Score reported when the metric's data cannot be fetched.
    #[must_use]
    pub const fn fallback_score(self) -> f64 {
        match self {
            Self::Maintainability => 0.5,
            Self::RampUp | Self::BusFactor | Self::Correctness | Self::License => 0.0,
        }
    }
}

/// Remaining calls needed to evaluate one more package safely.
pub const QUOTA_FLOOR: u64 = {
    let mut total = 0;
    let mut i = 0;
    while i < MetricKind::COUNT {
        total += MetricKind::ALL[i].expected_call_cost();
        i += 1;
    }
    total
};
