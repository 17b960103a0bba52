//! Net score aggregation.

mod aggregator;
mod error;
mod net_score;

pub use aggregator::Aggregator;
pub use error::{ScoreError, StopReason};
pub use net_score::{NetScoreResult, weighted_sum};
