use super::{NetScoreResult, ScoreError};
use crate::identity::RepositoryIdentity;
use crate::metrics::{EvalContext, MetricKind, QUOTA_FLOOR, evaluate};
use futures_util::future::join_all;
use std::time::Instant;

const LOG_TARGET: &str = "   scoring";

/// Combines the five sub-metrics of a repository into a net score.
#[derive(Debug, Clone)]
pub struct Aggregator {
    ctx: EvalContext,
}

impl Aggregator {
    #[must_use]
    pub const fn new(ctx: EvalContext) -> Self {
        Self { ctx }
    }

    #[must_use]
    pub const fn context(&self) -> &EvalContext {
        &self.ctx
    }

    /// Score one repository.
    ///
    /// Refuses to start when the remaining API quota is below [`QUOTA_FLOOR`]; that error
    /// means the whole batch should stop. The evaluators run concurrently and the net
    /// score is computed once all of them are done. The reported latency covers the
    /// quota check, the evaluators and the weighting.
    pub async fn score(&self, repo: &RepositoryIdentity) -> Result<NetScoreResult, ScoreError> {
        let start = Instant::now();

        let status = self.ctx.client.quota_status().await.map_err(ScoreError::QuotaUnavailable)?;
        if status.is_below(QUOTA_FLOOR) {
            return Err(ScoreError::QuotaExhausted { status, floor: QUOTA_FLOOR });
        }

        log::debug!(target: LOG_TARGET, "Scoring {repo} with {} API call(s) remaining", status.remaining);

        let ctx = self.ctx.for_package();
        let results = join_all(MetricKind::ALL.map(|kind| evaluate(kind, repo, &ctx))).await;
        let result = NetScoreResult::new(repo.clone(), results, start.elapsed())?;

        log::debug!(
            target: LOG_TARGET,
            "Net score for {repo}: {:.3} in {:.3}s",
            result.net_score(),
            result.net_score_latency_seconds()
        );

        Ok(result)
    }
}
