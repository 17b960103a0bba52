use super::{EvalContext, MetricKind, MetricResult, bus_factor, correctness, license, maintainability, ramp_up};
use crate::Result;
use crate::identity::RepositoryIdentity;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::time::Instant;

const LOG_TARGET: &str = "   metrics";

type ComputeFn = for<'a> fn(&'a RepositoryIdentity, &'a EvalContext) -> BoxFuture<'a, Result<f64>>;

#[derive(Debug)]
pub struct MetricDef {
    pub kind: MetricKind,
    pub description: &'static str,
    pub compute: ComputeFn,
}

macro_rules! metric_def {
    ($kind:ident, $description:expr, $module:ident) => {
        MetricDef {
            kind: MetricKind::$kind,
            description: $description,
            compute: |repo, ctx| $module::score(repo, ctx).boxed(),
        }
    };
}

/// One entry per [`MetricKind`], in [`MetricKind::ALL`] order.
pub const METRIC_DEFINITIONS: &[MetricDef] = &[
    metric_def!(RampUp, "Documentation available to newcomers", ramp_up),
    metric_def!(BusFactor, "Spread of contributions across contributors", bus_factor),
    metric_def!(Correctness, "Share of reported issues that were resolved", correctness),
    metric_def!(License, "Declared license is on the approved list", license),
    metric_def!(Maintainability, "Median time to close issues and pull requests", maintainability),
];

impl MetricKind {
    #[must_use]
    pub fn definition(self) -> &'static MetricDef {
        &METRIC_DEFINITIONS[self.index()]
    }
}

/// Run one metric against a repository, timing it.
///
/// Never fails: a computation error is logged and replaced by the metric's fallback score.
pub async fn evaluate(kind: MetricKind, repo: &RepositoryIdentity, ctx: &EvalContext) -> MetricResult {
    let start = Instant::now();

    let score = match (kind.definition().compute)(repo, ctx).await {
        Ok(score) => score,
        Err(e) => {
            let fallback = kind.fallback_score();
            log::warn!(target: LOG_TARGET, "Could not compute {kind} for {repo}, using {fallback}: {e:#}");
            fallback
        }
    };

    let result = MetricResult::new(kind, score, start.elapsed());
    log::debug!(target: LOG_TARGET, "{kind} for {repo}: {:.3} in {:.3}s", result.score, result.latency_seconds());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_kind_order() {
        assert_eq!(METRIC_DEFINITIONS.len(), MetricKind::COUNT);
        for kind in MetricKind::ALL {
            assert_eq!(kind.definition().kind, kind);
            assert!(!kind.definition().description.is_empty());
        }
    }
}
