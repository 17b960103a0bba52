use super::ScoreError;
use crate::identity::RepositoryIdentity;
use crate::metrics::{MetricKind, MetricResult, clamp_score};
use core::time::Duration;

/// Complete, immutable outcome of scoring one repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NetScoreResult {
    repository: RepositoryIdentity,
    sub_metrics: [MetricResult; MetricKind::COUNT],
    net_score: f64,
    net_score_latency: Duration,
}

impl NetScoreResult {
    /// Assemble a result from exactly one [`MetricResult`] per [`MetricKind`].
    ///
    /// Results may arrive in any order; they are stored in [`MetricKind::ALL`] order.
    /// A missing or repeated kind is an error, never averaged over.
    pub fn new(repository: RepositoryIdentity, results: Vec<MetricResult>, latency: Duration) -> Result<Self, ScoreError> {
        let mut slots: [Option<MetricResult>; MetricKind::COUNT] = [None; MetricKind::COUNT];
        let mut duplicated = Vec::new();

        for result in results {
            let slot = &mut slots[result.kind.index()];
            if slot.is_some() {
                duplicated.push(result.kind);
            } else {
                *slot = Some(result);
            }
        }

        let missing: Vec<MetricKind> = MetricKind::ALL.into_iter().filter(|k| slots[k.index()].is_none()).collect();
        duplicated.sort_unstable();
        duplicated.dedup();

        let complete: Vec<MetricResult> = slots.into_iter().flatten().collect();
        match <[MetricResult; MetricKind::COUNT]>::try_from(complete) {
            Ok(sub_metrics) if duplicated.is_empty() => Ok(Self {
                net_score: weighted_sum(&sub_metrics),
                repository,
                sub_metrics,
                net_score_latency: latency,
            }),
            _ => Err(ScoreError::IncompleteMetrics { missing, duplicated }),
        }
    }

    #[must_use]
    pub const fn repository(&self) -> &RepositoryIdentity {
        &self.repository
    }

    /// Sub-metric results in [`MetricKind::ALL`] order.
    #[must_use]
    pub const fn sub_metrics(&self) -> &[MetricResult; MetricKind::COUNT] {
        &self.sub_metrics
    }

    #[must_use]
    pub const fn metric(&self, kind: MetricKind) -> &MetricResult {
        &self.sub_metrics[kind.index()]
    }

    #[must_use]
    pub const fn net_score(&self) -> f64 {
        self.net_score
    }

    #[must_use]
    pub const fn net_score_latency(&self) -> Duration {
        self.net_score_latency
    }

    #[must_use]
    pub const fn net_score_latency_seconds(&self) -> f64 {
        self.net_score_latency.as_secs_f64()
    }
}

/// `Σ weight[k] * score[k]` over all metric kinds.
#[must_use]
pub fn weighted_sum(sub_metrics: &[MetricResult; MetricKind::COUNT]) -> f64 {
    clamp_score(sub_metrics.iter().map(|m| m.kind.weight() * m.score).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn repo() -> RepositoryIdentity {
        let url = Url::parse("https://github.com/owner/repo").unwrap();
        RepositoryIdentity::parse(&url, url.as_str()).unwrap()
    }

    fn results(score: f64) -> Vec<MetricResult> {
        MetricKind::ALL
            .iter()
            .map(|k| MetricResult::new(*k, score, Duration::from_millis(10)))
            .collect()
    }

    #[test]
    fn test_all_ones_is_one() {
        let result = NetScoreResult::new(repo(), results(1.0), Duration::from_millis(20)).unwrap();
        assert!((result.net_score() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_sum() {
        let scores = [0.2, 0.4, 0.6, 1.0, 0.5];
        let input: Vec<_> = MetricKind::ALL
            .iter()
            .zip(scores)
            .map(|(k, s)| MetricResult::new(*k, s, Duration::ZERO))
            .collect();

        let result = NetScoreResult::new(repo(), input, Duration::ZERO).unwrap();
        let expected = 0.15 * 0.2 + 0.20 * 0.4 + 0.25 * 0.6 + 0.25 * 1.0 + 0.15 * 0.5;
        assert!((result.net_score() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_order_results_are_reordered() {
        let mut input = results(0.5);
        input.reverse();

        let result = NetScoreResult::new(repo(), input, Duration::ZERO).unwrap();
        let kinds: Vec<_> = result.sub_metrics().iter().map(|m| m.kind).collect();
        assert_eq!(kinds, MetricKind::ALL.to_vec());
        assert_eq!(result.metric(MetricKind::License).kind, MetricKind::License);
    }

    #[test]
    fn test_missing_metric_is_error() {
        let mut input = results(0.5);
        let _ = input.remove(3);

        match NetScoreResult::new(repo(), input, Duration::ZERO) {
            Err(ScoreError::IncompleteMetrics { missing, duplicated }) => {
                assert_eq!(missing, vec![MetricKind::License]);
                assert!(duplicated.is_empty());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_duplicated_metric_is_error() {
        let mut input = results(0.5);
        input.push(MetricResult::new(MetricKind::RampUp, 0.9, Duration::ZERO));

        match NetScoreResult::new(repo(), input, Duration::ZERO) {
            Err(ScoreError::IncompleteMetrics { missing, duplicated }) => {
                assert!(missing.is_empty());
                assert_eq!(duplicated, vec![MetricKind::RampUp]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_empty_is_error() {
        let _ = NetScoreResult::new(repo(), Vec::new(), Duration::ZERO).unwrap_err();
    }

    #[test]
    fn test_latency_is_kept_as_given() {
        let result = NetScoreResult::new(repo(), results(0.5), Duration::from_millis(1250)).unwrap();
        assert!((result.net_score_latency_seconds() - 1.25).abs() < 1e-9);
    }
}
