use crate::identity::{ResolvedPackage, is_internal};
use crate::metrics::MetricKind;
use crate::scoring::NetScoreResult;
use serde::{Deserialize, Serialize};

/// The persisted shape of one scored package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub url: String,
    pub is_internal: bool,
    pub metrics: Vec<MetricRecord>,
    pub net_score: f64,
    pub net_score_latency_seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub metric: MetricKind,
    pub score: f64,
    pub latency_seconds: f64,
}

impl PackageRecord {
    /// Attribute a score to the package it was computed for.
    ///
    /// The package counts as internal when either the reference it was given as or
    /// its repository URL contains the internal domain.
    #[must_use]
    pub fn new(package: &ResolvedPackage, result: &NetScoreResult, internal_domain: Option<&str>) -> Self {
        let identity = result.repository();
        let is_internal = internal_domain
            .is_some_and(|domain| is_internal(identity.origin_url(), domain) || is_internal(identity.canonical_url().as_str(), domain));

        Self {
            name: package.name.clone(),
            version: package.version.clone(),
            url: identity.origin_url().to_string(),
            is_internal,
            metrics: result
                .sub_metrics()
                .iter()
                .map(|m| MetricRecord {
                    metric: m.kind,
                    score: m.score,
                    latency_seconds: m.latency_seconds(),
                })
                .collect(),
            net_score: result.net_score(),
            net_score_latency_seconds: result.net_score_latency_seconds(),
        }
    }

    /// Upsert key.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.version)
    }
}
