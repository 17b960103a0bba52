//! Contributor concentration risk.

use super::EvalContext;
use crate::Result;
use crate::identity::RepositoryIdentity;

pub async fn score(repo: &RepositoryIdentity, ctx: &EvalContext) -> Result<f64> {
    let contributors = ctx.client.contributors(repo.owner(), repo.name()).await?;
    let contributions: Vec<u64> = contributors.iter().map(|c| c.contributions).collect();

    Ok(normalize(&contributions))
}

/// Smallest number of top contributors who together made more than half of all contributions.
#[must_use]
pub fn bus_factor(contributions: &[u64]) -> u32 {
    let mut sorted = contributions.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let total: u64 = sorted.iter().sum();
    if total == 0 {
        return 0;
    }

    let mut covered = 0_u64;
    let mut count = 0;

    for c in sorted {
        if covered.saturating_mul(2) > total {
            break;
        }
        covered += c;
        count += 1;
    }

    count
}

/// A single dominant contributor scores 0; the score rises with the bus factor and saturates.
#[must_use]
pub fn normalize(contributions: &[u64]) -> f64 {
    let k = bus_factor(contributions);
    if k == 0 {
        return 0.0;
    }

    1.0 - (-f64::from(k - 1) / 2.0).exp()
}
