//! Onboarding friction, judged from documentation signals.

use super::EvalContext;
use crate::Result;
use crate::identity::RepositoryIdentity;
use ohno::bail;

/// README size at which the documentation term reaches ~63% of its maximum.
const README_SATURATION_BYTES: f64 = 4000.0;
const README_WEIGHT: f64 = 0.75;
const SITE_WEIGHT: f64 = 0.25;

pub async fn score(repo: &RepositoryIdentity, ctx: &EvalContext) -> Result<f64> {
    let (repository, readme) = tokio::join!(
        ctx.client.repository(repo.owner(), repo.name()),
        ctx.client.readme(repo.owner(), repo.name())
    );

    let Some(repository) = repository? else {
        bail!("repository {repo} not found");
    };

    let readme_bytes = readme?.map_or(0, |r| r.size);
    let has_site = repository.has_pages || repository.homepage.as_deref().is_some_and(|h| !h.trim().is_empty());

    Ok(normalize(readme_bytes, has_site))
}

/// Saturating in README length so very long READMEs do not dominate moderately good ones.
#[must_use]
pub fn normalize(readme_bytes: u64, has_site: bool) -> f64 {
    #[expect(clippy::cast_precision_loss, reason = "README sizes are far below 2^52")]
    let readme = 1.0 - (-(readme_bytes as f64) / README_SATURATION_BYTES).exp();
    let site = if has_site { SITE_WEIGHT } else { 0.0 };

    README_WEIGHT.mul_add(readme, site)
}
