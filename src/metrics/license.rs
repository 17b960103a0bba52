//! License compatibility. Fails closed.

use super::EvalContext;
use crate::Result;
use crate::identity::RepositoryIdentity;

const NO_ASSERTION: &str = "NOASSERTION";

pub async fn score(repo: &RepositoryIdentity, ctx: &EvalContext) -> Result<f64> {
    let license = ctx.client.license(repo.owner(), repo.name()).await?;
    let spdx_id = license.as_ref().and_then(|l| l.license.as_ref()).and_then(|d| d.spdx_id.as_deref());

    Ok(normalize(spdx_id, &ctx.approved_licenses))
}

/// 1.0 when the expression can be satisfied with approved licenses alone, 0.0 otherwise.
#[must_use]
pub fn normalize(spdx_id: Option<&str>, approved: &[String]) -> f64 {
    let Some(expr) = spdx_id.map(str::trim).filter(|id| !id.is_empty() && *id != NO_ASSERTION) else {
        return 0.0;
    };

    let Ok(expr) = spdx::Expression::parse_mode(expr, spdx::ParseMode::LAX) else {
        return 0.0;
    };

    let satisfied = expr.evaluate(|req| match &req.license {
        spdx::LicenseItem::Spdx { id, .. } => approved.iter().any(|a| a.eq_ignore_ascii_case(id.name)),
        _ => false,
    });

    if satisfied { 1.0 } else { 0.0 }
}
