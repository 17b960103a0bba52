//! Defect signal: how much of the reported work has been resolved.

use super::EvalContext;
use crate::Result;
use crate::hosting::{Issue, IssueState};
use crate::identity::RepositoryIdentity;

/// Score when nobody has ever filed an issue.
const NO_ISSUES_SCORE: f64 = 0.5;

pub async fn score(repo: &RepositoryIdentity, ctx: &EvalContext) -> Result<f64> {
    let issues = ctx.issues(repo).await?;
    Ok(normalize(&issues))
}

/// Closed issues over all issues. Pull requests are not defect reports and are ignored.
#[must_use]
pub fn normalize(issues: &[Issue]) -> f64 {
    let (total, closed) = issues
        .iter()
        .filter(|issue| !issue.is_pull_request())
        .fold((0_u32, 0_u32), |(total, closed), issue| {
            (total + 1, closed + u32::from(issue.state == IssueState::Closed))
        });

    if total == 0 {
        NO_ISSUES_SCORE
    } else {
        f64::from(closed) / f64::from(total)
    }
}
