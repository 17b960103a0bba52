//! Responsiveness: how quickly issues and pull requests get closed.

use super::EvalContext;
use crate::Result;
use crate::hosting::Issue;
use crate::identity::RepositoryIdentity;

/// Score when nothing has ever been closed. No history is not evidence of poor maintenance.
const NO_HISTORY_SCORE: f64 = 0.5;

/// Median close time at which the score drops to one half.
const HALF_SCORE_DAYS: f64 = 30.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub async fn score(repo: &RepositoryIdentity, ctx: &EvalContext) -> Result<f64> {
    let issues = ctx.issues(repo).await?;
    Ok(normalize(&issues))
}

#[must_use]
pub fn normalize(issues: &[Issue]) -> f64 {
    let mut days: Vec<f64> = issues.iter().filter_map(days_to_close).collect();
    days.sort_by(f64::total_cmp);

    median(&days).map_or(NO_HISTORY_SCORE, |median| 1.0 / (1.0 + median / HALF_SCORE_DAYS))
}

fn days_to_close(issue: &Issue) -> Option<f64> {
    let closed_at = issue.closed_at?;
    let seconds = (closed_at - issue.created_at).num_seconds().max(0);

    #[expect(clippy::cast_precision_loss, reason = "durations in seconds are far below 2^52")]
    Some(seconds as f64 / SECONDS_PER_DAY)
}

fn median(sorted: &[f64]) -> Option<f64> {
    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        Some(f64::midpoint(*sorted.get(mid.checked_sub(1)?)?, *sorted.get(mid)?))
    } else {
        sorted.get(mid).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_after_days(days: &[u32]) -> Vec<Issue> {
        let json: Vec<String> = days
            .iter()
            .map(|d| {
                let closed = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap() + chrono::Duration::days(i64::from(*d));
                format!(
                    r#"{{ "created_at": "2024-01-01T00:00:00Z", "closed_at": "{}", "state": "closed" }}"#,
                    closed.to_rfc3339()
                )
            })
            .collect();

        serde_json::from_str(&format!("[{}]", json.join(","))).unwrap()
    }

    #[test]
    fn test_no_history_is_neutral() {
        assert!((normalize(&[]) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_open_issues_only_is_neutral() {
        let issues: Vec<Issue> =
            serde_json::from_str(r#"[{ "created_at": "2024-01-01T00:00:00Z", "closed_at": null, "state": "open" }]"#).unwrap();
        assert!((normalize(&issues) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_median_of_thirty_days_is_half() {
        assert!((normalize(&closed_after_days(&[1, 30, 400])) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_even_count_uses_midpoint() {
        assert!((normalize(&closed_after_days(&[20, 40])) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_same_day_close_scores_one() {
        assert!((normalize(&closed_after_days(&[0, 0, 0])) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_faster_is_better() {
        assert!(normalize(&closed_after_days(&[2, 3])) > normalize(&closed_after_days(&[60, 90])));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0]), Some(3.0));
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
    }
}
