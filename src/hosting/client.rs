//! GitHub API client
//!
//! Minimal client for the repository, issue, contributor and license data the
//! metrics need. Every response feeds the shared [`QuotaTracker`].

use super::quota::{QuotaStatus, QuotaTracker, extract_quota_from_headers};
use super::resilient_http::{RetryPolicy, resilient_get};
use crate::Result;
use chrono::{DateTime, Utc};
use ohno::{IntoAppError, bail};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::sync::Arc;

const LOG_TARGET: &str = "   hosting";
const ISSUE_PAGE_SIZE: u8 = 100;
/// Contributors read per repository, in one page.
pub const CONTRIBUTOR_PAGE_SIZE: u8 = 100;

/// Maximum number of issue pages sampled per listing.
pub const MAX_ISSUE_PAGES: u32 = 3;

/// Minimal repository info with only the fields we need
#[derive(Debug, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub has_pages: bool,
}

/// README metadata; the content itself is not needed
#[derive(Debug, Deserialize)]
pub struct Readme {
    pub size: u64,
}

#[derive(Debug, Deserialize)]
pub struct Contributor {
    pub contributions: u64,
}

/// Response of the repository license endpoint
#[derive(Debug, Deserialize)]
pub struct RepoLicense {
    pub license: Option<LicenseDetail>,
}

#[derive(Debug, Deserialize)]
pub struct LicenseDetail {
    pub spdx_id: Option<String>,
}

/// Minimal GitHub issue/PR info with only the fields we need
#[derive(Debug, Deserialize)]
pub struct Issue {
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub state: IssueState,
    pub pull_request: Option<IgnoredAny>,
}

impl Issue {
    /// The issues endpoint also lists pull requests; they carry a `pull_request` object.
    #[must_use]
    pub const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Issue state: open or closed
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

#[derive(Debug, Deserialize)]
struct RateLimitResponse {
    rate: RateWindow,
}

#[derive(Debug, Deserialize)]
struct RateWindow {
    limit: u64,
    remaining: u64,
    reset: i64,
}

/// Quota-aware hosting API client.
///
/// Clones share the HTTP connection pool and the quota counter, so one client
/// built at startup gives every evaluator the same view of the remaining budget.
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "http field stores the underlying HTTP client")]
pub struct Client {
    http: reqwest::Client,
    base_url: Arc<str>,
    quota: QuotaTracker,
    retry: RetryPolicy,
}

impl Client {
    /// Create a new client with optional authentication token and base URL
    pub fn new(token: Option<&str>, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        let _ = headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let http = reqwest::Client::builder()
            .user_agent("trustscore")
            .default_headers(headers)
            .build()?;

        let base_url: String = base_url.into();

        Ok(Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            quota: QuotaTracker::default(),
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy applied to every request
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the base URL for this client
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current quota snapshot, querying the host once if nothing has been observed yet.
    pub async fn quota_status(&self) -> Result<QuotaStatus> {
        if let Some(status) = self.quota.snapshot() {
            return Ok(status);
        }

        self.refresh_quota().await
    }

    /// Ask the host for the authoritative quota, replacing whatever was observed so far.
    pub async fn refresh_quota(&self) -> Result<QuotaStatus> {
        let url = format!("{}/rate_limit", self.base_url);
        log::debug!(target: LOG_TARGET, "Querying API quota from '{url}'");

        let resp = resilient_get(&self.http, &url, self.retry)
            .await
            .into_app_err_with(|| format!("querying API quota from '{url}'"))?
            .error_for_status()
            .into_app_err_with(|| format!("querying API quota from '{url}'"))?;

        let body: RateLimitResponse = resp
            .json()
            .await
            .into_app_err_with(|| format!("parsing API quota response from '{url}'"))?;

        let status = QuotaStatus::new(body.rate.remaining, body.rate.limit, DateTime::from_timestamp(body.rate.reset, 0));
        log::debug!(target: LOG_TARGET, "API quota: {} of {} call(s) remaining", status.remaining, status.limit);

        self.quota.replace(status);
        Ok(status)
    }

    pub async fn repository(&self, owner: &str, repo: &str) -> Result<Option<Repository>> {
        self.get_json(&format!("/repos/{owner}/{repo}")).await
    }

    pub async fn readme(&self, owner: &str, repo: &str) -> Result<Option<Readme>> {
        self.get_json(&format!("/repos/{owner}/{repo}/readme")).await
    }

    pub async fn license(&self, owner: &str, repo: &str) -> Result<Option<RepoLicense>> {
        self.get_json(&format!("/repos/{owner}/{repo}/license")).await
    }

    /// The top [`CONTRIBUTOR_PAGE_SIZE`] contributors by contribution count, anonymous ones included.
    ///
    /// Only the first page is read; the long tail of small contributors is left out.
    /// Empty repositories yield an empty list.
    pub async fn contributors(&self, owner: &str, repo: &str) -> Result<Vec<Contributor>> {
        let path = format!("/repos/{owner}/{repo}/contributors?per_page={CONTRIBUTOR_PAGE_SIZE}&anon=true");
        Ok(self.get_json(&path).await?.unwrap_or_default())
    }

    /// Issues and pull requests in any state, sampled from at most [`MAX_ISSUE_PAGES`] pages.
    pub async fn issues(&self, owner: &str, repo: &str) -> Result<Vec<Issue>> {
        let mut all_issues = Vec::new();

        for page in 1..=MAX_ISSUE_PAGES {
            let path = format!("/repos/{owner}/{repo}/issues?state=all&per_page={ISSUE_PAGE_SIZE}&page={page}");
            let batch: Vec<Issue> = self.get_json(&path).await?.unwrap_or_default();
            let count = batch.len();
            all_issues.extend(batch);

            if count < usize::from(ISSUE_PAGE_SIZE) {
                break;
            }
        }

        Ok(all_issues)
    }

    /// Make an API call and decode the body.
    ///
    /// Returns `None` when the host reports the resource as absent (404) or empty (204).
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = format!("{}{path}", self.base_url);
        log::debug!(target: LOG_TARGET, "GET {url}");

        let resp = resilient_get(&self.http, &url, self.retry)
            .await
            .into_app_err_with(|| format!("requesting '{url}'"))?;

        let observed = extract_quota_from_headers(resp.headers());
        if let Some(status) = observed {
            self.quota.observe(status);
        }

        let status = resp.status();
        if matches!(status, StatusCode::NOT_FOUND | StatusCode::NO_CONTENT) {
            return Ok(None);
        }

        let out_of_quota = observed.is_some_and(|q| q.remaining == 0);
        if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && out_of_quota) {
            self.quota.mark_exhausted();
            bail!("rate limited while requesting '{url}' (HTTP {status})");
        }

        let data = resp
            .error_for_status()
            .into_app_err_with(|| format!("requesting '{url}'"))?
            .json::<T>()
            .await
            .into_app_err_with(|| format!("parsing response from '{url}'"))?;

        Ok(Some(data))
    }
}
