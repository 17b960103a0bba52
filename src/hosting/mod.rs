//! Access to the source-hosting API.
//!
//! [`Client`] wraps the GitHub REST API and keeps the run-wide [`QuotaStatus`]
//! current from the rate-limit headers of every response. All requests, registry
//! lookups included, go through [`resilient_get`].

mod client;
mod quota;
mod resilient_http;

pub use client::{
    CONTRIBUTOR_PAGE_SIZE, Client, Contributor, Issue, IssueState, LicenseDetail, MAX_ISSUE_PAGES, Readme, RepoLicense, Repository,
};
pub use quota::QuotaStatus;
pub use resilient_http::{RetryPolicy, resilient_get};
