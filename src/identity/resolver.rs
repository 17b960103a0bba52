use super::RepositoryIdentity;
use crate::Result;
use crate::hosting::{RetryPolicy, resilient_get};
use ohno::{IntoAppError, app_err, bail};
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use url::Url;

const LOG_TARGET: &str = "  identity";

/// Version recorded for packages referenced directly by their repository.
pub const HEAD_VERSION: &str = "HEAD";

/// Version recorded when the registry does not name a valid latest release.
pub const LATEST_VERSION: &str = "latest";

/// Repository URL forms found in npm metadata, e.g. `git+https://github.com/o/r.git`,
/// `git@github.com:o/r.git` or `git+ssh://git@github.com/o/r`.
static GITHUB_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:git\+)?(?:(?:https?|git|ssh)://)?(?:[\w.-]+@)?(?:www\.)?github\.com[/:]([\w.-]+)/([\w.-]+?)(?:\.git)?/?(?:[#?].*)?$")
        .expect("invalid regex")
});

/// npm shorthand forms: `github:o/r` and bare `o/r`.
static GITHUB_SHORTHAND_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:github:)?([\w.-]+)/([\w.-]+?)(?:\.git)?(?:#.*)?$").expect("invalid regex"));

/// A batch entry turned into something the aggregator can score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub identity: RepositoryIdentity,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
struct Packument {
    #[serde(default)]
    repository: Option<NpmRepository>,
    #[serde(default, rename = "dist-tags")]
    dist_tags: Option<DistTags>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmRepository {
    Url(String),
    Detailed { url: String },
}

impl NpmRepository {
    fn url(&self) -> &str {
        match self {
            Self::Url(url) | Self::Detailed { url } => url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DistTags {
    latest: Option<String>,
}

/// Turns package references (GitHub or npm URLs) into repository identities.
#[derive(Debug, Clone)]
pub struct Resolver {
    http: reqwest::Client,
    registry_url: Arc<str>,
    retry: RetryPolicy,
}

impl Resolver {
    pub fn new(registry_url: impl Into<String>) -> Result<Self> {
        let registry_url: String = registry_url.into();

        Ok(Self {
            http: reqwest::Client::builder().user_agent("trustscore").build()?,
            registry_url: Arc::from(registry_url.trim_end_matches('/')),
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy applied to registry lookups
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn resolve(&self, reference: &str) -> Result<ResolvedPackage> {
        let url = Url::parse(reference).into_app_err_with(|| format!("unresolvable reference '{reference}': not a URL"))?;

        match url.host_str() {
            Some("github.com" | "www.github.com") => {
                let identity = RepositoryIdentity::parse(&url, reference)?;
                Ok(ResolvedPackage {
                    name: identity.name().to_string(),
                    version: HEAD_VERSION.to_string(),
                    identity,
                })
            }
            Some("npmjs.com" | "www.npmjs.com") => {
                let Some(name) = npm_package_name(&url) else {
                    bail!("unresolvable reference '{reference}': not an npm package page");
                };
                self.resolve_npm(&name, reference).await
            }
            _ => bail!("unresolvable reference '{reference}': unsupported host"),
        }
    }

    async fn resolve_npm(&self, name: &str, reference: &str) -> Result<ResolvedPackage> {
        let url = format!("{}/{}", self.registry_url, name.replace('/', "%2F"));
        log::debug!(target: LOG_TARGET, "Querying npm registry for '{name}'");

        let packument: Packument = resilient_get(&self.http, &url, self.retry)
            .await
            .into_app_err_with(|| format!("querying npm registry for '{name}'"))?
            .error_for_status()
            .into_app_err_with(|| format!("unresolvable reference '{reference}': npm registry lookup failed"))?
            .json()
            .await
            .into_app_err_with(|| format!("parsing npm registry metadata for '{name}'"))?;

        let raw_repo = packument
            .repository
            .as_ref()
            .map(NpmRepository::url)
            .ok_or_else(|| app_err!("unresolvable reference '{reference}': npm package '{name}' declares no repository"))?;

        let repo_url = normalize_repository_url(raw_repo)
            .ok_or_else(|| app_err!("unresolvable reference '{reference}': repository '{raw_repo}' is not hosted on GitHub"))?;

        let identity = RepositoryIdentity::parse(&repo_url, reference)?;

        let version = packument
            .dist_tags
            .and_then(|tags| tags.latest)
            .filter(|v| semver::Version::parse(v).is_ok())
            .unwrap_or_else(|| LATEST_VERSION.to_string());

        log::debug!(target: LOG_TARGET, "Resolved npm package '{name}@{version}' to {}", identity.canonical_url());

        Ok(ResolvedPackage {
            identity,
            name: name.to_string(),
            version,
        })
    }
}

/// Extract the package name from an npm package page URL, scoped names included.
fn npm_package_name(url: &Url) -> Option<String> {
    let segments: Vec<_> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["package", scope, name, ..] if scope.starts_with('@') => Some(format!("{scope}/{name}")),
        ["package", name, ..] if !name.starts_with('@') => Some((*name).to_string()),
        _ => None,
    }
}

/// Normalize the many spellings of a GitHub repository URL to `https://github.com/owner/repo`.
#[must_use]
pub fn normalize_repository_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    let caps = GITHUB_URL_REGEX
        .captures(raw)
        .or_else(|| (!raw.contains("://")).then(|| GITHUB_SHORTHAND_REGEX.captures(raw)).flatten())?;

    Url::parse(&format!("https://github.com/{}/{}", &caps[1], &caps[2])).ok()
}
