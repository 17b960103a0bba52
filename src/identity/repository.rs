use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use std::sync::Arc;
use url::Url;

/// Hosts whose repository URLs can be scored.
const RECOGNIZED_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// Immutable identity of one scored repository.
///
/// `origin_url` keeps the reference exactly as it was given (an npm page, say),
/// while `canonical_url` is the cleaned `https://github.com/owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryIdentity {
    owner: Arc<str>,
    name: Arc<str>,
    canonical_url: Arc<Url>,
    origin_url: Arc<str>,
}

impl RepositoryIdentity {
    pub fn parse(url: &Url, origin_url: &str) -> Result<Self> {
        let host = url.host_str().unwrap_or_default();
        if !RECOGNIZED_HOSTS.contains(&host) {
            bail!("unsupported repository host '{host}' in {url}");
        }

        let path_segments: Vec<_> = url.path_segments().map(Iterator::collect).unwrap_or_default();

        if path_segments.len() < 2 {
            bail!("invalid repository URL format: {url}");
        }

        let owner = path_segments[0];
        let name = path_segments[1].trim_end_matches(".git");

        if owner.is_empty() || name.is_empty() {
            bail!("invalid repository URL: empty owner or repository name: {url}");
        }

        let canonical_url = Url::parse(&format!("https://github.com/{owner}/{name}")).into_app_err("reconstructing repository URL")?;

        Ok(Self {
            owner: Arc::from(owner),
            name: Arc::from(name),
            canonical_url: Arc::new(canonical_url),
            origin_url: Arc::from(origin_url),
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn canonical_url(&self) -> &Url {
        &self.canonical_url
    }

    #[must_use]
    pub fn origin_url(&self) -> &str {
        &self.origin_url
    }
}

impl Display for RepositoryIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
