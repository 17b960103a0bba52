use crate::Result;
use crate::hosting::{Client, Issue};
use crate::identity::RepositoryIdentity;
use std::sync::Arc;
use tokio::sync::OnceCell;
use url::Url;

/// Everything an evaluator may consult, built once per run and passed down explicitly.
///
/// The issue listing is fetched at most once per context and shared by the metrics
/// that read it. Use [`Self::for_package`] to get a context with an empty listing.
#[derive(Debug, Clone)]
pub struct EvalContext {
    pub client: Client,
    pub approved_licenses: Arc<[String]>,
    issues: OnceCell<(Url, Arc<[Issue]>)>,
}

impl EvalContext {
    #[must_use]
    pub fn new(client: Client, approved_licenses: impl IntoIterator<Item = String>) -> Self {
        Self {
            client,
            approved_licenses: approved_licenses.into_iter().collect(),
            issues: OnceCell::new(),
        }
    }

    /// Same client and licenses, nothing fetched yet.
    #[must_use]
    pub fn for_package(&self) -> Self {
        Self {
            client: self.client.clone(),
            approved_licenses: Arc::clone(&self.approved_licenses),
            issues: OnceCell::new(),
        }
    }

    /// Issues and pull requests of `repo`, fetched on first use.
    ///
    /// A failed fetch is not remembered. Asking for a repository other than the one
    /// already listed goes straight to the client.
    pub async fn issues(&self, repo: &RepositoryIdentity) -> Result<Arc<[Issue]>> {
        let (listed, issues) = self
            .issues
            .get_or_try_init(|| async {
                let issues = self.client.issues(repo.owner(), repo.name()).await?;
                Ok::<_, ohno::AppError>((repo.canonical_url().clone(), Arc::from(issues)))
            })
            .await?;

        if listed == repo.canonical_url() {
            Ok(Arc::clone(issues))
        } else {
            Ok(Arc::from(self.client.issues(repo.owner(), repo.name()).await?))
        }
    }
}
