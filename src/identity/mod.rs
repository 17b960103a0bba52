//! Package identity.
//!
//! Turns batch references into [`RepositoryIdentity`] values and classifies
//! them as internal or external.

mod internal;
mod repository;
mod resolver;

pub use internal::is_internal;
pub use repository::RepositoryIdentity;
pub use resolver::{HEAD_VERSION, LATEST_VERSION, ResolvedPackage, Resolver, normalize_repository_url};
