//! Run configuration.

#[expect(clippy::module_inception, reason = "the type lives in a file of its own")]
mod config;

pub use config::{CONFIG_FILE_NAMES, Config, DEFAULT_GITHUB_API_URL, DEFAULT_NPM_REGISTRY_URL};
