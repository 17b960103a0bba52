use crate::Result;
use camino::Utf8Path;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Names searched in the base directory when no configuration path is given, in order.
pub const CONFIG_FILE_NAMES: [&str; 4] = ["trustscore.toml", "trustscore.yml", "trustscore.yaml", "trustscore.json"];

const DEFAULT_APPROVED_LICENSES: &[&str] = &[
    "MIT",
    "Apache-2.0",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "ISC",
    "Zlib",
    "Unlicense",
    "0BSD",
    "LGPL-2.1-only",
    "LGPL-2.1-or-later",
    "MPL-2.0",
];

fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_npm_registry_url() -> String {
    DEFAULT_NPM_REGISTRY_URL.to_string()
}

fn default_approved_licenses() -> Vec<String> {
    DEFAULT_APPROVED_LICENSES.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the GitHub REST API
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Base URL of the npm registry used to resolve npm package pages
    #[serde(default = "default_npm_registry_url")]
    pub npm_registry_url: String,

    /// Packages whose URL contains this string are recorded as internal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_domain: Option<String>,

    /// SPDX identifiers of licenses compatible with the registry
    #[serde(default = "default_approved_licenses")]
    pub approved_licenses: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_api_url: default_github_api_url(),
            npm_registry_url: default_npm_registry_url(),
            internal_domain: None,
            approved_licenses: default_approved_licenses(),
        }
    }
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// An explicit path must exist. Otherwise the first of [`CONFIG_FILE_NAMES`] found in
    /// `base_dir` is used, and built-in defaults apply when none is present.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<(Self, Vec<String>)> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading trustscore configuration from {path}"))?;
            (path.to_path_buf(), text)
        } else {
            let mut found = None;
            for name in CONFIG_FILE_NAMES {
                let path = base_dir.join(name);
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        found = Some((path, text));
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_app_err_with(|| format!("reading trustscore configuration from {path}")),
                }
            }

            let Some(result) = found else {
                return Ok((Self::default(), Vec::new()));
            };
            result
        };

        let config = Self::parse(&final_path, &text)?;

        let mut warnings = Vec::new();
        config.validate(&mut warnings);
        Ok((config, warnings))
    }

    fn parse(path: &Utf8Path, text: &str) -> Result<Self> {
        let extension = path.extension().unwrap_or_default();
        match extension {
            "toml" => toml::from_str(text).into_app_err_with(|| format!("parsing TOML configuration from {path}")),
            "yml" | "yaml" => serde_yaml::from_str(text).into_app_err_with(|| format!("parsing YAML configuration from {path}")),
            "json" => serde_json::from_str(text).into_app_err_with(|| format!("parsing JSON configuration from {path}")),
            _ => Err(app_err!("unsupported configuration file extension: {extension}")),
        }
    }

    /// Save configuration to a file, in the format named by its extension
    pub fn save(&self, output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        let text = match extension {
            "toml" => toml::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to TOML for saving to {output_path}"))?,
            "yml" | "yaml" => serde_yaml::to_string(self)
                .into_app_err_with(|| format!("serializing configuration to YAML for saving to {output_path}"))?,
            "json" => serde_json::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to JSON for saving to {output_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        fs::write(output_path, text).into_app_err_with(|| format!("writing configuration to {output_path}"))?;
        Ok(())
    }

    /// Collect problems that do not prevent a run but probably make it useless.
    pub fn validate(&self, warnings: &mut Vec<String>) {
        if self.approved_licenses.is_empty() {
            warnings.push("approved_licenses is empty: every package will fail the license metric".to_string());
        }

        for license in &self.approved_licenses {
            if spdx::license_id(license).is_none() {
                warnings.push(format!("approved license '{license}' is not a known SPDX license identifier"));
            }
        }

        if self.internal_domain.as_deref().is_some_and(|d| d.trim().is_empty()) {
            warnings.push("internal_domain is empty: no package will be classified as internal".to_string());
        }

        for (field, value) in [("github_api_url", &self.github_api_url), ("npm_registry_url", &self.npm_registry_url)] {
            if Url::parse(value).is_err() {
                warnings.push(format!("{field} '{value}' is not a valid URL"));
            }
        }
    }

    /// The internal domain, if one is configured and non-empty.
    #[must_use]
    pub fn internal_domain(&self) -> Option<&str> {
        self.internal_domain.as_deref().filter(|d| !d.trim().is_empty())
    }
}
