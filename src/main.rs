//! A tool to score the trustworthiness of open-source packages.
//!
//! # Overview
//!
//! `trustscore` reads a list of package references, one per line, and scores each
//! package on five sub-metrics drawn from its GitHub repository:
//!
//! - **RampUp**: how much documentation a newcomer finds
//! - **BusFactor**: how widely contributions are spread
//! - **Correctness**: what share of reported issues got resolved
//! - **License**: whether the license is on the approved list
//! - **Maintainability**: how quickly issues and pull requests get closed
//!
//! The sub-metrics are combined into a weighted net score in `[0, 1]`.
//!
//! # Usage
//!
//! ```bash
//! export GITHUB_TOKEN=ghp_xxxxxxxxxxxxxxxxxxxx
//! trustscore score urls.txt
//! trustscore score urls.txt --records scores.jsonl --log-level info
//! ```
//!
//! References may be GitHub repository URLs or npm package pages:
//!
//! ```text
//! https://github.com/cloudinary/cloudinary_npm
//! https://www.npmjs.com/package/express
//! ```
//!
//! Each scored package produces one JSON line on stdout:
//!
//! ```json
//! {"URL":"https://www.npmjs.com/package/express","NetScore":0.712,"NetScore_Latency":1.204,"RampUp":0.74,...}
//! ```
//!
//! # Exit codes
//!
//! - `0`: every reference was handled (some may have been skipped)
//! - `1`: a fatal error, such as an unreadable input or configuration file
//! - `2`: the GitHub API quota ran too low to continue; results already computed were kept
//!
//! # Configuration
//!
//! `trustscore init` writes a `trustscore.toml` with the defaults:
//!
//! ```toml
//! github_api_url = "https://api.github.com"
//! npm_registry_url = "https://registry.npmjs.org"
//! internal_domain = "internal.acme.com"
//! approved_licenses = ["MIT", "Apache-2.0", "BSD-3-Clause"]
//! ```

use std::io::Write;
use std::io::{stderr, stdout};
use trustscore::{Host, run};

/// Default host that talks to the real process streams.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args()).await
}
