//! Command-line interface for trustscore
//!
//! Two commands are available:
//!
//! - **score**: read package references from a file, score each one and print a
//!   JSON summary line per package, optionally recording results to a file
//! - **init**: write the default configuration file
//!
//! All output goes through a [`Host`] so the whole CLI can be driven from tests.

mod common;
mod host;
mod init;
mod run;
mod score;

pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use score::{ScoreArgs, process_score};
