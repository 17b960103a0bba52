//! Logging setup shared by the commands.

use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use ohno::IntoAppError;
use std::fs::OpenOptions;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,

    /// Append diagnostic output to this file instead of stderr
    #[arg(long, value_name = "PATH", env = "LOG_FILE", global = true)]
    pub log_file: Option<Utf8PathBuf>,
}

/// Install the process logger.
///
/// Only the first call in a process takes effect; later calls are ignored.
pub fn init_logging(args: &LogArgs) -> Result<()> {
    let level = match args.log_level {
        LogLevel::None => return Ok(()),
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let mut builder = env_logger::Builder::from_env(env);
    let _ = builder
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(args.log_level, LogLevel::Debug | LogLevel::Trace));

    if let Some(path) = &args.log_file {
        let _ = builder.target(env_logger::Target::Pipe(Box::new(open_log_file(path)?)));
    }

    let _ = builder.try_init();
    Ok(())
}

fn open_log_file(path: &Utf8Path) -> Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .into_app_err_with(|| format!("opening log file {path}"))
}
