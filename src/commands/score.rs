use super::Host;
use super::common::{LogArgs, init_logging};
use crate::Result;
use crate::batch::{BatchOutcome, BatchRunner, QUOTA_EXHAUSTED_EXIT_CODE, parse_references};
use crate::config::Config;
use crate::hosting::Client;
use crate::identity::Resolver;
use crate::metrics::EvalContext;
use crate::scoring::Aggregator;
use crate::sink::{JsonLinesSink, MemorySink};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// File listing one package reference (GitHub or npm URL) per line
    #[arg(value_name = "URL_FILE")]
    pub url_file: Utf8PathBuf,

    /// Path to configuration file (default is `trustscore.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// Append a JSON record per scored package to this file
    #[arg(long, value_name = "PATH")]
    pub records: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub logging: LogArgs,
}

pub async fn process_score<H: Host>(host: &mut H, args: &ScoreArgs) -> Result<()> {
    init_logging(&args.logging)?;

    let (config, warnings) = Config::load(Utf8Path::new("."), args.config.as_deref())?;
    for warning in &warnings {
        let _ = writeln!(host.error(), "warning: {warning}");
    }

    let text = fs::read_to_string(&args.url_file).into_app_err_with(|| format!("reading package references from {}", args.url_file))?;
    let refs = parse_references(&text);

    let client = Client::new(args.github_token.as_deref(), config.github_api_url.as_str())?;
    let ctx = EvalContext::new(client, config.approved_licenses.iter().cloned());
    let runner = BatchRunner::new(
        Resolver::new(config.npm_registry_url.as_str())?,
        Aggregator::new(ctx),
        config.internal_domain().map(String::from),
    );

    let outcome = if let Some(path) = &args.records {
        let mut sink = JsonLinesSink::open(path)?;
        runner.run(&refs, &mut sink, &mut host.output()).await?
    } else {
        let mut sink = MemorySink::new();
        runner.run(&refs, &mut sink, &mut host.output()).await?
    };

    report_outcome(host, &outcome);
    Ok(())
}

fn report_outcome<H: Host>(host: &mut H, outcome: &BatchOutcome) {
    let _ = writeln!(host.error(), "processed {} package(s), skipped {}", outcome.processed, outcome.skipped);

    if let Some(reason) = &outcome.stopped {
        let _ = writeln!(host.error(), "stopped early: {reason}, {} package(s) not attempted", outcome.not_attempted);
        host.exit(QUOTA_EXHAUSTED_EXIT_CODE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::scoring::StopReason;

    #[test]
    fn test_report_outcome_completed() {
        let mut host = TestHost::new();
        report_outcome(
            &mut host,
            &BatchOutcome {
                processed: 3,
                skipped: 1,
                ..BatchOutcome::default()
            },
        );

        assert_eq!(String::from_utf8_lossy(&host.error_buf), "processed 3 package(s), skipped 1\n");
        assert_eq!(host.exit_code, None);
    }

    #[test]
    fn test_report_outcome_quota_exhausted() {
        let mut host = TestHost::new();
        report_outcome(
            &mut host,
            &BatchOutcome {
                processed: 1,
                skipped: 0,
                not_attempted: 4,
                stopped: Some(StopReason::QuotaExhausted),
            },
        );

        assert!(
            String::from_utf8_lossy(&host.error_buf).contains("stopped early: API quota exhausted, 4 package(s) not attempted")
        );
        assert_eq!(host.exit_code, Some(QUOTA_EXHAUSTED_EXIT_CODE));
    }

    #[test]
    fn test_report_outcome_quota_unavailable_names_cause() {
        let mut host = TestHost::new();
        report_outcome(
            &mut host,
            &BatchOutcome {
                not_attempted: 2,
                stopped: Some(StopReason::QuotaUnavailable("HTTP status client error (401 Unauthorized)".to_string())),
                ..BatchOutcome::default()
            },
        );

        let stderr = String::from_utf8_lossy(&host.error_buf);
        assert!(stderr.contains("stopped early: API quota unavailable (HTTP status client error (401 Unauthorized))"));
        assert!(!stderr.contains("exhausted"));
        assert_eq!(host.exit_code, Some(QUOTA_EXHAUSTED_EXIT_CODE));
    }
}
