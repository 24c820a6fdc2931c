//! The scan command: gathers inputs, runs a session, prints the report.

use super::{prompt_missing, Cli, OutputFormat};
use crate::config::Settings;
use crate::error::{CliError, CliResult, ConfigError};
use crate::output;
use crate::scanner::{ScanConfig, Session, TcpProber};
use crate::types::{parse_targets, PortSet};
use std::future::Future;
use std::io;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run a scan as described by the command line.
///
/// Returns `Err(CliError::Config(_))` before any probe is sent when the
/// inputs leave nothing to scan. An interrupted scan still prints its
/// partial report and succeeds.
pub async fn execute(cli: &Cli) -> CliResult<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    let chatty = !cli.quiet && cli.output == OutputFormat::Plain;

    let targets_input = prompt_missing(
        cli.targets.as_deref(),
        "Enter target(s) to scan (comma-separated):",
    )?;
    let ports_input = prompt_missing(
        cli.ports.as_deref().or(settings.ports.as_deref()),
        "Enter ports (e.g., 1-1000, 80,443,8080):",
    )?;

    let (targets, rejected_targets) = parse_targets(&targets_input);
    for e in &rejected_targets {
        output::print_warning(&e.to_string());
    }
    if targets.is_empty() {
        return Err(ConfigError::NoTargets.into());
    }

    let parsed = PortSet::parse(&ports_input);
    for e in &parsed.rejected {
        output::print_warning(&e.to_string());
    }
    let ports = parsed.ports;
    if ports.is_empty() {
        return Err(ConfigError::NoPorts.into());
    }

    let config = settings
        .scan_config(timeout_flag(cli.timeout)?, cli.workers)?
        .with_progress(chatty && settings.progress && !cli.no_progress);

    run(cli, targets, ports, config, chatty).await
}

async fn run(
    cli: &Cli,
    targets: Vec<String>,
    ports: PortSet,
    config: ScanConfig,
    chatty: bool,
) -> CliResult<()> {
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if watch_interrupts(cancel, tokio::signal::ctrl_c).await {
                process::exit(130);
            }
        });
    }

    if chatty {
        output::print_banner();
        if targets.len() > 1 {
            output::print_info(&format!("Scanning {} targets", targets.len()));
        }
    }

    info!(
        targets = targets.len(),
        ports = ports.len(),
        workers = config.workers(),
        timeout_ms = config.timeout().as_millis() as u64,
        "starting session"
    );

    let prober = Arc::new(TcpProber::new(config.timeout()));
    let session = Session::new(config, prober).with_cancellation(cancel);

    if chatty {
        if let Some(first) = targets.first() {
            output::print_scan_header(first, ports.len());
        }
    }

    let mut next = 0;
    let report = session
        .run_with(&targets, &ports, |result| {
            next += 1;
            if chatty {
                output::print_target_summary(result);
                if let Some(upcoming) = targets.get(next) {
                    if !session.cancellation_token().is_cancelled() {
                        output::print_scan_header(upcoming, ports.len());
                    }
                }
            }
        })
        .await;

    if report.interrupted && chatty {
        output::print_error("Scan interrupted by user");
    }

    output::print_report(&report, cli.output)
}

/// Cancel the session on the first interrupt. Returns `true` once a second
/// interrupt arrives, meaning the user wants out without a report.
async fn watch_interrupts<F, Fut>(cancel: CancellationToken, mut next_signal: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if next_signal().await.is_err() {
        return false;
    }
    output::print_warning("Interrupted, finishing in-flight probes (Ctrl-C again to abort)");
    cancel.cancel();

    next_signal().await.is_ok()
}

fn timeout_flag(seconds: Option<f64>) -> CliResult<Option<Duration>> {
    match seconds {
        None => Ok(None),
        Some(s) => Duration::try_from_secs_f64(s)
            .map(Some)
            .map_err(|_| CliError::Config(ConfigError::InvalidTimeout)),
    }
}
