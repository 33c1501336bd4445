use anyhow::Result;
use clap::Parser;
use gidamu_common::observability::{init_logging, LogConfig};
use gidamu_config::{GidamuConfigLoader, RentalConfig};
use gidamu_notify::TelegramNotifier;
use gidamu_rental::run::{run, RunReport};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Automated wait-for-free chapter rental.
#[derive(Debug, Parser)]
#[command(name = "gidamu", version)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "gidamu.yaml")]
    config: PathBuf,

    /// Override the configured headless setting.
    #[arg(long)]
    headless: Option<bool>,

    /// Authenticate and scan, but perform no rent clicks.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first (env wins over the file), then logging.
    let mut cfg: RentalConfig = GidamuConfigLoader::new().with_file(&cli.config).load()?;
    if let Some(headless) = cli.headless {
        cfg.browser.headless = headless;
    }

    let log_path = init_logging(LogConfig {
        emit_stderr: true,
        ..LogConfig::default()
    })?;
    info!(
        target: "rental.run",
        log = %log_path.display(),
        config = %cli.config.display(),
        dry_run = cli.dry_run,
        "starting run"
    );

    let notifier = build_notifier(&cfg);

    match run(&cfg, cli.dry_run).await {
        Ok(report) => {
            let summary = summary_text(&report, cli.dry_run);
            info!(target: "rental.run", %summary, "finished");
            notify(notifier.as_ref(), &summary).await;
            Ok(())
        }
        Err(err) => {
            error!(target: "rental.run", %err, "run aborted");
            notify(notifier.as_ref(), &format!("gidamu run aborted: {err}")).await;
            Err(err.into())
        }
    }
}

fn build_notifier(cfg: &RentalConfig) -> Option<TelegramNotifier> {
    let telegram = cfg.telegram.as_ref()?;
    match TelegramNotifier::new(&telegram.bot_token, &telegram.chat_id) {
        Ok(notifier) => Some(notifier),
        Err(err) => {
            warn!(target: "notify.telegram", %err, "notifier disabled");
            None
        }
    }
}

/// Deliver a notification when a notifier is configured. Delivery failures
/// are logged and dropped; they never change the exit status.
async fn notify(notifier: Option<&TelegramNotifier>, text: &str) {
    if let Some(notifier) = notifier {
        if let Err(err) = notifier.send(text).await {
            warn!(target: "notify.telegram", %err, "run notification failed");
        }
    }
}

fn summary_text(report: &RunReport, dry_run: bool) -> String {
    if dry_run {
        format!("gidamu dry run: {} rentable link(s) found", report.matched)
    } else {
        format!(
            "gidamu run complete: matched {}, rented {}, failed {}",
            report.matched, report.rented, report.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_all_outcomes() {
        let report = RunReport {
            matched: 3,
            rented: 2,
            failed: 1,
        };
        assert_eq!(
            summary_text(&report, false),
            "gidamu run complete: matched 3, rented 2, failed 1"
        );
    }

    #[test]
    fn dry_run_summary_reports_matches_only() {
        let report = RunReport {
            matched: 2,
            rented: 0,
            failed: 0,
        };
        assert_eq!(
            summary_text(&report, true),
            "gidamu dry run: 2 rentable link(s) found"
        );
    }
}
