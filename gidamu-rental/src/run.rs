//! Top-level run: validate, launch, drive the steps, always close.

use crate::{auth, portal::RidiPortal, rent, scan};
use gidamu_common::GidamuError;
use gidamu_config::RentalConfig;
use gidamu_drivers::gidamu_browser::{driver::SessionDriver, launch::BrowserOptions};
use tracing::{error, info, warn};

/// Counters for one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Links that survived the window + content-marker filter.
    pub matched: usize,
    /// Links rented successfully.
    pub rented: usize,
    /// Links whose rent action failed (run still completes).
    pub failed: usize,
}

/// Execute the whole workflow.
///
/// Configuration is validated before any browser work, so a missing
/// credential never launches a session. Once the session exists it is
/// closed on every exit path; a close failure is logged and never masks
/// the step outcome.
pub async fn run(cfg: &RentalConfig, dry_run: bool) -> Result<RunReport, GidamuError> {
    cfg.validate()
        .map_err(|e| GidamuError::Config(e.to_string()))?;

    let driver = SessionDriver::launch(&browser_options(cfg))
        .await
        .map_err(|e| GidamuError::Session(e.to_string()))?;

    let outcome = drive(&driver, cfg, dry_run).await;

    match driver.close().await {
        Ok(()) => info!(target: "rental.run", "browser session closed"),
        Err(err) => warn!(target: "rental.run", %err, "browser session close failed"),
    }

    outcome
}

fn browser_options(cfg: &RentalConfig) -> BrowserOptions {
    BrowserOptions {
        webdriver_url: cfg.browser.webdriver_url.clone(),
        headless: cfg.browser.headless,
        user_agent: cfg.browser.user_agent.clone(),
        window: (cfg.browser.window_width, cfg.browser.window_height),
    }
}

async fn drive(
    driver: &SessionDriver,
    cfg: &RentalConfig,
    dry_run: bool,
) -> Result<RunReport, GidamuError> {
    let page = driver.page();
    let portal = RidiPortal::new(&cfg.site.selectors);

    auth::login(&page, &portal, &cfg.site, &cfg.account, &cfg.pacing).await?;

    let links = scan::collect_rentable(&page, &portal, &cfg.site, &cfg.scan, &cfg.pacing).await?;

    let mut report = RunReport {
        matched: links.len(),
        ..RunReport::default()
    };

    if dry_run {
        info!(target: "rental.run", matched = report.matched, "dry run: skipping rentals");
        return Ok(report);
    }

    // One failing link does not abort the rest; the failure is counted and
    // the loop moves on.
    for link in &links {
        match rent::rent_one(&page, &portal, link, &cfg.pacing).await {
            Ok(()) => report.rented += 1,
            Err(err) => {
                error!(target: "rental.rent", %link, %err, "rental failed; continuing");
                report.failed += 1;
            }
        }
    }

    info!(
        target: "rental.run",
        matched = report.matched,
        rented = report.rented,
        failed = report.failed,
        "run complete"
    );
    Ok(report)
}
