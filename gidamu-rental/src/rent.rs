//! Per-item rent action.

use crate::portal::Portal;
use gidamu_common::GidamuError;
use gidamu_config::PacingConfig;
use gidamu_drivers::gidamu_browser::{page::Page, DriverError};
use std::time::Duration;
use tracing::{debug, info};

/// Rent a single chapter: navigate to its page, wait for the rent control,
/// click it, accept the confirmation dialog when one appears, then pause.
///
/// The trailing pause is deliberate pacing between rentals, not
/// synchronization.
pub async fn rent_one(
    page: &Page,
    portal: &dyn Portal,
    link: &str,
    pacing: &PacingConfig,
) -> Result<(), GidamuError> {
    let deadline = Duration::from_secs(pacing.wait_timeout_secs);

    page.goto(link).await.map_err(|e| rent_err(link, e))?;

    let control = portal
        .locate_action_control(page, deadline)
        .await
        .map_err(|e| rent_err(link, e))?;
    control.click().await.map_err(|e| rent_err(link, e))?;

    // Some titles interpose a confirmation dialog before the rental lands.
    let confirm_deadline = Duration::from_secs(pacing.confirm_wait_secs);
    if let Some(confirm) = portal.locate_confirm_control(page, confirm_deadline).await {
        confirm.click().await.map_err(|e| rent_err(link, e))?;
        debug!(target: "rental.rent", %link, "confirmation dialog accepted");
    }

    page.pacer()
        .pause(Duration::from_secs(pacing.post_rent_delay_secs))
        .await;

    info!(target: "rental.rent", %link, "chapter rented");
    Ok(())
}

fn rent_err(link: &str, err: DriverError) -> GidamuError {
    GidamuError::Rent {
        link: link.to_string(),
        reason: err.to_string(),
    }
}
