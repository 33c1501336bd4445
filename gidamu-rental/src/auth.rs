//! Login step: credential entry and post-login confirmation.

use crate::portal::Portal;
use gidamu_common::GidamuError;
use gidamu_config::{AccountConfig, PacingConfig, SiteConfig};
use gidamu_drivers::gidamu_browser::{page::Page, DriverError};
use std::time::Duration;
use tracing::info;

/// Navigate to the login page, enter the credentials with paced keystrokes,
/// submit, and block until the post-login marker appears.
///
/// Any missing control or elapsed wait is fatal for the run; login has no
/// partial success.
pub async fn login(
    page: &Page,
    portal: &dyn Portal,
    site: &SiteConfig,
    account: &AccountConfig,
    pacing: &PacingConfig,
) -> Result<(), GidamuError> {
    let deadline = Duration::from_secs(pacing.wait_timeout_secs);

    page.goto(&site.login_url).await.map_err(auth_err)?;

    let controls = portal
        .locate_login_controls(page, deadline)
        .await
        .map_err(auth_err)?;
    controls
        .username
        .type_paced(&account.username)
        .await
        .map_err(auth_err)?;
    controls
        .password
        .type_paced(&account.password)
        .await
        .map_err(auth_err)?;
    controls.submit.click().await.map_err(auth_err)?;

    portal
        .await_login_marker(page, deadline)
        .await
        .map_err(auth_err)?;

    info!(target: "rental.auth", "login confirmed");
    Ok(())
}

fn auth_err(err: DriverError) -> GidamuError {
    GidamuError::Auth(err.to_string())
}
