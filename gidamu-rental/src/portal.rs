//! Capability surface over the storefront's pages.
//!
//! Every element lookup the workflow performs goes through [`Portal`], so a
//! site-layout change means updating the configured selectors (or this one
//! adapter), never the control flow.

use async_trait::async_trait;
use gidamu_config::Selectors;
use gidamu_drivers::gidamu_browser::{
    page::{Page, PageElement, Selector},
    DriverError,
};
use std::time::Duration;
use tracing::warn;

/// The login controls, located together.
pub struct LoginControls {
    pub username: PageElement,
    pub password: PageElement,
    pub submit: PageElement,
}

/// A notification row as extracted from the page, before parsing.
#[derive(Debug, Clone)]
pub struct RawNotification {
    pub timestamp_text: String,
    pub link: String,
}

#[async_trait]
pub trait Portal: Send + Sync {
    /// Locate the identifier, secret, and submit controls on the login page.
    async fn locate_login_controls(
        &self,
        page: &Page,
        deadline: Duration,
    ) -> Result<LoginControls, DriverError>;

    /// Block until the post-login marker element is present.
    async fn await_login_marker(&self, page: &Page, deadline: Duration)
        -> Result<(), DriverError>;

    /// Wait for the notification list container, then extract the visible
    /// rows. Rows missing a timestamp or link are logged and skipped; the
    /// extraction carries on with the rest.
    async fn locate_notification_list(
        &self,
        page: &Page,
        deadline: Duration,
    ) -> Result<Vec<RawNotification>, DriverError>;

    /// Locate the rent control on an item page.
    async fn locate_action_control(
        &self,
        page: &Page,
        deadline: Duration,
    ) -> Result<PageElement, DriverError>;

    /// Locate the confirmation control some titles interpose after the rent
    /// click. Absence is normal, so this never fails.
    async fn locate_confirm_control(&self, page: &Page, deadline: Duration)
        -> Option<PageElement>;
}

/// [`Portal`] implementation for the Ridibooks layout, driven entirely by
/// the configured selector set.
pub struct RidiPortal {
    username_field: Selector,
    password_field: Selector,
    submit: Selector,
    login_marker: Selector,
    notification_list: Selector,
    notification_item: Selector,
    entry_timestamp: Selector,
    entry_link: Selector,
    rent_control: Selector,
    confirm_control: Selector,
}

impl RidiPortal {
    pub fn new(selectors: &Selectors) -> Self {
        Self {
            username_field: Selector::parse(&selectors.username_field),
            password_field: Selector::parse(&selectors.password_field),
            submit: Selector::parse(&selectors.submit),
            login_marker: Selector::parse(&selectors.login_marker),
            notification_list: Selector::parse(&selectors.notification_list),
            notification_item: Selector::parse(&selectors.notification_item),
            entry_timestamp: Selector::parse(&selectors.entry_timestamp),
            entry_link: Selector::parse(&selectors.entry_link),
            rent_control: Selector::parse(&selectors.rent_control),
            confirm_control: Selector::parse(&selectors.confirm_control),
        }
    }
}

#[async_trait]
impl Portal for RidiPortal {
    async fn locate_login_controls(
        &self,
        page: &Page,
        deadline: Duration,
    ) -> Result<LoginControls, DriverError> {
        // Only the first field gets the bounded wait; once the form has
        // rendered the remaining controls are immediate lookups.
        let username = page.wait_for(&self.username_field, deadline).await?;
        let password = page.find(&self.password_field).await?;
        let submit = page.find(&self.submit).await?;
        Ok(LoginControls {
            username,
            password,
            submit,
        })
    }

    async fn await_login_marker(
        &self,
        page: &Page,
        deadline: Duration,
    ) -> Result<(), DriverError> {
        page.wait_for(&self.login_marker, deadline).await?;
        Ok(())
    }

    async fn locate_notification_list(
        &self,
        page: &Page,
        deadline: Duration,
    ) -> Result<Vec<RawNotification>, DriverError> {
        page.wait_for(&self.notification_list, deadline).await?;
        let items = page.find_all(&self.notification_item).await?;

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match extract_row(item, &self.entry_timestamp, &self.entry_link).await {
                Ok(row) => rows.push(row),
                Err(err) => {
                    warn!(target: "rental.scan", index, %err, "skipping notification entry")
                }
            }
        }
        Ok(rows)
    }

    async fn locate_action_control(
        &self,
        page: &Page,
        deadline: Duration,
    ) -> Result<PageElement, DriverError> {
        page.wait_for(&self.rent_control, deadline).await
    }

    async fn locate_confirm_control(
        &self,
        page: &Page,
        deadline: Duration,
    ) -> Option<PageElement> {
        page.wait_for(&self.confirm_control, deadline).await.ok()
    }
}

async fn extract_row(
    item: &PageElement,
    timestamp_selector: &Selector,
    link_selector: &Selector,
) -> Result<RawNotification, DriverError> {
    let timestamp_text = item.find(timestamp_selector).await?.text().await?;
    let link = item
        .find(link_selector)
        .await?
        .attr("href")
        .await?
        .ok_or_else(|| DriverError::NotFound {
            selector: format!("{link_selector}[href]"),
        })?;
    Ok(RawNotification {
        timestamp_text,
        link,
    })
}
