//! Notification scan: extraction, timestamp parsing, and filtering.

use crate::portal::Portal;
use crate::timestamps;
use chrono::{DateTime, Duration, Local};
use gidamu_common::GidamuError;
use gidamu_config::{PacingConfig, ScanConfig, SiteConfig};
use gidamu_drivers::gidamu_browser::page::Page;
use tracing::{info, warn};

/// A notification entry with its timestamp resolved.
#[derive(Debug, Clone)]
pub struct Notification {
    pub occurred_at: DateTime<Local>,
    pub link: String,
}

/// Keep the links of entries no older than `window` whose link contains
/// `marker`, preserving the page order.
pub fn filter_notifications(
    entries: &[Notification],
    now: DateTime<Local>,
    window: Duration,
    marker: &str,
) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| now.signed_duration_since(entry.occurred_at) <= window)
        .filter(|entry| entry.link.contains(marker))
        .map(|entry| entry.link.clone())
        .collect()
}

/// Navigate to the notifications view and return the rentable links from
/// the configured window, in page order.
///
/// Entries whose timestamp fails to parse are logged and skipped; only a
/// failed page load or container wait aborts the scan.
pub async fn collect_rentable(
    page: &Page,
    portal: &dyn Portal,
    site: &SiteConfig,
    scan: &ScanConfig,
    pacing: &PacingConfig,
) -> Result<Vec<String>, GidamuError> {
    let deadline = std::time::Duration::from_secs(pacing.wait_timeout_secs);

    page.goto(&site.notifications_url)
        .await
        .map_err(|e| GidamuError::Scan(e.to_string()))?;

    let rows = portal
        .locate_notification_list(page, deadline)
        .await
        .map_err(|e| GidamuError::Scan(e.to_string()))?;

    let now = Local::now();
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        match timestamps::parse_notification_time(&row.timestamp_text, now) {
            Ok(occurred_at) => entries.push(Notification {
                occurred_at,
                link: row.link,
            }),
            Err(err) => {
                warn!(target: "rental.scan", %err, "skipping entry with unparseable timestamp")
            }
        }
    }

    let links = filter_notifications(
        &entries,
        now,
        Duration::hours(scan.window_hours),
        &scan.content_marker,
    );
    info!(
        target: "rental.scan",
        entries = entries.len(),
        matched = links.len(),
        window_hours = scan.window_hours,
        "notification scan complete"
    );
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(now: DateTime<Local>, age: Duration, link: &str) -> Notification {
        Notification {
            occurred_at: now - age,
            link: link.to_string(),
        }
    }

    #[test]
    fn keeps_only_in_window_marker_links_in_page_order() {
        let now = Local::now();
        let entries = vec![
            entry(now, Duration::hours(1), "https://ridibooks.com/webnovel/5"),
            entry(now, Duration::hours(30), "https://ridibooks.com/webnovel/6"),
            entry(now, Duration::hours(2), "https://ridibooks.com/comic/9"),
        ];

        let links = filter_notifications(&entries, now, Duration::hours(24), "webnovel");
        assert_eq!(links, vec!["https://ridibooks.com/webnovel/5".to_string()]);
    }

    #[test]
    fn order_is_preserved_for_multiple_matches() {
        let now = Local::now();
        let entries = vec![
            entry(now, Duration::hours(3), "https://ridibooks.com/webnovel/c"),
            entry(now, Duration::minutes(10), "https://ridibooks.com/webnovel/a"),
            entry(now, Duration::hours(23), "https://ridibooks.com/webnovel/b"),
        ];

        let links = filter_notifications(&entries, now, Duration::hours(24), "webnovel");
        assert_eq!(
            links,
            vec![
                "https://ridibooks.com/webnovel/c".to_string(),
                "https://ridibooks.com/webnovel/a".to_string(),
                "https://ridibooks.com/webnovel/b".to_string(),
            ]
        );
    }

    #[test]
    fn boundary_entry_exactly_at_the_window_edge_is_kept() {
        let now = Local::now();
        let entries = vec![entry(
            now,
            Duration::hours(24),
            "https://ridibooks.com/webnovel/edge",
        )];

        let links = filter_notifications(&entries, now, Duration::hours(24), "webnovel");
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn empty_input_yields_no_links() {
        let now = Local::now();
        let links = filter_notifications(&[], now, Duration::hours(24), "webnovel");
        assert!(links.is_empty());
    }
}
