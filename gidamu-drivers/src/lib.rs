//! Driver layer for browser automation.
//!
//! This crate wraps the WebDriver client used by the rental workflow and is
//! the only place that talks to `fantoccini` directly.
//!
//! - [`gidamu_browser::driver::SessionDriver`]: WebDriver session wrapper
//! - [`gidamu_browser::page::Page`]: element lookups and bounded waits
//! - [`gidamu_browser::pacing::Pacer`]: deliberate delays and paced typing
//! - [`gidamu_browser::launch`]: browser launch argument construction
pub mod gidamu_browser;
