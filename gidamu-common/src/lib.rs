//! Common types shared across the gidamu workspace.
//!
//! This crate defines the error taxonomy for the rental workflow and the
//! centralised logging initialisation. It is intentionally lightweight so
//! every other crate can depend on it without heavy transitive costs.
//!
//! - [`GidamuError`] and [`Result`]: shared error handling
//! - [`observability`]: tracing/logging initialisation

pub mod observability;

/// Error types used across the rental workflow.
///
/// Each variant corresponds to one step of the run; the run function decides
/// which variants are fatal and which are isolated (see `gidamu-rental`).
#[derive(thiserror::Error, Debug)]
pub enum GidamuError {
    /// Configuration was incomplete or invalid. Raised before any browser
    /// action is taken.
    #[error("configuration error: {0}")]
    Config(String),

    /// The WebDriver session could not be established or was lost.
    #[error("browser session error: {0}")]
    Session(String),

    /// Login did not complete: a login control was missing or the
    /// post-login marker never appeared.
    #[error("login failed: {0}")]
    Auth(String),

    /// The notifications page could not be loaded or its list container
    /// never appeared. Per-entry extraction problems are not reported
    /// through this variant; the scanner skips those entries.
    #[error("notification scan failed: {0}")]
    Scan(String),

    /// A single rental action failed. The run loop counts these and
    /// continues with the remaining links.
    #[error("rental failed for {link}: {reason}")]
    Rent { link: String, reason: String },

    /// An outbound run notification could not be delivered. Never fatal.
    #[error("notification delivery failed: {0}")]
    Notify(String),
}

/// Convenient alias for results that use [`GidamuError`].
pub type Result<T> = std::result::Result<T, GidamuError>;
