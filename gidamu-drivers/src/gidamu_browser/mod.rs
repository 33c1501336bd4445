//! WebDriver session, page helpers, and launch configuration.

pub mod driver;
pub mod launch;
pub mod page;
pub mod pacing;

use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by the driver layer.
///
/// A bounded wait that runs out of time is reported separately from a
/// missing element or a transport fault, so callers can tell a slow page
/// from a wrong selector.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The WebDriver endpoint refused or failed the session handshake.
    #[error("webdriver session could not be established: {0}")]
    Connect(#[from] fantoccini::error::NewSessionError),

    /// A bounded wait elapsed before the element appeared.
    #[error("timed out after {waited:?} waiting for `{selector}`")]
    WaitTimeout { selector: String, waited: Duration },

    /// An immediate lookup matched nothing.
    #[error("no element matches `{selector}`")]
    NotFound { selector: String },

    /// Any other WebDriver command failure.
    #[error("webdriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),
}
