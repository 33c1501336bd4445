use crate::gidamu_browser::{
    launch::{build_browser_args, BrowserOptions},
    page::Page,
    pacing::Pacer,
    DriverError,
};
use fantoccini::ClientBuilder;
use serde_json::json;
use std::collections::HashMap;
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver client.
///
/// Owns the single browser session used by a run: created once by the run
/// function, handed out as [`Page`] views, and closed exactly once at the
/// end of the run.
pub struct SessionDriver {
    client: fantoccini::Client,
    pacer: Pacer,
}

impl SessionDriver {
    /// Connect to a running WebDriver service and open a browser session
    /// with the configured Chrome arguments.
    pub async fn launch(opts: &BrowserOptions) -> Result<Self, DriverError> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args".to_string(), json!(build_browser_args(opts)));
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&opts.webdriver_url)
            .await?;

        tracing::debug!(
            target: "browser.session",
            endpoint = %opts.webdriver_url,
            headless = opts.headless,
            "webdriver session established"
        );

        Ok(Self {
            client,
            pacer: Pacer::new(),
        })
    }

    /// A [`Page`] view onto this session. Clients are cheap handles; every
    /// view drives the same browser window.
    pub fn page(&self) -> Page {
        Page::new(self.client.clone(), self.pacer.clone())
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<(), DriverError> {
        self.client.close().await?;
        Ok(())
    }
}
