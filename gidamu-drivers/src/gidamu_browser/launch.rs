//! Browser launch options and Chrome argument construction.

/// Options for one browser session.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// WebDriver service endpoint (Chromedriver by default).
    pub webdriver_url: String,
    /// Run without a visible window.
    pub headless: bool,
    /// Fixed user agent presented for the whole session.
    pub user_agent: String,
    /// Window size as (width, height).
    pub window: (u32, u32),
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
                .to_string(),
            window: (1280, 720),
        }
    }
}

/// Construct the Chrome command-line arguments for a session.
///
/// Sandboxing and `/dev/shm` use are disabled so the browser starts inside
/// restricted execution environments (CI runners, containers), and the
/// `AutomationControlled` blink feature is switched off.
pub fn build_browser_args(opts: &BrowserOptions) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        format!("--user-agent={}", opts.user_agent),
        format!("--window-size={},{}", opts.window.0, opts.window.1),
    ];
    if opts.headless {
        args.push("--headless".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> BrowserOptions {
        BrowserOptions {
            webdriver_url: "http://localhost:9515".into(),
            headless: false,
            user_agent: "test-agent".into(),
            window: (800, 600),
        }
    }

    #[test]
    fn carries_user_agent_and_window_size() {
        let args = build_browser_args(&opts());
        assert!(args.contains(&"--user-agent=test-agent".to_string()));
        assert!(args.contains(&"--window-size=800,600".to_string()));
    }

    #[test]
    fn sandbox_is_always_disabled() {
        let args = build_browser_args(&opts());
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--disable-dev-shm-usage".to_string()));
    }

    #[test]
    fn headless_adds_headless_and_gpu_flags() {
        let mut o = opts();
        assert!(!build_browser_args(&o).contains(&"--headless".to_string()));

        o.headless = true;
        let args = build_browser_args(&o);
        assert!(args.contains(&"--headless".to_string()));
        assert!(args.contains(&"--disable-gpu".to_string()));
    }
}
