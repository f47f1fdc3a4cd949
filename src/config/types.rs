use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Trawl
///
/// Every section and key is optional; missing values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherSettings,
    #[serde(default)]
    pub browser: BrowserSettings,
}

/// Static HTML fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherSettings {
    /// User-Agent header sent with every static fetch
    pub user_agent: String,

    /// Total request timeout in seconds
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            user_agent: format!(
                "trawl/{} (+https://github.com/trawl-rs/trawl)",
                env!("CARGO_PKG_VERSION")
            ),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl FetcherSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserSettings {
    /// Run the browser without a window
    pub headless: bool,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    pub chrome_executable: Option<String>,

    /// Viewport width set on every session
    pub viewport_width: u32,

    /// Viewport height set on every session
    pub viewport_height: u32,

    /// Budget for a navigation to settle, in seconds
    pub navigation_timeout_secs: u64,

    /// Budget for the first anchor to appear after navigation, in seconds
    pub content_timeout_secs: u64,

    /// Ceiling on simultaneously open sessions; unbounded when absent
    pub max_concurrent_sessions: Option<usize>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            viewport_width: 1280,
            viewport_height: 800,
            navigation_timeout_secs: 30,
            content_timeout_secs: 5,
            max_concurrent_sessions: None,
        }
    }
}

impl BrowserSettings {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn content_timeout(&self) -> Duration {
        Duration::from_secs(self.content_timeout_secs)
    }
}
