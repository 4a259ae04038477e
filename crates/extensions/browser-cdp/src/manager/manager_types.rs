//! BrowserManager types: errors and configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cdp::CdpError;

/// Browser manager errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Browser not connected")]
    NotConnected,

    #[error("Chrome not found. Please install Google Chrome.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::ChromeNotAvailable(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::NavigationFailed(msg) => BrowserError::NavigationFailed(msg),
            CdpError::JavaScript(msg) => BrowserError::ActionFailed(format!("JS error: {}", msg)),
            CdpError::Timeout(msg) => BrowserError::ActionFailed(format!("Timeout: {}", msg)),
            CdpError::SessionClosed => BrowserError::NotConnected,
            _ => BrowserError::ActionFailed(e.to_string()),
        }
    }
}

/// Browser configuration.
#[derive(Debug, Clone)]
pub struct BrowserManagerConfig {
    /// Chrome debugging port.
    pub debug_port: u16,
    /// Profile directory for persistent login state.
    /// Default: ~/.pinharvest/browser-profile
    pub profile_dir: Option<PathBuf>,
    /// Whether to run Chrome in headless mode when we launch it.
    pub headless: bool,
    /// Launch Chrome when nothing listens on the debug port.
    pub launch: bool,
    /// Bound on each CDP command, and on the board tab's first load.
    pub request_timeout: Duration,
}

impl Default for BrowserManagerConfig {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            profile_dir: None,
            headless: false,
            launch: true,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl BrowserManagerConfig {
    /// Get the profile directory, creating default if not specified.
    pub fn get_profile_dir(&self) -> PathBuf {
        self.profile_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".pinharvest")
                .join("browser-profile")
        })
    }

    /// Get the CDP endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }
}
