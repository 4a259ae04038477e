//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::loader::ConfigLoader;

/// The `~/.pinharvest` directory.
pub fn pinharvest_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".pinharvest"))
        .unwrap_or_else(|| PathBuf::from(".pinharvest"))
}

fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub board: BoardConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chrome connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Launch Chrome if nothing listens on the debugging port.
    #[serde(default = "default_true")]
    pub launch: bool,

    #[serde(default)]
    pub headless: bool,

    /// Profile directory for persistent login state.
    #[serde(default)]
    pub profile_dir: Option<String>,

    /// Bound on each DevTools request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            launch: true,
            headless: false,
            profile_dir: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl BrowserConfig {
    pub fn profile_dir(&self) -> PathBuf {
        match &self.profile_dir {
            Some(dir) => PathBuf::from(ConfigLoader::expand_path(dir)),
            None => pinharvest_dir().join("browser-profile"),
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_request_timeout() -> u64 {
    30
}

/// The board page to harvest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board URL. An open tab whose URL contains this is reused.
    #[serde(default)]
    pub url: Option<String>,

    /// CSS selector matching the item links.
    #[serde(default = "default_link_selector")]
    pub link_selector: String,

    /// Keep only the first `count` items.
    #[serde(default)]
    pub count: Option<usize>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            url: None,
            link_selector: default_link_selector(),
            count: None,
        }
    }
}

fn default_link_selector() -> String {
    "a.pinLink.pinImageWrapper".to_string()
}

/// Scroll-saturation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Wait after each scroll, in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default = "default_scroll_multiplier")]
    pub scroll_multiplier: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_rounds: default_max_rounds(),
            settle_ms: default_settle_ms(),
            scroll_multiplier: default_scroll_multiplier(),
        }
    }
}

fn default_max_rounds() -> u32 {
    50
}

fn default_settle_ms() -> u64 {
    500
}

fn default_scroll_multiplier() -> f64 {
    1.0
}

/// High-resolution resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Bound on each detail page's load wait.
    #[serde(default = "default_load_timeout")]
    pub load_timeout_secs: u64,

    /// `last` or `largest`.
    #[serde(default = "default_extractor")]
    pub extractor: String,

    /// Minimum image size as `WIDTHxHEIGHT`.
    #[serde(default = "default_min_resolution")]
    pub min_resolution: String,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            load_timeout_secs: default_load_timeout(),
            extractor: default_extractor(),
            min_resolution: default_min_resolution(),
        }
    }
}

fn default_load_timeout() -> u64 {
    30
}

fn default_extractor() -> String {
    "last".to_string()
}

fn default_min_resolution() -> String {
    "0x0".to_string()
}

/// Where results go.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output file or directory. Stdout when unset.
    #[serde(default)]
    pub path: Option<String>,

    /// JSON status report path.
    #[serde(default)]
    pub report: Option<String>,
}

impl OutputConfig {
    pub fn path(&self) -> Option<PathBuf> {
        self.path
            .as_deref()
            .map(|p| PathBuf::from(ConfigLoader::expand_path(p)))
    }

    pub fn report(&self) -> Option<PathBuf> {
        self.report
            .as_deref()
            .map(|p| PathBuf::from(ConfigLoader::expand_path(p)))
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file directory.
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => PathBuf::from(ConfigLoader::expand_path(dir)),
            None => pinharvest_dir().join("logs"),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
