//! BrowserManager core: struct definition, new, connect, chrome management.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cdp::CdpClient;
use super::{BrowserError, BrowserManagerConfig};

/// Manages the browser connection.
///
/// - Reuses a Chrome already listening on the debug port
/// - Otherwise launches one with a persistent profile, so board logins stick
/// - Lazily connects on first use
pub struct BrowserManager {
    pub(super) config: BrowserManagerConfig,
    pub(super) client: RwLock<Option<Arc<CdpClient>>>,
    /// Chrome process handle (if we launched it).
    pub(super) chrome_process: RwLock<Option<Child>>,
}

impl BrowserManager {
    /// Create a new browser manager. Nothing is connected yet.
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            chrome_process: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &BrowserManagerConfig {
        &self.config
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Check if Chrome is already running on the debug port.
    pub(super) async fn is_chrome_running(&self) -> bool {
        reqwest::get(&format!("{}/json/version", self.config.endpoint()))
            .await
            .is_ok()
    }

    /// Launch Chrome with remote debugging enabled.
    async fn launch_chrome(&self) -> Result<Child, BrowserError> {
        let chrome_path = Self::find_chrome().ok_or(BrowserError::ChromeNotFound)?;
        let profile_dir = self.config.get_profile_dir();

        if let Err(e) = std::fs::create_dir_all(&profile_dir) {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let mut cmd = Command::new(&chrome_path);
        cmd.arg(format!("--remote-debugging-port={}", self.config.debug_port))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--metrics-recording-only")
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if self.config.headless {
            cmd.arg("--headless=new");
        }

        let child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }

    /// Connect to the browser, launching it if allowed and necessary.
    pub async fn connect(&self) -> Result<(), BrowserError> {
        if self.client.read().await.is_some() {
            return Ok(());
        }

        if self.is_chrome_running().await {
            info!("Chrome already running on port {}", self.config.debug_port);
        } else if !self.config.launch {
            return Err(BrowserError::ConnectionFailed(format!(
                "nothing listening on {} and launching is disabled",
                self.config.endpoint()
            )));
        } else {
            info!("Chrome not running on port {}, launching...", self.config.debug_port);

            let child = self.launch_chrome().await?;
            *self.chrome_process.write().await = Some(child);

            // 30 * 200ms = 6 seconds
            let mut started = false;
            for _ in 0..30 {
                tokio::time::sleep(Duration::from_millis(200)).await;
                if self.is_chrome_running().await {
                    started = true;
                    break;
                }
            }

            if !started {
                return Err(BrowserError::LaunchFailed(
                    "Chrome failed to start within timeout".to_string(),
                ));
            }
        }

        let client = CdpClient::connect(&self.config.endpoint(), self.config.request_timeout).await?;
        *self.client.write().await = Some(Arc::new(client));

        info!("Connected to Chrome at {}", self.config.endpoint());
        Ok(())
    }

    /// Ensure the browser is connected before use.
    pub async fn ensure_connected(&self) -> Result<(), BrowserError> {
        if self.client.read().await.is_none() {
            self.connect().await?;
        }
        Ok(())
    }

    /// Get the CDP client.
    pub async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotConnected)
    }

    /// Close the browser connection.
    /// Note: This does NOT close Chrome itself, only disconnects.
    pub async fn close(&self) -> Result<(), BrowserError> {
        let _ = self.client.write().await.take();

        info!("Browser connection closed");
        Ok(())
    }

    /// Shutdown Chrome if we launched it.
    pub async fn shutdown_chrome(&self) -> Result<(), BrowserError> {
        self.close().await?;

        if let Some(mut child) = self.chrome_process.write().await.take() {
            info!("Shutting down Chrome...");
            let _ = child.kill().await;
        }

        Ok(())
    }

    /// Whether Chrome was started by this manager.
    pub async fn launched_chrome(&self) -> bool {
        self.chrome_process.read().await.is_some()
    }
}
