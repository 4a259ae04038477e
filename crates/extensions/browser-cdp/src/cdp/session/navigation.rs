//! Navigation operations for CDP page session.

use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::CdpResponse;

use super::core::PageSession;

impl PageSession {
    /// Start navigating to URL and return the frame id.
    ///
    /// Does not wait for the load; pair with [`PageSession::wait_for_load`].
    /// Stale load events from earlier navigations are dropped first, and the
    /// navigation's loader id is kept so later ones are told apart.
    pub async fn navigate(&self, url: &str) -> Result<String, CdpError> {
        self.drain_events().await;
        *self.loader_id.lock() = None;

        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(
                error.as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        let frame_id = result["frameId"].as_str().unwrap_or("main").to_string();
        let loader_id = result["loaderId"].as_str().map(str::to_string);

        debug!(
            "Navigating {} to {} (loader {:?})",
            self.session_id, url, loader_id
        );
        *self.loader_id.lock() = loader_id;
        Ok(frame_id)
    }

    /// Wait for the load of the latest navigation.
    ///
    /// Only the `load` lifecycle event carrying that navigation's loader id
    /// counts; loads of the previous document or of child frames are
    /// skipped. Without a loader id (no navigation yet, or same-document)
    /// the next `Page.loadEventFired` is taken.
    ///
    /// Unbounded; callers put their own deadline around it.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let loader_id = self.loader_id.lock().clone();
        match loader_id {
            Some(loader_id) => {
                self.wait_for(|event| is_load_of(event, &loader_id)).await?;
            }
            None => {
                self.wait_for_event("Page.loadEventFired").await?;
            }
        }
        Ok(())
    }

    /// Poll `document.readyState` until the document is usable.
    ///
    /// For tabs that were already open before we attached, where the load
    /// event has long since fired.
    pub async fn wait_for_ready_state(&self, timeout: Duration) -> Result<(), CdpError> {
        let start = tokio::time::Instant::now();

        loop {
            let result = self.evaluate("document.readyState").await?;

            if let Some(state) = result.as_str() {
                if state == "complete" || state == "interactive" {
                    return Ok(());
                }
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Get current URL.
    pub async fn get_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

}

fn is_load_of(event: &CdpResponse, loader_id: &str) -> bool {
    event.method.as_deref() == Some("Page.lifecycleEvent")
        && event
            .params
            .as_ref()
            .is_some_and(|p| p["name"] == "load" && p["loaderId"] == loader_id)
}
