//! One browser tab per detail page.

use std::sync::Arc;

use async_trait::async_trait;
use pinharvest_core::{BrowsingContext, ContextOpener, HostError, ImageCandidate, OpenError};
use tracing::{debug, warn};

use crate::cdp::{CdpClient, CdpError, PageSession};

const IMAGES_SCRIPT: &str = "Array.from(document.images).map(i => ({src: i.currentSrc || i.src || '', width: i.naturalWidth || 0, height: i.naturalHeight || 0}))";

/// Opens detail pages in fresh tabs of the connected browser.
#[derive(Clone)]
pub struct CdpContextOpener {
    client: Arc<CdpClient>,
}

impl CdpContextOpener {
    pub fn new(client: Arc<CdpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContextOpener for CdpContextOpener {
    type Context = CdpDetailContext;

    async fn open(&self, address: &str) -> Result<CdpDetailContext, OpenError> {
        // The tab is attached with page events enabled before navigating,
        // so the load event cannot be missed.
        let session = self
            .client
            .new_page(None)
            .await
            .map_err(|e| OpenError::Blocked(e.to_string()))?;

        if let Err(e) = session.navigate(address).await {
            if let Err(close_err) = self.client.close_session(&session).await {
                warn!("Failed to close tab for {}: {}", address, close_err);
            }
            return Err(match e {
                e if e.is_disconnect() => OpenError::Blocked(e.to_string()),
                CdpError::NavigationFailed(msg) => OpenError::Navigation(msg),
                e => OpenError::Navigation(e.to_string()),
            });
        }

        debug!("Opened tab {} for {}", session.target_id(), address);
        Ok(CdpDetailContext {
            client: self.client.clone(),
            session,
            address: address.to_string(),
        })
    }
}

/// A tab showing one detail page.
pub struct CdpDetailContext {
    client: Arc<CdpClient>,
    session: PageSession,
    address: String,
}

impl std::fmt::Debug for CdpDetailContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpDetailContext")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BrowsingContext for CdpDetailContext {
    fn target_address(&self) -> &str {
        &self.address
    }

    async fn wait_for_load(&mut self) -> Result<(), HostError> {
        Ok(self.session.wait_for_load().await?)
    }

    async fn images(&self) -> Result<Vec<ImageCandidate>, HostError> {
        Ok(self.session.evaluate_as(IMAGES_SCRIPT).await?)
    }

    async fn close(self) -> Result<(), HostError> {
        self.client.close_session(&self.session).await?;
        debug!("Closed tab {}", self.session.target_id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use parking_lot::Mutex;
    use serde_json::{Value, json};

    use crate::cdp::test_support::{attach_reply, connect, fake_browser, lifecycle, ok};

    fn detail_page(req: &Value) -> Option<Vec<Value>> {
        if let Some(reply) = attach_reply(req) {
            return Some(vec![reply]);
        }
        match req["method"].as_str() {
            Some("Page.navigate") => Some(vec![
                ok(req, json!({"frameId": "F1", "loaderId": "L2"})),
                lifecycle("L1", "load"),
                lifecycle("L2", "DOMContentLoaded"),
                lifecycle("L2", "load"),
            ]),
            _ => Some(vec![ok(
                req,
                json!({"result": {"type": "object", "value": [
                    {"src": "https://i.pinimg.com/75x75/a.jpg", "width": 75, "height": 75},
                    {"src": "https://i.pinimg.com/originals/a.jpg", "width": 1920, "height": 1080}
                ]}}),
            )]),
        }
    }

    async fn opener<F>(respond: F) -> CdpContextOpener
    where
        F: Fn(&Value) -> Option<Vec<Value>> + Send + 'static,
    {
        let url = fake_browser(respond).await;
        CdpContextOpener::new(Arc::new(connect(url, Duration::from_secs(5)).await))
    }

    #[tokio::test]
    async fn test_open_load_and_read_images() {
        let opener = opener(detail_page).await;
        let mut context = opener.open("https://www.pinterest.com/pin/1/").await.unwrap();
        assert_eq!(context.target_address(), "https://www.pinterest.com/pin/1/");

        context.wait_for_load().await.unwrap();
        let images = context.images().await.unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[1].width, 1920);

        context.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_refused_tab_is_blocked() {
        let opener = opener(|req| {
            Some(vec![json!({
                "id": req["id"],
                "error": {"code": -32000, "message": "Failed to open new tab"}
            })])
        })
        .await;

        let err = opener.open("https://www.pinterest.com/pin/1/").await.unwrap_err();
        assert!(matches!(err, OpenError::Blocked(_)));
    }

    #[tokio::test]
    async fn test_navigation_error_closes_tab() {
        let closed = Arc::new(Mutex::new(0));
        let seen = closed.clone();
        let opener = opener(move |req| {
            if req["method"] == "Target.closeTarget" {
                *seen.lock() += 1;
            }
            if let Some(reply) = attach_reply(req) {
                return Some(vec![reply]);
            }
            Some(vec![ok(req, json!({"frameId": "F1", "errorText": "net::ERR_ABORTED"}))])
        })
        .await;

        let err = opener.open("https://www.pinterest.com/pin/1/").await.unwrap_err();
        assert!(matches!(err, OpenError::Navigation(ref m) if m == "net::ERR_ABORTED"));
        assert_eq!(*closed.lock(), 1);
    }
}
