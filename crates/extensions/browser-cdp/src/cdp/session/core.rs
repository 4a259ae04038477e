//! Core session struct and CDP command dispatch.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, trace};

use crate::cdp::client::Transport;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::CdpResponse;

/// A session attached to a single page/target.
pub struct PageSession {
    /// Target ID.
    pub(super) target_id: String,
    /// Session ID for this target.
    pub(super) session_id: String,
    /// Connection shared with the client.
    pub(super) transport: Arc<Transport>,
    /// Events the browser sent for this session, in arrival order.
    pub(super) events: Mutex<mpsc::UnboundedReceiver<CdpResponse>>,
    /// Loader of the latest cross-document navigation.
    pub(super) loader_id: parking_lot::Mutex<Option<String>>,
}

impl PageSession {
    /// Create a new page session.
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        transport: Arc<Transport>,
        event_rx: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            transport,
            events: Mutex::new(event_rx),
            loader_id: parking_lot::Mutex::new(None),
        }
    }

    /// Get target ID.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Get session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        self.call(
            "Page.setLifecycleEventsEnabled",
            Some(json!({"enabled": true})),
        )
        .await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Wait for the next event named `method`, discarding others.
    ///
    /// Fails with [`CdpError::SessionClosed`] once the connection or the
    /// session routing is gone.
    pub async fn wait_for_event(&self, method: &str) -> Result<CdpResponse, CdpError> {
        self.wait_for(|event| event.method.as_deref() == Some(method))
            .await
    }

    /// Wait for the next event accepted by `matches`, discarding others.
    pub(crate) async fn wait_for<P>(&self, mut matches: P) -> Result<CdpResponse, CdpError>
    where
        P: FnMut(&CdpResponse) -> bool,
    {
        let mut events = self.events.lock().await;
        while let Some(event) = events.recv().await {
            if matches(&event) {
                return Ok(event);
            }
            trace!("Session {} skipped event {:?}", self.session_id, event.method);
        }
        Err(CdpError::SessionClosed)
    }

    /// Discard events that have already arrived.
    pub async fn drain_events(&self) -> usize {
        let mut events = self.events.lock().await;
        let mut drained = 0;
        while events.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}
