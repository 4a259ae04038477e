//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::{RwLock, mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpRequest, CdpResponse, PageInfo};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
type EventHandlers = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<CdpResponse>>>>;

/// Pending request waiting for response.
struct PendingRequest {
    tx: oneshot::Sender<Result<Value, CdpError>>,
}

/// Request/response plumbing shared by the client and its page sessions.
pub(crate) struct Transport {
    ws_tx: tokio::sync::Mutex<WsSink>,
    request_id: AtomicU64,
    pending: Mutex<HashMap<u64, PendingRequest>>,
    request_timeout: Duration,
}

impl Transport {
    /// Send a CDP command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }

    /// Route one incoming message to its pending request or session.
    async fn dispatch(&self, resp: CdpResponse, handlers: &EventHandlers) {
        if let Some(id) = resp.id {
            let pending_req = self.pending.lock().remove(&id);
            if let Some(req) = pending_req {
                let result = match resp.error {
                    Some(error) => Err(CdpError::Protocol {
                        code: error.code,
                        message: error.message,
                    }),
                    None => Ok(resp.result.unwrap_or(Value::Null)),
                };
                let _ = req.tx.send(result);
            }
        } else if resp.method.is_some() {
            let session_id = resp.session_id.clone().unwrap_or_default();
            let handlers = handlers.read().await;
            if let Some(tx) = handlers.get(&session_id) {
                let _ = tx.send(resp);
            }
        }
    }

    /// Fail every in-flight request.
    fn abandon_pending(&self) {
        for (_, req) in self.pending.lock().drain() {
            let _ = req.tx.send(Err(CdpError::SessionClosed));
        }
    }
}

/// CDP client for browser automation.
///
/// Connects to Chrome via WebSocket and hands out [`PageSession`]s.
pub struct CdpClient {
    /// HTTP endpoint for page discovery.
    http_endpoint: String,
    transport: Arc<Transport>,
    /// Event channels by session ID.
    event_handlers: EventHandlers,
    /// Background task handle.
    _recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Chrome debugging endpoint (e.g., "http://localhost:9222")
    /// * `request_timeout` - bound on each CDP command
    pub async fn connect(endpoint: &str, request_timeout: Duration) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();

        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let version: BrowserVersion = reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?;

        debug!(
            "Connected to browser: {} (protocol {})",
            version.browser, version.protocol_version
        );

        Self::connect_ws(http_endpoint, version.web_socket_debugger_url, request_timeout).await
    }

    /// Open the browser WebSocket and start the receive loop.
    pub(crate) async fn connect_ws(
        http_endpoint: String,
        browser_ws_url: String,
        request_timeout: Duration,
    ) -> Result<Self, CdpError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(&browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let transport = Arc::new(Transport {
            ws_tx: tokio::sync::Mutex::new(ws_sink),
            request_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            request_timeout,
        });
        let event_handlers: EventHandlers = Arc::new(RwLock::new(HashMap::new()));

        let recv_task = {
            let transport = transport.clone();
            let event_handlers = event_handlers.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, transport, event_handlers).await;
            })
        };

        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            http_endpoint,
            transport,
            event_handlers,
            _recv_task: recv_task,
        })
    }

    /// WebSocket receive loop.
    async fn receive_loop(
        mut ws_source: WsSource,
        transport: Arc<Transport>,
        event_handlers: EventHandlers,
    ) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(resp) => transport.dispatch(resp, &event_handlers).await,
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        // Wake everyone still waiting on this connection.
        transport.abandon_pending();
        event_handlers.write().await.clear();
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.call(method, params, None).await
    }

    // ========================================================================
    // Target Management
    // ========================================================================

    /// List all pages.
    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CdpError> {
        let url = format!("{}/json/list", self.http_endpoint);
        let pages: Vec<PageInfo> = reqwest::get(&url).await?.json().await?;
        Ok(pages)
    }

    /// Create a new tab and attach to it.
    ///
    /// The tab starts on `url` or `about:blank`. Page events are already
    /// flowing when this returns.
    pub async fn new_page(&self, url: Option<&str>) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.createTarget",
                Some(json!({"url": url.unwrap_or("about:blank")})),
            )
            .await?;

        let target_id = result["targetId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing targetId".to_string()))?
            .to_string();
        debug!("Created target {}", target_id);

        match self.attach_page(&target_id).await {
            Ok(session) => Ok(session),
            Err(e) => {
                if let Err(close_err) = self.close_target(&target_id).await {
                    warn!("Failed to close unattached target {}: {}", target_id, close_err);
                }
                Err(e)
            }
        }
    }

    /// Attach to an existing page.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        self.event_handlers
            .write()
            .await
            .insert(session_id.clone(), event_tx);

        let session = PageSession::new(
            target_id.to_string(),
            session_id,
            self.transport.clone(),
            event_rx,
        );

        session.enable_domains().await?;

        Ok(session)
    }

    /// Close a page/target.
    pub async fn close_target(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }

    /// Stop routing events to `session` and close its tab.
    pub async fn close_session(&self, session: &PageSession) -> Result<(), CdpError> {
        self.event_handlers
            .write()
            .await
            .remove(session.session_id());
        self.close_target(session.target_id()).await
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
