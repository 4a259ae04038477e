//! In-process stand-in for a browser's DevTools WebSocket.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use super::client::CdpClient;

/// Serves one WebSocket connection, answering each request with whatever
/// `respond` returns. `None` drops the connection.
pub(crate) async fn fake_browser<F>(respond: F) -> String
where
    F: Fn(&Value) -> Option<Vec<Value>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            let Message::Text(text) = msg else { continue };
            let request: Value = serde_json::from_str(&text).unwrap();
            match respond(&request) {
                Some(replies) => {
                    for reply in replies {
                        ws.send(Message::Text(reply.to_string().into())).await.unwrap();
                    }
                }
                None => break,
            }
        }
    });

    format!("ws://{}", addr)
}

pub(crate) async fn connect(ws_url: String, timeout: Duration) -> CdpClient {
    CdpClient::connect_ws("http://127.0.0.1:1".to_string(), ws_url, timeout)
        .await
        .unwrap()
}

pub(crate) fn ok(request: &Value, result: Value) -> Value {
    json!({"id": request["id"], "result": result})
}

/// Answers `Target.*` attach calls and domain enables for target T1.
pub(crate) fn attach_reply(request: &Value) -> Option<Value> {
    match request["method"].as_str().unwrap_or("") {
        "Target.createTarget" => Some(ok(request, json!({"targetId": "T1"}))),
        "Target.attachToTarget" => Some(ok(request, json!({"sessionId": "S1"}))),
        "Target.closeTarget"
        | "Page.enable"
        | "Runtime.enable"
        | "Page.setLifecycleEventsEnabled" => Some(ok(request, json!({}))),
        _ => None,
    }
}

/// A page event for session S1.
pub(crate) fn event(method: &str) -> Value {
    json!({"method": method, "params": {}, "sessionId": "S1"})
}

/// A `Page.lifecycleEvent` for the main frame of session S1.
pub(crate) fn lifecycle(loader_id: &str, name: &str) -> Value {
    json!({
        "method": "Page.lifecycleEvent",
        "params": {"frameId": "F1", "loaderId": loader_id, "name": name, "timestamp": 1.0},
        "sessionId": "S1"
    })
}
