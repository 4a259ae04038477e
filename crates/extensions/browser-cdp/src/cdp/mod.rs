//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! Connects to Chrome via WebSocket and speaks the CDP JSON-RPC protocol.
//! Responses are matched to requests by id; events are routed to the page
//! session they belong to.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222", Duration::from_secs(30)).await?;
//! let page = client.new_page(None).await?;
//! page.navigate("https://example.com").await?;
//! page.wait_for_load().await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
