//! Chrome backend for pinharvest.
//!
//! Drives the operator's own Chrome via the Chrome DevTools Protocol (CDP):
//! the board tab is the [`HostPage`](pinharvest_core::HostPage), and every
//! detail page is opened in a fresh tab that serves as one
//! [`BrowsingContext`](pinharvest_core::BrowsingContext).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │   pinharvest    │ ◄──────────────► │   Chrome/Edge    │
//! │  (this crate)   │       CDP        │  (user's browser)│
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! ## Setup
//!
//! Either let [`BrowserManager`] launch Chrome with a persistent profile, or
//! start it yourself so your board session is already logged in:
//!
//! ```bash
//! # Linux
//! google-chrome --remote-debugging-port=9222
//!
//! # macOS
//! /Applications/Google\ Chrome.app/Contents/MacOS/Google\ Chrome --remote-debugging-port=9222
//! ```

pub mod cdp;
mod context;
mod host;
pub mod manager;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use context::{CdpContextOpener, CdpDetailContext};
pub use host::CdpHostPage;
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
