//! Browser instance manager.
//!
//! Connects to the operator's Chrome, launching it with a persistent
//! profile when nothing is listening, and hands out the board tab and the
//! detail-page opener.

mod manager_core;
mod manager_pages;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
