//! Seams between the pipeline and the browser.
//!
//! [`HostPage`] is the single board page the operator is looking at.
//! [`ContextOpener`] hands out isolated [`BrowsingContext`]s, one per detail
//! page.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{HostError, OpenError};

/// One measurement of the host page's size probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtentProbe {
    pub body_scroll_height: f64,
    pub body_offset_height: f64,
    pub client_height: f64,
    pub scroll_height: f64,
    pub offset_height: f64,
    /// Current vertical scroll position.
    pub scroll_top: f64,
    /// Height of the visible area.
    pub visible_height: f64,
}

impl ExtentProbe {
    /// The page extent: the largest of the size probes, since any single
    /// probe may under-report.
    pub fn extent(&self) -> f64 {
        [
            self.body_scroll_height,
            self.body_offset_height,
            self.client_height,
            self.scroll_height,
            self.offset_height,
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }

    /// Whether the viewport touches the bottom of the scrollable area.
    pub fn at_bottom(&self) -> bool {
        self.scroll_top + 1.0 >= self.extent() - self.visible_height
    }
}

/// An image element found in a loaded detail page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageCandidate {
    pub src: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl ImageCandidate {
    pub fn new(src: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            src: src.into(),
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// The board page being harvested.
#[async_trait]
pub trait HostPage: Send + Sync {
    /// Read the current size probes.
    async fn measure(&self) -> Result<ExtentProbe, HostError>;

    /// Request a scroll to the given vertical offset.
    async fn scroll_to(&self, y: f64) -> Result<(), HostError>;

    /// Target addresses of every element matching `selector`, in document
    /// order.
    async fn list_links(&self, selector: &str) -> Result<Vec<String>, HostError>;
}

/// An isolated, short-lived view onto one detail page.
#[async_trait]
pub trait BrowsingContext: Send + Sync {
    fn target_address(&self) -> &str;

    /// Suspend until the page signals load completion. Unbounded; callers
    /// apply their own timeout.
    async fn wait_for_load(&mut self) -> Result<(), HostError>;

    /// Image elements of the loaded page, in document order.
    async fn images(&self) -> Result<Vec<ImageCandidate>, HostError>;

    async fn close(self) -> Result<(), HostError>;
}

/// Factory for browsing contexts.
#[async_trait]
pub trait ContextOpener: Send + Sync {
    type Context: BrowsingContext;

    /// Open a context and start navigating it to `address`. The load listener
    /// must be registered before navigation starts.
    async fn open(&self, address: &str) -> Result<Self::Context, OpenError>;
}
