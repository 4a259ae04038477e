//! In-memory host page and context opener used by the pipeline tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{HostError, OpenError};
use crate::host::{BrowsingContext, ContextOpener, ExtentProbe, HostPage, ImageCandidate};

struct BoardState {
    height: f64,
    scroll_top: f64,
    growth_left: Option<u32>,
    scroll_requests: u32,
}

/// A board that grows by `increment` on each of its first scroll requests.
pub(crate) struct FakeBoard {
    viewport: f64,
    increment: f64,
    links: Vec<String>,
    state: Mutex<BoardState>,
}

impl FakeBoard {
    /// Grows on the first `growths` scroll requests, then stays constant.
    pub(crate) fn growing(initial: f64, increment: f64, growths: u32) -> Self {
        Self::with_growth(initial, increment, Some(growths))
    }

    /// Grows on every scroll request.
    pub(crate) fn endless(initial: f64, increment: f64) -> Self {
        Self::with_growth(initial, increment, None)
    }

    fn with_growth(initial: f64, increment: f64, growth_left: Option<u32>) -> Self {
        Self {
            viewport: 800.0,
            increment,
            links: Vec::new(),
            state: Mutex::new(BoardState {
                height: initial,
                scroll_top: 0.0,
                growth_left,
                scroll_requests: 0,
            }),
        }
    }

    pub(crate) fn with_links(mut self, links: &[&str]) -> Self {
        self.links = links.iter().map(|l| l.to_string()).collect();
        self
    }

    pub(crate) fn scroll_requests(&self) -> u32 {
        self.state.lock().scroll_requests
    }
}

#[async_trait]
impl HostPage for FakeBoard {
    async fn measure(&self) -> Result<ExtentProbe, HostError> {
        let state = self.state.lock();
        Ok(ExtentProbe {
            body_scroll_height: state.height - 10.0,
            body_offset_height: state.height - 20.0,
            client_height: self.viewport,
            scroll_height: state.height,
            offset_height: state.height - 5.0,
            scroll_top: state.scroll_top,
            visible_height: self.viewport,
        })
    }

    async fn scroll_to(&self, y: f64) -> Result<(), HostError> {
        let mut state = self.state.lock();
        state.scroll_requests += 1;
        state.scroll_top = y.min(state.height - self.viewport).max(0.0);
        let grows = match state.growth_left.as_mut() {
            Some(0) => false,
            Some(left) => {
                *left -= 1;
                true
            }
            None => true,
        };
        if grows {
            state.height += self.increment;
        }
        Ok(())
    }

    async fn list_links(&self, _selector: &str) -> Result<Vec<String>, HostError> {
        Ok(self.links.clone())
    }
}

/// How a detail page behaves once opened.
#[derive(Clone)]
pub(crate) enum DetailPage {
    Loads {
        delay: Duration,
        images: Vec<ImageCandidate>,
    },
    NeverLoads,
    /// Opens, but the load wait reports a dead connection.
    LoadFails,
    /// Loads, but the image query throws.
    Unreadable,
    Blocked,
    Unreachable,
}

impl DetailPage {
    pub(crate) fn single(src: &str) -> Self {
        DetailPage::Loads {
            delay: Duration::ZERO,
            images: vec![
                ImageCandidate::new("https://img/avatar.jpg", 32, 32),
                ImageCandidate::new(src, 1000, 1500),
            ],
        }
    }

    pub(crate) fn delayed(src: &str, delay: Duration) -> Self {
        DetailPage::Loads {
            delay,
            images: vec![ImageCandidate::new(src, 1000, 1500)],
        }
    }

    pub(crate) fn empty() -> Self {
        DetailPage::Loads {
            delay: Duration::ZERO,
            images: Vec::new(),
        }
    }
}

#[derive(Default)]
pub(crate) struct ContextCounters {
    open: AtomicUsize,
    max_open: AtomicUsize,
    closed: AtomicUsize,
    opened: Mutex<Vec<String>>,
}

impl ContextCounters {
    pub(crate) fn max_open(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }

    pub(crate) fn open_now(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    pub(crate) fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

/// Opens fake contexts by address and counts them.
#[derive(Default)]
pub(crate) struct FakeOpener {
    pages: HashMap<String, DetailPage>,
    pub(crate) counters: Arc<ContextCounters>,
}

impl FakeOpener {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, address: &str, page: DetailPage) -> Self {
        self.pages.insert(address.to_string(), page);
        self
    }
}

#[async_trait]
impl ContextOpener for FakeOpener {
    type Context = FakeContext;

    async fn open(&self, address: &str) -> Result<FakeContext, OpenError> {
        let page = self.pages.get(address).cloned().unwrap_or(DetailPage::NeverLoads);
        match page {
            DetailPage::Blocked => return Err(OpenError::Blocked("popups disabled".to_string())),
            DetailPage::Unreachable => {
                return Err(OpenError::Navigation("net::ERR_NAME_NOT_RESOLVED".to_string()));
            }
            _ => {}
        }

        let now_open = self.counters.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_open.fetch_max(now_open, Ordering::SeqCst);
        self.counters.opened.lock().push(address.to_string());

        Ok(FakeContext {
            address: address.to_string(),
            page,
            counters: self.counters.clone(),
        })
    }
}

pub(crate) struct FakeContext {
    address: String,
    page: DetailPage,
    counters: Arc<ContextCounters>,
}

#[async_trait]
impl BrowsingContext for FakeContext {
    fn target_address(&self) -> &str {
        &self.address
    }

    async fn wait_for_load(&mut self) -> Result<(), HostError> {
        match &self.page {
            DetailPage::Loads { delay, .. } => {
                tokio::time::sleep(*delay).await;
                Ok(())
            }
            DetailPage::Unreadable => Ok(()),
            DetailPage::LoadFails => Err(HostError::Unavailable("session closed".to_string())),
            _ => std::future::pending().await,
        }
    }

    async fn images(&self) -> Result<Vec<ImageCandidate>, HostError> {
        match &self.page {
            DetailPage::Loads { images, .. } => Ok(images.clone()),
            DetailPage::Unreadable => Err(HostError::Script(
                "TypeError: document.images is not iterable".to_string(),
            )),
            _ => Err(HostError::Script("page never loaded".to_string())),
        }
    }

    async fn close(self) -> Result<(), HostError> {
        self.counters.open.fetch_sub(1, Ordering::SeqCst);
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
