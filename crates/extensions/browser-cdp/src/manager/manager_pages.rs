//! BrowserManager page selection: the board tab and the detail opener.

use tracing::{debug, info};

use crate::cdp::{CdpError, PageInfo};
use crate::context::CdpContextOpener;
use crate::host::CdpHostPage;
use super::{BrowserError, BrowserManager};

/// Whether an open tab is showing `board_url` (or a page under it).
pub(super) fn shows_board(page: &PageInfo, board_url: &str) -> bool {
    let board = board_url.trim_end_matches('/');
    page.is_page() && !board.is_empty() && page.url.starts_with(board)
}

/// First ordinary web tab, skipping internal pages.
pub(super) fn first_web_tab(pages: &[PageInfo]) -> Option<&PageInfo> {
    pages
        .iter()
        .find(|p| p.is_page() && (p.url.starts_with("http://") || p.url.starts_with("https://")))
}

impl BrowserManager {
    /// Attach to the board tab.
    ///
    /// With `board_url`, an open tab already showing it is reused; otherwise
    /// a new tab is opened and navigated there. Without one, the first open
    /// web tab is taken as the board.
    pub async fn host_page(&self, board_url: Option<&str>) -> Result<CdpHostPage, BrowserError> {
        self.ensure_connected().await?;
        let client = self.client().await?;
        let pages = client.list_pages().await?;
        debug!("{} tabs open", pages.len());

        let existing = match board_url {
            Some(url) => pages.iter().find(|p| shows_board(p, url)),
            None => first_web_tab(&pages),
        };

        if let Some(page) = existing {
            info!("Using open tab {}: {}", page.id, page.url);
            let session = client.attach_page(&page.id).await?;
            session.wait_for_ready_state(self.config.request_timeout).await?;
            return Ok(CdpHostPage::new(session));
        }

        let url = board_url.ok_or_else(|| {
            BrowserError::PageNotFound("no open web tab and no board URL given".to_string())
        })?;

        info!("Opening board {}", url);
        let session = client.new_page(None).await?;
        session.navigate(url).await?;
        tokio::time::timeout(self.config.request_timeout, session.wait_for_load())
            .await
            .map_err(|_| CdpError::Timeout(format!("board {} did not load", url)))??;

        Ok(CdpHostPage::new(session))
    }

    /// Opener for detail-page tabs on the connected browser.
    pub async fn context_opener(&self) -> Result<CdpContextOpener, BrowserError> {
        self.ensure_connected().await?;
        Ok(CdpContextOpener::new(self.client().await?))
    }
}
