//! Listing of low-resolution references on the host page.

use tracing::debug;
use url::Url;

use crate::error::HostError;
use crate::host::HostPage;
use crate::model::LowResReference;

/// Collect the reference links currently in the page, in document order.
///
/// Ordinals are assigned by position. `limit` keeps only the first `n`
/// links. Zero matches is not an error.
pub async fn collect_references<P>(
    page: &P,
    selector: &str,
    limit: Option<usize>,
) -> Result<Vec<LowResReference>, HostError>
where
    P: HostPage + ?Sized,
{
    let links = page.list_links(selector).await?;
    debug!("Selector '{}' matched {} links", selector, links.len());

    Ok(links
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(ordinal, address)| LowResReference::new(ordinal, address))
        .collect())
}

/// Board name from a board URL: its last non-empty path segment.
///
/// `https://www.pinterest.com/someone/wallpapers/` gives `wallpapers`.
pub fn board_name(board_url: &str) -> Option<String> {
    let url = Url::parse(board_url).ok()?;
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}
