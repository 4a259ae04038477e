//! Scroll-saturation loader.
//!
//! Scrolls the host page toward its current extent until the extent stops
//! growing, so that lazily loaded items are present in the DOM before the
//! listing step runs. The loader cannot see whether new items appeared; it
//! only observes the extent.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::LoaderError;
use crate::host::HostPage;
use crate::model::ScrollExtent;

/// Loader tuning.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Hard cap on scroll rounds; infinitely growing feeds stop here.
    pub max_rounds: u32,
    /// Time given to the page's own lazy-load logic after each scroll.
    pub settle: Duration,
    /// Scroll target as a multiple of the current extent.
    pub scroll_multiplier: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_rounds: 50,
            settle: Duration::from_millis(500),
            scroll_multiplier: 1.0,
        }
    }
}

pub struct ScrollLoader {
    config: LoaderConfig,
}

impl ScrollLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Scroll until the page stops growing.
    ///
    /// Each round scrolls to `extent × scroll_multiplier`, waits `settle`,
    /// and re-measures. A round that observes no growth while the viewport
    /// sits at the bottom ends the run. A shrinking measurement counts as no
    /// growth and never lowers the tracked extent.
    ///
    /// Returns the stable extent, or [`LoaderError::SaturationIncomplete`]
    /// carrying the largest extent seen once `max_rounds` is spent.
    pub async fn saturate<P>(
        &self,
        page: &P,
        cancel: &CancellationToken,
    ) -> Result<ScrollExtent, LoaderError>
    where
        P: HostPage + ?Sized,
    {
        let mut current = ScrollExtent::new(page.measure().await?.extent());
        debug!("Saturation baseline: {}px", current.height_px);

        for round in 1..=self.config.max_rounds {
            if cancel.is_cancelled() {
                return Err(LoaderError::Cancelled);
            }

            page.scroll_to(current.height_px * self.config.scroll_multiplier)
                .await?;

            tokio::select! {
                _ = cancel.cancelled() => return Err(LoaderError::Cancelled),
                _ = tokio::time::sleep(self.config.settle) => {}
            }

            let probe = page.measure().await?;
            let measured = ScrollExtent::new(probe.extent());
            let grew = measured.height_px > current.height_px;
            if grew {
                current = measured;
            } else if measured.height_px < current.height_px {
                debug!(
                    "Extent shrank from {}px to {}px, ignoring",
                    current.height_px, measured.height_px
                );
            }

            debug!(
                round,
                extent = current.height_px,
                grew,
                at_bottom = probe.at_bottom(),
                "Scroll round complete"
            );

            if !grew && probe.at_bottom() {
                info!(
                    "Page saturated after {} rounds at {}px",
                    round, current.height_px
                );
                return Ok(current);
            }
        }

        warn!(
            "Page still growing after {} rounds ({}px)",
            self.config.max_rounds, current.height_px
        );
        Err(LoaderError::SaturationIncomplete {
            rounds: self.config.max_rounds,
            extent: current,
        })
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
