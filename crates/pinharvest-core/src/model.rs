//! Pipeline data model: references, resolved assets and the result sequence.

use std::fmt;

use serde::Serialize;
use tokio::time::Instant;

/// A link to an item's detail view, as observed on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowResReference {
    pub ordinal: usize,
    pub address: String,
}

impl LowResReference {
    pub fn new(ordinal: usize, address: impl Into<String>) -> Self {
        Self {
            ordinal,
            address: address.into(),
        }
    }
}

/// Snapshot of the host page's measured scrollable height.
#[derive(Debug, Clone, Copy)]
pub struct ScrollExtent {
    pub height_px: f64,
    pub measured_at: Instant,
}

impl ScrollExtent {
    pub fn new(height_px: f64) -> Self {
        Self {
            height_px,
            measured_at: Instant::now(),
        }
    }
}

/// Why a single ordinal could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The context never signalled load within the configured bound.
    LoadTimeout,
    /// The detail page loaded but held no usable image element.
    NoAssetFound,
    /// The environment refused to open a context.
    ContextBlocked,
    /// The detail page could not be reached.
    Navigation(String),
    /// Reading image elements from the loaded page failed.
    Extraction(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::LoadTimeout => write!(f, "load timeout"),
            FailureReason::NoAssetFound => write!(f, "no asset found"),
            FailureReason::ContextBlocked => write!(f, "context blocked"),
            FailureReason::Navigation(msg) => write!(f, "navigation failed: {}", msg),
            FailureReason::Extraction(msg) => write!(f, "extraction failed: {}", msg),
        }
    }
}

/// Status of one ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Resolved,
    Failed(FailureReason),
    Cancelled,
}

impl AssetStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AssetStatus::Pending)
    }

    /// Short machine-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AssetStatus::Pending => "pending",
            AssetStatus::Resolved => "resolved",
            AssetStatus::Failed(_) => "failed",
            AssetStatus::Cancelled => "cancelled",
        }
    }
}

/// Terminal outcome applied to a pending asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Resolved(String),
    Failed(FailureReason),
    Cancelled,
}

/// The high-resolution result for one reference.
///
/// `address` is present exactly when the status is [`AssetStatus::Resolved`];
/// the fields are private so that only [`ResolvedAsset::settle`] can change
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    ordinal: usize,
    address: Option<String>,
    status: AssetStatus,
}

impl ResolvedAsset {
    pub fn pending(ordinal: usize) -> Self {
        Self {
            ordinal,
            address: None,
            status: AssetStatus::Pending,
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn status(&self) -> &AssetStatus {
        &self.status
    }

    /// Move a pending asset to its terminal status.
    ///
    /// Returns `false` and leaves the asset untouched if it was already
    /// settled.
    pub fn settle(&mut self, outcome: Outcome) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        match outcome {
            Outcome::Resolved(address) => {
                self.address = Some(address);
                self.status = AssetStatus::Resolved;
            }
            Outcome::Failed(reason) => self.status = AssetStatus::Failed(reason),
            Outcome::Cancelled => self.status = AssetStatus::Cancelled,
        }
        true
    }

    /// Render the asset as one output line.
    ///
    /// Resolved assets print the bare address; everything else prints a
    /// `#`-prefixed sentinel so that no ordinal is silently skipped.
    pub fn line(&self) -> String {
        match (&self.status, &self.address) {
            (AssetStatus::Resolved, Some(address)) => address.clone(),
            (AssetStatus::Failed(reason), _) => format!("# {} failed: {}", self.ordinal, reason),
            (status, _) => format!("# {} {}", self.ordinal, status.label()),
        }
    }
}

/// Counts of terminal statuses in a sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub resolved: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub pending: usize,
}

/// The ordered results of one resolver run over `[start, stop)`.
///
/// Pre-sized at run start with one pending asset per requested ordinal and
/// written by ordinal, never appended.
#[derive(Debug, Clone)]
pub struct ResultSequence {
    start: usize,
    assets: Vec<ResolvedAsset>,
}

impl ResultSequence {
    pub fn pending(start: usize, stop: usize) -> Self {
        Self {
            start,
            assets: (start..stop).map(ResolvedAsset::pending).collect(),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn stop(&self) -> usize {
        self.start + self.assets.len()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Option<&ResolvedAsset> {
        ordinal
            .checked_sub(self.start)
            .and_then(|slot| self.assets.get(slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedAsset> {
        self.assets.iter()
    }

    /// Settle the asset at `ordinal`. Returns `false` for out-of-range or
    /// already-settled ordinals.
    pub(crate) fn settle(&mut self, ordinal: usize, outcome: Outcome) -> bool {
        match ordinal
            .checked_sub(self.start)
            .and_then(|slot| self.assets.get_mut(slot))
        {
            Some(asset) => asset.settle(outcome),
            None => false,
        }
    }

    /// Settle every still-pending asset from `ordinal` to the end.
    pub(crate) fn settle_remaining(&mut self, ordinal: usize, outcome: Outcome) {
        let from = ordinal.saturating_sub(self.start);
        for asset in self.assets.iter_mut().skip(from) {
            asset.settle(outcome.clone());
        }
    }

    /// Addresses of resolved assets, in ordinal order.
    pub fn resolved_addresses(&self) -> Vec<&str> {
        self.assets.iter().filter_map(|a| a.address()).collect()
    }

    /// Ordinals whose status is not `Resolved`.
    pub fn unresolved_ordinals(&self) -> Vec<usize> {
        self.assets
            .iter()
            .filter(|a| a.status() != &AssetStatus::Resolved)
            .map(|a| a.ordinal())
            .collect()
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for asset in &self.assets {
            match asset.status() {
                AssetStatus::Resolved => summary.resolved += 1,
                AssetStatus::Failed(_) => summary.failed += 1,
                AssetStatus::Cancelled => summary.cancelled += 1,
                AssetStatus::Pending => summary.pending += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
