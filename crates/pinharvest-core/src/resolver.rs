//! Sequential high-resolution resolver.
//!
//! Visits each reference in its own browsing context, strictly one at a
//! time: open, wait for load (bounded), extract, close, advance. Because a
//! context is always closed before the next one opens, the output order is
//! the input order and at most one context exists at any instant.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{OpenError, ResolveError};
use crate::extract::{AssetExtractor, LastImage};
use crate::host::{BrowsingContext, ContextOpener};
use crate::model::{FailureReason, LowResReference, Outcome, ResultSequence};

/// Resolver tuning.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Bound on every load wait.
    pub load_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_secs(30),
        }
    }
}

/// Half-open ordinal range `[start, stop)`; `stop` defaults to the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveRange {
    pub start: usize,
    pub stop: Option<usize>,
}

impl ResolveRange {
    pub fn new(start: usize, stop: Option<usize>) -> Self {
        Self { start, stop }
    }

    pub fn full() -> Self {
        Self::default()
    }

    /// Concrete ordinal bounds for `len` references numbered from `first`.
    ///
    /// Both ends are clamped to `[first, first + len)`.
    pub fn bounds(&self, first: usize, len: usize) -> Result<(usize, usize), ResolveError> {
        let end = first + len;
        let stop = self.stop.unwrap_or(end).min(end);
        let start = self.start.max(first);
        if start > stop {
            return Err(ResolveError::InvalidRange {
                start: self.start,
                stop,
                len,
            });
        }
        Ok((start, stop))
    }
}

/// Ordinal of the first reference, after checking the rest follow on from it.
fn first_ordinal(refs: &[LowResReference]) -> Result<usize, ResolveError> {
    let first = refs.first().map_or(0, |r| r.ordinal);
    for (position, reference) in refs.iter().enumerate() {
        if reference.ordinal != first + position {
            return Err(ResolveError::OrdinalGap {
                position,
                expected: first + position,
                found: reference.ordinal,
            });
        }
    }
    Ok(first)
}

/// What happened to one ordinal.
enum Step {
    Settled(Outcome),
    Blocked(String),
    Cancelled,
}

pub struct Resolver<O> {
    opener: O,
    extractor: Box<dyn AssetExtractor>,
    config: ResolverConfig,
}

impl<O: ContextOpener> Resolver<O> {
    /// Resolver using the last-image strategy.
    pub fn new(opener: O, config: ResolverConfig) -> Self {
        Self::with_extractor(opener, Box::new(LastImage), config)
    }

    pub fn with_extractor(
        opener: O,
        extractor: Box<dyn AssetExtractor>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            opener,
            extractor,
            config,
        }
    }

    /// Resolve the references whose ordinals fall in `range`, in ordinal
    /// order.
    ///
    /// `refs` may be any consecutive slice of a listing; results are keyed
    /// by each reference's own ordinal.
    ///
    /// The returned sequence holds one entry per requested ordinal. Per-ordinal
    /// failures are recorded and the run continues; a blocked context fails
    /// every remaining ordinal; cancellation marks the current and remaining
    /// ordinals `Cancelled`.
    pub async fn resolve(
        &self,
        refs: &[LowResReference],
        range: ResolveRange,
        cancel: &CancellationToken,
    ) -> Result<ResultSequence, ResolveError> {
        let first = first_ordinal(refs)?;
        let (start, stop) = range.bounds(first, refs.len())?;
        let mut sequence = ResultSequence::pending(start, stop);

        info!(
            "Resolving ordinals [{}, {}) of {} with '{}' extraction",
            start,
            stop,
            refs.len(),
            self.extractor.name()
        );

        for reference in &refs[start - first..stop - first] {
            let ordinal = reference.ordinal;

            if cancel.is_cancelled() {
                info!("Run cancelled before ordinal {}", ordinal);
                sequence.settle_remaining(ordinal, Outcome::Cancelled);
                break;
            }

            debug!("Resolving {} / {}: {}", ordinal + 1, stop, reference.address);

            match self.resolve_one(reference, cancel).await {
                Step::Settled(outcome) => {
                    match &outcome {
                        Outcome::Resolved(address) => {
                            info!(ordinal, %address, "Resolved");
                        }
                        Outcome::Failed(reason) => {
                            warn!(ordinal, address = %reference.address, "Failed: {}", reason);
                        }
                        Outcome::Cancelled => {}
                    }
                    sequence.settle(ordinal, outcome);
                }
                Step::Blocked(message) => {
                    warn!(
                        "Context blocked at ordinal {} ({}), failing remaining ordinals",
                        ordinal, message
                    );
                    sequence
                        .settle_remaining(ordinal, Outcome::Failed(FailureReason::ContextBlocked));
                    break;
                }
                Step::Cancelled => {
                    info!("Run cancelled while loading ordinal {}", ordinal);
                    sequence.settle_remaining(ordinal, Outcome::Cancelled);
                    break;
                }
            }
        }

        let summary = sequence.summary();
        info!(
            "Resolved {} of {} ({} failed, {} cancelled)",
            summary.resolved,
            sequence.len(),
            summary.failed,
            summary.cancelled
        );
        Ok(sequence)
    }

    async fn resolve_one(&self, reference: &LowResReference, cancel: &CancellationToken) -> Step {
        let mut context = match self.opener.open(&reference.address).await {
            Ok(context) => context,
            Err(OpenError::Blocked(message)) => return Step::Blocked(message),
            Err(OpenError::Navigation(message)) => {
                return Step::Settled(Outcome::Failed(FailureReason::Navigation(message)));
            }
        };

        let loaded = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            waited = tokio::time::timeout(self.config.load_timeout, context.wait_for_load()) => Some(waited),
        };

        let step = match loaded {
            None => Step::Cancelled,
            Some(Err(_elapsed)) => Step::Settled(Outcome::Failed(FailureReason::LoadTimeout)),
            Some(Ok(Err(e))) => {
                Step::Settled(Outcome::Failed(FailureReason::Navigation(e.to_string())))
            }
            Some(Ok(Ok(()))) => match context.images().await {
                Ok(images) => match self.extractor.select(&images) {
                    Some(address) => Step::Settled(Outcome::Resolved(address)),
                    None => {
                        debug!(
                            "{} image elements on {}, none selected",
                            images.len(),
                            context.target_address()
                        );
                        Step::Settled(Outcome::Failed(FailureReason::NoAssetFound))
                    }
                },
                Err(e) => Step::Settled(Outcome::Failed(FailureReason::Extraction(e.to_string()))),
            },
        };

        let address = context.target_address().to_string();
        if let Err(e) = context.close().await {
            warn!("Failed to close context for {}: {}", address, e);
        }

        step
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
