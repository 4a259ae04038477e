//! # pinharvest core
//!
//! Browser-agnostic pipeline for harvesting full-resolution image addresses
//! from an infinitely scrolling image board.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────┐
//! │ ScrollLoader │──►│   listing    │──►│   Resolver   │──►│   sink   │
//! │  (saturate)  │   │ (references) │   │ (one context │   │ (lines)  │
//! └──────────────┘   └──────────────┘   │  at a time)  │   └──────────┘
//!                                       └──────────────┘
//! ```
//!
//! The browser is reached only through the traits in [`host`], so the whole
//! pipeline runs against in-memory fakes in tests and against Chrome in the
//! `pinharvest` binary.

pub mod error;
pub mod extract;
pub mod host;
pub mod listing;
pub mod loader;
pub mod model;
pub mod resolver;
pub mod sink;

#[cfg(test)]
mod fakes;

pub use error::{HostError, LoaderError, OpenError, ResolveError};
pub use extract::{AssetExtractor, ExtractorKind, LargestImage, LastImage, MinResolution, Resolution};
pub use host::{BrowsingContext, ContextOpener, ExtentProbe, HostPage, ImageCandidate};
pub use listing::{board_name, collect_references};
pub use loader::{LoaderConfig, ScrollLoader};
pub use model::{
    AssetStatus, FailureReason, LowResReference, Outcome, ResolvedAsset, ResultSequence,
    RunSummary, ScrollExtent,
};
pub use resolver::{ResolveRange, Resolver, ResolverConfig};
pub use sink::{write_lines, write_report};
