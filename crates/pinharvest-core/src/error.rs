//! Error types for the harvesting pipeline.
//!
//! Per-ordinal failures are not errors at this level: they are recorded in
//! [`crate::model::AssetStatus`] and never abort a run.

use thiserror::Error;

use crate::model::ScrollExtent;

/// Errors reported by the host page or a browsing context.
#[derive(Debug, Error)]
pub enum HostError {
    /// A script evaluated in the page threw.
    #[error("Script error: {0}")]
    Script(String),

    /// The page answered with something we could not interpret.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The browser connection is gone.
    #[error("Host unavailable: {0}")]
    Unavailable(String),
}

/// Reasons a browsing context could not be opened.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The environment refuses to open further contexts.
    #[error("Context blocked: {0}")]
    Blocked(String),

    /// The context opened but navigation to the address failed.
    #[error("Navigation failed: {0}")]
    Navigation(String),
}

/// Scroll-saturation loader errors.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The round cap was reached before the extent stabilised.
    ///
    /// Non-fatal: `extent` is the largest extent observed and the caller may
    /// proceed with whatever has loaded.
    #[error("Saturation incomplete after {rounds} rounds (extent {}px)", extent.height_px)]
    SaturationIncomplete { rounds: u32, extent: ScrollExtent },

    #[error("Host page error: {0}")]
    Host(#[from] HostError),

    #[error("Saturation cancelled")]
    Cancelled,
}

/// Resolver errors that prevent a run from starting.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid range [{start}, {stop}) for {len} references")]
    InvalidRange { start: usize, stop: usize, len: usize },

    /// References must carry consecutive ordinals in slice order.
    #[error("Reference at position {position} has ordinal {found}, expected {expected}")]
    OrdinalGap {
        position: usize,
        expected: usize,
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturation_incomplete_display() {
        let err = LoaderError::SaturationIncomplete {
            rounds: 7,
            extent: ScrollExtent::new(4200.0),
        };
        let display = err.to_string();
        assert!(display.contains("7 rounds"));
        assert!(display.contains("4200"));
    }

    #[test]
    fn test_host_error_into_loader_error() {
        let err: LoaderError = HostError::Script("boom".to_string()).into();
        assert!(matches!(err, LoaderError::Host(HostError::Script(_))));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_invalid_range_display() {
        let err = ResolveError::InvalidRange {
            start: 8,
            stop: 5,
            len: 5,
        };
        assert_eq!(err.to_string(), "Invalid range [8, 5) for 5 references");
    }

    #[test]
    fn test_ordinal_gap_display() {
        let err = ResolveError::OrdinalGap {
            position: 1,
            expected: 4,
            found: 7,
        };
        assert_eq!(
            err.to_string(),
            "Reference at position 1 has ordinal 7, expected 4"
        );
    }

    #[test]
    fn test_open_error_display() {
        assert_eq!(
            OpenError::Blocked("popups disabled".to_string()).to_string(),
            "Context blocked: popups disabled"
        );
    }
}
