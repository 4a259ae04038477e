//! Strategies for picking the full-resolution asset out of a detail page.
//!
//! Detail pages usually render the full-size image as their last image
//! element, but that is a layout habit rather than a contract, so the choice
//! is pluggable.

use std::fmt;
use std::str::FromStr;

use crate::host::ImageCandidate;

/// Picks the asset address from a loaded page's image elements.
pub trait AssetExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn select(&self, images: &[ImageCandidate]) -> Option<String>;
}

/// The last image element with a non-empty source.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastImage;

impl AssetExtractor for LastImage {
    fn name(&self) -> &'static str {
        "last"
    }

    fn select(&self, images: &[ImageCandidate]) -> Option<String> {
        images
            .iter()
            .rev()
            .find(|img| !img.src.is_empty())
            .map(|img| img.src.clone())
    }
}

/// The image element with the largest natural area. Ties go to the later
/// element.
#[derive(Debug, Clone, Copy, Default)]
pub struct LargestImage;

impl AssetExtractor for LargestImage {
    fn name(&self) -> &'static str {
        "largest"
    }

    fn select(&self, images: &[ImageCandidate]) -> Option<String> {
        images
            .iter()
            .filter(|img| !img.src.is_empty())
            .max_by_key(|img| img.area())
            .map(|img| img.src.clone())
    }
}

/// Minimum natural size, parsed from `WxH`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn is_zero(&self) -> bool {
        self.width == 0 && self.height == 0
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid width in '{}'", s))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid height in '{}'", s))?;
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Drops images smaller than `min` in either dimension, then delegates.
pub struct MinResolution<E> {
    min: Resolution,
    inner: E,
}

impl<E: AssetExtractor> MinResolution<E> {
    pub fn new(min: Resolution, inner: E) -> Self {
        Self { min, inner }
    }
}

impl<E: AssetExtractor> AssetExtractor for MinResolution<E> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn select(&self, images: &[ImageCandidate]) -> Option<String> {
        let large_enough: Vec<ImageCandidate> = images
            .iter()
            .filter(|img| img.width >= self.min.width && img.height >= self.min.height)
            .cloned()
            .collect();
        self.inner.select(&large_enough)
    }
}

/// Named extraction strategies selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractorKind {
    #[default]
    Last,
    Largest,
}

impl ExtractorKind {
    /// Build the strategy, wrapped in a size filter when `min` is non-zero.
    pub fn build(self, min: Resolution) -> Box<dyn AssetExtractor> {
        match (self, min.is_zero()) {
            (ExtractorKind::Last, true) => Box::new(LastImage),
            (ExtractorKind::Largest, true) => Box::new(LargestImage),
            (ExtractorKind::Last, false) => Box::new(MinResolution::new(min, LastImage)),
            (ExtractorKind::Largest, false) => Box::new(MinResolution::new(min, LargestImage)),
        }
    }
}

impl FromStr for ExtractorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "last" => Ok(ExtractorKind::Last),
            "largest" => Ok(ExtractorKind::Largest),
            other => Err(format!("unknown extractor '{}' (expected last or largest)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Vec<ImageCandidate> {
        vec![
            ImageCandidate::new("https://img/avatar.jpg", 64, 64),
            ImageCandidate::new("https://img/full.jpg", 1200, 1800),
            ImageCandidate::new("https://img/related.jpg", 236, 354),
        ]
    }

    #[test]
    fn test_last_image() {
        assert_eq!(LastImage.select(&page()).as_deref(), Some("https://img/related.jpg"));
        assert_eq!(LastImage.select(&[]), None);
    }

    #[test]
    fn test_last_image_skips_empty_src() {
        let mut images = page();
        images.push(ImageCandidate::new("", 10, 10));
        assert_eq!(LastImage.select(&images).as_deref(), Some("https://img/related.jpg"));
    }

    #[test]
    fn test_largest_image() {
        assert_eq!(LargestImage.select(&page()).as_deref(), Some("https://img/full.jpg"));
    }

    #[test]
    fn test_largest_image_tie_prefers_later() {
        let images = vec![
            ImageCandidate::new("https://img/a.jpg", 100, 100),
            ImageCandidate::new("https://img/b.jpg", 100, 100),
        ];
        assert_eq!(LargestImage.select(&images).as_deref(), Some("https://img/b.jpg"));
    }

    #[test]
    fn test_min_resolution_filters_before_selecting() {
        let extractor = MinResolution::new(Resolution { width: 500, height: 500 }, LastImage);
        assert_eq!(extractor.select(&page()).as_deref(), Some("https://img/full.jpg"));

        let strict = MinResolution::new(Resolution { width: 5000, height: 5000 }, LastImage);
        assert_eq!(strict.select(&page()), None);
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("800x600".parse::<Resolution>(), Ok(Resolution { width: 800, height: 600 }));
        assert_eq!("0X0".parse::<Resolution>(), Ok(Resolution::default()));
        assert!("800".parse::<Resolution>().is_err());
        assert!("wide x tall".parse::<Resolution>().is_err());
        assert_eq!(Resolution { width: 3, height: 4 }.to_string(), "3x4");
    }

    #[test]
    fn test_extractor_kind_build() {
        assert_eq!("Largest".parse::<ExtractorKind>(), Ok(ExtractorKind::Largest));
        assert!("first".parse::<ExtractorKind>().is_err());

        let extractor = ExtractorKind::Last.build(Resolution::default());
        assert_eq!(extractor.name(), "last");
        let filtered = ExtractorKind::Largest.build(Resolution { width: 1, height: 1 });
        assert_eq!(filtered.name(), "largest");
    }
}
