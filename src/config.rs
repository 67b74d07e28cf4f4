//! Configuration for the PDF→page-image pipeline.
//!
//! All rasterisation behaviour is controlled through [`RasterConfig`], built
//! via its [`RasterConfigBuilder`]. Options are validated once in `build()`
//! and immutable afterwards, so a config can be shared freely across the
//! worker boundary.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output image encoding for rasterised pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    /// Lossless PNG (default).
    #[default]
    Png,
    /// Lossy JPEG with a configurable quality factor.
    Jpeg,
}

impl ImageFormat {
    /// File extension used in output names.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            // "jpeg" accepted as an alias for convenience.
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            other => Err(ConvertError::InvalidConfig(format!(
                "image format must be 'png' or 'jpg', got '{other}'"
            ))),
        }
    }
}

/// Configuration for a PDF-to-images conversion.
///
/// Built via [`RasterConfig::builder()`] or using
/// [`RasterConfig::default()`].
///
/// # Example
/// ```rust
/// use paperlift::{ImageFormat, RasterConfig};
///
/// let config = RasterConfig::builder()
///     .format(ImageFormat::Jpeg)
///     .zoom(3.0)
///     .page_range("1-5")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterConfig {
    /// Output encoding. Default: [`ImageFormat::Png`].
    pub format: ImageFormat,

    /// Scale factor relative to the 72-dpi baseline. Default: 2.0 (≈144 dpi).
    ///
    /// 1.0 renders at pdfium's native 72 dpi; 2.0 doubles both dimensions.
    /// Values much above 4.0 produce very large files for little legibility
    /// gain on typical pages.
    pub zoom: f32,

    /// Optional page-range expression (`"N"` or `"N-M"`, 1-based inclusive).
    /// `None` selects every page.
    pub page_range: Option<String>,

    /// JPEG quality factor, 1–100. Default: 92. Ignored for PNG.
    pub jpeg_quality: u8,

    /// Keep the alpha channel in PNG output. Default: false — pages render
    /// onto an opaque white background, and stripping alpha keeps files
    /// smaller and avoids black-background surprises in naive viewers.
    pub keep_alpha: bool,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            zoom: 2.0,
            page_range: None,
            jpeg_quality: 92,
            keep_alpha: false,
        }
    }
}

impl RasterConfig {
    /// Create a new builder for `RasterConfig`.
    pub fn builder() -> RasterConfigBuilder {
        RasterConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RasterConfig`].
#[derive(Debug)]
pub struct RasterConfigBuilder {
    config: RasterConfig,
}

impl RasterConfigBuilder {
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn zoom(mut self, zoom: f32) -> Self {
        self.config.zoom = zoom;
        self
    }

    pub fn page_range(mut self, range: impl Into<String>) -> Self {
        self.config.page_range = Some(range.into());
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    pub fn keep_alpha(mut self, keep: bool) -> Self {
        self.config.keep_alpha = keep;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RasterConfig, ConvertError> {
        let c = &self.config;
        if !c.zoom.is_finite() || c.zoom <= 0.0 {
            return Err(ConvertError::InvalidConfig(format!(
                "zoom must be a positive number, got {}",
                c.zoom
            )));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(ConvertError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = RasterConfig::default();
        assert_eq!(c.format, ImageFormat::Png);
        assert_eq!(c.zoom, 2.0);
        assert_eq!(c.jpeg_quality, 92);
        assert!(!c.keep_alpha);
        assert!(c.page_range.is_none());
    }

    #[test]
    fn format_aliases() {
        assert_eq!("png".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("jpg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("JPEG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert!("bmp".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn builder_rejects_nonpositive_zoom() {
        assert!(RasterConfig::builder().zoom(0.0).build().is_err());
        assert!(RasterConfig::builder().zoom(-1.0).build().is_err());
        assert!(RasterConfig::builder().zoom(f32::NAN).build().is_err());
    }

    #[test]
    fn builder_rejects_out_of_range_quality() {
        assert!(RasterConfig::builder().jpeg_quality(0).build().is_err());
        assert!(RasterConfig::builder().jpeg_quality(101).build().is_err());
        assert!(RasterConfig::builder().jpeg_quality(100).build().is_ok());
    }
}
