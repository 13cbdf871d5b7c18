//! Composition parameters

use crate::{CompositorError, Result};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Default output width in pixels
pub const DEFAULT_TARGET_WIDTH: u32 = 1920;
/// Default output height in pixels
pub const DEFAULT_TARGET_HEIGHT: u32 = 1280;
/// Default multiplier applied after the contain fit
pub const DEFAULT_PADDING_FACTOR: f64 = 0.5;
/// Default JPEG quality (matches `canvas.toBlob`'s 0.92)
pub const DEFAULT_JPEG_QUALITY: u8 = 92;
/// Largest accepted `max(target_width, target_height)`
///
/// The scaled content can be as large as the square, so this bounds the
/// RGBA working buffer to 1 GiB, which still fits a 32-bit `usize`.
pub const MAX_SQUARE_SIZE: u32 = 16_384;

/// Resampling filter used when scaling the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeFilter {
    Nearest,
    /// Bilinear, the canvas default
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Parameters for one composition
///
/// Every field has a default, so a partial JSON object such as
/// `{"paddingFactor": 0.8}` deserializes to the defaults plus that override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositionParams {
    /// Output width in pixels
    pub target_width: u32,
    /// Output height in pixels
    pub target_height: u32,
    /// Scale multiplier applied after the contain fit, within (0, 1]; 1.0 = no margin
    pub padding_factor: f64,
    /// Filter used to scale the source
    pub resize_filter: ResizeFilter,
    /// Quality (1-100) used when the output is JPEG
    pub jpeg_quality: u8,
}

impl Default for CompositionParams {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            target_height: DEFAULT_TARGET_HEIGHT,
            padding_factor: DEFAULT_PADDING_FACTOR,
            resize_filter: ResizeFilter::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl CompositionParams {
    /// Create parameters with the given target size and padding factor
    pub fn new(target_width: u32, target_height: u32, padding_factor: f64) -> Self {
        Self {
            target_width,
            target_height,
            padding_factor,
            ..Self::default()
        }
    }

    /// Set the resampling filter
    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.resize_filter = filter;
        self
    }

    /// Set the JPEG quality
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Side of the intermediate square: `max(target_width, target_height)`
    pub fn square_size(&self) -> u32 {
        self.target_width.max(self.target_height)
    }

    /// Check that the parameters describe a drawable composition
    pub fn validate(&self) -> Result<()> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(CompositorError::InvalidParams(format!(
                "target size must be positive, got {}x{}",
                self.target_width, self.target_height
            )));
        }

        let square = self.square_size();
        let buffer_len = (square as usize)
            .checked_mul(square as usize)
            .and_then(|pixels| pixels.checked_mul(4));
        if square > MAX_SQUARE_SIZE || buffer_len.is_none() {
            return Err(CompositorError::InvalidParams(format!(
                "target size {}x{} exceeds the {}px limit",
                self.target_width, self.target_height, MAX_SQUARE_SIZE
            )));
        }

        if !(self.padding_factor > 0.0 && self.padding_factor <= 1.0) {
            return Err(CompositorError::InvalidParams(format!(
                "padding factor must be within (0, 1], got {}",
                self.padding_factor
            )));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CompositorError::InvalidParams(format!(
                "JPEG quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }

        Ok(())
    }
}
