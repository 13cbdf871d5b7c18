//! Letterbox layout math
//!
//! The source is first fitted into a `max(W, H)` square (contain fit, then
//! shrunk by the padding factor and centered), and the square is then centered
//! on the `W x H` target. On the shorter target axis the square overflows and
//! is clipped. Composing the two translations gives one placement of the
//! content directly on the target, which is what [`Layout::placement`] holds.

use crate::{CompositionParams, CompositorError, Result};

/// Rectangle in fractional pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangle snapped to the pixel grid
///
/// `x` and `y` may be negative when the content overflows the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Intersection with a `width x height` canvas anchored at the origin
    pub fn clip_to(&self, width: u32, height: u32) -> Option<PixelRect> {
        let left = self.x.max(0);
        let top = self.y.max(0);
        let right = (self.x + self.width as i64).min(width as i64);
        let bottom = (self.y + self.height as i64).min(height as i64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(PixelRect {
            x: left,
            y: top,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

/// Computed geometry for one source image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Output width
    pub target_width: u32,
    /// Output height
    pub target_height: u32,
    /// Side of the staging square
    pub square_size: u32,
    /// Contain-fit scale, before the padding factor
    pub scale: f64,
    /// Drawn content inside the staging square
    pub content: Rect,
    /// Top-left corner of the staging square on the target (negative = cropped)
    pub square_offset: (f64, f64),
    /// Drawn content on the target canvas, snapped to whole pixels
    pub placement: PixelRect,
}

impl Layout {
    /// Content rectangle in target coordinates, before pixel snapping
    pub fn content_on_target(&self) -> Rect {
        Rect {
            x: self.square_offset.0 + self.content.x,
            y: self.square_offset.1 + self.content.y,
            width: self.content.width,
            height: self.content.height,
        }
    }

    /// Part of the placed content that survives the crop to the target
    pub fn visible(&self) -> Option<PixelRect> {
        self.placement.clip_to(self.target_width, self.target_height)
    }
}

/// Compute where a `source_width x source_height` image lands on the target
///
/// # Arguments
/// * `source_width` - Decoded source width in pixels
/// * `source_height` - Decoded source height in pixels
/// * `params` - Target size and padding factor
///
/// # Errors
/// `InvalidDimensions` if either source side is zero, `InvalidParams` if the
/// parameters are rejected by [`CompositionParams::validate`].
pub fn compute_layout(
    source_width: u32,
    source_height: u32,
    params: &CompositionParams,
) -> Result<Layout> {
    params.validate()?;

    if source_width == 0 || source_height == 0 {
        return Err(CompositorError::InvalidDimensions {
            width: source_width,
            height: source_height,
        });
    }

    let square_size = params.square_size();
    let square = square_size as f64;

    // Square staging: contain fit, then padding, then center
    let width_ratio = square / source_width as f64;
    let height_ratio = square / source_height as f64;
    let scale = width_ratio.min(height_ratio);

    let draw_width = source_width as f64 * scale * params.padding_factor;
    let draw_height = source_height as f64 * scale * params.padding_factor;

    let content = Rect {
        x: (square - draw_width) / 2.0,
        y: (square - draw_height) / 2.0,
        width: draw_width,
        height: draw_height,
    };

    // Target staging: center the square, overflowing on the shorter axis
    let square_offset = (
        (params.target_width as f64 - square) / 2.0,
        (params.target_height as f64 - square) / 2.0,
    );

    let width = snap_length(draw_width);
    let height = snap_length(draw_height);
    let placement = PixelRect {
        x: centered_offset(params.target_width, width),
        y: centered_offset(params.target_height, height),
        width,
        height,
    };

    let layout = Layout {
        target_width: params.target_width,
        target_height: params.target_height,
        square_size,
        scale,
        content,
        square_offset,
        placement,
    };

    log::debug!(
        "layout {}x{} -> square {} content {:.2}x{:.2} placed at ({}, {}) as {}x{}",
        source_width,
        source_height,
        square_size,
        draw_width,
        draw_height,
        placement.x,
        placement.y,
        placement.width,
        placement.height
    );

    Ok(layout)
}

/// Round a drawn length to whole pixels, never below one
fn snap_length(length: f64) -> u32 {
    (length.round() as u32).max(1)
}

/// Offset that centers `inner` within `outer`, rounding toward negative infinity
fn centered_offset(outer: u32, inner: u32) -> i64 {
    (outer as i64 - inner as i64).div_euclid(2)
}
