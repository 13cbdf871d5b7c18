//! Resize Core - Letterbox compositing for batch image resizing
//!
//! This crate provides functionality for:
//! - Computing the square-then-target letterbox layout for any source size
//! - Decoding an image, drawing it padded and centered on a white canvas
//! - Encoding the result in the same media type as the source
//! - Converting a batch of images, fail-fast or per item
//!
//! # Example
//!
//! ```ignore
//! use resize_core::{compose, CompositionParams, SourceImage};
//!
//! let source = SourceImage::new(std::fs::read("photo.jpg")?, "image/jpeg", "photo.jpg");
//! let output = compose(&source, &CompositionParams::default())?;
//! assert_eq!((output.width, output.height), (1920, 1280));
//! std::fs::write("out/photo.jpg", &output.bytes)?;
//! ```

pub mod batch;
mod compose;
mod layout;
mod media;
mod params;

pub use batch::{compose_all, compose_each, BatchReport};
pub use compose::{compose, OutputImage, SourceImage};
pub use layout::{compute_layout, Layout, PixelRect, Rect};
pub use media::{format_for_media_type, media_type_for_path};
pub use params::{
    CompositionParams, ResizeFilter, DEFAULT_JPEG_QUALITY, DEFAULT_PADDING_FACTOR,
    DEFAULT_TARGET_HEIGHT, DEFAULT_TARGET_WIDTH, MAX_SQUARE_SIZE,
};

use thiserror::Error;

/// Errors that can occur while converting an image
#[derive(Debug, Error)]
pub enum CompositorError {
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Unsupported media type: {0:?}")]
    UnsupportedMediaType(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid composition parameters: {0}")]
    InvalidParams(String),

    #[error("Image {index} ({file_name:?}) failed: {source}")]
    BatchItem {
        index: usize,
        file_name: String,
        #[source]
        source: Box<CompositorError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for compositing operations
pub type Result<T> = std::result::Result<T, CompositorError>;
