//! Media type handling
//!
//! The output is encoded in the source's declared media type, so the mapping
//! only needs the formats that have an encoder enabled in this build.

use crate::{CompositorError, Result};
use image::ImageFormat;
use std::path::Path;

/// Media types with an encoder, and their format
const ENCODABLE: &[(&str, ImageFormat)] = &[
    ("image/jpeg", ImageFormat::Jpeg),
    ("image/png", ImageFormat::Png),
    ("image/gif", ImageFormat::Gif),
    ("image/webp", ImageFormat::WebP),
    ("image/bmp", ImageFormat::Bmp),
];

/// Non-standard spellings seen in the wild
const ALIASES: &[(&str, &str)] = &[
    ("image/jpg", "image/jpeg"),
    ("image/pjpeg", "image/jpeg"),
    ("image/x-png", "image/png"),
    ("image/x-bmp", "image/bmp"),
    ("image/x-ms-bmp", "image/bmp"),
];

/// Resolve a declared media type (e.g. `File.type`) to an output format
///
/// Matching ignores case, surrounding whitespace and parameters such as
/// `; charset=binary`.
///
/// # Errors
/// `UnsupportedMediaType` if the type is empty or has no encoder.
pub fn format_for_media_type(media_type: &str) -> Result<ImageFormat> {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == essence)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(essence.as_str());

    ENCODABLE
        .iter()
        .find(|(mime, _)| *mime == canonical)
        .map(|(_, format)| *format)
        .ok_or_else(|| CompositorError::UnsupportedMediaType(media_type.to_string()))
}

/// Canonical media type for an encodable format
pub(crate) fn media_type_for_format(format: ImageFormat) -> Option<&'static str> {
    ENCODABLE
        .iter()
        .find(|(_, f)| *f == format)
        .map(|(mime, _)| *mime)
}

/// Guess a media type from a file extension
///
/// Returns `None` for unknown extensions and for formats without an encoder.
pub fn media_type_for_path(path: impl AsRef<Path>) -> Option<&'static str> {
    ImageFormat::from_path(path)
        .ok()
        .and_then(media_type_for_format)
}
