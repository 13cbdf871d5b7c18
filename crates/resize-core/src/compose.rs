//! Decode, letterbox and re-encode a single image

use crate::layout::compute_layout;
use crate::media::{format_for_media_type, media_type_for_path};
use crate::{CompositionParams, CompositorError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{
    imageops, DynamicImage, GenericImageView, ImageDecoder, ImageFormat, ImageReader, RgbImage,
    Rgba, RgbaImage,
};
use std::io::Cursor;
use std::path::Path;

impl From<image::ImageError> for CompositorError {
    fn from(err: image::ImageError) -> Self {
        CompositorError::DecodeError(err.to_string())
    }
}

/// Background of both staging canvases
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// An image as handed over by the file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Raw file bytes
    pub bytes: Vec<u8>,
    /// Declared media type (e.g. `image/jpeg`)
    pub media_type: String,
    /// Original file name
    pub file_name: String,
}

impl SourceImage {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        media_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Read a file, declaring its media type from the extension
    ///
    /// An unknown extension leaves the media type empty, which `compose`
    /// rejects as unsupported.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let media_type = media_type_for_path(path).unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(bytes, media_type, file_name))
    }
}

/// A composed image, ready to be offered for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputImage {
    /// Encoded bytes
    pub bytes: Vec<u8>,
    /// Same media type as the source
    pub media_type: String,
    /// Same file name as the source
    pub file_name: String,
    /// Pixel width (always the target width)
    pub width: u32,
    /// Pixel height (always the target height)
    pub height: u32,
}

impl OutputImage {
    /// Name to save the image under
    ///
    /// Falls back to `resized-image-{index}.jpg` when the source had no name.
    pub fn download_name(&self, index: usize) -> String {
        if self.file_name.is_empty() {
            format!("resized-image-{index}.jpg")
        } else {
            self.file_name.clone()
        }
    }
}

/// Compose one source image onto a white `target_width x target_height` canvas
///
/// The source is scaled to fit a `max(W, H)` square, shrunk by the padding
/// factor, centered, and the square is centered on the target (clipped on the
/// shorter axis). The result is encoded with the source's declared media type.
///
/// # Errors
/// - `InvalidParams` for rejected parameters
/// - `UnsupportedMediaType` if the declared type has no encoder
/// - `DecodeError` if the bytes are not a readable image
/// - `InvalidDimensions` if the decoded image has a zero side
/// - `EncodeError` if serialization fails
pub fn compose(source: &SourceImage, params: &CompositionParams) -> Result<OutputImage> {
    params.validate()?;
    let format = format_for_media_type(&source.media_type)?;

    let decoded = decode(&source.bytes)?;
    let canvas = render(&decoded, params)?;
    let bytes = encode(canvas, format, params.jpeg_quality)?;

    Ok(OutputImage {
        bytes,
        media_type: source.media_type.clone(),
        file_name: source.file_name.clone(),
        width: params.target_width,
        height: params.target_height,
    })
}

/// Decode image bytes, sniffing the format from the content
///
/// The EXIF orientation is applied, so the layout sees the image upright the
/// way an `<img>` element would show it.
fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CompositorError::DecodeError(e.to_string()))?;

    let mut decoder = reader.into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);

    Ok(image)
}

/// Draw the decoded image onto the white target canvas
///
/// The two staging canvases collapse into one draw: the content is placed at
/// the composed offset and anything past the target edges is dropped.
fn render(image: &DynamicImage, params: &CompositionParams) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    let layout = compute_layout(width, height, params)?;
    let placement = layout.placement;

    let mut canvas = RgbaImage::from_pixel(params.target_width, params.target_height, WHITE);
    let scaled = imageops::resize(
        &image.to_rgba8(),
        placement.width,
        placement.height,
        params.resize_filter.into(),
    );

    // Alpha in the source is blended over white, like a canvas draw
    imageops::overlay(&mut canvas, &scaled, placement.x, placement.y);

    Ok(DynamicImage::ImageRgba8(canvas).into_rgb8())
}

/// Serialize the canvas in the requested format
fn encode(canvas: RgbImage, format: ImageFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    let written = match format {
        ImageFormat::Jpeg => {
            canvas.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, jpeg_quality))
        }
        _ => DynamicImage::ImageRgb8(canvas).write_to(&mut Cursor::new(&mut bytes), format),
    };
    written.map_err(|e| CompositorError::EncodeError(e.to_string()))?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResizeFilter;
    use image::Rgb;

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        png_bytes(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba(color),
        )))
    }

    #[test]
    fn test_render_places_content_on_white() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255])));
        let params = CompositionParams::new(200, 100, 0.5).with_filter(ResizeFilter::Nearest);

        let canvas = render(&source, &params).unwrap();

        // square 200, scale 5, drawn 100x50 centered at (50, 25)
        assert_eq!(canvas.dimensions(), (200, 100));
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*canvas.get_pixel(49, 50), Rgb([255, 255, 255]));
        assert_eq!(*canvas.get_pixel(50, 25), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(100, 50), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(149, 74), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(150, 74), Rgb([255, 255, 255]));
        assert_eq!(*canvas.get_pixel(100, 75), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_render_blends_transparency_over_white() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0])));
        let params = CompositionParams::new(100, 100, 1.0).with_filter(ResizeFilter::Nearest);

        let canvas = render(&source, &params).unwrap();
        assert!(canvas.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_render_crops_overflow() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255])));
        let params = CompositionParams::new(300, 100, 1.0).with_filter(ResizeFilter::Nearest);

        // 300x300 content on a 300x100 canvas fills it entirely
        let canvas = render(&source, &params).unwrap();
        assert_eq!(canvas.dimensions(), (300, 100));
        assert!(canvas.pixels().all(|p| *p == Rgb([0, 0, 255])));
    }

    #[test]
    fn test_compose_png_roundtrip_dimensions() {
        let source = SourceImage::new(solid_png(30, 60, [0, 128, 0, 255]), "image/png", "leaf.png");
        let params = CompositionParams::new(120, 80, 0.5);

        let output = compose(&source, &params).unwrap();
        assert_eq!(output.media_type, "image/png");
        assert_eq!(output.file_name, "leaf.png");
        assert_eq!((output.width, output.height), (120, 80));

        let decoded = image::load_from_memory(&output.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (120, 80));
    }

    #[test]
    fn test_compose_encodes_declared_type_not_sniffed_type() {
        // PNG bytes declared as JPEG come out as JPEG
        let source = SourceImage::new(solid_png(16, 16, [10, 20, 30, 255]), "image/jpeg", "a.jpg");
        let output = compose(&source, &CompositionParams::new(64, 48, 0.5)).unwrap();

        assert_eq!(
            image::guess_format(&output.bytes).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(output.media_type, "image/jpeg");
    }

    #[test]
    fn test_compose_rejects_garbage() {
        let source = SourceImage::new(b"definitely not an image".to_vec(), "image/png", "x.png");
        let err = compose(&source, &CompositionParams::default()).unwrap_err();
        assert!(matches!(err, CompositorError::DecodeError(_)));
    }

    #[test]
    fn test_compose_rejects_unsupported_media_type() {
        let source = SourceImage::new(solid_png(4, 4, [0, 0, 0, 255]), "image/svg+xml", "x.svg");
        let err = compose(&source, &CompositionParams::default()).unwrap_err();
        assert!(matches!(err, CompositorError::UnsupportedMediaType(_)));
    }

    #[test]
    fn test_from_path_reads_file_and_type() {
        let name = format!("resize-core-{}-dot.png", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, solid_png(2, 2, [0, 0, 0, 255])).unwrap();

        let source = SourceImage::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(source.media_type, "image/png");
        assert_eq!(source.file_name, path.file_name().unwrap().to_string_lossy());
        assert!(!source.bytes.is_empty());
    }

    #[test]
    fn test_from_path_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("resize-core-does-not-exist.png");
        let err = SourceImage::from_path(&path).unwrap_err();
        assert!(matches!(err, CompositorError::IoError(_)));
    }

    #[test]
    fn test_download_name_fallback() {
        let output = OutputImage {
            bytes: vec![],
            media_type: "image/jpeg".to_string(),
            file_name: String::new(),
            width: 1920,
            height: 1280,
        };
        assert_eq!(output.download_name(3), "resized-image-3.jpg");

        let named = OutputImage {
            file_name: "beach.jpg".to_string(),
            ..output
        };
        assert_eq!(named.download_name(3), "beach.jpg");
    }
}
