//! WASM bindings for batch-resizer
//!
//! This crate provides JavaScript-friendly API for:
//! - Letterboxing a single image held in memory
//! - Letterboxing a batch of `{ bytes, type, name }` items
//! - Letterboxing the `File` objects of a file input, producing new `File`s
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { resizeFiles, defaultOptions } from 'batch-resizer-wasm';
//!
//! await init();
//!
//! // 1920x1280 with 0.5 padding unless overridden
//! const options = { ...defaultOptions(), paddingFactor: 0.6 };
//!
//! const resized = await resizeFiles(input.files, options);
//! // resized[i] is a File with the same name and type as input.files[i]
//! ```

mod logger;

use std::str::FromStr;

use js_sys::{Array, Reflect, Uint8Array};
use resize_core::{CompositionParams, OutputImage, SourceImage};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

// Initialize panic hook and console logging for the browser
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

/// Change the console log level
///
/// @param level - One of "off", "error", "warn", "info", "debug", "trace"
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = log::LevelFilter::from_str(level)
        .map_err(|_| JsValue::from_str(&format!("Unknown log level: {level}")))?;
    logger::init(filter);
    Ok(())
}

/// Default composition options
///
/// @returns { targetWidth, targetHeight, paddingFactor, resizeFilter, jpegQuality }
#[wasm_bindgen(js_name = defaultOptions)]
pub fn default_options() -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(&CompositionParams::default())?)
}

/// A letterboxed image
#[wasm_bindgen]
pub struct ResizedImage {
    inner: OutputImage,
}

#[wasm_bindgen]
impl ResizedImage {
    /// Encoded image bytes (Uint8Array)
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// Media type, identical to the source's
    #[wasm_bindgen(getter, js_name = mediaType)]
    pub fn media_type(&self) -> String {
        self.inner.media_type.clone()
    }

    /// File name, identical to the source's
    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.inner.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Name to download the image under
    ///
    /// @param index - Position in the batch, used when the file has no name
    /// @returns File name, or "resized-image-{index}.jpg"
    #[wasm_bindgen(js_name = downloadName)]
    pub fn download_name(&self, index: usize) -> String {
        self.inner.download_name(index)
    }
}

/// Letterbox one image
///
/// @param bytes - Image file bytes (Uint8Array)
/// @param mediaType - Declared media type, e.g. "image/jpeg"
/// @param fileName - Name to carry over to the output
/// @param options - Optional partial options object
/// @returns ResizedImage
#[wasm_bindgen(js_name = resizeImage)]
pub fn resize_image(
    bytes: &[u8],
    media_type: &str,
    file_name: &str,
    options: JsValue,
) -> Result<ResizedImage, JsValue> {
    let params = parse_options(options)?;
    let source = SourceImage::new(bytes, media_type, file_name);

    let inner = resize_core::compose(&source, &params).map_err(to_js_error)?;
    Ok(ResizedImage { inner })
}

/// Letterbox a batch of in-memory images
///
/// Fails as a whole if any item fails.
///
/// @param items - Array of { bytes: Uint8Array, type: string, name: string }
/// @param options - Optional partial options object
/// @returns Array of ResizedImage, in input order
#[wasm_bindgen(js_name = resizeImages)]
pub fn resize_images(items: Array, options: JsValue) -> Result<Array, JsValue> {
    let params = parse_options(options)?;
    let sources = items
        .iter()
        .map(|item| source_from_object(&item))
        .collect::<Result<Vec<_>, JsValue>>()?;

    let outputs = resize_core::compose_all(&sources, &params).map_err(to_js_error)?;
    Ok(outputs
        .into_iter()
        .map(|inner| JsValue::from(ResizedImage { inner }))
        .collect())
}

/// Letterbox the files picked in a file input
///
/// Reads every file, composes them, and wraps each result in a new `File`
/// with the original name and type. Fails as a whole if any file fails.
///
/// @param files - FileList or Array of File
/// @param options - Optional partial options object
/// @returns Promise<File[]>, in input order
#[wasm_bindgen(js_name = resizeFiles)]
pub async fn resize_files(files: JsValue, options: JsValue) -> Result<Array, JsValue> {
    let params = parse_options(options)?;

    let mut sources = Vec::new();
    for value in Array::from(&files).iter() {
        let file: web_sys::File = value
            .dyn_into()
            .map_err(|_| JsValue::from_str("Expected a File"))?;
        let buffer = JsFuture::from(file.array_buffer()).await?;
        let bytes = Uint8Array::new(&buffer).to_vec();
        sources.push(SourceImage::new(bytes, file.type_(), file.name()));
    }

    let outputs = resize_core::compose_all(&sources, &params).map_err(to_js_error)?;

    let result = Array::new();
    for output in &outputs {
        let file = output_to_file(output)?;
        result.push(&file);
    }
    Ok(result)
}

/// Parse an optional options object, falling back to the defaults
fn parse_options(options: JsValue) -> Result<CompositionParams, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(CompositionParams::default());
    }

    // Range checks happen in the compositor
    Ok(serde_wasm_bindgen::from_value(options)?)
}

/// Read `{ bytes, type, name }` into a SourceImage
fn source_from_object(item: &JsValue) -> Result<SourceImage, JsValue> {
    let bytes = Reflect::get(item, &JsValue::from_str("bytes"))?;
    let bytes = bytes
        .dyn_into::<Uint8Array>()
        .map_err(|_| JsValue::from_str("Item bytes must be a Uint8Array"))?
        .to_vec();

    let media_type = Reflect::get(item, &JsValue::from_str("type"))?
        .as_string()
        .unwrap_or_default();
    let file_name = Reflect::get(item, &JsValue::from_str("name"))?
        .as_string()
        .unwrap_or_default();

    Ok(SourceImage::new(bytes, media_type, file_name))
}

/// Wrap an output in a browser `File`
fn output_to_file(output: &OutputImage) -> Result<web_sys::File, JsValue> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(output.bytes.as_slice()));

    let properties = web_sys::FilePropertyBag::new();
    properties.set_type(&output.media_type);

    web_sys::File::new_with_u8_array_sequence_and_options(&parts, &output.file_name, &properties)
}

fn to_js_error(err: resize_core::CompositorError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use wasm_bindgen_test::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([1, 2, 3])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[wasm_bindgen_test]
    fn test_resize_image_defaults() {
        let image = resize_image(&png(40, 30), "image/png", "tiny.png", JsValue::UNDEFINED).unwrap();
        assert_eq!(image.width(), 1920);
        assert_eq!(image.height(), 1280);
        assert_eq!(image.media_type(), "image/png");
        assert_eq!(image.file_name(), "tiny.png");
        assert_eq!(image.download_name(0), "tiny.png");
    }

    #[wasm_bindgen_test]
    fn test_resize_image_rejects_garbage() {
        assert!(resize_image(b"nope", "image/png", "x.png", JsValue::NULL).is_err());
    }

    #[wasm_bindgen_test]
    fn test_resize_images_keeps_order() {
        let items = Array::new();
        for name in ["a.png", "b.png"] {
            let item = js_sys::Object::new();
            Reflect::set(&item, &"bytes".into(), &Uint8Array::from(png(8, 4).as_slice())).unwrap();
            Reflect::set(&item, &"type".into(), &"image/png".into()).unwrap();
            Reflect::set(&item, &"name".into(), &name.into()).unwrap();
            items.push(&item);
        }

        let options = js_sys::Object::new();
        Reflect::set(&options, &"targetWidth".into(), &JsValue::from(64)).unwrap();
        Reflect::set(&options, &"targetHeight".into(), &JsValue::from(32)).unwrap();

        let outputs = resize_images(items, options.into()).unwrap();
        assert_eq!(outputs.length(), 2);
    }

    #[wasm_bindgen_test]
    fn test_invalid_options_are_rejected() {
        let options = js_sys::Object::new();
        Reflect::set(&options, &"paddingFactor".into(), &JsValue::from(0.0)).unwrap();
        assert!(resize_image(&png(4, 4), "image/png", "x.png", options.into()).is_err());
    }

    #[wasm_bindgen_test]
    fn test_oversized_target_is_rejected() {
        let options = js_sys::Object::new();
        Reflect::set(&options, &"targetWidth".into(), &JsValue::from(40_000)).unwrap();
        Reflect::set(&options, &"targetHeight".into(), &JsValue::from(40_000)).unwrap();
        assert!(resize_image(&png(4, 4), "image/png", "x.png", options.into()).is_err());
    }
}
