//! Canvas Compression
//!
//! Decodes a picked photo with `createImageBitmap`, draws it scaled onto an
//! `OffscreenCanvas` and re-encodes it as JPEG. Every step is a promise, so
//! the event loop keeps running while a photo is being compressed.

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use declutter_core::compression::{target_dimensions, Compressor, JPEG_QUALITY};
use declutter_core::error::{DomainError, DomainResult};
use declutter_core::upload::UploadFile;

use super::js_error;

/// Compressor backed by the browser's image decoder and canvas encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserCompressor;

async fn compress_on_canvas(file: &UploadFile) -> Result<Vec<u8>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(file.bytes()));
    let props = web_sys::BlobPropertyBag::new();
    props.set_type(file.mime_type());
    let source = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &props)?;

    let bitmap: web_sys::ImageBitmap = JsFuture::from(window.create_image_bitmap_with_blob(&source)?)
        .await?
        .dyn_into()?;
    let (width, height) = target_dimensions(bitmap.width(), bitmap.height());

    let canvas = web_sys::OffscreenCanvas::new(width, height)?;
    let context: web_sys::OffscreenCanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;
    context.draw_image_with_image_bitmap_and_dw_and_dh(&bitmap, 0.0, 0.0, width as f64, height as f64)?;
    bitmap.close();

    let options = web_sys::ImageEncodeOptions::new();
    options.set_type("image/jpeg");
    options.set_quality(f64::from(JPEG_QUALITY) / 100.0);
    let jpeg: web_sys::Blob = JsFuture::from(canvas.convert_to_blob_with_options(&options)?)
        .await?
        .dyn_into()?;

    let buffer = JsFuture::from(jpeg.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    tracing::debug!(input = file.bytes().len(), output = bytes.len(), width, height, "compressed on canvas");
    Ok(bytes)
}

#[async_trait(?Send)]
impl Compressor for BrowserCompressor {
    async fn compress(&self, file: &UploadFile) -> DomainResult<Vec<u8>> {
        compress_on_canvas(file)
            .await
            .map_err(|err| DomainError::InvalidInput(format!("image: {}", js_error(err))))
    }
}
