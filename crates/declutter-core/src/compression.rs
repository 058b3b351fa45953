//! Image Compression
//!
//! Every photo is shrunk to fit a 1200px bounding box and re-encoded as
//! JPEG at quality 80 before upload. The transform is fixed.
//!
//! The browser build compresses on a canvas; [`JpegCompressor`] is the
//! native implementation used off the web and in tests.

use std::future::Future;
use std::io::Cursor;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

use crate::error::DomainResult;
use crate::upload::UploadFile;

/// Longest side of a compressed photo, in pixels
pub const MAX_DIMENSION: u32 = 1200;

/// JPEG quality on the encoder's 1..=100 scale (0.8)
pub const JPEG_QUALITY: u8 = 80;

/// Compression stage of the upload pipeline
#[async_trait(?Send)]
pub trait Compressor {
    async fn compress(&self, file: &UploadFile) -> DomainResult<Vec<u8>>;
}

/// Scale `(width, height)` down so the longer side is at most `MAX_DIMENSION`.
/// Images already small enough keep their size.
pub fn target_dimensions(width: u32, height: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest == 0 {
        return (width, height);
    }
    let scale = (MAX_DIMENSION as f64 / longest as f64).min(1.0);
    let w = (width as f64 * scale).round().max(1.0) as u32;
    let h = (height as f64 * scale).round().max(1.0) as u32;
    (w, h)
}

/// Decode, resize and re-encode an image as JPEG
pub fn compress_image(bytes: &[u8]) -> DomainResult<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let (w, h) = target_dimensions(img.width(), img.height());

    let resized = if (w, h) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(w, h, FilterType::Triangle)
    };

    // JPEG has no alpha channel
    let rgb = resized.to_rgb8();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode_image(&rgb)?;

    let out = out.into_inner();
    debug!(input = bytes.len(), output = out.len(), width = w, height = h, "compressed image");
    Ok(out)
}

/// Future that is pending exactly once, handing control back to the executor
#[derive(Debug, Default)]
pub struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Give other tasks a turn without depending on a particular runtime
pub fn yield_now() -> YieldNow {
    YieldNow::default()
}

/// Compressor backed by the `image` crate.
/// Yields once before the transform so the `Compressing` state is observable.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCompressor;

#[async_trait(?Send)]
impl Compressor for JpegCompressor {
    async fn compress(&self, file: &UploadFile) -> DomainResult<Vec<u8>> {
        yield_now().await;
        compress_image(file.bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::upload::{process_queue_item, FileStore, UploadQueue, UploadStatus};
    use image::{DynamicImage, ImageFormat, RgbaImage};
    use std::cell::RefCell;
    use std::sync::Arc;
    use std::task::{Wake, Waker};

    struct NoopWake;

    impl Wake for NoopWake {
        fn wake(self: Arc<Self>) {}
    }

    struct NullStore;

    #[async_trait(?Send)]
    impl FileStore for NullStore {
        async fn upload_file(&self, name: &str, _bytes: Vec<u8>) -> DomainResult<String> {
            Ok(name.to_string())
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_target_dimensions_landscape() {
        assert_eq!(target_dimensions(2400, 1200), (1200, 600));
    }

    #[test]
    fn test_target_dimensions_portrait_rounds() {
        assert_eq!(target_dimensions(1000, 3000), (400, 1200));
        assert_eq!(target_dimensions(1333, 4000), (400, 1200));
    }

    #[test]
    fn test_target_dimensions_never_upscales() {
        assert_eq!(target_dimensions(800, 600), (800, 600));
        assert_eq!(target_dimensions(1200, 1200), (1200, 1200));
    }

    #[test]
    fn test_compress_resizes_and_encodes_jpeg() {
        let out = compress_image(&png_bytes(2400, 1200)).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);

        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1200, 600));
    }

    #[test]
    fn test_compress_keeps_small_images() {
        let out = compress_image(&png_bytes(64, 32)).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 32));
    }

    #[test]
    fn test_compress_rejects_garbage() {
        let err = compress_image(b"not an image").unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn test_compress_suspends_before_transform() {
        let file = UploadFile::new("big.png", "image/png", png_bytes(2400, 1800));
        let compressor = JpegCompressor;
        let mut fut = compressor.compress(&file);
        let waker = Waker::from(Arc::new(NoopWake));
        let mut cx = Context::from_waker(&waker);

        assert!(fut.as_mut().poll(&mut cx).is_pending());
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(Ok(bytes)) => assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg),
            other => panic!("expected compressed bytes, got {:?}", other.map(|r| r.map(|b| b.len()))),
        }
    }

    #[tokio::test]
    async fn test_compressing_status_visible_to_other_tasks() {
        let queue = RefCell::new(UploadQueue::new());
        let ids = queue
            .borrow_mut()
            .enqueue(vec![UploadFile::new("a.png", "image/png", png_bytes(64, 32))]);
        let id = ids[0];

        let observer = async {
            loop {
                let status = queue.borrow().get(id).map(|i| i.status);
                match status {
                    Some(UploadStatus::Pending) => tokio::task::yield_now().await,
                    other => return other,
                }
            }
        };
        let (result, first_seen) =
            tokio::join!(process_queue_item(&queue, id, &JpegCompressor, &NullStore), observer);

        assert_eq!(result.unwrap(), UploadStatus::Success);
        assert_eq!(first_seen, Some(UploadStatus::Compressing));
    }
}
