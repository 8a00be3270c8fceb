//! Decoding JPEG and PNG files with the `image` crate.

use std::fs;
use std::path::Path;

use image::{ColorType, GenericImageView, ImageFormat};
use pdfscribe_core::{Image, ImageColor, ImageKind, ImageLoader, PdfError};

use crate::error::BackendError;

/// Loads raster images from disk.
///
/// JPEG files are validated by decoding them once and then embedded as-is
/// with `/DCTDecode`. PNG files are decoded to 8-bit gray or RGB samples;
/// alpha channels are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterImageLoader;

impl RasterImageLoader {
    pub fn new() -> Self {
        Self
    }

    /// Decode in-memory image bytes of the given kind.
    pub fn decode(&self, kind: ImageKind, bytes: Vec<u8>) -> Result<Image, BackendError> {
        let format = match kind {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
        };
        let decoded = image::load_from_memory_with_format(&bytes, format)?;
        let (pixel_width, pixel_height) = decoded.dimensions();
        let color = match decoded.color() {
            ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => ImageColor::Gray,
            _ => ImageColor::Rgb,
        };

        let data = match (kind, color) {
            (ImageKind::Jpeg, _) => bytes,
            (ImageKind::Png, ImageColor::Gray) => decoded.to_luma8().into_raw(),
            (ImageKind::Png, ImageColor::Rgb) => decoded.to_rgb8().into_raw(),
        };
        Ok(Image {
            kind,
            pixel_width,
            pixel_height,
            color,
            bits_per_component: 8,
            data,
        })
    }
}

impl ImageLoader for RasterImageLoader {
    fn load(&self, kind: ImageKind, path: &Path) -> Result<Image, PdfError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PdfError::NotFound(path.display().to_string()),
            _ => PdfError::from(BackendError::Io(e)),
        })?;
        let image = self.decode(kind, bytes)?;
        tracing::trace!(
            path = %path.display(),
            %kind,
            width = image.pixel_width,
            height = image.pixel_height,
            "loaded image"
        );
        Ok(image)
    }
}
