//! Raster images registered with a document.

use std::fmt;
use std::str::FromStr;

use crate::error::PdfError;

/// Encoded image formats that can be placed on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Returns the typical file extension for this image kind.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Jpeg => f.write_str("jpeg"),
            ImageKind::Png => f.write_str("png"),
        }
    }
}

impl FromStr for ImageKind {
    type Err = PdfError;

    /// Parses `jpeg`, `jpg` or `png`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageKind::Jpeg),
            "png" => Ok(ImageKind::Png),
            _ => Err(PdfError::Unsupported(format!("image kind {s:?}"))),
        }
    }
}

/// Color model of decoded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageColor {
    Gray,
    Rgb,
}

impl ImageColor {
    /// Number of color components per pixel.
    pub fn components(&self) -> u8 {
        match self {
            ImageColor::Gray => 1,
            ImageColor::Rgb => 3,
        }
    }

    /// PDF device color space name.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ImageColor::Gray => "DeviceGray",
            ImageColor::Rgb => "DeviceRGB",
        }
    }
}

/// Handle to an image registered with a [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageId(pub(crate) usize);

impl ImageId {
    /// Position of the image in [`Document::images`](crate::Document::images).
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An image ready for embedding.
///
/// For [`ImageKind::Jpeg`] `data` holds the original JPEG stream, embedded
/// unchanged. For [`ImageKind::Png`] it holds decoded, unfiltered samples in
/// row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub kind: ImageKind,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub color: ImageColor,
    pub bits_per_component: u8,
    pub data: Vec<u8>,
}

impl Image {
    /// Width and height in points when drawn at `scale`.
    pub fn scaled_size(&self, scale: f64) -> (f64, f64) {
        (
            f64::from(self.pixel_width) * scale,
            f64::from(self.pixel_height) * scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_common_spellings() {
        assert_eq!("jpeg".parse::<ImageKind>().unwrap(), ImageKind::Jpeg);
        assert_eq!("JPG".parse::<ImageKind>().unwrap(), ImageKind::Jpeg);
        assert_eq!("Png".parse::<ImageKind>().unwrap(), ImageKind::Png);
    }

    #[test]
    fn unknown_kind_is_unsupported() {
        let err = "gif".parse::<ImageKind>().unwrap_err();
        assert!(err.is_unsupported());
        assert!(err.to_string().contains("gif"));
    }

    #[test]
    fn kind_display_round_trips() {
        for kind in [ImageKind::Jpeg, ImageKind::Png] {
            assert_eq!(kind.to_string().parse::<ImageKind>().unwrap(), kind);
        }
    }

    #[test]
    fn color_components() {
        assert_eq!(ImageColor::Gray.components(), 1);
        assert_eq!(ImageColor::Rgb.components(), 3);
        assert_eq!(ImageColor::Rgb.pdf_name(), "DeviceRGB");
    }

    #[test]
    fn scaled_size_multiplies_pixels() {
        let image = Image {
            kind: ImageKind::Png,
            pixel_width: 40,
            pixel_height: 20,
            color: ImageColor::Rgb,
            bits_per_component: 8,
            data: vec![0; 40 * 20 * 3],
        };
        assert_eq!(image.scaled_size(0.5), (20.0, 10.0));
    }
}
