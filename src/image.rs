//! Image value objects.
//!
//! JPEG data is embedded as-is (DCTDecode); raw RGB and grayscale pixels
//! are wrapped into an XObject by the engine at render time.

use bytes::Bytes;

use crate::engine::{ImageData, ImageResource};
use crate::error::{Error, Result};

/// An image placeable on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    resource: ImageResource,
}

impl Image {
    /// Wrap a complete JPEG stream.
    ///
    /// The pixel dimensions are read from the frame header; anything that
    /// is not a baseline or progressive JPEG is rejected.
    pub fn from_jpeg(data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        let (width, height) = jpeg_dimensions(&data)
            .ok_or_else(|| Error::Image("not a decodable JPEG stream".to_string()))?;
        Ok(Self {
            resource: ImageResource::new(width, height, ImageData::Jpeg(data)),
        })
    }

    /// Wrap raw 8-bit RGB pixels, three bytes per pixel, row-major.
    pub fn from_rgb(width: u32, height: u32, data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(Error::Image(format!(
                "RGB pixel buffer holds {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            resource: ImageResource::new(width, height, ImageData::Rgb(data)),
        })
    }

    /// Wrap raw 8-bit grayscale pixels, one byte per pixel, row-major.
    pub fn from_gray(width: u32, height: u32, data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::Image(format!(
                "grayscale pixel buffer holds {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            resource: ImageResource::new(width, height, ImageData::Gray(data)),
        })
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.resource.width()
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.resource.height()
    }

    /// Extract the engine-native image handle.
    pub fn resource(&self) -> &ImageResource {
        &self.resource
    }
}

/// Scan JPEG markers for the frame header and return (width, height).
fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }

    let mut pos = 2;
    while pos + 3 < data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        // Fill bytes before a marker are legal.
        let mut marker_pos = pos + 1;
        while marker_pos < data.len() && data[marker_pos] == 0xFF {
            marker_pos += 1;
        }
        let marker = *data.get(marker_pos)?;
        pos = marker_pos + 1;

        match marker {
            // SOF0/1/2: height and width follow the precision byte
            0xC0 | 0xC1 | 0xC2 => {
                let height = u16::from_be_bytes([*data.get(pos + 3)?, *data.get(pos + 4)?]);
                let width = u16::from_be_bytes([*data.get(pos + 5)?, *data.get(pos + 6)?]);
                return Some((width as u32, height as u32));
            },
            // Standalone markers carry no length field.
            0xD0..=0xD9 => {},
            _ => {
                let len = u16::from_be_bytes([*data.get(pos)?, *data.get(pos + 1)?]) as usize;
                if len < 2 {
                    return None;
                }
                pos += len;
            },
        }
    }
    None
}
