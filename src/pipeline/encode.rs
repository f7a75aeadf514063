//! Encoding: RGBA pixel surface → encoded container bytes.
//!
//! PNG is lossless and keeps the alpha channel. JPEG has no alpha, so the
//! channel is dropped before encoding, and the `image` crate's default
//! lossy quality applies — no quality knob is exposed.

use crate::error::ConvertError;
use crate::format::TargetFormat;
use image::{DynamicImage, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// Serialise `pixels` into the target container.
pub fn encode(pixels: &RgbaImage, target: TargetFormat) -> Result<Vec<u8>, ConvertError> {
    let (width, height) = (pixels.width(), pixels.height());
    if width == 0 || height == 0 {
        return Err(ConvertError::ZeroAreaSurface { width, height });
    }

    let mut buf = Vec::new();
    let result = match target {
        TargetFormat::Png => {
            pixels.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        }
        TargetFormat::Jpeg => DynamicImage::ImageRgba8(pixels.clone())
            .to_rgb8()
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg),
    };

    result.map_err(|e| ConvertError::EncodeFailed {
        mime: target.mime_type(),
        detail: e.to_string(),
    })?;

    debug!(
        "Encoded {}x{} surface → {} bytes of {}",
        width,
        height,
        buf.len(),
        target.mime_type()
    );

    Ok(buf)
}
