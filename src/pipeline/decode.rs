//! Decoding: raw bytes + declared format → [`SourceImage`].
//!
//! The declared format is trusted, never sniffed: an SVG input goes through
//! usvg, everything else through the matching `image` decoder. A decoder
//! that reports a zero dimension is treated as a failure — a broken decode
//! must never masquerade as a successful 0×0 image.

use crate::error::ConvertError;
use crate::format::SourceFormat;
use crate::geometry::NaturalSize;
use image::DynamicImage;
use resvg::usvg;
use std::fmt;
use tracing::debug;

/// The renderable surface produced by decoding.
pub enum DecodedSurface {
    /// Fixed pixel grid (JPEG, PNG, WebP).
    Raster(DynamicImage),
    /// Resolution-independent scene graph (SVG).
    Vector(usvg::Tree),
}

/// A decoded input image with known natural dimensions.
///
/// Immutable after decode; owned by exactly one conversion at a time
/// (the session shares it behind an `Arc` across retries).
pub struct SourceImage {
    format: SourceFormat,
    surface: DecodedSurface,
    natural: NaturalSize,
}

impl SourceImage {
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn surface(&self) -> &DecodedSurface {
        &self.surface
    }

    /// Intrinsic dimensions: pixel size for raster sources, declared
    /// viewport size for vector sources. Both axes are ≥ 1.
    pub fn natural_size(&self) -> NaturalSize {
        self.natural
    }
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("format", &self.format)
            .field("natural", &self.natural)
            .finish()
    }
}

/// Decode `bytes` as the declared `format`.
///
/// # Errors
/// [`ConvertError::EmptyInput`] for a zero-byte payload,
/// [`ConvertError::DecodeFailed`] when the bytes cannot be parsed as the
/// declared format, [`ConvertError::ZeroDimension`] when the decoder
/// reports a degenerate size.
pub fn decode(bytes: &[u8], format: SourceFormat) -> Result<SourceImage, ConvertError> {
    if bytes.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let source = match format {
        SourceFormat::Svg => decode_svg(bytes)?,
        raster => decode_raster(bytes, raster)?,
    };

    debug!(
        "Decoded {} input: {}x{} natural px",
        source.format, source.natural.width, source.natural.height
    );

    Ok(source)
}

fn decode_svg(bytes: &[u8]) -> Result<SourceImage, ConvertError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &options).map_err(|e| ConvertError::DecodeFailed {
        format: "SVG",
        detail: e.to_string(),
    })?;

    // usvg guarantees a positive size, but the viewport is declared in
    // float units; rounding to whole pixels may only hit zero for
    // sub-pixel viewports, which we bump to 1 rather than reject.
    let size = tree.size();
    let natural = NaturalSize::new(
        (size.width().round() as u32).max(1),
        (size.height().round() as u32).max(1),
    );

    Ok(SourceImage {
        format: SourceFormat::Svg,
        surface: DecodedSurface::Vector(tree),
        natural,
    })
}

fn decode_raster(bytes: &[u8], format: SourceFormat) -> Result<SourceImage, ConvertError> {
    let image_format = match format {
        SourceFormat::Jpeg => image::ImageFormat::Jpeg,
        SourceFormat::Png => image::ImageFormat::Png,
        SourceFormat::Webp => image::ImageFormat::WebP,
        SourceFormat::Svg => unreachable!("SVG is decoded by usvg"),
    };

    let img = image::load_from_memory_with_format(bytes, image_format).map_err(|e| {
        ConvertError::DecodeFailed {
            format: format.name(),
            detail: e.to_string(),
        }
    })?;

    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(ConvertError::ZeroDimension {
            format: format.name(),
            width,
            height,
        });
    }

    Ok(SourceImage {
        format,
        surface: DecodedSurface::Raster(img),
        natural: NaturalSize::new(width, height),
    })
}
