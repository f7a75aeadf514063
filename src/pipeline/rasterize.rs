//! Rasterisation: draw a decoded image into a fresh RGBA pixel surface.
//!
//! Vector sources are rendered with a per-axis scale transform that maps
//! the whole natural viewport onto the whole target rectangle — an affine
//! stretch, never a crop, so a non-proportional width/height pair distorts
//! the image instead of clipping it. Raster sources are copied 1:1; the
//! geometry stage has already pinned their output to the natural size.
//!
//! The surface is allocated fresh for every conversion, so no stale pixels
//! from a previous (larger) output can bleed into this one.

use crate::error::ConvertError;
use crate::geometry::OutputGeometry;
use crate::pipeline::decode::{DecodedSurface, SourceImage};
use image::RgbaImage;
use resvg::tiny_skia;
use resvg::usvg;
use tracing::debug;

/// Rasterise `source` into an RGBA surface of exactly `target` pixels.
pub fn rasterize(source: &SourceImage, target: OutputGeometry) -> Result<RgbaImage, ConvertError> {
    if target.width == 0 || target.height == 0 {
        return Err(ConvertError::ZeroAreaSurface {
            width: target.width,
            height: target.height,
        });
    }

    match source.surface() {
        DecodedSurface::Vector(tree) => rasterize_vector(tree, target),
        DecodedSurface::Raster(img) => {
            // Direct 1:1 copy; no resampling.
            debug_assert_eq!(
                (img.width(), img.height()),
                (target.width, target.height),
                "raster output geometry must equal natural size"
            );
            Ok(img.to_rgba8())
        }
    }
}

fn rasterize_vector(tree: &usvg::Tree, target: OutputGeometry) -> Result<RgbaImage, ConvertError> {
    let mut pixmap = tiny_skia::Pixmap::new(target.width, target.height).ok_or(
        ConvertError::SurfaceAllocFailed {
            width: target.width,
            height: target.height,
        },
    )?;

    // Map the full viewport (0,0,natural.w,natural.h) onto the full target
    // rectangle. The two axes scale independently.
    let size = tree.size();
    let scale_x = target.width as f32 / size.width();
    let scale_y = target.height as f32 / size.height();
    debug!(scale_x, scale_y, "Rendering SVG to {}x{} pixmap", target.width, target.height);

    resvg::render(
        tree,
        tiny_skia::Transform::from_scale(scale_x, scale_y),
        &mut pixmap.as_mut(),
    );

    // tiny-skia stores premultiplied alpha; demultiply so semi-transparent
    // regions keep their true colours in the encoded output.
    let mut data = Vec::with_capacity((target.width * target.height * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    RgbaImage::from_raw(target.width, target.height, data).ok_or_else(|| {
        ConvertError::Internal("pixmap size does not match target geometry".to_string())
    })
}
