//! Output-geometry math: scale factors and aspect-ratio derivation.
//!
//! Two ways to request output dimensions exist:
//!
//! * *scale mode* — multiply both natural axes by a scalar `k` and round;
//! * *explicit mode* — the caller supplies one axis and the other is
//!   derived from the **natural** aspect ratio.
//!
//! Derivation always uses the original natural ratio rather than the ratio
//! of a previously computed output. Rounding the derived axis and then
//! deriving back from it would otherwise compound ±1 errors across repeated
//! edits; anchoring on the natural ratio keeps every round trip within one
//! pixel no matter how many times the user edits the same axis.
//!
//! Geometry only applies to vector sources. Raster-to-raster conversions
//! always use [`GeometryMode::Natural`]: the output matches the source
//! pixel-for-pixel.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// Quick-pick scale multipliers exposed by the UI.
///
/// The continuous slider covers [`MIN_SCALE`]..=[`MAX_SCALE`]; these are
/// the snap shortcuts.
pub const SCALE_PRESETS: [f64; 7] = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0];

/// Lower bound of the UI scale slider.
pub const MIN_SCALE: f64 = 1.0;
/// Upper bound of the UI scale slider.
pub const MAX_SCALE: f64 = 64.0;

/// Intrinsic width/height of a decoded source, in pixels.
///
/// For vector sources this is the declared viewport size. Both axes are
/// guaranteed positive by the decode stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

impl NaturalSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Natural aspect ratio, width over height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Final pixel dimensions of the conversion output. Both axes are ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputGeometry {
    pub width: u32,
    pub height: u32,
}

/// How the caller wants output dimensions computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GeometryMode {
    /// Output matches the natural dimensions exactly (the only mode for
    /// raster sources).
    Natural,
    /// Multiply both natural axes by a positive finite scalar.
    Scale(f64),
    /// Fix the width; derive height from the natural ratio.
    Width(u32),
    /// Fix the height; derive width from the natural ratio.
    Height(u32),
    /// Both axes given independently. A non-proportional pair stretches
    /// the image rather than cropping it.
    Exact { width: u32, height: u32 },
}

impl Default for GeometryMode {
    fn default() -> Self {
        GeometryMode::Natural
    }
}

/// Derive the output height for a given width from the natural ratio.
pub fn derive_height(natural: NaturalSize, width: u32) -> u32 {
    round_dim(f64::from(width) * f64::from(natural.height) / f64::from(natural.width))
}

/// Derive the output width for a given height from the natural ratio.
pub fn derive_width(natural: NaturalSize, height: u32) -> u32 {
    round_dim(f64::from(height) * f64::from(natural.width) / f64::from(natural.height))
}

/// Round to the nearest integer pixel, clamping to at least 1.
fn round_dim(v: f64) -> u32 {
    (v.round() as u32).max(1)
}

/// Compute the output dimensions for a conversion request.
///
/// # Errors
/// [`ConvertError::InvalidScale`] for a non-positive or non-finite scale,
/// [`ConvertError::NonPositiveDimension`] for a zero explicit axis.
pub fn compute_output_geometry(
    natural: NaturalSize,
    mode: GeometryMode,
) -> Result<OutputGeometry, ConvertError> {
    match mode {
        GeometryMode::Natural => Ok(OutputGeometry {
            width: natural.width,
            height: natural.height,
        }),
        GeometryMode::Scale(k) => {
            if !k.is_finite() || k <= 0.0 {
                return Err(ConvertError::InvalidScale { value: k });
            }
            Ok(OutputGeometry {
                width: round_dim(f64::from(natural.width) * k),
                height: round_dim(f64::from(natural.height) * k),
            })
        }
        GeometryMode::Width(w) => {
            if w == 0 {
                return Err(ConvertError::NonPositiveDimension { axis: "width" });
            }
            Ok(OutputGeometry {
                width: w,
                height: derive_height(natural, w),
            })
        }
        GeometryMode::Height(h) => {
            if h == 0 {
                return Err(ConvertError::NonPositiveDimension { axis: "height" });
            }
            Ok(OutputGeometry {
                width: derive_width(natural, h),
                height: h,
            })
        }
        GeometryMode::Exact { width, height } => {
            if width == 0 {
                return Err(ConvertError::NonPositiveDimension { axis: "width" });
            }
            if height == 0 {
                return Err(ConvertError::NonPositiveDimension { axis: "height" });
            }
            Ok(OutputGeometry { width, height })
        }
    }
}
