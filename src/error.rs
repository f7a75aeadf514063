//! Error types for the pixelswitch library.
//!
//! A single [`ConvertError`] enum covers every failure mode, grouped by the
//! pipeline stage that produces it. The three groups the public contract
//! cares about — decode, geometry, encode — are distinguishable through the
//! [`ConvertError::is_decode`], [`ConvertError::is_geometry`], and
//! [`ConvertError::is_encode`] predicates so callers can branch on the stage
//! without matching every variant.
//!
//! Every error is recoverable at the caller's boundary: a failed conversion
//! leaves the session in its configuring state, and no partial output is
//! ever surfaced as success.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pixelswitch library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Image file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file's extension is not accepted by the selected conversion mode.
    #[error("'{path}' has extension '{extension}', but {mode} accepts only {accepted}")]
    UnsupportedExtension {
        path: PathBuf,
        extension: String,
        mode: &'static str,
        accepted: &'static str,
    },

    /// No conversion mode is defined for this file extension.
    #[error("No conversion is defined for '{extension}' files.\nSupported inputs: .svg, .jpg, .jpeg, .png, .webp")]
    UnknownExtension { extension: String },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// The input was empty (zero bytes).
    #[error("Input is empty (0 bytes); nothing to decode")]
    EmptyInput,

    /// The bytes could not be parsed as the declared format.
    #[error("Failed to decode input as {format}: {detail}\nThe file may be corrupt or carry the wrong extension.")]
    DecodeFailed { format: &'static str, detail: String },

    /// The decoder produced an image with a zero dimension.
    ///
    /// Surfaced explicitly so a broken decode can never masquerade as a
    /// successful 0×0 image.
    #[error("Decoded {format} image has a zero dimension ({width}x{height})")]
    ZeroDimension {
        format: &'static str,
        width: u32,
        height: u32,
    },

    // ── Geometry errors ───────────────────────────────────────────────────
    /// A requested dimension was zero.
    #[error("Requested {axis} must be at least 1 pixel")]
    NonPositiveDimension { axis: &'static str },

    /// The scale factor was zero, negative, NaN, or infinite.
    #[error("Scale factor must be a positive finite number, got {value}")]
    InvalidScale { value: f64 },

    /// Geometry controls were used on a raster-to-raster conversion.
    #[error("{mode} does not support resizing; output always matches the source dimensions")]
    ScalingUnsupported { mode: &'static str },

    // ── Encode errors ─────────────────────────────────────────────────────
    /// The pixel surface to encode has zero area.
    #[error("Cannot encode a zero-area surface ({width}x{height})")]
    ZeroAreaSurface { width: u32, height: u32 },

    /// The encoder rejected the surface or the target format.
    #[error("Failed to encode output as {mime}: {detail}")]
    EncodeFailed { mime: &'static str, detail: String },

    /// The rasteriser could not allocate the target pixel surface.
    #[error("Failed to allocate a {width}x{height} pixel surface")]
    SurfaceAllocFailed { width: u32, height: u32 },

    // ── Session / engine errors ───────────────────────────────────────────
    /// A conversion is already running; the engine holds one in-flight slot.
    #[error("A conversion is already in flight; wait for it to finish or use the queued entry point")]
    ConversionInFlight,

    /// An operation was attempted in a session state that does not allow it.
    #[error("Operation '{operation}' is not allowed in session state {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// True for errors produced while decoding the input.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::DecodeFailed { .. } | Self::ZeroDimension { .. }
        )
    }

    /// True for errors produced while computing output geometry.
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            Self::NonPositiveDimension { .. }
                | Self::InvalidScale { .. }
                | Self::ScalingUnsupported { .. }
        )
    }

    /// True for errors produced while encoding the output.
    pub fn is_encode(&self) -> bool {
        matches!(
            self,
            Self::ZeroAreaSurface { .. }
                | Self::EncodeFailed { .. }
                | Self::SurfaceAllocFailed { .. }
        )
    }
}
