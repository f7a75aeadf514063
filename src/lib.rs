//! # pixelswitch
//!
//! Convert a single image between encoded formats, entirely locally.
//!
//! Four conversions are supported, each with a fixed target format:
//!
//! | conversion | target mime |
//! |-----------|-------------|
//! | SVG → PNG  | `image/png` (with arbitrary scaling) |
//! | JPG → PNG  | `image/png` |
//! | WebP → PNG | `image/png` |
//! | PNG → JPG  | `image/jpeg` |
//!
//! ## Pipeline Overview
//!
//! ```text
//! image file
//!  │
//!  ├─ 1. Input      resolve the local file, gate its extension
//!  ├─ 2. Decode     usvg (SVG) or the image crate (JPEG/PNG/WebP)
//!  ├─ 3. Geometry   scale factor or explicit axis + natural-ratio math
//!  ├─ 4. Rasterize  draw into a fresh RGBA surface (CPU-bound, spawn_blocking)
//!  └─ 5. Encode     PNG (lossless) or JPEG (default quality)
//! ```
//!
//! Vector sources may be scaled (a continuous 1–64× factor, or an explicit
//! width/height where the other axis follows the natural aspect ratio);
//! raster conversions always keep the source's pixel dimensions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pixelswitch::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder().scale(4.0).build()?;
//!     let result = convert("logo.svg", &config).await?;
//!     println!("{} {}x{}", result.mime_type, result.width, result.height);
//!     std::fs::write("logo_4x.png", &result.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! For interactive callers, [`ConversionSession`] models the full
//! load → configure → convert → reset lifecycle as an explicit state
//! machine, and [`ConversionEngine`] enforces the one-in-flight-conversion
//! contract.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pixelswitch` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pixelswitch = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod geometry;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{
    convert, convert_bytes, convert_sync, convert_to_file, inspect, ConversionEngine,
};
pub use error::ConvertError;
pub use format::{ConversionMode, SourceFormat, TargetFormat};
pub use geometry::{
    compute_output_geometry, GeometryMode, NaturalSize, OutputGeometry, MAX_SCALE, MIN_SCALE,
    SCALE_PRESETS,
};
pub use output::{output_filename, ConversionResult, ConversionStats, ImageInfo};
pub use pipeline::decode::SourceImage;
pub use progress::{
    ConversionProgressCallback, NoopProgressCallback, PipelineStage, ProgressCallback,
};
pub use session::{ConversionSession, SessionState};
