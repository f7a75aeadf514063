//! Pipeline stages for image conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. the SVG rasteriser) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ decode ──▶ geometry ──▶ rasterize ──▶ encode
//! (path)    (usvg /    (scale or    (pixel        (PNG / JPEG
//!            image)     ratio math)  surface)      container)
//! ```
//!
//! 1. [`input`]     — resolve the local file and gate its extension
//! 2. [`decode`]    — parse bytes as the declared format into a
//!    [`decode::SourceImage`] with known natural dimensions
//! 3. geometry      — [`crate::geometry::compute_output_geometry`]; pure
//!    math, lives outside the pipeline tree
//! 4. [`rasterize`] — draw the decoded image into a fresh RGBA surface
//!    sized to the target geometry
//! 5. [`encode`]    — serialise the surface into the target container
//!
//! The stages are CPU-bound and run inside `spawn_blocking`; the
//! orchestration in [`crate::convert`] awaits each before starting the
//! next.

pub mod decode;
pub mod encode;
pub mod input;
pub mod rasterize;
