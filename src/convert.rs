//! Eager conversion entry points and the single-slot engine.
//!
//! The pipeline is a strict sequence: decode → geometry → rasterize →
//! encode. Each CPU-bound stage runs in `spawn_blocking` and is awaited
//! before its successor starts; no stage ever overlaps another within one
//! conversion. [`ConversionEngine`] adds the concurrency contract across
//! conversions — one in-flight request slot, with a waiting and a
//! fail-fast entry point.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::format::ConversionMode;
use crate::geometry::{compute_output_geometry, GeometryMode, OutputGeometry};
use crate::output::{output_filename, ConversionResult, ConversionStats, ImageInfo};
use crate::pipeline::decode::{self, SourceImage};
use crate::pipeline::{encode, input, rasterize};
use crate::progress::{PipelineStage, ProgressCallback};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Convert a local image file; the conversion mode is inferred from the
/// file extension via the deterministic target-format table.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Any [`ConvertError`]; all are recoverable — the caller may simply retry
/// with a different file or geometry.
pub async fn convert(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionResult, ConvertError> {
    let resolved = input::resolve_input(input_path.as_ref(), None)?;
    info!("Starting {}: {}", resolved.mode, resolved.path.display());
    convert_bytes(resolved.bytes, resolved.mode, config).await
}

/// Convert in-memory bytes declared as the given mode's source format.
///
/// This is the recommended API when image data comes from a drag-drop
/// payload or network buffer rather than a file on disk.
pub async fn convert_bytes(
    bytes: Vec<u8>,
    mode: ConversionMode,
    config: &ConversionConfig,
) -> Result<ConversionResult, ConvertError> {
    let total_start = Instant::now();
    let cb = config.progress_callback.clone();
    if let Some(ref cb) = cb {
        cb.on_conversion_start(mode);
    }

    // ── Step 1: Decode ───────────────────────────────────────────────────
    let input_bytes = bytes.len() as u64;
    let decode_start = Instant::now();
    if let Some(ref cb) = cb {
        cb.on_stage_start(PipelineStage::Decode);
    }
    let format = mode.source_format();
    let source = tokio::task::spawn_blocking(move || decode::decode(&bytes, format))
        .await
        .map_err(|e| ConvertError::Internal(format!("Decode task panicked: {e}")))?
        .map_err(|e| fail(cb.as_ref(), PipelineStage::Decode, e))?;
    let decode_ms = decode_start.elapsed().as_millis() as u64;
    if let Some(ref cb) = cb {
        cb.on_stage_complete(PipelineStage::Decode, decode_ms);
    }

    // Geometry requests only apply to vector sources; raster conversions
    // always keep the natural dimensions.
    let geometry_mode = if format.is_vector() {
        config.geometry
    } else {
        GeometryMode::Natural
    };

    run_stages(
        Arc::new(source),
        mode,
        geometry_mode,
        cb,
        input_bytes,
        decode_ms,
        total_start,
    )
    .await
}

/// Run the geometry, rasterize, and encode stages on an already-decoded
/// source. Shared with the session, which decodes once at load time and
/// retries from here.
pub(crate) async fn run_stages(
    source: Arc<SourceImage>,
    mode: ConversionMode,
    geometry_mode: GeometryMode,
    cb: Option<ProgressCallback>,
    input_bytes: u64,
    decode_ms: u64,
    total_start: Instant,
) -> Result<ConversionResult, ConvertError> {
    // ── Step 2: Compute output geometry ──────────────────────────────────
    if let Some(ref cb) = cb {
        cb.on_stage_start(PipelineStage::Geometry);
    }
    let target = compute_output_geometry(source.natural_size(), geometry_mode)
        .map_err(|e| fail(cb.as_ref(), PipelineStage::Geometry, e))?;
    if let Some(ref cb) = cb {
        cb.on_stage_complete(PipelineStage::Geometry, 0);
    }
    debug!(
        "Output geometry: {}x{} (natural {}x{})",
        target.width,
        target.height,
        source.natural_size().width,
        source.natural_size().height
    );

    // ── Step 3: Rasterise ────────────────────────────────────────────────
    let rasterize_start = Instant::now();
    if let Some(ref cb) = cb {
        cb.on_stage_start(PipelineStage::Rasterize);
    }
    let raster_source = Arc::clone(&source);
    let pixels = tokio::task::spawn_blocking(move || rasterize::rasterize(&raster_source, target))
        .await
        .map_err(|e| ConvertError::Internal(format!("Rasterize task panicked: {e}")))?
        .map_err(|e| fail(cb.as_ref(), PipelineStage::Rasterize, e))?;
    let rasterize_ms = rasterize_start.elapsed().as_millis() as u64;
    if let Some(ref cb) = cb {
        cb.on_stage_complete(PipelineStage::Rasterize, rasterize_ms);
    }

    // ── Step 4: Encode ───────────────────────────────────────────────────
    let encode_start = Instant::now();
    if let Some(ref cb) = cb {
        cb.on_stage_start(PipelineStage::Encode);
    }
    let target_format = mode.target_format();
    let bytes = tokio::task::spawn_blocking(move || encode::encode(&pixels, target_format))
        .await
        .map_err(|e| ConvertError::Internal(format!("Encode task panicked: {e}")))?
        .map_err(|e| fail(cb.as_ref(), PipelineStage::Encode, e))?;
    let encode_ms = encode_start.elapsed().as_millis() as u64;
    if let Some(ref cb) = cb {
        cb.on_stage_complete(PipelineStage::Encode, encode_ms);
    }

    let stats = ConversionStats {
        decode_ms,
        rasterize_ms,
        encode_ms,
        total_ms: total_start.elapsed().as_millis() as u64,
        input_bytes,
        output_bytes: bytes.len() as u64,
    };

    info!(
        "{} complete: {}x{}, {} bytes in {}ms",
        mode, target.width, target.height, stats.output_bytes, stats.total_ms
    );

    if let Some(ref cb) = cb {
        cb.on_conversion_complete(target.width, target.height, stats.output_bytes);
    }

    Ok(ConversionResult {
        bytes,
        mime_type: target_format.mime_type(),
        width: target.width,
        height: target.height,
        stats,
    })
}

/// Report a stage failure to the callback and pass the error through.
fn fail(cb: Option<&ProgressCallback>, stage: PipelineStage, e: ConvertError) -> ConvertError {
    if let Some(cb) = cb {
        cb.on_conversion_error(stage, &e.to_string());
    }
    e
}

/// Convert a file and write the result to disk.
///
/// When `output_path` is `None`, the default name
/// `{stem}[_{w}x{h}]{.png|.jpg}` is used next to the input. The write is
/// atomic (temp file + rename) so a crash never leaves a partial output.
pub async fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: Option<&Path>,
    config: &ConversionConfig,
) -> Result<(PathBuf, ConversionStats), ConvertError> {
    let resolved = input::resolve_input(input_path.as_ref(), None)?;
    let mode = resolved.mode;
    let original_name = resolved.file_name();
    let input_dir = resolved.path.parent().map(Path::to_path_buf);

    let result = convert_bytes(resolved.bytes, mode, config).await?;

    let path = match output_path {
        Some(p) => p.to_path_buf(),
        None => {
            let name = output_filename(
                &original_name,
                mode,
                OutputGeometry {
                    width: result.width,
                    height: result.height,
                },
            );
            match input_dir {
                Some(dir) if !dir.as_os_str().is_empty() => dir.join(name),
                _ => PathBuf::from(name),
            }
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConvertError::OutputWriteFailed {
                    path: path.clone(),
                    source: e,
                })?;
        }
    }

    // Atomic write: write to temp, then rename.
    let tmp_path = path.with_extension(match mode.target_format() {
        crate::format::TargetFormat::Png => "png.tmp",
        crate::format::TargetFormat::Jpeg => "jpg.tmp",
    });
    tokio::fs::write(&tmp_path, &result.bytes)
        .await
        .map_err(|e| ConvertError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;
    tokio::fs::rename(&tmp_path, &path)
        .await
        .map_err(|e| ConvertError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    info!("Wrote {}", path.display());
    Ok((path, result.stats))
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionResult, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(input_path, config))
}

/// Report a file's natural dimensions and format without converting it.
pub async fn inspect(input_path: impl AsRef<Path>) -> Result<ImageInfo, ConvertError> {
    let resolved = input::resolve_input(input_path.as_ref(), None)?;
    let format = resolved.mode.source_format();
    let byte_len = resolved.bytes.len() as u64;
    let bytes = resolved.bytes;

    let source = tokio::task::spawn_blocking(move || decode::decode(&bytes, format))
        .await
        .map_err(|e| ConvertError::Internal(format!("Decode task panicked: {e}")))??;

    let natural = source.natural_size();
    Ok(ImageInfo {
        format,
        natural_width: natural.width,
        natural_height: natural.height,
        byte_len,
    })
}

/// A conversion engine exposing one in-flight request slot.
///
/// Conversions share nothing, but the contract is one at a time:
/// [`ConversionEngine::convert`] queues behind the current conversion,
/// [`ConversionEngine::try_convert`] rejects with
/// [`ConvertError::ConversionInFlight`] instead of waiting.
pub struct ConversionEngine {
    slot: Semaphore,
}

impl Default for ConversionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionEngine {
    pub fn new() -> Self {
        Self {
            slot: Semaphore::new(1),
        }
    }

    /// Convert, waiting for the in-flight slot if another conversion holds it.
    pub async fn convert(
        &self,
        bytes: Vec<u8>,
        mode: ConversionMode,
        config: &ConversionConfig,
    ) -> Result<ConversionResult, ConvertError> {
        let _permit = self
            .slot
            .acquire()
            .await
            .map_err(|_| ConvertError::Internal("engine slot closed".to_string()))?;
        convert_bytes(bytes, mode, config).await
    }

    /// Convert only if no other conversion is in flight.
    pub async fn try_convert(
        &self,
        bytes: Vec<u8>,
        mode: ConversionMode,
        config: &ConversionConfig,
    ) -> Result<ConversionResult, ConvertError> {
        let _permit = self
            .slot
            .try_acquire()
            .map_err(|_| ConvertError::ConversionInFlight)?;
        convert_bytes(bytes, mode, config).await
    }
}
