//! Progress-callback trait for per-stage conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline runs each stage. Callbacks are the least-invasive
//! integration point: the CLI forwards them to an indicatif bar, a GUI shell
//! can forward them to its own progress widget, and the library stays
//! ignorant of either.

use crate::format::ConversionMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The four sequential stages of the conversion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Decode,
    Geometry,
    Rasterize,
    Encode,
}

impl PipelineStage {
    /// All stages, in execution order.
    pub const ALL: [PipelineStage; 4] = [
        PipelineStage::Decode,
        PipelineStage::Geometry,
        PipelineStage::Rasterize,
        PipelineStage::Encode,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Decode => "decode",
            PipelineStage::Geometry => "geometry",
            PipelineStage::Rasterize => "rasterize",
            PipelineStage::Encode => "encode",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Called by the pipeline as a conversion progresses.
///
/// Implementations must be `Send + Sync`; stages run on blocking-pool
/// threads. All methods default to no-ops so callers only override what
/// they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before decoding starts.
    fn on_conversion_start(&self, mode: ConversionMode) {
        let _ = mode;
    }

    /// Called when a pipeline stage begins.
    fn on_stage_start(&self, stage: PipelineStage) {
        let _ = stage;
    }

    /// Called when a pipeline stage finishes successfully.
    fn on_stage_complete(&self, stage: PipelineStage, elapsed_ms: u64) {
        let _ = (stage, elapsed_ms);
    }

    /// Called once when the conversion succeeds.
    fn on_conversion_complete(&self, width: u32, height: u32, output_bytes: u64) {
        let _ = (width, height, output_bytes);
    }

    /// Called once when the conversion fails.
    fn on_conversion_error(&self, stage: PipelineStage, error: &str) {
        let _ = (stage, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in
/// [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_stage_start(&self, _stage: PipelineStage) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_stage_complete(&self, _stage: PipelineStage, _elapsed_ms: u64) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_error(&self, _stage: PipelineStage, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(ConversionMode::SvgToPng);
        cb.on_stage_start(PipelineStage::Decode);
        cb.on_stage_complete(PipelineStage::Decode, 3);
        cb.on_conversion_complete(400, 200, 1024);
        cb.on_conversion_error(PipelineStage::Encode, "boom");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let cb = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
        };
        for stage in PipelineStage::ALL {
            cb.on_stage_start(stage);
            cb.on_stage_complete(stage, 1);
        }
        cb.on_conversion_error(PipelineStage::Decode, "bad bytes");

        assert_eq!(cb.starts.load(Ordering::SeqCst), 4);
        assert_eq!(cb.completes.load(Ordering::SeqCst), 4);
        assert_eq!(cb.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_stage_start(PipelineStage::Rasterize);
    }

    #[test]
    fn stages_are_in_pipeline_order() {
        assert_eq!(PipelineStage::ALL[0], PipelineStage::Decode);
        assert_eq!(PipelineStage::ALL[3], PipelineStage::Encode);
        assert_eq!(PipelineStage::Rasterize.to_string(), "rasterize");
    }
}
