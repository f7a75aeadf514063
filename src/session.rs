//! A single-conversion session as an explicit state machine.
//!
//! The UI shell mirrors exactly one session:
//!
//! ```text
//! Empty ──load──▶ FileLoaded ──edit──▶ Configuring ⇄ (more edits)
//!                     │                    │
//!                     └───────convert──────┴──▶ Converting ──▶ Converted
//!                                                                │
//! Empty ◀──────────────── reset (FileLoaded/Configuring/Converted)
//! ```
//!
//! Holding the state in one tagged enum, rather than scattered mutable
//! fields, makes the transition rules checkable: geometry edits are
//! rejected outside `FileLoaded`/`Configuring`, `Converted` offers reset
//! only (converting another image starts from a fresh load), and a failed
//! conversion drops the session back to `Configuring` for a retry.
//!
//! Natural dimensions live immutably inside the decoded source; the
//! mutable requested width/height pair is the single authoritative
//! geometry state. Every control writes into it — the scale slider and
//! quick-pick buttons recompute both axes from the natural size, a width
//! edit derives height from the natural ratio and vice versa — so the last
//! edited control always wins and rounding never compounds.

use crate::convert::run_stages;
use crate::error::ConvertError;
use crate::format::ConversionMode;
use crate::geometry::{
    compute_output_geometry, derive_height, derive_width, GeometryMode, NaturalSize,
    OutputGeometry, MAX_SCALE, MIN_SCALE,
};
use crate::output::ConversionResult;
use crate::pipeline::decode::{decode, SourceImage};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Discriminant-only view of the session state, for display and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    FileLoaded,
    Configuring,
    Converting,
    Converted,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Empty => "Empty",
            SessionState::FileLoaded => "FileLoaded",
            SessionState::Configuring => "Configuring",
            SessionState::Converting => "Converting",
            SessionState::Converted => "Converted",
        }
    }
}

/// Everything known about the loaded file.
struct LoadedFile {
    name: String,
    mode: ConversionMode,
    /// Decoded once at load; shared with the pipeline across retries.
    source: Arc<SourceImage>,
    input_bytes: u64,
    decode_ms: u64,
    /// Requested output dimensions — the authoritative geometry state.
    requested: OutputGeometry,
    /// Last slider position, display-only.
    scale: f64,
}

enum State {
    Empty,
    FileLoaded(Box<LoadedFile>),
    Configuring(Box<LoadedFile>),
    Converting,
    Converted {
        file: Box<LoadedFile>,
        result: ConversionResult,
    },
}

/// One conversion session: a file, its geometry configuration, and at most
/// one result.
pub struct ConversionSession {
    state: State,
}

impl Default for ConversionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionSession {
    pub fn new() -> Self {
        Self {
            state: State::Empty,
        }
    }

    pub fn state(&self) -> SessionState {
        match self.state {
            State::Empty => SessionState::Empty,
            State::FileLoaded(_) => SessionState::FileLoaded,
            State::Configuring(_) => SessionState::Configuring,
            State::Converting => SessionState::Converting,
            State::Converted { .. } => SessionState::Converted,
        }
    }

    fn file(&self) -> Option<&LoadedFile> {
        match &self.state {
            State::FileLoaded(f) | State::Configuring(f) => Some(f),
            State::Converted { file, .. } => Some(file),
            _ => None,
        }
    }

    /// Natural dimensions of the loaded source, if any.
    pub fn natural_size(&self) -> Option<NaturalSize> {
        self.file().map(|f| f.source.natural_size())
    }

    /// Currently requested output dimensions, if a file is loaded.
    pub fn requested_geometry(&self) -> Option<OutputGeometry> {
        self.file().map(|f| f.requested)
    }

    /// Last scale-slider position, if a file is loaded.
    pub fn scale(&self) -> Option<f64> {
        self.file().map(|f| f.scale)
    }

    pub fn mode(&self) -> Option<ConversionMode> {
        self.file().map(|f| f.mode)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file().map(|f| f.name.as_str())
    }

    /// The last conversion's result, available in `Converted`.
    pub fn result(&self) -> Option<&ConversionResult> {
        match &self.state {
            State::Converted { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Load and decode a file, entering `FileLoaded`.
    ///
    /// Requested dimensions initialise to the natural size with scale 1.
    pub fn load(
        &mut self,
        name: impl Into<String>,
        bytes: &[u8],
        mode: ConversionMode,
    ) -> Result<(), ConvertError> {
        if !matches!(self.state, State::Empty) {
            return Err(self.invalid("load"));
        }

        let decode_start = Instant::now();
        let source = decode(bytes, mode.source_format())?;
        let natural = source.natural_size();

        self.state = State::FileLoaded(Box::new(LoadedFile {
            name: name.into(),
            mode,
            source: Arc::new(source),
            input_bytes: bytes.len() as u64,
            decode_ms: decode_start.elapsed().as_millis() as u64,
            requested: OutputGeometry {
                width: natural.width,
                height: natural.height,
            },
            scale: 1.0,
        }));
        debug!("Session loaded file: {}x{} natural", natural.width, natural.height);
        Ok(())
    }

    /// Set the scale multiplier; both requested axes are recomputed from
    /// the natural size. Values outside the slider bounds are clamped.
    pub fn set_scale(&mut self, k: f64) -> Result<(), ConvertError> {
        if !k.is_finite() || k <= 0.0 {
            return Err(ConvertError::InvalidScale { value: k });
        }
        let k = k.clamp(MIN_SCALE, MAX_SCALE);
        self.edit("set_scale", move |file| {
            let natural = file.source.natural_size();
            file.requested = compute_output_geometry(natural, GeometryMode::Scale(k))?;
            file.scale = k;
            Ok(())
        })
    }

    /// Set the requested width; height is derived from the natural ratio.
    pub fn set_width(&mut self, width: u32) -> Result<(), ConvertError> {
        if width == 0 {
            return Err(ConvertError::NonPositiveDimension { axis: "width" });
        }
        self.edit("set_width", move |file| {
            let natural = file.source.natural_size();
            file.requested = OutputGeometry {
                width,
                height: derive_height(natural, width),
            };
            Ok(())
        })
    }

    /// Set the requested height; width is derived from the natural ratio.
    pub fn set_height(&mut self, height: u32) -> Result<(), ConvertError> {
        if height == 0 {
            return Err(ConvertError::NonPositiveDimension { axis: "height" });
        }
        self.edit("set_height", move |file| {
            let natural = file.source.natural_size();
            file.requested = OutputGeometry {
                width: derive_width(natural, height),
                height,
            };
            Ok(())
        })
    }

    /// Apply a geometry edit, entering `Configuring`.
    fn edit(
        &mut self,
        operation: &'static str,
        apply: impl FnOnce(&mut LoadedFile) -> Result<(), ConvertError>,
    ) -> Result<(), ConvertError> {
        let (mut file, was_loaded) = match std::mem::replace(&mut self.state, State::Empty) {
            State::FileLoaded(f) => (f, true),
            State::Configuring(f) => (f, false),
            other => {
                let err = Err(invalid_in(operation, state_name(&other)));
                self.state = other;
                return err;
            }
        };

        if !file.mode.source_format().is_vector() {
            let err = ConvertError::ScalingUnsupported {
                mode: file.mode.name(),
            };
            // A rejected edit leaves the state untouched.
            self.state = if was_loaded {
                State::FileLoaded(file)
            } else {
                State::Configuring(file)
            };
            return Err(err);
        }

        let outcome = apply(&mut file);
        self.state = State::Configuring(file);
        outcome
    }

    /// Run the conversion, entering `Converted` on success.
    ///
    /// Allowed from `FileLoaded` and `Configuring` only; a failure returns
    /// the session to `Configuring` so the user can adjust and retry. If
    /// the returned future is dropped mid-flight the session stays in
    /// `Converting` and must be discarded — there is no built-in cancel.
    pub async fn convert(&mut self) -> Result<&ConversionResult, ConvertError> {
        let file = match std::mem::replace(&mut self.state, State::Converting) {
            State::FileLoaded(f) | State::Configuring(f) => f,
            other => {
                let err = Err(invalid_in("convert", state_name(&other)));
                self.state = other;
                return err;
            }
        };

        // Vector sources honour the requested pair (which may be
        // non-proportional); raster sources always convert at natural size.
        let geometry_mode = if file.mode.source_format().is_vector() {
            GeometryMode::Exact {
                width: file.requested.width,
                height: file.requested.height,
            }
        } else {
            GeometryMode::Natural
        };

        let outcome = run_stages(
            Arc::clone(&file.source),
            file.mode,
            geometry_mode,
            None,
            file.input_bytes,
            file.decode_ms,
            Instant::now(),
        )
        .await;

        match outcome {
            Ok(result) => {
                self.state = State::Converted { file, result };
                match &self.state {
                    State::Converted { result, .. } => Ok(result),
                    _ => unreachable!(),
                }
            }
            Err(e) => {
                self.state = State::Configuring(file);
                Err(e)
            }
        }
    }

    /// Default output filename for the last conversion.
    pub fn output_filename(&self) -> Option<String> {
        match &self.state {
            State::Converted { file, result } => Some(crate::output::output_filename(
                &file.name,
                file.mode,
                OutputGeometry {
                    width: result.width,
                    height: result.height,
                },
            )),
            _ => None,
        }
    }

    /// Discard the file, pending configuration, and any result.
    ///
    /// Allowed from `FileLoaded`, `Configuring`, and `Converted`; rejected
    /// while a conversion is in flight.
    pub fn reset(&mut self) -> Result<(), ConvertError> {
        match self.state {
            State::FileLoaded(_) | State::Configuring(_) | State::Converted { .. } => {
                self.state = State::Empty;
                Ok(())
            }
            _ => Err(self.invalid("reset")),
        }
    }

    fn invalid(&self, operation: &'static str) -> ConvertError {
        invalid_in(operation, self.state().name())
    }
}

fn state_name(state: &State) -> &'static str {
    match state {
        State::Empty => "Empty",
        State::FileLoaded(_) => "FileLoaded",
        State::Configuring(_) => "Configuring",
        State::Converting => "Converting",
        State::Converted { .. } => "Converted",
    }
}

fn invalid_in(operation: &'static str, state: &'static str) -> ConvertError {
    ConvertError::InvalidTransition { operation, state }
}
