//! Input resolution: validate a local file against a conversion mode.
//!
//! The engine trusts the caller's declared mode rather than sniffing magic
//! bytes; gating happens on the file extension, mirroring how the file
//! picker restricts selection per conversion mode. A mismatched extension
//! is caught here with a precise message instead of surfacing later as a
//! confusing decode failure.

use crate::error::ConvertError;
use crate::format::ConversionMode;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A validated input file with its bytes already read.
#[derive(Debug)]
pub struct ResolvedInput {
    /// Original path, kept for output naming and error messages.
    pub path: PathBuf,
    /// Raw file payload.
    pub bytes: Vec<u8>,
    /// The conversion mode this file was accepted for.
    pub mode: ConversionMode,
}

impl ResolvedInput {
    /// File name component of the original path.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }
}

/// Resolve a local file for the given mode, or infer the mode from the
/// extension when none is given.
pub fn resolve_input(
    path: &Path,
    mode: Option<ConversionMode>,
) -> Result<ResolvedInput, ConvertError> {
    let mode = match mode {
        Some(m) => {
            gate_extension(path, m)?;
            m
        }
        None => ConversionMode::from_path(path)?,
    };

    if !path.exists() {
        return Err(ConvertError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ConvertError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ConvertError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    debug!(
        "Resolved input: {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mode
    );

    Ok(ResolvedInput {
        path: path.to_path_buf(),
        bytes,
        mode,
    })
}

/// Reject files whose extension the mode's picker would not offer.
fn gate_extension(path: &Path, mode: ConversionMode) -> Result<(), ConvertError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if mode.accepts_extension(&ext) {
        Ok(())
    } else {
        Err(ConvertError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: ext,
            mode: mode.name(),
            accepted: mode.accepted_extensions(),
        })
    }
}
