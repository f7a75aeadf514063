//! Image formats and the deterministic conversion-mode table.
//!
//! The target format is never chosen by the user: each supported source
//! format maps to exactly one target (SVG/JPG/WebP → PNG, PNG → JPG).
//! [`ConversionMode`] encodes that table and owns the extension gating for
//! input selection.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Declared format of the input file.
///
/// The pipeline trusts this tag rather than sniffing magic bytes; a
/// mismatched declaration surfaces as a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Svg,
    Jpeg,
    Png,
    Webp,
}

impl SourceFormat {
    /// Short uppercase name used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Svg => "SVG",
            SourceFormat::Jpeg => "JPEG",
            SourceFormat::Png => "PNG",
            SourceFormat::Webp => "WebP",
        }
    }

    /// True for vector formats, which support output scaling.
    pub fn is_vector(&self) -> bool {
        matches!(self, SourceFormat::Svg)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encoded format of the conversion output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetFormat {
    Png,
    Jpeg,
}

impl TargetFormat {
    /// MIME type written into the [`crate::output::ConversionResult`].
    pub fn mime_type(&self) -> &'static str {
        match self {
            TargetFormat::Png => "image/png",
            TargetFormat::Jpeg => "image/jpeg",
        }
    }

    /// File extension (with leading dot) used for output naming.
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Png => ".png",
            TargetFormat::Jpeg => ".jpg",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetFormat::Png => "PNG",
            TargetFormat::Jpeg => "JPG",
        })
    }
}

/// One row of the deterministic conversion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionMode {
    SvgToPng,
    JpgToPng,
    PngToJpg,
    WebpToPng,
}

impl ConversionMode {
    /// Every supported mode, in UI tab order.
    pub const ALL: [ConversionMode; 4] = [
        ConversionMode::SvgToPng,
        ConversionMode::JpgToPng,
        ConversionMode::PngToJpg,
        ConversionMode::WebpToPng,
    ];

    pub fn source_format(&self) -> SourceFormat {
        match self {
            ConversionMode::SvgToPng => SourceFormat::Svg,
            ConversionMode::JpgToPng => SourceFormat::Jpeg,
            ConversionMode::PngToJpg => SourceFormat::Png,
            ConversionMode::WebpToPng => SourceFormat::Webp,
        }
    }

    pub fn target_format(&self) -> TargetFormat {
        match self {
            ConversionMode::PngToJpg => TargetFormat::Jpeg,
            _ => TargetFormat::Png,
        }
    }

    /// Human-readable mode name, e.g. "SVG to PNG".
    pub fn name(&self) -> &'static str {
        match self {
            ConversionMode::SvgToPng => "SVG to PNG",
            ConversionMode::JpgToPng => "JPG to PNG",
            ConversionMode::PngToJpg => "PNG to JPG",
            ConversionMode::WebpToPng => "WebP to PNG",
        }
    }

    /// Comma-separated list of input extensions this mode accepts.
    pub fn accepted_extensions(&self) -> &'static str {
        match self {
            ConversionMode::SvgToPng => ".svg",
            ConversionMode::JpgToPng => ".jpg, .jpeg",
            ConversionMode::PngToJpg => ".png",
            ConversionMode::WebpToPng => ".webp",
        }
    }

    /// True if this mode accepts a file with the given extension
    /// (lowercase, no leading dot).
    pub fn accepts_extension(&self, ext: &str) -> bool {
        match self {
            ConversionMode::SvgToPng => ext == "svg",
            ConversionMode::JpgToPng => ext == "jpg" || ext == "jpeg",
            ConversionMode::PngToJpg => ext == "png",
            ConversionMode::WebpToPng => ext == "webp",
        }
    }

    /// Look up the conversion mode for a file path by its extension.
    ///
    /// The table is unambiguous: each input extension belongs to exactly
    /// one mode.
    pub fn from_path(path: &Path) -> Result<ConversionMode, ConvertError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.accepts_extension(&ext))
            .ok_or(ConvertError::UnknownExtension { extension: ext })
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn target_format_table() {
        assert_eq!(ConversionMode::SvgToPng.target_format(), TargetFormat::Png);
        assert_eq!(ConversionMode::JpgToPng.target_format(), TargetFormat::Png);
        assert_eq!(ConversionMode::WebpToPng.target_format(), TargetFormat::Png);
        assert_eq!(ConversionMode::PngToJpg.target_format(), TargetFormat::Jpeg);
    }

    #[test]
    fn mime_types() {
        assert_eq!(TargetFormat::Png.mime_type(), "image/png");
        assert_eq!(TargetFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(TargetFormat::Jpeg.extension(), ".jpg");
    }

    #[test]
    fn extension_gating() {
        assert!(ConversionMode::JpgToPng.accepts_extension("jpg"));
        assert!(ConversionMode::JpgToPng.accepts_extension("jpeg"));
        assert!(!ConversionMode::JpgToPng.accepts_extension("png"));
        assert!(!ConversionMode::SvgToPng.accepts_extension("svgz"));
    }

    #[test]
    fn mode_from_path() {
        let mode = ConversionMode::from_path(&PathBuf::from("logo.SVG")).unwrap();
        assert_eq!(mode, ConversionMode::SvgToPng);
        let mode = ConversionMode::from_path(&PathBuf::from("photo.jpeg")).unwrap();
        assert_eq!(mode, ConversionMode::JpgToPng);
        let mode = ConversionMode::from_path(&PathBuf::from("shot.png")).unwrap();
        assert_eq!(mode, ConversionMode::PngToJpg);
    }

    #[test]
    fn mode_from_unknown_extension_fails() {
        let err = ConversionMode::from_path(&PathBuf::from("movie.gif")).unwrap_err();
        assert!(matches!(err, ConvertError::UnknownExtension { .. }));
        let err = ConversionMode::from_path(&PathBuf::from("noext")).unwrap_err();
        assert!(matches!(err, ConvertError::UnknownExtension { .. }));
    }

    #[test]
    fn only_svg_is_vector() {
        for mode in ConversionMode::ALL {
            assert_eq!(
                mode.source_format().is_vector(),
                mode == ConversionMode::SvgToPng
            );
        }
    }
}
