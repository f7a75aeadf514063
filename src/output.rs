//! Conversion results, per-stage statistics, and output naming.

use crate::format::{ConversionMode, SourceFormat};
use crate::geometry::OutputGeometry;
use serde::{Deserialize, Serialize};

/// The encoded output of one successful conversion.
///
/// Created once per conversion and superseded, never mutated, by the next
/// attempt. The byte payload is not serialised with the rest of the struct;
/// `--json` consumers get dimensions, mime type, and stats only.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    /// Encoded image bytes in the target container.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// MIME type of `bytes` (`image/png` or `image/jpeg`).
    pub mime_type: &'static str,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Per-stage timing and size statistics.
    pub stats: ConversionStats,
}

/// Timing and size statistics for one conversion.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Wall-clock milliseconds spent decoding the input.
    pub decode_ms: u64,
    /// Wall-clock milliseconds spent rasterising into the pixel surface.
    pub rasterize_ms: u64,
    /// Wall-clock milliseconds spent encoding the output container.
    pub encode_ms: u64,
    /// Total pipeline wall-clock milliseconds.
    pub total_ms: u64,
    /// Size of the input payload in bytes.
    pub input_bytes: u64,
    /// Size of the encoded output in bytes.
    pub output_bytes: u64,
}

/// Source-image facts reported by [`crate::convert::inspect`] without
/// running a conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Declared (and successfully decoded) source format.
    pub format: SourceFormat,
    /// Intrinsic width in pixels (declared viewport for vector sources).
    pub natural_width: u32,
    /// Intrinsic height in pixels.
    pub natural_height: u32,
    /// Size of the input payload in bytes.
    pub byte_len: u64,
}

/// Default output filename for a conversion.
///
/// `{stem}[_{w}x{h}]{.png|.jpg}` — the dimension suffix is added only for
/// vector-scaled conversions, where the output size is user-chosen and
/// worth recording in the name. Raster conversions keep the source
/// dimensions, so the suffix would be noise.
pub fn output_filename(original_name: &str, mode: ConversionMode, geometry: OutputGeometry) -> String {
    let stem = match original_name.rfind('.') {
        Some(0) | None => original_name,
        Some(idx) => &original_name[..idx],
    };

    let mut name = stem.to_string();
    if mode.source_format().is_vector() {
        name.push_str(&format!("_{}x{}", geometry.width, geometry.height));
    }
    name.push_str(mode.target_format().extension());
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(width: u32, height: u32) -> OutputGeometry {
        OutputGeometry { width, height }
    }

    #[test]
    fn vector_output_name_carries_dimensions() {
        // Scenario A: 100x50 SVG at 4x → _400x200 suffix
        let name = output_filename("logo.svg", ConversionMode::SvgToPng, geom(400, 200));
        assert_eq!(name, "logo_400x200.png");
    }

    #[test]
    fn raster_output_name_has_no_suffix() {
        let name = output_filename("photo.jpeg", ConversionMode::JpgToPng, geom(640, 480));
        assert_eq!(name, "photo.png");
        let name = output_filename("shot.png", ConversionMode::PngToJpg, geom(640, 480));
        assert_eq!(name, "shot.jpg");
        let name = output_filename("pic.webp", ConversionMode::WebpToPng, geom(10, 10));
        assert_eq!(name, "pic.png");
    }

    #[test]
    fn name_without_extension_is_kept_whole() {
        let name = output_filename("archive", ConversionMode::PngToJpg, geom(1, 1));
        assert_eq!(name, "archive.jpg");
    }

    #[test]
    fn dotfile_stem_is_preserved() {
        let name = output_filename(".hidden", ConversionMode::PngToJpg, geom(1, 1));
        assert_eq!(name, ".hidden.jpg");
    }

    #[test]
    fn only_last_extension_is_stripped() {
        let name = output_filename("icon.v2.svg", ConversionMode::SvgToPng, geom(32, 32));
        assert_eq!(name, "icon.v2_32x32.png");
    }

    #[test]
    fn result_json_skips_payload() {
        let result = ConversionResult {
            bytes: vec![1, 2, 3],
            mime_type: "image/png",
            width: 2,
            height: 2,
            stats: ConversionStats::default(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("image/png"));
        assert!(!json.contains("bytes\":[1"));
    }
}
