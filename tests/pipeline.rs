//! Integration tests for the pixelswitch conversion pipeline.
//!
//! Every input is generated in memory (SVG markup, or raster fixtures
//! encoded through the `image` crate), so the suite needs no fixture files
//! and no network.

use pixelswitch::{
    convert_bytes, convert_to_file, ConversionConfig, ConversionEngine, ConversionMode,
    ConvertError, GeometryMode,
};
use std::io::Cursor;

// ── Test fixtures ────────────────────────────────────────────────────────────

fn svg_fixture(width: u32, height: u32) -> Vec<u8> {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><rect width="{width}" height="{height}" fill="#3366cc"/></svg>"##
    )
    .into_bytes()
}

fn raster_fixture(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));
    let mut buf = Vec::new();
    let dynamic = image::DynamicImage::ImageRgba8(img);
    // JPEG rejects RGBA input.
    let dynamic = if format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(dynamic.to_rgb8())
    } else {
        dynamic
    };
    dynamic.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

fn decoded_dimensions(bytes: &[u8], format: image::ImageFormat) -> (u32, u32) {
    let img = image::load_from_memory_with_format(bytes, format).unwrap();
    (img.width(), img.height())
}

fn natural_config() -> ConversionConfig {
    ConversionConfig::default()
}

// ── Scenario tests (spec walkthroughs) ───────────────────────────────────────

#[tokio::test]
async fn svg_scale_4_yields_400x200() {
    // Scenario A: natural 100x50, scale 4 → 400x200.
    let config = ConversionConfig::builder().scale(4.0).build().unwrap();
    let result = convert_bytes(svg_fixture(100, 50), ConversionMode::SvgToPng, &config)
        .await
        .unwrap();

    assert_eq!((result.width, result.height), (400, 200));
    assert_eq!(result.mime_type, "image/png");
    assert_eq!(
        decoded_dimensions(&result.bytes, image::ImageFormat::Png),
        (400, 200)
    );
}

#[tokio::test]
async fn svg_width_300_derives_height_150() {
    // Scenario B: natural 100x50, width 300 → height 150 (2:1 preserved).
    let config = ConversionConfig::builder().width(300).build().unwrap();
    let result = convert_bytes(svg_fixture(100, 50), ConversionMode::SvgToPng, &config)
        .await
        .unwrap();

    assert_eq!((result.width, result.height), (300, 150));
}

#[tokio::test]
async fn png_to_jpg_keeps_dimensions_and_switches_mime() {
    // Scenario C: PNG 640x480 → JPG 640x480, image/jpeg.
    let bytes = raster_fixture(640, 480, image::ImageFormat::Png);
    let result = convert_bytes(bytes, ConversionMode::PngToJpg, &natural_config())
        .await
        .unwrap();

    assert_eq!((result.width, result.height), (640, 480));
    assert_eq!(result.mime_type, "image/jpeg");
    assert_eq!(
        decoded_dimensions(&result.bytes, image::ImageFormat::Jpeg),
        (640, 480)
    );
}

#[tokio::test]
async fn second_try_convert_is_rejected_while_first_is_in_flight() {
    // Scenario D: the engine has one in-flight slot. Under the
    // current-thread test runtime the first future takes the slot before
    // its first await, so the second fail-fast call must be rejected.
    let engine = ConversionEngine::new();
    let config = natural_config();

    let first = engine.try_convert(svg_fixture(64, 64), ConversionMode::SvgToPng, &config);
    let second = engine.try_convert(svg_fixture(64, 64), ConversionMode::SvgToPng, &config);
    let (a, b) = tokio::join!(first, second);

    assert!(a.is_ok(), "first conversion should hold the slot: {a:?}");
    assert!(
        matches!(b, Err(ConvertError::ConversionInFlight)),
        "second conversion should be rejected: {b:?}"
    );
}

#[tokio::test]
async fn queued_converts_run_one_after_the_other() {
    let engine = ConversionEngine::new();
    let config = natural_config();

    let first = engine.convert(svg_fixture(32, 32), ConversionMode::SvgToPng, &config);
    let second = engine.convert(svg_fixture(16, 16), ConversionMode::SvgToPng, &config);
    let (a, b) = tokio::join!(first, second);

    assert_eq!(a.unwrap().width, 32);
    assert_eq!(b.unwrap().width, 16);
}

// ── Raster round trips ───────────────────────────────────────────────────────

#[tokio::test]
async fn jpg_to_png_preserves_dimensions() {
    let bytes = raster_fixture(123, 77, image::ImageFormat::Jpeg);
    let result = convert_bytes(bytes, ConversionMode::JpgToPng, &natural_config())
        .await
        .unwrap();

    assert_eq!((result.width, result.height), (123, 77));
    assert_eq!(result.mime_type, "image/png");
}

#[tokio::test]
async fn webp_to_png_preserves_dimensions() {
    let bytes = raster_fixture(90, 45, image::ImageFormat::WebP);
    let result = convert_bytes(bytes, ConversionMode::WebpToPng, &natural_config())
        .await
        .unwrap();

    assert_eq!((result.width, result.height), (90, 45));
    assert_eq!(result.mime_type, "image/png");
}

#[tokio::test]
async fn geometry_request_is_ignored_for_raster_sources() {
    // Raster conversions always use natural dimensions, even when the
    // config asks for scaling.
    let config = ConversionConfig::builder().scale(4.0).build().unwrap();
    let bytes = raster_fixture(50, 40, image::ImageFormat::Png);
    let result = convert_bytes(bytes, ConversionMode::PngToJpg, &config)
        .await
        .unwrap();

    assert_eq!((result.width, result.height), (50, 40));
}

#[tokio::test]
async fn png_lossless_round_trip_preserves_pixels() {
    let bytes = raster_fixture(10, 10, image::ImageFormat::Png);
    let result = convert_bytes(bytes, ConversionMode::PngToJpg, &natural_config())
        .await
        .unwrap();
    // JPG is lossy, so only dimensions are exact; convert it back to check
    // the container decodes cleanly.
    let back = image::load_from_memory_with_format(&result.bytes, image::ImageFormat::Jpeg).unwrap();
    assert_eq!((back.width(), back.height()), (10, 10));
}

// ── Decode failures ──────────────────────────────────────────────────────────

#[tokio::test]
async fn zero_byte_input_fails_for_every_mode() {
    for mode in ConversionMode::ALL {
        let err = convert_bytes(Vec::new(), mode, &natural_config())
            .await
            .unwrap_err();
        assert!(err.is_decode(), "{mode}: {err}");
    }
}

#[tokio::test]
async fn truncated_input_fails_with_decode_error() {
    let mut bytes = raster_fixture(64, 64, image::ImageFormat::Png);
    bytes.truncate(16);
    let err = convert_bytes(bytes, ConversionMode::PngToJpg, &natural_config())
        .await
        .unwrap_err();
    assert!(err.is_decode());

    let err = convert_bytes(b"<svg".to_vec(), ConversionMode::SvgToPng, &natural_config())
        .await
        .unwrap_err();
    assert!(err.is_decode());
}

#[tokio::test]
async fn wrong_container_for_declared_format_fails() {
    // WebP bytes declared as PNG: the declared format is trusted, so the
    // PNG decoder must reject them.
    let bytes = raster_fixture(8, 8, image::ImageFormat::WebP);
    let err = convert_bytes(bytes, ConversionMode::PngToJpg, &natural_config())
        .await
        .unwrap_err();
    assert!(err.is_decode());
}

// ── Non-proportional stretch ─────────────────────────────────────────────────

#[tokio::test]
async fn exact_non_proportional_pair_stretches() {
    let config = ConversionConfig::builder()
        .geometry(GeometryMode::Exact {
            width: 200,
            height: 200,
        })
        .build()
        .unwrap();
    let result = convert_bytes(svg_fixture(100, 50), ConversionMode::SvgToPng, &config)
        .await
        .unwrap();

    assert_eq!((result.width, result.height), (200, 200));
    // The fixture rect fills the whole viewport; after a stretch it still
    // reaches the bottom-right corner (a crop would not).
    let img = image::load_from_memory_with_format(&result.bytes, image::ImageFormat::Png)
        .unwrap()
        .to_rgba8();
    assert_eq!(img.get_pixel(199, 199).0[3], 255);
}

// ── File I/O entry points ────────────────────────────────────────────────────

#[tokio::test]
async fn convert_to_file_uses_default_scaled_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("logo.svg");
    std::fs::write(&input, svg_fixture(100, 50)).unwrap();

    let config = ConversionConfig::builder().scale(4.0).build().unwrap();
    let (path, stats) = convert_to_file(&input, None, &config).await.unwrap();

    assert_eq!(path, dir.path().join("logo_400x200.png"));
    assert!(path.exists());
    assert!(stats.output_bytes > 0);
    assert_eq!(
        decoded_dimensions(&std::fs::read(&path).unwrap(), image::ImageFormat::Png),
        (400, 200)
    );
}

#[tokio::test]
async fn convert_to_file_raster_default_name_has_no_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("shot.png");
    std::fs::write(&input, raster_fixture(20, 30, image::ImageFormat::Png)).unwrap();

    let (path, _stats) = convert_to_file(&input, None, &natural_config())
        .await
        .unwrap();
    assert_eq!(path, dir.path().join("shot.jpg"));
}

#[tokio::test]
async fn convert_to_file_honours_explicit_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.webp");
    std::fs::write(&input, raster_fixture(12, 12, image::ImageFormat::WebP)).unwrap();
    let out = dir.path().join("nested/out.png");

    let (path, _stats) = convert_to_file(&input, Some(out.as_path()), &natural_config())
        .await
        .unwrap();
    assert_eq!(path, out);
    assert!(out.exists());
}

#[tokio::test]
async fn failed_conversion_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.png");
    std::fs::write(&input, b"not a png").unwrap();

    let err = convert_to_file(&input, None, &natural_config())
        .await
        .unwrap_err();
    assert!(err.is_decode());
    assert!(!dir.path().join("broken.jpg").exists());
}

#[tokio::test]
async fn inspect_reports_natural_dimensions_without_converting() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("logo.svg");
    std::fs::write(&input, svg_fixture(100, 50)).unwrap();

    let info = pixelswitch::inspect(&input).await.unwrap();
    assert_eq!((info.natural_width, info.natural_height), (100, 50));
    assert_eq!(info.format, pixelswitch::SourceFormat::Svg);
}

#[test]
fn convert_sync_wrapper_works() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("logo.svg");
    std::fs::write(&input, svg_fixture(40, 40)).unwrap();

    let config = ConversionConfig::builder().scale(2.0).build().unwrap();
    let result = pixelswitch::convert_sync(&input, &config).unwrap();
    assert_eq!((result.width, result.height), (80, 80));
}
