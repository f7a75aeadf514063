//! CLI binary for pixelswitch.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pixelswitch::{
    convert_to_file, inspect, ConversionConfig, ConversionMode, ConversionProgressCallback,
    GeometryMode, PipelineStage, ProgressCallback, MAX_SCALE, MIN_SCALE,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar tick per pipeline stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(PipelineStage::ALL.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:24.green/238}] {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, mode: ConversionMode) {
        self.bar.set_message(mode.name().to_string());
    }

    fn on_stage_start(&self, stage: PipelineStage) {
        self.bar.set_message(stage.name().to_string());
    }

    fn on_stage_complete(&self, _stage: PipelineStage, _elapsed_ms: u64) {
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, width: u32, height: u32, output_bytes: u64) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {}  {}",
            green("✔"),
            bold(&format!("{width}x{height}")),
            dim(&format!("{output_bytes} bytes"))
        );
    }

    fn on_conversion_error(&self, stage: PipelineStage, error: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {} failed: {}", red("✗"), stage, red(error));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # SVG to PNG at natural size (target format follows the input extension)
  pixelswitch logo.svg

  # SVG to PNG at 4x scale
  pixelswitch logo.svg --scale 4

  # SVG to PNG, 300 px wide, height follows the aspect ratio
  pixelswitch logo.svg --width 300

  # PNG to JPG, explicit output path
  pixelswitch screenshot.png -o out/screenshot.jpg

  # WebP to PNG
  pixelswitch photo.webp

  # Report natural dimensions without converting
  pixelswitch --inspect-only logo.svg --json

SUPPORTED CONVERSIONS:
  Input          Output  Scaling
  ─────────────  ──────  ───────────────────────────────
  .svg           .png    ✓ (scale 1–64x or width/height)
  .jpg, .jpeg    .png    ✗ (keeps source dimensions)
  .webp          .png    ✗ (keeps source dimensions)
  .png           .jpg    ✗ (keeps source dimensions)

OUTPUT NAMING:
  Default: {stem}.png / {stem}.jpg next to the input. Scaled SVG
  conversions record the chosen size: {stem}_{width}x{height}.png
"#;

/// Convert a single image between formats (SVG/JPG/WebP → PNG, PNG → JPG).
#[derive(Parser, Debug)]
#[command(
    name = "pixelswitch",
    version,
    about = "Convert a single image between formats (SVG/JPG/WebP to PNG, PNG to JPG)",
    long_about = "Convert one image file to its fixed target format. SVG inputs can be \
scaled by a 1-64x factor or given an explicit width/height (the other axis follows the \
natural aspect ratio); raster inputs always keep their source dimensions.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input image file (.svg, .jpg, .jpeg, .png, .webp).
    input: PathBuf,

    /// Write the converted image to this path instead of the default name.
    #[arg(short, long, env = "PIXELSWITCH_OUTPUT")]
    output: Option<PathBuf>,

    /// Scale factor for SVG input (1–64; presets 1,2,4,8,16,32,64).
    #[arg(long, env = "PIXELSWITCH_SCALE", conflicts_with_all = ["width", "height"])]
    scale: Option<f64>,

    /// Output width in pixels for SVG input; height follows the aspect ratio
    /// unless --height is also given.
    #[arg(long, env = "PIXELSWITCH_WIDTH")]
    width: Option<u32>,

    /// Output height in pixels for SVG input; width follows the aspect ratio
    /// unless --width is also given.
    #[arg(long, env = "PIXELSWITCH_HEIGHT")]
    height: Option<u32>,

    /// Print stats (or inspect info) as JSON.
    #[arg(long, env = "PIXELSWITCH_JSON")]
    json: bool,

    /// Print the image's natural dimensions and format, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PIXELSWITCH_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PIXELSWITCH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PIXELSWITCH_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let info = inspect(&cli.input).await.context("Failed to inspect image")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialise info")?
            );
        } else {
            println!("File:        {}", cli.input.display());
            println!("Format:      {}", info.format);
            println!(
                "Dimensions:  {} x {} px",
                info.natural_width, info.natural_height
            );
            println!("Size:        {} bytes", info.byte_len);
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let (path, stats) = convert_to_file(&cli.input, cli.output.as_deref(), &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "output": path,
                "stats": stats,
            }))
            .context("Failed to serialise stats")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {}  {}",
            green("✔"),
            bold(&path.display().to_string()),
            dim(&format!(
                "{}ms (decode {} / rasterize {} / encode {})",
                stats.total_ms, stats.decode_ms, stats.rasterize_ms, stats.encode_ms
            )),
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let geometry = match (cli.scale, cli.width, cli.height) {
        (Some(k), _, _) => {
            if !(MIN_SCALE..=MAX_SCALE).contains(&k) {
                anyhow::bail!("--scale must be between {MIN_SCALE} and {MAX_SCALE}, got {k}");
            }
            GeometryMode::Scale(k)
        }
        (None, Some(w), Some(h)) => GeometryMode::Exact {
            width: w,
            height: h,
        },
        (None, Some(w), None) => GeometryMode::Width(w),
        (None, None, Some(h)) => GeometryMode::Height(h),
        (None, None, None) => GeometryMode::Natural,
    };

    let mut builder = ConversionConfig::builder().geometry(geometry);
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}
