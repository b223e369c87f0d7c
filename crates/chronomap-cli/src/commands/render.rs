use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chronomap_core::canvas::MapCanvas;
use chronomap_core::clock::MonotonicClock;
use chronomap_core::config::CanvasConfig;
use chronomap_core::render::DrawRequest;
use chronomap_core::tiles::{clamp_years_bp, DirectoryTileProvider};
use clap::Args;
use image::RgbaImage;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

#[derive(Args)]
pub struct RenderArgs {
    /// Tile folder (containing `topo/` and `biome/`)
    pub dir: PathBuf,

    /// Canvas config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Frame width in pixels
    #[arg(long, default_value = "800")]
    pub width: u32,

    /// Frame height in pixels
    #[arg(long, default_value = "600")]
    pub height: u32,

    /// Horizontal offset of the terrain origin from the frame center, in pixels
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub pan_x: f64,

    /// Vertical offset of the terrain origin from the frame center, in pixels
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub pan_y: f64,

    /// Terrain units per pixel (clamped to the config's scale range)
    #[arg(long, default_value = "1.0")]
    pub scale: f64,

    /// Years before present to show biomes for
    #[arg(long, default_value = "0")]
    pub years: i64,

    /// Save the frame even if some layers could not be drawn
    #[arg(long)]
    pub allow_missing: bool,

    /// Output file path
    #[arg(short, long, default_value = "map.png")]
    pub output: PathBuf,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => CanvasConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => CanvasConfig::default(),
    };

    let provider = DirectoryTileProvider::new(&args.dir);
    let mut canvas = MapCanvas::new(config, Box::new(provider), Box::new(MonotonicClock::new()));
    canvas.resize(args.width, args.height);
    canvas.look_at(args.pan_x, args.pan_y, args.scale);
    let years_bp = clamp_years_bp(args.years);
    debug!(epochs = ?canvas.epochs(), years_bp, "tile folder scanned");
    canvas
        .set_time_parameter(years_bp)
        .with_context(|| format!("No biome epoch for {years_bp} years BP"))?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message("Composing frame");
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut frame = RgbaImage::new(args.width.max(1), args.height.max(1));
    let report = canvas.compose(&mut frame, &DrawRequest::Full);
    pb.finish_and_clear();

    crate::summary::print_render_summary(&canvas, &report, &args.output);

    if !report.is_ok() && !args.allow_missing {
        bail!(
            "{} layer(s) could not be drawn; pass --allow-missing to save anyway",
            report.errors.len()
        );
    }

    frame
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!("Saved {}", args.output.display());
    Ok(())
}
