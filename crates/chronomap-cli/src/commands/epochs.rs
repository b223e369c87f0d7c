use std::path::PathBuf;

use anyhow::{Context, Result};
use chronomap_core::tiles::{clamp_years_bp, resolve_epoch, DirectoryTileProvider, TileProvider};
use clap::Args;

#[derive(Args)]
pub struct EpochsArgs {
    /// Tile folder (containing `topo/` and `biome/`)
    pub dir: PathBuf,

    /// Also show which epoch this many years before present maps to
    #[arg(long)]
    pub years: Option<i64>,
}

pub fn run(args: &EpochsArgs) -> Result<()> {
    let provider = DirectoryTileProvider::new(&args.dir);
    let epochs = provider
        .epochs()
        .with_context(|| format!("Failed to list epochs in {}", args.dir.display()))?;

    let resolved = match args.years {
        Some(years) => {
            let years_bp = clamp_years_bp(years);
            let epoch = resolve_epoch(&epochs, years_bp)?;
            Some((years_bp, epoch))
        }
        None => None,
    };

    crate::summary::print_epochs(&args.dir, &epochs, resolved);
    Ok(())
}
