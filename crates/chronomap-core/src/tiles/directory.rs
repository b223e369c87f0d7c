use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ChronoError, Result};

use super::{Region, TileImage, TileProvider};

const TOPO_DIR: &str = "topo";
const BIOME_DIR: &str = "biome";
const TILE_EXT: &str = "png";

/// Tiles stored as PNG files under one root:
///
/// - `topo/<lon><lat>s<tier>.png`, signed degrees, e.g. `topo/-15+45s2.png`
/// - `biome/<epoch>.png`, e.g. `biome/-12000.png`
pub struct DirectoryTileProvider {
    root: PathBuf,
}

impl DirectoryTileProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, region: &Region) -> PathBuf {
        match region {
            Region::Topography { lon, lat, tier } => self.root.join(TOPO_DIR).join(format!(
                "{lon:+}{lat:+}s{}.{TILE_EXT}",
                tier.factor()
            )),
            Region::Biome { epoch } => self
                .root
                .join(BIOME_DIR)
                .join(format!("{epoch}.{TILE_EXT}")),
        }
    }
}

impl TileProvider for DirectoryTileProvider {
    fn fetch(&self, region: &Region) -> Result<TileImage> {
        let path = self.path_for(region);
        if !path.is_file() {
            return Err(ChronoError::MissingTile { path });
        }
        debug!(path = %path.display(), "loading tile");
        let image = image::open(&path)?.to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(ChronoError::EmptyTile {
                region: region.to_string(),
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(TileImage::new(image))
    }

    fn epochs(&self) -> Result<Vec<i32>> {
        let dir = self.root.join(BIOME_DIR);
        let mut epochs = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TILE_EXT) {
                continue;
            }
            if let Some(epoch) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<i32>().ok())
            {
                epochs.push(epoch);
            }
        }
        if epochs.is_empty() {
            return Err(ChronoError::NoEpochs { dir });
        }
        epochs.sort_unstable();
        Ok(epochs)
    }
}
