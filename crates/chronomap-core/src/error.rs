use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChronoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialization failed: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Missing tile: {}", path.display())]
    MissingTile { path: PathBuf },

    #[error("Empty tile for {region}: {width}x{height}")]
    EmptyTile {
        region: String,
        width: u32,
        height: u32,
    },

    #[error("No epoch available for {years_bp} years before present")]
    NoEpoch { years_bp: u32 },

    #[error("No epochs found in {}", dir.display())]
    NoEpochs { dir: PathBuf },

    #[error("Tile provider error: {0}")]
    Provider(String),
}

pub type Result<T> = std::result::Result<T, ChronoError>;
