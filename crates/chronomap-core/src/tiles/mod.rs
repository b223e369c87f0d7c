pub mod directory;
pub mod epoch;

pub use directory::DirectoryTileProvider;
pub use epoch::{clamp_years_bp, resolve_epoch, years_bp_from_slider};

use std::fmt;

use image::RgbaImage;

use crate::cache::RenderCache;
use crate::consts::TILE_CACHE_MAX_ENTRIES;
use crate::error::Result;

/// Resolution tier of pre-rendered topography, picked from the view scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DetailTier {
    X1,
    X2,
    X4,
    X8,
}

impl DetailTier {
    pub fn for_scale(scale: f64) -> Self {
        if scale <= 1.0 {
            DetailTier::X1
        } else if scale <= 2.0 {
            DetailTier::X2
        } else if scale <= 4.0 {
            DetailTier::X4
        } else {
            DetailTier::X8
        }
    }

    /// Terrain units per tile pixel relative to the finest tier.
    pub fn factor(self) -> u32 {
        match self {
            DetailTier::X1 => 1,
            DetailTier::X2 => 2,
            DetailTier::X4 => 4,
            DetailTier::X8 => 8,
        }
    }
}

/// What a tile provider is asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// Topography tile whose north-west corner is at `(lon, lat)` degrees.
    Topography { lon: i32, lat: i32, tier: DetailTier },
    /// Whole-earth biome raster for one epoch (year, negative = BP).
    Biome { epoch: i32 },
}

impl Region {
    /// Topography region with longitude wrapped into `[-180, 180)` and
    /// latitude into `[-90, 90)`.
    pub fn topography(lon: i32, lat: i32, tier: DetailTier) -> Self {
        Region::Topography {
            lon: wrap(lon, 180),
            lat: wrap(lat, 90),
            tier,
        }
    }
}

fn wrap(value: i32, half: i32) -> i32 {
    if (-half..half).contains(&value) {
        value
    } else {
        (value + half).rem_euclid(2 * half) - half
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Topography { lon, lat, tier } => {
                write!(f, "topography {lon:+}{lat:+} tier {}", tier.factor())
            }
            Region::Biome { epoch } => write!(f, "biome {epoch}"),
        }
    }
}

/// Decoded raster returned by a provider.
#[derive(Clone, Debug)]
pub struct TileImage {
    pub image: RgbaImage,
}

impl TileImage {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Source of pre-rendered map imagery.
///
/// `fetch` must be deterministic for a given region; results are memoized.
pub trait TileProvider {
    fn fetch(&self, region: &Region) -> Result<TileImage>;

    /// Epochs for which a biome raster exists, in any order.
    fn epochs(&self) -> Result<Vec<i32>>;
}

/// Decoded tiles keyed by region.
pub type TileCache = RenderCache<Region, TileImage>;

pub fn new_tile_cache() -> TileCache {
    RenderCache::bounded(TILE_CACHE_MAX_ENTRIES)
}
