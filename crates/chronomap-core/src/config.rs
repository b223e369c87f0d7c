use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{
    DEFAULT_DEGREE_SIZE, DEFAULT_DOUBLE_TAP_INTERVAL, DEFAULT_MENU_SECTORS,
    DEFAULT_REDRAW_MARGIN, DEFAULT_SCALE_MAX, DEFAULT_SCALE_MIN, DEFAULT_TILE_DEGREES,
    MAX_DOUBLE_TAP_INTERVAL, MAX_REDRAW_MARGIN,
};
use crate::error::Result;

/// Everything the canvas core can be tuned with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Smallest terrain-units-per-pixel (most zoomed in).
    pub scale_min: f64,
    /// Largest terrain-units-per-pixel (most zoomed out).
    pub scale_max: f64,
    pub initial_scale: f64,
    /// Screen pixels of pre-rendered terrain kept beyond each horizontal edge.
    pub redraw_margin_x: f64,
    /// Screen pixels of pre-rendered terrain kept beyond each vertical edge.
    pub redraw_margin_y: f64,
    /// Seconds between two touch-begins that still count as a double tap.
    pub double_tap_interval: f64,
    pub menu_sector_count: usize,
    /// Clockwise offset of sector 0 from straight up, in degrees.
    pub menu_start_angle: f64,
    /// Animation ticks per second; 0 disables the timer.
    pub animation_frequency: f64,
    /// Paint the background from a cached opaque surface instead of a flat fill.
    pub background_workaround_enabled: bool,
    pub background_color: [u8; 3],
    pub menu_ring_color: [u8; 4],
    pub path_width: f64,
    pub path_color: [u8; 4],
    pub terrain: TerrainConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            scale_min: DEFAULT_SCALE_MIN,
            scale_max: DEFAULT_SCALE_MAX,
            initial_scale: 1.0,
            redraw_margin_x: DEFAULT_REDRAW_MARGIN,
            redraw_margin_y: DEFAULT_REDRAW_MARGIN,
            double_tap_interval: DEFAULT_DOUBLE_TAP_INTERVAL,
            menu_sector_count: DEFAULT_MENU_SECTORS,
            menu_start_angle: 0.0,
            animation_frequency: 0.0,
            background_workaround_enabled: true,
            background_color: [255, 255, 255],
            menu_ring_color: [255, 255, 255, 38],
            path_width: 3.0,
            path_color: [0, 255, 0, 255],
            terrain: TerrainConfig::default(),
        }
    }
}

/// Geometry of the terrain grid the tiles are laid on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Terrain units per degree of longitude/latitude.
    pub degree_size: f64,
    /// Degrees covered by one topography tile.
    pub tile_degrees: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            degree_size: DEFAULT_DEGREE_SIZE,
            tile_degrees: DEFAULT_TILE_DEGREES,
        }
    }
}

impl TerrainConfig {
    /// Edge length of one topography tile in terrain units.
    pub fn tile_span(&self) -> f64 {
        self.degree_size * self.tile_degrees
    }

    pub fn earth_width(&self) -> f64 {
        self.degree_size * 360.0
    }

    pub fn earth_height(&self) -> f64 {
        self.degree_size * 180.0
    }
}

impl CanvasConfig {
    /// Read a TOML config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: CanvasConfig = toml::from_str(text)?;
        Ok(config.validated())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn double_tap_window(&self) -> Duration {
        Duration::try_from_secs_f64(self.double_tap_interval.clamp(0.0, MAX_DOUBLE_TAP_INTERVAL))
            .unwrap_or_default()
    }

    /// Clamp out-of-range values instead of rejecting them.
    pub fn validated(mut self) -> Self {
        if !(self.scale_min > 0.0) {
            warn!(scale_min = self.scale_min, "scale_min must be positive, using default");
            self.scale_min = DEFAULT_SCALE_MIN;
        }
        if !(self.scale_max >= self.scale_min) {
            warn!(
                scale_max = self.scale_max,
                scale_min = self.scale_min,
                "scale_max below scale_min, raising it"
            );
            self.scale_max = self.scale_min;
        }
        let requested = if self.initial_scale.is_finite() {
            self.initial_scale
        } else {
            1.0
        };
        let initial = requested.clamp(self.scale_min, self.scale_max);
        if initial != self.initial_scale {
            warn!(initial_scale = self.initial_scale, clamped = initial, "initial_scale out of range");
            self.initial_scale = initial;
        }
        if !(self.redraw_margin_x >= 0.0) {
            warn!(redraw_margin_x = self.redraw_margin_x, "negative redraw margin, using 0");
            self.redraw_margin_x = 0.0;
        }
        if self.redraw_margin_x > MAX_REDRAW_MARGIN {
            warn!(redraw_margin_x = self.redraw_margin_x, "redraw margin too large, clamping");
            self.redraw_margin_x = MAX_REDRAW_MARGIN;
        }
        if !(self.redraw_margin_y >= 0.0) {
            warn!(redraw_margin_y = self.redraw_margin_y, "negative redraw margin, using 0");
            self.redraw_margin_y = 0.0;
        }
        if self.redraw_margin_y > MAX_REDRAW_MARGIN {
            warn!(redraw_margin_y = self.redraw_margin_y, "redraw margin too large, clamping");
            self.redraw_margin_y = MAX_REDRAW_MARGIN;
        }
        if !(self.double_tap_interval >= 0.0) || !self.double_tap_interval.is_finite() {
            warn!(double_tap_interval = self.double_tap_interval, "invalid double-tap interval, using 0");
            self.double_tap_interval = 0.0;
        }
        if self.double_tap_interval > MAX_DOUBLE_TAP_INTERVAL {
            warn!(double_tap_interval = self.double_tap_interval, "double-tap interval too long, clamping");
            self.double_tap_interval = MAX_DOUBLE_TAP_INTERVAL;
        }
        if self.menu_sector_count == 0 {
            warn!("menu_sector_count must be at least 1");
            self.menu_sector_count = 1;
        }
        if !(self.animation_frequency >= 0.0) || !self.animation_frequency.is_finite() {
            warn!(animation_frequency = self.animation_frequency, "invalid animation frequency, disabling");
            self.animation_frequency = 0.0;
        }
        if !(self.path_width > 0.0) {
            self.path_width = 1.0;
        }
        if !(self.terrain.degree_size > 0.0) {
            warn!(degree_size = self.terrain.degree_size, "degree_size must be positive, using default");
            self.terrain.degree_size = DEFAULT_DEGREE_SIZE;
        }
        if !(self.terrain.tile_degrees > 0.0) {
            warn!(tile_degrees = self.terrain.tile_degrees, "tile_degrees must be positive, using default");
            self.terrain.tile_degrees = DEFAULT_TILE_DEGREES;
        }
        self
    }
}
