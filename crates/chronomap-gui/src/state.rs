use std::path::PathBuf;
use std::time::Instant;

use chronomap_core::render::MapItem;
use image::RgbaImage;

use crate::input::ClickTracker;

/// Overall UI state.
pub struct UIState {
    pub tile_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,

    /// Position of the years slider, `0..=100` on an exponential scale.
    pub years_exponent: f64,
    /// Years before present currently requested from the canvas.
    pub years_bp: u32,

    /// Markers dropped through the radial menu.
    pub markers: Vec<MapItem>,

    /// Log messages.
    pub log_messages: Vec<String>,
    /// Last layer failure logged, so a persisting failure is logged once.
    pub last_frame_error: Option<String>,

    pub show_about: bool,
}

impl Default for UIState {
    fn default() -> Self {
        Self {
            tile_dir: None,
            config_path: None,
            years_exponent: 0.0,
            years_bp: 0,
            markers: Vec::new(),
            log_messages: Vec::new(),
            last_frame_error: None,
            show_about: false,
        }
    }
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }
}

/// Map view display state.
pub struct MapViewState {
    pub texture: Option<egui::TextureHandle>,
    /// Last composed frame, reused between repaints.
    pub frame: RgbaImage,
    pub clicks: ClickTracker,
    pub last_tick: Instant,
}

impl Default for MapViewState {
    fn default() -> Self {
        Self {
            texture: None,
            frame: RgbaImage::new(1, 1),
            clicks: ClickTracker::default(),
            last_tick: Instant::now(),
        }
    }
}
