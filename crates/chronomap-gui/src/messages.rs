use std::path::PathBuf;

use chronomap_core::config::CanvasConfig;
use chronomap_core::view::Point;

/// Results of file dialogs, which run off the UI thread.
pub enum AppMessage {
    TileFolderPicked { path: PathBuf },
    ConfigImported { path: PathBuf, config: CanvasConfig },
    ConfigExported { path: PathBuf },
    Error { message: String },
}

/// Gesture results reported by the canvas callbacks, drained once per frame.
#[derive(Clone, Debug)]
pub enum CanvasEvent {
    MenuAction { index: usize },
    PathComplete { points: Vec<Point> },
}
