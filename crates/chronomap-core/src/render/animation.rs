use std::time::Duration;

use image::RgbaImage;

use crate::view::{ScreenRect, TerrainRect, ViewportState};

/// Objects with their own motion, drawn over the terrain every frame.
pub trait Animator {
    /// Current bounds of every moving object, in terrain units.
    fn animated_objects(&self) -> Vec<TerrainRect>;

    /// Paint the objects onto the frame. Use `view` to map terrain
    /// coordinates to screen pixels.
    fn draw(&mut self, frame: &mut RgbaImage, view: &ViewportState);
}

/// Tick period for a frequency in Hz, `None` when ticking is disabled.
pub fn tick_interval(frequency: f64) -> Option<Duration> {
    if frequency > 0.0 && frequency.is_finite() {
        // Vanishingly small frequencies overflow a Duration; treat as stopped.
        Duration::try_from_secs_f64(1.0 / frequency).ok()
    } else {
        None
    }
}

/// On-screen damage for each object. Objects entirely off screen are
/// dropped.
pub fn damage_rects(objects: &[TerrainRect], view: &ViewportState) -> Vec<ScreenRect> {
    let (w, h) = view.screen_size();
    let screen = ScreenRect::new(0.0, 0.0, w as f64, h as f64);
    let origin = view.terrain_origin_on_screen();
    let s = view.scale();
    objects
        .iter()
        .map(|o| {
            ScreenRect::new(
                origin.x + o.left / s,
                origin.y + o.top / s,
                o.width() / s,
                o.height() / s,
            )
        })
        .filter(|r| r.intersects(&screen))
        .collect()
}
