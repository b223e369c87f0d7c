use crate::consts::ZOOM_DIVISOR;

use super::{Point, TerrainRect};

/// Pan/zoom state of the canvas.
///
/// `pan` is the screen-pixel offset of the terrain origin from the screen
/// center and `scale` is terrain units per screen pixel, so
/// `terrain = (screen - center - pan) * scale`.
///
/// The visible terrain rectangle is derived state; every mutator refreshes
/// it before returning, so reads never observe a stale rectangle.
#[derive(Clone, Debug)]
pub struct ViewportState {
    pan_x: f64,
    pan_y: f64,
    scale: f64,
    scale_min: f64,
    scale_max: f64,
    screen_w: u32,
    screen_h: u32,
    visible: TerrainRect,
}

impl ViewportState {
    /// `scale` is clamped into `[scale_min, scale_max]`.
    pub fn new(scale: f64, scale_min: f64, scale_max: f64) -> Self {
        let mut view = Self {
            pan_x: 0.0,
            pan_y: 0.0,
            scale: scale.clamp(scale_min, scale_max),
            scale_min,
            scale_max,
            screen_w: 1,
            screen_h: 1,
            visible: TerrainRect::default(),
        };
        view.recalculate();
        view
    }

    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn scale_limits(&self) -> (f64, f64) {
        (self.scale_min, self.scale_max)
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_w, self.screen_h)
    }

    pub fn screen_center(&self) -> Point {
        Point::new(self.screen_w as f64 / 2.0, self.screen_h as f64 / 2.0)
    }

    /// Screen position of the terrain origin; cached terrain layers are
    /// painted relative to it.
    pub fn terrain_origin_on_screen(&self) -> Point {
        let c = self.screen_center();
        Point::new(c.x + self.pan_x, c.y + self.pan_y)
    }

    /// Terrain rectangle currently on screen.
    pub fn visible(&self) -> TerrainRect {
        self.visible
    }

    /// Visible rectangle padded by a margin given in screen pixels, so the
    /// padding stays the same on screen at any zoom.
    pub fn extended(&self, margin_x: f64, margin_y: f64) -> TerrainRect {
        self.visible
            .padded(margin_x * self.scale, margin_y * self.scale)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.screen_w = width.max(1);
        self.screen_h = height.max(1);
        self.recalculate();
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
        self.recalculate();
    }

    /// Set the scale directly, clamped to the configured limits.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(self.scale_min, self.scale_max);
        self.recalculate();
    }

    pub fn screen_to_terrain(&self, sx: f64, sy: f64) -> Point {
        let c = self.screen_center();
        Point::new(
            (sx - c.x - self.pan_x) * self.scale,
            (sy - c.y - self.pan_y) * self.scale,
        )
    }

    pub fn terrain_to_screen(&self, tx: f64, ty: f64) -> Point {
        let c = self.screen_center();
        Point::new(
            tx / self.scale + c.x + self.pan_x,
            ty / self.scale + c.y + self.pan_y,
        )
    }

    /// Apply one wheel step of `dy` at screen position `(x, y)`.
    ///
    /// The terrain point under the pointer stays under the pointer. Returns
    /// the factor actually applied after clamping.
    pub fn zoom_at(&mut self, dy: f64, x: f64, y: f64) -> f64 {
        let mut factor = 1.0 + dy / ZOOM_DIVISOR;
        let mut scale = self.scale * factor;
        if !(scale >= self.scale_min) {
            scale = self.scale_min;
            factor = scale / self.scale;
        }
        if scale > self.scale_max {
            scale = self.scale_max;
            factor = scale / self.scale;
        }

        let c = self.screen_center();
        self.pan_x = -(x - self.pan_x - c.x) / factor - c.x + x;
        self.pan_y = -(y - self.pan_y - c.y) / factor - c.y + y;
        self.scale = scale;
        self.recalculate();
        factor
    }

    fn recalculate(&mut self) {
        let half_w = self.screen_w as f64 / 2.0;
        let half_h = self.screen_h as f64 / 2.0;
        self.visible = TerrainRect {
            left: (-half_w - self.pan_x) * self.scale,
            right: (half_w - self.pan_x) * self.scale,
            top: (-half_h - self.pan_y) * self.scale,
            bottom: (half_h - self.pan_y) * self.scale,
        };
    }
}
