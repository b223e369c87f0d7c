use crate::consts::{
    MENU_ICON_RATIO, MENU_ICON_RING_RATIO, MENU_INNER_RATIO, MENU_MAX_RADIUS, MENU_SNAP_TOLERANCE,
};
use crate::view::Point;

/// Sector icon colors, cycled when there are more sectors than entries.
pub const SECTOR_PALETTE: [[u8; 3]; 12] = [
    [255, 0, 0],
    [255, 128, 0],
    [255, 255, 0],
    [0, 255, 0],
    [0, 255, 255],
    [0, 0, 255],
    [255, 0, 255],
    [153, 128, 179],
    [153, 179, 204],
    [153, 204, 153],
    [179, 153, 0],
    [128, 51, 51],
];

/// Geometry of the radial action menu.
///
/// Sector `n` is centered `start_angle + n * 360 / sectors` degrees
/// clockwise from straight up. Only the ring between `0.6 R` and `R` is
/// selectable, and only within a quarter sector of a sector center.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialMenu {
    sectors: usize,
    start_angle: f64,
    radius: f64,
}

impl RadialMenu {
    pub fn new(sectors: usize, start_angle: f64, radius: f64) -> Self {
        assert!(sectors > 0, "radial menu needs at least one sector");
        Self {
            sectors,
            start_angle,
            radius,
        }
    }

    /// Radius that fits a `width x height` canvas.
    pub fn radius_for_screen(width: u32, height: u32) -> f64 {
        (width as f64 / 4.0)
            .min(height as f64 / 4.0)
            .min(MENU_MAX_RADIUS)
    }

    pub fn sectors(&self) -> usize {
        self.sectors
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    pub fn inner_radius(&self) -> f64 {
        self.radius * MENU_INNER_RATIO
    }

    pub fn icon_radius(&self) -> f64 {
        self.radius * MENU_ICON_RATIO
    }

    /// Sector selected by a pointer at offset `(dx, dy)` from the anchor,
    /// screen axes (y down).
    pub fn hit_test(&self, dx: f64, dy: f64) -> Option<usize> {
        if !(self.radius > 0.0) {
            return None;
        }
        let r = dx.hypot(-dy);
        if r < self.inner_radius() || r > self.radius {
            return None;
        }

        let n = self.sectors as f64;
        let exact = (dx.atan2(-dy).to_degrees() - self.start_angle).rem_euclid(360.0) * n / 360.0;
        let nearest = exact.round();
        if (nearest - exact).abs() <= MENU_SNAP_TOLERANCE {
            Some(nearest as usize % self.sectors)
        } else {
            None
        }
    }

    /// Center of sector `index`'s icon relative to the anchor.
    pub fn sector_center(&self, index: usize) -> Point {
        let step = 360.0 / self.sectors as f64;
        let a = (self.start_angle + index as f64 * step)
            .rem_euclid(360.0)
            .to_radians();
        let ring = MENU_ICON_RING_RATIO * self.radius;
        Point::new(ring * a.sin(), -ring * a.cos())
    }

    pub fn sector_color(index: usize) -> [u8; 3] {
        SECTOR_PALETTE[index % SECTOR_PALETTE.len()]
    }
}
