pub mod grid;
pub mod viewport;

pub use viewport::ViewportState;

/// A position in screen pixels (origin top-left) or terrain units,
/// depending on context.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in terrain units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TerrainRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl TerrainRect {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Grow by `dx` on the left and right and `dy` on the top and bottom.
    pub fn padded(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left - dx,
            right: self.right + dx,
            top: self.top - dy,
            bottom: self.bottom + dy,
        }
    }
}

/// Rectangle in screen pixels, used for damage regions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Closed-interval overlap test; rectangles that only touch count as intersecting.
    pub fn intersects(&self, other: &ScreenRect) -> bool {
        let overlap_x = self.x <= other.x + other.width && other.x <= self.x + self.width;
        let overlap_y = self.y <= other.y + other.height && other.y <= self.y + self.height;
        overlap_x && overlap_y
    }

    pub fn contains_rect(&self, other: &ScreenRect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}
