use std::cell::Cell;
use std::rc::Rc;

use chronomap_core::render::raster::stroke_circle;
use chronomap_core::render::Animator;
use chronomap_core::view::{Point, TerrainRect, ViewportState};
use image::RgbaImage;

/// Largest ring radius, in terrain units.
const MAX_RADIUS: f64 = 30.0;
/// Ticks for one ring to grow from nothing to full size.
const PULSE_STEPS: u32 = 12;

/// Shared handle to the point the beacon pulses around.
pub type BeaconTarget = Rc<Cell<Option<Point>>>;

/// Expanding ring around the most recently dropped marker.
pub struct Beacon {
    target: BeaconTarget,
    step: u32,
}

impl Beacon {
    pub fn new(target: BeaconTarget) -> Self {
        Self { target, step: 0 }
    }

    fn radius(&self) -> f64 {
        MAX_RADIUS * f64::from(self.step + 1) / f64::from(PULSE_STEPS)
    }
}

impl Animator for Beacon {
    fn animated_objects(&self) -> Vec<TerrainRect> {
        let Some(p) = self.target.get() else {
            return Vec::new();
        };
        // Pad by a pixel's worth so the stroke edge is inside the damage.
        let r = MAX_RADIUS + 2.0;
        vec![TerrainRect {
            left: p.x - r,
            right: p.x + r,
            top: p.y - r,
            bottom: p.y + r,
        }]
    }

    fn draw(&mut self, frame: &mut RgbaImage, view: &ViewportState) {
        let Some(p) = self.target.get() else {
            return;
        };
        let center = view.terrain_to_screen(p.x, p.y);
        let radius = self.radius() / view.scale();
        let alpha = 255 - (200 * self.step / PULSE_STEPS) as u8;
        stroke_circle(frame, center, radius, 2.0, [255, 255, 255, alpha]);
        self.step = (self.step + 1) % PULSE_STEPS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_target_no_objects() {
        let beacon = Beacon::new(Rc::new(Cell::new(None)));
        assert!(beacon.animated_objects().is_empty());
    }

    #[test]
    fn test_ring_grows_then_restarts() {
        let target = Rc::new(Cell::new(Some(Point::new(0.0, 0.0))));
        let mut beacon = Beacon::new(Rc::clone(&target));
        let mut frame = RgbaImage::new(100, 100);
        let mut view = ViewportState::new(1.0, 0.1, 10.0);
        view.resize(100, 100);

        let first = beacon.radius();
        beacon.draw(&mut frame, &view);
        assert!(beacon.radius() > first);
        for _ in 1..PULSE_STEPS {
            beacon.draw(&mut frame, &view);
        }
        assert_eq!(beacon.radius(), first);
    }

    #[test]
    fn test_objects_follow_target() {
        let target = Rc::new(Cell::new(Some(Point::new(100.0, -50.0))));
        let beacon = Beacon::new(Rc::clone(&target));
        let rect = beacon.animated_objects()[0];
        assert_eq!(rect.left, 68.0);
        assert_eq!(rect.bottom, -18.0);

        target.set(None);
        assert!(beacon.animated_objects().is_empty());
    }
}
