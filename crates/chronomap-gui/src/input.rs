//! Translation of egui input into canvas events.
//!
//! Positions are converted to physical pixels relative to the map rect,
//! since the canvas renders at the display's native resolution.

use std::time::{Duration, Instant};

use chronomap_core::gesture::{
    ButtonId, InputSource, PointerEvent, PointerKind, ScrollEvent, TouchEvent, TouchPhase,
};
use chronomap_core::view::Point;

/// Two primary presses closer than this form a double click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

/// Largest travel (points) between the presses of a double click.
const DOUBLE_CLICK_SLOP: f32 = 6.0;

/// Wheel points per unit of canvas zoom delta.
const WHEEL_POINTS_PER_DY: f32 = 10.0;

/// An input event ready for the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CanvasInput {
    Pointer(PointerEvent),
    Touch(TouchEvent),
    Scroll(ScrollEvent),
}

pub fn button_id(button: egui::PointerButton) -> ButtonId {
    match button {
        egui::PointerButton::Primary => ButtonId::PRIMARY,
        egui::PointerButton::Middle => ButtonId::SECONDARY,
        egui::PointerButton::Secondary => ButtonId::TERTIARY,
        egui::PointerButton::Extra1 => ButtonId(4),
        egui::PointerButton::Extra2 => ButtonId(5),
    }
}

fn touch_phase(phase: egui::TouchPhase) -> TouchPhase {
    match phase {
        egui::TouchPhase::Start => TouchPhase::Begin,
        egui::TouchPhase::Move => TouchPhase::Update,
        egui::TouchPhase::End => TouchPhase::End,
        egui::TouchPhase::Cancel => TouchPhase::Cancel,
    }
}

/// egui reports clicks only on release, so double presses are detected
/// here from press timing.
#[derive(Default)]
pub struct ClickTracker {
    last: Option<(Instant, egui::Pos2)>,
}

impl ClickTracker {
    /// Record a primary press; true if it completes a double click.
    pub fn press(&mut self, now: Instant, pos: egui::Pos2) -> bool {
        let double = self.last.is_some_and(|(t, p)| {
            now.saturating_duration_since(t) < DOUBLE_CLICK_WINDOW
                && p.distance(pos) <= DOUBLE_CLICK_SLOP
        });
        // A third press starts a new pair.
        self.last = if double { None } else { Some((now, pos)) };
        double
    }
}

/// Maps egui coordinates into canvas pixels for one frame.
pub struct Translator {
    pub rect: egui::Rect,
    pub pixels_per_point: f32,
    /// Touch contacts are active; egui then also emits emulated pointer
    /// events, which must not drive mouse gestures.
    pub touching: bool,
}

impl Translator {
    pub fn to_canvas(&self, pos: egui::Pos2) -> Point {
        let p = (pos - self.rect.min) * self.pixels_per_point;
        Point::new(p.x as f64, p.y as f64)
    }

    fn pointer(&self, kind: PointerKind, pos: egui::Pos2) -> CanvasInput {
        let source = if self.touching {
            InputSource::Touchscreen
        } else {
            InputSource::Mouse
        };
        CanvasInput::Pointer(PointerEvent {
            source,
            kind,
            pos: self.to_canvas(pos),
        })
    }

    /// Canvas events for one egui event. Presses and touch starts outside
    /// the map are dropped; releases, moves and touch ends are always
    /// passed on so gestures that leave the map still finish.
    pub fn translate(
        &self,
        event: &egui::Event,
        clicks: &mut ClickTracker,
        now: Instant,
    ) -> Vec<CanvasInput> {
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed: true,
                ..
            } => {
                if !self.rect.contains(*pos) {
                    return Vec::new();
                }
                let b = button_id(*button);
                let mut out = vec![self.pointer(PointerKind::Press(b), *pos)];
                if b == ButtonId::PRIMARY && !self.touching && clicks.press(now, *pos) {
                    out.push(self.pointer(PointerKind::DoublePress(b), *pos));
                }
                out
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed: false,
                ..
            } => vec![self.pointer(PointerKind::Release(button_id(*button)), *pos)],
            egui::Event::PointerMoved(pos) => vec![self.pointer(PointerKind::Motion, *pos)],
            egui::Event::Touch { id, phase, pos, .. } => {
                if *phase == egui::TouchPhase::Start && !self.rect.contains(*pos) {
                    return Vec::new();
                }
                let p = self.to_canvas(*pos);
                vec![CanvasInput::Touch(TouchEvent::new(
                    id.0,
                    touch_phase(*phase),
                    p.x,
                    p.y,
                ))]
            }
            _ => Vec::new(),
        }
    }

    /// Zoom step for a smooth-scroll delta at `hover`. Scrolling up zooms in.
    pub fn scroll(&self, delta_y: f32, hover: egui::Pos2) -> Option<CanvasInput> {
        if delta_y == 0.0 || !self.rect.contains(hover) {
            return None;
        }
        let p = self.to_canvas(hover);
        let dy = -(delta_y / WHEEL_POINTS_PER_DY) as f64;
        Some(CanvasInput::Scroll(ScrollEvent::new(dy, p.x, p.y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator(touching: bool) -> Translator {
        Translator {
            rect: egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(400.0, 300.0)),
            pixels_per_point: 2.0,
            touching,
        }
    }

    fn press(x: f32, y: f32) -> egui::Event {
        egui::Event::PointerButton {
            pos: egui::pos2(x, y),
            button: egui::PointerButton::Primary,
            pressed: true,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn test_button_mapping() {
        assert_eq!(button_id(egui::PointerButton::Primary), ButtonId::PRIMARY);
        assert_eq!(button_id(egui::PointerButton::Middle), ButtonId::SECONDARY);
        assert_eq!(button_id(egui::PointerButton::Secondary), ButtonId::TERTIARY);
    }

    #[test]
    fn test_positions_in_physical_pixels() {
        let t = translator(false);
        assert_eq!(t.to_canvas(egui::pos2(110.0, 60.0)), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_double_press_synthesized() {
        let t = translator(false);
        let mut clicks = ClickTracker::default();
        let start = Instant::now();
        assert_eq!(t.translate(&press(200.0, 200.0), &mut clicks, start).len(), 1);
        let second = t.translate(
            &press(201.0, 200.0),
            &mut clicks,
            start + Duration::from_millis(150),
        );
        assert_eq!(second.len(), 2);
        assert!(matches!(
            second[1],
            CanvasInput::Pointer(PointerEvent {
                kind: PointerKind::DoublePress(ButtonId::PRIMARY),
                ..
            })
        ));
        // A third quick press is a plain press again.
        let third = t.translate(
            &press(201.0, 200.0),
            &mut clicks,
            start + Duration::from_millis(250),
        );
        assert_eq!(third.len(), 1);
    }

    #[test]
    fn test_slow_presses_are_single() {
        let mut clicks = ClickTracker::default();
        let start = Instant::now();
        assert!(!clicks.press(start, egui::pos2(0.0, 0.0)));
        assert!(!clicks.press(start + DOUBLE_CLICK_WINDOW, egui::pos2(0.0, 0.0)));
    }

    #[test]
    fn test_press_outside_map_dropped() {
        let t = translator(false);
        let mut clicks = ClickTracker::default();
        assert!(t
            .translate(&press(10.0, 10.0), &mut clicks, Instant::now())
            .is_empty());
    }

    #[test]
    fn test_emulated_pointer_marked_as_touchscreen() {
        let t = translator(true);
        let mut clicks = ClickTracker::default();
        let out = t.translate(&press(200.0, 200.0), &mut clicks, Instant::now());
        assert!(matches!(
            out[0],
            CanvasInput::Pointer(PointerEvent {
                source: InputSource::Touchscreen,
                ..
            })
        ));
    }

    #[test]
    fn test_scroll_up_zooms_in() {
        let t = translator(false);
        let Some(CanvasInput::Scroll(s)) = t.scroll(50.0, egui::pos2(300.0, 200.0)) else {
            panic!("expected a scroll event");
        };
        assert_eq!(s.dy, -5.0);
        assert_eq!(s.pos, Point::new(400.0, 300.0));
        assert!(t.scroll(50.0, egui::pos2(0.0, 0.0)).is_none());
    }
}
