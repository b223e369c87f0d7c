use std::collections::HashSet;
use std::time::Duration;

use crate::view::Point;

use super::input::{ButtonId, SequenceId};

/// Pan snapshot taken when a terrain drag starts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollAnchor {
    /// Pan at the start of the drag.
    pub origin: Point,
    /// Drag offset at which the viewport layers were last invalidated.
    pub redrawn: Point,
}

/// The one interaction the canvas is currently in.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GestureMode {
    #[default]
    Idle,
    TerrainScroll(ScrollAnchor),
    /// Freehand stroke in screen coordinates; never empty while active.
    PathFollow { points: Vec<Point> },
    RadialMenu,
}

impl GestureMode {
    pub fn name(&self) -> &'static str {
        match self {
            GestureMode::Idle => "idle",
            GestureMode::TerrainScroll(_) => "terrain-scroll",
            GestureMode::PathFollow { .. } => "path-follow",
            GestureMode::RadialMenu => "radial-menu",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, GestureMode::Idle)
    }

    pub fn is_scrolling(&self) -> bool {
        matches!(self, GestureMode::TerrainScroll(_))
    }

    pub fn is_following_path(&self) -> bool {
        matches!(self, GestureMode::PathFollow { .. })
    }

    pub fn is_menu(&self) -> bool {
        matches!(self, GestureMode::RadialMenu)
    }
}

/// Everything the arbiter tracks between events.
#[derive(Clone, Debug, Default)]
pub struct GestureState {
    pub mode: GestureMode,
    /// Gesture anchor: drag start, or the menu center.
    pub primary: Point,
    /// Live pointer position.
    pub secondary: Point,
    pub mouse_buttons: HashSet<ButtonId>,
    /// Touch sequence that owns the current touch gesture.
    pub primary_touch: Option<SequenceId>,
    /// Concurrent second touch driving the menu pointer.
    pub secondary_touch: Option<SequenceId>,
    /// Set by a double click so the following release does not close the
    /// menu it just opened.
    pub double_click: bool,
    /// Whether the current primary touch began as the second tap of a
    /// double tap.
    pub double_tap: bool,
}

impl GestureState {
    pub fn path_points(&self) -> &[Point] {
        match &self.mode {
            GestureMode::PathFollow { points } => points,
            _ => &[],
        }
    }

    /// Pointer offset from the gesture anchor.
    pub fn pointer_delta(&self) -> Point {
        Point::new(
            self.secondary.x - self.primary.x,
            self.secondary.y - self.primary.y,
        )
    }
}

/// Start time of the last primary touch, kept across touch sequences.
#[derive(Clone, Copy, Debug, Default)]
pub struct TapHistory {
    pub last_tap: Option<Duration>,
}

impl TapHistory {
    /// Record a tap at `now`, returning whether it falls within `window`
    /// of the previous one.
    pub fn register(&mut self, now: Duration, window: Duration) -> bool {
        let double = self
            .last_tap
            .is_some_and(|prev| now.saturating_sub(prev) < window);
        self.last_tap = Some(now);
        double
    }
}
