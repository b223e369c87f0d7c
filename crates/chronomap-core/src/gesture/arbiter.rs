use std::time::Duration;

use tracing::debug;

use crate::cache::LayerKey;
use crate::clock::Clock;
use crate::config::CanvasConfig;
use crate::menu::RadialMenu;
use crate::view::{Point, ViewportState};

use super::input::{
    ButtonId, InputSource, PointerEvent, PointerKind, ScrollEvent, TouchEvent, TouchPhase,
};
use super::state::{GestureMode, GestureState, ScrollAnchor, TapHistory};

/// Side effect of a gesture step, applied by the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Drop a cached layer and redraw.
    Invalidate(LayerKey),
    /// Redraw with the cached layers as they are.
    Redraw,
    /// A radial menu gesture ended on a sector.
    MenuAction(usize),
    /// A path gesture ended with these screen points.
    PathComplete(Vec<Point>),
}

/// Turns pointer, touch and scroll events into one coherent gesture.
///
/// The `begin_*`/`continue_*`/`end_*` primitives enforce the mode
/// invariants and panic on misuse; the `handle_*` entry points decide
/// which primitive an event maps to and never violate them.
pub struct GestureArbiter {
    state: GestureState,
    taps: TapHistory,
    clock: Box<dyn Clock>,
    double_tap_window: Duration,
    menu: RadialMenu,
    redraw_margin: Point,
    pending: Vec<GestureOutcome>,
}

impl GestureArbiter {
    pub fn new(config: &CanvasConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            state: GestureState::default(),
            taps: TapHistory::default(),
            clock,
            double_tap_window: config.double_tap_window(),
            menu: RadialMenu::new(config.menu_sector_count, config.menu_start_angle, 0.0),
            redraw_margin: Point::new(config.redraw_margin_x, config.redraw_margin_y),
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn mode(&self) -> &GestureMode {
        &self.state.mode
    }

    pub fn menu(&self) -> &RadialMenu {
        &self.menu
    }

    pub fn set_menu_radius(&mut self, radius: f64) {
        self.menu.set_radius(radius);
    }

    /// Sector under the live pointer while the menu is open.
    pub fn active_sector(&self) -> Option<usize> {
        if !self.state.mode.is_menu() {
            return None;
        }
        let d = self.state.pointer_delta();
        self.menu.hit_test(d.x, d.y)
    }

    /// Outcomes produced by primitives since the last drain.
    pub fn drain_outcomes(&mut self) -> Vec<GestureOutcome> {
        std::mem::take(&mut self.pending)
    }

    fn invalidate(&mut self, key: LayerKey) {
        self.pending.push(GestureOutcome::Invalidate(key));
    }

    fn invalidate_viewport_layers(&mut self) {
        for key in LayerKey::VIEWPORT_DEPENDENT {
            self.invalidate(key);
        }
    }

    fn expect_idle(&self, entering: &str) {
        assert!(
            self.state.mode.is_idle(),
            "cannot begin {entering} while {} is active",
            self.state.mode.name()
        );
    }

    // Terrain scroll

    pub fn begin_terrain_scroll(&mut self, view: &ViewportState) {
        self.expect_idle("terrain-scroll");
        self.state.mode = GestureMode::TerrainScroll(ScrollAnchor {
            origin: view.pan(),
            redrawn: Point::default(),
        });
        debug!(pan = ?view.pan(), "terrain scroll begin");
    }

    pub fn continue_terrain_scroll(&mut self, view: &mut ViewportState) {
        let d = self.state.pointer_delta();
        let margin = self.redraw_margin;
        let active = self.state.mode.name();
        let GestureMode::TerrainScroll(anchor) = &mut self.state.mode else {
            panic!("cannot continue terrain-scroll while {active} is active");
        };
        view.set_pan(anchor.origin.x + d.x, anchor.origin.y + d.y);

        let moved_x = (d.x - anchor.redrawn.x).abs();
        let moved_y = (d.y - anchor.redrawn.y).abs();
        if moved_x >= margin.x || moved_y >= margin.y {
            anchor.redrawn = d;
            self.invalidate_viewport_layers();
        }
        self.pending.push(GestureOutcome::Redraw);
    }

    pub fn end_terrain_scroll(&mut self, view: &mut ViewportState) {
        let d = self.state.pointer_delta();
        let GestureMode::TerrainScroll(anchor) = self.state.mode else {
            panic!(
                "cannot end terrain-scroll while {} is active",
                self.state.mode.name()
            );
        };
        view.set_pan(anchor.origin.x + d.x, anchor.origin.y + d.y);
        self.state.mode = GestureMode::Idle;
        self.invalidate_viewport_layers();
        debug!(pan = ?view.pan(), "terrain scroll end");
    }

    /// Move the drag origin by a pan change made outside the drag, so the
    /// drag keeps its offset from the new view. No-op when not dragging.
    pub fn shift_scroll_origin(&mut self, dx: f64, dy: f64) {
        if let GestureMode::TerrainScroll(anchor) = &mut self.state.mode {
            anchor.origin.x += dx;
            anchor.origin.y += dy;
        }
    }

    // Radial menu

    pub fn begin_menu(&mut self) {
        self.expect_idle("radial-menu");
        self.state.mode = GestureMode::RadialMenu;
        self.invalidate(LayerKey::Menu);
        debug!(anchor = ?self.state.primary, "menu open");
    }

    pub fn continue_menu(&mut self) {
        assert!(
            self.state.mode.is_menu(),
            "cannot continue radial-menu while {} is active",
            self.state.mode.name()
        );
        self.invalidate(LayerKey::Menu);
    }

    /// Close the menu and dispatch the sector under the pointer, if any.
    pub fn end_menu(&mut self) {
        let selected = self.active_sector();
        self.close_menu("end");
        debug!(?selected, "menu closed");
        if let Some(index) = selected {
            self.pending.push(GestureOutcome::MenuAction(index));
        }
    }

    /// Close the menu without dispatching anything.
    pub fn cancel_menu(&mut self) {
        self.close_menu("cancel");
        debug!("menu cancelled");
    }

    fn close_menu(&mut self, verb: &str) {
        assert!(
            self.state.mode.is_menu(),
            "cannot {verb} radial-menu while {} is active",
            self.state.mode.name()
        );
        self.state.mode = GestureMode::Idle;
        self.invalidate(LayerKey::Menu);
    }

    // Path follow

    pub fn begin_path(&mut self) {
        self.expect_idle("path-follow");
        self.state.mode = GestureMode::PathFollow {
            points: vec![self.state.secondary],
        };
        self.invalidate(LayerKey::Path);
        debug!(start = ?self.state.secondary, "path begin");
    }

    pub fn continue_path(&mut self) {
        let pos = self.state.secondary;
        let active = self.state.mode.name();
        let GestureMode::PathFollow { points } = &mut self.state.mode else {
            panic!("cannot continue path-follow while {active} is active");
        };
        points.push(pos);
        self.invalidate(LayerKey::Path);
    }

    pub fn end_path(&mut self) {
        let pos = self.state.secondary;
        let active = self.state.mode.name();
        let GestureMode::PathFollow { points } = &mut self.state.mode else {
            panic!("cannot end path-follow while {active} is active");
        };
        points.push(pos);
        let points = std::mem::take(points);
        self.state.mode = GestureMode::Idle;
        debug!(points = points.len(), "path complete");
        self.invalidate(LayerKey::Path);
        self.pending.push(GestureOutcome::PathComplete(points));
    }

    fn continue_active(&mut self, view: &mut ViewportState) {
        match self.state.mode {
            GestureMode::Idle => {}
            GestureMode::TerrainScroll(_) => self.continue_terrain_scroll(view),
            GestureMode::PathFollow { .. } => self.continue_path(),
            GestureMode::RadialMenu => self.continue_menu(),
        }
    }

    fn end_active(&mut self, view: &mut ViewportState) {
        match self.state.mode {
            GestureMode::Idle => {}
            GestureMode::TerrainScroll(_) => self.end_terrain_scroll(view),
            GestureMode::PathFollow { .. } => self.end_path(),
            GestureMode::RadialMenu => self.end_menu(),
        }
    }

    // Event entry points

    /// Mouse, pen and touchpad events. Touchscreen contacts arriving as
    /// emulated pointer events are dropped; they come in via
    /// [`handle_touch`](Self::handle_touch).
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        view: &mut ViewportState,
    ) -> Vec<GestureOutcome> {
        if event.source == InputSource::Touchscreen {
            return Vec::new();
        }
        let button = event.effective_button();

        match event.kind {
            PointerKind::Press(_) => {
                if self.state.mode.is_idle() {
                    self.state.primary = event.pos;
                    self.state.secondary = event.pos;
                    match button {
                        Some(ButtonId::PRIMARY) => self.begin_terrain_scroll(view),
                        Some(ButtonId::SECONDARY) => self.begin_path(),
                        Some(ButtonId::TERTIARY) => self.begin_menu(),
                        other => debug!(button = ?other, "unbound button"),
                    }
                } else {
                    self.state.secondary = event.pos;
                    self.continue_active(view);
                }
                if let Some(b) = button {
                    self.state.mouse_buttons.insert(b);
                }
            }
            PointerKind::DoublePress(_) => {
                if button == Some(ButtonId::PRIMARY) {
                    self.double_click(event.pos, view);
                }
            }
            PointerKind::Motion => {
                self.state.secondary = event.pos;
                self.continue_active(view);
            }
            PointerKind::Release(_) => {
                self.state.secondary = event.pos;
                if self.state.double_click {
                    self.state.double_click = false;
                } else {
                    self.end_active(view);
                }
                if let Some(b) = button {
                    if !self.state.mouse_buttons.remove(&b) {
                        debug!(button = b.0, "release of a button that was not held");
                    }
                }
            }
        }
        self.drain_outcomes()
    }

    fn double_click(&mut self, pos: Point, view: &mut ViewportState) {
        match self.state.mode {
            GestureMode::PathFollow { .. } => {
                debug!("double click ignored while drawing a path");
                return;
            }
            GestureMode::RadialMenu => self.end_menu(),
            GestureMode::TerrainScroll(_) => self.end_terrain_scroll(view),
            GestureMode::Idle => {}
        }
        self.state.double_click = true;
        self.state.primary = pos;
        self.state.secondary = pos;
        self.begin_menu();
    }

    /// Touchscreen contacts.
    ///
    /// The first contact pans, or opens the menu when it starts within the
    /// double-tap window of the previous first contact. A second concurrent
    /// contact turns a pan into a menu anchored at the first contact.
    pub fn handle_touch(
        &mut self,
        event: &TouchEvent,
        view: &mut ViewportState,
    ) -> Vec<GestureOutcome> {
        let seq = Some(event.sequence);
        match event.phase {
            TouchPhase::Begin if self.state.primary_touch.is_none() => {
                self.first_touch_begin(event, view)
            }
            TouchPhase::Begin => self.second_touch_begin(event, view),
            TouchPhase::Update if seq == self.state.primary_touch => {
                self.state.secondary = event.pos;
                if self.state.mode.is_scrolling() {
                    self.continue_terrain_scroll(view);
                } else if self.state.mode.is_menu() && self.state.secondary_touch.is_none() {
                    self.continue_menu();
                }
            }
            TouchPhase::Update if seq == self.state.secondary_touch => {
                self.state.secondary = event.pos;
                if self.state.mode.is_menu() {
                    self.continue_menu();
                }
            }
            TouchPhase::End if seq == self.state.primary_touch => {
                let second_held = self.state.secondary_touch.is_some();
                if !second_held {
                    self.state.secondary = event.pos;
                }
                if self.state.mode.is_scrolling() {
                    self.end_terrain_scroll(view);
                }
                if self.state.mode.is_menu() && !self.state.double_tap && !second_held {
                    self.end_menu();
                }
                self.state.primary_touch = None;
                self.state.double_tap = false;
            }
            TouchPhase::End if seq == self.state.secondary_touch => {
                self.state.secondary = event.pos;
                if self.state.mode.is_menu() {
                    self.end_menu();
                }
                self.state.secondary_touch = None;
            }
            TouchPhase::Cancel if seq == self.state.primary_touch => {
                if self.state.mode.is_scrolling() {
                    self.end_terrain_scroll(view);
                }
                if self.state.mode.is_menu() {
                    self.cancel_menu();
                }
                self.state.primary_touch = None;
                self.state.double_tap = false;
            }
            TouchPhase::Cancel if seq == self.state.secondary_touch => {
                if self.state.mode.is_menu() {
                    self.cancel_menu();
                }
                self.state.secondary_touch = None;
            }
            _ => debug!(sequence = event.sequence.0, phase = ?event.phase, "untracked touch"),
        }
        self.drain_outcomes()
    }

    fn first_touch_begin(&mut self, event: &TouchEvent, view: &mut ViewportState) {
        if self.state.mode.is_following_path() {
            debug!("touch ignored while drawing a path");
            return;
        }
        self.state.primary_touch = Some(event.sequence);
        self.state.double_tap = self
            .taps
            .register(self.clock.now(), self.double_tap_window);
        self.state.secondary = event.pos;

        if self.state.mode.is_scrolling() {
            self.end_terrain_scroll(view);
        }
        if self.state.mode.is_menu() {
            self.continue_menu();
        } else if self.state.double_tap {
            self.state.primary = event.pos;
            self.begin_menu();
        } else {
            self.state.primary = event.pos;
            self.begin_terrain_scroll(view);
        }
    }

    fn second_touch_begin(&mut self, event: &TouchEvent, view: &mut ViewportState) {
        if self.state.secondary_touch.is_some() || self.state.mode.is_following_path() {
            debug!(sequence = event.sequence.0, "extra touch ignored");
            return;
        }
        self.state.secondary_touch = Some(event.sequence);
        if self.state.mode.is_scrolling() {
            self.end_terrain_scroll(view);
            self.state.primary = self.state.secondary;
        }
        self.state.secondary = event.pos;
        if self.state.mode.is_menu() {
            self.continue_menu();
        } else {
            self.begin_menu();
        }
    }

    /// Wheel zoom anchored at the pointer. Never changes the gesture mode;
    /// an ongoing drag is re-based so it continues from the zoomed view.
    pub fn handle_scroll(
        &mut self,
        event: &ScrollEvent,
        view: &mut ViewportState,
    ) -> Vec<GestureOutcome> {
        let before = view.pan();
        let factor = view.zoom_at(event.dy, event.pos.x, event.pos.y);
        let after = view.pan();
        self.shift_scroll_origin(after.x - before.x, after.y - before.y);
        debug!(factor, scale = view.scale(), "zoom");
        self.invalidate_viewport_layers();
        self.drain_outcomes()
    }
}
