use std::time::Duration;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, LayerKey, RenderCache};
use crate::clock::Clock;
use crate::config::CanvasConfig;
use crate::consts::MAX_YEARS_BP;
use crate::error::Result;
use crate::gesture::{
    GestureArbiter, GestureMode, GestureOutcome, GestureState, PointerEvent, ScrollEvent,
    TouchEvent,
};
use crate::menu::RadialMenu;
use crate::render::animation::{damage_rects, tick_interval};
use crate::render::layers::{
    render_background, render_items, render_menu, render_menu_sector, render_path, render_terrain,
};
use crate::render::raster::fill;
use crate::render::{Animator, DrawRequest, FrameComposer, FrameReport, LayerError, MapItem, Surface};
use crate::tiles::{new_tile_cache, resolve_epoch, TileCache, TileProvider};
use crate::view::{Point, ScreenRect, ViewportState};

type MenuActionFn = Box<dyn FnMut(usize)>;
type PathCompleteFn = Box<dyn FnMut(&[Point])>;

/// The interactive map: viewport, gestures, cached layers and the frame
/// composer behind one event-driven API.
///
/// The host feeds input through the `handle_*` methods, polls
/// [`take_redraw_request`](Self::take_redraw_request), and calls
/// [`compose`](Self::compose) to get pixels.
pub struct MapCanvas {
    config: CanvasConfig,
    view: ViewportState,
    arbiter: GestureArbiter,
    layers: RenderCache<LayerKey, Surface>,
    tiles: TileCache,
    provider: Box<dyn TileProvider>,
    epochs: Vec<i32>,
    epoch: Option<i32>,
    items: Vec<MapItem>,
    animator: Option<Box<dyn Animator>>,
    animation_frequency: f64,
    composer: FrameComposer,
    on_menu_action: Option<MenuActionFn>,
    on_path_complete: Option<PathCompleteFn>,
    redraw_requested: bool,
}

impl MapCanvas {
    pub fn new(config: CanvasConfig, provider: Box<dyn TileProvider>, clock: Box<dyn Clock>) -> Self {
        let config = config.validated();
        let view = ViewportState::new(config.initial_scale, config.scale_min, config.scale_max);
        let mut arbiter = GestureArbiter::new(&config, clock);
        let (w, h) = view.screen_size();
        arbiter.set_menu_radius(RadialMenu::radius_for_screen(w, h));

        let epochs = provider.epochs().unwrap_or_else(|e| {
            warn!(error = %e, "no biome epochs available");
            Vec::new()
        });
        let epoch = if epochs.is_empty() {
            None
        } else {
            resolve_epoch(&epochs, 0)
                .map_err(|e| warn!(error = %e, "cannot resolve present-day epoch"))
                .ok()
        };
        info!(epochs = epochs.len(), ?epoch, "canvas created");

        Self {
            animation_frequency: config.animation_frequency,
            config,
            view,
            arbiter,
            layers: RenderCache::new(),
            tiles: new_tile_cache(),
            provider,
            epochs,
            epoch,
            items: Vec::new(),
            animator: None,
            composer: FrameComposer::new(),
            on_menu_action: None,
            on_path_complete: None,
            redraw_requested: true,
        }
    }

    /// Called with the sector index when a menu gesture ends on a sector.
    pub fn on_menu_action(&mut self, f: impl FnMut(usize) + 'static) {
        self.on_menu_action = Some(Box::new(f));
    }

    /// Called with the stroke when a path gesture ends.
    pub fn on_path_complete(&mut self, f: impl FnMut(&[Point]) + 'static) {
        self.on_path_complete = Some(Box::new(f));
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewportState {
        &self.view
    }

    pub fn gesture(&self) -> &GestureState {
        self.arbiter.state()
    }

    pub fn mode(&self) -> &GestureMode {
        self.arbiter.mode()
    }

    pub fn menu(&self) -> &RadialMenu {
        self.arbiter.menu()
    }

    pub fn active_sector(&self) -> Option<usize> {
        self.arbiter.active_sector()
    }

    pub fn epochs(&self) -> &[i32] {
        &self.epochs
    }

    pub fn epoch(&self) -> Option<i32> {
        self.epoch
    }

    pub fn items(&self) -> &[MapItem] {
        &self.items
    }

    pub fn layer_stats(&self) -> CacheStats {
        self.layers.stats()
    }

    pub fn tile_stats(&self) -> CacheStats {
        self.tiles.stats()
    }

    pub fn is_cached(&self, key: LayerKey) -> bool {
        self.layers.contains(&key)
    }

    /// Whether anything changed since the last call that needs a repaint.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn invalidate(&mut self, key: LayerKey) {
        self.layers.invalidate(&key);
        self.request_redraw();
    }

    fn request_redraw(&mut self) {
        self.composer.mark_invalidated();
        self.redraw_requested = true;
    }

    fn apply(&mut self, outcomes: Vec<GestureOutcome>) {
        for outcome in outcomes {
            match outcome {
                GestureOutcome::Invalidate(key) => self.invalidate(key),
                GestureOutcome::Redraw => self.request_redraw(),
                GestureOutcome::MenuAction(index) => {
                    info!(index, "menu action");
                    if let Some(f) = self.on_menu_action.as_mut() {
                        f(index);
                    }
                }
                GestureOutcome::PathComplete(points) => {
                    info!(points = points.len(), "path complete");
                    if let Some(f) = self.on_path_complete.as_mut() {
                        f(points.as_slice());
                    }
                }
            }
        }
    }

    // Input

    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        let outcomes = self.arbiter.handle_pointer(event, &mut self.view);
        self.apply(outcomes);
    }

    pub fn handle_touch(&mut self, event: &TouchEvent) {
        let outcomes = self.arbiter.handle_touch(event, &mut self.view);
        self.apply(outcomes);
    }

    pub fn handle_scroll(&mut self, event: &ScrollEvent) {
        let outcomes = self.arbiter.handle_scroll(event, &mut self.view);
        self.apply(outcomes);
    }

    /// New canvas size in pixels. Every cached layer is sized or anchored
    /// to the screen, so all of them are dropped.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.view.screen_size() == (width.max(1), height.max(1)) {
            return;
        }
        self.view.resize(width, height);
        let (w, h) = self.view.screen_size();
        self.arbiter
            .set_menu_radius(RadialMenu::radius_for_screen(w, h));
        self.layers.clear();
        self.request_redraw();
        info!(width = w, height = h, "canvas resized");
    }

    /// Place the view: terrain origin `pan` pixels from the screen center,
    /// at `scale` (clamped).
    pub fn look_at(&mut self, pan_x: f64, pan_y: f64, scale: f64) {
        let before = self.view.pan();
        self.view.set_scale(scale);
        self.view.set_pan(pan_x, pan_y);
        self.arbiter
            .shift_scroll_origin(pan_x - before.x, pan_y - before.y);
        for key in LayerKey::VIEWPORT_DEPENDENT {
            self.invalidate(key);
        }
        debug!(pan_x, pan_y, scale = self.view.scale(), "look at");
    }

    // Data

    /// Select the biome epoch for `years_bp` years before present (clamped
    /// to the supported range). Returns whether the epoch changed; only then
    /// is the terrain redrawn.
    pub fn set_time_parameter(&mut self, years_bp: u32) -> Result<bool> {
        let years_bp = years_bp.min(MAX_YEARS_BP);
        let epoch = resolve_epoch(&self.epochs, years_bp)?;
        if self.epoch == Some(epoch) {
            return Ok(false);
        }
        info!(years_bp, epoch, previous = ?self.epoch, "epoch changed");
        self.epoch = Some(epoch);
        self.invalidate(LayerKey::Terrain);
        Ok(true)
    }

    pub fn set_items(&mut self, items: Vec<MapItem>) {
        self.items = items;
        self.invalidate(LayerKey::Items);
    }

    // Animation

    pub fn set_animator(&mut self, animator: Box<dyn Animator>) {
        self.animator = Some(animator);
    }

    /// Ticks per second; zero or less stops animation.
    pub fn set_animation_frequency(&mut self, frequency: f64) {
        self.animation_frequency = if frequency.is_finite() { frequency.max(0.0) } else { 0.0 };
        debug!(frequency = self.animation_frequency, "animation frequency");
    }

    pub fn animation_frequency(&self) -> f64 {
        self.animation_frequency
    }

    /// How often the host should call [`animation_tick`](Self::animation_tick).
    pub fn animation_interval(&self) -> Option<Duration> {
        tick_interval(self.animation_frequency)
    }

    /// Mark the next frame as an animation frame and return the screen
    /// regions the animated objects cover. Gesture state is untouched.
    pub fn animation_tick(&mut self) -> Vec<ScreenRect> {
        self.composer.mark_animation_frame();
        let Some(animator) = self.animator.as_ref() else {
            return Vec::new();
        };
        let rects = damage_rects(&animator.animated_objects(), &self.view);
        if !rects.is_empty() {
            self.redraw_requested = true;
        }
        rects
    }

    // Drawing

    /// Paint one frame into `dst`, reallocating it if its size differs from
    /// the canvas.
    ///
    /// A layer whose tiles cannot be loaded is skipped and reported; the
    /// rest of the frame is still drawn.
    pub fn compose(&mut self, dst: &mut RgbaImage, request: &DrawRequest) -> FrameReport {
        let (w, h) = self.view.screen_size();
        if dst.dimensions() != (w, h) {
            *dst = RgbaImage::new(w, h);
        }
        let mut report = FrameReport::default();

        if self.composer.needs_recomposite(request, w, h) {
            report.recomposited = true;
            self.paint_static_layers(dst, &mut report);
            let keep = report.errors.is_empty();
            self.composer.store_base(keep.then_some(&*dst));
        } else {
            self.composer.restore_base(dst);
        }

        if self.animation_frequency > 0.0 {
            if let Some(animator) = self.animator.as_mut() {
                animator.draw(dst, &self.view);
            }
        }

        if self.arbiter.mode().is_following_path() {
            let (view, config) = (&self.view, &self.config);
            let points = self.arbiter.state().path_points();
            let path = self
                .layers
                .get_or_insert_with(&LayerKey::Path, || render_path(view, config, points));
            path.paint_onto(dst, Point::default());
            report.layers.push(LayerKey::Path);
        }

        if self.arbiter.mode().is_menu() {
            let menu = self.menu_surface();
            menu.paint_onto(dst, self.arbiter.state().primary);
            report.layers.push(LayerKey::Menu);
        }

        self.composer.finish_frame();
        report
    }

    fn paint_static_layers(&mut self, dst: &mut RgbaImage, report: &mut FrameReport) {
        let (w, h) = self.view.screen_size();
        let color = self.config.background_color;
        if self.config.background_workaround_enabled {
            let bg = self
                .layers
                .get_or_insert_with(&LayerKey::Background, || render_background(w, h, color));
            bg.paint_onto(dst, Point::default());
        } else {
            fill(dst, [color[0], color[1], color[2], 255]);
        }
        report.layers.push(LayerKey::Background);

        let anchor = self.view.terrain_origin_on_screen();
        let view = &self.view;
        let config = &self.config;
        let epoch = self.epoch;
        let tiles = &mut self.tiles;
        let provider = self.provider.as_ref();
        match self.layers.get_or_render(&LayerKey::Terrain, || {
            render_terrain(view, config, epoch, tiles, provider)
        }) {
            Ok(terrain) => {
                terrain.paint_onto(dst, anchor);
                report.layers.push(LayerKey::Terrain);
            }
            Err(error) => {
                warn!(%error, "terrain layer skipped");
                report.errors.push(LayerError {
                    layer: LayerKey::Terrain,
                    error,
                });
            }
        }

        let items = &self.items;
        let layer = self
            .layers
            .get_or_insert_with(&LayerKey::Items, || render_items(view, config, items));
        layer.paint_onto(dst, anchor);
        report.layers.push(LayerKey::Items);
    }

    /// The menu ring, built from per-sector icons so a hover change only
    /// renders icons not yet cached in their new state.
    fn menu_surface(&mut self) -> std::rc::Rc<Surface> {
        if let Some(menu) = self.layers.get(&LayerKey::Menu) {
            return menu;
        }
        let active = self.arbiter.active_sector();
        let menu = self.arbiter.menu();
        let icon_radius = menu.icon_radius();
        let icons: Vec<_> = (0..menu.sectors())
            .map(|index| {
                let is_active = active == Some(index);
                let key = LayerKey::MenuSector {
                    index,
                    active: is_active,
                };
                self.layers.get_or_insert_with(&key, || {
                    render_menu_sector(index, is_active, icon_radius)
                })
            })
            .collect();
        let ring = self.config.menu_ring_color;
        self.layers
            .get_or_insert_with(&LayerKey::Menu, || render_menu(menu, &icons, ring))
    }
}
