mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use approx::assert_relative_eq;
use image::{Rgba, RgbaImage};

use chronomap_core::cache::LayerKey;
use chronomap_core::canvas::MapCanvas;
use chronomap_core::clock::ManualClock;
use chronomap_core::config::CanvasConfig;
use chronomap_core::error::ChronoError;
use chronomap_core::gesture::{ButtonId, PointerEvent, PointerKind};
use chronomap_core::render::{Animator, DrawRequest, MapItem};
use chronomap_core::tiles::Region;
use chronomap_core::view::{ScreenRect, TerrainRect, ViewportState};

use common::{make_canvas, make_canvas_with, record_dispatch, FakeProvider};

fn frame() -> RgbaImage {
    RgbaImage::new(1, 1)
}

fn press(canvas: &mut MapCanvas, b: u8, x: f64, y: f64) {
    canvas.handle_pointer(&PointerEvent::mouse(PointerKind::Press(ButtonId(b)), x, y));
}

fn motion(canvas: &mut MapCanvas, x: f64, y: f64) {
    canvas.handle_pointer(&PointerEvent::mouse(PointerKind::Motion, x, y));
}

fn release(canvas: &mut MapCanvas, b: u8, x: f64, y: f64) {
    canvas.handle_pointer(&PointerEvent::mouse(PointerKind::Release(ButtonId(b)), x, y));
}

/// Draws one red pixel per frame, moving right each time, and reports a
/// fixed 10x10 object at the terrain origin.
struct Blinker {
    frames: Rc<Cell<u32>>,
}

impl Animator for Blinker {
    fn animated_objects(&self) -> Vec<TerrainRect> {
        vec![TerrainRect {
            left: 0.0,
            right: 10.0,
            top: 0.0,
            bottom: 10.0,
        }]
    }

    fn draw(&mut self, frame: &mut RgbaImage, _view: &ViewportState) {
        let n = self.frames.get();
        frame.put_pixel(n, 0, Rgba([255, 0, 0, 255]));
        self.frames.set(n + 1);
    }
}

// ---------------------------------------------------------------------------
// Composition and caching
// ---------------------------------------------------------------------------

#[test]
fn test_first_frame_paints_static_layers() {
    let (mut canvas, provider, _clock) = make_canvas(200, 100);
    let mut dst = frame();
    let report = canvas.compose(&mut dst, &DrawRequest::Full);

    assert!(report.is_ok());
    assert!(report.recomposited);
    assert_eq!(
        report.layers,
        vec![LayerKey::Background, LayerKey::Terrain, LayerKey::Items]
    );
    assert_eq!(dst.dimensions(), (200, 100));
    // Four topography tiles around the origin plus the present-day biome.
    assert_eq!(provider.fetches.get(), 5);
    assert!(provider
        .requested
        .borrow()
        .contains(&Region::Biome { epoch: 0 }));

    let px = dst.get_pixel(100, 50).0;
    assert_eq!(px[0], px[1]);
    assert_eq!(px[1], px[2]);
    assert!(px[0] < 200, "relief should darken the white ground");
    assert_eq!(px[3], 255);
}

#[test]
fn test_second_frame_reuses_cached_layers() {
    let (mut canvas, provider, _clock) = make_canvas(200, 100);
    let mut dst = frame();
    canvas.compose(&mut dst, &DrawRequest::Full);
    let renders = canvas.layer_stats().renders;
    let first = dst.clone();

    let report = canvas.compose(&mut dst, &DrawRequest::Full);
    assert!(report.recomposited);
    assert_eq!(canvas.layer_stats().renders, renders);
    assert_eq!(provider.fetches.get(), 5);
    assert_eq!(dst, first);
}

#[test]
fn test_flat_background_when_workaround_disabled() {
    let config = CanvasConfig {
        background_workaround_enabled: false,
        ..CanvasConfig::default()
    };
    let (mut canvas, _provider, _clock) = make_canvas_with(config, 200, 100);
    let mut dst = frame();
    let report = canvas.compose(&mut dst, &DrawRequest::Full);
    assert!(report.is_ok());
    assert!(!canvas.is_cached(LayerKey::Background));
    assert!(canvas.is_cached(LayerKey::Terrain));
}

#[test]
fn test_items_drawn_at_terrain_position() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    let mut dst = frame();
    canvas.compose(&mut dst, &DrawRequest::Full);
    assert!(canvas.take_redraw_request());

    canvas.set_items(vec![MapItem {
        x: 0.0,
        y: 0.0,
        radius: 5.0,
        color: [0, 0, 255, 255],
    }]);
    assert!(!canvas.is_cached(LayerKey::Items));
    assert!(canvas.is_cached(LayerKey::Terrain));
    assert!(canvas.take_redraw_request());

    canvas.compose(&mut dst, &DrawRequest::Full);
    let px = dst.get_pixel(100, 50).0;
    assert!(px[2] > 200 && px[0] < 50, "item missing: {px:?}");
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

#[test]
fn test_animation_frame_restores_static_layers() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    let frames = Rc::new(Cell::new(0));
    canvas.set_animator(Box::new(Blinker {
        frames: Rc::clone(&frames),
    }));
    canvas.set_animation_frequency(10.0);

    let mut dst = frame();
    canvas.compose(&mut dst, &DrawRequest::Full);
    assert_eq!(frames.get(), 1);
    let base_px = *dst.get_pixel(1, 1);
    let renders = canvas.layer_stats().renders;

    let damage = canvas.animation_tick();
    assert_eq!(damage, vec![ScreenRect::new(100.0, 50.0, 10.0, 10.0)]);
    let report = canvas.compose(&mut dst, &DrawRequest::Damage(damage));

    assert!(!report.recomposited);
    assert_eq!(canvas.layer_stats().renders, renders);
    assert_eq!(frames.get(), 2);
    // Last frame's sprite is gone, this frame's is drawn.
    assert_eq!(dst.get_pixel(0, 0), &base_px);
    assert_eq!(dst.get_pixel(1, 0).0, [255, 0, 0, 255]);
}

#[test]
fn test_invalidation_forces_recomposite_on_animation_frame() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    let mut dst = frame();
    canvas.compose(&mut dst, &DrawRequest::Full);

    canvas.set_items(Vec::new());
    canvas.animation_tick();
    let report = canvas.compose(&mut dst, &DrawRequest::Damage(Vec::new()));
    assert!(report.recomposited);
}

#[test]
fn test_animator_idle_at_zero_frequency() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    let frames = Rc::new(Cell::new(0));
    canvas.set_animator(Box::new(Blinker {
        frames: Rc::clone(&frames),
    }));
    assert_eq!(canvas.animation_interval(), None);
    canvas.compose(&mut frame(), &DrawRequest::Full);
    assert_eq!(frames.get(), 0);
}

#[test]
fn test_animation_interval() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    canvas.set_animation_frequency(4.0);
    assert_eq!(canvas.animation_interval(), Some(Duration::from_millis(250)));
    canvas.set_animation_frequency(-1.0);
    assert_eq!(canvas.animation_frequency(), 0.0);
    assert_eq!(canvas.animation_interval(), None);
}

#[test]
fn test_extreme_timing_config_does_not_panic() {
    let config = CanvasConfig {
        double_tap_interval: 1e20,
        animation_frequency: 1e-300,
        ..CanvasConfig::default()
    };
    let (mut canvas, _provider, _clock) = make_canvas_with(config, 200, 100);
    assert_eq!(canvas.config().double_tap_interval, 5.0);
    assert_eq!(canvas.animation_interval(), None);

    canvas.set_animation_frequency(1e-300);
    assert_eq!(canvas.animation_interval(), None);
    canvas.set_animation_frequency(2.0);
    assert_eq!(canvas.animation_interval(), Some(Duration::from_millis(500)));
}

#[test]
fn test_off_screen_objects_produce_no_damage() {
    struct Far;
    impl Animator for Far {
        fn animated_objects(&self) -> Vec<TerrainRect> {
            vec![TerrainRect {
                left: 5000.0,
                right: 5010.0,
                top: 0.0,
                bottom: 10.0,
            }]
        }
        fn draw(&mut self, _frame: &mut RgbaImage, _view: &ViewportState) {}
    }
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    canvas.set_animator(Box::new(Far));
    assert!(canvas.animation_tick().is_empty());
}

// ---------------------------------------------------------------------------
// Time parameter
// ---------------------------------------------------------------------------

#[test]
fn test_time_parameter_selects_epoch() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    canvas.compose(&mut frame(), &DrawRequest::Full);
    assert_eq!(canvas.epoch(), Some(0));

    assert!(!canvas.set_time_parameter(0).unwrap());
    assert!(!canvas.set_time_parameter(5000).unwrap());
    assert!(canvas.is_cached(LayerKey::Terrain));

    assert!(canvas.set_time_parameter(7000).unwrap());
    assert_eq!(canvas.epoch(), Some(-6000));
    assert!(!canvas.is_cached(LayerKey::Terrain));
    assert!(canvas.is_cached(LayerKey::Items));

    // Clamped to the oldest supported value.
    assert!(canvas.set_time_parameter(500_000).unwrap());
    assert_eq!(canvas.epoch(), Some(-21000));
}

#[test]
fn test_time_parameter_without_epochs_fails() {
    let provider = FakeProvider::new(Vec::new());
    let mut canvas = MapCanvas::new(
        CanvasConfig::default(),
        Box::new(provider.clone()),
        Box::new(ManualClock::new()),
    );
    canvas.resize(200, 100);
    assert_eq!(canvas.epoch(), None);
    assert!(matches!(
        canvas.set_time_parameter(0),
        Err(ChronoError::NoEpoch { years_bp: 0 })
    ));

    // Terrain still renders, just without biomes.
    let report = canvas.compose(&mut frame(), &DrawRequest::Full);
    assert!(report.is_ok());
    assert_eq!(provider.fetches.get(), 4);
}

// ---------------------------------------------------------------------------
// Provider failures
// ---------------------------------------------------------------------------

#[test]
fn test_failed_terrain_is_reported_and_retried() {
    let (mut canvas, provider, _clock) = make_canvas(200, 100);
    provider.failing.set(true);
    let mut dst = frame();
    let report = canvas.compose(&mut dst, &DrawRequest::Full);

    assert!(!report.is_ok());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].layer, LayerKey::Terrain);
    assert!(matches!(report.errors[0].error, ChronoError::Provider(_)));
    assert_eq!(report.layers, vec![LayerKey::Background, LayerKey::Items]);
    assert!(!canvas.is_cached(LayerKey::Terrain));

    // No stored base, so even an animation frame recomposites.
    canvas.animation_tick();
    provider.failing.set(false);
    let report = canvas.compose(&mut dst, &DrawRequest::Damage(Vec::new()));
    assert!(report.recomposited);
    assert!(report.is_ok());
    assert!(canvas.is_cached(LayerKey::Terrain));
}

// ---------------------------------------------------------------------------
// View changes
// ---------------------------------------------------------------------------

#[test]
fn test_resize_drops_layers_and_resizes_menu() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    let mut dst = frame();
    canvas.compose(&mut dst, &DrawRequest::Full);
    canvas.take_redraw_request();

    canvas.resize(200, 100);
    assert!(!canvas.take_redraw_request());
    assert!(canvas.is_cached(LayerKey::Background));

    canvas.resize(300, 200);
    assert!(canvas.take_redraw_request());
    assert!(!canvas.is_cached(LayerKey::Background));
    assert!(!canvas.is_cached(LayerKey::Terrain));
    assert_relative_eq!(canvas.menu().radius(), 50.0);

    canvas.compose(&mut dst, &DrawRequest::Full);
    assert_eq!(dst.dimensions(), (300, 200));
}

#[test]
fn test_look_at_moves_view_and_invalidates() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    canvas.compose(&mut frame(), &DrawRequest::Full);

    canvas.look_at(30.0, -20.0, 2.0);
    assert_relative_eq!(canvas.view().pan().x, 30.0);
    assert_relative_eq!(canvas.view().pan().y, -20.0);
    assert_relative_eq!(canvas.view().scale(), 2.0);
    assert!(!canvas.is_cached(LayerKey::Terrain));
    assert!(!canvas.is_cached(LayerKey::Items));
    assert!(canvas.is_cached(LayerKey::Background));

    canvas.look_at(0.0, 0.0, 50.0);
    assert_relative_eq!(canvas.view().scale(), 10.0);
}

#[test]
fn test_drag_moves_terrain_on_screen() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    press(&mut canvas, 1, 100.0, 50.0);
    motion(&mut canvas, 120.0, 60.0);
    assert_relative_eq!(canvas.view().pan().x, 20.0);
    assert_relative_eq!(canvas.view().pan().y, 10.0);
    // Small moves keep the pre-rendered terrain.
    let mut dst = frame();
    canvas.compose(&mut dst, &DrawRequest::Full);
    motion(&mut canvas, 130.0, 60.0);
    assert!(canvas.is_cached(LayerKey::Terrain));
    release(&mut canvas, 1, 130.0, 60.0);
    assert!(!canvas.is_cached(LayerKey::Terrain));
    assert!(canvas.mode().is_idle());
}

// ---------------------------------------------------------------------------
// Menu and path
// ---------------------------------------------------------------------------

#[test]
fn test_menu_and_path_callbacks() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    let log = record_dispatch(&mut canvas);

    // 200x100 screen: menu radius 25, icons 20 px from the center.
    press(&mut canvas, 3, 100.0, 50.0);
    motion(&mut canvas, 120.0, 50.0);
    assert_eq!(canvas.active_sector(), Some(3));
    release(&mut canvas, 3, 120.0, 50.0);
    assert_eq!(*log.actions.borrow(), vec![3]);

    press(&mut canvas, 2, 10.0, 10.0);
    motion(&mut canvas, 20.0, 20.0);
    release(&mut canvas, 2, 30.0, 30.0);
    assert_eq!(
        *log.paths.borrow(),
        vec![vec![(10.0, 10.0), (20.0, 20.0), (30.0, 30.0)]]
    );
}

#[test]
fn test_menu_hover_renders_only_changed_sector() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    let mut dst = frame();
    press(&mut canvas, 3, 100.0, 50.0);
    let report = canvas.compose(&mut dst, &DrawRequest::Full);
    assert_eq!(report.layers.last(), Some(&LayerKey::Menu));
    for index in 0..12 {
        assert!(canvas.is_cached(LayerKey::MenuSector {
            index,
            active: false
        }));
    }
    let renders = canvas.layer_stats().renders;

    motion(&mut canvas, 120.0, 50.0);
    canvas.compose(&mut dst, &DrawRequest::Full);
    // The active icon for sector 3 and the reassembled ring.
    assert_eq!(canvas.layer_stats().renders, renders + 2);
    assert!(canvas.is_cached(LayerKey::MenuSector {
        index: 3,
        active: true
    }));
    assert!(canvas.is_cached(LayerKey::MenuSector {
        index: 3,
        active: false
    }));
}

#[test]
fn test_path_layer_drawn_while_following() {
    let (mut canvas, _provider, _clock) = make_canvas(200, 100);
    let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
    let sink = Rc::clone(&seen);
    canvas.on_path_complete(move |points| sink.borrow_mut().push(points.len()));

    press(&mut canvas, 2, 10.0, 10.0);
    motion(&mut canvas, 60.0, 10.0);
    let mut dst = frame();
    let report = canvas.compose(&mut dst, &DrawRequest::Full);
    assert_eq!(report.layers.last(), Some(&LayerKey::Path));
    assert_eq!(dst.get_pixel(30, 10).0, [0, 255, 0, 255]);

    release(&mut canvas, 2, 60.0, 10.0);
    assert!(!canvas.is_cached(LayerKey::Path));
    assert_eq!(*seen.borrow(), vec![3]);
}
