#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use image::{Rgba, RgbaImage};

use chronomap_core::canvas::MapCanvas;
use chronomap_core::clock::ManualClock;
use chronomap_core::config::CanvasConfig;
use chronomap_core::error::{ChronoError, Result};
use chronomap_core::tiles::{Region, TileImage, TileProvider};

/// In-memory provider returning flat-colored tiles.
///
/// Counts fetches and can be switched to fail, so tests can observe
/// caching and error reporting.
#[derive(Clone)]
pub struct FakeProvider {
    pub epochs: Vec<i32>,
    pub fetches: Rc<Cell<usize>>,
    pub failing: Rc<Cell<bool>>,
    pub requested: Rc<RefCell<Vec<Region>>>,
}

impl FakeProvider {
    pub fn new(epochs: Vec<i32>) -> Self {
        Self {
            epochs,
            fetches: Rc::new(Cell::new(0)),
            failing: Rc::new(Cell::new(false)),
            requested: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl TileProvider for FakeProvider {
    fn fetch(&self, region: &Region) -> Result<TileImage> {
        self.fetches.set(self.fetches.get() + 1);
        self.requested.borrow_mut().push(*region);
        if self.failing.get() {
            return Err(ChronoError::Provider(format!("no data for {region}")));
        }
        let image = match region {
            Region::Topography { .. } => RgbaImage::from_pixel(4, 4, Rgba([200, 40, 40, 255])),
            Region::Biome { .. } => RgbaImage::from_pixel(8, 4, Rgba([0, 128, 0, 0])),
        };
        Ok(TileImage::new(image))
    }

    fn epochs(&self) -> Result<Vec<i32>> {
        Ok(self.epochs.clone())
    }
}

pub const EPOCHS: [i32; 4] = [-21000, -12000, -6000, 0];

/// Canvas of `width x height` with default config, a fake provider and a
/// manual clock.
pub fn make_canvas(width: u32, height: u32) -> (MapCanvas, FakeProvider, ManualClock) {
    make_canvas_with(CanvasConfig::default(), width, height)
}

pub fn make_canvas_with(
    config: CanvasConfig,
    width: u32,
    height: u32,
) -> (MapCanvas, FakeProvider, ManualClock) {
    let provider = FakeProvider::new(EPOCHS.to_vec());
    let clock = ManualClock::new();
    let mut canvas = MapCanvas::new(config, Box::new(provider.clone()), Box::new(clock.clone()));
    canvas.resize(width, height);
    (canvas, provider, clock)
}

/// Shared log of dispatched menu actions and completed paths.
#[derive(Clone, Default)]
pub struct Dispatched {
    pub actions: Rc<RefCell<Vec<usize>>>,
    pub paths: Rc<RefCell<Vec<Vec<(f64, f64)>>>>,
}

pub fn record_dispatch(canvas: &mut MapCanvas) -> Dispatched {
    let log = Dispatched::default();
    let actions = Rc::clone(&log.actions);
    canvas.on_menu_action(move |n| actions.borrow_mut().push(n));
    let paths = Rc::clone(&log.paths);
    canvas.on_path_complete(move |points| {
        paths
            .borrow_mut()
            .push(points.iter().map(|p| (p.x, p.y)).collect());
    });
    log
}
