use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;

use chronomap_core::canvas::MapCanvas;
use chronomap_core::clock::MonotonicClock;
use chronomap_core::config::CanvasConfig;
use chronomap_core::menu::RadialMenu;
use chronomap_core::render::MapItem;
use chronomap_core::tiles::DirectoryTileProvider;
use tracing::info;

use crate::beacon::{Beacon, BeaconTarget};
use crate::messages::{AppMessage, CanvasEvent};
use crate::panels;
use crate::state::{MapViewState, UIState};

/// Screen radius of a marker dropped from the radial menu.
const MARKER_RADIUS: f64 = 6.0;

pub struct ChronomapApp {
    pub msg_tx: mpsc::Sender<AppMessage>,
    pub msg_rx: mpsc::Receiver<AppMessage>,
    /// `None` until a tile folder has been chosen.
    pub canvas: Option<MapCanvas>,
    pub config: CanvasConfig,
    pub ui_state: UIState,
    pub view: MapViewState,
    events: Rc<RefCell<Vec<CanvasEvent>>>,
    beacon: BeaconTarget,
}

impl ChronomapApp {
    pub fn new(tile_dir: Option<PathBuf>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        let mut app = Self {
            msg_tx,
            msg_rx,
            canvas: None,
            config: CanvasConfig::default(),
            ui_state: UIState::default(),
            view: MapViewState::default(),
            events: Rc::new(RefCell::new(Vec::new())),
            beacon: BeaconTarget::default(),
        };
        if let Some(dir) = tile_dir {
            app.open_tiles(dir);
        }
        app
    }

    /// Build a fresh canvas over the tiles in `dir` with the current config.
    pub fn open_tiles(&mut self, dir: PathBuf) {
        let provider = DirectoryTileProvider::new(&dir);
        let mut canvas = MapCanvas::new(
            self.config.clone(),
            Box::new(provider),
            Box::new(MonotonicClock::new()),
        );

        let events = Rc::clone(&self.events);
        canvas.on_menu_action(move |index| {
            events.borrow_mut().push(CanvasEvent::MenuAction { index });
        });
        let events = Rc::clone(&self.events);
        canvas.on_path_complete(move |points| {
            events.borrow_mut().push(CanvasEvent::PathComplete {
                points: points.to_vec(),
            });
        });
        canvas.set_animator(Box::new(Beacon::new(Rc::clone(&self.beacon))));

        info!(dir = %dir.display(), epochs = canvas.epochs().len(), "tile folder opened");
        if canvas.epochs().is_empty() {
            self.ui_state
                .add_log(format!("No biome epochs in {}", dir.display()));
        } else {
            self.ui_state.add_log(format!(
                "Opened {} ({} epochs)",
                dir.display(),
                canvas.epochs().len()
            ));
            if let Err(e) = canvas.set_time_parameter(self.ui_state.years_bp) {
                self.ui_state.add_log(format!("ERROR: {e}"));
            }
        }
        canvas.set_items(self.ui_state.markers.clone());

        self.canvas = Some(canvas);
        self.ui_state.tile_dir = Some(dir);
        self.ui_state.last_frame_error = None;
        self.view = MapViewState::default();
    }

    pub fn set_years(&mut self, years_bp: u32) {
        self.ui_state.years_bp = years_bp;
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        match canvas.set_time_parameter(years_bp) {
            Ok(true) => {
                if let Some(epoch) = canvas.epoch() {
                    self.ui_state.add_log(format!("Showing biomes of epoch {epoch}"));
                }
            }
            Ok(false) => {}
            Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
        }
    }

    pub fn reset_view(&mut self) {
        let scale = self.config.initial_scale;
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.look_at(0.0, 0.0, scale);
        }
    }

    pub fn set_animation_frequency(&mut self, frequency: f64) {
        self.config.animation_frequency = frequency;
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.set_animation_frequency(frequency);
        }
    }

    pub fn clear_markers(&mut self) {
        self.ui_state.markers.clear();
        self.beacon.set(None);
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.set_items(Vec::new());
        }
    }

    /// Drain all pending dialog results.
    fn poll_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                AppMessage::TileFolderPicked { path } => self.open_tiles(path),
                AppMessage::ConfigImported { path, config } => {
                    self.config = config;
                    self.ui_state
                        .add_log(format!("Config imported from {}", path.display()));
                    self.ui_state.config_path = Some(path);
                    if let Some(dir) = self.ui_state.tile_dir.clone() {
                        self.open_tiles(dir);
                    }
                }
                AppMessage::ConfigExported { path } => {
                    self.ui_state
                        .add_log(format!("Config saved to {}", path.display()));
                }
                AppMessage::Error { message } => {
                    self.ui_state.add_log(format!("ERROR: {message}"));
                }
            }
        }
    }

    /// Act on gestures the canvas finished this frame. A menu action drops
    /// a marker in the sector's color where the menu was opened.
    fn handle_canvas_events(&mut self, ctx: &egui::Context) {
        let events: Vec<_> = self.events.borrow_mut().drain(..).collect();
        if events.is_empty() {
            return;
        }
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        for event in events {
            match event {
                CanvasEvent::MenuAction { index } => {
                    let anchor = canvas.gesture().primary;
                    let at = canvas.view().screen_to_terrain(anchor.x, anchor.y);
                    let c = RadialMenu::sector_color(index);
                    self.ui_state.markers.push(MapItem {
                        x: at.x,
                        y: at.y,
                        radius: MARKER_RADIUS,
                        color: [c[0], c[1], c[2], 255],
                    });
                    canvas.set_items(self.ui_state.markers.clone());
                    self.beacon.set(Some(at));
                    self.ui_state.add_log(format!(
                        "Menu action {index}: marker at ({:.0}, {:.0})",
                        at.x, at.y
                    ));
                }
                CanvasEvent::PathComplete { points } => {
                    let length: f64 = points
                        .windows(2)
                        .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
                        .sum();
                    self.ui_state.add_log(format!(
                        "Path of {} points, {:.0} px long",
                        points.len(),
                        length
                    ));
                }
            }
        }
        ctx.request_repaint();
    }
}

impl eframe::App for ChronomapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages();

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::map_view::show(ctx, self);

        self.handle_canvas_events(ctx);

        if self.ui_state.show_about {
            egui::Window::new("About Chronomap")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Chronomap");
                        ui.label("Interactive map through time");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.ui_state.show_about = false;
                        }
                    });
                });
        }
    }
}
