use chronomap_core::consts::YEARS_SLIDER_MAX;
use chronomap_core::tiles::years_bp_from_slider;

use crate::app::ChronomapApp;
use crate::messages::AppMessage;
use crate::panels::section_header;

const LEFT_PANEL_WIDTH: f32 = 240.0;
const MAX_ANIMATION_HZ: f64 = 30.0;

pub fn show(ctx: &egui::Context, app: &mut ChronomapApp) {
    egui::SidePanel::left("controls")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                tiles_section(ui, app);
                ui.separator();
                time_section(ui, app);
                ui.separator();
                view_section(ui, app);
                ui.separator();
                markers_section(ui, app);
            });
        });
}

pub(crate) fn pick_tile_folder(app: &ChronomapApp) {
    let msg_tx = app.msg_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new().pick_folder() {
            let _ = msg_tx.send(AppMessage::TileFolderPicked { path });
        }
    });
}

fn tiles_section(ui: &mut egui::Ui, app: &mut ChronomapApp) {
    let status = app
        .canvas
        .as_ref()
        .map(|c| format!("{} epochs", c.epochs().len()));
    section_header(ui, "Tiles", status.as_deref());
    ui.add_space(4.0);

    if ui.button("Choose folder...").clicked() {
        pick_tile_folder(app);
    }

    if let Some(ref dir) = app.ui_state.tile_dir {
        ui.label(
            dir.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| dir.display().to_string()),
        );
    }
}

fn time_section(ui: &mut egui::Ui, app: &mut ChronomapApp) {
    let status = app
        .canvas
        .as_ref()
        .and_then(|c| c.epoch())
        .map(|e| format!("epoch {e}"));
    section_header(ui, "Time", status.as_deref());
    ui.add_space(4.0);

    let mut exponent = app.ui_state.years_exponent;
    let response = ui.add(
        egui::Slider::new(&mut exponent, 0.0..=YEARS_SLIDER_MAX)
            .show_value(false)
            .text("Age"),
    );
    if response.changed() {
        app.ui_state.years_exponent = exponent;
        app.set_years(years_bp_from_slider(exponent));
    }

    ui.horizontal(|ui| {
        ui.label(format!("{} years ago", app.ui_state.years_bp));
        if ui.small_button("Present").clicked() {
            app.ui_state.years_exponent = 0.0;
            app.set_years(0);
        }
    });
}

fn view_section(ui: &mut egui::Ui, app: &mut ChronomapApp) {
    section_header(ui, "View", None);
    ui.add_space(4.0);

    let Some(canvas) = app.canvas.as_ref() else {
        ui.small("No map open");
        return;
    };
    let (min, max) = canvas.view().scale_limits();
    ui.small(format!(
        "Scale {:.2} (limits {min:.2} to {max:.2})",
        canvas.view().scale()
    ));

    if ui.button("Reset view").clicked() {
        app.reset_view();
    }

    ui.add_space(4.0);
    let mut frequency = app.config.animation_frequency;
    let response = ui.add(
        egui::Slider::new(&mut frequency, 0.0..=MAX_ANIMATION_HZ)
            .text("Animation Hz")
            .fixed_decimals(0),
    );
    if response.changed() {
        app.set_animation_frequency(frequency);
    }
}

fn markers_section(ui: &mut egui::Ui, app: &mut ChronomapApp) {
    let status = format!("{}", app.ui_state.markers.len());
    section_header(ui, "Markers", Some(&status));
    ui.add_space(4.0);

    ui.small("Double-click or double-tap the map and pick a sector to drop a marker.");
    ui.add_enabled_ui(!app.ui_state.markers.is_empty(), |ui| {
        if ui.button("Clear markers").clicked() {
            app.clear_markers();
        }
    });
}
