use anyhow::Context;
use chronomap_core::config::CanvasConfig;

use crate::app::ChronomapApp;
use crate::messages::AppMessage;
use crate::panels::controls::pick_tile_folder;

pub fn show(ctx: &egui::Context, app: &mut ChronomapApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui
                    .add(egui::Button::new("Choose Tile Folder...").shortcut_text(ctx.format_shortcut(&open_shortcut)))
                    .clicked()
                {
                    ui.close();
                    pick_tile_folder(app);
                }

                ui.separator();

                if ui.button("Import Config...").clicked() {
                    ui.close();
                    import_config(app);
                }

                if ui.button("Export Config...").clicked() {
                    ui.close();
                    export_config(app);
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Reset View").clicked() {
                    ui.close();
                    app.reset_view();
                }
                if ui.button("Clear Markers").clicked() {
                    ui.close();
                    app.clear_markers();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.ui_state.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            pick_tile_folder(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn import_config(app: &mut ChronomapApp) {
    let msg_tx = app.msg_tx.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .pick_file()
        else {
            return;
        };
        let msg = match CanvasConfig::load(&path)
            .with_context(|| format!("Failed to import config from {}", path.display()))
        {
            Ok(config) => AppMessage::ConfigImported { path, config },
            Err(e) => AppMessage::Error {
                message: format!("{e:#}"),
            },
        };
        let _ = msg_tx.send(msg);
    });
}

fn export_config(app: &mut ChronomapApp) {
    let msg_tx = app.msg_tx.clone();
    let config = app.config.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name("chronomap.toml")
            .save_file()
        else {
            return;
        };
        let msg = match config
            .save(&path)
            .with_context(|| format!("Failed to export config to {}", path.display()))
        {
            Ok(()) => AppMessage::ConfigExported { path },
            Err(e) => AppMessage::Error {
                message: format!("{e:#}"),
            },
        };
        let _ = msg_tx.send(msg);
    });
}
