use crate::app::ChronomapApp;

pub fn show(ctx: &egui::Context, app: &mut ChronomapApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area, fixed height for 4 lines.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        // Status line
        ui.horizontal(|ui| {
            let Some(canvas) = app.canvas.as_ref() else {
                ui.label("No map");
                return;
            };
            let view = canvas.view();
            let (w, h) = view.screen_size();
            let pan = view.pan();
            ui.label(format!("{w}x{h}"));
            ui.separator();
            ui.label(format!("Scale: {:.2}", view.scale()));
            ui.separator();
            ui.label(format!("Pan: {:.0}, {:.0}", pan.x, pan.y));
            ui.separator();
            ui.label(format!("Mode: {}", canvas.mode().name()));
            ui.separator();
            let layers = canvas.layer_stats();
            let tiles = canvas.tile_stats();
            ui.label(format!(
                "Layers: {} renders, {} hits | Tiles: {} loads, {} hits",
                layers.renders, layers.hits, tiles.renders, tiles.hits
            ));
        });

        ui.add_space(2.0);
    });
}
