mod app;
mod beacon;
mod convert;
mod input;
mod messages;
mod panels;
mod state;

use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Optional tile folder to open right away.
    let tile_dir = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Chronomap"),
        ..Default::default()
    };

    eframe::run_native(
        "Chronomap",
        options,
        Box::new(|_cc| Ok(Box::new(app::ChronomapApp::new(tile_dir)))),
    )
}
