use std::path::Path;

use chronomap_core::canvas::MapCanvas;
use chronomap_core::render::FrameReport;
use console::Style;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    error: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            error: Style::new().red(),
            path: Style::new().underlined(),
        }
    }
}

fn year_label(epoch: i32) -> String {
    match epoch {
        0 => "present".to_string(),
        e if e < 0 => format!("{} BP", -e),
        e => format!("{e} AP"),
    }
}

pub fn print_epochs(dir: &Path, epochs: &[i32], resolved: Option<(u32, i32)>) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Biome epochs"));
    println!("  {:<14}{}", s.label.apply_to("Folder"), s.path.apply_to(dir.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Count"),
        s.value.apply_to(epochs.len())
    );
    println!();
    for &epoch in epochs {
        println!("    {:>8}  {}", epoch, s.label.apply_to(year_label(epoch)));
    }

    if let Some((years_bp, epoch)) = resolved {
        println!();
        println!(
            "  {:<14}{} -> {}",
            s.label.apply_to("Resolved"),
            s.value.apply_to(format!("{years_bp} years BP")),
            s.value.apply_to(epoch)
        );
    }
    println!();
}

pub fn print_render_summary(canvas: &MapCanvas, report: &FrameReport, output: &Path) {
    let s = Styles::new();
    let view = canvas.view();
    let (w, h) = view.screen_size();
    let pan = view.pan();
    let visible = view.visible();

    println!();
    println!("  {}", s.title.apply_to("Chronomap Render"));
    println!("  {:<14}{}", s.label.apply_to("Output"), s.path.apply_to(output.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!("{w}x{h}"))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Pan"),
        s.value.apply_to(format!("{:.1}, {:.1}", pan.x, pan.y))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(format!("{:.3}", view.scale()))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Visible"),
        s.value.apply_to(format!(
            "[{:.0}, {:.0}] x [{:.0}, {:.0}]",
            visible.left, visible.right, visible.top, visible.bottom
        ))
    );
    let epoch = canvas
        .epoch()
        .map(year_label)
        .unwrap_or_else(|| "none".to_string());
    println!("  {:<14}{}", s.label.apply_to("Epoch"), s.value.apply_to(epoch));

    let tiles = canvas.tile_stats();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Tiles"),
        s.value.apply_to(format!("{} loaded", tiles.renders))
    );
    let layers: Vec<_> = report.layers.iter().map(|l| l.name()).collect();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Layers"),
        s.value.apply_to(layers.join(", "))
    );
    for e in &report.errors {
        println!(
            "  {:<14}{}",
            s.error.apply_to(e.layer.name()),
            s.error.apply_to(&e.error)
        );
    }
    println!();
}
