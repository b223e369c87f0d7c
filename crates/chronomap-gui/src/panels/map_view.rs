use std::time::Instant;

use chronomap_core::canvas::MapCanvas;
use chronomap_core::render::DrawRequest;
use chronomap_core::view::ScreenRect;

use crate::app::ChronomapApp;
use crate::convert::frame_to_color_image;
use crate::input::{CanvasInput, Translator};
use crate::state::{MapViewState, UIState};

pub fn show(ctx: &egui::Context, app: &mut ChronomapApp) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            paint_background(ui, rect);

            let Some(canvas) = app.canvas.as_mut() else {
                show_placeholder(ui);
                return;
            };
            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

            let pixels_per_point = ctx.pixels_per_point();
            let physical = rect.size() * pixels_per_point;
            canvas.resize(physical.x.round() as u32, physical.y.round() as u32);

            feed_input(ui, canvas, &mut app.view, rect, pixels_per_point);
            if response.hovered() && canvas.mode().is_idle() {
                ctx.set_cursor_icon(egui::CursorIcon::Grab);
            }

            let damage = tick_animation(ctx, canvas, &mut app.view);
            compose(ctx, canvas, &mut app.view, &mut app.ui_state, damage);

            if let Some(texture) = app.view.texture.as_ref() {
                draw_image(ui, texture.id(), rect);
            }
        });
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn feed_input(
    ui: &egui::Ui,
    canvas: &mut MapCanvas,
    view: &mut MapViewState,
    rect: egui::Rect,
    pixels_per_point: f32,
) {
    let now = Instant::now();
    let (events, touching, scroll_y, hover) = ui.input(|i| {
        (
            i.events.clone(),
            i.any_touches(),
            i.smooth_scroll_delta.y,
            i.pointer.hover_pos(),
        )
    });
    let translator = Translator {
        rect,
        pixels_per_point,
        touching,
    };

    let mut inputs = Vec::new();
    for event in &events {
        inputs.extend(translator.translate(event, &mut view.clicks, now));
    }
    if let Some(hover) = hover {
        inputs.extend(translator.scroll(scroll_y, hover));
    }

    for input in inputs {
        match input {
            CanvasInput::Pointer(e) => canvas.handle_pointer(&e),
            CanvasInput::Touch(e) => canvas.handle_touch(&e),
            CanvasInput::Scroll(e) => canvas.handle_scroll(&e),
        }
    }
}

/// Advance the animation when its interval has elapsed. Returns the damage
/// of a tick, or `None` if no tick happened.
fn tick_animation(
    ctx: &egui::Context,
    canvas: &mut MapCanvas,
    view: &mut MapViewState,
) -> Option<Vec<ScreenRect>> {
    let interval = canvas.animation_interval()?;
    ctx.request_repaint_after(interval);
    if view.last_tick.elapsed() < interval {
        return None;
    }
    view.last_tick = Instant::now();
    Some(canvas.animation_tick())
}

fn compose(
    ctx: &egui::Context,
    canvas: &mut MapCanvas,
    view: &mut MapViewState,
    ui_state: &mut UIState,
    damage: Option<Vec<ScreenRect>>,
) {
    let redraw = canvas.take_redraw_request();
    let Some(request) = draw_request(damage, redraw, view.texture.is_some()) else {
        return;
    };

    let report = canvas.compose(&mut view.frame, &request);
    let error = report.errors.first().map(|e| format!("{} layer: {}", e.layer, e.error));
    // A persisting failure is logged once.
    if error != ui_state.last_frame_error {
        if let Some(msg) = &error {
            ui_state.add_log(format!("ERROR: {msg}"));
        }
    }
    ui_state.last_frame_error = error;

    let image = frame_to_color_image(&view.frame);
    match view.texture.as_mut() {
        Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
        None => {
            view.texture = Some(ctx.load_texture("map", image, egui::TextureOptions::NEAREST));
        }
    }
}

/// What to repaint this frame, or `None` to keep the uploaded texture.
/// A tick whose objects are all off screen repaints nothing.
fn draw_request(
    damage: Option<Vec<ScreenRect>>,
    redraw: bool,
    has_texture: bool,
) -> Option<DrawRequest> {
    match damage {
        Some(rects) if !rects.is_empty() => Some(DrawRequest::Damage(rects)),
        _ if redraw || !has_texture => Some(DrawRequest::Full),
        _ => None,
    }
}

fn draw_image(ui: &egui::Ui, texture_id: egui::TextureId, rect: egui::Rect) {
    ui.painter().image(
        texture_id,
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Choose a tile folder to begin")
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}
