//! Map panel - the scanned map sheet with numbered markers.
//!
//! Left side of the split view. Wheel zooms around the cursor, dragging pans.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use crate::data::Marker;
use crate::geodesy::measure;
use super::super::state::{AppState, ViewRequest};
use super::super::theme::{catppuccin, map as colors};
use super::super::viewport::{MapViewport, SELECT_SCALE};

/// Primary marker radius at 100%
const MARKER_RADIUS: f32 = 20.0;
/// Secondary markers are drawn smaller
const SECONDARY_RATIO: f32 = 0.6;

/// Render the map panel on the left side, resizable against the table.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let half = ctx.screen_rect().width() / 2.0;
    egui::SidePanel::left("map_panel")
        .resizable(true)
        .default_width(half)
        .min_width(200.0)
        .show(ctx, |ui| {
            render_controls(ui, state);
            ui.separator();
            render_canvas(ui, state);
        });
}

fn render_controls(ui: &mut egui::Ui, state: &mut AppState) {
    let has_image = state.map.has_image();
    let map = &mut state.map;
    ui.horizontal(|ui| {
        let button = |ui: &mut egui::Ui, text: &str, hint: &str| {
            ui.add_enabled(has_image, egui::Button::new(text))
                .on_hover_text(hint)
                .clicked()
        };
        if button(ui, "−", "Zoom Out") {
            map.viewport.zoom_out();
        }
        ui.add_sized([45.0, 18.0], egui::Label::new(format!("{}%", map.viewport.zoom_percent())));
        if button(ui, "+", "Zoom In") {
            map.viewport.zoom_in();
        }
        if button(ui, "Reset", "Reset Zoom to 100%") {
            map.viewport.reset();
        }
        if button(ui, "Fit", "Fit Image to Window") {
            map.view_request = Some(ViewRequest::Fit);
        }
        if button(ui, "200%", "Zoom to 200%") {
            map.viewport.set_zoom(SELECT_SCALE);
        }
        ui.add(egui::Label::new(egui::RichText::new(&map.file_label).strong()).truncate(true));
    });
}

fn render_canvas(ui: &mut egui::Ui, state: &mut AppState) {
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    let painter = ui.painter_at(rect);
    let view = rect.size();

    let Some(texture) = state.map.texture.clone() else {
        painter.rect_filled(rect, 0.0, colors::PLACEHOLDER);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No image loaded",
            FontId::proportional(14.0),
            Color32::GRAY,
        );
        return;
    };
    let image = state.map.image_size;

    if let Some(request) = state.map.view_request.take() {
        apply_view_request(&mut state.map.viewport, request, view, image, state.map.markers.primary);
    }

    // Wheel zoom around the cursor, drag to pan
    if let Some(hover) = response.hover_pos() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            let cursor = Pos2::ZERO + (hover - rect.min);
            state.map.viewport.zoom_at(view, cursor, scroll > 0.0);
        }
    }
    if response.dragged() {
        state.map.viewport.pan(response.drag_delta());
    }

    let vp = state.map.viewport;
    let to_screen = |p: Pos2| rect.min + vp.image_to_view(view, image, p).to_vec2();

    let image_rect = Rect::from_min_size(to_screen(Pos2::ZERO), image * vp.scale);
    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    painter.image(texture.id(), image_rect, uv, Color32::WHITE);

    for marker in &state.map.markers.secondary {
        draw_marker(&painter, to_screen(marker_pos(marker)), marker.number, vp.scale, false);
    }
    if let Some(marker) = &state.map.markers.primary {
        draw_marker(&painter, to_screen(marker_pos(marker)), marker.number, vp.scale, true);
    }

    let hovered_image_px = response
        .hover_pos()
        .map(|p| vp.view_to_image(view, image, Pos2::ZERO + (p - rect.min)));

    if state.measure.active && response.clicked() {
        handle_measure_click(state, hovered_image_px);
    }
    draw_measure_overlay(&painter, rect, state, &to_screen);

    // Hover coordinates for georeferenced images
    if let (Some(t), Some(px)) = (state.map.transform, hovered_image_px) {
        let (lat, lng) = t.pixel_to_lat_lng(px.x as f64, px.y as f64);
        painter.text(
            rect.left_bottom() + Vec2::new(6.0, -6.0),
            Align2::LEFT_BOTTOM,
            format!("Lat {:.6}, Lng {:.6}", lat, lng),
            FontId::monospace(12.0),
            catppuccin::CRUST,
        );
    }
}

fn marker_pos(marker: &Marker) -> Pos2 {
    Pos2::new(marker.x, marker.y)
}

fn apply_view_request(
    viewport: &mut MapViewport,
    request: ViewRequest,
    view: Vec2,
    image: Vec2,
    primary: Option<Marker>,
) {
    match (request, primary) {
        (ViewRequest::CenterPrimary, Some(marker)) => {
            viewport.set_zoom(SELECT_SCALE);
            viewport.center_on(view, image, marker_pos(&marker));
        }
        _ => viewport.fit(view, image),
    }
}

fn draw_marker(painter: &egui::Painter, center: Pos2, number: usize, scale: f32, primary: bool) {
    let (radius, fill, stroke, font_size) = if primary {
        (
            (MARKER_RADIUS * scale).trunc(),
            colors::PRIMARY_FILL,
            Stroke::new(2.0, colors::PRIMARY_STROKE),
            (12.0 * scale).trunc().max(10.0),
        )
    } else {
        (
            (MARKER_RADIUS * SECONDARY_RATIO * scale).trunc(),
            colors::SECONDARY_FILL,
            Stroke::new(1.0, colors::SECONDARY_STROKE),
            (9.0 * scale).trunc().max(8.0),
        )
    };
    painter.circle(center, radius, fill, stroke);

    // Fake bold: draw twice, one pixel apart
    let text = number.to_string();
    let font = FontId::proportional(font_size);
    for dx in [0.0, 1.0] {
        painter.text(
            center + Vec2::new(dx, 0.0),
            Align2::CENTER_CENTER,
            &text,
            font.clone(),
            colors::MARKER_TEXT,
        );
    }
}

fn handle_measure_click(state: &mut AppState, clicked: Option<Pos2>) {
    let (Some(t), Some(px)) = (state.map.transform, clicked) else {
        state.set_status("This image is not georeferenced (needs 2+ rows with lat/lng)");
        return;
    };
    let point = t.pixel_to_lat_lng(px.x as f64, px.y as f64);
    match state.measure.first.take() {
        None => {
            state.measure.first = Some(point);
            state.measure.result = None;
            state.set_status("Click the second point");
        }
        Some(first) => {
            let m = measure(first.0, first.1, point.0, point.1);
            state.measure.result = Some(m);
            let line = format!("Distance: {:.2} m, Angle: {:.2}°", m.distance_m, m.angle_deg);
            state.log(format!("[*] {}", line));
            state.set_status(line);
        }
    }
}

fn draw_measure_overlay(
    painter: &egui::Painter,
    rect: Rect,
    state: &AppState,
    to_screen: &dyn Fn(Pos2) -> Pos2,
) {
    if !state.measure.active {
        return;
    }
    if let (Some(t), Some((lat, lng))) = (state.map.transform, state.measure.first) {
        if let Some((x, y)) = t.lat_lng_to_pixel(lat, lng) {
            let p = to_screen(Pos2::new(x as f32, y as f32));
            painter.circle_stroke(p, 5.0, Stroke::new(2.0, colors::MEASURE));
        }
    }
    let text = match state.measure.result {
        Some(m) => format!("{:.2} m  {:.2}°", m.distance_m, m.angle_deg),
        None if state.measure.first.is_some() => "Click the second point".to_string(),
        None => "Click the first point".to_string(),
    };
    painter.text(
        rect.left_top() + Vec2::new(6.0, 6.0),
        Align2::LEFT_TOP,
        text,
        FontId::proportional(14.0),
        colors::MEASURE,
    );
}
