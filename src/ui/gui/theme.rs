//! Catppuccin-inspired theme for the DikeFinder GUI.
//!
//! Dark chrome around the map and table, plus a Hangul-capable font so the
//! Korean column headers and place names render.

use eframe::egui::{self, Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Vec2};

/// Catppuccin Mocha palette (the subset the viewer uses)
pub mod catppuccin {
    use super::Color32;

    pub const BASE: Color32 = Color32::from_rgb(30, 30, 46); // #1e1e2e
    pub const MANTLE: Color32 = Color32::from_rgb(24, 24, 37); // #181825
    pub const CRUST: Color32 = Color32::from_rgb(17, 17, 27); // #11111b
    pub const SURFACE0: Color32 = Color32::from_rgb(49, 50, 68); // #313244
    pub const SURFACE1: Color32 = Color32::from_rgb(69, 71, 90); // #45475a
    pub const SURFACE2: Color32 = Color32::from_rgb(88, 91, 112); // #585b70

    pub const TEXT: Color32 = Color32::from_rgb(205, 214, 244); // #cdd6f4
    pub const SUBTEXT1: Color32 = Color32::from_rgb(186, 194, 222); // #bac2de
    pub const SUBTEXT0: Color32 = Color32::from_rgb(166, 173, 200); // #a6adc8
    pub const OVERLAY0: Color32 = Color32::from_rgb(108, 112, 134); // #6c7086

    pub const RED: Color32 = Color32::from_rgb(243, 139, 168); // #f38ba8
    pub const YELLOW: Color32 = Color32::from_rgb(249, 226, 175); // #f9e2af
    pub const GREEN: Color32 = Color32::from_rgb(166, 227, 161); // #a6e3a1
    pub const SAPPHIRE: Color32 = Color32::from_rgb(116, 199, 236); // #74c7ec
    pub const BLUE: Color32 = Color32::from_rgb(137, 180, 250); // #89b4fa
    pub const LAVENDER: Color32 = Color32::from_rgb(180, 190, 254); // #b4befe
}

/// Map overlay colors
pub mod map {
    use super::Color32;

    /// Viewport background when no image is loaded
    pub const PLACEHOLDER: Color32 = Color32::from_rgb(240, 240, 240);
    pub const PRIMARY_FILL: Color32 = Color32::from_rgba_premultiplied(128, 0, 0, 128);
    pub const PRIMARY_STROKE: Color32 = Color32::from_rgb(255, 0, 0);
    pub const SECONDARY_FILL: Color32 = Color32::from_rgba_premultiplied(40, 0, 0, 40);
    pub const SECONDARY_STROKE: Color32 = Color32::WHITE;
    pub const MARKER_TEXT: Color32 = Color32::WHITE;
    pub const MEASURE: Color32 = Color32::from_rgb(255, 200, 0);
}

/// Apply Catppuccin theme to egui context
pub fn apply_catppuccin_theme(ctx: &egui::Context) {
    use catppuccin::*;

    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = Vec2::new(8.0, 4.0);
    style.spacing.button_padding = Vec2::new(8.0, 4.0);
    style.spacing.window_margin = egui::Margin::same(12.0);

    let small_rounding = Rounding::same(4.0);
    let mut visuals = egui::Visuals::dark();

    visuals.window_fill = BASE;
    visuals.window_stroke = Stroke::new(1.0, SURFACE0);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.panel_fill = BASE;

    visuals.widgets.noninteractive.bg_fill = SURFACE0;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT);
    visuals.widgets.noninteractive.rounding = small_rounding;

    visuals.widgets.inactive.bg_fill = SURFACE0;
    visuals.widgets.inactive.weak_bg_fill = SURFACE0;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, SUBTEXT1);
    visuals.widgets.inactive.rounding = small_rounding;

    visuals.widgets.hovered.bg_fill = SURFACE1;
    visuals.widgets.hovered.weak_bg_fill = SURFACE1;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, BLUE);
    visuals.widgets.hovered.rounding = small_rounding;

    visuals.widgets.active.bg_fill = SURFACE2;
    visuals.widgets.active.weak_bg_fill = SURFACE2;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, TEXT);
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, BLUE);
    visuals.widgets.active.rounding = small_rounding;

    // Selected table rows and checked filter buttons
    visuals.selection.bg_fill = BLUE.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, BLUE);

    visuals.hyperlink_color = SAPPHIRE;
    visuals.faint_bg_color = SURFACE0.linear_multiply(0.5);
    visuals.extreme_bg_color = CRUST;
    visuals.code_bg_color = MANTLE;
    visuals.warn_fg_color = YELLOW;
    visuals.error_fg_color = RED;
    visuals.striped = true;

    style.visuals = visuals;
    ctx.set_style(style);
}

/// Configure text sizes
pub fn configure_fonts(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}

/// Load a system font with Hangul glyphs, if one is installed
pub fn load_korean_font(ctx: &egui::Context) {
    #[cfg(target_os = "windows")]
    let font_paths = [
        "C:\\Windows\\Fonts\\malgun.ttf",
        "C:\\Windows\\Fonts\\gulim.ttc",
    ];

    #[cfg(target_os = "macos")]
    let font_paths = [
        "/System/Library/Fonts/AppleSDGothicNeo.ttc",
        "/Library/Fonts/NanumGothic.ttf",
    ];

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let font_paths = [
        "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    for path in font_paths {
        let Ok(font_data) = std::fs::read(path) else {
            continue;
        };
        let mut fonts = egui::FontDefinitions::default();
        fonts
            .font_data
            .insert("korean".to_owned(), egui::FontData::from_owned(font_data));

        // Fallback after the default fonts for both families
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            fonts.families.entry(family).or_default().push("korean".to_owned());
        }
        ctx.set_fonts(fonts);
        log::info!("Loaded Korean font from {}", path);
        return;
    }
    log::warn!("No Korean font found; Hangul text may not render");
}

/// Initialize theme and fonts
pub fn init(ctx: &egui::Context) {
    apply_catppuccin_theme(ctx);
    configure_fonts(ctx);
    load_korean_font(ctx);
}
