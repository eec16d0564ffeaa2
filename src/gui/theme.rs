//! Material styling for egui, derived from a qt-material theme file.

use egui::{Color32, Rounding, Stroke, Visuals};
use qt_material::{Rgb, Theme};

/// Button fill (#009688).
pub const ACCENT: Color32 = Color32::from_rgb(0x00, 0x96, 0x88);

/// Window background.
pub const BACKGROUND: Color32 = Color32::from_rgb(0x12, 0x12, 0x12);

/// Translucent card fill.
pub const CARD: Color32 = Color32::from_rgba_premultiplied(13, 13, 13, 13);

pub const ROUNDING_CARD: f32 = 10.0;
pub const ROUNDING_BUTTON: f32 = 20.0;
pub const TITLE_SIZE: f32 = 24.0;
pub const HEADER_SIZE: f32 = 16.0;

pub fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Builds egui visuals from `theme`.
pub fn visuals(theme: &Theme) -> Visuals {
    let mut visuals = if theme.is_dark() {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    let primary = color(theme.primary());
    let primary_light = color(theme.primary_light());
    let surface = color(theme.secondary());
    let surface_light = color(theme.secondary_light());
    let surface_dark = color(theme.secondary_dark());
    let text = color(theme.secondary_text());

    visuals.override_text_color = Some(text);
    visuals.hyperlink_color = primary;
    visuals.window_fill = surface;
    visuals.extreme_bg_color = surface_dark;
    visuals.faint_bg_color = surface_dark;
    visuals.window_rounding = Rounding::same(ROUNDING_CARD);
    visuals.selection.bg_fill = primary.gamma_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, primary);

    visuals.widgets.inactive.weak_bg_fill = surface_light;
    visuals.widgets.inactive.bg_fill = surface_light;
    visuals.widgets.hovered.weak_bg_fill = primary.gamma_multiply(0.5);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, primary_light);
    visuals.widgets.active.weak_bg_fill = primary;
    visuals.widgets.active.bg_fill = primary;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, color(theme.primary_text()));
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, surface_light);

    if theme.is_dark() {
        visuals.panel_fill = BACKGROUND;
    } else {
        visuals.panel_fill = surface;
    }
    visuals
}

pub fn apply(ctx: &egui::Context, theme: &Theme) {
    log::debug!("Applying theme {}", theme.name());
    ctx.set_visuals(visuals(theme));
}
