//! Dark neon palette and its mapping onto egui visuals

use egui::{Color32, Visuals};

use crate::color::to_color32;

pub mod palette {
    pub const BG_DARK: &str = "#0a0a0a";
    pub const BG_MEDIUM: &str = "#1a1a1a";
    pub const BG_LIGHT: &str = "#2a2a2a";
    pub const ACCENT_BLUE: &str = "#00f3ff";
    pub const ACCENT_PURPLE: &str = "#9d00ff";
    pub const ACCENT_GREEN: &str = "#00ff9d";
    pub const ACCENT_RED: &str = "#ff0066";
    pub const TEXT_PRIMARY: &str = "#ffffff";
    pub const TEXT_SECONDARY: &str = "#aaaaaa";
    pub const ROTOR: &str = "#1a2a3a";
}

/// Brightness added to a button's fill while hovered
pub const HOVER_LIGHTEN: i32 = 20;

/// Palette entry as an egui color (magenta marks a malformed entry)
pub fn color(hex: &str) -> Color32 {
    to_color32(hex).unwrap_or(Color32::from_rgb(255, 0, 255))
}

/// Text color readable on a filled button of `fill`
pub fn text_on(fill: &str) -> Color32 {
    if fill == palette::ACCENT_BLUE || fill == palette::ACCENT_GREEN {
        Color32::BLACK
    } else {
        color(palette::TEXT_PRIMARY)
    }
}

pub fn visuals() -> Visuals {
    let mut visuals = Visuals::dark();
    visuals.panel_fill = color(palette::BG_DARK);
    visuals.window_fill = color(palette::BG_MEDIUM);
    visuals.extreme_bg_color = color(palette::BG_LIGHT);
    visuals.faint_bg_color = color(palette::BG_MEDIUM);
    visuals.selection.bg_fill = color(palette::ACCENT_BLUE);
    visuals.widgets.inactive.bg_fill = color(palette::BG_LIGHT);
    visuals.widgets.inactive.weak_bg_fill = color(palette::BG_LIGHT);
    visuals.widgets.hovered.weak_bg_fill = color(&crate::color::lighten(palette::BG_LIGHT, HOVER_LIGHTEN));
    visuals.slider_trailing_fill = true;
    visuals
}

pub fn apply(ctx: &egui::Context) {
    ctx.set_visuals(visuals());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_entries_parse() {
        for hex in [
            palette::BG_DARK,
            palette::BG_MEDIUM,
            palette::BG_LIGHT,
            palette::ACCENT_BLUE,
            palette::ACCENT_PURPLE,
            palette::ACCENT_GREEN,
            palette::ACCENT_RED,
            palette::TEXT_PRIMARY,
            palette::TEXT_SECONDARY,
            palette::ROTOR,
        ] {
            assert!(to_color32(hex).is_some(), "{hex} should parse");
        }
    }

    #[test]
    fn test_dark_text_on_bright_accents() {
        assert_eq!(text_on(palette::ACCENT_GREEN), Color32::BLACK);
        assert_eq!(text_on(palette::ACCENT_RED), Color32::WHITE);
    }
}
