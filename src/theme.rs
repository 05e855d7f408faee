use egui::{Color32, CornerRadius, Stroke};

pub struct AppTheme {
    pub background: Color32,
    pub card_background: Color32,
    pub footer_background: Color32,
    pub text: Color32,
    pub secondary_text: Color32,
    pub highlight: Color32, // Reddit orange
    pub highlight_muted: Color32,
    pub separator: Color32,
    pub error_background: Color32,
    pub error_foreground: Color32,
    pub notice_background: Color32,
    pub notice_foreground: Color32,
    pub button_foreground: Color32,
    pub button_hover_background: Color32,
}

impl AppTheme {
    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(18, 18, 18),
            card_background: Color32::from_rgb(30, 30, 30),
            footer_background: Color32::from_rgb(24, 24, 24),
            text: Color32::from_rgb(240, 240, 240),
            secondary_text: Color32::from_rgb(180, 180, 180),
            highlight: Color32::from_rgb(255, 69, 0),
            highlight_muted: Color32::from_rgb(153, 45, 8),
            separator: Color32::from_rgb(60, 60, 60),
            error_background: Color32::from_rgb(74, 22, 22),
            error_foreground: Color32::from_rgb(252, 165, 165),
            notice_background: Color32::from_rgb(23, 37, 84),
            notice_foreground: Color32::from_rgb(147, 197, 253),
            button_foreground: Color32::from_rgb(255, 255, 255),
            button_hover_background: Color32::from_rgb(234, 88, 12),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(249, 250, 251),
            card_background: Color32::from_rgb(255, 255, 255),
            footer_background: Color32::from_rgb(243, 244, 246),
            text: Color32::from_rgb(31, 41, 55),
            secondary_text: Color32::from_rgb(75, 85, 99),
            highlight: Color32::from_rgb(234, 88, 12),
            highlight_muted: Color32::from_rgb(154, 52, 18),
            separator: Color32::from_rgb(229, 231, 235),
            error_background: Color32::from_rgb(254, 226, 226),
            error_foreground: Color32::from_rgb(185, 28, 28),
            notice_background: Color32::from_rgb(219, 234, 254),
            notice_foreground: Color32::from_rgb(29, 78, 216),
            button_foreground: Color32::from_rgb(255, 255, 255),
            button_hover_background: Color32::from_rgb(194, 65, 12),
        }
    }

    pub fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.card_background;
        style.visuals.window_stroke = Stroke::new(1.0, self.separator);
        style.visuals.widgets.noninteractive.bg_fill = self.card_background;
        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text);
        style.visuals.hyperlink_color = self.text;

        // Refresh and theme buttons are orange pills
        style.visuals.widgets.inactive.weak_bg_fill = self.highlight;
        style.visuals.widgets.inactive.bg_fill = self.highlight;
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.hovered.weak_bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.active.weak_bg_fill = self.highlight_muted;
        style.visuals.widgets.active.bg_fill = self.highlight_muted;
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.button_foreground);

        style.visuals.selection.bg_fill = self.highlight;
        style.visuals.selection.stroke = Stroke::new(1.0, self.highlight);

        style.visuals.window_corner_radius = CornerRadius::same(12);
        style.visuals.widgets.inactive.corner_radius = CornerRadius::same(16);
        style.visuals.widgets.hovered.corner_radius = CornerRadius::same(16);
        style.visuals.widgets.active.corner_radius = CornerRadius::same(16);

        ctx.set_style(style);
    }
}
