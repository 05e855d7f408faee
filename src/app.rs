use std::time::{Duration, Instant};

use chrono::Utc;
use eframe::egui;
use egui::{CornerRadius, RichText, ScrollArea, Stroke, Ui};

use crate::controller::RefreshController;
use crate::theme::AppTheme;
use crate::view::{Banner, DashboardView, EMPTY_TEXT, LOADING_TEXT, TrendCard, render};

pub const APP_TITLE: &str = "Reddit Trends Dashboard";

// How often to wake up while a fetch is outstanding
const IN_FLIGHT_REPAINT: Duration = Duration::from_millis(100);

const CARD_MIN_WIDTH: f32 = 360.0;
const MAX_COLUMNS: usize = 3;

pub struct TrendsDashboardApp {
    controller: RefreshController,
    theme: AppTheme,
    is_dark_mode: bool,
}

impl TrendsDashboardApp {
    /// Wrap a controller and kick off the first fetch and the poll timer.
    pub fn new(mut controller: RefreshController) -> Self {
        controller.start(Instant::now());
        Self {
            controller,
            theme: AppTheme::dark(),
            is_dark_mode: true,
        }
    }

    fn toggle_theme(&mut self) {
        self.is_dark_mode = !self.is_dark_mode;
        self.theme = if self.is_dark_mode {
            AppTheme::dark()
        } else {
            AppTheme::light()
        };
    }

    fn open_link(&self, url: &str) {
        if url.is_empty() {
            return;
        }
        if let Err(e) = open::that(url) {
            tracing::warn!(
                event = "dashboard.link.open_failed",
                url = %url,
                error = %e,
                "Failed to open URL"
            );
        }
    }

    /// Returns (refresh requested, theme toggle requested).
    fn process_keyboard_shortcuts(&self, ctx: &egui::Context) -> (bool, bool) {
        ctx.input(|i| {
            let refresh = i.key_pressed(egui::Key::F5)
                || (i.modifiers.command && i.key_pressed(egui::Key::R));
            let theme = i.modifiers.command && i.key_pressed(egui::Key::T);
            (refresh, theme)
        })
    }

    fn render_header(&self, ui: &mut Ui, view: &DashboardView) -> (bool, bool) {
        let mut refresh_clicked = false;
        let mut theme_clicked = false;

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.heading(
                RichText::new(APP_TITLE)
                    .color(self.theme.highlight)
                    .size(28.0)
                    .strong(),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let refresh_btn = ui.add_enabled(
                    view.refresh.enabled,
                    egui::Button::new(
                        RichText::new(view.refresh.label)
                            .color(self.theme.button_foreground)
                            .size(16.0),
                    )
                    .min_size(egui::vec2(120.0, 34.0))
                    .corner_radius(CornerRadius::same(17)),
                );
                if refresh_btn.hovered() && view.refresh.enabled {
                    ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                }
                refresh_clicked = refresh_btn.clicked();

                ui.add_space(8.0);

                // Sun for switching to light, moon for switching to dark
                let theme_icon = if self.is_dark_mode { "☀" } else { "☾" };
                let theme_btn = ui
                    .add(
                        egui::Button::new(
                            RichText::new(theme_icon)
                                .color(self.theme.button_foreground)
                                .size(18.0),
                        )
                        .min_size(egui::vec2(34.0, 34.0))
                        .corner_radius(CornerRadius::same(17)),
                    )
                    .on_hover_text(if self.is_dark_mode {
                        "Switch to Light Mode"
                    } else {
                        "Switch to Dark Mode"
                    });
                theme_clicked = theme_btn.clicked();
            });
        });

        if let Some(last_updated) = &view.last_updated {
            ui.label(
                RichText::new(format!("Last updated: {}", last_updated))
                    .color(self.theme.highlight_muted)
                    .size(14.0),
            );
        }
        ui.add_space(12.0);

        (refresh_clicked, theme_clicked)
    }

    fn render_banner(&self, ui: &mut Ui, banner: &Banner) {
        match banner {
            Banner::Error(message) => {
                self.render_callout(
                    ui,
                    message,
                    self.theme.error_background,
                    self.theme.error_foreground,
                );
            }
            Banner::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(48.0);
                    ui.add(egui::Spinner::new().size(48.0).color(self.theme.highlight));
                    ui.add_space(16.0);
                    ui.label(RichText::new(LOADING_TEXT).color(self.theme.secondary_text));
                });
            }
            Banner::Empty => {
                self.render_callout(
                    ui,
                    EMPTY_TEXT,
                    self.theme.notice_background,
                    self.theme.notice_foreground,
                );
            }
        }
    }

    fn render_callout(&self, ui: &mut Ui, text: &str, fill: egui::Color32, color: egui::Color32) {
        egui::Frame::new()
            .fill(fill)
            .stroke(Stroke::new(1.0, color))
            .corner_radius(CornerRadius::same(4))
            .inner_margin(16.0)
            .outer_margin(egui::vec2(6.0, 6.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(text).color(color).size(15.0));
            });
        ui.add_space(12.0);
    }

    /// Paint one card. Returns the URL if its title was clicked.
    fn render_card(&self, ui: &mut Ui, card: &TrendCard) -> Option<String> {
        let mut clicked_url = None;

        egui::Frame::new()
            .fill(self.theme.card_background)
            .corner_radius(CornerRadius::same(12))
            .stroke(Stroke::new(1.0, self.theme.separator))
            .inner_margin(16.0)
            .outer_margin(egui::vec2(6.0, 6.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());

                let title = ui.add(
                    egui::Label::new(
                        RichText::new(&card.title)
                            .color(self.theme.text)
                            .size(18.0)
                            .strong(),
                    )
                    .sense(egui::Sense::click())
                    .wrap(),
                );
                if title.hovered() {
                    ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                }
                if title.clicked() {
                    clicked_url = Some(card.url.clone());
                }
                title.on_hover_text(card.url.as_str());

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(&card.subreddit_label)
                            .color(self.theme.secondary_text)
                            .size(14.0)
                            .strong(),
                    );
                    if let Some(age) = &card.age {
                        ui.label(
                            RichText::new(format!("· {}", age))
                                .color(self.theme.secondary_text)
                                .size(14.0),
                        );
                    }
                });

                ui.add_space(8.0);
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!("▲ {}", card.score))
                            .color(self.theme.highlight)
                            .size(15.0),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("💬 {}", card.comments))
                                .color(self.theme.text)
                                .size(15.0),
                        );
                    });
                });
            });

        clicked_url
    }

    /// Lay cards out in up to three columns, keeping received order row by row.
    fn render_cards(&self, ui: &mut Ui, cards: &[TrendCard]) -> Option<String> {
        let columns = ((ui.available_width() / CARD_MIN_WIDTH).floor() as usize).clamp(1, MAX_COLUMNS);
        let mut clicked_url = None;

        for row in cards.chunks(columns) {
            ui.columns(columns, |cols| {
                for (col, card) in cols.iter_mut().zip(row) {
                    if let Some(url) = self.render_card(col, card) {
                        clicked_url = Some(url);
                    }
                }
            });
        }

        clicked_url
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        if self.controller.in_flight() > 0 {
            ctx.request_repaint_after(IN_FLIGHT_REPAINT);
        } else if let Some(remaining) = self.controller.time_until_next_poll(Instant::now()) {
            ctx.request_repaint_after(remaining);
        }
    }
}

impl eframe::App for TrendsDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme.apply_to_ctx(ctx);

        // Fire the poll timer and pick up finished fetches
        self.controller.tick(Instant::now());

        let view = render(self.controller.state(), Utc::now());
        let (mut refresh_requested, mut theme_requested) = self.process_keyboard_shortcuts(ctx);
        let mut clicked_url = None;

        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::new()
                    .fill(self.theme.card_background)
                    .inner_margin(egui::vec2(24.0, 0.0)),
            )
            .show(ctx, |ui| {
                let (refresh, theme) = self.render_header(ui, &view);
                refresh_requested |= refresh;
                theme_requested |= theme;
            });

        egui::TopBottomPanel::bottom("footer")
            .frame(
                egui::Frame::new()
                    .fill(self.theme.footer_background)
                    .inner_margin(egui::vec2(24.0, 12.0)),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(APP_TITLE).color(self.theme.secondary_text));
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                ui.add_space(16.0);
                if let Some(banner) = &view.banner {
                    self.render_banner(ui, banner);
                }
                if !view.cards.is_empty() {
                    clicked_url = self.render_cards(ui, &view.cards);
                }
                ui.add_space(16.0);
            });
        });

        if let Some(url) = clicked_url {
            self.open_link(&url);
        }

        // The control is disabled while loading; shortcuts follow the same rule
        if refresh_requested && view.refresh.enabled {
            self.controller.refresh_now();
            ctx.request_repaint();
        }

        if theme_requested {
            self.toggle_theme();
            ctx.request_repaint();
        }

        self.schedule_repaint(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.shutdown();
    }
}
