use eframe::egui;

use super::slide::{draw_placeholder, draw_slide, fit_16_9};
use super::{DeckViewApp, Toast};
use crate::nav::MenuAction;
use crate::theme::Theme;

fn grid_columns(count: usize) -> usize {
    match count {
        0..=4 => 2,
        5..=9 => 3,
        10..=16 => 4,
        17..=25 => 5,
        _ => 6,
    }
}

/// Area of overview thumbnail `index`. The grid always fits the window, so
/// large decks get smaller cells instead of a scrollbar.
fn grid_cell_rect(index: usize, count: usize, rect: egui::Rect) -> egui::Rect {
    let cols = grid_columns(count);
    let rows = count.div_ceil(cols).max(1);
    let scale = (rect.width() / 1920.0).min(rect.height() / 1080.0);

    let padding = 24.0 * scale;
    let gap = 12.0 * scale;
    let grid_top = rect.top() + padding + 40.0 * scale;
    let grid_width = rect.width() - padding * 2.0;
    let grid_height = rect.bottom() - grid_top - padding;

    let cell_width = (grid_width - gap * (cols as f32 - 1.0)) / cols as f32;
    let natural_height = cell_width * 9.0 / 16.0;
    let fit_height = (grid_height - gap * (rows as f32 - 1.0)) / rows as f32;
    let cell_height = natural_height.min(fit_height).max(0.0);

    let col = index % cols;
    let row = index / cols;
    let x = rect.left() + padding + col as f32 * (cell_width + gap);
    let y = grid_top + row as f32 * (cell_height + gap);
    egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(cell_width, cell_height))
}

/// Thumbnail under `pos`, if any.
pub(super) fn overview_hit(count: usize, rect: egui::Rect, pos: egui::Pos2) -> Option<usize> {
    (0..count).find(|&i| grid_cell_rect(i, count, rect).contains(pos))
}

impl DeckViewApp {
    pub(super) fn draw_audience(&mut self, ctx: &egui::Context) {
        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.view_rect = rect;
                ui.painter().rect_filled(rect, 0.0, bg);

                let (Some(loaded), Some(audience)) = (&self.loaded, &self.audience) else {
                    draw_cannot_load(ui.painter(), rect, &self.load_error, &self.theme);
                    return;
                };
                let state = audience.state();
                let index = state.active_index();
                let scale = (rect.width() / 1920.0).min(rect.height() / 1080.0);

                draw_slide(ui.painter(), fit_16_9(rect), &loaded.texts[index], &self.theme);

                if state.is_multi() {
                    draw_progress(ui.painter(), rect, index, state.slide_count(), &self.theme);
                }
                let hover = ui.ctx().input(|i| i.pointer.hover_pos());
                if state.is_multi()
                    && !state.is_overview_open()
                    && hover.is_some_and(|pos| in_bottom_band(rect, pos, self.settings.edge_zone))
                {
                    draw_page_indicator(
                        ui.painter(),
                        rect,
                        index,
                        state.slide_count(),
                        scale,
                        &self.theme,
                    );
                }

                if state.is_overview_open() {
                    self.draw_overview(ui, rect, index, scale);
                }

                if let Some(toast) = &self.toast {
                    draw_toast(ui.painter(), rect, toast, scale, &self.theme);
                    ctx.request_repaint();
                }
            });
    }

    fn draw_overview(&self, ui: &egui::Ui, rect: egui::Rect, active: usize, scale: f32) {
        let Some(loaded) = &self.loaded else { return };
        let count = loaded.texts.len();
        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, Theme::with_opacity(self.theme.background, 0.96));

        let padding = 24.0 * scale;
        let title_color = Theme::with_opacity(self.theme.heading_color, 0.9);
        let hover = ui
            .ctx()
            .input(|i| i.pointer.hover_pos())
            .and_then(|pos| overview_hit(count, rect, pos));
        let heading = match hover.map(|i| (i, loaded.texts[i].label())) {
            Some((i, label)) if !label.is_empty() => {
                format!("{}  ({count} slides)  -  {}: {label}", self.title, i + 1)
            }
            _ => format!("{}  ({count} slides)", self.title),
        };
        let title = painter.layout_no_wrap(
            heading,
            egui::FontId::proportional(24.0 * scale),
            title_color,
        );
        painter.galley(
            egui::pos2(rect.left() + padding, rect.top() + padding),
            title,
            title_color,
        );

        for (i, text) in loaded.texts.iter().enumerate() {
            let cell = grid_cell_rect(i, count, rect);
            draw_slide(painter, cell, text, &self.theme);
            draw_badge(painter, cell, i, scale, &self.theme);

            if hover == Some(i) && i != active {
                painter.rect_stroke(
                    cell.expand(2.0 * scale),
                    4.0 * scale,
                    egui::Stroke::new(2.0 * scale, Theme::with_opacity(self.theme.accent, 0.5)),
                    egui::StrokeKind::Outside,
                );
            }
            if i == active {
                painter.rect_stroke(
                    cell,
                    4.0 * scale,
                    egui::Stroke::new(3.0 * scale, self.theme.accent),
                    egui::StrokeKind::Outside,
                );
            }
        }

        let hint = "Click: open slide  |  G / Esc: close";
        let hint_color = Theme::with_opacity(self.theme.foreground, 0.4);
        let hint_galley = painter.layout_no_wrap(
            hint.to_string(),
            egui::FontId::proportional(14.0 * scale),
            hint_color,
        );
        let hint_pos = egui::pos2(
            rect.center().x - hint_galley.rect.width() / 2.0,
            rect.bottom() - 30.0 * scale,
        );
        painter.galley(hint_pos, hint_galley, hint_color);
    }

    /// Right-click menu. Returns the actions picked this frame.
    pub(super) fn draw_context_menu(&mut self, ctx: &egui::Context) -> Vec<MenuAction> {
        let mut actions = Vec::new();
        let Some(audience) = &self.audience else {
            return actions;
        };
        let menu = audience.state().context_menu();
        if !menu.visible {
            return actions;
        }
        let multi = audience.state().is_multi();
        let position = format!(
            "Slide {} / {}",
            audience.state().active_index() + 1,
            audience.state().slide_count()
        );
        let is_first = audience.state().is_first();
        let is_last = audience.state().is_last();
        let goto_text = &mut self.goto_text;

        egui::Area::new(egui::Id::new("deckview-context-menu"))
            .fixed_pos(egui::pos2(menu.x, menu.y))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(180.0);
                    ui.label(egui::RichText::new(position).strong());
                    ui.separator();
                    if ui
                        .add_enabled(multi && !is_first, egui::Button::new("Previous slide"))
                        .clicked()
                    {
                        actions.push(MenuAction::Prev);
                    }
                    if ui
                        .add_enabled(multi && !is_last, egui::Button::new("Next slide"))
                        .clicked()
                    {
                        actions.push(MenuAction::Next);
                    }
                    if ui
                        .add_enabled(multi && !is_first, egui::Button::new("First slide"))
                        .clicked()
                    {
                        actions.push(MenuAction::First);
                    }
                    if ui
                        .add_enabled(multi && !is_last, egui::Button::new("Last slide"))
                        .clicked()
                    {
                        actions.push(MenuAction::Last);
                    }
                    ui.separator();

                    ui.add_enabled_ui(multi, |ui| {
                        ui.horizontal(|ui| {
                            let field = ui.add(
                                egui::TextEdit::singleline(goto_text)
                                    .hint_text("Slide #")
                                    .desired_width(70.0),
                            );
                            let submitted =
                                field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                            if ui.button("Go").clicked() || submitted {
                                actions.push(MenuAction::GoTo(std::mem::take(goto_text)));
                            }
                        });
                        if ui.button("Overview").clicked() {
                            actions.push(MenuAction::OpenOverview);
                        }
                    });
                    ui.separator();

                    if ui.button("Toggle fullscreen").clicked() {
                        actions.push(MenuAction::ToggleFullscreen);
                    }
                    if ui.button("Copy link to slide").clicked() {
                        actions.push(MenuAction::CopyLink);
                    }
                    if ui.button("Home").clicked() {
                        actions.push(MenuAction::GoHome);
                    }
                });
            });
        actions
    }
}

/// The page counter only shows while the pointer rests in the bottom band.
fn in_bottom_band(rect: egui::Rect, pos: egui::Pos2, zone: f32) -> bool {
    rect.contains(pos) && pos.y >= rect.bottom() - rect.height() * zone
}

fn draw_cannot_load(painter: &egui::Painter, rect: egui::Rect, error: &str, theme: &Theme) {
    let message = if error.is_empty() {
        "Cannot load deck".to_string()
    } else {
        format!("Cannot load deck\n\n{error}")
    };
    draw_placeholder(painter, fit_16_9(rect), &message, theme);
}

fn draw_progress(
    painter: &egui::Painter,
    rect: egui::Rect,
    index: usize,
    count: usize,
    theme: &Theme,
) {
    let height = (rect.height() * 0.006).max(3.0);
    let fraction = (index + 1) as f32 / count as f32;
    let track = egui::Rect::from_min_max(
        egui::pos2(rect.left(), rect.bottom() - height),
        rect.right_bottom(),
    );
    painter.rect_filled(track, 0.0, Theme::with_opacity(theme.muted, 0.2));
    let mut bar = track;
    bar.set_width(track.width() * fraction);
    painter.rect_filled(bar, 0.0, theme.accent);
}

fn draw_page_indicator(
    painter: &egui::Painter,
    rect: egui::Rect,
    index: usize,
    count: usize,
    scale: f32,
    theme: &Theme,
) {
    let color = Theme::with_opacity(theme.foreground, 0.3);
    let galley = painter.layout_no_wrap(
        format!("{} / {count}", index + 1),
        egui::FontId::monospace((14.0 * scale).max(10.0)),
        color,
    );
    let pos = egui::pos2(
        rect.right() - galley.rect.width() - 16.0 * scale,
        rect.bottom() - 30.0 * scale - galley.rect.height() / 2.0,
    );
    painter.galley(pos, galley, color);
}

fn draw_badge(painter: &egui::Painter, cell: egui::Rect, index: usize, scale: f32, theme: &Theme) {
    let bg = Theme::with_opacity(theme.panel, 0.7);
    let color = Theme::with_opacity(theme.foreground, 0.9);
    let galley = painter.layout_no_wrap(
        format!(" {} ", index + 1),
        egui::FontId::monospace((12.0 * scale).max(9.0)),
        color,
    );
    let badge = egui::Rect::from_min_size(
        cell.min + egui::vec2(4.0 * scale, 4.0 * scale),
        galley.rect.size() + egui::vec2(4.0 * scale, 2.0 * scale),
    );
    painter.rect_filled(badge, 3.0 * scale, bg);
    painter.galley(badge.min + egui::vec2(2.0 * scale, 1.0 * scale), galley, color);
}

fn draw_toast(painter: &egui::Painter, rect: egui::Rect, toast: &Toast, scale: f32, theme: &Theme) {
    let opacity = toast.opacity();
    if opacity <= 0.0 {
        return;
    }
    let color = Theme::with_opacity(theme.foreground, opacity * 0.9);
    let bg = Theme::with_opacity(theme.panel, opacity * 0.9);
    let galley = painter.layout_no_wrap(
        toast.message.clone(),
        egui::FontId::proportional((20.0 * scale).max(12.0)),
        color,
    );
    let padding = 16.0 * scale;
    let toast_rect = egui::Rect::from_min_size(
        egui::pos2(
            rect.center().x - galley.rect.width() / 2.0 - padding,
            rect.bottom() - 80.0 * scale,
        ),
        egui::vec2(
            galley.rect.width() + padding * 2.0,
            galley.rect.height() + padding * 2.0,
        ),
    );
    painter.rect_filled(toast_rect, 8.0 * scale, bg);
    painter.galley(
        egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding),
        galley,
        color,
    );
}
