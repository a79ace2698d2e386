use eframe::egui;
use std::time::Instant;

use super::slide::{draw_placeholder, draw_slide, fit_16_9};
use super::{DeckViewApp, NAV_KEYS};
use crate::nav::{NextPane, NotesPane, PresenterController, PresenterInput, SyncStatus};
use crate::theme::Theme;

const PRESENTER_SIZE: [f32; 2] = [1280.0, 800.0];

fn sync_label(status: SyncStatus) -> &'static str {
    match status {
        SyncStatus::Awaiting => "Waiting for audience view",
        SyncStatus::Synced => "Synced",
    }
}

fn presenter_inputs(ctx: &egui::Context) -> Vec<PresenterInput> {
    ctx.input(|i| {
        let mut inputs: Vec<PresenterInput> = NAV_KEYS
            .iter()
            .filter(|(key, _)| i.key_pressed(*key))
            .map(|(_, nav)| PresenterInput::Key(*nav))
            .collect();
        if i.key_pressed(egui::Key::T) {
            inputs.push(PresenterInput::ToggleTimer { at: Instant::now() });
        }
        if i.key_pressed(egui::Key::R) {
            inputs.push(PresenterInput::ResetTimer);
        }
        inputs
    })
}

impl DeckViewApp {
    /// Presenter window, drawn as a second native viewport.
    pub(super) fn show_presenter(&mut self, ctx: &egui::Context) {
        let viewport_id = egui::ViewportId::from_hash_of("deckview-presenter");
        let builder = egui::ViewportBuilder::default()
            .with_title(format!("{} - presenter", self.title))
            .with_inner_size(PRESENTER_SIZE);

        let closed = ctx.show_viewport_immediate(viewport_id, builder, |ctx, _class| {
            if ctx.input(|i| i.viewport().close_requested()) {
                return true;
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Q)) {
                ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Close);
            }

            let Some(presenter) = &mut self.presenter else {
                return true;
            };
            presenter.pump_sync();
            for input in presenter_inputs(ctx) {
                presenter.handle(input);
            }
            draw_presenter(ctx, presenter, self.loaded.as_ref(), &self.theme);
            false
        });

        if closed {
            log::info!("presenter view closed");
            self.presenter = None;
            self.presenter_wanted = false;
        }
    }
}

fn draw_presenter(
    ctx: &egui::Context,
    presenter: &mut PresenterController,
    loaded: Option<&super::LoadedDeck>,
    theme: &Theme,
) {
    let now = Instant::now();
    let panel_frame = egui::Frame::new().fill(theme.panel).inner_margin(8.0);

    egui::TopBottomPanel::top("presenter-top")
        .frame(panel_frame)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(presenter.timer().display(now))
                        .monospace()
                        .size(28.0)
                        .color(theme.foreground),
                );
                let label = if presenter.timer().is_running() {
                    "Pause"
                } else {
                    "Start"
                };
                if ui.button(label).clicked() {
                    presenter.handle(PresenterInput::ToggleTimer { at: now });
                }
                if ui.button("Reset").clicked() {
                    presenter.handle(PresenterInput::ResetTimer);
                }
                ui.separator();
                let status_color = match presenter.sync_status() {
                    SyncStatus::Synced => theme.accent,
                    SyncStatus::Awaiting => theme.muted,
                };
                ui.colored_label(status_color, sync_label(presenter.sync_status()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(presenter.page_label())
                            .monospace()
                            .size(20.0)
                            .color(theme.foreground),
                    );
                });
            });
        });

    egui::TopBottomPanel::bottom("presenter-bottom")
        .frame(panel_frame)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let state = presenter.state();
                let (is_first, is_last) = (state.is_first(), state.is_last());
                if ui
                    .add_enabled(!is_first, egui::Button::new("|<"))
                    .on_hover_text("First slide")
                    .clicked()
                {
                    presenter.handle(PresenterInput::First);
                }
                if ui
                    .add_enabled(!is_first, egui::Button::new("< Prev"))
                    .clicked()
                {
                    presenter.handle(PresenterInput::Prev);
                }
                if ui
                    .add_enabled(!is_last, egui::Button::new("Next >"))
                    .clicked()
                {
                    presenter.handle(PresenterInput::Next);
                }
                if ui
                    .add_enabled(!is_last, egui::Button::new(">|"))
                    .on_hover_text("Last slide")
                    .clicked()
                {
                    presenter.handle(PresenterInput::Last);
                }
                ui.separator();
                ui.label(
                    egui::RichText::new(
                        "Left/Right/Space: navigate  Home/End: jump  T: timer  R: reset  Q: quit",
                    )
                    .color(Theme::with_opacity(theme.foreground, 0.5)),
                );
            });
        });

    egui::CentralPanel::default()
        .frame(egui::Frame::new().fill(theme.background).inner_margin(12.0))
        .show(ctx, |ui| {
            let Some(loaded) = loaded else {
                draw_placeholder(ui.painter(), ui.max_rect(), "Cannot load deck", theme);
                return;
            };
            let area = ui.max_rect();
            let gap = 12.0;
            let current_width = area.width() * 0.6;
            let current_area = egui::Rect::from_min_size(
                area.min,
                egui::vec2(current_width, area.height()),
            );
            let side = egui::Rect::from_min_max(
                egui::pos2(current_area.right() + gap, area.top()),
                area.max,
            );
            let next_area = egui::Rect::from_min_size(
                side.min,
                egui::vec2(side.width(), side.width() * 9.0 / 16.0),
            );
            let notes_area = egui::Rect::from_min_max(
                egui::pos2(side.left(), next_area.bottom() + gap),
                side.max,
            );

            let index = presenter.active_index();
            let current = fit_16_9(current_area);
            draw_slide(ui.painter(), current, &loaded.texts[index], theme);
            ui.painter().rect_stroke(
                current,
                0.0,
                egui::Stroke::new(2.0, theme.accent),
                egui::StrokeKind::Outside,
            );

            match presenter.next_pane() {
                NextPane::Slide(next) => {
                    draw_slide(ui.painter(), next_area, &loaded.texts[next], theme);
                }
                NextPane::LastSlide => {
                    draw_placeholder(ui.painter(), next_area, "End of deck", theme);
                }
            }

            ui.scope_builder(egui::UiBuilder::new().max_rect(notes_area), |ui| {
                ui.label(
                    egui::RichText::new("Notes")
                        .strong()
                        .color(theme.heading_color),
                );
                egui::ScrollArea::vertical()
                    .id_salt(("presenter-notes", index))
                    .show(ui, |ui| match presenter.notes_pane(&loaded.deck.notes) {
                        NotesPane::Text(notes) => {
                            ui.label(
                                egui::RichText::new(notes)
                                    .size(theme.notes_size)
                                    .color(theme.foreground),
                            );
                        }
                        NotesPane::Empty => {
                            ui.label(
                                egui::RichText::new("No notes for this slide")
                                    .italics()
                                    .color(theme.muted),
                            );
                        }
                    });
            });
        });
}
