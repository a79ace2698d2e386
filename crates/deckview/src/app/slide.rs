use eframe::egui;

use crate::deck::markup::SlideText;
use crate::theme::Theme;

/// Paint one slide into `rect`, scaled to its height. Content that does not
/// fit is clipped.
pub fn draw_slide(painter: &egui::Painter, rect: egui::Rect, text: &SlideText, theme: &Theme) {
    let painter = painter.with_clip_rect(rect);
    painter.rect_filled(rect, 0.0, theme.background);

    let (title_size, body_size) = theme.scaled(rect.height());
    let margin = rect.width().min(rect.height()) * 0.07;
    let content = rect.shrink(margin);
    let mut y = content.top();

    if let Some(title) = &text.title {
        let galley = painter.layout(
            title.clone(),
            egui::FontId::proportional(title_size),
            theme.heading_color,
            content.width(),
        );
        let height = galley.rect.height();
        painter.galley(egui::pos2(content.left(), y), galley, theme.heading_color);
        y += height + body_size * 0.8;
    }

    if !text.body.is_empty() {
        let monospace = text.title.is_none();
        let font = if monospace {
            egui::FontId::monospace(body_size * 0.7)
        } else {
            egui::FontId::proportional(body_size)
        };
        let galley = painter.layout(text.body.clone(), font, theme.foreground, content.width());
        painter.galley(egui::pos2(content.left(), y), galley, theme.foreground);
    }
}

/// Centered placeholder text in a pane.
pub fn draw_placeholder(painter: &egui::Painter, rect: egui::Rect, message: &str, theme: &Theme) {
    painter.rect_filled(rect, 4.0, theme.panel);
    let color = Theme::with_opacity(theme.foreground, 0.5);
    let galley = painter.layout_no_wrap(
        message.to_string(),
        egui::FontId::proportional((rect.height() * 0.08).clamp(12.0, 32.0)),
        color,
    );
    let pos = rect.center() - galley.rect.size() / 2.0;
    painter.galley(pos, galley, color);
}

/// Largest 16:9 rect centered in `area`.
pub fn fit_16_9(area: egui::Rect) -> egui::Rect {
    let width = area.width().min(area.height() * 16.0 / 9.0);
    egui::Rect::from_center_size(area.center(), egui::vec2(width, width * 9.0 / 16.0))
}
