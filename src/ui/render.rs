use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::Model;

use super::keypad::keypad_cells;
use super::style::Palette;
use super::{DISPLAY_HEIGHT, overlays, status};

/// Display block, keypad, status bar.
pub fn split_frame(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(DISPLAY_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let palette = Palette::for_mode(model.dark_mode);
    frame.render_widget(Block::default().style(palette.base()), area);

    let [display_area, keypad_area, status_area] = split_frame(area);
    render_display(model, &palette, frame, display_area);
    render_keypad(model, &palette, frame, keypad_area);
    status::render_status_bar(model, frame, status_area);

    if model.guide_visible {
        overlays::render_guide_overlay(model, frame, area);
    }
}

/// The two display lines: the expression trail and the value (or error).
pub fn display_lines(model: &Model, palette: &Palette) -> [Line<'static>; 2] {
    let buffer = &model.buffer;
    let trail = Line::styled(buffer.trail().unwrap_or_default().to_string(), palette.trail());
    let value = match buffer.error() {
        Some(err) => Line::styled(format!("Error: {err}"), palette.error()),
        None if buffer.raw().is_empty() => Line::styled("0", palette.trail()),
        None => Line::styled(buffer.display(), palette.display()),
    };
    [trail.right_aligned(), value.right_aligned()]
}

fn render_display(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border())
        .style(palette.base());
    let paragraph = Paragraph::new(Vec::from(display_lines(model, palette))).block(block);
    frame.render_widget(paragraph, area);
}

fn render_keypad(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    for (cell, button) in keypad_cells(area, model.buffer.options()) {
        let style = palette.button(button);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border())
            .style(palette.base());
        let inner = block.inner(cell);
        frame.render_widget(block, cell);

        // Vertically center the label in whatever height the cell got.
        let label_area = Rect {
            y: inner.y + inner.height.saturating_sub(1) / 2,
            height: inner.height.min(1),
            ..inner
        };
        let label = Paragraph::new(Line::styled(button.label(), style)).centered();
        frame.render_widget(label, label_area);
    }
}
