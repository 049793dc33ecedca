use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

use super::style::Palette;

const GUIDE_WIDTH: u16 = 46;

/// Key / description pairs for the guide, filtered to the active options.
pub fn guide_entries(model: &Model) -> Vec<(&'static str, &'static str)> {
    let options = model.buffer.options();
    let mut entries = vec![
        ("0-9", "Digits"),
        ("+ - * /", "Operators"),
        (". ,", "Decimal point"),
        ("Enter =", "Calculate"),
        ("Backspace", "Delete last character"),
    ];
    if options.supports_percentage {
        entries.push(("%", "Percentage"));
    }
    entries.push(("Alt+C Esc Del", "Clear"));
    entries.push(("Alt+N n", "Toggle sign"));
    if options.supports_parentheses {
        entries.push(("( )", "Parentheses"));
    }
    if options.supports_memory {
        entries.push(("m / M", "Memory add / subtract"));
        entries.push(("r / R", "Memory recall / clear"));
    }
    entries.push(("t", "Toggle dark mode"));
    entries.push(("? F1", "Toggle this guide"));
    entries.push(("q Ctrl+C", "Quit"));
    entries
}

fn guide_lines(model: &Model, palette: &Palette) -> Vec<Line<'static>> {
    let key_style = palette.section();
    let dim_style = Style::default().fg(palette.dim);
    let mut lines: Vec<Line> = guide_entries(model)
        .into_iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:<15}"), key_style),
                Span::raw(action),
            ])
        })
        .collect();

    lines.push(Line::raw(""));
    if let Some(path) = &model.config_global_path {
        lines.push(Line::styled(format!("Config: {}", path.display()), dim_style));
    }
    if let Some(path) = &model.config_local_path {
        lines.push(Line::styled(format!("Local:  {}", path.display()), dim_style));
    }
    lines.push(Line::styled("any key or click outside closes", dim_style));
    lines
}

/// Where the keyboard guide popup sits within `area`.
pub fn guide_rect(model: &Model, area: Rect) -> Rect {
    let palette = Palette::for_mode(model.dark_mode);
    let rows = u16::try_from(guide_lines(model, &palette).len()).unwrap_or(u16::MAX);
    centered_popup_rect(GUIDE_WIDTH, rows.saturating_add(2), area)
}

pub fn render_guide_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let palette = Palette::for_mode(model.dark_mode);
    let popup = guide_rect(model, area);

    let block = Block::default()
        .title("Keyboard")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(palette.popup());
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(guide_lines(model, &palette)).block(block),
        popup,
    );
}

pub fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
