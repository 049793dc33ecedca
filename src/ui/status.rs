use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

use super::style::Palette;

pub fn status_text(model: &Model) -> String {
    let options = model.buffer.options();
    let theme = if model.dark_mode { "dark" } else { "light" };

    let memory = if options.supports_memory {
        let value = model.memory.value().map_or_else(
            || "-".to_string(),
            |v| model.buffer.formatter().format_number(v),
        );
        format!("  M:{value}")
    } else {
        String::new()
    };

    let mut hints = String::new();
    if options.supports_parentheses {
        hints.push_str(" [()]");
    }
    if options.supports_percentage {
        hints.push_str(" [%]");
    }

    format!(" tallyterm  [{theme}]{memory}{hints}  ?:keys")
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    if model.active_toast().is_some() {
        render_toast_bar(model, frame, area);
        return;
    }
    let palette = Palette::for_mode(model.dark_mode);
    let bar = Paragraph::new(status_text(model)).style(palette.status());
    frame.render_widget(bar, area);
}

fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Palette::for_mode(model.dark_mode).status(),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
    };
    let toast = Paragraph::new(format!(" {prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
