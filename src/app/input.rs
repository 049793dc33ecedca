use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::app::{App, Message, Model};
use crate::ui::Button;

impl App {
    pub(super) fn handle_event(&self, event: Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) => self.handle_key(key, model),
            Event::Mouse(mouse) => self.handle_mouse(mouse, model),
            Event::Resize(w, h) => Some(Message::Resize(w, h)),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(&self, mouse: MouseEvent, model: &Model) -> Option<Message> {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return None;
        }
        let area = screen_area(model);

        if model.guide_visible {
            let popup = crate::ui::guide_rect(model, area);
            if popup.contains(Position::new(mouse.column, mouse.row)) {
                return None;
            }
            return Some(Message::HideGuide);
        }

        crate::ui::button_at(area, model.buffer.options(), mouse.column, mouse.row)
            .map(button_message)
    }

    pub(super) fn handle_key(&self, key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl && matches!(key.code, KeyCode::Char('c')) {
            return Some(Message::Quit);
        }

        if model.guide_visible {
            return Some(Message::HideGuide);
        }

        if alt {
            return match key.code {
                KeyCode::Char('c' | 'C') => Some(Message::Clear),
                KeyCode::Char('n' | 'N') => Some(Message::ToggleSign),
                _ => dismiss_error(model),
            };
        }
        if ctrl {
            return dismiss_error(model);
        }

        let options = model.buffer.options();
        match key.code {
            KeyCode::Char(c @ '0'..='9') => Some(Message::AppendDigit(c)),
            KeyCode::Char(c @ ('+' | '-' | '*' | '/')) => Some(Message::AppendOperator(c)),
            KeyCode::Char(c @ ('(' | ')')) if options.supports_parentheses => {
                Some(Message::AppendOperator(c))
            }
            KeyCode::Char('.' | ',') => Some(Message::AppendDecimal),
            KeyCode::Char('=') | KeyCode::Enter => Some(Message::Evaluate),
            KeyCode::Backspace => Some(Message::DeleteLast),
            KeyCode::Char('%') if options.supports_percentage => Some(Message::Percentage),
            KeyCode::Esc | KeyCode::Delete => Some(Message::Clear),
            KeyCode::Char('n') => Some(Message::ToggleSign),

            // Memory
            KeyCode::Char('m') if options.supports_memory => Some(Message::MemoryAdd),
            KeyCode::Char('M') if options.supports_memory => Some(Message::MemorySubtract),
            KeyCode::Char('r') if options.supports_memory => Some(Message::MemoryRecall),
            KeyCode::Char('R') if options.supports_memory => Some(Message::MemoryClear),

            // View
            KeyCode::Char('t') => Some(Message::ToggleTheme),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleGuide),

            // Quit
            KeyCode::Char('q') => Some(Message::Quit),

            _ => dismiss_error(model),
        }
    }
}

pub(super) const fn button_message(button: Button) -> Message {
    match button {
        Button::Digit(c) => Message::AppendDigit(c),
        Button::Operator(c) => Message::AppendOperator(c),
        Button::Decimal => Message::AppendDecimal,
        Button::Equals => Message::Evaluate,
        Button::Clear => Message::Clear,
        Button::Backspace => Message::DeleteLast,
        Button::Percent => Message::Percentage,
        Button::ToggleSign => Message::ToggleSign,
        Button::MemoryClear => Message::MemoryClear,
        Button::MemoryRecall => Message::MemoryRecall,
        Button::MemoryAdd => Message::MemoryAdd,
        Button::MemorySubtract => Message::MemorySubtract,
    }
}

/// Any other keystroke still clears a showing error.
fn dismiss_error(model: &Model) -> Option<Message> {
    model.buffer.is_errored().then_some(Message::DismissError)
}

const fn screen_area(model: &Model) -> Rect {
    Rect::new(0, 0, model.terminal_size.0, model.terminal_size.1)
}
