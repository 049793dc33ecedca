//! Theming and color definitions.
//!
//! Two palettes, picked by the model's dark-mode flag. Dark uses the
//! terminal's ANSI colors; light uses indexed colors that stay readable on a
//! pale background.

use ratatui::style::{Color, Modifier, Style};

use super::keypad::Button;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub border: Color,
    pub digit: Color,
    pub operator: Color,
    pub function: Color,
    pub equals_bg: Color,
    pub equals_fg: Color,
    pub error: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub popup_bg: Color,
    pub section: Color,
}

impl Palette {
    pub const fn dark() -> Self {
        Self {
            background: Color::Reset,
            text: Color::White,
            dim: Color::Indexed(245),
            border: Color::Indexed(240),
            digit: Color::White,
            operator: Color::Yellow,
            function: Color::Cyan,
            equals_bg: Color::Yellow,
            equals_fg: Color::Black,
            error: Color::LightRed,
            status_bg: Color::DarkGray,
            status_fg: Color::White,
            popup_bg: Color::Black,
            section: Color::Yellow,
        }
    }

    pub const fn light() -> Self {
        Self {
            background: Color::Indexed(255),
            text: Color::Indexed(235),
            dim: Color::Indexed(244),
            border: Color::Indexed(250),
            digit: Color::Indexed(235),
            operator: Color::Indexed(130),
            function: Color::Indexed(24),
            equals_bg: Color::Indexed(24),
            equals_fg: Color::White,
            error: Color::Indexed(124),
            status_bg: Color::Indexed(252),
            status_fg: Color::Indexed(235),
            popup_bg: Color::Indexed(254),
            section: Color::Indexed(130),
        }
    }

    pub const fn for_mode(dark_mode: bool) -> Self {
        if dark_mode { Self::dark() } else { Self::light() }
    }

    pub fn base(&self) -> Style {
        Style::default().bg(self.background).fg(self.text)
    }

    pub fn trail(&self) -> Style {
        self.base().fg(self.dim)
    }

    pub fn display(&self) -> Style {
        self.base().add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        self.base().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        self.base().fg(self.border)
    }

    pub fn status(&self) -> Style {
        Style::default().bg(self.status_bg).fg(self.status_fg)
    }

    pub fn popup(&self) -> Style {
        Style::default().bg(self.popup_bg).fg(self.text)
    }

    pub fn section(&self) -> Style {
        Style::default().fg(self.section).add_modifier(Modifier::BOLD)
    }

    /// Label style for a keypad button.
    pub fn button(&self, button: Button) -> Style {
        match button {
            Button::Digit(_) | Button::Decimal => self.base().fg(self.digit),
            Button::Operator(_) => self.base().fg(self.operator).add_modifier(Modifier::BOLD),
            Button::Equals => Style::default()
                .bg(self.equals_bg)
                .fg(self.equals_fg)
                .add_modifier(Modifier::BOLD),
            Button::Clear => self.base().fg(self.error).add_modifier(Modifier::BOLD),
            Button::Backspace
            | Button::Percent
            | Button::ToggleSign
            | Button::MemoryClear
            | Button::MemoryRecall
            | Button::MemoryAdd
            | Button::MemorySubtract => self.base().fg(self.function),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}
