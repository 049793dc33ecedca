//! The on-screen keypad: which buttons exist for a given set of options,
//! where they sit, and which one a mouse click lands on.

use ratatui::layout::{Constraint, Layout, Position, Rect};

use crate::calc::CalcOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Digit(char),
    /// `+ - * /`, or a parenthesis in the parentheses variant.
    Operator(char),
    Decimal,
    Equals,
    Clear,
    Backspace,
    Percent,
    ToggleSign,
    MemoryClear,
    MemoryRecall,
    MemoryAdd,
    MemorySubtract,
}

impl Button {
    pub fn label(self) -> String {
        match self {
            Self::Digit(c) | Self::Operator(c) => c.to_string(),
            Self::Decimal => ".".to_string(),
            Self::Equals => "=".to_string(),
            Self::Clear => "C".to_string(),
            Self::Backspace => "←".to_string(),
            Self::Percent => "%".to_string(),
            Self::ToggleSign => "+/-".to_string(),
            Self::MemoryClear => "MC".to_string(),
            Self::MemoryRecall => "MR".to_string(),
            Self::MemoryAdd => "M+".to_string(),
            Self::MemorySubtract => "M-".to_string(),
        }
    }
}

/// Button rows, top to bottom.
pub fn keypad_rows(options: &CalcOptions) -> Vec<Vec<Button>> {
    let mut rows = Vec::with_capacity(7);
    if options.supports_memory {
        rows.push(vec![
            Button::MemoryClear,
            Button::MemoryRecall,
            Button::MemoryAdd,
            Button::MemorySubtract,
        ]);
    }
    if options.supports_parentheses {
        rows.push(vec![Button::Operator('('), Button::Operator(')')]);
    }

    let mut top = vec![Button::Clear, Button::Backspace];
    if options.supports_percentage {
        top.push(Button::Percent);
    }
    top.push(Button::Operator('/'));
    rows.push(top);

    for (digits, op) in [("789", '*'), ("456", '-'), ("123", '+')] {
        let mut row: Vec<Button> = digits.chars().map(Button::Digit).collect();
        row.push(Button::Operator(op));
        rows.push(row);
    }
    rows.push(vec![
        Button::ToggleSign,
        Button::Digit('0'),
        Button::Decimal,
        Button::Equals,
    ]);
    rows
}

/// Lay the keypad out over `area`, one cell per button.
pub fn keypad_cells(area: Rect, options: &CalcOptions) -> Vec<(Rect, Button)> {
    let rows = keypad_rows(options);
    let row_count = u32::try_from(rows.len()).unwrap_or(1);
    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, row_count); rows.len()]).split(area);

    let mut cells = Vec::new();
    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let col_count = u32::try_from(row.len()).unwrap_or(1);
        let col_areas =
            Layout::horizontal(vec![Constraint::Ratio(1, col_count); row.len()]).split(*row_area);
        cells.extend(col_areas.iter().copied().zip(row.iter().copied()));
    }
    cells
}

/// The button under a terminal cell, if any. `area` is the whole screen.
pub fn button_at(area: Rect, options: &CalcOptions, column: u16, row: u16) -> Option<Button> {
    let [_, keypad, _] = super::split_frame(area);
    let position = Position::new(column, row);
    keypad_cells(keypad, options)
        .into_iter()
        .find(|(cell, _)| cell.contains(position))
        .map(|(_, button)| button)
}
