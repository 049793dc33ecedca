use std::time::Instant;

use crate::app::Model;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Append a digit
    AppendDigit(char),
    /// Append `+ - * /` or a parenthesis
    AppendOperator(char),
    /// Append a decimal point
    AppendDecimal,
    /// Remove the last character
    DeleteLast,
    /// Empty the buffer
    Clear,
    /// Negate the trailing operand
    ToggleSign,
    /// Reduce the trailing operand as a percentage
    Percentage,
    /// Evaluate the expression
    Evaluate,
    /// Clear a showing error without editing
    DismissError,

    // Memory
    MemoryAdd,
    MemorySubtract,
    MemoryRecall,
    MemoryClear,

    // View
    /// Switch between dark and light palettes
    ToggleTheme,
    /// Toggle the keyboard guide
    ToggleGuide,
    /// Hide the keyboard guide
    HideGuide,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// Persisting the theme preference happens afterwards, in the effects pass.
pub fn update(mut model: Model, msg: Message) -> Model {
    tracing::trace!(?msg, "update");
    match msg {
        Message::AppendDigit(digit) => model.buffer.append_number(digit),
        Message::AppendOperator(op) => model.buffer.append_operator(op),
        Message::AppendDecimal => model.buffer.append_decimal(),
        Message::DeleteLast => model.buffer.delete_last_character(),
        Message::Clear => model.buffer.clear(),
        Message::ToggleSign => model.buffer.toggle_sign(),
        Message::Percentage => model.buffer.calculate_percentage(),
        Message::Evaluate => {
            if let Some(result) = model.buffer.evaluate() {
                tracing::debug!(%result, "calculated");
            }
        }

        Message::MemoryAdd => model.buffer.memory_add(&mut model.memory),
        Message::MemorySubtract => model.buffer.memory_subtract(&mut model.memory),
        Message::MemoryRecall => model.buffer.memory_recall(&model.memory),
        Message::MemoryClear => model.buffer.memory_clear(&mut model.memory),

        Message::DismissError => {
            model.buffer.clear_if_error();
        }

        Message::ToggleTheme => {
            model.buffer.clear_if_error();
            model.dark_mode = !model.dark_mode;
        }
        Message::ToggleGuide => {
            model.buffer.clear_if_error();
            model.guide_visible = !model.guide_visible;
        }
        Message::HideGuide => model.guide_visible = false,

        Message::Resize(width, height) => model.terminal_size = (width, height),
        // Redraw: no state change needed
        Message::Redraw => {}

        Message::Quit => model.should_quit = true,
    }
    model.sync_error_timer(Instant::now());
    model
}
