// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. calc::CalcError)
    clippy::module_name_repetitions
)]

//! # Tallyterm
//!
//! A keyboard- and mouse-driven calculator for the terminal.
//!
//! Tallyterm keeps the expression being typed as a canonical string
//! (`-1234.5*3`) and shows it grouped and localized (`(-1.234,5)*3`):
//! - Left-to-right entry with operator precedence on `=`
//! - Percentage, sign toggle and optional memory register
//! - Optional parentheses
//! - Errors shown in place and cleared automatically
//!
//! ## Architecture
//!
//! Tallyterm uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`calc`]: Expression buffer, evaluator and memory register
//! - [`format`]: Grouped display formatting and its inverse
//! - [`ui`]: Terminal UI components
//! - [`config`]: Flag files and CLI defaults
//! - [`prefs`]: Persisted preferences

pub mod app;
pub mod calc;
pub mod config;
pub mod format;
pub mod prefs;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::calc::{CalcError, CalcOptions, ExpressionBuffer, Memory};
    pub use crate::format::{Formatter, NegativeStyle};
}
