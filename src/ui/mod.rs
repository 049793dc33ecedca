//! Terminal UI components.
//!
//! - [`keypad`]: Button layout and mouse hit-testing
//! - [`style`]: Light and dark palettes

pub mod keypad;
pub mod style;

mod overlays;
mod render;
mod status;

pub use keypad::{Button, button_at};
pub use overlays::{guide_entries, guide_rect};
pub use render::{display_lines, render, split_frame};
pub use status::status_text;

/// Rows taken by the display block: two borders, the trail and the value.
pub const DISPLAY_HEIGHT: u16 = 4;
