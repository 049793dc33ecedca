//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use event_loop::poll_timeout;
pub use model::{Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;
use std::time::Duration;

use crate::calc::CalcOptions;
use crate::config::DEFAULT_ERROR_TIMEOUT_MS;
use crate::prefs::PreferenceStore;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    options: CalcOptions,
    dark_mode: bool,
    error_timeout: Duration,
    preferences: Option<PreferenceStore>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    pub fn new(options: CalcOptions) -> Self {
        Self {
            options,
            dark_mode: true,
            error_timeout: Duration::from_millis(DEFAULT_ERROR_TIMEOUT_MS),
            preferences: None,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Set the starting theme.
    pub const fn with_dark_mode(mut self, dark_mode: bool) -> Self {
        self.dark_mode = dark_mode;
        self
    }

    /// How long an error stays on screen.
    pub const fn with_error_timeout(mut self, timeout: Duration) -> Self {
        self.error_timeout = timeout;
        self
    }

    /// Persist theme toggles to this store.
    pub fn with_preferences(mut self, store: PreferenceStore) -> Self {
        self.preferences = Some(store);
        self
    }

    /// Set config paths to show in the keyboard guide.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    fn initial_model(&self, terminal_size: (u16, u16)) -> Model {
        let mut model =
            Model::new(self.options, terminal_size).with_error_timeout(self.error_timeout);
        model.dark_mode = self.dark_mode;
        model.config_global_path.clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model
    }
}

#[cfg(test)]
mod tests;
