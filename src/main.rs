//! Tallyterm - a calculator for the terminal.
//!
//! # Usage
//!
//! ```bash
//! tallyterm
//! tallyterm --parens --memory
//! tallyterm --theme light --save
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tallyterm::app::App;
use tallyterm::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, preferences_path, resolve_dark_mode,
    save_config_flags,
};
use tallyterm::prefs::{DARK_MODE_KEY, PreferenceStore};

/// A calculator for the terminal
#[derive(Parser, Debug)]
#[command(name = "tallyterm", version, about, long_about = None)]
struct Cli {
    /// Color theme (auto uses the saved preference, then the terminal)
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Show negative numbers as -1.234 instead of (-1.234)
    #[arg(long)]
    plain_negatives: bool,

    /// Allow parentheses in expressions
    #[arg(long)]
    parens: bool,

    /// Enable the M+ / M- / MR / MC memory register
    #[arg(long)]
    memory: bool,

    /// Disable the percentage key
    #[arg(long)]
    no_percent: bool,

    /// How long errors stay on screen, in milliseconds
    #[arg(long, value_name = "MS")]
    error_timeout_ms: Option<u64>,

    /// Write log output to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;
    tracing::debug!(?effective, "resolved flags");

    let preferences = match PreferenceStore::load(preferences_path()) {
        Ok(store) => Some(store),
        Err(err) => {
            tracing::warn!("ignoring unreadable preferences: {err:#}");
            None
        }
    };
    let stored_dark = preferences
        .as_ref()
        .and_then(|store| store.get_bool(DARK_MODE_KEY));
    let colorfgbg = std::env::var("COLORFGBG").ok();
    let dark_mode = resolve_dark_mode(effective.theme, stored_dark, colorfgbg.as_deref());

    let mut app = App::new(effective.calc_options())
        .with_dark_mode(dark_mode)
        .with_error_timeout(effective.error_timeout())
        .with_config_paths(
            Some(global_path),
            if local_path.exists() {
                Some(local_path)
            } else {
                None
            },
        );
    if let Some(store) = preferences {
        app = app.with_preferences(store);
    }

    app.run().context("Application error")
}
