use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::calc::CalcOptions;
use crate::format::NegativeStyle;

/// Default time an error stays on screen before the buffer resets.
pub const DEFAULT_ERROR_TIMEOUT_MS: u64 = 2000;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub plain_negatives: bool,
    pub parens: bool,
    pub memory: bool,
    pub no_percent: bool,
    pub theme: Option<ThemeMode>,
    pub error_timeout_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            plain_negatives: self.plain_negatives || other.plain_negatives,
            parens: self.parens || other.parens,
            memory: self.memory || other.memory,
            no_percent: self.no_percent || other.no_percent,
            theme: other.theme.or(self.theme),
            error_timeout_ms: other.error_timeout_ms.or(self.error_timeout_ms),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    pub fn calc_options(&self) -> CalcOptions {
        CalcOptions {
            negative_style: if self.plain_negatives {
                NegativeStyle::Plain
            } else {
                NegativeStyle::Parenthesized
            },
            supports_parentheses: self.parens,
            supports_percentage: !self.no_percent,
            supports_memory: self.memory,
        }
    }

    pub fn error_timeout(&self) -> Duration {
        Duration::from_millis(self.error_timeout_ms.unwrap_or(DEFAULT_ERROR_TIMEOUT_MS))
    }
}

pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join("tallyterm"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("tallyterm"),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join("tallyterm"));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config").join("tallyterm"));
        }
    }

    None
}

pub fn global_config_path() -> PathBuf {
    config_dir().map_or_else(local_override_path, |dir| dir.join("config"))
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".tallytermrc")
}

/// Where the theme preference lives, beside the global config file.
pub fn preferences_path() -> PathBuf {
    config_dir().map_or_else(|| PathBuf::from(".tallyterm-prefs.json"), |dir| {
        dir.join("prefs.json")
    })
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# tallyterm defaults (saved with --save)".to_string());
    if flags.plain_negatives {
        lines.push("--plain-negatives".to_string());
    }
    if flags.parens {
        lines.push("--parens".to_string());
    }
    if flags.memory {
        lines.push("--memory".to_string());
    }
    if flags.no_percent {
        lines.push("--no-percent".to_string());
    }
    if let Some(theme) = flags.theme {
        let theme_str = match theme {
            ThemeMode::Auto => "auto",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        lines.push(format!("--theme {theme_str}"));
    }
    if let Some(ms) = flags.error_timeout_ms {
        lines.push(format!("--error-timeout-ms {ms}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--plain-negatives" {
            flags.plain_negatives = true;
        } else if token == "--parens" {
            flags.parens = true;
        } else if token == "--memory" {
            flags.memory = true;
        } else if token == "--no-percent" {
            flags.no_percent = true;
        } else if token == "--theme" {
            if let Some(next) = tokens.get(i + 1) {
                flags.theme = parse_theme(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--theme=") {
            flags.theme = parse_theme(value);
        } else if token == "--error-timeout-ms" {
            if let Some(next) = tokens.get(i + 1) {
                flags.error_timeout_ms = next.parse().ok();
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--error-timeout-ms=") {
            flags.error_timeout_ms = value.parse().ok();
        } else if token == "--log-file" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_file = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-file=") {
            flags.log_file = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}

/// Pick the starting theme.
///
/// An explicit light/dark choice wins, then the stored preference, then the
/// terminal's `COLORFGBG` hint. Dark if nothing says otherwise.
pub fn resolve_dark_mode(
    theme: Option<ThemeMode>,
    stored: Option<bool>,
    colorfgbg: Option<&str>,
) -> bool {
    match theme {
        Some(ThemeMode::Dark) => return true,
        Some(ThemeMode::Light) => return false,
        Some(ThemeMode::Auto) | None => {}
    }
    if let Some(dark) = stored {
        return dark;
    }
    colorfgbg.and_then(dark_from_colorfgbg).unwrap_or(true)
}

// COLORFGBG is "fg;bg" (sometimes "fg;default;bg"); ANSI backgrounds 0-6
// and 8 are dark.
fn dark_from_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}
