use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::calc::{CalcOptions, ExpressionBuffer, Memory};
use crate::config::DEFAULT_ERROR_TIMEOUT_MS;

const TOAST_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug, Clone)]
pub struct Model {
    /// The expression being edited
    pub buffer: ExpressionBuffer,
    /// M+/M-/MR/MC register
    pub memory: Memory,
    /// Dark or light palette
    pub dark_mode: bool,
    /// Whether the keyboard guide overlay is visible
    pub guide_visible: bool,
    /// Last known terminal size, used for mouse hit-testing
    pub terminal_size: (u16, u16),
    /// Global config path shown in the guide
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in the guide
    pub config_local_path: Option<PathBuf>,
    /// Whether the app should quit
    pub should_quit: bool,
    error_timeout: Duration,
    error_expires_at: Option<Instant>,
    /// Serial of the error the current deadline belongs to
    timed_error_serial: u64,
    toast: Option<Toast>,
}

impl Model {
    pub fn new(options: CalcOptions, terminal_size: (u16, u16)) -> Self {
        Self {
            buffer: ExpressionBuffer::new(options),
            memory: Memory::new(),
            dark_mode: true,
            guide_visible: false,
            terminal_size,
            config_global_path: None,
            config_local_path: None,
            should_quit: false,
            error_timeout: Duration::from_millis(DEFAULT_ERROR_TIMEOUT_MS),
            error_expires_at: None,
            timed_error_serial: 0,
            toast: None,
        }
    }

    #[must_use]
    pub const fn with_error_timeout(mut self, timeout: Duration) -> Self {
        self.error_timeout = timeout;
        self
    }

    pub const fn error_timeout(&self) -> Duration {
        self.error_timeout
    }

    /// When the displayed error will be cleared, if one is showing.
    pub const fn error_deadline(&self) -> Option<Instant> {
        self.error_expires_at
    }

    /// Schedule, reschedule or cancel the error auto-clear.
    ///
    /// A fresh error replaces any pending deadline; a clean buffer drops it.
    pub(super) fn sync_error_timer(&mut self, now: Instant) {
        if !self.buffer.is_errored() {
            self.error_expires_at = None;
            return;
        }
        let serial = self.buffer.error_serial();
        if serial != self.timed_error_serial || self.error_expires_at.is_none() {
            self.timed_error_serial = serial;
            self.error_expires_at = Some(now + self.error_timeout);
        }
    }

    /// Clear the buffer if its error has been on screen long enough.
    pub fn expire_error(&mut self, now: Instant) -> bool {
        if self.error_expires_at.is_some_and(|deadline| deadline <= now) {
            self.error_expires_at = None;
            tracing::debug!("error display timed out");
            return self.buffer.clear_if_error();
        }
        false
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// The earliest pending timer, error or toast.
    pub fn next_deadline(&self) -> Option<Instant> {
        let toast = self.toast.as_ref().map(|toast| toast.expires_at);
        match (self.error_expires_at, toast) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(CalcOptions::default(), (80, 24))
    }
}
