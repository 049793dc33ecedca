use crate::format::{canonical_number, is_plain_number};

use super::buffer::{ExpressionBuffer, is_operator};
use super::error::CalcError;
use super::eval::Evaluator;

/// The M+/M-/MR/MC register. Empty until the first store.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Memory {
    value: Option<f64>,
}

impl Memory {
    pub const fn new() -> Self {
        Self { value: None }
    }

    pub const fn value(&self) -> Option<f64> {
        self.value
    }

    pub const fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    fn accumulate(&mut self, delta: f64) -> bool {
        let next = self.value.unwrap_or(0.0) + delta;
        if !next.is_finite() {
            return false;
        }
        self.value = Some(next);
        true
    }
}

impl<E: Evaluator> ExpressionBuffer<E> {
    pub fn memory_add(&mut self, memory: &mut Memory) {
        self.store(memory, 1.0);
    }

    pub fn memory_subtract(&mut self, memory: &mut Memory) {
        self.store(memory, -1.0);
    }

    fn store(&mut self, memory: &mut Memory, sign: f64) {
        self.clear_if_error();
        if !self.options().supports_memory {
            return;
        }
        let current = if self.raw().is_empty() {
            None
        } else {
            self.value_of(self.raw())
        };
        match current {
            Some(value) if memory.accumulate(sign * value) => {
                tracing::debug!(memory = ?memory.value(), "memory updated");
            }
            _ => self.fail(CalcError::MemoryOperationFailed),
        }
    }

    /// Bring the stored value into the buffer.
    ///
    /// Appended after an operator or `(`, replaces a lone number, fails
    /// anywhere else.
    pub fn memory_recall(&mut self, memory: &Memory) {
        self.clear_if_error();
        if !self.options().supports_memory {
            return;
        }
        let Some(value) = memory.value() else {
            self.fail(CalcError::MemoryOperationFailed);
            return;
        };
        let recalled = canonical_number(value);
        let raw = self.raw();
        if raw.is_empty() || is_plain_number(raw) {
            self.set_raw(recalled);
        } else if raw.ends_with(|c: char| is_operator(c) || c == '(') {
            let joined = format!("{raw}{recalled}");
            self.set_raw(joined);
        } else {
            self.fail(CalcError::MemoryOperationFailed);
        }
    }

    pub fn memory_clear(&mut self, memory: &mut Memory) {
        self.clear_if_error();
        if !self.options().supports_memory {
            return;
        }
        memory.value = None;
    }
}
