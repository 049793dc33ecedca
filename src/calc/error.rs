use thiserror::Error;

/// A failed edit or evaluation. Every variant is recoverable: the buffer
/// shows it until the next keystroke or the error timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("invalid decimal")]
    InvalidDecimal,
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid operation")]
    InvalidOperation,
    #[error("parenthesis mismatch")]
    ParenthesisMismatch,
    #[error("calculation error")]
    CalculationError,
    #[error("invalid percentage")]
    InvalidPercentage,
    #[error("memory operation failed")]
    MemoryOperationFailed,
}
