//! The calculator core: the expression buffer state machine, the
//! arithmetic evaluator it delegates to, and the memory register.

mod buffer;
mod error;
mod eval;
mod memory;

pub use buffer::{CalcOptions, ExpressionBuffer, Status};
pub use error::CalcError;
pub use eval::{ArithmeticEvaluator, EvalError, Evaluator, evaluate};
pub use memory::Memory;
