//! Infix arithmetic evaluation.
//!
//! A recursive-descent parser over `+ - * / ( )` with the usual precedence
//! and left associativity. Unary `+`/`-` bind tighter than `*` and `/`.
//! Division by an exact zero is reported as an error rather than producing
//! an infinity.

use std::fmt;

use thiserror::Error;

/// Deepest nesting of parentheses and unary signs the parser accepts.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("nothing to evaluate")]
    Empty,
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unexpected '{found}' at {pos}")]
    UnexpectedToken { found: String, pos: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("'(' at {0} is never closed")]
    UnclosedParen(usize),
    #[error("division by zero")]
    DivisionByZero,
    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}

/// The evaluate capability the expression buffer delegates to.
pub trait Evaluator {
    /// Evaluate a sanitized infix expression.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] when the expression is malformed or divides
    /// by zero.
    fn evaluate(&self, expression: &str) -> Result<f64, EvalError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArithmeticEvaluator;

impl Evaluator for ArithmeticEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64, EvalError> {
        evaluate(expression)
    }
}

/// Evaluate an infix expression.
///
/// # Errors
///
/// See [`EvalError`].
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some((token, pos)) = parser.bump() {
        return Err(EvalError::UnexpectedToken {
            found: token.to_string(),
            pos,
        });
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Mul,
    Div,
    ParenOpen,
    ParenClose,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Num(num) => write!(f, "{num}"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::ParenOpen => write!(f, "("),
            Self::ParenClose => write!(f, ")"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Mul,
            '/' => Token::Div,
            '(' => Token::ParenOpen,
            ')' => Token::ParenClose,
            '0'..='9' | '.' => {
                let mut end = pos + 1;
                while let Some(&(i, c)) = chars.peek() {
                    if !(c.is_ascii_digit() || c == '.') {
                        break;
                    }
                    end = i + 1;
                    chars.next();
                }
                let literal = &input[pos..end];
                literal
                    .parse()
                    .map(Token::Num)
                    .map_err(|_| EvalError::InvalidNumber(literal.to_string()))?
            }
            other => return Err(EvalError::UnexpectedChar { ch: other, pos }),
        };
        tokens.push((token, pos));
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [(Token, usize)],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|&(token, _)| token)
    }

    fn bump(&mut self) -> Option<(Token, usize)> {
        let item = self.tokens.get(self.pos).copied();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut lhs = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = if op == Token::Plus { lhs + rhs } else { lhs - rhs };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut lhs = self.unary()?;
        while let Some(op @ (Token::Mul | Token::Div)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = if op == Token::Mul {
                lhs * rhs
            } else if rhs == 0.0 {
                return Err(EvalError::DivisionByZero);
            } else {
                lhs / rhs
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        if self.depth >= MAX_NESTING {
            return Err(EvalError::TooDeep(MAX_NESTING));
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.bump() {
            Some((Token::Num(num), _)) => Ok(num),
            Some((Token::ParenOpen, open)) => {
                let value = self.expr()?;
                match self.bump() {
                    Some((Token::ParenClose, _)) => Ok(value),
                    Some((other, pos)) => Err(EvalError::UnexpectedToken {
                        found: other.to_string(),
                        pos,
                    }),
                    None => Err(EvalError::UnclosedParen(open)),
                }
            }
            Some((other, pos)) => Err(EvalError::UnexpectedToken {
                found: other.to_string(),
                pos,
            }),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(evaluate("2+3*4"), Ok(14.0));
        assert_eq!(evaluate("10-4-3"), Ok(3.0));
        assert_eq!(evaluate("100/10/5"), Ok(2.0));
        assert_eq!(evaluate("(2+3)*4"), Ok(20.0));
        assert_eq!(evaluate("2*(3+(4-1))"), Ok(12.0));
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(evaluate("-5"), Ok(-5.0));
        assert_eq!(evaluate("5*-3"), Ok(-15.0));
        assert_eq!(evaluate("5--3"), Ok(8.0));
        assert_eq!(evaluate("-(2+3)"), Ok(-5.0));
        assert_eq!(evaluate("+4"), Ok(4.0));
    }

    #[test]
    fn test_decimal_literals() {
        assert_eq!(evaluate("0.5+.25"), Ok(0.75));
        assert_eq!(evaluate("5.*2"), Ok(10.0));
        assert_eq!(
            evaluate("1.2.3"),
            Err(EvalError::InvalidNumber("1.2.3".to_string()))
        );
    }

    #[test]
    fn test_zero_divisor_is_detected_structurally() {
        assert_eq!(evaluate("8/0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("8/0.0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("8/(0)"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("8/(2-2)"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("8/0.5"), Ok(16.0));
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(evaluate(""), Err(EvalError::Empty));
        assert_eq!(evaluate("5+"), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate("(5"), Err(EvalError::UnclosedParen(0)));
        assert!(matches!(
            evaluate("5)"),
            Err(EvalError::UnexpectedToken { pos: 1, .. })
        ));
        assert!(matches!(
            evaluate("2*/3"),
            Err(EvalError::UnexpectedToken { .. })
        ));
        assert_eq!(
            evaluate("2x3"),
            Err(EvalError::UnexpectedChar { ch: 'x', pos: 1 })
        );
    }

    #[test]
    fn test_nesting_is_bounded() {
        let nested = |levels: usize| format!("{}1{}", "(".repeat(levels), ")".repeat(levels));
        assert_eq!(evaluate(&nested(100)), Ok(1.0));
        assert_eq!(
            evaluate(&nested(10_000)),
            Err(EvalError::TooDeep(MAX_NESTING))
        );
        assert_eq!(
            evaluate(&format!("{}5", "-".repeat(10_000))),
            Err(EvalError::TooDeep(MAX_NESTING))
        );
        assert_eq!(evaluate(&format!("{}1", "1+".repeat(10_000))), Ok(10_001.0));
    }

    #[test]
    fn test_trait_delegates() {
        assert_eq!(ArithmeticEvaluator.evaluate("6/4"), Ok(1.5));
    }
}
