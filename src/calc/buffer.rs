use std::sync::LazyLock;

use regex::Regex;

use crate::format::{Formatter, NegativeStyle, canonical_number, is_plain_number, parse_plain_number};

use super::error::CalcError;
use super::eval::{ArithmeticEvaluator, EvalError, Evaluator};

/// Splits off the last operator and the operand after it, e.g.
/// `12+3*-4` into `12+3`, `*`, `-4`.
static PERCENT_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>.*?)(?P<op>[+\-*/])?(?P<operand>-?[0-9.]*)$")
        .expect("percent token regex")
});

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9+\-*/().]").expect("sanitize regex"));

/// Variant switches for the calculator core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalcOptions {
    pub negative_style: NegativeStyle,
    pub supports_parentheses: bool,
    pub supports_percentage: bool,
    pub supports_memory: bool,
}

impl Default for CalcOptions {
    fn default() -> Self {
        Self {
            negative_style: NegativeStyle::Parenthesized,
            supports_parentheses: false,
            supports_percentage: true,
            supports_memory: false,
        }
    }
}

/// Whether the last operation left the buffer clean or errored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ok,
    Error(CalcError),
}

pub(super) const fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/')
}

const fn is_paren(c: char) -> bool {
    matches!(c, '(' | ')')
}

/// The expression under construction.
///
/// `raw` is always canonical: digits, `.`, `+ - * /` and, in the
/// parentheses variant, `(`/`)`. Display text is derived from it through
/// the [`Formatter`]. Operations never return errors; a failed edit moves
/// the buffer into the errored state instead, and the next operation (or
/// the display timeout) clears it.
#[derive(Debug, Clone)]
pub struct ExpressionBuffer<E = ArithmeticEvaluator> {
    raw: String,
    status: Status,
    trail: Option<String>,
    error_serial: u64,
    options: CalcOptions,
    formatter: Formatter,
    evaluator: E,
}

impl ExpressionBuffer {
    pub fn new(options: CalcOptions) -> Self {
        Self::with_evaluator(options, ArithmeticEvaluator)
    }
}

impl Default for ExpressionBuffer {
    fn default() -> Self {
        Self::new(CalcOptions::default())
    }
}

impl<E: Evaluator> ExpressionBuffer<E> {
    pub fn with_evaluator(options: CalcOptions, evaluator: E) -> Self {
        Self {
            raw: String::new(),
            status: Status::Ok,
            trail: None,
            error_serial: 0,
            options,
            formatter: Formatter::new(options.negative_style),
            evaluator,
        }
    }

    /// Replace the formatter, e.g. to use different grouping marks.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Start from an existing canonical expression.
    #[must_use]
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub const fn error(&self) -> Option<CalcError> {
        match self.status {
            Status::Ok => None,
            Status::Error(err) => Some(err),
        }
    }

    pub const fn is_errored(&self) -> bool {
        matches!(self.status, Status::Error(_))
    }

    /// Increments every time an operation fails. Lets the caller tell a
    /// fresh error apart from one it has already scheduled a timeout for.
    pub const fn error_serial(&self) -> u64 {
        self.error_serial
    }

    /// The `"<expr> = "` echo left by the last evaluation.
    pub fn trail(&self) -> Option<&str> {
        self.trail.as_deref()
    }

    pub const fn options(&self) -> &CalcOptions {
        &self.options
    }

    pub const fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// The formatted buffer contents.
    pub fn display(&self) -> String {
        self.formatter.format_expression(&self.raw)
    }

    /// Reset to an empty, clean buffer if the last operation failed.
    ///
    /// Returns whether anything was cleared.
    pub fn clear_if_error(&mut self) -> bool {
        if !self.is_errored() {
            return false;
        }
        self.raw.clear();
        self.trail = None;
        self.status = Status::Ok;
        true
    }

    pub(super) fn fail(&mut self, error: CalcError) {
        tracing::debug!(%error, raw = %self.raw, "buffer operation failed");
        self.status = Status::Error(error);
        self.error_serial += 1;
    }

    pub(super) fn set_raw(&mut self, raw: String) {
        self.raw = raw;
    }

    pub fn append_number(&mut self, digit: char) {
        self.clear_if_error();
        if !digit.is_ascii_digit() {
            tracing::trace!(%digit, "ignored non-digit");
            return;
        }
        self.raw.push(digit);
    }

    /// Append `+ - * /`, or `(`/`)` in the parentheses variant.
    ///
    /// A binary operator is dropped when the buffer is empty or ends in
    /// `(` (except `-`, which starts a negative number), or when it
    /// already ends in an operator or a decimal point.
    pub fn append_operator(&mut self, op: char) {
        self.clear_if_error();
        if is_paren(op) {
            if self.options.supports_parentheses {
                self.raw.push(op);
            }
            return;
        }
        if !is_operator(op) {
            return;
        }
        if self.raw.is_empty() {
            if op == '-' {
                self.raw.push('-');
            }
            return;
        }
        if self.raw.ends_with(|c: char| is_operator(c) || c == '.')
            || (op != '-' && self.raw.ends_with('('))
        {
            tracing::trace!(%op, raw = %self.raw, "rejected operator");
            return;
        }
        self.raw.push(op);
    }

    /// Start or continue the trailing operand's fraction. Ignored right
    /// after a closing parenthesis.
    pub fn append_decimal(&mut self) {
        self.clear_if_error();
        if self.raw.ends_with(')') {
            return;
        }
        let segment = self
            .raw
            .rfind(|c: char| is_operator(c) || is_paren(c))
            .map_or(self.raw.as_str(), |idx| &self.raw[idx + 1..]);
        if segment.contains('.') {
            self.fail(CalcError::InvalidDecimal);
            return;
        }
        if segment.is_empty() {
            self.raw.push_str("0.");
        } else {
            self.raw.push('.');
        }
    }

    pub fn delete_last_character(&mut self) {
        self.clear_if_error();
        self.raw.pop();
    }

    pub fn clear(&mut self) {
        self.raw.clear();
        self.trail = None;
        self.status = Status::Ok;
    }

    /// Negate the trailing operand.
    ///
    /// The operand's own leading `-` is never mistaken for the operator in
    /// front of it, so toggling twice restores the original text.
    pub fn toggle_sign(&mut self) {
        self.clear_if_error();
        if self.raw.is_empty() {
            return;
        }
        if let Some(magnitude) = self.raw.strip_prefix('-')
            && is_plain_number(magnitude)
        {
            self.raw = magnitude.to_string();
            return;
        }
        let Some(start) = trailing_operand_start(&self.raw) else {
            return;
        };
        if self.raw[start..].starts_with('-') {
            self.raw.remove(start);
        } else {
            self.raw.insert(start, '-');
        }
    }

    /// Reduce the trailing operand as a percentage of what precedes it.
    ///
    /// `a+b%` is `a + a*b/100`, `a-b%` is `a - a*b/100`, `a*b%` is
    /// `a * (b/100)`, `a/b%` is `a / (b/100)`, and a lone `b%` is `b/100`.
    pub fn calculate_percentage(&mut self) {
        self.clear_if_error();
        if !self.options.supports_percentage || self.raw.is_empty() {
            return;
        }
        let Some((prefix, op, operand)) = split_percent(&self.raw) else {
            self.fail(CalcError::InvalidPercentage);
            return;
        };
        let Some(b) = parse_plain_number(&operand) else {
            self.fail(CalcError::InvalidPercentage);
            return;
        };

        let (result, keep) = match op {
            Some(op) => {
                let Some(a) = self.value_of(&prefix) else {
                    self.fail(CalcError::InvalidPercentage);
                    return;
                };
                let value = match op {
                    '+' => a + a * b / 100.0,
                    '-' => a - a * b / 100.0,
                    '*' => a * (b / 100.0),
                    '/' => a / (b / 100.0),
                    _ => b / 100.0,
                };
                (value, String::new())
            }
            None => (b / 100.0, prefix),
        };

        if result.is_infinite() {
            self.fail(CalcError::DivisionByZero);
        } else if result.is_nan() {
            self.fail(CalcError::InvalidOperation);
        } else {
            self.raw = keep + &canonical_number(result);
        }
    }

    /// Numeric value of a canonical fragment: a plain literal, or failing
    /// that, whatever the evaluator makes of it. Non-finite values count as
    /// no value.
    pub(super) fn value_of(&self, text: &str) -> Option<f64> {
        parse_plain_number(text)
            .or_else(|| self.evaluator.evaluate(text).ok())
            .filter(|v| v.is_finite())
    }

    /// Evaluate the buffer, replacing it with the result.
    ///
    /// Returns the formatted result, or `None` when the buffer was empty or
    /// the evaluation failed.
    pub fn evaluate(&mut self) -> Option<String> {
        self.clear_if_error();
        if self.raw.is_empty() {
            return None;
        }
        let sanitized = UNSAFE_CHARS.replace_all(&self.raw, "").into_owned();
        self.trail = Some(format!("{} = ", self.display()));

        if self.options.supports_parentheses
            && sanitized.matches('(').count() != sanitized.matches(')').count()
        {
            self.fail(CalcError::ParenthesisMismatch);
            return None;
        }

        match self.evaluator.evaluate(&sanitized) {
            Ok(value) if value.is_infinite() => self.fail(CalcError::DivisionByZero),
            Ok(value) if value.is_nan() => self.fail(CalcError::InvalidOperation),
            Ok(value) => {
                self.raw = canonical_number(value);
                tracing::debug!(expression = %sanitized, result = %self.raw, "evaluated");
                return Some(self.display());
            }
            Err(EvalError::DivisionByZero) => self.fail(CalcError::DivisionByZero),
            Err(err) => {
                tracing::debug!(%err, expression = %sanitized, "evaluator rejected expression");
                self.fail(CalcError::CalculationError);
            }
        }
        None
    }
}

/// Split `raw` into the text before the last operator, that operator, and
/// the trailing operand. A `-` at the start or after `(` or another
/// operator is the operand's sign, so that operand has no operator.
fn split_percent(raw: &str) -> Option<(String, Option<char>, String)> {
    let caps = PERCENT_TOKENS.captures(raw)?;
    let prefix = caps.name("prefix").map_or("", |m| m.as_str());
    let op = caps.name("op").and_then(|m| m.as_str().chars().next());
    let operand = caps.name("operand").map_or("", |m| m.as_str());
    let sign_position =
        prefix.is_empty() || prefix.ends_with(|c: char| is_operator(c) || c == '(');
    if op == Some('-') && sign_position {
        return Some((prefix.to_string(), None, format!("-{operand}")));
    }
    Some((prefix.to_string(), op, operand.to_string()))
}

/// Byte index where the trailing operand starts, sign included.
///
/// A trailing parenthesized group counts as one operand. Returns `None`
/// when a trailing `)` has no matching `(`.
fn trailing_operand_start(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    let mut start = raw.len();

    if bytes.last() == Some(&b')') {
        let mut depth = 0usize;
        let mut open = None;
        for (i, &b) in bytes.iter().enumerate().rev() {
            match b {
                b')' => depth += 1,
                b'(' => {
                    depth -= 1;
                    if depth == 0 {
                        open = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        start = open?;
    } else {
        while start > 0 && (bytes[start - 1].is_ascii_digit() || bytes[start - 1] == b'.') {
            start -= 1;
        }
    }

    // A '-' at the very start or right after an operator or '(' is the
    // operand's sign, not a subtraction.
    if start > 0
        && bytes[start - 1] == b'-'
        && (start == 1 || matches!(bytes[start - 2], b'+' | b'-' | b'*' | b'/' | b'('))
    {
        start -= 1;
    }
    Some(start)
}
