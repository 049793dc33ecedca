//! Number display formatting.
//!
//! The calculator computes with canonical strings (`-1234.56`) and shows
//! grouped, localized text (`(-1.234,56)`). [`Formatter::format`] goes one
//! way and [`Formatter::unformat`] goes back.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLAIN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:\d+\.?\d*|\.\d+)$").expect("plain number regex"));

static OPERAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d*)?|\.\d+").expect("operand regex"));

/// How negative values are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeStyle {
    /// `-1.234,56`
    Plain,
    /// `(-1.234,56)`
    #[default]
    Parenthesized,
}

/// Grouping and decimal marks used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marks {
    pub group: char,
    pub decimal: char,
}

impl Marks {
    pub const fn new(group: char, decimal: char) -> Self {
        Self { group, decimal }
    }
}

impl Default for Marks {
    fn default() -> Self {
        Self::new('.', ',')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Formatter {
    negative_style: NegativeStyle,
    marks: Marks,
}

impl Formatter {
    pub fn new(negative_style: NegativeStyle) -> Self {
        Self {
            negative_style,
            marks: Marks::default(),
        }
    }

    #[must_use]
    pub const fn with_marks(mut self, marks: Marks) -> Self {
        self.marks = marks;
        self
    }

    pub const fn negative_style(&self) -> NegativeStyle {
        self.negative_style
    }

    pub const fn marks(&self) -> Marks {
        self.marks
    }

    /// Format a canonical number string for display.
    ///
    /// The integer part gets a grouping mark every three digits from the
    /// right, the first `.` becomes the decimal mark, and a leading `-` is
    /// rendered per [`NegativeStyle`]. Empty input comes back empty.
    pub fn format(&self, value: &str) -> String {
        let (negative, magnitude) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        if magnitude.is_empty() {
            return value.to_string();
        }

        let grouped = match magnitude.split_once('.') {
            Some((int, frac)) => {
                format!("{}{}{}", self.group_digits(int), self.marks.decimal, frac)
            }
            None => self.group_digits(magnitude),
        };

        if !negative {
            return grouped;
        }
        match self.negative_style {
            NegativeStyle::Plain => format!("-{grouped}"),
            NegativeStyle::Parenthesized => format!("(-{grouped})"),
        }
    }

    /// Format a computed value. Non-finite values are shown as-is.
    pub fn format_number(&self, value: f64) -> String {
        self.format(&canonical_number(value))
    }

    /// Format an in-progress expression.
    ///
    /// A lone number is formatted whole. Anything else is grouped operand by
    /// operand with operators left untouched, so no parentheses are added.
    pub fn format_expression(&self, raw: &str) -> String {
        if is_plain_number(raw) {
            return self.format(raw);
        }
        OPERAND
            .replace_all(raw, |caps: &Captures| self.format(&caps[0]))
            .into_owned()
    }

    /// Undo [`Formatter::format`].
    pub fn unformat(&self, display: &str) -> String {
        let display = match display
            .strip_prefix("(-")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(inner) => format!("-{inner}"),
            None => display.to_string(),
        };
        display
            .chars()
            .filter(|&c| c != self.marks.group)
            .map(|c| if c == self.marks.decimal { '.' } else { c })
            .collect()
    }

    fn group_digits(&self, digits: &str) -> String {
        let len = digits.chars().count();
        let mut out = String::with_capacity(len + len / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(self.marks.group);
            }
            out.push(ch);
        }
        out
    }
}

/// Whether `s` is a single signed decimal literal such as `-12.`, `.5`, `42`.
pub fn is_plain_number(s: &str) -> bool {
    PLAIN_NUMBER.is_match(s)
}

/// Parse a single signed decimal literal.
pub fn parse_plain_number(s: &str) -> Option<f64> {
    if !is_plain_number(s) {
        return None;
    }
    s.parse().ok()
}

/// Shortest decimal text that reads back as `value`, never in exponent form.
pub fn canonical_number(value: f64) -> String {
    let text = value.to_string();
    if text == "-0" { "0".to_string() } else { text }
}
