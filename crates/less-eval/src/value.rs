/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Runtime values produced by expression evaluation.
//!
//! Values are immutable once produced. Arithmetic between them follows a
//! small coercion table: the unit of a dimension survives arithmetic with a
//! plain number, and when two dimensions meet the left-hand unit wins unless
//! strict unit checking is enabled.

use crate::error::EvalErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    /// Binding strength used when reconstructing expression text.
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How the items of a list value are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListSeparator {
    Space,
    Comma,
}

impl ListSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListSeparator::Space => " ",
            ListSeparator::Comma => ", ",
        }
    }
}

/// An RGB color with alpha. Channels are kept unclamped during arithmetic
/// and clamped to `0..=255` only when formatted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Color {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(f64::from);
        match digits.len() {
            3 => {
                let mut channels = digits.chars().map(|c| {
                    let doubled: String = [c, c].iter().collect();
                    channel(&doubled)
                });
                Some(Color::rgb(
                    channels.next()??,
                    channels.next()??,
                    channels.next()??,
                ))
            }
            6 => Some(Color::rgb(
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
            )),
            _ => None,
        }
    }

    fn channels(&self) -> [f64; 3] {
        [self.red, self.green, self.blue]
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Color::rgba(f(self.red), f(self.green), f(self.blue), self.alpha)
    }

    fn zip(&self, other: &Color, f: impl Fn(f64, f64) -> f64) -> Self {
        Color::rgba(
            f(self.red, other.red),
            f(self.green, other.green),
            f(self.blue, other.blue),
            self.alpha,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.channels().map(|c| c.round().clamp(0.0, 255.0) as u8);
        if self.alpha < 1.0 {
            write!(
                f,
                "rgba({}, {}, {}, {})",
                r,
                g,
                b,
                format_number(self.alpha.max(0.0))
            )
        } else {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        }
    }
}

/// A value produced by evaluating an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A unitless number.
    Number(f64),
    /// A number with a unit (`px`, `em`, `%`, ...).
    Dimension { value: f64, unit: String },
    Color(Color),
    /// A string literal; `quote` is the delimiter it was written with.
    Quoted { text: String, quote: char },
    /// A bare identifier such as `solid` or `left`.
    Keyword(String),
    List {
        separator: ListSeparator,
        items: Vec<Value>,
    },
}

impl Value {
    pub fn dimension(value: f64, unit: impl Into<String>) -> Self {
        Value::Dimension {
            value,
            unit: unit.into(),
        }
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        Value::Keyword(name.into())
    }

    /// A double-quoted string.
    pub fn quoted(text: impl Into<String>) -> Self {
        Value::Quoted {
            text: text.into(),
            quote: '"',
        }
    }

    pub fn list(separator: ListSeparator, items: Vec<Value>) -> Self {
        Value::List { separator, items }
    }

    /// Name of the value's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Dimension { .. } => "dimension",
            Value::Color(_) => "color",
            Value::Quoted { .. } => "string",
            Value::Keyword(_) => "keyword",
            Value::List { .. } => "list",
        }
    }

    /// The numeric magnitude of a number or dimension.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Dimension { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Text of the value with string delimiters removed.
    pub fn to_unquoted(&self) -> String {
        match self {
            Value::Quoted { text, .. } => text.clone(),
            Value::List { separator, items } => items
                .iter()
                .map(Value::to_unquoted)
                .collect::<Vec<_>>()
                .join(separator.as_str()),
            other => other.to_string(),
        }
    }

    /// Whether an argument satisfies a guard pattern.
    ///
    /// Strings compare by content regardless of delimiter; a string never
    /// matches a keyword even when the text is the same.
    pub fn matches_pattern(&self, argument: &Value) -> bool {
        match (self, argument) {
            (Value::Quoted { text: a, .. }, Value::Quoted { text: b, .. }) => a == b,
            (
                Value::List {
                    separator: sa,
                    items: a,
                },
                Value::List {
                    separator: sb,
                    items: b,
                },
            ) => {
                sa == sb
                    && a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| x.matches_pattern(y))
            }
            (a, b) => a == b,
        }
    }

    /// Apply a binary operator.
    pub fn operate(
        &self,
        op: Operator,
        rhs: &Value,
        strict_units: bool,
    ) -> Result<Value, EvalErrorKind> {
        let check_divisor = |divisor: f64| {
            if op == Operator::Divide && divisor == 0.0 {
                Err(EvalErrorKind::DivideByZero)
            } else {
                Ok(())
            }
        };

        match (self, rhs) {
            (Value::Number(a), Value::Number(b)) => {
                check_divisor(*b)?;
                Ok(Value::Number(op.apply(*a, *b)))
            }
            (Value::Dimension { value, unit }, Value::Number(b)) => {
                check_divisor(*b)?;
                Ok(Value::dimension(op.apply(*value, *b), unit.clone()))
            }
            (Value::Number(a), Value::Dimension { value, unit }) => {
                check_divisor(*value)?;
                Ok(Value::dimension(op.apply(*a, *value), unit.clone()))
            }
            (
                Value::Dimension {
                    value: a,
                    unit: left,
                },
                Value::Dimension {
                    value: b,
                    unit: right,
                },
            ) => {
                if strict_units && left != right {
                    return Err(EvalErrorKind::IncompatibleUnits {
                        op,
                        lhs: left.clone(),
                        rhs: right.clone(),
                    });
                }
                check_divisor(*b)?;
                Ok(Value::dimension(op.apply(*a, *b), left.clone()))
            }
            (Value::Color(c), Value::Number(b)) => {
                check_divisor(*b)?;
                Ok(Value::Color(c.map(|channel| op.apply(channel, *b))))
            }
            (Value::Number(a), Value::Color(c)) => {
                c.channels().into_iter().try_for_each(check_divisor)?;
                Ok(Value::Color(c.map(|channel| op.apply(*a, channel))))
            }
            (Value::Color(a), Value::Color(b)) => {
                b.channels().into_iter().try_for_each(check_divisor)?;
                Ok(Value::Color(a.zip(b, |x, y| op.apply(x, y))))
            }
            _ => Err(EvalErrorKind::InvalidOperation {
                op,
                lhs: self.type_name().to_string(),
                rhs: rhs.type_name().to_string(),
            }),
        }
    }

    /// Unary minus.
    pub fn negate(&self) -> Result<Value, EvalErrorKind> {
        match self {
            Value::Number(n) => Ok(Value::Number(-n)),
            Value::Dimension { value, unit } => Ok(Value::dimension(-value, unit.clone())),
            other => Err(EvalErrorKind::InvalidOperation {
                op: Operator::Subtract,
                lhs: String::new(),
                rhs: other.type_name().to_string(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Dimension { value, unit } => write!(f, "{}{}", format_number(*value), unit),
            Value::Color(c) => write!(f, "{}", c),
            Value::Quoted { text, quote } => write!(f, "{quote}{text}{quote}"),
            Value::Keyword(k) => f.write_str(k),
            Value::List { separator, items } => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(separator.as_str())?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// Format a number the way stylesheets expect: integers without a decimal
/// point, everything else with at most eight fractional digits.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        // Also normalizes -0 to 0.
        return format!("{}", n as i64);
    }
    let text = format!("{:.8}", n);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
