//! Integer literal scanning shared by immediates, displacements, and scales.
//!
//! Two radixes are accepted: decimal and `0x`-prefixed hexadecimal, each with
//! an optional leading `-`. Values are kept as `i128` so that 64-bit literals
//! survive lexing with their sign intact.

use std::fmt;

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    Empty,
    Invalid(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Empty => write!(f, "empty integer literal"),
            ErrorKind::Invalid(lit) => write!(f, "invalid integer literal \"{}\"", lit),
        }
    }
}

/// The value of a literal together with its canonical spelling.
///
/// The canonical form uppercases hex digits while keeping the `0x` prefix
/// lowercase, and preserves a leading `-`: `-0X1ff` becomes `-0x1FF`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInteger {
    pub value: i128,
    pub canonical: String,
}

pub fn parse_integer(literal: &str) -> Result<ParsedInteger, ErrorKind> {
    let (negative, body) = match literal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, literal),
    };

    if body.is_empty() {
        return Err(ErrorKind::Empty);
    }

    let (radix, digits, prefix) = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(digits) => (16, digits, "0x"),
        None => (10, body, ""),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ErrorKind::Invalid(literal.to_string()));
    }

    let magnitude = i128::from_str_radix(digits, radix)
        .map_err(|_| ErrorKind::Invalid(literal.to_string()))?;
    let value = if negative { -magnitude } else { magnitude };

    let mut canonical = String::with_capacity(literal.len());
    if negative {
        canonical.push('-');
    }
    canonical.push_str(prefix);
    for c in digits.chars() {
        canonical.push(c.to_ascii_uppercase());
    }

    Ok(ParsedInteger { value, canonical })
}
