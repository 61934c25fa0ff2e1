//! Literal sub-grammar
//!
//! Parses the small literal language used for default values
//! (`<x?:name='anon'>`) and by the built-in number/string tokens:
//!
//! - integers: `42`, `-7`, `+3`
//! - floats: `1.5`, `-.25`, `6.02e23`, `1e-3`
//! - single-quoted strings, where `''` stands for one quote: `'it''s'`
//! - double-quoted strings with backslash escapes: `"a\tb\u{41}"`
//!
//! Anything that does not start like a number or a quote is a bare word and
//! is kept as a raw string.

use super::value::Value;
use std::fmt;

/// Error raised when a literal is malformed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    /// Byte offset of the problem within the literal text
    pub offset: usize,
    /// What went wrong
    pub message: String,
}

impl LiteralError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for LiteralError {}

/// Parse a default-value literal
///
/// Quoted text must be a single complete string literal and numeric-looking
/// text must be a complete number; any other text is returned verbatim as
/// a string.
pub fn parse_default(text: &str) -> Result<Value, LiteralError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(LiteralError::new(0, "empty default value"));
    }

    if text.starts_with('\'') || text.starts_with('"') {
        let (decoded, consumed) = decode_quoted(text)?;
        if consumed != text.len() {
            return Err(LiteralError::new(
                consumed,
                "unexpected text after string literal",
            ));
        }
        return Ok(Value::Str(decoded));
    }

    if looks_numeric(text) {
        return parse_number(text)
            .ok_or_else(|| LiteralError::new(0, format!("malformed number {:?}", text)));
    }

    Ok(Value::Str(text.to_string()))
}

/// Parse a complete number literal
///
/// Returns `Value::Int` when there is no fraction or exponent and the value
/// fits in an `i64`, otherwise `Value::Float`.
pub fn parse_number(text: &str) -> Option<Value> {
    let (len, is_float) = scan_number(text)?;
    if len != text.len() {
        return None;
    }
    if !is_float {
        if let Ok(n) = text.parse::<i64>() {
            return Some(Value::Int(n));
        }
    }
    text.parse::<f64>().ok().map(Value::Float)
}

/// Length of the number at the start of `text`, and whether it has a
/// fraction or exponent part
///
/// Grammar: `[+-]? (digits ('.' digits?)? | '.' digits) ([eE] [+-]? digits)?`
pub fn scan_number(text: &str) -> Option<(usize, bool)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    let mut is_float = false;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_digits = count_digits(&bytes[i..]);
    i += int_digits;

    if bytes.get(i) == Some(&b'.') {
        let frac_digits = count_digits(&bytes[i + 1..]);
        if int_digits == 0 && frac_digits == 0 {
            return None;
        }
        is_float = true;
        i += 1 + frac_digits;
    } else if int_digits == 0 {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(&bytes[j..]);
        if exp_digits > 0 {
            is_float = true;
            i = j + exp_digits;
        }
    }

    Some((i, is_float))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn looks_numeric(text: &str) -> bool {
    let rest = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Decode the quoted string literal at the start of `text`
///
/// Returns the decoded contents and the number of bytes consumed, including
/// both quotes. Single-quoted strings use doubling (`''`) to embed a quote
/// and take backslashes literally; double-quoted strings use backslash
/// escapes.
pub fn decode_quoted(text: &str) -> Result<(String, usize), LiteralError> {
    let mut chars = text.char_indices().peekable();
    let quote = match chars.next() {
        Some((_, q @ ('\'' | '"'))) => q,
        _ => return Err(LiteralError::new(0, "expected a quote")),
    };

    let mut out = String::new();
    while let Some((i, c)) = chars.next() {
        if c == quote {
            if quote == '\'' && matches!(chars.peek(), Some((_, '\''))) {
                chars.next();
                out.push('\'');
                continue;
            }
            return Ok((out, i + c.len_utf8()));
        }

        if c == '\\' && quote == '"' {
            let (j, esc) = chars
                .next()
                .ok_or_else(|| LiteralError::new(i, "unterminated escape sequence"))?;
            match esc {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                '\\' | '"' | '\'' => out.push(esc),
                'x' => {
                    let mut hex = String::new();
                    for _ in 0..2 {
                        match chars.next() {
                            Some((_, h)) if h.is_ascii_hexdigit() => hex.push(h),
                            _ => return Err(LiteralError::new(j, "invalid \\x escape")),
                        }
                    }
                    let byte = u8::from_str_radix(&hex, 16)
                        .map_err(|_| LiteralError::new(j, "invalid \\x escape"))?;
                    if byte > 0x7F {
                        return Err(LiteralError::new(j, "\\x escape must be ASCII"));
                    }
                    out.push(byte as char);
                }
                'u' => {
                    if !matches!(chars.next(), Some((_, '{'))) {
                        return Err(LiteralError::new(j, "expected '{' after \\u"));
                    }
                    let mut hex = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, h)) if h.is_ascii_hexdigit() && hex.len() < 6 => {
                                hex.push(h)
                            }
                            _ => return Err(LiteralError::new(j, "invalid \\u escape")),
                        }
                    }
                    let ch = u32::from_str_radix(&hex, 16)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| LiteralError::new(j, "invalid unicode scalar"))?;
                    out.push(ch);
                }
                other => {
                    return Err(LiteralError::new(
                        j,
                        format!("unknown escape sequence \\{}", other),
                    ))
                }
            }
            continue;
        }

        out.push(c);
    }

    Err(LiteralError::new(0, "unterminated string literal"))
}
