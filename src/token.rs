//! Tokens and the token matcher
//!
//! A token is a named regex, matched anchored at an exact position (no
//! skipping of its own). On success its optional converter turns the matched
//! text into a [`Value`]; without a converter the text itself is the value.
//!
//! # Word Boundaries
//!
//! A bounded token is matched as `\b(?:regex)\b`: both ends of the match
//! must sit on a word boundary, judged against the surrounding input. In
//! [`BoundaryMode::Auto`] every token is bounded unless its regex contains
//! a letter and its first character class is not alphanumeric (see
//! [`needs_word_boundary`]). That exception keeps a signed number like
//! `-12.34e+2` matchable right after an operator.
//!
//! # Example
//!
//! ```rust
//! use pegrow::token::{needs_word_boundary, Token};
//!
//! assert!(needs_word_boundary(r"[a-zA-Z_]\w*"));
//! assert!(needs_word_boundary(r"=="));
//! assert!(!needs_word_boundary(r"[-+]?\d+(\.\d+)?(e[-+]?\d+)?"));
//!
//! let ident = Token::new("ident", r"[a-zA-Z_]\w*");
//! assert_eq!(ident.name(), "ident");
//! ```

use super::error::GrammarError;
use super::literal;
use super::regex_cache;
use super::value::Value;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Converts matched token text into a semantic value
pub type Converter = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// Word-boundary handling for a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryMode {
    /// Decide from the regex (see [`needs_word_boundary`])
    #[default]
    Auto,
    /// Always enforce word boundaries
    On,
    /// Never enforce word boundaries
    Off,
}

/// Regex for signed integers and floats with optional exponent
pub const NUMBER_PATTERN: &str = r"[-+]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?";

/// Regex for single-quoted (`''` doubling) and double-quoted (backslash
/// escapes) strings
pub const QUOTED_STRING_PATTERN: &str = r#"'(?:[^']|'')*'|"(?:[^"\\]|\\.)*""#;

/// A token declaration
#[derive(Clone)]
pub struct Token {
    name: String,
    pattern: String,
    converter: Option<Converter>,
    boundary: BoundaryMode,
    ignore_case: bool,
}

impl Token {
    /// Declare a token matching `pattern`
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            converter: None,
            boundary: BoundaryMode::Auto,
            ignore_case: false,
        }
    }

    /// A signed number token whose value is `Value::Int` or `Value::Float`
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, NUMBER_PATTERN).converter(|text| {
            literal::parse_number(text).unwrap_or_else(|| Value::string(text))
        })
    }

    /// A quoted string token whose value is the decoded string contents
    ///
    /// Never bounded: a quote is not a word character, so `\b` would only
    /// let it match directly after a word.
    pub fn quoted_string(name: impl Into<String>) -> Self {
        Self::new(name, QUOTED_STRING_PATTERN)
            .boundary(BoundaryMode::Off)
            .converter(|text| match literal::decode_quoted(text) {
                Ok((decoded, _)) => Value::Str(decoded),
                Err(_) => Value::string(text),
            })
    }

    /// Set the converter applied to matched text
    pub fn converter<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.converter = Some(Arc::new(f));
        self
    }

    /// Set the word-boundary mode
    pub fn boundary(mut self, mode: BoundaryMode) -> Self {
        self.boundary = mode;
        self
    }

    /// Match case-insensitively
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Token name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token regex, as declared
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether this token enforces word boundaries
    pub fn is_bounded(&self) -> bool {
        match self.boundary {
            BoundaryMode::Auto => needs_word_boundary(&self.pattern),
            BoundaryMode::On => true,
            BoundaryMode::Off => false,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("converter", &self.converter.is_some())
            .field("boundary", &self.boundary)
            .field("ignore_case", &self.ignore_case)
            .finish()
    }
}

/// Check if `c` counts as a word character for boundary purposes
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Decide whether a token regex gets word-boundary assertions in
/// [`BoundaryMode::Auto`]
///
/// A pattern is bounded unless it contains at least one letter and the
/// first character class it matches is not alphanumeric. So `[a-z]+`,
/// `\d+`, `==` and `-[0-9]+` are bounded, while `[-+]?\d+(e\d+)?` and
/// `\s*,` are not. Leading anchors, inline flags and group openers are
/// skipped before looking at the first class.
pub fn needs_word_boundary(pattern: &str) -> bool {
    let body = strip_group_openers(pattern);
    let has_letter = body.chars().any(char::is_alphabetic);
    !(has_letter && !first_class_is_alphanumeric(body))
}

fn strip_group_openers(pattern: &str) -> &str {
    let mut rest = pattern;
    loop {
        if let Some(r) = rest.strip_prefix('^') {
            rest = r;
        } else if let Some(r) = rest.strip_prefix("(?") {
            // `(?:`, `(?i)` and `(?i:`; anything else is left alone
            match r.find([')', ':']) {
                Some(i) if r[..i].chars().all(|c| c.is_ascii_alphabetic() || c == '-') => {
                    rest = &r[i + 1..];
                }
                _ => return rest,
            }
        } else if let Some(r) = rest.strip_prefix('(') {
            rest = r;
        } else {
            return rest;
        }
    }
}

fn first_class_is_alphanumeric(body: &str) -> bool {
    let mut chars = body.chars();
    match chars.next() {
        Some('[') => class_is_alphanumeric(chars.as_str()),
        Some('\\') => chars.next().is_some_and(escape_is_word_class),
        Some(c) => c.is_alphanumeric(),
        None => false,
    }
}

/// `class` is the text after the opening `[`
fn class_is_alphanumeric(class: &str) -> bool {
    if class.starts_with('^') {
        return false;
    }
    let mut chars = class.chars();
    let mut first = true;
    while let Some(c) = chars.next() {
        match c {
            ']' if !first => return false,
            '\\' => {
                if chars.next().is_some_and(escape_is_word_class) {
                    return true;
                }
            }
            c if c.is_alphanumeric() => return true,
            _ => {}
        }
        first = false;
    }
    false
}

fn escape_is_word_class(c: char) -> bool {
    matches!(c, 'w' | 'd' | 'p')
}

/// Check whether `offset` lies on a word boundary, as regex `\b` does
pub(crate) fn is_word_boundary(input: &str, offset: usize) -> bool {
    let before = input[..offset].chars().next_back().is_some_and(is_word_char);
    let after = input[offset..].chars().next().is_some_and(is_word_char);
    before != after
}

/// Check that a literal match spanning `start..end` does not split a word
///
/// The match fails the check when it starts with a word character directly
/// after another word character, or ends with a word character directly
/// before another one.
pub(crate) fn respects_word_boundary(input: &str, start: usize, end: usize) -> bool {
    let matched = &input[start..end];

    if let (Some(first), Some(prev)) = (matched.chars().next(), input[..start].chars().next_back()) {
        if is_word_char(first) && is_word_char(prev) {
            return false;
        }
    }
    if let (Some(last), Some(next)) = (matched.chars().next_back(), input[end..].chars().next()) {
        if is_word_char(last) && is_word_char(next) {
            return false;
        }
    }
    true
}

/// A token ready for matching
#[derive(Clone)]
pub(crate) struct CompiledToken {
    pub(crate) name: String,
    regex: Regex,
    bounded: bool,
    converter: Option<Converter>,
}

impl CompiledToken {
    /// Compile a token declaration
    pub(crate) fn compile(token: &Token) -> Result<Self, GrammarError> {
        let flags = if token.ignore_case { "(?i)" } else { "" };
        let bounded = token.is_bounded();
        // The leading `\b` needs the character before `pos`, which the
        // anchored slice cannot see; `match_at` checks it instead.
        let trailing = if bounded { r"\b" } else { "" };
        let anchored = format!("^{}(?:{}){}", flags, token.pattern, trailing);
        let regex = regex_cache::get_or_compile(&anchored).map_err(|e| {
            GrammarError::InvalidRegex {
                name: token.name.clone(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            name: token.name.clone(),
            regex,
            bounded,
            converter: token.converter.clone(),
        })
    }

    /// Match at exactly `pos`, returning the end offset and value
    pub(crate) fn match_at(&self, input: &str, pos: usize) -> Option<(usize, Value)> {
        if self.bounded && !is_word_boundary(input, pos) {
            return None;
        }
        let m = self.regex.find(&input[pos..])?;
        let end = pos + m.end();

        let text = m.as_str();
        let value = match &self.converter {
            Some(convert) => convert(text),
            None => Value::string(text),
        };
        Some((end, value))
    }
}

impl fmt::Debug for CompiledToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledToken")
            .field("name", &self.name)
            .field("regex", &self.regex.as_str())
            .field("bounded", &self.bounded)
            .finish()
    }
}
