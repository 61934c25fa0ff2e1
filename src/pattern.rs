//! Pattern compiler
//!
//! Compiles a pattern string into a [`Sequence`] of typed elements.
//!
//! # Pattern Syntax
//!
//! ```text
//! <expr> ::= <expr:lhs> '+' <expr:rhs>     optional rule-name prefix
//! 'if'  "a\tb"  'it''s'                    quoted literals
//! ,  (  )  +                               bare literals
//! <name>  <name:var>                       reference, with capture
//! <name?>  <name*>  <name+>                optional / zero+ / one+
//! <name?:var=DEFAULT>                      optional with default value
//! [ ... ]  [ ... ]:var                     zero-or-more group
//! { ... }  { ... }:var                     one-or-more group
//! ```
//!
//! A bare literal is any run of characters other than whitespace and
//! `< > [ ] { } ' "`.
//!
//! # Example
//!
//! ```rust
//! use pegrow::pattern::{compile, Element, Quantifier};
//!
//! let compiled = compile("<list> ::= <item> [ ',' <item> ]:rest").unwrap();
//! assert_eq!(compiled.rule_name.as_deref(), Some("list"));
//! assert_eq!(compiled.sequence.len(), 2);
//! ```

use super::error::GrammarError;
use super::literal;
use super::value::Value;
use std::fmt;

/// Quantifier on a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantifier {
    /// Exactly once
    #[default]
    One,
    /// `?` - zero or one
    Optional,
    /// `*` - zero or more
    ZeroOrMore,
    /// `+` - one or more
    OneOrMore,
}

/// Repetition of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// `[ ... ]`
    ZeroOrMore,
    /// `{ ... }`
    OneOrMore,
}

/// A reference to a rule or token
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Rule or token name
    pub name: String,
    /// Capture variable (`:var`)
    pub capture: Option<String>,
    /// How often the reference may match
    pub quantifier: Quantifier,
    /// Value substituted when an optional reference is absent
    pub default: Option<Value>,
}

impl Reference {
    /// Whether this is a plain, required, single reference to `rule`
    pub fn is_bare_reference_to(&self, rule: &str) -> bool {
        self.name == rule && self.quantifier == Quantifier::One
    }
}

/// A bracketed, repeated sub-sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Elements matched on each repetition
    pub body: Sequence,
    /// `[ ]` or `{ }`
    pub repeat: Repeat,
    /// Capture variable (`:var` after the closing bracket)
    pub capture: Option<String>,
}

/// One element of a pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Literal text
    Literal(String),
    /// Rule or token reference
    Reference(Reference),
    /// Repeated group
    Group(Group),
}

impl Element {
    /// Capture name attached to this element, if any
    pub fn capture(&self) -> Option<&str> {
        match self {
            Element::Literal(_) => None,
            Element::Reference(r) => r.capture.as_deref(),
            Element::Group(g) => g.capture.as_deref(),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Literal(text) => write!(f, "'{}'", text.replace('\'', "''")),
            Element::Reference(r) => {
                write!(f, "<{}", r.name)?;
                match r.quantifier {
                    Quantifier::One => {}
                    Quantifier::Optional => write!(f, "?")?,
                    Quantifier::ZeroOrMore => write!(f, "*")?,
                    Quantifier::OneOrMore => write!(f, "+")?,
                }
                if let Some(var) = &r.capture {
                    write!(f, ":{}", var)?;
                }
                write!(f, ">")
            }
            Element::Group(g) => {
                let (open, close) = match g.repeat {
                    Repeat::ZeroOrMore => ('[', ']'),
                    Repeat::OneOrMore => ('{', '}'),
                };
                write!(f, "{} {} {}", open, g.body, close)?;
                if let Some(var) = &g.capture {
                    write!(f, ":{}", var)?;
                }
                Ok(())
            }
        }
    }
}

/// An ordered list of elements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence {
    /// The elements, in match order
    pub elements: Vec<Element>,
}

impl Sequence {
    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the sequence has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// First element, if any
    pub fn first(&self) -> Option<&Element> {
        self.elements.first()
    }

    /// Iterate over the elements
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Every capture name in the sequence, including nested groups, in
    /// source order
    pub fn capture_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_capture_names(self, &mut names);
        names
    }

    /// Every referenced rule or token name, including nested groups
    pub fn reference_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_reference_names(self, &mut names);
        names
    }
}

fn collect_capture_names<'a>(seq: &'a Sequence, out: &mut Vec<&'a str>) {
    for element in &seq.elements {
        if let Element::Group(g) = element {
            collect_capture_names(&g.body, out);
        }
        if let Some(name) = element.capture() {
            out.push(name);
        }
    }
}

fn collect_reference_names<'a>(seq: &'a Sequence, out: &mut Vec<&'a str>) {
    for element in &seq.elements {
        match element {
            Element::Reference(r) => out.push(&r.name),
            Element::Group(g) => collect_reference_names(&g.body, out),
            Element::Literal(_) => {}
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}

/// Result of compiling a pattern string
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPattern {
    /// Rule name from a leading `<NAME> ::=`
    pub rule_name: Option<String>,
    /// The pattern body
    pub sequence: Sequence,
}

/// Compile a pattern string
///
/// # Errors
/// Returns `GrammarError::PatternSyntax` for malformed syntax,
/// `GrammarError::DuplicateCapture` when a capture name repeats anywhere in
/// the pattern, and `GrammarError::InvalidDefault` when a default value is
/// not a valid literal.
pub fn compile(pattern: &str) -> Result<CompiledPattern, GrammarError> {
    let mut compiler = PatternCompiler::new(pattern);
    let rule_name = compiler.rule_name_prefix()?;
    let sequence = compiler.sequence(None)?;

    if sequence.is_empty() {
        return Err(compiler.error(pattern.len(), "pattern has no elements"));
    }

    let names = sequence.capture_names();
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(GrammarError::DuplicateCapture {
                pattern: pattern.to_string(),
                name: name.to_string(),
            });
        }
    }

    Ok(CompiledPattern {
        rule_name,
        sequence,
    })
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_bare_literal_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '<' | '>' | '[' | ']' | '{' | '}' | '\'' | '"')
}

struct PatternCompiler<'p> {
    src: &'p str,
    pos: usize,
}

impl<'p> PatternCompiler<'p> {
    fn new(src: &'p str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> GrammarError {
        GrammarError::PatternSyntax {
            pattern: self.src.to_string(),
            offset,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn name(&mut self) -> &'p str {
        let start = self.pos;
        while self.peek().is_some_and(is_name_char) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Consume `<NAME> ::=` if the pattern starts with it
    fn rule_name_prefix(&mut self) -> Result<Option<String>, GrammarError> {
        self.skip_whitespace();
        let start = self.pos;
        if !self.eat('<') {
            return Ok(None);
        }
        let name = self.name();
        if !name.is_empty() && self.eat('>') {
            self.skip_whitespace();
            if self.src[self.pos..].starts_with("::=") {
                self.pos += 3;
                return Ok(Some(name.to_string()));
            }
        }
        self.pos = start;
        Ok(None)
    }

    /// Parse elements until end of input or `close`
    fn sequence(&mut self, close: Option<char>) -> Result<Sequence, GrammarError> {
        let mut elements = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let c = match self.peek() {
                Some(c) => c,
                None => match close {
                    Some(close) => {
                        return Err(self.error(start, format!("unclosed group, expected '{}'", close)))
                    }
                    None => break,
                },
            };

            if Some(c) == close {
                self.bump();
                break;
            }

            let element = match c {
                '\'' | '"' => self.quoted_literal()?,
                '<' => self.reference()?,
                '[' => self.group(']', Repeat::ZeroOrMore)?,
                '{' => self.group('}', Repeat::OneOrMore)?,
                ']' | '}' | '>' => {
                    return Err(self.error(start, format!("unmatched '{}'", c)));
                }
                _ => self.bare_literal(),
            };
            elements.push(element);
        }
        Ok(Sequence { elements })
    }

    fn quoted_literal(&mut self) -> Result<Element, GrammarError> {
        let start = self.pos;
        let (text, consumed) = literal::decode_quoted(&self.src[start..])
            .map_err(|e| self.error(start + e.offset, e.message))?;
        if text.is_empty() {
            return Err(self.error(start, "empty literal"));
        }
        self.pos += consumed;
        Ok(Element::Literal(text))
    }

    fn bare_literal(&mut self) -> Element {
        let start = self.pos;
        while self.peek().is_some_and(is_bare_literal_char) {
            self.bump();
        }
        Element::Literal(self.src[start..self.pos].to_string())
    }

    fn reference(&mut self) -> Result<Element, GrammarError> {
        let open = self.pos;
        self.bump();

        let name = self.name();
        if name.is_empty() {
            return Err(self.error(self.pos, "expected a rule or token name after '<'"));
        }

        let quantifier = match self.peek() {
            Some('?') => Quantifier::Optional,
            Some('*') => Quantifier::ZeroOrMore,
            Some('+') => Quantifier::OneOrMore,
            _ => Quantifier::One,
        };
        if quantifier != Quantifier::One {
            self.bump();
            if matches!(self.peek(), Some('?' | '*' | '+')) {
                return Err(self.error(self.pos, "conflicting quantifier suffixes"));
            }
        }

        let capture = if self.eat(':') {
            let var = self.name();
            if var.is_empty() {
                return Err(self.error(self.pos, "expected a capture name after ':'"));
            }
            Some(var.to_string())
        } else {
            None
        };

        let default = if self.peek() == Some('=') {
            if quantifier != Quantifier::Optional {
                return Err(self.error(
                    self.pos,
                    "a default value is only allowed on an optional reference",
                ));
            }
            self.bump();
            Some(self.default_value()?)
        } else {
            None
        };

        match self.peek() {
            Some('>') => {
                self.bump();
            }
            Some('?' | '*' | '+') => {
                return Err(self.error(
                    self.pos,
                    "quantifier must come before the capture name",
                ));
            }
            Some(c) => {
                return Err(self.error(self.pos, format!("unexpected '{}' in reference", c)));
            }
            None => return Err(self.error(open, "unterminated reference, expected '>'")),
        }

        Ok(Element::Reference(Reference {
            name: name.to_string(),
            capture,
            quantifier,
            default,
        }))
    }

    fn default_value(&mut self) -> Result<Value, GrammarError> {
        let src = self.src;
        let start = self.pos;
        let text = match self.peek() {
            Some('\'' | '"') => {
                let (_, consumed) = literal::decode_quoted(&src[start..])
                    .map_err(|e| self.invalid_default(&src[start..], e.message))?;
                self.pos += consumed;
                &src[start..self.pos]
            }
            _ => {
                while self.peek().is_some_and(|c| c != '>') {
                    self.bump();
                }
                &src[start..self.pos]
            }
        };
        literal::parse_default(text).map_err(|e| self.invalid_default(text, e.message))
    }

    fn invalid_default(&self, text: &str, message: String) -> GrammarError {
        GrammarError::InvalidDefault {
            pattern: self.src.to_string(),
            text: text.to_string(),
            message,
        }
    }

    fn group(&mut self, close: char, repeat: Repeat) -> Result<Element, GrammarError> {
        let open = self.pos;
        self.bump();
        let body = self.sequence(Some(close))?;
        if body.is_empty() {
            return Err(self.error(open, "empty group"));
        }

        let capture = if self.eat(':') {
            let var = self.name();
            if var.is_empty() {
                return Err(self.error(self.pos, "expected a capture name after ':'"));
            }
            Some(var.to_string())
        } else {
            None
        };

        Ok(Element::Group(Group {
            body,
            repeat,
            capture,
        }))
    }
}
