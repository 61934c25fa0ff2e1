//! Error types and diagnostic rendering
//!
//! Two kinds of error exist:
//!
//! - [`GrammarError`] is raised while a grammar is assembled (bad pattern
//!   syntax, duplicate captures, unknown references, ...). It is fatal.
//! - [`ParseError`] is raised by a parse. Its main variant carries a
//!   [`Diagnostic`] describing the deepest position any alternative reached
//!   before failing.
//!
//! # Example Output
//!
//! ```text
//! Error at line 2, column 5:
//! 3 * * 4
//!     ^
//! Expected <number>, '(' or '-', found "* 4"
//! ```

use super::source_location::{get_line_at_offset, SourcePosition};
use std::fmt;

/// Error raised while assembling a grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// Malformed pattern string
    PatternSyntax {
        /// The pattern being compiled
        pattern: String,
        /// Byte offset of the problem within the pattern
        offset: usize,
        /// What went wrong
        message: String,
    },

    /// A capture name appears twice in one alternative
    DuplicateCapture {
        /// The pattern being compiled
        pattern: String,
        /// The repeated capture name
        name: String,
    },

    /// A `=DEFAULT` value could not be parsed as a literal
    InvalidDefault {
        /// The pattern being compiled
        pattern: String,
        /// The default text
        text: String,
        /// Why it was rejected
        message: String,
    },

    /// The pattern's `<NAME> ::=` prefix disagrees with the explicit name
    ConflictingRuleName {
        /// Name given by the pattern prefix
        pattern_name: String,
        /// Name given at registration
        declared_name: String,
    },

    /// An alternative could not be attributed to any rule
    MissingRuleName {
        /// The pattern without a rule name
        pattern: String,
    },

    /// A reference names neither a rule nor a token
    UnknownReference {
        /// Rule containing the reference
        rule: String,
        /// The unresolved name
        name: String,
    },

    /// A name is used for both a rule and a token
    NameClash {
        /// The clashing name
        name: String,
    },

    /// Two tokens share a name
    DuplicateToken {
        /// The repeated token name
        name: String,
    },

    /// A token or skip regex failed to compile
    InvalidRegex {
        /// Token name (or `"<skip>"`)
        name: String,
        /// Regex compiler message
        message: String,
    },

    /// A leading self-reference is optional or repeated
    InvalidLeftRecursion {
        /// Rule name
        rule: String,
        /// The offending pattern
        pattern: String,
    },

    /// The configured start rule does not exist
    UnknownStartRule {
        /// The requested start rule
        name: String,
    },

    /// The grammar declares no rules
    EmptyGrammar,
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::PatternSyntax {
                pattern,
                offset,
                message,
            } => write!(
                f,
                "Invalid pattern {:?} at offset {}: {}",
                pattern, offset, message
            ),
            GrammarError::DuplicateCapture { pattern, name } => write!(
                f,
                "Duplicate capture name `{}` in pattern {:?}",
                name, pattern
            ),
            GrammarError::InvalidDefault {
                pattern,
                text,
                message,
            } => write!(
                f,
                "Invalid default value {:?} in pattern {:?}: {}",
                text, pattern, message
            ),
            GrammarError::ConflictingRuleName {
                pattern_name,
                declared_name,
            } => write!(
                f,
                "Pattern declares rule `{}` but was registered as `{}`",
                pattern_name, declared_name
            ),
            GrammarError::MissingRuleName { pattern } => {
                write!(f, "No rule name for pattern {:?}", pattern)
            }
            GrammarError::UnknownReference { rule, name } => {
                write!(f, "Rule `{}` references unknown name `{}`", rule, name)
            }
            GrammarError::NameClash { name } => {
                write!(f, "`{}` is declared as both a rule and a token", name)
            }
            GrammarError::DuplicateToken { name } => {
                write!(f, "Token `{}` is declared twice", name)
            }
            GrammarError::InvalidRegex { name, message } => {
                write!(f, "Invalid regex for `{}`: {}", name, message)
            }
            GrammarError::InvalidLeftRecursion { rule, pattern } => write!(
                f,
                "Rule `{}` starts with an optional or repeated self-reference in {:?}",
                rule, pattern
            ),
            GrammarError::UnknownStartRule { name } => {
                write!(f, "Start rule `{}` is not defined", name)
            }
            GrammarError::EmptyGrammar => write!(f, "Grammar has no rules"),
        }
    }
}

impl std::error::Error for GrammarError {}

/// Something the parser expected at the deepest failure position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// A literal text
    Literal(String),
    /// A token, by name
    Token(String),
    /// A rule whose match was rejected by `validate` or `transform`
    Rule(String),
    /// A `{...}` group that matched zero times
    OneOrMore(String),
    /// The end of the input
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Literal(text) => write!(f, "'{}'", text.escape_debug()),
            Expected::Token(name) => write!(f, "<{}>", name),
            Expected::Rule(name) => write!(f, "valid <{}>", name),
            Expected::OneOrMore(what) => write!(f, "one or more {}", what),
            Expected::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// Tracks the rightmost failure seen during one parse
///
/// Only failures at the deepest offset are kept; recording a failure
/// further right discards everything collected so far.
#[derive(Debug, Clone, Default)]
pub struct FailureTracker {
    position: Option<usize>,
    expected: Vec<Expected>,
}

impl FailureTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `expected` did not match at `position`
    pub fn record(&mut self, position: usize, expected: Expected) {
        match self.position {
            Some(deepest) if position < deepest => {}
            Some(deepest) if position == deepest => {
                if !self.expected.contains(&expected) {
                    self.expected.push(expected);
                }
            }
            _ => {
                self.position = Some(position);
                self.expected.clear();
                self.expected.push(expected);
            }
        }
    }

    /// The deepest failure offset, if any failure was recorded
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Everything expected at the deepest offset, in first-seen order
    pub fn expected(&self) -> &[Expected] {
        &self.expected
    }
}

/// Rendered description of a failed parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the deepest failure happened
    pub position: SourcePosition,
    /// Full text of the line containing the failure
    pub line_text: String,
    /// The next few characters of input at the failure (empty at end of input)
    pub lookahead: String,
    /// What would have been accepted there
    pub expected: Vec<Expected>,
}

impl Diagnostic {
    /// Build a diagnostic from the deepest failure in `tracker`
    pub fn from_failure(input: &str, tracker: &FailureTracker, lookahead_len: usize) -> Self {
        let offset = tracker.position().unwrap_or(0);
        let position = SourcePosition::from_offset(input, offset);
        let lookahead = input[position.offset..]
            .chars()
            .take_while(|&c| c != '\n' && c != '\r')
            .take(lookahead_len)
            .collect();

        Self {
            position,
            line_text: get_line_at_offset(input, position.offset).to_string(),
            lookahead,
            expected: tracker.expected().to_vec(),
        }
    }

    /// 1-based line of the failure
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// 1-based column of the failure
    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Byte offset of the failure
    pub fn offset(&self) -> usize {
        self.position.offset
    }

    /// A line holding a caret under the failing column
    ///
    /// Tabs in the source line are copied so the caret lines up however
    /// the terminal expands them.
    pub fn caret_line(&self) -> String {
        let mut caret: String = self
            .line_text
            .chars()
            .take(self.position.column.saturating_sub(1))
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        let padding = self.position.column.saturating_sub(1);
        while caret.chars().count() < padding {
            caret.push(' ');
        }
        caret.push('^');
        caret
    }

    /// Human-readable list of expectations, e.g. `'+', '-' or <number>`
    pub fn hint(&self) -> String {
        let parts: Vec<String> = self.expected.iter().map(|e| e.to_string()).collect();
        match parts.len() {
            0 => "valid input".to_string(),
            1 => parts[0].clone(),
            n => format!("{} or {}", parts[..n - 1].join(", "), parts[n - 1]),
        }
    }

    /// What was actually found at the failure
    pub fn found(&self) -> String {
        if self.lookahead.is_empty() {
            "end of input".to_string()
        } else {
            format!("{:?}", self.lookahead)
        }
    }

    /// Render the full multi-line report
    pub fn render(&self) -> String {
        format!(
            "Error at {}:\n{}\n{}\nExpected {}, found {}",
            self.position,
            self.line_text,
            self.caret_line(),
            self.hint(),
            self.found()
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Error raised by a parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No alternative of the start rule matched the whole input
    Failed(Box<Diagnostic>),

    /// Input exceeds maximum allowed size
    InputTooLarge {
        /// Size of the input in bytes
        input_size: usize,
        /// Maximum allowed size
        max_size: usize,
    },

    /// Nested rule calls exceeded the configured depth
    RecursionLimitExceeded {
        /// Depth reached
        depth: usize,
        /// Maximum allowed depth
        max_depth: usize,
    },
}

impl ParseError {
    /// The diagnostic of a failed parse
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ParseError::Failed(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Failed(diagnostic) => write!(f, "{}", diagnostic),
            ParseError::InputTooLarge {
                input_size,
                max_size,
            } => write!(
                f,
                "Input too large: {} bytes exceeds limit of {} bytes",
                input_size, max_size
            ),
            ParseError::RecursionLimitExceeded { depth, max_depth } => write!(
                f,
                "Recursion limit exceeded: depth {} exceeds limit of {}",
                depth, max_depth
            ),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_keeps_deepest() {
        let mut tracker = FailureTracker::new();
        tracker.record(3, Expected::Literal("+".into()));
        tracker.record(1, Expected::Token("number".into()));
        tracker.record(5, Expected::Literal(")".into()));
        tracker.record(5, Expected::Literal("*".into()));
        tracker.record(5, Expected::Literal(")".into()));

        assert_eq!(tracker.position(), Some(5));
        assert_eq!(
            tracker.expected(),
            &[Expected::Literal(")".into()), Expected::Literal("*".into())]
        );
    }

    #[test]
    fn test_hint_joins_alternatives() {
        let mut tracker = FailureTracker::new();
        tracker.record(0, Expected::Literal("(".into()));
        tracker.record(0, Expected::Token("number".into()));
        tracker.record(0, Expected::EndOfInput);
        let d = Diagnostic::from_failure("", &tracker, 10);
        assert_eq!(d.hint(), "'(', <number> or end of input");
        assert_eq!(d.found(), "end of input");
    }

    #[test]
    fn test_render_second_line() {
        let input = "1 + 2\n3 * * 4";
        let mut tracker = FailureTracker::new();
        tracker.record(10, Expected::Token("number".into()));
        let d = Diagnostic::from_failure(input, &tracker, 10);

        assert_eq!(d.line(), 2);
        assert_eq!(d.column(), 5);
        assert_eq!(d.line_text, "3 * * 4");
        assert_eq!(d.lookahead, "* 4");
        assert_eq!(
            d.render(),
            "Error at line 2, column 5:\n3 * * 4\n    ^\nExpected <number>, found \"* 4\""
        );
    }

    #[test]
    fn test_caret_preserves_tabs() {
        let input = "\tx y";
        let mut tracker = FailureTracker::new();
        tracker.record(3, Expected::EndOfInput);
        let d = Diagnostic::from_failure(input, &tracker, 5);
        assert_eq!(d.caret_line(), "\t  ^");
    }

    #[test]
    fn test_lookahead_truncated() {
        let input = "abcdefghijklmnop";
        let mut tracker = FailureTracker::new();
        tracker.record(2, Expected::EndOfInput);
        let d = Diagnostic::from_failure(input, &tracker, 4);
        assert_eq!(d.lookahead, "cdef");
    }

    #[test]
    fn test_one_or_more_display() {
        let e = Expected::OneOrMore("<item>".into());
        assert_eq!(e.to_string(), "one or more <item>");
    }

    #[test]
    fn test_grammar_error_display() {
        let e = GrammarError::UnknownReference {
            rule: "expr".into(),
            name: "atom".into(),
        };
        assert_eq!(e.to_string(), "Rule `expr` references unknown name `atom`");
    }
}
