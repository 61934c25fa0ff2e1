//! Grammar registry
//!
//! A [`Grammar`] maps rule names to ordered alternatives and holds the
//! token table. It is assembled once with a [`GrammarBuilder`] and is
//! immutable afterwards, so one grammar can serve any number of parses,
//! including concurrent ones.
//!
//! # Example
//!
//! ```rust
//! use pegrow::grammar::{AltSpec, GrammarBuilder};
//! use pegrow::token::Token;
//! use pegrow::value::Value;
//!
//! let grammar = GrammarBuilder::new()
//!     .rule(
//!         "expr",
//!         AltSpec::new("<expr:l> '+' <expr:r>")
//!             .precedence(10)
//!             .left()
//!             .action(|a| Value::int(a["l"].as_int().unwrap_or(0) + a["r"].as_int().unwrap_or(0))),
//!     )
//!     .alt(AltSpec::new("<number>"))
//!     .token(Token::number("number"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(grammar.parse("1 + 2 + 3").unwrap(), Value::int(6));
//! ```

use super::error::{GrammarError, ParseError};
use super::parser::Parser;
use super::pattern::{self, Element, Quantifier, Repeat, Sequence};
use super::regex_cache;
use super::token::{CompiledToken, Token};
use super::value::{Args, Value};
use ahash::RandomState;
use hashbrown::HashMap;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Default skip pattern applied before literals and tokens
pub const DEFAULT_SKIP: &str = r"\s*";

/// Operator associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assoc {
    /// Left-associative: a - b - c = (a - b) - c
    Left,
    /// Right-associative: a ^ b ^ c = a ^ (b ^ c)
    Right,
    /// No declared associativity; operands group like `Left`
    #[default]
    NonAssoc,
}

/// Unary operator role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unary {
    /// Operator before its operand: `- <expr>`
    Prefix,
    /// Operator after its operand: `<expr> !`
    Postfix,
}

/// Result of a `transform` hook
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed {
    /// Replacement argument list
    Args(Args),
    /// A single value, passed to the action as its only argument
    Value(Value),
    /// Treat the alternative as not matched
    Reject,
}

/// Semantic action: built arguments to result value
pub type ActionFn = Arc<dyn Fn(&Args) -> Value + Send + Sync>;

/// Validation hook: `false` rejects the match
pub type ValidateFn = Arc<dyn Fn(&Args) -> bool + Send + Sync>;

/// Transformation hook applied to the raw arguments before the action
pub type TransformFn = Arc<dyn Fn(Args) -> Transformed + Send + Sync>;

/// Registration record for one alternative
///
/// Everything except the pattern is optional: precedence defaults to 0,
/// associativity to [`Assoc::NonAssoc`], no unary role, no hooks, anonymous
/// captures off, and the pass-through action (a single argument is returned
/// as is, several are returned as a tuple). Without an explicit action,
/// anonymous captures are always on so `'(' <expr> ')'` passes `expr`
/// through.
#[derive(Clone)]
pub struct AltSpec {
    pattern: String,
    name: Option<String>,
    precedence: i32,
    assoc: Assoc,
    unary: Option<Unary>,
    transform: Option<TransformFn>,
    validate: Option<ValidateFn>,
    capture_anon: bool,
    action: Option<ActionFn>,
}

impl AltSpec {
    /// Start a registration for `pattern`
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            name: None,
            precedence: 0,
            assoc: Assoc::NonAssoc,
            unary: None,
            transform: None,
            validate: None,
            capture_anon: false,
            action: None,
        }
    }

    /// Explicit rule name; must agree with a `<NAME> ::=` prefix if both exist
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the precedence (higher binds tighter)
    pub fn precedence(mut self, precedence: i32) -> Self {
        self.precedence = precedence;
        self
    }

    /// Set the associativity
    pub fn assoc(mut self, assoc: Assoc) -> Self {
        self.assoc = assoc;
        self
    }

    /// Shorthand for `assoc(Assoc::Left)`
    pub fn left(self) -> Self {
        self.assoc(Assoc::Left)
    }

    /// Shorthand for `assoc(Assoc::Right)`
    pub fn right(self) -> Self {
        self.assoc(Assoc::Right)
    }

    /// Mark as a prefix operator
    pub fn prefix(mut self) -> Self {
        self.unary = Some(Unary::Prefix);
        self
    }

    /// Mark as a postfix operator
    pub fn postfix(mut self) -> Self {
        self.unary = Some(Unary::Postfix);
        self
    }

    /// Pass anonymous references to the action as trailing positional
    /// arguments
    pub fn capture_anon(mut self, enabled: bool) -> Self {
        self.capture_anon = enabled;
        self
    }

    /// Set the `validate` hook
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Args) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(f));
        self
    }

    /// Set the `transform` hook
    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Args) -> Transformed + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(f));
        self
    }

    /// Set the semantic action
    pub fn action<F>(mut self, f: F) -> Self
    where
        F: Fn(&Args) -> Value + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for AltSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AltSpec")
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .field("precedence", &self.precedence)
            .field("assoc", &self.assoc)
            .field("unary", &self.unary)
            .field("capture_anon", &self.capture_anon)
            .finish_non_exhaustive()
    }
}

/// A compiled alternative
#[derive(Clone)]
pub struct Alternative {
    pattern: String,
    sequence: Sequence,
    precedence: i32,
    assoc: Assoc,
    unary: Option<Unary>,
    pub(crate) transform: Option<TransformFn>,
    pub(crate) validate: Option<ValidateFn>,
    capture_anon: bool,
    pub(crate) action: Option<ActionFn>,
    left_recursive: bool,
    threshold_operand: Option<(usize, i32)>,
}

impl Alternative {
    fn new(rule: &str, alt: AltSpec, sequence: Sequence) -> Self {
        let left_recursive = matches!(
            sequence.first(),
            Some(Element::Reference(r)) if r.is_bare_reference_to(rule)
        );

        let last = sequence.len() - 1;
        let last_is_self = matches!(
            sequence.elements.get(last),
            Some(Element::Reference(r)) if r.is_bare_reference_to(rule)
        );

        let threshold_operand = if left_recursive {
            match alt.unary {
                Some(Unary::Postfix) => None,
                _ if last > 0 && last_is_self => {
                    let min_prec = match alt.assoc {
                        Assoc::Right => alt.precedence,
                        Assoc::Left | Assoc::NonAssoc => alt.precedence.saturating_add(1),
                    };
                    Some((last, min_prec))
                }
                _ => None,
            }
        } else if alt.unary == Some(Unary::Prefix) && last > 0 && last_is_self {
            Some((last, alt.precedence))
        } else {
            None
        };

        Self {
            pattern: alt.pattern,
            sequence,
            precedence: alt.precedence,
            assoc: alt.assoc,
            unary: alt.unary,
            transform: alt.transform,
            validate: alt.validate,
            capture_anon: alt.capture_anon || alt.action.is_none(),
            action: alt.action,
            left_recursive,
            threshold_operand,
        }
    }

    /// The pattern string as registered
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled pattern body
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Precedence level
    pub fn precedence(&self) -> i32 {
        self.precedence
    }

    /// Associativity
    pub fn assoc(&self) -> Assoc {
        self.assoc
    }

    /// Unary role, if any
    pub fn unary(&self) -> Option<Unary> {
        self.unary
    }

    /// Whether anonymous references are captured
    pub fn captures_anonymous(&self) -> bool {
        self.capture_anon
    }

    /// Whether the first element is a bare reference to the owning rule
    pub fn is_left_recursive(&self) -> bool {
        self.left_recursive
    }

    /// Element index parsed with a precedence threshold, and that threshold
    pub(crate) fn threshold_operand(&self) -> Option<(usize, i32)> {
        self.threshold_operand
    }
}

impl fmt::Debug for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alternative")
            .field("pattern", &self.pattern)
            .field("precedence", &self.precedence)
            .field("assoc", &self.assoc)
            .field("unary", &self.unary)
            .field("left_recursive", &self.left_recursive)
            .finish_non_exhaustive()
    }
}

/// A named rule with its alternatives in declaration order
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    alternatives: Vec<Alternative>,
}

impl Rule {
    /// Rule name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternatives in declaration order
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }
}

/// What a reference name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Rule(usize),
    Token(usize),
}

/// An assembled, immutable grammar
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
    rule_index: HashMap<String, usize, RandomState>,
    tokens: Vec<CompiledToken>,
    token_index: HashMap<String, usize, RandomState>,
    start: usize,
    skip: Option<Regex>,
}

impl Grammar {
    /// All rules, in first-declaration order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Look up a rule by name
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rule_index.get(name).map(|&i| &self.rules[i])
    }

    /// The start rule
    pub fn start_rule(&self) -> &Rule {
        &self.rules[self.start]
    }

    /// Number of declared tokens
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Check if `name` is a declared token
    pub fn has_token(&self, name: &str) -> bool {
        self.token_index.contains_key(name)
    }

    /// Parse `input` from the start rule with the default configuration
    ///
    /// # Errors
    /// See [`Parser::parse`].
    pub fn parse(&self, input: &str) -> Result<Value, ParseError> {
        Parser::new(self).parse(input)
    }

    pub(crate) fn start_index(&self) -> usize {
        self.start
    }

    pub(crate) fn rule_at(&self, index: usize) -> &Rule {
        &self.rules[index]
    }

    pub(crate) fn token_at(&self, index: usize) -> &CompiledToken {
        &self.tokens[index]
    }

    pub(crate) fn skip(&self) -> Option<&Regex> {
        self.skip.as_ref()
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<Target> {
        if let Some(&i) = self.rule_index.get(name) {
            return Some(Target::Rule(i));
        }
        self.token_index.get(name).map(|&i| Target::Token(i))
    }
}

/// Builder for [`Grammar`]
///
/// Registration methods chain by value. Definition errors are kept and
/// reported by [`build`](Self::build); the first one wins.
#[derive(Debug)]
pub struct GrammarBuilder {
    rules: Vec<Rule>,
    rule_index: HashMap<String, usize, RandomState>,
    tokens: Vec<Token>,
    current_rule: Option<String>,
    start: Option<String>,
    skip: Option<String>,
    error: Option<GrammarError>,
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            rule_index: HashMap::with_hasher(RandomState::new()),
            tokens: Vec::new(),
            current_rule: None,
            start: None,
            skip: Some(DEFAULT_SKIP.to_string()),
            error: None,
        }
    }

    /// Add an alternative to rule `name`
    ///
    /// A `<NAME> ::=` prefix in the pattern takes precedence over `name`.
    pub fn rule(self, name: impl Into<String>, alt: AltSpec) -> Self {
        let fallback = name.into();
        self.register(Some(fallback), alt)
    }

    /// Add an alternative to the rule named by the pattern's `<NAME> ::=`
    /// prefix, an explicit `AltSpec::name`, or else the most recently
    /// registered rule
    pub fn alt(self, alt: AltSpec) -> Self {
        let fallback = self.current_rule.clone();
        self.register(fallback, alt)
    }

    /// Declare a token
    pub fn token(mut self, token: Token) -> Self {
        self.tokens.push(token);
        self
    }

    /// Set the start rule (defaults to the first declared rule)
    pub fn start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Set the regex skipped before every literal and token
    pub fn skip(mut self, pattern: impl Into<String>) -> Self {
        self.skip = Some(pattern.into());
        self
    }

    /// Match literals and tokens exactly where they are, with no skipping
    pub fn no_skip(mut self) -> Self {
        self.skip = None;
        self
    }

    fn register(mut self, fallback: Option<String>, alt: AltSpec) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.add_alternative(fallback, alt) {
            Ok(name) => self.current_rule = Some(name),
            Err(e) => self.error = Some(e),
        }
        self
    }

    fn add_alternative(
        &mut self,
        fallback: Option<String>,
        alt: AltSpec,
    ) -> Result<String, GrammarError> {
        let compiled = pattern::compile(&alt.pattern)?;

        let name = match (compiled.rule_name, alt.name.clone()) {
            (Some(pattern_name), Some(declared_name)) if pattern_name != declared_name => {
                return Err(GrammarError::ConflictingRuleName {
                    pattern_name,
                    declared_name,
                });
            }
            (Some(pattern_name), _) => pattern_name,
            (None, Some(declared_name)) => declared_name,
            (None, None) => fallback.ok_or_else(|| GrammarError::MissingRuleName {
                pattern: alt.pattern.clone(),
            })?,
        };

        check_left_recursion(&name, &alt.pattern, &compiled.sequence)?;

        let index = match self.rule_index.get(&name) {
            Some(&i) => i,
            None => {
                self.rules.push(Rule {
                    name: name.clone(),
                    alternatives: Vec::new(),
                });
                self.rule_index.insert(name.clone(), self.rules.len() - 1);
                self.rules.len() - 1
            }
        };

        let alternative = Alternative::new(&name, alt, compiled.sequence);
        self.rules[index].alternatives.push(alternative);
        Ok(name)
    }

    /// Validate and assemble the grammar
    ///
    /// # Errors
    /// Returns the first registration error, or a validation error:
    /// `EmptyGrammar`, `DuplicateToken`, `NameClash`, `InvalidRegex`,
    /// `UnknownReference` or `UnknownStartRule`.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.rules.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }

        let mut token_index = HashMap::with_hasher(RandomState::new());
        let mut tokens = Vec::with_capacity(self.tokens.len());
        for token in &self.tokens {
            if token_index.contains_key(token.name()) {
                return Err(GrammarError::DuplicateToken {
                    name: token.name().to_string(),
                });
            }
            if self.rule_index.contains_key(token.name()) {
                return Err(GrammarError::NameClash {
                    name: token.name().to_string(),
                });
            }
            token_index.insert(token.name().to_string(), tokens.len());
            tokens.push(CompiledToken::compile(token)?);
        }

        for rule in &self.rules {
            for alternative in &rule.alternatives {
                for name in alternative.sequence.reference_names() {
                    if !self.rule_index.contains_key(name) && !token_index.contains_key(name) {
                        return Err(GrammarError::UnknownReference {
                            rule: rule.name.clone(),
                            name: name.to_string(),
                        });
                    }
                }
            }
        }

        let start = match &self.start {
            Some(name) => *self
                .rule_index
                .get(name)
                .ok_or_else(|| GrammarError::UnknownStartRule { name: name.clone() })?,
            None => 0,
        };

        let skip = match &self.skip {
            Some(pattern) => Some(
                regex_cache::get_or_compile(&format!("^(?:{})", pattern)).map_err(|e| {
                    GrammarError::InvalidRegex {
                        name: "<skip>".to_string(),
                        message: e.to_string(),
                    }
                })?,
            ),
            None => None,
        };

        Ok(Grammar {
            rules: self.rules,
            rule_index: self.rule_index,
            tokens,
            token_index,
            start,
            skip,
        })
    }
}

/// Reject self-references that can be reached without consuming input
/// other than a leading bare one
fn check_left_recursion(rule: &str, pattern: &str, sequence: &Sequence) -> Result<(), GrammarError> {
    let invalid = || GrammarError::InvalidLeftRecursion {
        rule: rule.to_string(),
        pattern: pattern.to_string(),
    };

    for (i, element) in sequence.iter().enumerate() {
        match element {
            Element::Reference(r) if r.name == rule => {
                if i == 0 && r.quantifier == Quantifier::One {
                    return Ok(());
                }
                return Err(invalid());
            }
            Element::Reference(r) => {
                if !matches!(r.quantifier, Quantifier::Optional | Quantifier::ZeroOrMore) {
                    return Ok(());
                }
            }
            Element::Group(g) => {
                if check_left_recursion(rule, pattern, &g.body).is_err()
                    || starts_with_self(rule, &g.body)
                {
                    return Err(invalid());
                }
                if g.repeat == Repeat::OneOrMore {
                    return Ok(());
                }
            }
            Element::Literal(_) => return Ok(()),
        }
    }
    Ok(())
}

fn starts_with_self(rule: &str, sequence: &Sequence) -> bool {
    matches!(sequence.first(), Some(Element::Reference(r)) if r.name == rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_grammar() -> GrammarBuilder {
        GrammarBuilder::new().token(Token::number("number"))
    }

    #[test]
    fn test_rule_name_sources() {
        let grammar = number_grammar()
            .rule("expr", AltSpec::new("<number>"))
            .alt(AltSpec::new("'(' <expr> ')'"))
            .alt(AltSpec::new("<atom> ::= <number>"))
            .alt(AltSpec::new("'x'"))
            .build()
            .unwrap();

        assert_eq!(grammar.rules().len(), 2);
        assert_eq!(grammar.rule("expr").unwrap().alternatives().len(), 2);
        assert_eq!(grammar.rule("atom").unwrap().alternatives().len(), 2);
        assert_eq!(grammar.start_rule().name(), "expr");
    }

    #[test]
    fn test_pattern_prefix_overrides_rule_argument() {
        let grammar = number_grammar()
            .rule("expr", AltSpec::new("<number>"))
            .rule("expr", AltSpec::new("<term> ::= <number>"))
            .build()
            .unwrap();
        assert!(grammar.rule("term").is_some());
    }

    #[test]
    fn test_conflicting_rule_name() {
        let err = number_grammar()
            .alt(AltSpec::new("<term> ::= <number>").name("factor"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::ConflictingRuleName {
                pattern_name: "term".into(),
                declared_name: "factor".into(),
            }
        );
    }

    #[test]
    fn test_missing_rule_name() {
        let err = number_grammar().alt(AltSpec::new("<number>")).build().unwrap_err();
        assert!(matches!(err, GrammarError::MissingRuleName { .. }));
    }

    #[test]
    fn test_left_recursion_classification() {
        let grammar = number_grammar()
            .rule("expr", AltSpec::new("<expr:l> '+' <expr:r>").precedence(10).left())
            .alt(AltSpec::new("<expr:l> '^' <expr:r>").precedence(30).right())
            .alt(AltSpec::new("<expr:x> '!'").precedence(40).postfix())
            .alt(AltSpec::new("'-' <expr:x>").precedence(20).prefix())
            .alt(AltSpec::new("'(' <expr> ')'"))
            .alt(AltSpec::new("<number>"))
            .build()
            .unwrap();

        let alts = grammar.rule("expr").unwrap().alternatives();
        assert!(alts[0].is_left_recursive());
        assert_eq!(alts[0].threshold_operand(), Some((2, 11)));
        assert_eq!(alts[1].threshold_operand(), Some((2, 30)));
        assert!(alts[2].is_left_recursive());
        assert_eq!(alts[2].threshold_operand(), None);
        assert!(!alts[3].is_left_recursive());
        assert_eq!(alts[3].threshold_operand(), Some((1, 20)));
        assert_eq!(alts[4].threshold_operand(), None);
        assert!(!alts[5].is_left_recursive());
    }

    #[test]
    fn test_threshold_only_for_trailing_self_reference() {
        let grammar = number_grammar()
            .rule("sum", AltSpec::new("<sum:l> '+' <product:r>").precedence(10).left())
            .alt(AltSpec::new("<sum:c> '?' <sum:t> ':' <sum:e>").precedence(5).right())
            .alt(AltSpec::new("<product>"))
            .rule("product", AltSpec::new("<number>"))
            .build()
            .unwrap();

        let alts = grammar.rule("sum").unwrap().alternatives();
        assert!(alts[0].is_left_recursive());
        assert_eq!(alts[0].threshold_operand(), None);
        assert_eq!(alts[1].threshold_operand(), Some((4, 5)));
    }

    #[test]
    fn test_optional_leading_self_reference_rejected() {
        let err = number_grammar()
            .rule("list", AltSpec::new("<list?> ',' <number>"))
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::InvalidLeftRecursion { .. }));

        let err = number_grammar()
            .rule("list", AltSpec::new("<number*> <list> ','"))
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::InvalidLeftRecursion { .. }));

        let err = number_grammar()
            .rule("list", AltSpec::new("[ <list> ',' ] <number>"))
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::InvalidLeftRecursion { .. }));
    }

    #[test]
    fn test_unknown_reference() {
        let err = number_grammar()
            .rule("expr", AltSpec::new("<atom>"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::UnknownReference {
                rule: "expr".into(),
                name: "atom".into(),
            }
        );
    }

    #[test]
    fn test_token_validation() {
        let err = number_grammar()
            .token(Token::number("number"))
            .rule("expr", AltSpec::new("<number>"))
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::DuplicateToken { .. }));

        let err = GrammarBuilder::new()
            .token(Token::new("expr", "x"))
            .rule("expr", AltSpec::new("'y'"))
            .build()
            .unwrap_err();
        assert_eq!(err, GrammarError::NameClash { name: "expr".into() });
    }

    #[test]
    fn test_start_rule_and_empty_grammar() {
        assert_eq!(GrammarBuilder::new().build().unwrap_err(), GrammarError::EmptyGrammar);

        let err = number_grammar()
            .rule("expr", AltSpec::new("<number>"))
            .start("program")
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::UnknownStartRule { .. }));

        let grammar = number_grammar()
            .rule("expr", AltSpec::new("<number>"))
            .rule("program", AltSpec::new("<expr> ';'"))
            .start("program")
            .build()
            .unwrap();
        assert_eq!(grammar.start_rule().name(), "program");
    }

    #[test]
    fn test_invalid_skip_regex() {
        let err = number_grammar()
            .rule("expr", AltSpec::new("<number>"))
            .skip("(")
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::InvalidRegex { ref name, .. } if name == "<skip>"));
    }

    #[test]
    fn test_first_error_wins() {
        let err = number_grammar()
            .rule("expr", AltSpec::new("<a:x> <b:x>"))
            .rule("expr", AltSpec::new("'unterminated"))
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::DuplicateCapture { .. }));
    }
}
