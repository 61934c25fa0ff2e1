//! Parse engine
//!
//! Evaluates a [`Grammar`] against an input string. Rule invocations are
//! keyed by `(rule, position, minimum precedence)` and memoized in a
//! per-parse [`MemoTable`].
//!
//! # Left Recursion
//!
//! A rule is evaluated in two phases:
//!
//! 1. **Base round**: the alternatives that do not start with a bare
//!    self-reference are tried in declaration order. The first one that
//!    matches becomes the seed.
//! 2. **Growing**: the left-recursive alternatives whose precedence is at
//!    least the current threshold are tried in declaration order, each
//!    reusing the seed as its first element. The first match that ends
//!    further right than the seed replaces it, and the round repeats. A
//!    match that does not advance ends growing.
//!
//! While a rule is being evaluated its memo entry holds the current seed,
//! so a re-entrant call at the same key receives the seed instead of
//! recursing. Results that depended on a seed still being grown are not
//! memoized.
//!
//! # Precedence Climbing
//!
//! The right operand of a binary alternative at precedence `p` is parsed
//! with threshold `p + 1` (left-associative) or `p` (right-associative),
//! and the operand of a prefix alternative with threshold `p`. Only a
//! trailing bare self-reference counts as that operand; a trailing
//! reference to another rule starts that rule afresh.
//!
//! Every other reference is parsed with threshold 0. That includes inner
//! operands such as the middle of `<e> '?' <e> ':' <e>`, which are
//! enclosed by literals and need no threshold.
//!
//! # Example
//!
//! ```rust
//! use pegrow::grammar::{AltSpec, GrammarBuilder};
//! use pegrow::parser::{Parser, ParserConfig};
//! use pegrow::token::Token;
//! use pegrow::value::Value;
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("expr", AltSpec::new("<expr:l> '-' <expr:r>").precedence(10).left()
//!         .action(|a| Value::int(a["l"].as_int().unwrap_or(0) - a["r"].as_int().unwrap_or(0))))
//!     .alt(AltSpec::new("<number>"))
//!     .token(Token::number("number"))
//!     .build()
//!     .unwrap();
//!
//! let parser = Parser::with_config(&grammar, ParserConfig::new().with_memoize(false));
//! assert_eq!(parser.parse("1 - 2 - 3").unwrap(), Value::int(-4));
//! ```

use super::cache::{MemoEntry, MemoKey, MemoTable, Seed};
use super::capture::{self, Matched};
use super::error::{Diagnostic, Expected, FailureTracker, ParseError};
use super::grammar::{Alternative, Grammar, Target};
use super::pattern::{Element, Group, Quantifier, Repeat, Sequence};
use super::token::respects_word_boundary;
use super::value::Value;
use serde::{Deserialize, Serialize};

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

/// Default maximum input size: 100 MB
pub const DEFAULT_MAX_INPUT_SIZE: usize = 100 * 1024 * 1024;

/// Default maximum recursion depth
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 1000;

/// Stack space that must remain before a rule is evaluated
const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each stack segment allocated once the red zone is reached
const STACK_GROWTH: usize = 1024 * 1024;

/// Default number of characters shown after the failure position
pub const DEFAULT_LOOKAHEAD_LEN: usize = 10;

/// Configuration for a [`Parser`]
///
/// # Example
///
/// ```rust
/// use pegrow::parser::ParserConfig;
///
/// let config: ParserConfig = serde_json::from_str(
///     r#"{ "max_input_size": 1024, "max_recursion_depth": 200, "memoize": false, "lookahead_len": 5 }"#,
/// ).unwrap();
/// assert!(!config.memoize);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum allowed input size in bytes (0 = unlimited)
    pub max_input_size: usize,

    /// Maximum nesting of rule invocations (0 = unlimited)
    pub max_recursion_depth: usize,

    /// Whether finished rule results are memoized
    pub memoize: bool,

    /// Characters of input shown in a failure diagnostic
    pub lookahead_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            memoize: true,
            lookahead_len: DEFAULT_LOOKAHEAD_LEN,
        }
    }
}

impl ParserConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum input size
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// Set the maximum recursion depth
    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    /// Enable or disable memoization
    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Set the diagnostic lookahead length
    pub fn with_lookahead_len(mut self, len: usize) -> Self {
        self.lookahead_len = len;
        self
    }
}

/// Counters collected during one parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ParseStats {
    /// Memo lookups answered by a finished entry
    pub memo_hits: u64,
    /// Memo lookups that found nothing
    pub memo_misses: u64,
    /// Finished entries stored at the end of the parse
    pub memo_entries: usize,
    /// Accepted seed growth steps
    pub growth_steps: u64,
}

/// An active rule invocation
#[derive(Debug, Clone, Copy)]
struct Frame {
    key: MemoKey,
    /// Lowest frame index whose in-progress seed this invocation observed
    lowest_dependency: usize,
}

/// State for one parse
///
/// Created at the start of a parse and dropped at its end; never shared
/// between parses.
#[derive(Debug)]
pub struct ParseContext<'i> {
    input: &'i str,
    memo: MemoTable,
    failures: FailureTracker,
    frames: Vec<Frame>,
    depth: usize,
    growth_steps: u64,
}

impl<'i> ParseContext<'i> {
    /// Create a context for `input`
    pub fn new(input: &'i str, memoize: bool) -> Self {
        Self {
            input,
            memo: MemoTable::for_input(input.len(), memoize),
            failures: FailureTracker::new(),
            frames: Vec::new(),
            depth: 0,
            growth_steps: 0,
        }
    }

    /// The input being parsed
    pub fn input(&self) -> &'i str {
        self.input
    }

    /// The memo table
    pub fn memo(&self) -> &MemoTable {
        &self.memo
    }

    /// The deepest failure seen so far
    pub fn failures(&self) -> &FailureTracker {
        &self.failures
    }

    /// Counters collected so far
    pub fn stats(&self) -> ParseStats {
        let memo = self.memo.stats();
        ParseStats {
            memo_hits: memo.hits,
            memo_misses: memo.misses,
            memo_entries: memo.entries,
            growth_steps: self.growth_steps,
        }
    }
}

/// Parser over a shared grammar
///
/// A `Parser` holds no per-parse state; each call to [`parse`](Self::parse)
/// builds its own [`ParseContext`].
#[derive(Debug, Clone, Copy)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    config: ParserConfig,
}

impl<'g> Parser<'g> {
    /// Create a parser with the default configuration
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_config(grammar, ParserConfig::default())
    }

    /// Create a parser with a custom configuration
    pub fn with_config(grammar: &'g Grammar, config: ParserConfig) -> Self {
        Self { grammar, config }
    }

    /// The grammar being parsed
    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// The active configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `input` from the start rule
    ///
    /// The start rule must consume the whole input; trailing skippable text
    /// is allowed.
    ///
    /// # Errors
    /// - `ParseError::InputTooLarge` if the input exceeds `max_input_size`
    /// - `ParseError::RecursionLimitExceeded` if rule nesting exceeds
    ///   `max_recursion_depth`
    /// - `ParseError::Failed` with a diagnostic at the deepest failure
    pub fn parse(&self, input: &str) -> Result<Value, ParseError> {
        self.parse_with_stats(input).0
    }

    /// Parse `input` and also return memo and growth counters
    pub fn parse_with_stats(&self, input: &str) -> (Result<Value, ParseError>, ParseStats) {
        if self.config.max_input_size > 0 && input.len() > self.config.max_input_size {
            return (
                Err(ParseError::InputTooLarge {
                    input_size: input.len(),
                    max_size: self.config.max_input_size,
                }),
                ParseStats::default(),
            );
        }

        let mut engine = Engine {
            grammar: self.grammar,
            ctx: ParseContext::new(input, self.config.memoize),
            max_depth: self.config.max_recursion_depth,
        };

        log_debug!(
            "Starting parse: input_len={}, start_rule={}",
            input.len(),
            self.grammar.start_rule().name()
        );

        let result = engine.run(self.config.lookahead_len);
        let stats = engine.ctx.stats();

        log_debug!(
            "Parse finished: ok={}, memo_hits={}, growth_steps={}",
            result.is_ok(),
            stats.memo_hits,
            stats.growth_steps
        );

        (result, stats)
    }
}

/// Recursive evaluator bound to one context
struct Engine<'g, 'i> {
    grammar: &'g Grammar,
    ctx: ParseContext<'i>,
    max_depth: usize,
}

type Step<T> = Result<Option<T>, ParseError>;

impl<'g, 'i> Engine<'g, 'i> {
    fn run(&mut self, lookahead_len: usize) -> Result<Value, ParseError> {
        if let Some(seed) = self.parse_rule(self.grammar.start_index(), 0, 0)? {
            let end = self.skip(seed.end);
            if end == self.ctx.input.len() {
                return Ok(seed.value);
            }
            self.ctx.failures.record(end, Expected::EndOfInput);
        }

        Err(ParseError::Failed(Box::new(Diagnostic::from_failure(
            self.ctx.input,
            &self.ctx.failures,
            lookahead_len,
        ))))
    }

    /// Enter a rule invocation, checking depth limits
    #[inline]
    fn enter_recursive(&mut self) -> Result<(), ParseError> {
        self.ctx.depth += 1;
        if self.max_depth > 0 && self.ctx.depth > self.max_depth {
            return Err(ParseError::RecursionLimitExceeded {
                depth: self.ctx.depth,
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    /// Exit a rule invocation
    #[inline]
    fn exit_recursive(&mut self) {
        self.ctx.depth = self.ctx.depth.saturating_sub(1);
    }

    /// Evaluate rule `rule` at `pos` under threshold `min_prec`
    ///
    /// Grows the native stack on demand, so nesting is bounded by
    /// `max_recursion_depth` rather than by the thread's stack size.
    fn parse_rule(&mut self, rule: usize, pos: usize, min_prec: i32) -> Step<Seed> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.eval_rule(rule, pos, min_prec)
        })
    }

    fn eval_rule(&mut self, rule: usize, pos: usize, min_prec: i32) -> Step<Seed> {
        let key = MemoKey::new(rule, pos, min_prec);

        match self.ctx.memo.get(&key).cloned() {
            Some(MemoEntry::Success(seed)) => return Ok(Some(seed)),
            Some(MemoEntry::Failure) => return Ok(None),
            Some(MemoEntry::InProgress(seed)) => {
                self.note_dependency(key);
                return Ok(seed);
            }
            None => {}
        }

        if let Err(e) = self.enter_recursive() {
            self.exit_recursive();
            return Err(e);
        }
        self.ctx.memo.begin(key);
        let index = self.ctx.frames.len();
        self.ctx.frames.push(Frame {
            key,
            lowest_dependency: index,
        });

        let result = self.grow(key);

        let frame = self.ctx.frames.pop();
        self.exit_recursive();
        let result = result?;

        let lowest = frame.map_or(index, |f| f.lowest_dependency);
        self.ctx.memo.finish(key, result.as_ref(), lowest >= index);
        if let Some(parent) = self.ctx.frames.last_mut() {
            parent.lowest_dependency = parent.lowest_dependency.min(lowest);
        }
        Ok(result)
    }

    /// Record that the innermost invocation read the seed at `key`
    fn note_dependency(&mut self, key: MemoKey) {
        let owner = self.ctx.frames.iter().rposition(|f| f.key == key);
        if let (Some(owner), Some(top)) = (owner, self.ctx.frames.last_mut()) {
            top.lowest_dependency = top.lowest_dependency.min(owner);
        }
    }

    /// Base round, then seed growing
    fn grow(&mut self, key: MemoKey) -> Step<Seed> {
        let grammar = self.grammar;
        let rule = grammar.rule_at(key.rule);

        let mut seed = None;
        for alternative in rule.alternatives().iter().filter(|a| !a.is_left_recursive()) {
            if let Some(s) = self.try_alternative(rule.name(), alternative, key.pos, None)? {
                seed = Some(s);
                break;
            }
        }

        let mut seed = match seed {
            Some(seed) => seed,
            None => return Ok(None),
        };
        log_trace!("{}@{}: base match ends at {}", rule.name(), key.pos, seed.end);

        loop {
            self.ctx.memo.update_seed(key, seed.clone());

            let mut grown = None;
            for alternative in rule
                .alternatives()
                .iter()
                .filter(|a| a.is_left_recursive() && a.precedence() >= key.min_prec)
            {
                if let Some(s) = self.try_alternative(rule.name(), alternative, key.pos, Some(&seed))? {
                    grown = Some(s);
                    break;
                }
            }

            match grown {
                Some(next) if next.end > seed.end => {
                    log_trace!("{}@{}: seed grows to {}", rule.name(), key.pos, next.end);
                    self.ctx.growth_steps += 1;
                    seed = next;
                }
                Some(_) => {
                    log_debug!("{}@{}: growth made no progress, stopping", rule.name(), key.pos);
                    break;
                }
                None => break,
            }
        }

        Ok(Some(seed))
    }

    /// Match one alternative starting at `pos`
    ///
    /// With a `seed`, the first element is taken to be the seed itself.
    fn try_alternative(
        &mut self,
        rule_name: &str,
        alternative: &Alternative,
        pos: usize,
        seed: Option<&Seed>,
    ) -> Step<Seed> {
        let sequence = alternative.sequence();
        let mut matched = Vec::with_capacity(sequence.len());
        let mut cur = pos;
        let mut skip = 0;

        if let Some(seed) = seed {
            matched.push(Matched::Value(seed.value.clone()));
            cur = seed.end;
            skip = 1;
        }

        let threshold = alternative.threshold_operand();
        for (i, element) in sequence.iter().enumerate().skip(skip) {
            let min_prec = match threshold {
                Some((index, prec)) if index == i => prec,
                _ => 0,
            };
            match self.match_element(element, cur, min_prec)? {
                Some((end, m)) => {
                    matched.push(m);
                    cur = end;
                }
                None => return Ok(None),
            }
        }

        let args = capture::build_args(sequence, &matched, alternative.captures_anonymous());
        match capture::apply(alternative, args) {
            Some(value) => Ok(Some(Seed::new(value, cur))),
            None => {
                let at = self.skip(pos);
                self.ctx.failures.record(at, Expected::Rule(rule_name.to_string()));
                Ok(None)
            }
        }
    }

    fn match_element(&mut self, element: &Element, pos: usize, min_prec: i32) -> Step<(usize, Matched)> {
        match element {
            Element::Literal(text) => Ok(self.match_literal(text, pos).map(|end| (end, Matched::Literal))),
            Element::Reference(r) => {
                let (end, value) = match r.quantifier {
                    Quantifier::One => match self.match_reference(&r.name, pos, min_prec)? {
                        Some(found) => found,
                        None => return Ok(None),
                    },
                    Quantifier::Optional => self
                        .match_reference(&r.name, pos, min_prec)?
                        .unwrap_or((pos, Value::Absent)),
                    Quantifier::ZeroOrMore | Quantifier::OneOrMore => {
                        let mut items = Vec::new();
                        let mut cur = pos;
                        while let Some((end, value)) = self.match_reference(&r.name, cur, 0)? {
                            items.push(value);
                            let stalled = end == cur;
                            cur = end;
                            if stalled {
                                break;
                            }
                        }
                        if items.is_empty() && r.quantifier == Quantifier::OneOrMore {
                            return Ok(None);
                        }
                        (cur, Value::List(items))
                    }
                };
                Ok(Some((end, Matched::Value(value))))
            }
            Element::Group(g) => self.match_group(g, pos),
        }
    }

    fn match_group(&mut self, group: &Group, pos: usize) -> Step<(usize, Matched)> {
        let mut repetitions = Vec::new();
        let mut cur = pos;

        while let Some((end, matched)) = self.match_sequence(&group.body, cur)? {
            if end == cur && !repetitions.is_empty() {
                break;
            }
            repetitions.push(matched);
            let stalled = end == cur;
            cur = end;
            if stalled {
                break;
            }
        }

        if repetitions.is_empty() && group.repeat == Repeat::OneOrMore {
            let at = self.skip(pos);
            self.ctx
                .failures
                .record(at, Expected::OneOrMore(group.body.to_string()));
            return Ok(None);
        }
        Ok(Some((cur, Matched::Group(repetitions))))
    }

    fn match_sequence(&mut self, sequence: &Sequence, pos: usize) -> Step<(usize, Vec<Matched>)> {
        let mut matched = Vec::with_capacity(sequence.len());
        let mut cur = pos;
        for element in sequence.iter() {
            match self.match_element(element, cur, 0)? {
                Some((end, m)) => {
                    matched.push(m);
                    cur = end;
                }
                None => return Ok(None),
            }
        }
        Ok(Some((cur, matched)))
    }

    fn match_reference(&mut self, name: &str, pos: usize, min_prec: i32) -> Step<(usize, Value)> {
        match self.grammar.resolve(name) {
            Some(Target::Rule(index)) => Ok(self
                .parse_rule(index, pos, min_prec)?
                .map(|seed| (seed.end, seed.value))),
            Some(Target::Token(index)) => Ok(self.match_token(index, pos)),
            None => Ok(None),
        }
    }

    fn match_token(&mut self, index: usize, pos: usize) -> Option<(usize, Value)> {
        let grammar = self.grammar;
        let token = grammar.token_at(index);
        let at = self.skip(pos);
        let found = token.match_at(self.ctx.input, at);
        if found.is_none() {
            self.ctx.failures.record(at, Expected::Token(token.name.clone()));
        }
        found
    }

    fn match_literal(&mut self, text: &str, pos: usize) -> Option<usize> {
        let at = self.skip(pos);
        let input = self.ctx.input;
        let end = at + text.len();
        if input[at..].starts_with(text) && respects_word_boundary(input, at, end) {
            return Some(end);
        }
        self.ctx.failures.record(at, Expected::Literal(text.to_string()));
        None
    }

    /// Position after skippable text at `pos`
    fn skip(&self, pos: usize) -> usize {
        match self.grammar.skip() {
            Some(re) => re
                .find(&self.ctx.input[pos..])
                .map_or(pos, |m| pos + m.end()),
            None => pos,
        }
    }
}
