//! Pegrow - Declarative Grammar Engine
//!
//! Rules are written as pattern strings, annotated with precedence,
//! associativity and unary role, and bound to semantic actions. The engine
//! parses input directly into the values those actions produce. It
//! provides:
//! - A small pattern language with captures, quantifiers, groups and
//!   default values
//! - Direct left recursion through seed growing
//! - Operator precedence climbing without stratified grammars
//! - Packrat memoization keyed by rule, position and precedence threshold
//! - `validate`/`transform` hooks that fall through to the next alternative
//! - Diagnostics pointing at the deepest failure, with line, column and caret
//!
//! ## Quick Start
//!
//! ```rust
//! use pegrow::prelude::*;
//!
//! fn num(args: &Args, name: &str) -> f64 {
//!     args[name].as_float().unwrap_or(0.0)
//! }
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("expr", AltSpec::new("<expr:l> '+' <expr:r>").precedence(10).left()
//!         .action(|a| Value::float(num(a, "l") + num(a, "r"))))
//!     .alt(AltSpec::new("<expr:l> '*' <expr:r>").precedence(20).left()
//!         .action(|a| Value::float(num(a, "l") * num(a, "r"))))
//!     .alt(AltSpec::new("'(' <expr> ')'"))
//!     .alt(AltSpec::new("<number>"))
//!     .token(Token::number("number"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(grammar.parse("1 + 2 * 3").unwrap(), Value::float(7.0));
//! assert_eq!(grammar.parse("2 * (3 + 4)").unwrap(), Value::float(14.0));
//!
//! let err = grammar.parse("2 * * 3").unwrap_err();
//! assert_eq!(err.diagnostic().unwrap().column(), 5);
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate
//! - `parallel` - Parse batches of inputs on the rayon thread pool

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(clippy::redundant_closure)]

// Prelude module for convenient imports
pub mod prelude;

pub mod cache;
mod capture;
pub mod error;
pub mod grammar;
pub mod literal;
pub mod parallel;
pub mod parser;
pub mod pattern;
pub mod regex_cache;
pub mod source_location;
pub mod token;
pub mod value;

/// Re-export commonly used types for convenience
pub use error::{Diagnostic, Expected, GrammarError, ParseError};
pub use grammar::{AltSpec, Alternative, Assoc, Grammar, GrammarBuilder, Rule, Transformed, Unary};
pub use parser::{ParseStats, Parser, ParserConfig};
pub use token::{BoundaryMode, Token};
pub use value::{Args, Value};
