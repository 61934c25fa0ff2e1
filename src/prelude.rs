//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from pegrow.
//! Importing this module with a wildcard import brings the core types into scope:
//!
//! ```
//! use pegrow::prelude::*;
//! ```
//!
//! # Re-exported Items
//!
//! ## Grammar Definition
//! - [`GrammarBuilder`] - Builder for constructing grammars
//! - [`AltSpec`] - Registration record for one alternative
//! - [`Assoc`] - Operator associativity
//! - [`Unary`] - Prefix/postfix role
//! - [`Transformed`] - Result of a `transform` hook
//! - [`Token`] - Token declaration
//! - [`BoundaryMode`] - Word-boundary handling for tokens
//!
//! ## Parsing
//! - [`Grammar`] - Assembled grammar
//! - [`Parser`] - Parser over a grammar
//! - [`ParserConfig`] - Parser limits and options
//!
//! ## Values
//! - [`Value`] - Semantic value
//! - [`Args`] - Arguments passed to actions
//!
//! ## Error Handling
//! - [`GrammarError`] - Grammar definition error
//! - [`ParseError`] - Parse error
//! - [`Diagnostic`] - Rendered failure report

// ============================================================================
// Grammar Definition
// ============================================================================

pub use crate::grammar::{AltSpec, Assoc, GrammarBuilder, Transformed, Unary};
pub use crate::token::{BoundaryMode, Token};

// ============================================================================
// Parsing
// ============================================================================

pub use crate::grammar::Grammar;
pub use crate::parser::{Parser, ParserConfig};

// ============================================================================
// Values
// ============================================================================

pub use crate::value::{Args, Value};

// ============================================================================
// Error Handling
// ============================================================================

pub use crate::error::{Diagnostic, GrammarError, ParseError};
