//! Batch parsing
//!
//! Parses many independent inputs against one shared [`Grammar`]. Each
//! input gets its own parse context, so nothing is shared between parses
//! except the immutable grammar.
//!
//! # Feature Flag
//!
//! With the `parallel` feature the batch is spread over the rayon thread
//! pool; without it the inputs are parsed one after another. Results come
//! back in input order either way.
//!
//! ```toml
//! [dependencies]
//! pegrow = { version = "0.1", features = ["parallel"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use pegrow::grammar::{AltSpec, GrammarBuilder};
//! use pegrow::parallel::parse_batch;
//! use pegrow::token::Token;
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("start", AltSpec::new("<number>"))
//!     .token(Token::number("number"))
//!     .build()
//!     .unwrap();
//!
//! let results = parse_batch(&grammar, &["1", "x", "3.5"]);
//! assert_eq!(results.len(), 3);
//! assert!(results[1].is_err());
//! ```

use super::error::ParseError;
use super::grammar::Grammar;
use super::parser::{Parser, ParserConfig};
use super::value::Value;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Parse every input with the default configuration
pub fn parse_batch(grammar: &Grammar, inputs: &[&str]) -> Vec<Result<Value, ParseError>> {
    parse_batch_with_config(grammar, inputs, ParserConfig::default())
}

/// Parse every input with `config`
#[cfg(feature = "parallel")]
pub fn parse_batch_with_config(
    grammar: &Grammar,
    inputs: &[&str],
    config: ParserConfig,
) -> Vec<Result<Value, ParseError>> {
    let parser = Parser::with_config(grammar, config);
    inputs.par_iter().map(|input| parser.parse(input)).collect()
}

/// Parse every input with `config` (sequential fallback)
#[cfg(not(feature = "parallel"))]
pub fn parse_batch_with_config(
    grammar: &Grammar,
    inputs: &[&str],
    config: ParserConfig,
) -> Vec<Result<Value, ParseError>> {
    let parser = Parser::with_config(grammar, config);
    inputs.iter().map(|input| parser.parse(input)).collect()
}

/// Parse owned inputs
pub fn parse_batch_owned(grammar: &Grammar, inputs: Vec<String>) -> Vec<Result<Value, ParseError>> {
    let refs: Vec<&str> = inputs.iter().map(String::as_str).collect();
    parse_batch(grammar, &refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{AltSpec, GrammarBuilder};
    use crate::token::Token;

    fn sum_grammar() -> Grammar {
        GrammarBuilder::new()
            .rule(
                "sum",
                AltSpec::new("<sum:l> '+' <sum:r>").precedence(1).left().action(|a| {
                    Value::int(a["l"].as_int().unwrap_or(0) + a["r"].as_int().unwrap_or(0))
                }),
            )
            .alt(AltSpec::new("<number>"))
            .token(Token::number("number"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_batch_keeps_order() {
        let grammar = sum_grammar();
        let inputs = ["1+2", "10+20+30", "+", "7"];
        let results = parse_batch(&grammar, &inputs);

        assert_eq!(results[0], Ok(Value::int(3)));
        assert_eq!(results[1], Ok(Value::int(60)));
        assert!(results[2].is_err());
        assert_eq!(results[3], Ok(Value::int(7)));
    }

    #[test]
    fn test_batch_matches_single_parses() {
        let grammar = sum_grammar();
        let inputs: Vec<String> = (0..50).map(|i| format!("{}+{}", i, i * 2)).collect();
        let batch = parse_batch_owned(&grammar, inputs.clone());

        for (input, result) in inputs.iter().zip(batch) {
            assert_eq!(result, grammar.parse(input));
        }
    }

    #[test]
    fn test_batch_with_config() {
        let grammar = sum_grammar();
        let config = ParserConfig::new().with_max_input_size(3);
        let results = parse_batch_with_config(&grammar, &["1+2", "1+2+3"], config);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ParseError::InputTooLarge { .. })));
    }
}
