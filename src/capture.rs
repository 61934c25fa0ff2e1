//! Capture builder
//!
//! Turns the elements matched by one alternative into the [`Args`] handed
//! to its hooks and action.
//!
//! # Argument Order
//!
//! Named captures come first, in source order. With anonymous capture
//! enabled, unnamed references and groups follow them, also in source
//! order. Literals never contribute.
//!
//! # Groups
//!
//! A group contributes a `List` with one entry per repetition. Inside a
//! group every reference and nested group captures, named or not; a
//! repetition that captured exactly one value contributes that value, any
//! other count contributes a `Tuple`.

use super::grammar::{Alternative, Transformed};
use super::pattern::{Element, Sequence};
use super::value::{Args, Value};

/// What one pattern element matched
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Matched {
    /// A literal; carries no value
    Literal,
    /// A reference's value (`List` for `*`/`+`, `Absent` for a missing `?`)
    Value(Value),
    /// One entry per group repetition, each aligned with the group body
    Group(Vec<Vec<Matched>>),
}

/// Build the raw argument list for a fully matched sequence
pub(crate) fn build_args(sequence: &Sequence, matched: &[Matched], capture_anon: bool) -> Args {
    let mut args = Args::new();
    let mut anonymous = Vec::new();

    for (element, m) in sequence.iter().zip(matched) {
        let value = match element_value(element, m) {
            Some(value) => value,
            None => continue,
        };
        match element.capture() {
            Some(name) => args.push_named(name, value),
            None if capture_anon => anonymous.push(value),
            None => {}
        }
    }

    for value in anonymous {
        args.push_positional(value);
    }
    args
}

/// The value an element contributes, with defaults substituted
fn element_value(element: &Element, matched: &Matched) -> Option<Value> {
    match (element, matched) {
        (Element::Literal(_), _) => None,
        (Element::Reference(r), Matched::Value(value)) => match (&r.default, value) {
            (Some(default), Value::Absent) => Some(default.clone()),
            _ => Some(value.clone()),
        },
        (Element::Group(g), Matched::Group(repetitions)) => Some(Value::List(
            repetitions
                .iter()
                .map(|rep| repetition_value(&g.body, rep))
                .collect(),
        )),
        _ => None,
    }
}

fn repetition_value(body: &Sequence, matched: &[Matched]) -> Value {
    let mut captured: Vec<Value> = body
        .iter()
        .zip(matched)
        .filter_map(|(element, m)| element_value(element, m))
        .collect();

    if captured.len() == 1 {
        captured.pop().unwrap_or_default()
    } else {
        Value::Tuple(captured)
    }
}

/// Run `validate`, `transform` and the action
///
/// Returns `None` when a hook rejects the match.
pub(crate) fn apply(alternative: &Alternative, args: Args) -> Option<Value> {
    if let Some(validate) = &alternative.validate {
        if !validate(&args) {
            return None;
        }
    }

    let args = match &alternative.transform {
        Some(transform) => match transform(args) {
            Transformed::Args(args) => args,
            Transformed::Value(value) => Args::from_values([value]),
            Transformed::Reject => return None,
        },
        None => args,
    };

    Some(match &alternative.action {
        Some(action) => action(&args),
        None => pass_through(args),
    })
}

/// Default action: one argument is returned as is, otherwise a tuple of all
fn pass_through(args: Args) -> Value {
    let mut values = args.into_values();
    if values.len() == 1 {
        values.pop().unwrap_or_default()
    } else {
        Value::Tuple(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compile;

    fn seq(pattern: &str) -> Sequence {
        compile(pattern).unwrap().sequence
    }

    #[test]
    fn test_named_before_anonymous() {
        let s = seq("<a> <b:x> ',' <c> <d:y>");
        let matched = vec![
            Matched::Value(Value::int(1)),
            Matched::Value(Value::int(2)),
            Matched::Literal,
            Matched::Value(Value::int(3)),
            Matched::Value(Value::int(4)),
        ];

        let args = build_args(&s, &matched, true);
        assert_eq!(
            args.clone().into_values(),
            vec![Value::int(2), Value::int(4), Value::int(1), Value::int(3)]
        );
        assert_eq!(args["x"], Value::int(2));
        assert_eq!(args["y"], Value::int(4));

        let args = build_args(&s, &matched, false);
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_default_substituted_for_absent() {
        let s = seq("<id?:name='anon'>");
        let args = build_args(&s, &[Matched::Value(Value::Absent)], false);
        assert_eq!(args["name"], Value::string("anon"));

        let args = build_args(&s, &[Matched::Value(Value::string("bob"))], false);
        assert_eq!(args["name"], Value::string("bob"));
    }

    #[test]
    fn test_absent_without_default() {
        let s = seq("<id?:name>");
        let args = build_args(&s, &[Matched::Value(Value::Absent)], false);
        assert_eq!(args["name"], Value::Absent);
    }

    #[test]
    fn test_group_repetitions() {
        let s = seq("<item:first> [ ',' <item> ]:rest");
        let matched = vec![
            Matched::Value(Value::int(1)),
            Matched::Group(vec![
                vec![Matched::Literal, Matched::Value(Value::int(2))],
                vec![Matched::Literal, Matched::Value(Value::int(3))],
            ]),
        ];
        let args = build_args(&s, &matched, false);
        assert_eq!(args["rest"], Value::list(vec![Value::int(2), Value::int(3)]));
    }

    #[test]
    fn test_group_with_several_captures_yields_tuples() {
        let s = seq("{ <key:k> '=' <val:v> }:pairs");
        let matched = vec![Matched::Group(vec![vec![
            Matched::Value(Value::string("a")),
            Matched::Literal,
            Matched::Value(Value::int(1)),
        ]])];
        let args = build_args(&s, &matched, false);
        assert_eq!(
            args["pairs"],
            Value::list(vec![Value::tuple(vec![Value::string("a"), Value::int(1)])])
        );
    }

    #[test]
    fn test_unnamed_group_needs_capture_anon() {
        let s = seq("[ <item> ]");
        let matched = vec![Matched::Group(vec![vec![Matched::Value(Value::int(7))]])];
        assert!(build_args(&s, &matched, false).is_empty());
        assert_eq!(
            build_args(&s, &matched, true).into_values(),
            vec![Value::list(vec![Value::int(7)])]
        );
    }

    #[test]
    fn test_pass_through() {
        assert_eq!(pass_through(Args::from_values([Value::int(1)])), Value::int(1));
        assert_eq!(
            pass_through(Args::from_values([Value::int(1), Value::int(2)])),
            Value::tuple(vec![Value::int(1), Value::int(2)])
        );
        assert_eq!(pass_through(Args::new()), Value::tuple(vec![]));
    }
}
