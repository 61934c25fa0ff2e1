//! Property-based tests using proptest
//!
//! These tests check memoization transparency and operator grouping against
//! a reference evaluator across a wide range of inputs.

use pegrow::prelude::*;
use proptest::prelude::*;

fn int(args: &Args, name: &str) -> i64 {
    args[name].as_int().unwrap_or(0)
}

fn build_arithmetic() -> Grammar {
    GrammarBuilder::new()
        .rule(
            "expr",
            AltSpec::new("<expr:l> '+' <expr:r>")
                .precedence(10)
                .left()
                .action(|a| Value::int(int(a, "l").wrapping_add(int(a, "r")))),
        )
        .alt(
            AltSpec::new("<expr:l> '-' <expr:r>")
                .precedence(10)
                .left()
                .action(|a| Value::int(int(a, "l").wrapping_sub(int(a, "r")))),
        )
        .alt(
            AltSpec::new("<expr:l> '*' <expr:r>")
                .precedence(20)
                .left()
                .action(|a| Value::int(int(a, "l").wrapping_mul(int(a, "r")))),
        )
        .alt(
            AltSpec::new("'-' <expr:x>")
                .precedence(30)
                .prefix()
                .action(|a| Value::int(int(a, "x").wrapping_neg())),
        )
        .alt(AltSpec::new("'(' <expr> ')'"))
        .alt(AltSpec::new("<number>"))
        .token(Token::new("number", "[0-9]+").converter(|s| Value::int(s.parse().unwrap_or(0))))
        .build()
        .unwrap()
}

/// Evaluate `n0 op1 n1 op2 n2 ...` with `*` above `+`/`-`, all left-associative
fn reference_eval(first: i64, rest: &[(char, i64)]) -> i64 {
    let mut terms = vec![('+', first)];
    for &(op, n) in rest {
        if op == '*' {
            if let Some(last) = terms.last_mut() {
                last.1 = last.1.wrapping_mul(n);
            }
        } else {
            terms.push((op, n));
        }
    }
    terms.iter().fold(0i64, |acc, &(op, v)| match op {
        '-' => acc.wrapping_sub(v),
        _ => acc.wrapping_add(v),
    })
}

#[derive(Debug, Clone)]
enum Tree {
    Num(i64),
    Bin(char, Box<Tree>, Box<Tree>),
}

impl Tree {
    fn eval(&self) -> i64 {
        match self {
            Tree::Num(n) => *n,
            Tree::Bin(op, l, r) => {
                let (l, r) = (l.eval(), r.eval());
                match op {
                    '+' => l.wrapping_add(r),
                    '-' => l.wrapping_sub(r),
                    _ => l.wrapping_mul(r),
                }
            }
        }
    }

    fn render(&self) -> String {
        match self {
            Tree::Num(n) => n.to_string(),
            Tree::Bin(op, l, r) => format!("({} {} {})", l.render(), op, r.render()),
        }
    }
}

fn tree_strategy() -> impl Strategy<Value = Tree> {
    let leaf = (0i64..1000).prop_map(Tree::Num);
    leaf.prop_recursive(4, 24, 2, |inner| {
        (prop::sample::select(vec!['+', '-', '*']), inner.clone(), inner)
            .prop_map(|(op, l, r)| Tree::Bin(op, Box::new(l), Box::new(r)))
    })
}

// =============================================================================
// Memoization Transparency
// =============================================================================

proptest! {
    /// Memoized and unmemoized parses agree on value or diagnostic
    #[test]
    fn test_memo_transparency(input in "[0-9+*() -]{0,16}") {
        let grammar = build_arithmetic();
        let memo = Parser::new(&grammar);
        let plain = Parser::with_config(&grammar, ParserConfig::new().with_memoize(false));

        prop_assert_eq!(memo.parse(&input), plain.parse(&input));
    }

    /// Well-formed expressions agree too
    #[test]
    fn test_memo_transparency_valid(tree in tree_strategy()) {
        let grammar = build_arithmetic();
        let input = tree.render();
        let plain = Parser::with_config(&grammar, ParserConfig::new().with_memoize(false));

        prop_assert_eq!(grammar.parse(&input), plain.parse(&input));
    }
}

// =============================================================================
// Operator Grouping
// =============================================================================

proptest! {
    /// Flat expressions follow precedence and left associativity
    #[test]
    fn test_flat_expression_matches_reference(
        first in 0i64..100,
        rest in prop::collection::vec((prop::sample::select(vec!['+', '-', '*']), 0i64..100), 0..8),
    ) {
        let mut input = first.to_string();
        for (op, n) in &rest {
            input.push_str(&format!(" {} {}", op, n));
        }

        let grammar = build_arithmetic();
        prop_assert_eq!(grammar.parse(&input), Ok(Value::int(reference_eval(first, &rest))));
    }

    /// Fully parenthesized expressions evaluate like their tree
    #[test]
    fn test_parenthesized_tree_matches_eval(tree in tree_strategy()) {
        let grammar = build_arithmetic();
        prop_assert_eq!(grammar.parse(&tree.render()), Ok(Value::int(tree.eval())));
    }

    /// Subtraction chains group to the left
    #[test]
    fn test_subtraction_groups_left(nums in prop::collection::vec(0i64..1000, 1..10)) {
        let input = nums.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" - ");
        let expected = nums[1..].iter().fold(nums[0], |acc, n| acc - n);

        let grammar = build_arithmetic();
        prop_assert_eq!(grammar.parse(&input), Ok(Value::int(expected)));
    }
}
