//! Calculator Example
//!
//! Evaluates arithmetic expressions with binary `+ - * / ^`, prefix `-`
//! and postfix `!`, printing either the value or a diagnostic.
//!
//! Run with: cargo run --example calculator -- "1 + 2 * 3" "5! / 5"

use pegrow::prelude::*;

fn num(args: &Args, name: &str) -> f64 {
    args[name].as_float().unwrap_or(f64::NAN)
}

fn build_calculator_grammar() -> Result<Grammar, GrammarError> {
    GrammarBuilder::new()
        .rule(
            "expr",
            AltSpec::new("<expr:l> '+' <expr:r>")
                .precedence(10)
                .left()
                .action(|a| Value::float(num(a, "l") + num(a, "r"))),
        )
        .alt(
            AltSpec::new("<expr:l> '-' <expr:r>")
                .precedence(10)
                .left()
                .action(|a| Value::float(num(a, "l") - num(a, "r"))),
        )
        .alt(
            AltSpec::new("<expr:l> '*' <expr:r>")
                .precedence(20)
                .left()
                .action(|a| Value::float(num(a, "l") * num(a, "r"))),
        )
        .alt(
            AltSpec::new("<expr:l> '/' <expr:r>")
                .precedence(20)
                .left()
                .validate(|a| num(a, "r") != 0.0)
                .action(|a| Value::float(num(a, "l") / num(a, "r"))),
        )
        .alt(
            AltSpec::new("<expr:l> '^' <expr:r>")
                .precedence(35)
                .right()
                .action(|a| Value::float(num(a, "l").powf(num(a, "r")))),
        )
        .alt(
            AltSpec::new("<expr:x> '!'")
                .precedence(40)
                .postfix()
                .action(|a| {
                    let n = num(a, "x");
                    Value::float((1..=n as u64).map(|i| i as f64).product())
                }),
        )
        .alt(
            AltSpec::new("'-' <expr:x>")
                .precedence(30)
                .prefix()
                .action(|a| Value::float(-num(a, "x"))),
        )
        .alt(AltSpec::new("'(' <expr> ')'"))
        .alt(AltSpec::new("<number>"))
        .token(Token::new("number", r"[0-9]+(?:\.[0-9]+)?(?:[eE][-+]?[0-9]+)?").converter(|s| {
            pegrow::literal::parse_number(s).unwrap_or(Value::Absent)
        }))
        .build()
}

fn main() {
    let grammar = match build_calculator_grammar() {
        Ok(grammar) => grammar,
        Err(e) => {
            eprintln!("grammar error: {}", e);
            std::process::exit(2);
        }
    };

    let mut inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.is_empty() {
        inputs = ["1 + 2 * 3", "-1 + 4", "2 * (3 + 4)", "3! + 1", "5! / 5", "2 ^ 3 ^ 2", "1 / 0", "2 * * 3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
    }

    for input in &inputs {
        match grammar.parse(input) {
            Ok(value) => println!("{} = {}", input, value),
            Err(e) => println!("{}\n{}\n", input, e),
        }
    }
}
