//! Benchmarks for the parse engine
//!
//! Two grammars are benchmarked:
//! 1. Calculator - left-recursive operators with precedence climbing
//! 2. List - comma-separated values through a repeated group
//!
//! Each is run with memoization on and off.
//!
//! Run with: cargo bench --bench parse

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pegrow::prelude::*;

fn num(args: &Args, name: &str) -> f64 {
    args[name].as_float().unwrap_or(0.0)
}

fn build_calculator() -> Grammar {
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
                .action(|a| Value::float(num(a, "l") / num(a, "r"))),
        )
        .alt(AltSpec::new("'(' <expr> ')'"))
        .alt(AltSpec::new("<number>"))
        .token(Token::number("number"))
        .build()
        .unwrap()
}

fn build_list() -> Grammar {
    GrammarBuilder::new()
        .rule("list", AltSpec::new("'[' <value:first> [ ',' <value> ]:rest ']'"))
        .rule("value", AltSpec::new("<number>"))
        .alt(AltSpec::new("<string>"))
        .alt(AltSpec::new("<list>"))
        .token(Token::number("number"))
        .token(Token::quoted_string("string"))
        .build()
        .unwrap()
}

fn calculator_input(terms: usize) -> String {
    (0..terms)
        .map(|i| match i % 4 {
            0 => format!("{}", i + 1),
            1 => format!("({} * {})", i, i + 2),
            2 => format!("{} / 3", i),
            _ => format!("({} - 1)", i),
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

fn list_input(items: usize) -> String {
    let body = (0..items)
        .map(|i| match i % 3 {
            0 => i.to_string(),
            1 => format!("'item {}'", i),
            _ => format!("[{}, {}]", i, i + 1),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", body)
}

fn bench_calculator(c: &mut Criterion) {
    let grammar = build_calculator();
    let mut g = c.benchmark_group("calculator");

    for terms in [4, 32, 128] {
        let input = calculator_input(terms);
        for memoize in [true, false] {
            let parser = Parser::with_config(&grammar, ParserConfig::new().with_memoize(memoize));
            let id = BenchmarkId::new(if memoize { "memo" } else { "no_memo" }, terms);
            g.bench_with_input(id, &input, |b, input| {
                b.iter(|| parser.parse(black_box(input)))
            });
        }
    }
    g.finish();
}

fn bench_list(c: &mut Criterion) {
    let grammar = build_list();
    let mut g = c.benchmark_group("list");

    for items in [10, 100, 1000] {
        let input = list_input(items);
        let parser = Parser::new(&grammar);
        g.bench_with_input(BenchmarkId::from_parameter(items), &input, |b, input| {
            b.iter(|| parser.parse(black_box(input)))
        });
    }
    g.finish();
}

fn bench_grammar_build(c: &mut Criterion) {
    c.bench_function("build_calculator_grammar", |b| b.iter(build_calculator));
}

criterion_group!(benches, bench_calculator, bench_list, bench_grammar_build);
criterion_main!(benches);
