//! List Literals Example
//!
//! Parses nested list literals of numbers, quoted strings and bare words,
//! then prints the result as JSON.
//!
//! Run with: cargo run --example list-literals -- "[1, 'two', [3.5, \"four\"], five]"

use pegrow::prelude::*;

fn build_list_grammar() -> Result<Grammar, GrammarError> {
    GrammarBuilder::new()
        .rule(
            "list",
            AltSpec::new("'[' ']'").action(|_| Value::list(Vec::new())),
        )
        .alt(AltSpec::new("'[' <item:first> [ ',' <item> ]:rest <trailing?> ']'").action(|a| {
            let mut items = vec![a["first"].clone()];
            items.extend(a["rest"].as_slice().unwrap_or(&[]).iter().cloned());
            Value::list(items)
        }))
        .rule("trailing", AltSpec::new("','"))
        .rule("item", AltSpec::new("<number>"))
        .alt(AltSpec::new("<string>"))
        .alt(AltSpec::new("<list>"))
        .alt(AltSpec::new("<word:w>").action(|a| a["w"].clone()))
        .token(Token::number("number"))
        .token(Token::quoted_string("string"))
        .token(Token::new("word", r"[A-Za-z_][A-Za-z0-9_]*"))
        .start("list")
        .build()
}

fn main() {
    let grammar = match build_list_grammar() {
        Ok(grammar) => grammar,
        Err(e) => {
            eprintln!("grammar error: {}", e);
            std::process::exit(2);
        }
    };

    let mut inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.is_empty() {
        inputs = vec![
            "[]".to_string(),
            "[1, -2.5e3, 'it''s', \"tab\\there\"]".to_string(),
            "[[1, 2], [three, [4]],]".to_string(),
            "[1, 2".to_string(),
        ];
    }

    for input in &inputs {
        match grammar.parse(input) {
            Ok(value) => match serde_json::to_string(&value.to_json()) {
                Ok(json) => println!("{} => {}", input, json),
                Err(e) => eprintln!("{} => serialization failed: {}", input, e),
            },
            Err(e) => println!("{}\n{}\n", input, e),
        }
    }
}
