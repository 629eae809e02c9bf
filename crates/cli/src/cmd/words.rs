use crate::WordsArgs;
use docfill_core::words::{Language, Numeral, to_words};
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: &WordsArgs) {
    let language = match &args.lang {
        Some(lang) => lang
            .parse::<Language>()
            .unwrap_or_else(|e| super::fail("words", e, super::EXIT_FAILURE)),
        None => super::load_config("words", config, profile).language,
    };

    match to_words(numeral(args), language) {
        Ok(words) => println!("{words}"),
        Err(e) => super::fail("words", e, super::EXIT_FAILURE),
    }
}

/// Integers stay integers; everything else is an identifier unless
/// `--decimal` asks for a number.
fn numeral(args: &WordsArgs) -> Numeral<'_> {
    let value = args.value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Numeral::Integer(n);
    }
    if args.decimal {
        if let Ok(f) = value.parse::<f64>() {
            return Numeral::Float(f);
        }
    }
    Numeral::Text(value)
}
