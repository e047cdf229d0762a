use std::env;

use anyhow::{Context, Result, bail};
use tutur_engine::Engine;
use tutur_types::{LanguagePair, TranslationResult};

const USAGE: &str =
    "usage: cargo run -p tutur-engine --example translate -- <src>-<tgt> [--sense <key>] [--demo | <text>...]";

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let pair = args
        .next()
        .as_deref()
        .and_then(LanguagePair::parse)
        .context(USAGE)?;

    let mut sense: Option<String> = None;
    let mut words = Vec::new();
    let mut demo = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sense" => sense = Some(args.next().context(USAGE)?),
            "--demo" => demo = true,
            _ => words.push(arg),
        }
    }

    let inputs: Vec<String> = if demo {
        vec![
            "Selamat pagi".into(),
            "terima kasih".into(),
            "bulan".into(),
            "Apa kabar?".into(),
            "xyzxyz".into(),
        ]
    } else if words.is_empty() {
        bail!(USAGE);
    } else {
        vec![words.join(" ")]
    };

    let engine = Engine::builtin();
    println!("Pair: {pair}");
    for input in inputs {
        match engine.translate(&pair, &input, sense.as_deref()) {
            TranslationResult::Matched(text) => println!("  {input:<16} => {text}"),
            TranslationResult::Ambiguous(senses) => {
                println!("  {input:<16} needs a sense:");
                for sense in senses {
                    println!("    {:<14} {}", sense.key, sense.label);
                }
            }
            TranslationResult::NotFound => println!("  {input:<16} (no translation)"),
        }
    }

    Ok(())
}
