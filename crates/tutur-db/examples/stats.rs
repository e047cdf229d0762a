use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tutur_db::Phrasebook;

fn main() -> Result<()> {
    let book = match env::args().nth(1).map(PathBuf::from) {
        Some(dir) => Phrasebook::load_dir(&dir)
            .with_context(|| format!("loading seed data from {}", dir.display()))?,
        None => Phrasebook::builtin(),
    };
    let dict = &book.dictionary;

    println!("Languages    : {}", dict.languages().len());
    for lang in dict.languages() {
        println!("  {:<4} {}", lang.id, lang.display_name);
    }
    println!("Pairs        : {}", dict.pair_count());
    for pair in dict.pairs() {
        let entries = dict.table(pair).map_or(0, |t| t.len());
        println!("  {:<8} {entries} entries", pair.to_string());
    }
    println!("Entries      : {}", dict.entry_count());
    println!("Ambiguous    : {}", book.senses.len());
    for form in book.senses.forms() {
        let keys: Vec<&str> = book
            .senses
            .senses_for(form)
            .iter()
            .map(|s| s.key.as_str())
            .collect();
        println!("  {form}: {}", keys.join(", "));
    }
    println!(
        "Integrity    : {}",
        match book.verify() {
            Ok(()) => "ok".to_string(),
            Err(err) => err.to_string(),
        }
    );

    Ok(())
}
