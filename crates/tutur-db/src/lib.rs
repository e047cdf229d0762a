//! Phrase tables and the ambiguous-word registry.
//!
//! A [`Dictionary`] maps each ordered [`LanguagePair`] to a [`PhraseTable`] of
//! `normalized phrase -> translation` records kept in authored order. A
//! [`SenseTable`] lists the surface forms that need disambiguation and the
//! dictionary keys standing in for each of their senses. Both are built once
//! (from the built-in data or a seed directory) and are read-only afterwards,
//! so they can be shared behind an `Arc` by any number of readers.
//!
//! Tables only answer exact key lookups; value scans belong to the resolver.
//!
//! # Example
//! ```
//! use tutur_db::Phrasebook;
//! use tutur_types::LanguagePair;
//!
//! let book = Phrasebook::builtin();
//! let pair = LanguagePair::new("id", "kt");
//! assert_eq!(book.dictionary.lookup(&pair, "selamat pagi"), Some("selamat pagi kitak"));
//! assert_eq!(book.senses.senses_for("bulan").len(), 2);
//! book.verify().expect("built-in data is consistent");
//! ```
//!
//! For a runnable summary, see `cargo run -p tutur-db --example stats [-- <seed-dir>]`.

mod builtin;
mod seed;
mod senses;

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::info;
use tutur_types::{Language, LanguagePair, normalize};

pub use senses::{IntegrityError, SenseTable, SenseTableBuilder};

/// Problems found while assembling tables from authored records.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum DataError {
    #[error("{pair}: phrase {phrase:?} normalizes to an empty key")]
    EmptyKey { pair: LanguagePair, phrase: String },
    #[error("{pair}: translation for {key:?} normalizes to empty text")]
    EmptyTranslation { pair: LanguagePair, key: String },
    #[error("{pair}: duplicate key {key:?}")]
    DuplicateKey { pair: LanguagePair, key: String },
    #[error("surface form {form:?} normalizes to an empty key")]
    EmptySurfaceForm { form: String },
    #[error("{form:?}: sense key {key:?} normalizes to an empty key")]
    EmptySenseKey { form: String, key: String },
    #[error("{form:?}: duplicate sense key {key:?}")]
    DuplicateSense { form: String, key: String },
}

/// Entries for a single language pair, in the order they were authored.
#[derive(Clone, Debug, Default)]
pub struct PhraseTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl PhraseTable {
    /// Exact lookup of a normalized key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&idx| self.entries[idx].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// `(key, translation)` pairs in authored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, translation: String) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, translation));
        true
    }
}

/// Immutable collection of phrase tables keyed by language pair.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    languages: Vec<Language>,
    tables: HashMap<LanguagePair, PhraseTable>,
}

impl Dictionary {
    /// Dictionary over the built-in Indonesian, Kutai and Banjar data.
    ///
    /// # Panics
    /// If the compiled-in records are malformed.
    pub fn builtin() -> Self {
        builtin::dictionary().expect("built-in phrase data is well-formed")
    }

    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::default()
    }

    /// Translation stored under `key` for `pair`, if any.
    pub fn lookup(&self, pair: &LanguagePair, key: &str) -> Option<&str> {
        self.tables.get(pair).and_then(|table| table.get(key))
    }

    pub fn table(&self, pair: &LanguagePair) -> Option<&PhraseTable> {
        self.tables.get(pair)
    }

    pub fn has_pair(&self, pair: &LanguagePair) -> bool {
        self.tables.contains_key(pair)
    }

    /// Authored pairs, sorted for stable output.
    pub fn pairs(&self) -> Vec<&LanguagePair> {
        let mut pairs: Vec<&LanguagePair> = self.tables.keys().collect();
        pairs.sort();
        pairs
    }

    /// Whether `pair` can be answered: it has a table of its own or its
    /// reverse does. A language never pairs with itself.
    pub fn serves(&self, pair: &LanguagePair) -> bool {
        pair.source != pair.target && (self.has_pair(pair) || self.has_pair(&pair.reversed()))
    }

    /// Every ordered pair of known languages that [`Dictionary::serves`],
    /// sorted.
    pub fn servable_pairs(&self) -> Vec<LanguagePair> {
        let mut pairs = Vec::new();
        for source in &self.languages {
            for target in &self.languages {
                let pair = LanguagePair::new(source.id.as_str(), target.id.as_str());
                if self.serves(&pair) {
                    pairs.push(pair);
                }
            }
        }
        pairs.sort();
        pairs
    }

    /// Whether any pair stores `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.tables.values().any(|table| table.contains_key(key))
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn language(&self, id: &str) -> Option<&Language> {
        self.languages.iter().find(|lang| lang.id == id)
    }

    /// Number of authored language pairs.
    pub fn pair_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of entries across all pairs.
    pub fn entry_count(&self) -> usize {
        self.tables.values().map(PhraseTable::len).sum()
    }
}

/// Single construction path for [`Dictionary`]; normalizes every phrase on
/// the way in.
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    languages: Vec<Language>,
    tables: HashMap<LanguagePair, PhraseTable>,
}

impl DictionaryBuilder {
    /// Register a language. Re-registering an id keeps the first display name.
    pub fn language(&mut self, language: Language) -> &mut Self {
        if !self.languages.iter().any(|lang| lang.id == language.id) {
            self.languages.push(language);
        }
        self
    }

    /// Add one record to `pair`'s table.
    pub fn insert(
        &mut self,
        pair: &LanguagePair,
        phrase: &str,
        translation: &str,
    ) -> Result<&mut Self, DataError> {
        let key = normalize(phrase);
        if key.is_empty() {
            return Err(DataError::EmptyKey {
                pair: pair.clone(),
                phrase: phrase.to_string(),
            });
        }
        let translation = translation.trim();
        if normalize(translation).is_empty() {
            return Err(DataError::EmptyTranslation {
                pair: pair.clone(),
                key,
            });
        }
        let table = self.tables.entry(pair.clone()).or_default();
        if !table.insert(key.clone(), translation.to_string()) {
            return Err(DataError::DuplicateKey {
                pair: pair.clone(),
                key,
            });
        }
        Ok(self)
    }

    /// Add records to `pair`'s table in order.
    pub fn extend<'r, I>(&mut self, pair: &LanguagePair, records: I) -> Result<&mut Self, DataError>
    where
        I: IntoIterator<Item = (&'r str, &'r str)>,
    {
        self.tables.entry(pair.clone()).or_default();
        for (phrase, translation) in records {
            self.insert(pair, phrase, translation)?;
        }
        Ok(self)
    }

    /// Freeze the tables. Languages named by a pair but never registered get
    /// their id as display name.
    pub fn build(&mut self) -> Dictionary {
        let mut languages = std::mem::take(&mut self.languages);
        let tables = std::mem::take(&mut self.tables);
        let mut pairs: Vec<&LanguagePair> = tables.keys().collect();
        pairs.sort();
        for pair in pairs {
            for id in [&pair.source, &pair.target] {
                if !languages.iter().any(|lang| &lang.id == id) {
                    languages.push(Language::new(id.as_str(), id.as_str()));
                }
            }
        }
        Dictionary { languages, tables }
    }
}

/// The dictionary and its sense registry, loaded together.
#[derive(Clone, Debug)]
pub struct Phrasebook {
    pub dictionary: Dictionary,
    pub senses: SenseTable,
}

impl Phrasebook {
    /// Built-in data set.
    pub fn builtin() -> Self {
        let book = Self {
            dictionary: Dictionary::builtin(),
            senses: SenseTable::builtin(),
        };
        book.log_summary("built-in data");
        book
    }

    /// Load a seed directory and check it for integrity.
    ///
    /// See the `seed` module docs for the file layout.
    pub fn load_dir(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let book = seed::load_dir(dir)?;
        book.verify()?;
        book.log_summary(&dir.display().to_string());
        Ok(book)
    }

    /// Every sense key must be a key of some phrase table.
    pub fn verify(&self) -> Result<(), IntegrityError> {
        self.senses.verify(&self.dictionary)
    }

    fn log_summary(&self, origin: &str) {
        info!(
            "loaded {} pairs, {} entries, {} ambiguous forms from {origin}",
            self.dictionary.pair_count(),
            self.dictionary.entry_count(),
            self.senses.len()
        );
    }
}
