//! Shared types for the tutur phrase translator.
//!
//! Everything here is plain data: languages and ordered language pairs used to
//! key phrase tables, the candidate senses offered for an ambiguous word, and
//! the three-way [`TranslationResult`]. The [`normalize`] function produces the
//! canonical form every dictionary key and every lookup goes through.
//!
//! ```rust
//! use tutur_types::{LanguagePair, normalize};
//!
//! let pair = LanguagePair::new("id", "kt");
//! assert_eq!(pair.reversed(), LanguagePair::new("kt", "id"));
//! assert_eq!(normalize("  Selamat   Pagi! "), "selamat pagi");
//! ```

use std::fmt;

/// Characters stripped from input before lookup.
pub const PUNCTUATION: [char; 6] = ['.', ',', '?', '!', ';', ':'];

/// A language offered by the translator, e.g. `id` / "Bahasa Indonesia".
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Language {
    pub id: String,
    pub display_name: String,
}

impl Language {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Ordered `(source, target)` pair selecting a phrase table.
///
/// `id-kt` and `kt-id` are different keys; each direction is authored on its
/// own and either may be missing.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// The same two languages with source and target exchanged.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }

    /// Parse the `source-target` form used in seed file names (`id-kt`).
    pub fn parse(raw: &str) -> Option<Self> {
        let (source, target) = raw.split_once('-')?;
        let (source, target) = (source.trim(), target.trim());
        if source.is_empty() || target.is_empty() || target.contains('-') {
            return None;
        }
        Some(Self::new(source, target))
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

/// One reading of an ambiguous word.
///
/// `key` is itself a normalized dictionary key (`bulan_waktu`), never the bare
/// surface form; `label` is what a person picks from (`Bulan (Waktu)`).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Sense {
    pub key: String,
    pub label: String,
}

impl Sense {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Outcome of a single translation call.
///
/// Exactly one variant holds, so a result can never be both matched and
/// ambiguous. The flag accessors give the `{matched, ambiguous}` view callers
/// render from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TranslationResult {
    /// A translation was found, forward or reverse.
    Matched(String),
    /// The input is a known ambiguous word and no sense was chosen yet.
    Ambiguous(Vec<Sense>),
    /// Nothing matched in either direction.
    NotFound,
}

impl TranslationResult {
    pub fn matched(&self) -> bool {
        matches!(self, TranslationResult::Matched(_))
    }

    pub fn ambiguous(&self) -> bool {
        matches!(self, TranslationResult::Ambiguous(_))
    }

    pub fn translation(&self) -> Option<&str> {
        match self {
            TranslationResult::Matched(text) => Some(text),
            _ => None,
        }
    }

    pub fn senses(&self) -> Option<&[Sense]> {
        match self {
            TranslationResult::Ambiguous(senses) => Some(senses),
            _ => None,
        }
    }
}

/// A caller's translation request, independent of transport.
///
/// `sense_key` is only set when re-submitting after an ambiguous result.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TranslateRequest {
    pub source_lang: String,
    pub target_lang: String,
    pub text: String,
    pub sense_key: Option<String>,
}

impl TranslateRequest {
    pub fn pair(&self) -> LanguagePair {
        LanguagePair::new(self.source_lang.as_str(), self.target_lang.as_str())
    }
}

/// Canonicalize free text for dictionary lookup.
///
/// Strips [`PUNCTUATION`], trims, collapses whitespace runs to one space and
/// lowercases with Unicode default (locale-insensitive) casing. Total and
/// idempotent.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !is_punctuation(*c)).collect();
    let mut collapsed = String::with_capacity(stripped.len());
    for word in stripped.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(word);
    }
    collapsed.to_lowercase()
}

fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(&c)
}
