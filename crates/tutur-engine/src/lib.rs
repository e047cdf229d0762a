//! Phrase translation over the tutur dictionaries.
//!
//! The [`Engine`] is the single entry point. It owns shared, immutable handles
//! to a [`Dictionary`] and a [`SenseTable`] and keeps no other state, so one
//! engine can serve any number of concurrent callers.
//!
//! # How it works
//! 1. Normalize the raw input.
//! 2. If the caller picked a sense, translate that sense key directly.
//! 3. Otherwise, if the input is a registered ambiguous word, stop and return
//!    its candidate senses; the caller re-submits with one of them.
//! 4. Otherwise [`resolve`]: forward lookup, then reverse lookup. Sense keys
//!    are skipped by the reverse scan, so they never surface as a translation.
//!
//! # Example
//! ```
//! use tutur_engine::Engine;
//! use tutur_types::{LanguagePair, TranslationResult};
//!
//! let engine = Engine::builtin();
//! let pair = LanguagePair::new("id", "kt");
//!
//! let first = engine.translate(&pair, "bulan", None);
//! let senses = first.senses().expect("bulan is ambiguous");
//! assert_eq!(senses[0].key, "bulan_waktu");
//!
//! let chosen = engine.translate(&pair, "bulan", Some(senses[0].key.as_str()));
//! assert_eq!(chosen, TranslationResult::Matched("bulan".into()));
//! ```

mod resolver;
mod swap;

use std::sync::Arc;

use tracing::debug;
use tutur_db::{Dictionary, IntegrityError, Phrasebook, SenseTable};
use tutur_types::{LanguagePair, TranslateRequest, TranslationResult, normalize};

pub use resolver::{Direction, Resolution, resolve, resolve_with};
pub use swap::TranslatorState;

/// Stateless translator over shared, read-only data.
#[derive(Clone, Debug)]
pub struct Engine {
    dictionary: Arc<Dictionary>,
    senses: Arc<SenseTable>,
}

impl Engine {
    pub fn new(dictionary: Arc<Dictionary>, senses: Arc<SenseTable>) -> Self {
        Self { dictionary, senses }
    }

    /// Engine over the compiled-in data set.
    pub fn builtin() -> Self {
        Self::from(Phrasebook::builtin())
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn senses(&self) -> &SenseTable {
        &self.senses
    }

    /// Translate `raw` from `pair.source` to `pair.target`.
    ///
    /// `sense_key` is the key of a sense the caller picked after an
    /// [`TranslationResult::Ambiguous`] answer. A key that no table knows is
    /// reported as [`TranslationResult::NotFound`], like any other miss.
    pub fn translate(
        &self,
        pair: &LanguagePair,
        raw: &str,
        sense_key: Option<&str>,
    ) -> TranslationResult {
        let text = normalize(raw);

        let query = match sense_key {
            Some(key) => normalize(key),
            None => {
                let senses = self.senses.senses_for(&text);
                if !senses.is_empty() {
                    debug!(%pair, text = %text, senses = senses.len(), "ambiguous input");
                    return TranslationResult::Ambiguous(senses.to_vec());
                }
                text
            }
        };

        match self.lookup(pair, &query) {
            Some(found) => {
                debug!(%pair, text = %query, direction = ?found.direction, "matched");
                TranslationResult::Matched(found.text.to_string())
            }
            None => {
                debug!(%pair, text = %query, "no translation");
                TranslationResult::NotFound
            }
        }
    }

    /// [`Engine::translate`] for a transport-level request.
    pub fn handle(&self, request: &TranslateRequest) -> TranslationResult {
        self.translate(&request.pair(), &request.text, request.sense_key.as_deref())
    }

    /// Check that every sense of every ambiguous form resolves for every pair
    /// the dictionary serves, so each disambiguation round-trip can finish.
    pub fn verify(&self) -> Result<(), IntegrityError> {
        for pair in self.dictionary.servable_pairs() {
            for form in self.senses.forms() {
                for sense in self.senses.senses_for(form) {
                    if self.lookup(&pair, &sense.key).is_none() {
                        return Err(IntegrityError::UnresolvedSense {
                            pair,
                            form: form.to_string(),
                            key: sense.key.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, pair: &LanguagePair, text: &str) -> Option<Resolution<'_>> {
        resolve_with(&self.dictionary, pair, text, |key| {
            self.senses.is_sense_key(key)
        })
    }
}

impl From<Phrasebook> for Engine {
    fn from(book: Phrasebook) -> Self {
        Self::new(Arc::new(book.dictionary), Arc::new(book.senses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutur_types::Sense;

    fn id_kt() -> LanguagePair {
        LanguagePair::new("id", "kt")
    }

    #[test]
    fn ambiguous_input_short_circuits() {
        let engine = Engine::builtin();
        let result = engine.translate(&id_kt(), " Bulan? ", None);
        assert_eq!(
            result,
            TranslationResult::Ambiguous(vec![
                Sense::new("bulan_waktu", "Bulan (Waktu)"),
                Sense::new("bulan_benda", "Bulan (Benda Langit)"),
            ])
        );
    }

    #[test]
    fn sense_key_bypasses_the_gate() {
        let engine = Engine::builtin();
        let pair = LanguagePair::new("id", "bj");
        assert_eq!(
            engine.translate(&pair, "bisa", Some("bisa_mampu")),
            TranslationResult::Matched("kawa".into())
        );
        assert_eq!(
            engine.translate(&pair, "bisa", Some(" Bisa_Racun ")),
            TranslationResult::Matched("bisa".into())
        );
    }

    #[test]
    fn unknown_sense_key_is_not_found() {
        let engine = Engine::builtin();
        assert_eq!(
            engine.translate(&id_kt(), "bulan", Some("bulan_tahun")),
            TranslationResult::NotFound
        );
    }

    #[test]
    fn missing_pair_is_not_found() {
        let engine = Engine::builtin();
        let pair = LanguagePair::new("kt", "jv");
        assert_eq!(
            engine.translate(&pair, "aku", None),
            TranslationResult::NotFound
        );
    }

    #[test]
    fn builtin_engine_verifies() {
        assert_eq!(Engine::builtin().verify(), Ok(()));
    }

    #[test]
    fn reverse_hits_on_sense_keys_are_skipped() {
        let engine = Engine::builtin();
        let kt_id = LanguagePair::new("kt", "id");
        assert_eq!(engine.translate(&kt_id, "kawa", None).translation(), Some("bisa"));
        let bj_id = LanguagePair::new("bj", "id");
        assert_eq!(engine.translate(&bj_id, "kawa", None).translation(), Some("bisa"));
        let id_bj = LanguagePair::new("id", "bj");
        assert_eq!(engine.translate(&id_bj, "kawa", None), TranslationResult::NotFound);
    }

    #[test]
    fn handles_requests() {
        let engine = Engine::builtin();
        let request = TranslateRequest {
            source_lang: "kt".into(),
            target_lang: "id".into(),
            text: "Kaya apa?".into(),
            sense_key: None,
        };
        let result = engine.handle(&request);
        assert_eq!(result.translation(), Some("bagaimana"));
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();

        let engine = Engine::builtin();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || engine.translate(&id_kt(), "selamat pagi", None))
            })
            .collect();
        for handle in handles {
            assert_eq!(
                handle.join().unwrap().translation(),
                Some("selamat pagi kitak")
            );
        }
    }
}
