use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tutur_types::{LanguagePair, Sense, normalize};

use crate::{DataError, Dictionary, builtin};

/// A sense registry that disagrees with the dictionary it is paired with.
///
/// Only ever produced at load time; a running engine never sees one.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum IntegrityError {
    #[error("sense key {key:?} of ambiguous form {form:?} is not a key in any phrase table")]
    UnknownSenseKey { form: String, key: String },
    #[error("ambiguous form {form:?} lists itself as a sense key")]
    SelfReferentialSense { form: String },
    #[error("{pair}: sense key {key:?} of ambiguous form {form:?} does not resolve")]
    UnresolvedSense {
        pair: LanguagePair,
        form: String,
        key: String,
    },
}

/// Surface forms that need an explicit sense before they can be translated.
#[derive(Clone, Debug, Default)]
pub struct SenseTable {
    forms: Vec<String>,
    senses: HashMap<String, Vec<Sense>>,
    keys: HashSet<String>,
}

impl SenseTable {
    pub fn builtin() -> Self {
        builtin::senses().expect("built-in sense data is well-formed")
    }

    pub fn builder() -> SenseTableBuilder {
        SenseTableBuilder::default()
    }

    /// Candidate senses for a normalized surface form; empty when the form is
    /// not ambiguous.
    pub fn senses_for(&self, form: &str) -> &[Sense] {
        self.senses.get(form).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_ambiguous(&self, form: &str) -> bool {
        !self.senses_for(form).is_empty()
    }

    /// Whether `key` names a sense of some ambiguous form. Such keys are
    /// stored in phrase tables but are never shown as a translation.
    pub fn is_sense_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Ambiguous forms in authored order.
    pub fn forms(&self) -> impl Iterator<Item = &str> + '_ {
        self.forms.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Check that every sense key is stored by at least one phrase table.
    pub fn verify(&self, dictionary: &Dictionary) -> Result<(), IntegrityError> {
        for form in &self.forms {
            for sense in self.senses_for(form) {
                if &sense.key == form {
                    return Err(IntegrityError::SelfReferentialSense { form: form.clone() });
                }
                if !dictionary.contains_key(&sense.key) {
                    return Err(IntegrityError::UnknownSenseKey {
                        form: form.clone(),
                        key: sense.key.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SenseTableBuilder {
    table: SenseTable,
}

impl SenseTableBuilder {
    /// Append a sense to `form`. Senses keep the order they were added in.
    pub fn insert(&mut self, form: &str, key: &str, label: &str) -> Result<&mut Self, DataError> {
        let norm_form = normalize(form);
        if norm_form.is_empty() {
            return Err(DataError::EmptySurfaceForm {
                form: form.to_string(),
            });
        }
        let norm_key = normalize(key);
        if norm_key.is_empty() {
            return Err(DataError::EmptySenseKey {
                form: norm_form,
                key: key.to_string(),
            });
        }

        let table = &mut self.table;
        if !table.senses.contains_key(&norm_form) {
            table.forms.push(norm_form.clone());
        }
        let senses = table.senses.entry(norm_form.clone()).or_default();
        if senses.iter().any(|sense| sense.key == norm_key) {
            return Err(DataError::DuplicateSense {
                form: norm_form,
                key: norm_key,
            });
        }
        senses.push(Sense::new(norm_key.as_str(), label.trim()));
        table.keys.insert(norm_key);
        Ok(self)
    }

    pub fn build(&mut self) -> SenseTable {
        std::mem::take(&mut self.table)
    }
}
