//! Seed-directory loader.
//!
//! Layout, all UTF-8, tab separated, `#` comments and blank lines ignored:
//!
//! - `<source>-<target>.tsv`: `phrase<TAB>translation`, one table per file;
//! - `languages.tsv` (optional): `id<TAB>display name`;
//! - `senses.tsv` (optional): `surface<TAB>sense_key<TAB>label`, rows for the
//!   same surface form kept in file order.
//!
//! Pair files are read in file-name order so repeated loads build identical
//! tables.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};
use tutur_types::{Language, LanguagePair};

use crate::{Dictionary, Phrasebook, SenseTable};

const LANGUAGES_FILE: &str = "languages.tsv";
const SENSES_FILE: &str = "senses.tsv";
const TABLE_EXT: &str = "tsv";

pub(crate) fn load_dir(dir: &Path) -> Result<Phrasebook> {
    if !dir.is_dir() {
        bail!("seed directory not found: {}", dir.display());
    }

    let mut builder = Dictionary::builder();
    let languages_path = dir.join(LANGUAGES_FILE);
    if languages_path.exists() {
        for (lineno, fields) in read_rows(&languages_path, 2)? {
            let language = Language::new(fields[0].trim(), fields[1].trim());
            debug!("{}:{lineno}: language {}", languages_path.display(), language.id);
            builder.language(language);
        }
    }

    let table_files = table_files(dir)?;
    if table_files.is_empty() {
        bail!("no `<source>-<target>.tsv` tables in {}", dir.display());
    }
    for (pair, path) in &table_files {
        builder.extend(pair, std::iter::empty())?;
        for (lineno, fields) in read_rows(path, 2)? {
            builder
                .insert(pair, &fields[0], &fields[1])
                .with_context(|| format!("{}:{lineno}", path.display()))?;
        }
    }

    let mut senses = SenseTable::builder();
    let senses_path = dir.join(SENSES_FILE);
    if senses_path.exists() {
        for (lineno, fields) in read_rows(&senses_path, 3)? {
            senses
                .insert(&fields[0], &fields[1], &fields[2])
                .with_context(|| format!("{}:{lineno}", senses_path.display()))?;
        }
    }

    Ok(Phrasebook {
        dictionary: builder.build(),
        senses: senses.build(),
    })
}

fn table_files(dir: &Path) -> Result<Vec<(LanguagePair, PathBuf)>> {
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("read seed directory {}", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("read entry in {}", dir.display()))?
            .path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(TABLE_EXT) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if [LANGUAGES_FILE, SENSES_FILE]
            .iter()
            .any(|name| path.file_name().and_then(|n| n.to_str()) == Some(*name))
        {
            continue;
        }
        match LanguagePair::parse(stem) {
            Some(pair) => files.push((pair, path)),
            None => warn!("ignoring {}: not named <source>-<target>.tsv", path.display()),
        }
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(files)
}

/// Data rows of a TSV file as `(line number, fields)`, each with exactly
/// `width` fields.
fn read_rows(path: &Path, width: usize) -> Result<Vec<(usize, Vec<String>)>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let fields: Vec<String> = line.split('\t').map(str::to_string).collect();
        if fields.len() != width {
            bail!(
                "{}:{lineno}: expected {width} tab-separated fields, found {}",
                path.display(),
                fields.len()
            );
        }
        rows.push((lineno, fields));
    }
    Ok(rows)
}
