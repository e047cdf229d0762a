use tutur_db::Dictionary;
use tutur_types::{LanguagePair, normalize};

/// Which way a phrase table was read to produce a translation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// The input was a key of the requested pair's table.
    Forward,
    /// The input matched a stored translation; its key is the answer.
    Reverse,
}

/// A resolved translation borrowed from the dictionary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Resolution<'a> {
    pub text: &'a str,
    pub direction: Direction,
}

/// Translate an already-normalized phrase.
///
/// Forward lookup in `pair`'s table first. Failing that, scan the table
/// authored for the reversed pair (or `pair`'s own table when the reversed one
/// does not exist) and return the key of the first entry whose normalized
/// translation equals `text`. First match in authored order wins when several
/// entries share a translation.
pub fn resolve<'a>(
    dictionary: &'a Dictionary,
    pair: &LanguagePair,
    text: &str,
) -> Option<Resolution<'a>> {
    resolve_with(dictionary, pair, text, |_| false)
}

/// [`resolve`], except that the reverse scan passes over entries whose key is
/// `hidden`. Sense keys are stored like any other key but must never come
/// back as a translation.
pub fn resolve_with<'a, F>(
    dictionary: &'a Dictionary,
    pair: &LanguagePair,
    text: &str,
    hidden: F,
) -> Option<Resolution<'a>>
where
    F: Fn(&str) -> bool,
{
    if let Some(found) = dictionary.lookup(pair, text) {
        return Some(Resolution {
            text: found,
            direction: Direction::Forward,
        });
    }

    let reversed = pair.reversed();
    let table = dictionary
        .table(&reversed)
        .or_else(|| dictionary.table(pair))?;
    table
        .iter()
        .find(|&(key, translation)| !hidden(key) && normalize(translation) == text)
        .map(|(key, _)| Resolution {
            text: key,
            direction: Direction::Reverse,
        })
}
