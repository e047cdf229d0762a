//! Compiled-in vocabulary.
//!
//! Each table is authored independently and in order; the order matters
//! because reverse lookups return the first entry whose translation matches.
//! Sense keys (`bulan_waktu`, `bisa_racun`, ...) are keys in every table, and
//! words a reverse scan would only find under a sense key (`kawa`) get their
//! own forward entry.

use tutur_types::{Language, LanguagePair};

use crate::{DataError, Dictionary, SenseTable};

type Records = &'static [(&'static str, &'static str)];

const LANGUAGES: &[(&str, &str)] = &[
    ("id", "Bahasa Indonesia"),
    ("kt", "Bahasa Kutai"),
    ("bj", "Bahasa Banjar"),
];

const ID_KT: Records = &[
    ("selamat pagi", "selamat pagi kitak"),
    ("selamat siang", "selamat siang kitak"),
    ("selamat malam", "selamat malam kitak"),
    ("terima kasih", "makasih banar"),
    ("terima kasih banyak", "makasih banar"),
    ("apa kabar", "apa habar"),
    ("kabar baik", "habar baik"),
    ("siapa nama kamu", "siapa ngaran ikam"),
    ("nama saya", "ngaran aku"),
    ("saya", "aku"),
    ("kamu", "ikam"),
    ("tidak", "ndik"),
    ("ya", "iya"),
    ("mau ke mana", "handak ke mana"),
    ("sudah makan", "sudah makan kah"),
    ("enak", "nyaman"),
    ("air", "banyu"),
    ("rumah", "rumah"),
    ("sungai", "sungai"),
    ("bulan_waktu", "bulan"),
    ("bulan_benda", "bulan"),
    ("bisa_mampu", "kawa"),
    ("bisa_racun", "bisa"),
];

const KT_ID: Records = &[
    ("kaya apa", "bagaimana"),
    ("bubuhan", "kelompok"),
    ("kawa", "bisa"),
    ("bulan_waktu", "bulan"),
    ("bulan_benda", "bulan"),
    ("bisa_mampu", "bisa"),
    ("bisa_racun", "bisa"),
];

const ID_BJ: Records = &[
    ("selamat pagi", "salamat pagi"),
    ("terima kasih", "tarima kasih"),
    ("apa kabar", "apa habar"),
    ("saya", "ulun"),
    ("kamu", "pian"),
    ("tidak", "kada"),
    ("mau ke mana", "handak ka mana"),
    ("enak", "nyaman"),
    ("air", "banyu"),
    ("sungai", "sungai"),
    ("bulan_waktu", "bulan"),
    ("bulan_benda", "bulan"),
    ("bisa_mampu", "kawa"),
    ("bisa_racun", "bisa"),
];

const BJ_ID: Records = &[
    ("salamat pagi", "selamat pagi"),
    ("tarima kasih", "terima kasih"),
    ("apa habar", "apa kabar"),
    ("ulun", "saya"),
    ("pian", "kamu"),
    ("kada", "tidak"),
    ("handak ka mana", "mau ke mana"),
    ("nyaman", "enak"),
    ("banyu", "air"),
    ("sungai", "sungai"),
    ("kawa", "bisa"),
    ("bulan_waktu", "bulan"),
    ("bulan_benda", "bulan"),
    ("bisa_mampu", "bisa"),
    ("bisa_racun", "bisa"),
];

const KT_BJ: Records = &[
    ("aku", "ulun"),
    ("ikam", "pian"),
    ("ndik", "kada"),
    ("makasih banar", "tarima kasih"),
    ("apa habar", "apa habar"),
    ("handak ke mana", "handak ka mana"),
    ("banyu", "banyu"),
    ("nyaman", "nyaman"),
    ("kawa", "kawa"),
    ("bulan_waktu", "bulan"),
    ("bulan_benda", "bulan"),
    ("bisa_mampu", "kawa"),
    ("bisa_racun", "bisa"),
];

const BJ_KT: Records = &[
    ("ulun", "aku"),
    ("pian", "ikam"),
    ("kada", "ndik"),
    ("tarima kasih", "makasih banar"),
    ("apa habar", "apa habar"),
    ("handak ka mana", "handak ke mana"),
    ("banyu", "banyu"),
    ("nyaman", "nyaman"),
    ("kawa", "kawa"),
    ("bulan_waktu", "bulan"),
    ("bulan_benda", "bulan"),
    ("bisa_mampu", "kawa"),
    ("bisa_racun", "bisa"),
];

/// Every authored direction. Each one carries a row for every sense key so a
/// chosen sense resolves whichever way the user translates.
const TABLES: &[(&str, &str, Records)] = &[
    ("id", "kt", ID_KT),
    ("kt", "id", KT_ID),
    ("id", "bj", ID_BJ),
    ("bj", "id", BJ_ID),
    ("kt", "bj", KT_BJ),
    ("bj", "kt", BJ_KT),
];

const SENSES: &[(&str, Records)] = &[
    (
        "bulan",
        &[
            ("bulan_waktu", "Bulan (Waktu)"),
            ("bulan_benda", "Bulan (Benda Langit)"),
        ],
    ),
    (
        "bisa",
        &[("bisa_mampu", "Bisa (Mampu)"), ("bisa_racun", "Bisa (Racun)")],
    ),
];

pub(crate) fn dictionary() -> Result<Dictionary, DataError> {
    let mut builder = Dictionary::builder();
    for (id, name) in LANGUAGES {
        builder.language(Language::new(*id, *name));
    }
    for (source, target, records) in TABLES {
        builder.extend(&LanguagePair::new(*source, *target), records.iter().copied())?;
    }
    Ok(builder.build())
}

pub(crate) fn senses() -> Result<SenseTable, DataError> {
    let mut builder = SenseTable::builder();
    for (form, senses) in SENSES {
        for (key, label) in *senses {
            builder.insert(form, key, label)?;
        }
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_record_loads() {
        let dict = dictionary().expect("built-in tables");
        let authored: usize = TABLES.iter().map(|(_, _, records)| records.len()).sum();
        assert_eq!(dict.entry_count(), authored);
        assert_eq!(dict.pair_count(), TABLES.len());
        assert_eq!(dict.languages().len(), LANGUAGES.len());
    }

    #[test]
    fn every_sense_loads() {
        let senses = senses().expect("built-in senses");
        assert_eq!(senses.len(), SENSES.len());
    }

    #[test]
    fn every_direction_is_authored() {
        let dict = dictionary().unwrap();
        for (source, _) in LANGUAGES {
            for (target, _) in LANGUAGES {
                if source != target {
                    assert!(dict.has_pair(&LanguagePair::new(*source, *target)), "{source}-{target}");
                }
            }
        }
    }

    #[test]
    fn every_table_stores_every_sense_key() {
        let dict = dictionary().unwrap();
        for (source, target, _) in TABLES {
            let pair = LanguagePair::new(*source, *target);
            for (_, senses) in SENSES {
                for (key, _) in *senses {
                    assert!(dict.lookup(&pair, key).is_some(), "{pair} lacks {key}");
                }
            }
        }
    }
}
