//! Property-based invariants for the translation engine.
//!
//! 1. Results are never both matched and ambiguous
//! 2. Arbitrary input never panics; text without a dictionary entry is NotFound
//! 3. Repeated calls give identical results
//! 4. Case, spacing and punctuation do not change the outcome
//! 5. Swapping twice restores the translator state

use proptest::prelude::*;
use tutur_engine::{Engine, TranslatorState};
use tutur_types::{LanguagePair, TranslationResult};

fn pair_strategy() -> impl Strategy<Value = LanguagePair> {
    let ids = ["id", "kt", "bj", "xx"];
    (0..ids.len(), 0..ids.len()).prop_map(move |(s, t)| LanguagePair::new(ids[s], ids[t]))
}

fn known_phrase() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "selamat pagi",
        "terima kasih",
        "apa kabar",
        "makasih banar",
        "bulan",
        "bisa",
        "kaya apa",
        "ulun",
    ])
    .prop_map(str::to_string)
}

proptest! {
    #[test]
    fn outcomes_are_exclusive(pair in pair_strategy(), text in any::<String>()) {
        let engine = Engine::builtin();
        let result = engine.translate(&pair, &text, None);
        prop_assert!(!(result.matched() && result.ambiguous()));
        prop_assert_eq!(result.translation().is_some(), result.matched());
        prop_assert_eq!(result.senses().is_some(), result.ambiguous());
    }

    #[test]
    fn gibberish_is_not_found(pair in pair_strategy(), text in "[qxz]{5,12}") {
        let engine = Engine::builtin();
        prop_assert_eq!(engine.translate(&pair, &text, None), TranslationResult::NotFound);
    }

    #[test]
    fn translation_is_deterministic(
        pair in pair_strategy(),
        text in known_phrase(),
        sense in prop::option::of(prop::sample::select(vec!["bulan_waktu", "bulan_benda", "bisa_mampu", "bisa_racun", "nope"])),
    ) {
        let engine = Engine::builtin();
        let first = engine.translate(&pair, &text, sense);
        let second = engine.translate(&pair, &text, sense);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn decoration_is_ignored(pair in pair_strategy(), text in known_phrase(), shout in any::<bool>()) {
        let engine = Engine::builtin();
        let cased = if shout { text.to_uppercase() } else { text.clone() };
        let decorated = format!("  {}?! ", cased.replace(' ', "   "));
        prop_assert_eq!(
            engine.translate(&pair, &decorated, None),
            engine.translate(&pair, &text, None)
        );
    }

    #[test]
    fn swap_is_an_involution(pair in pair_strategy(), input in any::<String>(), output in any::<String>()) {
        let state = TranslatorState::new(pair, input, output);
        prop_assert_eq!(state.clone().swap().swap(), state);
    }
}
