use tutur_types::LanguagePair;

/// What a translator screen shows: the direction, the typed text and the last
/// rendered translation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TranslatorState {
    pub pair: LanguagePair,
    pub input: String,
    pub output: String,
}

impl TranslatorState {
    pub fn new(pair: LanguagePair, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            pair,
            input: input.into(),
            output: output.into(),
        }
    }

    /// Flip the direction and exchange input with output.
    ///
    /// Pure state change: nothing is re-translated. Applying it twice gives
    /// back the original state.
    pub fn swap(self) -> Self {
        Self {
            pair: self.pair.reversed(),
            input: self.output,
            output: self.input,
        }
    }
}
