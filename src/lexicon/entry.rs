use serde::{Deserialize, Serialize};

/// One dictionary record: an internal sequence id, the ways it is written,
/// the ways it is read, and its senses. Owned by the lexicon; the selection
/// pipeline only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalEntry {
    pub idseq: u64,
    #[serde(default)]
    pub kanji_forms: Vec<WrittenForm>,
    #[serde(default)]
    pub kana_forms: Vec<ReadingForm>,
    #[serde(default)]
    pub senses: Vec<Sense>,
}

/// A surface string plus its priority tags. Tags of the form `nf` + two
/// digits encode a corpus frequency bucket (nf01 = most common ~500 words).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenForm {
    pub text: String,
    #[serde(default)]
    pub priorities: Vec<String>,
}

/// A kana reading plus its priority tags. Same shape as `WrittenForm`;
/// readings carry their own frequency annotations in JMdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingForm {
    pub text: String,
    #[serde(default)]
    pub priorities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    #[serde(default)]
    pub glosses: Vec<String>,
    #[serde(default)]
    pub pos: Vec<String>,
}

impl LexicalEntry {
    /// Glosses of the first sense joined with `/`, the conventional
    /// "meaning" shown to the player.
    pub fn primary_meaning(&self) -> Option<String> {
        self.senses.first().map(|s| s.glosses.join("/"))
    }

    /// Does any written or reading form match `text` exactly?
    pub fn has_surface(&self, text: &str) -> bool {
        self.kanji_forms.iter().any(|f| f.text == text)
            || self.kana_forms.iter().any(|f| f.text == text)
    }

    /// Does any written or reading form contain `needle`?
    pub fn any_form_contains(&self, needle: &str) -> bool {
        self.kanji_forms.iter().any(|f| f.text.contains(needle))
            || self.kana_forms.iter().any(|f| f.text.contains(needle))
    }
}
