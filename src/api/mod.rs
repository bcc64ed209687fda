//! JSON shaping layer for the transport in front of the engine.
//!
//! The HTTP router is an external collaborator; it hands query parameters
//! down and serializes whatever comes back. Everything here returns serde
//! types shaped like the service's original responses.

mod types;

pub use types::{KanjiDetails, KanjiListResponse, LookupWordsResponse, WordDetails};

use std::path::Path;

use serde_json::json;

use crate::lexicon::{Lexicon, LookupPattern};
use crate::romaji::{to_hiragana, HiraganaConversion};
use crate::select::{
    canonical_form, normalize_entry, pick_word, validate_candidate, Chooser, Constraints,
    MalformedPolicy, PickRequest, SelectError, WordChoice,
};
use crate::tables::{
    FrequencyTable, KanjiDataset, LevelIndex, LevelPolicy, LevelScheme, TableError,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no entry found for {word}")]
    NotFound { word: String },

    #[error("kanji {kanji} not found in the kanji dataset")]
    KanjiNotFound { kanji: char },

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error("selection worker is gone")]
    WorkerGone,
}

/// The assembled engine: lexicon handle plus the precomputed tables.
///
/// Build it once at startup; all methods take `&self` and the underlying
/// data never mutates afterwards. For serialized store access wrap it in a
/// `worker::SelectionWorker`.
pub struct Service {
    lexicon: Box<dyn Lexicon>,
    dataset: KanjiDataset,
    index: LevelIndex,
    freq: FrequencyTable,
}

impl Service {
    /// Startup path: build the level index from the dataset and ensure the
    /// frequency cache under `data_dir` (built from a full lexicon scan on
    /// first run). Table failures are fatal; callers propagate them.
    pub fn open(
        lexicon: Box<dyn Lexicon>,
        dataset: KanjiDataset,
        scheme: LevelScheme,
        data_dir: &Path,
    ) -> Result<Self, TableError> {
        let index = LevelIndex::build(&dataset, scheme);
        let freq = FrequencyTable::ensure(&data_dir.join("nf_words_freq"), lexicon.as_ref())?;
        Ok(Self {
            lexicon,
            dataset,
            index,
            freq,
        })
    }

    /// Assemble from already-built parts (tests, embedders, datatool).
    pub fn from_parts(
        lexicon: Box<dyn Lexicon>,
        dataset: KanjiDataset,
        index: LevelIndex,
        freq: FrequencyTable,
    ) -> Self {
        Self {
            lexicon,
            dataset,
            index,
            freq,
        }
    }

    pub fn index(&self) -> &LevelIndex {
        &self.index
    }

    pub fn freq(&self) -> &FrequencyTable {
        &self.freq
    }

    /// Romaji → hiragana for the input box. Pure, no store access.
    pub fn to_hiragana(&self, word: &str) -> HiraganaConversion {
        to_hiragana(word)
    }

    /// Direct single-word lookup: meaning plus frequency rank. A miss is a
    /// fatal `NotFound`, never an empty result.
    pub fn word_details(&self, word: &str) -> Result<WordDetails, ApiError> {
        let entries = self.lexicon.lookup(&LookupPattern::Exact(word.to_string()));
        let entry = entries.first().ok_or_else(|| ApiError::NotFound {
            word: word.to_string(),
        })?;
        Ok(WordDetails {
            meaning: entry.primary_meaning().unwrap_or_default(),
            freqrank: self.freq.rank_or_max(word),
        })
    }

    /// Scan entries matching a reading and report which survive the filter,
    /// with rejection codes for the rest. Kana-only entries contribute
    /// nothing; an entry whose every written form is unclassifiable is
    /// fatal here (direct-lookup path).
    pub fn lookup_word_entries(
        &self,
        reading: &str,
        kanji_to_match: Option<&str>,
        min_length: usize,
        min_kanji: usize,
        policy: LevelPolicy,
    ) -> Result<LookupWordsResponse, ApiError> {
        let constraints = Constraints {
            required: kanji_to_match.map(str::to_string),
            min_length,
            min_kanji,
            policy,
        };

        let mut valid_entries = Vec::new();
        let mut errors = Vec::new();
        for entry in self
            .lexicon
            .lookup(&LookupPattern::Exact(reading.to_string()))
        {
            // Kana-only entries share readings with kanji words all the
            // time; they have nothing to validate and contribute nothing.
            if entry.kanji_forms.is_empty() {
                continue;
            }
            let canonical = canonical_form(entry, &self.index);
            match canonical {
                Some(c) => match validate_candidate(&c.surface, &constraints, &self.index) {
                    Ok(()) => {
                        // Canonical selection already classified the form;
                        // normalize_entry cannot fail past this point.
                        if let Some(choice) =
                            normalize_entry(entry, &self.index, MalformedPolicy::Fail)?
                        {
                            valid_entries.push(choice);
                        }
                    }
                    Err(reason) => errors.push(reason.code().to_string()),
                },
                None => {
                    return Err(SelectError::NoValidForm { idseq: entry.idseq }.into());
                }
            }
        }

        Ok(LookupWordsResponse {
            valid_entries,
            errors,
        })
    }

    /// The game's main operation: pick one word containing `kanji_to_match`
    /// under the request's constraints. Empty pool → `None`.
    pub fn find_word_with_kanji(
        &self,
        request: &PickRequest,
        chooser: &mut dyn Chooser,
    ) -> Option<WordChoice> {
        pick_word(
            self.lexicon.as_ref(),
            &self.index,
            &self.freq,
            request,
            chooser,
        )
    }

    /// All kanji between two levels inclusive, with details. Inverted
    /// bounds are swapped rather than rejected.
    pub fn kanjis(&self, min_level: u8, max_level: u8) -> KanjiListResponse {
        let (lo, hi) = if min_level > max_level {
            (max_level, min_level)
        } else {
            (min_level, max_level)
        };
        let mut kanjis = Vec::new();
        for level in lo..=hi {
            for c in self.index.chars_at(level) {
                if let Ok(details) = self.kanji_details(c) {
                    kanjis.push(details);
                }
            }
        }
        KanjiListResponse { kanjis }
    }

    /// Details for one kanji. A miss is fatal, matching `word_details`.
    pub fn kanji_details(&self, kanji: char) -> Result<KanjiDetails, ApiError> {
        let info = self
            .dataset
            .get(kanji)
            .ok_or(ApiError::KanjiNotFound { kanji })?;
        Ok(KanjiDetails {
            kanji,
            meaning: info.meanings.join(", "),
            level: self.index.level_of(kanji),
        })
    }
}

/// Shape a pick outcome the way the transport returns it:
/// `{"result": null}` or `{"result": {...entry fields, word, kanjis}}`.
pub fn result_json(choice: Option<&WordChoice>) -> serde_json::Value {
    match choice {
        Some(c) => json!({ "result": c }),
        None => json!({ "result": null }),
    }
}
