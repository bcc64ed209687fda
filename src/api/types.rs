use serde::Serialize;

use crate::select::WordChoice;

/// Response for a direct single-word lookup.
#[derive(Debug, Clone, Serialize)]
pub struct WordDetails {
    pub meaning: String,
    /// Unranked words carry the maximal sentinel, mirroring the wire shape
    /// the game client already expects.
    pub freqrank: usize,
}

/// Response for a reading scan: the surviving entries plus a rejection
/// code per discarded form.
#[derive(Debug, Serialize)]
pub struct LookupWordsResponse {
    pub valid_entries: Vec<WordChoice>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KanjiDetails {
    pub kanji: char,
    pub meaning: String,
    pub level: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct KanjiListResponse {
    pub kanjis: Vec<KanjiDetails>,
}
