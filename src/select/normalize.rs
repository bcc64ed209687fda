use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use super::filter::{canonical_form, MalformedPolicy};
use super::SelectError;
use crate::lexicon::LexicalEntry;
use crate::tables::LevelIndex;

/// The caller-facing shape of a chosen word: the entry's full structured
/// data with the chosen surface under `word` and the ideographic characters
/// it uses under `kanjis` (ordered for stable output, semantically a set).
#[derive(Debug, Clone, Serialize)]
pub struct WordChoice {
    #[serde(flatten)]
    pub entry: LexicalEntry,
    pub word: String,
    pub kanjis: Vec<char>,
}

impl WordChoice {
    pub(super) fn new(surface: &str, kanjis: &BTreeSet<char>, entry: &LexicalEntry) -> Self {
        Self {
            entry: entry.clone(),
            word: surface.to_string(),
            kanjis: kanjis.iter().copied().collect(),
        }
    }
}

/// Normalize an entry through canonical-form selection.
///
/// `Ok(None)` only occurs under `MalformedPolicy::Skip`; with `Fail` the
/// no-valid-form condition is an error. Direct single-word lookups use
/// `Fail`, multi-entry scans use `Skip` — same condition, different paths.
pub fn normalize_entry(
    entry: &LexicalEntry,
    index: &LevelIndex,
    policy: MalformedPolicy,
) -> Result<Option<WordChoice>, SelectError> {
    match canonical_form(entry, index) {
        Some(canonical) => Ok(Some(WordChoice::new(
            &canonical.surface,
            &canonical.kanjis,
            entry,
        ))),
        None => match policy {
            MalformedPolicy::Skip => {
                debug!(idseq = entry.idseq, "no valid written form, skipping");
                Ok(None)
            }
            MalformedPolicy::Fail => Err(SelectError::NoValidForm {
                idseq: entry.idseq,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::WrittenForm;
    use crate::tables::{KanjiDataset, LevelScheme};

    fn index() -> LevelIndex {
        let dataset =
            KanjiDataset::from_json(r#"{"音": {"jlpt_new": 4}, "楽": {"jlpt_new": 4}}"#).unwrap();
        LevelIndex::build(&dataset, LevelScheme::Jlpt)
    }

    fn entry(forms: &[&str]) -> LexicalEntry {
        LexicalEntry {
            idseq: 99,
            kanji_forms: forms
                .iter()
                .map(|text| WrittenForm {
                    text: text.to_string(),
                    priorities: vec![],
                })
                .collect(),
            kana_forms: vec![],
            senses: vec![],
        }
    }

    #[test]
    fn test_normalize_shapes_result() {
        let choice = normalize_entry(&entry(&["音楽"]), &index(), MalformedPolicy::Fail)
            .unwrap()
            .unwrap();
        assert_eq!(choice.word, "音楽");
        assert_eq!(choice.kanjis, vec!['楽', '音']);
        assert_eq!(choice.entry.idseq, 99);

        let json = serde_json::to_value(&choice).unwrap();
        // Entry fields are flattened next to word/kanjis.
        assert_eq!(json["idseq"], 99);
        assert_eq!(json["word"], "音楽");
        assert_eq!(json["kanjis"][0], "楽");
    }

    #[test]
    fn test_malformed_policy_asymmetry() {
        let idx = index();
        let bad = entry(&["３楽"]);
        assert!(matches!(
            normalize_entry(&bad, &idx, MalformedPolicy::Skip),
            Ok(None)
        ));
        assert!(matches!(
            normalize_entry(&bad, &idx, MalformedPolicy::Fail),
            Err(SelectError::NoValidForm { idseq: 99 })
        ));
    }
}
