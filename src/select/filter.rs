use std::collections::BTreeSet;
use std::fmt;

use crate::lexicon::LexicalEntry;
use crate::tables::{LevelIndex, LevelPolicy};
use crate::unicode::{classify_char, CharClass};

/// Constraint set applied to one candidate surface.
#[derive(Debug, Clone)]
pub struct Constraints {
    /// Substring the word must contain (the kanji being drilled), if any.
    pub required: Option<String>,
    /// Minimum word length in characters.
    pub min_length: usize,
    /// Minimum number of ideographic characters satisfying the level bound.
    pub min_kanji: usize,
    pub policy: LevelPolicy,
}

/// Why a candidate was rejected. The codes are stable strings surfaced to
/// the calling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    SubstringMissing,
    TooShort,
    TooFewQualifyingKanji,
}

impl Rejection {
    pub fn code(self) -> &'static str {
        match self {
            Rejection::SubstringMissing => "substring-missing",
            Rejection::TooShort => "too-short",
            Rejection::TooFewQualifyingKanji => "too-few-qualifying-kanji",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How to handle an entry whose every written form has unclassifiable
/// characters: drop it quietly (multi-entry scans) or surface an error
/// (direct single-word lookups).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedPolicy {
    Skip,
    Fail,
}

/// The ideographic characters of `word` that satisfy the level bound.
pub fn qualifying_kanjis(word: &str, index: &LevelIndex, policy: LevelPolicy) -> Vec<char> {
    word.chars()
        .filter(|&c| classify_char(c) == CharClass::Ideographic && index.admits(c, policy))
        .collect()
}

/// Apply the constraint checks in order and return the first rejection, if
/// any. Check order is part of the contract: substring, length, then
/// qualifying-kanji count.
pub fn validate_candidate(
    word: &str,
    constraints: &Constraints,
    index: &LevelIndex,
) -> Result<(), Rejection> {
    if let Some(required) = &constraints.required {
        if !word.contains(required.as_str()) {
            return Err(Rejection::SubstringMissing);
        }
    }
    if word.chars().count() < constraints.min_length {
        return Err(Rejection::TooShort);
    }
    let qualifying = qualifying_kanjis(word, index, constraints.policy);
    if qualifying.len() < constraints.min_kanji {
        return Err(Rejection::TooFewQualifyingKanji);
    }
    Ok(())
}

/// The written form chosen to represent an entry, with the ideographic
/// characters it uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalForm {
    pub surface: String,
    pub kanjis: BTreeSet<char>,
}

/// Classify one written form: `Some(kanjis)` when every character is kana
/// or a dataset-known ideograph, `None` when any character is
/// unclassifiable.
fn classify_form(text: &str, index: &LevelIndex) -> Option<BTreeSet<char>> {
    let mut kanjis = BTreeSet::new();
    for c in text.chars() {
        match classify_char(c) {
            CharClass::Hiragana | CharClass::Katakana => {}
            _ if index.contains(c) => {
                kanjis.insert(c);
            }
            // Anything else is a glyph the level dataset cannot place:
            // a non-standard variant, fullwidth digit, symbol, ...
            _ => return None,
        }
    }
    Some(kanjis)
}

/// Pick the canonical written form for an entry: the first form, in the
/// entry's own ordering, with zero unclassifiable characters. Returns
/// `None` when every form is malformed — real JMdict data has entries
/// whose primary form uses a variant glyph (e.g. ３密 listed before 三密),
/// and entries where no form is usable at all.
pub fn canonical_form(entry: &LexicalEntry, index: &LevelIndex) -> Option<CanonicalForm> {
    entry.kanji_forms.iter().find_map(|form| {
        classify_form(&form.text, index).map(|kanjis| CanonicalForm {
            surface: form.text.clone(),
            kanjis,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::WrittenForm;
    use crate::tables::{KanjiDataset, LevelScheme};

    fn index() -> LevelIndex {
        let dataset = KanjiDataset::from_json(
            r#"{
                "音": {"jlpt_new": 4},
                "楽": {"jlpt_new": 4},
                "符": {"jlpt_new": 1},
                "三": {"jlpt_new": 5},
                "密": {"jlpt_new": 1},
                "彁": {}
            }"#,
        )
        .unwrap();
        LevelIndex::build(&dataset, LevelScheme::Jlpt)
    }

    fn constraints(required: Option<&str>, min_length: usize, min_kanji: usize) -> Constraints {
        Constraints {
            required: required.map(str::to_string),
            min_length,
            min_kanji,
            policy: LevelPolicy::AtLeast(1),
        }
    }

    fn entry_with_forms(forms: &[&str]) -> LexicalEntry {
        LexicalEntry {
            idseq: 1,
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
    fn test_substring_checked_first() {
        let idx = index();
        // Fails the substring check even though it is also too short.
        assert_eq!(
            validate_candidate("楽", &constraints(Some("音"), 5, 1), &idx),
            Err(Rejection::SubstringMissing)
        );
    }

    #[test]
    fn test_too_short_regardless_of_other_constraints() {
        let idx = index();
        for min_length in 2..6 {
            let c = constraints(None, min_length, 0);
            assert_eq!(validate_candidate("音", &c, &idx), Err(Rejection::TooShort));
        }
    }

    #[test]
    fn test_kana_only_word_never_has_qualifying_kanji() {
        let idx = index();
        assert_eq!(
            validate_candidate("おんがく", &constraints(None, 1, 1), &idx),
            Err(Rejection::TooFewQualifyingKanji)
        );
        // With min_kanji = 0 it passes.
        assert_eq!(validate_candidate("おんがく", &constraints(None, 1, 0), &idx), Ok(()));
    }

    #[test]
    fn test_level_bound_limits_qualifying_set() {
        let idx = index();
        // 音楽 at N3-or-easier: both kanji are N4, both qualify.
        let easy = Constraints {
            policy: LevelPolicy::AtLeast(3),
            ..constraints(Some("音"), 2, 2)
        };
        assert_eq!(validate_candidate("音楽", &easy, &idx), Ok(()));
        // 音符 at N3-or-easier: 符 is N1, only 音 qualifies.
        let two_easy = Constraints {
            policy: LevelPolicy::AtLeast(3),
            ..constraints(Some("音"), 2, 2)
        };
        assert_eq!(
            validate_candidate("音符", &two_easy, &idx),
            Err(Rejection::TooFewQualifyingKanji)
        );
    }

    #[test]
    fn test_ungraded_kanji_never_qualifies() {
        let idx = index();
        assert!(qualifying_kanjis("彁", &idx, LevelPolicy::AtLeast(1)).is_empty());
        assert!(qualifying_kanjis("彁", &idx, LevelPolicy::AtMost(9)).is_empty());
    }

    #[test]
    fn test_canonical_form_skips_variant_glyph() {
        let idx = index();
        // ３密 lists a fullwidth-digit form first; the clean form wins.
        let entry = entry_with_forms(&["３密", "三密"]);
        let canonical = canonical_form(&entry, &idx).unwrap();
        assert_eq!(canonical.surface, "三密");
        assert_eq!(
            canonical.kanjis,
            BTreeSet::from(['三', '密'])
        );
    }

    #[test]
    fn test_canonical_form_first_clean_wins() {
        let idx = index();
        let entry = entry_with_forms(&["音楽", "音がく"]);
        assert_eq!(canonical_form(&entry, &idx).unwrap().surface, "音楽");
    }

    #[test]
    fn test_canonical_form_none_when_all_malformed() {
        let idx = index();
        // 謎 is outside the dataset: ideographic but unknown.
        let entry = entry_with_forms(&["３密", "謎密"]);
        assert!(canonical_form(&entry, &idx).is_none());
    }

    #[test]
    fn test_rejection_codes() {
        assert_eq!(Rejection::SubstringMissing.code(), "substring-missing");
        assert_eq!(Rejection::TooShort.code(), "too-short");
        assert_eq!(
            Rejection::TooFewQualifyingKanji.code(),
            "too-few-qualifying-kanji"
        );
    }
}
