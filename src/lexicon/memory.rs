use std::fs;
use std::path::Path;

use super::{LexicalEntry, Lexicon, LexiconError, LookupPattern};

/// In-memory lexicon backed by a flat entry list.
///
/// Lookup is a linear scan over forms. The full JMdict is ~200k entries and
/// a contains-scan over it completes in a few milliseconds, which is fine
/// for a game backend that issues one lookup per request.
#[derive(Debug)]
pub struct MemoryLexicon {
    entries: Vec<LexicalEntry>,
}

impl MemoryLexicon {
    pub fn from_entries(entries: impl IntoIterator<Item = LexicalEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Load a JSONL export (one `LexicalEntry` JSON object per line).
    ///
    /// Blank lines are skipped; any malformed line aborts the load with its
    /// line number, since a partially loaded lexicon would silently shrink
    /// the candidate space.
    pub fn open(path: &Path) -> Result<Self, LexiconError> {
        let content = fs::read_to_string(path)?;
        let mut entries = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: LexicalEntry =
                serde_json::from_str(line).map_err(|e| LexiconError::Parse {
                    line: idx + 1,
                    msg: e.to_string(),
                })?;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lexicon for MemoryLexicon {
    fn lookup(&self, pattern: &LookupPattern) -> Vec<&LexicalEntry> {
        match pattern {
            LookupPattern::Exact(text) => self
                .entries
                .iter()
                .filter(|e| e.has_surface(text))
                .collect(),
            LookupPattern::Contains(needle) => self
                .entries
                .iter()
                .filter(|e| e.any_form_contains(needle))
                .collect(),
        }
    }

    fn entries(&self) -> Box<dyn Iterator<Item = &LexicalEntry> + '_> {
        Box::new(self.entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{ReadingForm, WrittenForm};

    fn form(text: &str) -> WrittenForm {
        WrittenForm {
            text: text.to_string(),
            priorities: vec![],
        }
    }

    fn reading(text: &str) -> ReadingForm {
        ReadingForm {
            text: text.to_string(),
            priorities: vec![],
        }
    }

    fn sample() -> MemoryLexicon {
        MemoryLexicon::from_entries([
            LexicalEntry {
                idseq: 1,
                kanji_forms: vec![form("音楽")],
                kana_forms: vec![reading("おんがく")],
                senses: vec![],
            },
            LexicalEntry {
                idseq: 2,
                kanji_forms: vec![form("楽器")],
                kana_forms: vec![reading("がっき")],
                senses: vec![],
            },
        ])
    }

    #[test]
    fn test_exact_lookup() {
        let lex = sample();
        assert_eq!(lex.lookup(&LookupPattern::Exact("音楽".into())).len(), 1);
        assert_eq!(
            lex.lookup(&LookupPattern::Exact("おんがく".into())).len(),
            1
        );
        assert!(lex.lookup(&LookupPattern::Exact("音".into())).is_empty());
    }

    #[test]
    fn test_contains_lookup() {
        let lex = sample();
        let hits = lex.lookup(&LookupPattern::Contains("楽".into()));
        assert_eq!(hits.len(), 2);
        assert!(lex.lookup(&LookupPattern::Contains("符".into())).is_empty());
    }

    #[test]
    fn test_open_rejects_malformed_line() {
        let dir = std::env::temp_dir().join("kotoba_lexicon_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.jsonl");
        fs::write(&path, "{\"idseq\": 1}\nnot json\n").unwrap();
        let err = MemoryLexicon::open(&path).unwrap_err();
        match err {
            LexiconError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
