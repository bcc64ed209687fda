use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::TableError;
use crate::lexicon::Lexicon;

/// Rank assigned to surfaces absent from the table: worst possible.
pub const UNRANKED: usize = usize::MAX;

/// Precomputed corpus-frequency ranking: surface form → rank, lower = more
/// common. Built once by scanning every entry's `nf` priority tags, cached
/// as a newline-delimited surface list (ascending bucket order), and loaded
/// back with rank = zero-based line index. Immutable after load.
pub struct FrequencyTable {
    ranks: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Load the cache at `path`, building it first from a full lexicon scan
    /// if it does not exist. Creates the parent directory when missing.
    /// Any failure here is fatal at startup; there is no partial table.
    pub fn ensure(path: &Path, lexicon: &dyn Lexicon) -> Result<Self, TableError> {
        if !path.exists() {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            build_cache(path, lexicon)?;
        }
        Self::open(path)
    }

    /// Assemble a table directly from (surface, rank) pairs. Used by
    /// embedders and tests that have no cache file to go through.
    pub fn from_ranked_surfaces(pairs: impl IntoIterator<Item = (String, usize)>) -> Self {
        Self {
            ranks: pairs.into_iter().collect(),
        }
    }

    /// Load an existing cache file: one surface per line, rank = line index.
    pub fn open(path: &Path) -> Result<Self, TableError> {
        let content = fs::read_to_string(path)?;
        let ranks = content
            .lines()
            .enumerate()
            .map(|(idx, line)| (line.to_string(), idx))
            .collect();
        Ok(Self { ranks })
    }

    pub fn rank(&self, surface: &str) -> Option<usize> {
        self.ranks.get(surface).copied()
    }

    /// Rank with the unranked sentinel substituted for misses.
    pub fn rank_or_max(&self, surface: &str) -> usize {
        self.rank(surface).unwrap_or(UNRANKED)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Extract the frequency bucket from a priority tag: `nf` + two digits.
/// Other tags (ichi1, news1, spec2, gai1, ...) carry no bucket.
fn nf_bucket(tag: &str) -> Option<u8> {
    tag.strip_prefix("nf")?.parse().ok()
}

/// Scan every entry's written and reading forms and write the cache file:
/// buckets in ascending order, one surface per line. Intra-bucket ordering
/// is whatever set iteration yields; only the bucket order is meaningful.
fn build_cache(path: &Path, lexicon: &dyn Lexicon) -> Result<(), TableError> {
    info!("building frequency table, this scans the full lexicon");

    let mut buckets: BTreeMap<u8, HashSet<&str>> = BTreeMap::new();
    for entry in lexicon.entries() {
        let tagged = entry
            .kanji_forms
            .iter()
            .map(|f| (f.text.as_str(), &f.priorities))
            .chain(
                entry
                    .kana_forms
                    .iter()
                    .map(|f| (f.text.as_str(), &f.priorities)),
            );
        for (text, priorities) in tagged {
            for tag in priorities {
                if let Some(bucket) = nf_bucket(tag) {
                    buckets.entry(bucket).or_default().insert(text);
                }
            }
        }
    }

    let mut out = String::new();
    for (bucket, surfaces) in &buckets {
        debug!(bucket, count = surfaces.len(), "frequency bucket");
        for surface in surfaces {
            out.push_str(surface);
            out.push('\n');
        }
    }
    fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{LexicalEntry, MemoryLexicon, ReadingForm, WrittenForm};

    fn entry(idseq: u64, surface: &str, reading: &str, tags: &[&str]) -> LexicalEntry {
        LexicalEntry {
            idseq,
            kanji_forms: vec![WrittenForm {
                text: surface.to_string(),
                priorities: tags.iter().map(|t| t.to_string()).collect(),
            }],
            kana_forms: vec![ReadingForm {
                text: reading.to_string(),
                priorities: vec![],
            }],
            senses: vec![],
        }
    }

    fn tmp_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("kotoba_freq_test");
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_nf_bucket_parsing() {
        assert_eq!(nf_bucket("nf02"), Some(2));
        assert_eq!(nf_bucket("nf48"), Some(48));
        assert_eq!(nf_bucket("ichi1"), None);
        assert_eq!(nf_bucket("news1"), None);
        assert_eq!(nf_bucket("nfxx"), None);
    }

    #[test]
    fn test_build_orders_by_bucket() {
        let lex = MemoryLexicon::from_entries([
            entry(1, "音符", "おんぷ", &["nf18"]),
            entry(2, "音楽", "おんがく", &["ichi1", "nf02"]),
            entry(3, "楽器", "がっき", &[]),
        ]);
        let path = tmp_path("ordered");
        let _ = fs::remove_file(&path);
        let table = FrequencyTable::ensure(&path, &lex).unwrap();

        // 音楽 is in an earlier bucket, so it must rank strictly lower.
        assert!(table.rank("音楽").unwrap() < table.rank("音符").unwrap());
        // Untagged surfaces are absent entirely.
        assert_eq!(table.rank("楽器"), None);
        assert_eq!(table.rank_or_max("楽器"), UNRANKED);
    }

    #[test]
    fn test_reading_forms_contribute() {
        let lex = MemoryLexicon::from_entries([{
            let mut e = entry(1, "音楽", "おんがく", &["nf02"]);
            e.kana_forms[0].priorities = vec!["nf02".to_string()];
            e
        }]);
        let path = tmp_path("readings");
        let _ = fs::remove_file(&path);
        let table = FrequencyTable::ensure(&path, &lex).unwrap();
        assert!(table.rank("音楽").is_some());
        assert!(table.rank("おんがく").is_some());
    }

    #[test]
    fn test_rebuild_preserves_rank_order() {
        let lex = MemoryLexicon::from_entries([
            entry(1, "一", "いち", &["nf01"]),
            entry(2, "二", "に", &["nf02"]),
            entry(3, "三", "さん", &["nf03"]),
        ]);
        let path = tmp_path("rebuild");
        let _ = fs::remove_file(&path);
        let first = FrequencyTable::ensure(&path, &lex).unwrap();
        // Delete ⇒ rebuild must reproduce the same rank-order relation.
        fs::remove_file(&path).unwrap();
        let second = FrequencyTable::ensure(&path, &lex).unwrap();
        for table in [&first, &second] {
            assert!(table.rank("一").unwrap() < table.rank("二").unwrap());
            assert!(table.rank("二").unwrap() < table.rank("三").unwrap());
        }
    }

    #[test]
    fn test_open_existing_skips_build() {
        let path = tmp_path("existing");
        fs::write(&path, "甲\n乙\n").unwrap();
        let lex = MemoryLexicon::from_entries([]);
        let table = FrequencyTable::ensure(&path, &lex).unwrap();
        assert_eq!(table.rank("甲"), Some(0));
        assert_eq!(table.rank("乙"), Some(1));
        assert_eq!(table.len(), 2);
    }
}
