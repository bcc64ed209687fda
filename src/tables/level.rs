use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::TableError;

const MAGIC: &[u8; 4] = b"KLVX";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 5; // 4 bytes magic + 1 byte version

/// Per-kanji details from the kanji dataset JSON.
///
/// Both grading schemes are carried; `LevelScheme` picks which one feeds
/// the index. A `None` level means the character is ungraded under that
/// scheme and is excluded from the index entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KanjiInfo {
    #[serde(default)]
    pub grade: Option<u8>,
    #[serde(default)]
    pub jlpt_new: Option<u8>,
    #[serde(default)]
    pub meanings: Vec<String>,
}

/// The full kanji dataset: one record per kanji character.
#[derive(Debug)]
pub struct KanjiDataset {
    kanjis: HashMap<char, KanjiInfo>,
}

impl KanjiDataset {
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let raw: HashMap<String, KanjiInfo> =
            serde_json::from_str(json).map_err(|e| TableError::Dataset(e.to_string()))?;
        let mut kanjis = HashMap::with_capacity(raw.len());
        for (key, info) in raw {
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(TableError::Dataset(format!(
                    "key {key:?} is not a single character"
                )));
            };
            kanjis.insert(c, info);
        }
        Ok(Self { kanjis })
    }

    pub fn open(path: &Path) -> Result<Self, TableError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, kanji: char) -> Option<&KanjiInfo> {
        self.kanjis.get(&kanji)
    }

    pub fn len(&self) -> usize {
        self.kanjis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kanjis.is_empty()
    }
}

/// Which grading scheme the index is built from. The two schemes are
/// mutually exclusive for one index; comparison direction is a property of
/// the policy, not the scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelScheme {
    /// JLPT proficiency tiers N1..N5 (`jlpt_new`); higher number = easier.
    Jlpt,
    /// School grades 1..6 plus 8 for general-use (`grade`); lower = easier.
    Grade,
}

impl LevelScheme {
    fn level_of(self, info: &KanjiInfo) -> Option<u8> {
        match self {
            LevelScheme::Jlpt => info.jlpt_new,
            LevelScheme::Grade => info.grade,
        }
    }
}

/// Difficulty bound with an explicit comparison direction.
///
/// `AtLeast(n)` admits characters at tier n or above (JLPT-style, where N5
/// is the easiest and carries the highest number); `AtMost(n)` admits
/// characters at grade n or below (school-grade style). Ungraded characters
/// are admitted by neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPolicy {
    AtLeast(u8),
    AtMost(u8),
}

impl LevelPolicy {
    pub fn admits(self, level: Option<u8>) -> bool {
        match (self, level) {
            (_, None) => false,
            (LevelPolicy::AtLeast(n), Some(l)) => l >= n,
            (LevelPolicy::AtMost(n), Some(l)) => l <= n,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct IndexData {
    scheme: LevelScheme,
    by_level: HashMap<u8, BTreeSet<char>>,
    level_of: HashMap<char, u8>,
    /// Every character the dataset knows about, graded or not. Canonical
    /// form selection needs this to tell a rare-but-real kanji apart from a
    /// glyph variant the dataset has never heard of.
    known: BTreeSet<char>,
}

/// Precomputed mapping between difficulty levels and the characters at that
/// exact level. Built once from the kanji dataset, append-only during
/// build, immutable afterwards.
pub struct LevelIndex {
    data: IndexData,
}

impl LevelIndex {
    pub fn build(dataset: &KanjiDataset, scheme: LevelScheme) -> Self {
        let mut by_level: HashMap<u8, BTreeSet<char>> = HashMap::new();
        let mut level_of = HashMap::new();
        let mut known = BTreeSet::new();
        for (&kanji, info) in &dataset.kanjis {
            known.insert(kanji);
            // Ungraded characters go in no bucket at all, which makes them
            // fail every bound check later.
            if let Some(level) = scheme.level_of(info) {
                by_level.entry(level).or_default().insert(kanji);
                level_of.insert(kanji, level);
            }
        }
        Self {
            data: IndexData {
                scheme,
                by_level,
                level_of,
                known,
            },
        }
    }

    pub fn scheme(&self) -> LevelScheme {
        self.data.scheme
    }

    pub fn level_of(&self, kanji: char) -> Option<u8> {
        self.data.level_of.get(&kanji).copied()
    }

    /// Is `kanji` in the dataset at all (graded or not)?
    pub fn contains(&self, kanji: char) -> bool {
        self.data.known.contains(&kanji)
    }

    /// All characters at exactly `level`, in codepoint order.
    pub fn chars_at(&self, level: u8) -> impl Iterator<Item = char> + '_ {
        self.data
            .by_level
            .get(&level)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Does `kanji` satisfy the bound? Ungraded characters never do.
    pub fn admits(&self, kanji: char, policy: LevelPolicy) -> bool {
        policy.admits(self.level_of(kanji))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TableError> {
        let mut buf = Vec::new();
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        let encoded = bincode::serialize(&self.data).map_err(TableError::Serialize)?;
        buf.extend_from_slice(&encoded);
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, TableError> {
        if data.len() < HEADER_SIZE {
            return Err(TableError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(TableError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(TableError::UnsupportedVersion(data[4]));
        }
        let index: IndexData =
            bincode::deserialize(&data[HEADER_SIZE..]).map_err(TableError::Deserialize)?;
        Ok(Self { data: index })
    }

    pub fn open(path: &Path) -> Result<Self, TableError> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        fs::write(path, self.to_bytes()?).map_err(TableError::Io)
    }

    /// Returns (level_count, character_count).
    pub fn stats(&self) -> (usize, usize) {
        (self.data.by_level.len(), self.data.level_of.len())
    }
}
