mod freq;
mod level;

pub use freq::FrequencyTable;
pub use level::{KanjiDataset, KanjiInfo, LevelIndex, LevelPolicy, LevelScheme};

use std::io;

/// Unified error type for the precomputed lookup tables.
///
/// Covers building, caching and reloading both the frequency table and the
/// grade/level index. Table construction failures are fatal at startup;
/// there is no partial-table recovery.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid cache header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected KLVX)")]
    InvalidMagic,

    #[error("unsupported cache version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("malformed kanji dataset: {0}")]
    Dataset(String),
}
