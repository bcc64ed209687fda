mod entry;
mod memory;

pub use entry::{LexicalEntry, ReadingForm, Sense, WrittenForm};
pub use memory::MemoryLexicon;

use std::io;

/// Error type for lexicon source loading.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },
}

/// Query pattern for entry lookup.
///
/// `Exact` matches a full written or reading form; `Contains` is the
/// wildcard scan used when hunting for words built around one kanji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupPattern {
    Exact(String),
    Contains(String),
}

/// Read-only entry lookup over the lexical store.
///
/// Implementations must not fail on "no match"; an empty result is a normal
/// outcome. The store is never mutated after load, so shared references are
/// safe across threads; serialized access is the owner's concern (see
/// `worker`).
pub trait Lexicon: Send + Sync {
    /// All entries with a form matching `pattern`, in stable store order.
    fn lookup(&self, pattern: &LookupPattern) -> Vec<&LexicalEntry>;

    /// Iterate every entry in the store. Used for one-off full scans such
    /// as the frequency-table build.
    fn entries(&self) -> Box<dyn Iterator<Item = &LexicalEntry> + '_>;
}
