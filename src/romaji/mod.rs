mod convert;
mod table;
mod trie;

pub use convert::{to_hiragana, HiraganaConversion};
pub use trie::RomajiTrie;
