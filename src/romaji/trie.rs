use std::collections::HashMap;
use std::sync::OnceLock;

use super::table::MAPPINGS;

struct Node {
    children: HashMap<u8, Node>,
    kana: Option<String>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            kana: None,
        }
    }
}

/// Byte trie over the romaji mapping table, resolving the longest mapping
/// that prefixes the input.
pub struct RomajiTrie {
    root: Node,
}

impl RomajiTrie {
    /// Get or initialize the global singleton.
    pub fn global() -> &'static RomajiTrie {
        static INSTANCE: OnceLock<RomajiTrie> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let mut trie = RomajiTrie { root: Node::new() };
            for &(romaji, kana) in MAPPINGS {
                trie.insert(romaji, kana);
            }
            trie
        })
    }

    fn insert(&mut self, romaji: &str, kana: &str) {
        let mut node = &mut self.root;
        for &b in romaji.as_bytes() {
            node = node.children.entry(b).or_insert_with(Node::new);
        }
        node.kana = Some(kana.to_string());
    }

    /// Longest mapping that is a prefix of `input`, as (consumed bytes,
    /// kana). Returns `None` when no mapping matches at all.
    pub fn longest_match(&self, input: &str) -> Option<(usize, &str)> {
        let mut node = &self.root;
        let mut best: Option<(usize, &str)> = None;
        for (idx, &b) in input.as_bytes().iter().enumerate() {
            match node.children.get(&b) {
                Some(child) => node = child,
                None => break,
            }
            if let Some(kana) = &node.kana {
                best = Some((idx + 1, kana.as_str()));
            }
        }
        best
    }
}
