//! Candidate selection: aggregate valid candidates across matching entries,
//! rank them by corpus frequency, and make a weighted-random final pick.

mod filter;
mod normalize;


pub use filter::{
    canonical_form, qualifying_kanjis, validate_candidate, CanonicalForm, Constraints,
    MalformedPolicy, Rejection,
};
pub use normalize::{normalize_entry, WordChoice};

use std::collections::{BTreeSet, HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, debug_span};

use crate::lexicon::{LexicalEntry, Lexicon, LookupPattern};
use crate::tables::{FrequencyTable, LevelIndex, LevelPolicy};
use crate::unicode::{classify_char, CharClass};

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("no valid written form for entry {idseq}")]
    NoValidForm { idseq: u64 },
}

/// Final-choice randomness seam. The selector only ever asks for an index
/// into a window; tests inject deterministic implementations.
pub trait Chooser {
    /// Pick an index in `0..len`. `len` is always ≥ 1.
    fn choose(&mut self, len: usize) -> usize;
}

/// Default chooser backed by a seedable RNG.
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl Chooser for RandomChooser {
    fn choose(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// One selection request: the kanji being drilled plus every knob the game
/// exposes. Defaults mirror the service's query-parameter defaults.
#[derive(Debug, Clone)]
pub struct PickRequest {
    pub kanji_to_match: String,
    pub min_length: usize,
    pub min_kanji: usize,
    pub policy: LevelPolicy,
    pub excluded_words: HashSet<String>,
    pub excluded_chars: HashSet<char>,
    /// Require every ideographic character of the surface to pass the level
    /// bound (not just the minimum count), and no excluded character.
    pub graded_only: bool,
    /// Width of the top-ranked window the final random pick draws from.
    pub pool_size: usize,
}

impl PickRequest {
    pub fn new(kanji_to_match: impl Into<String>, policy: LevelPolicy) -> Self {
        Self {
            kanji_to_match: kanji_to_match.into(),
            min_length: 1,
            min_kanji: 1,
            policy,
            excluded_words: HashSet::new(),
            excluded_chars: HashSet::new(),
            graded_only: true,
            pool_size: 3,
        }
    }
}

/// A surviving candidate: chosen surface, its ideographic characters, and
/// the backing entry. Lives only for the duration of one request.
struct Candidate<'a> {
    surface: String,
    kanjis: BTreeSet<char>,
    entry: &'a LexicalEntry,
}

/// Select one word containing the requested kanji, or `None` when no entry
/// survives the filters. An empty pool is a normal outcome, never an error.
///
/// Ranked candidates are sorted ascending by frequency rank and the final
/// pick is uniform over the top `pool_size` — variety on purpose, instead
/// of always returning the single most common word. When nothing is ranked
/// the pick is uniform over the whole pool.
pub fn pick_word(
    lexicon: &dyn Lexicon,
    index: &LevelIndex,
    freq: &FrequencyTable,
    request: &PickRequest,
    chooser: &mut dyn Chooser,
) -> Option<WordChoice> {
    let _span = debug_span!("pick_word", kanji = %request.kanji_to_match).entered();

    let constraints = Constraints {
        required: Some(request.kanji_to_match.clone()),
        min_length: request.min_length,
        min_kanji: request.min_kanji,
        policy: request.policy,
    };

    let entries = lexicon.lookup(&LookupPattern::Contains(request.kanji_to_match.clone()));

    // Pool keyed by surface, last entry wins on collision; insertion order
    // is kept so rank ties stay stable within one request.
    let mut pool: Vec<Candidate<'_>> = Vec::new();
    let mut by_surface: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let Some(canonical) = canonical_form(entry, index) else {
            debug!(idseq = entry.idseq, "no valid written form, skipping");
            continue;
        };
        // The canonical surface is the entry's one shot: an excluded
        // surface drops the whole entry, with no fallback to other forms.
        if request.excluded_words.contains(&canonical.surface) {
            continue;
        }
        if let Err(reason) = validate_candidate(&canonical.surface, &constraints, index) {
            debug!(surface = %canonical.surface, reason = reason.code(), "rejected");
            continue;
        }
        if request.graded_only && !all_chars_admissible(&canonical.surface, index, request) {
            debug!(surface = %canonical.surface, "rejected: ungraded or excluded character");
            continue;
        }

        match by_surface.get(&canonical.surface) {
            Some(&idx) => pool[idx].entry = entry,
            None => {
                by_surface.insert(canonical.surface.clone(), pool.len());
                pool.push(Candidate {
                    surface: canonical.surface,
                    kanjis: canonical.kanjis,
                    entry,
                });
            }
        }
    }

    if pool.is_empty() {
        debug!("empty candidate pool");
        return None;
    }

    let mut ranked: Vec<(usize, usize)> = pool
        .iter()
        .enumerate()
        .filter_map(|(idx, c)| freq.rank(&c.surface).map(|rank| (idx, rank)))
        .collect();

    let chosen = if ranked.is_empty() {
        // Nothing ranked: uniform over the entire pool.
        &pool[chooser.choose(pool.len())]
    } else {
        ranked.sort_by_key(|&(_, rank)| rank);
        let window = request.pool_size.min(ranked.len()).max(1);
        let (idx, rank) = ranked[chooser.choose(window)];
        debug!(
            pool = pool.len(),
            ranked = ranked.len(),
            window,
            rank,
            "picking from ranked window"
        );
        &pool[idx]
    };

    debug!(surface = %chosen.surface, "picked");
    Some(WordChoice::new(&chosen.surface, &chosen.kanjis, chosen.entry))
}

/// Graded-only gate: every ideographic character passes the level bound and
/// no character at all appears on the exclusion list.
fn all_chars_admissible(surface: &str, index: &LevelIndex, request: &PickRequest) -> bool {
    surface.chars().all(|c| {
        !request.excluded_chars.contains(&c)
            && (classify_char(c) != CharClass::Ideographic || index.admits(c, request.policy))
    })
}
