//! Word-selection engine for a Japanese-vocabulary learning game.
//!
//! Given a kanji to drill and a set of constraints (minimum length,
//! difficulty bound, exclusion lists), the engine filters dictionary
//! entries into valid candidates, ranks them by corpus frequency, and
//! picks one at random from the top of the ranking. The HTTP transport in
//! front of it is deliberately out of scope; `api` exposes the response
//! shapes it serializes.

pub mod api;
pub mod lexicon;
pub mod romaji;
pub mod select;
pub mod tables;
pub mod trace_init;
pub mod unicode;
pub mod worker;

pub use api::Service;
pub use select::{pick_word, Chooser, PickRequest, RandomChooser, WordChoice};
pub use tables::{FrequencyTable, KanjiDataset, LevelIndex, LevelPolicy, LevelScheme};
