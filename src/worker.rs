//! Single-owner access point for the lexical store.
//!
//! The store handle is not assumed safe for concurrent access, so one
//! dedicated thread owns the whole `Service` and requests are serialized
//! through a channel. The selection algorithm itself is pure computation;
//! this thread is the only concurrency boundary.

use std::sync::mpsc;
use std::thread;

use crate::api::{ApiError, LookupWordsResponse, Service, WordDetails};
use crate::select::{PickRequest, RandomChooser, WordChoice};
use crate::tables::LevelPolicy;

enum Command {
    Pick {
        request: PickRequest,
        reply: mpsc::Sender<Option<WordChoice>>,
    },
    WordDetails {
        word: String,
        reply: mpsc::Sender<Result<WordDetails, ApiError>>,
    },
    LookupWords {
        reading: String,
        kanji_to_match: Option<String>,
        min_length: usize,
        min_kanji: usize,
        policy: LevelPolicy,
        reply: mpsc::Sender<Result<LookupWordsResponse, ApiError>>,
    },
}

/// Handle to the worker thread. Clone-free by design: share it behind an
/// `Arc` if multiple request handlers need it.
pub struct SelectionWorker {
    tx: mpsc::Sender<Command>,
}

impl SelectionWorker {
    /// Spawn the owning thread. The service (and with it the store handle)
    /// moves onto the thread; the chooser lives there too, so picks stay
    /// randomized across requests.
    pub fn spawn(service: Service, chooser: RandomChooser) -> Self {
        let (tx, rx) = mpsc::channel::<Command>();
        thread::Builder::new()
            .name("kotoba-select".into())
            .spawn(move || worker_loop(rx, service, chooser))
            .expect("failed to spawn selection worker");
        Self { tx }
    }

    pub fn pick(&self, request: PickRequest) -> Result<Option<WordChoice>, ApiError> {
        let (reply, rx) = mpsc::channel();
        self.tx
            .send(Command::Pick { request, reply })
            .map_err(|_| ApiError::WorkerGone)?;
        rx.recv().map_err(|_| ApiError::WorkerGone)
    }

    pub fn word_details(&self, word: &str) -> Result<WordDetails, ApiError> {
        let (reply, rx) = mpsc::channel();
        self.tx
            .send(Command::WordDetails {
                word: word.to_string(),
                reply,
            })
            .map_err(|_| ApiError::WorkerGone)?;
        rx.recv().map_err(|_| ApiError::WorkerGone)?
    }

    pub fn lookup_words(
        &self,
        reading: &str,
        kanji_to_match: Option<&str>,
        min_length: usize,
        min_kanji: usize,
        policy: LevelPolicy,
    ) -> Result<LookupWordsResponse, ApiError> {
        let (reply, rx) = mpsc::channel();
        self.tx
            .send(Command::LookupWords {
                reading: reading.to_string(),
                kanji_to_match: kanji_to_match.map(str::to_string),
                min_length,
                min_kanji,
                policy,
                reply,
            })
            .map_err(|_| ApiError::WorkerGone)?;
        rx.recv().map_err(|_| ApiError::WorkerGone)?
    }
}

fn worker_loop(rx: mpsc::Receiver<Command>, service: Service, mut chooser: RandomChooser) {
    while let Ok(command) = rx.recv() {
        match command {
            Command::Pick { request, reply } => {
                let _ = reply.send(service.find_word_with_kanji(&request, &mut chooser));
            }
            Command::WordDetails { word, reply } => {
                let _ = reply.send(service.word_details(&word));
            }
            Command::LookupWords {
                reading,
                kanji_to_match,
                min_length,
                min_kanji,
                policy,
                reply,
            } => {
                let _ = reply.send(service.lookup_word_entries(
                    &reading,
                    kanji_to_match.as_deref(),
                    min_length,
                    min_kanji,
                    policy,
                ));
            }
        }
    }
    // Channel closed: all handles dropped, thread winds down.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{LexicalEntry, MemoryLexicon, ReadingForm, Sense, WrittenForm};
    use crate::tables::{FrequencyTable, KanjiDataset, LevelIndex, LevelScheme};

    fn service() -> Service {
        let lexicon = MemoryLexicon::from_entries([LexicalEntry {
            idseq: 1,
            kanji_forms: vec![WrittenForm {
                text: "音楽".to_string(),
                priorities: vec![],
            }],
            kana_forms: vec![ReadingForm {
                text: "おんがく".to_string(),
                priorities: vec![],
            }],
            senses: vec![Sense {
                glosses: vec!["music".to_string()],
                pos: vec![],
            }],
        }]);
        let dataset =
            KanjiDataset::from_json(r#"{"音": {"jlpt_new": 4}, "楽": {"jlpt_new": 4}}"#).unwrap();
        let index = LevelIndex::build(&dataset, LevelScheme::Jlpt);
        let freq = FrequencyTable::from_ranked_surfaces([("音楽".to_string(), 50)]);
        Service::from_parts(Box::new(lexicon), dataset, index, freq)
    }

    #[test]
    fn test_request_reply_roundtrip() {
        let worker = SelectionWorker::spawn(service(), RandomChooser::seeded(0));

        let mut request = PickRequest::new("音", LevelPolicy::AtLeast(1));
        request.min_length = 2;
        let choice = worker.pick(request).unwrap().unwrap();
        assert_eq!(choice.word, "音楽");

        let details = worker.word_details("音楽").unwrap();
        assert_eq!(details.meaning, "music");

        let miss = worker.word_details("存在しない");
        assert!(miss.is_err());
    }

    #[test]
    fn test_lookup_words_through_worker() {
        let worker = SelectionWorker::spawn(service(), RandomChooser::seeded(0));
        let resp = worker
            .lookup_words("おんがく", None, 1, 1, LevelPolicy::AtLeast(1))
            .unwrap();
        assert_eq!(resp.valid_entries.len(), 1);
        assert_eq!(resp.valid_entries[0].word, "音楽");
    }
}
