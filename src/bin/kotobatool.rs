use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use unicode_width::UnicodeWidthStr;

use kotoba_engine::api::{result_json, Service};
use kotoba_engine::lexicon::MemoryLexicon;
use kotoba_engine::romaji::to_hiragana;
use kotoba_engine::select::{PickRequest, RandomChooser};
use kotoba_engine::tables::{KanjiDataset, LevelPolicy, LevelScheme};
use kotoba_engine::unicode::is_hiragana_reading;

#[derive(Parser)]
#[command(name = "kotobatool", about = "Word-selection diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pick one word containing a kanji, the way the game would
    Pick {
        /// Path to the lexicon JSONL file
        lexicon_file: PathBuf,
        /// Path to the kanji dataset JSON
        kanji_file: PathBuf,
        /// Kanji the word must contain
        kanji: String,
        /// Grading scheme (jlpt or grade)
        #[arg(long, default_value = "jlpt")]
        scheme: String,
        /// Level bound (floor for jlpt, ceiling for grade)
        #[arg(long, default_value = "1")]
        level: u8,
        /// Minimum word length in characters
        #[arg(long, default_value = "2")]
        min_length: usize,
        /// Minimum number of qualifying kanji
        #[arg(long, default_value = "1")]
        min_kanjis: usize,
        /// Size of the top-ranked window to draw from
        #[arg(long, default_value = "3")]
        pool_size: usize,
        /// Words to exclude (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
        /// RNG seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
        /// Directory for the frequency cache
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// List entries for a reading and why forms were rejected
    Lookup {
        /// Path to the lexicon JSONL file
        lexicon_file: PathBuf,
        /// Path to the kanji dataset JSON
        kanji_file: PathBuf,
        /// Kana reading to look up
        reading: String,
        /// Require this kanji in the surface
        #[arg(long)]
        kanji: Option<String>,
        /// Minimum word length in characters
        #[arg(long, default_value = "1")]
        min_length: usize,
        /// Minimum number of qualifying kanji
        #[arg(long, default_value = "1")]
        min_kanjis: usize,
        /// Directory for the frequency cache
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show meaning and frequency rank for one word
    Details {
        /// Path to the lexicon JSONL file
        lexicon_file: PathBuf,
        /// Path to the kanji dataset JSON
        kanji_file: PathBuf,
        /// Word to look up (exact form)
        word: String,
        /// Directory for the frequency cache
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Convert romaji to hiragana
    ToKana {
        /// Romaji input
        romaji: String,
    },
}

fn main() {
    kotoba_engine::trace_init::init_from_env();
    let cli = Cli::parse();
    match cli.command {
        Command::Pick {
            lexicon_file,
            kanji_file,
            kanji,
            scheme,
            level,
            min_length,
            min_kanjis,
            pool_size,
            exclude,
            seed,
            data_dir,
        } => {
            let (scheme, policy) = parse_policy(&scheme, level);
            let service = open_service(&lexicon_file, &kanji_file, scheme, &data_dir);

            let mut request = PickRequest::new(kanji, policy);
            request.min_length = min_length;
            request.min_kanji = min_kanjis;
            request.pool_size = pool_size;
            request.excluded_words = exclude.into_iter().collect::<HashSet<_>>();

            let mut chooser = match seed {
                Some(seed) => RandomChooser::seeded(seed),
                None => RandomChooser::new(),
            };
            let choice = service.find_word_with_kanji(&request, &mut chooser);
            println!("{}", result_json(choice.as_ref()));
        }

        Command::Lookup {
            lexicon_file,
            kanji_file,
            reading,
            kanji,
            min_length,
            min_kanjis,
            data_dir,
            json,
        } => {
            // Accept romaji the way the game input box does.
            let reading = if is_hiragana_reading(&reading) {
                reading
            } else {
                let conv = to_hiragana(&reading);
                if !conv.valid {
                    eprintln!("Error: {reading} is not a kana reading");
                    process::exit(1);
                }
                conv.hiragana
            };

            let service = open_service(&lexicon_file, &kanji_file, LevelScheme::Jlpt, &data_dir);
            let resp = service
                .lookup_word_entries(
                    &reading,
                    kanji.as_deref(),
                    min_length,
                    min_kanjis,
                    LevelPolicy::AtLeast(1),
                )
                .unwrap_or_else(|e| {
                    eprintln!("Error: {e}");
                    process::exit(1);
                });

            if json {
                match serde_json::to_string_pretty(&resp) {
                    Ok(out) => println!("{out}"),
                    Err(e) => {
                        eprintln!("Error serializing response: {e}");
                        process::exit(1);
                    }
                }
                return;
            }

            // Column width by display cells, not chars; kanji are wide.
            let width = resp
                .valid_entries
                .iter()
                .map(|c| c.word.width())
                .max()
                .unwrap_or(0);
            for choice in &resp.valid_entries {
                let meaning = choice.entry.primary_meaning().unwrap_or_default();
                let rank = service.freq().rank(&choice.word);
                let pad = width - choice.word.width();
                match rank {
                    Some(rank) => {
                        println!("{}{} {meaning} (rank {rank})", choice.word, " ".repeat(pad))
                    }
                    None => println!("{}{} {meaning}", choice.word, " ".repeat(pad)),
                }
            }
            for error in &resp.errors {
                println!("- rejected: {error}");
            }
        }

        Command::Details {
            lexicon_file,
            kanji_file,
            word,
            data_dir,
        } => {
            let service = open_service(&lexicon_file, &kanji_file, LevelScheme::Jlpt, &data_dir);
            match service.word_details(&word) {
                Ok(details) => match serde_json::to_string_pretty(&details) {
                    Ok(out) => println!("{out}"),
                    Err(e) => {
                        eprintln!("Error serializing response: {e}");
                        process::exit(1);
                    }
                },
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            }
        }

        Command::ToKana { romaji } => {
            let conv = to_hiragana(&romaji);
            println!("{}", conv.hiragana);
            if !conv.valid {
                eprintln!("(input not fully convertible)");
            }
        }
    }
}

fn parse_policy(scheme: &str, level: u8) -> (LevelScheme, LevelPolicy) {
    match scheme {
        "jlpt" => (LevelScheme::Jlpt, LevelPolicy::AtLeast(level)),
        "grade" => (LevelScheme::Grade, LevelPolicy::AtMost(level)),
        other => {
            eprintln!("Error: unknown scheme {other} (expected jlpt or grade)");
            process::exit(1);
        }
    }
}

fn open_service(
    lexicon_file: &Path,
    kanji_file: &Path,
    scheme: LevelScheme,
    data_dir: &Path,
) -> Service {
    let lexicon = MemoryLexicon::open(lexicon_file).unwrap_or_else(|e| {
        eprintln!("Error loading lexicon: {e}");
        process::exit(1);
    });
    let dataset = KanjiDataset::open(kanji_file).unwrap_or_else(|e| {
        eprintln!("Error loading kanji dataset: {e}");
        process::exit(1);
    });
    Service::open(Box::new(lexicon), dataset, scheme, data_dir).unwrap_or_else(|e| {
        eprintln!("Error building tables: {e}");
        process::exit(1);
    })
}
