use std::fs;
use std::path::Path;
use std::process;

use kotoba_engine::lexicon::MemoryLexicon;
use kotoba_engine::tables::{FrequencyTable, KanjiDataset, LevelIndex, LevelScheme};

const KANJI_DATASET_URL: &str =
    "https://raw.githubusercontent.com/davidluzgouveia/kanji-data/master/kanji-jouyou.json";

/// Unwrap a Result or print the error and exit.
macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

fn main() {
    kotoba_engine::trace_init::init_from_env();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage();
    }

    match args[1].as_str() {
        "fetch" => {
            if args.len() != 3 {
                eprintln!("Usage: datatool fetch <output-dir>");
                process::exit(1);
            }
            fetch(&args[2]);
        }
        "build-freq" => {
            if args.len() != 4 {
                eprintln!("Usage: datatool build-freq <lexicon-jsonl> <output-file>");
                process::exit(1);
            }
            build_freq(&args[2], &args[3]);
        }
        "build-levels" => parse_build_levels(&args[2..]),
        "info" => {
            if args.len() != 3 {
                eprintln!("Usage: datatool info <levels-file>");
                process::exit(1);
            }
            info(&args[2]);
        }
        _ => usage(),
    }
}

fn usage() -> ! {
    eprintln!("Usage: datatool <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  fetch         <output-dir>");
    eprintln!("  build-freq    <lexicon-jsonl> <output-file>");
    eprintln!("  build-levels  [--scheme jlpt|grade] <kanji-json> <output-file>");
    eprintln!("  info          <levels-file>");
    process::exit(1);
}

fn fetch(output_dir: &str) {
    let dir = Path::new(output_dir);
    die!(fs::create_dir_all(dir), "Error creating output dir: {}");

    println!("Downloading kanji dataset...");
    let body = die!(
        ureq::get(KANJI_DATASET_URL)
            .call()
            .map_err(|e| format!("{KANJI_DATASET_URL}: {e}"))
            .and_then(|resp| resp
                .into_body()
                .read_to_string()
                .map_err(|e| format!("{KANJI_DATASET_URL}: {e}"))),
        "Error downloading kanji dataset: {}"
    );

    // Validate before writing so a bad download never becomes a cache.
    die!(
        KanjiDataset::from_json(&body),
        "Error parsing downloaded dataset: {}"
    );

    let dest = dir.join("kanji-jouyou.json");
    die!(fs::write(&dest, body), "Error writing dataset: {}");
    println!("Wrote {}", dest.display());
}

fn build_freq(lexicon_path: &str, output_path: &str) {
    let lexicon = die!(
        MemoryLexicon::open(Path::new(lexicon_path)),
        "Error loading lexicon: {}"
    );
    println!("Loaded {} entries", lexicon.len());

    let output = Path::new(output_path);
    // ensure() only builds when the file is absent; a rebuild was asked
    // for explicitly here.
    if output.exists() {
        die!(fs::remove_file(output), "Error removing old table: {}");
    }
    let table = die!(
        FrequencyTable::ensure(output, &lexicon),
        "Error building frequency table: {}"
    );
    println!("Wrote {} ranked surfaces to {}", table.len(), output_path);
}

fn parse_build_levels(args: &[String]) {
    let mut scheme = LevelScheme::Jlpt;
    let mut positional = Vec::new();

    let mut i = 0;
    while i < args.len() {
        if args[i] == "--scheme" {
            i += 1;
            if i >= args.len() {
                eprintln!("Error: --scheme requires a value (jlpt, grade)");
                process::exit(1);
            }
            scheme = match args[i].as_str() {
                "jlpt" => LevelScheme::Jlpt,
                "grade" => LevelScheme::Grade,
                other => {
                    eprintln!("Error: unknown scheme {other} (expected jlpt or grade)");
                    process::exit(1);
                }
            };
        } else {
            positional.push(args[i].as_str());
        }
        i += 1;
    }

    if positional.len() != 2 {
        eprintln!("Usage: datatool build-levels [--scheme jlpt|grade] <kanji-json> <output-file>");
        process::exit(1);
    }
    build_levels(positional[0], positional[1], scheme);
}

fn build_levels(kanji_path: &str, output_path: &str, scheme: LevelScheme) {
    let dataset = die!(
        KanjiDataset::open(Path::new(kanji_path)),
        "Error loading kanji dataset: {}"
    );
    println!("Loaded {} kanji", dataset.len());

    let index = LevelIndex::build(&dataset, scheme);
    let (levels, graded) = index.stats();
    die!(
        index.save(Path::new(output_path)),
        "Error writing level cache: {}"
    );
    println!("Wrote {graded} graded kanji across {levels} levels to {output_path}");
}

fn info(levels_path: &str) {
    let index = die!(
        LevelIndex::open(Path::new(levels_path)),
        "Error loading level cache: {}"
    );
    let (levels, graded) = index.stats();
    println!("Scheme:  {:?}", index.scheme());
    println!("Levels:  {levels}");
    println!("Kanji:   {graded}");
}
