use std::env;
use std::fs;
use std::process;

use crossfill::{generate_filled_grid, DictionaryIndex, GenerationConfig};

/// Load a word list with one word per line. Lines that fail normalization
/// (blank, non-alphabetic) are skipped by the lenient build.
fn load_dictionary(path: &str) -> DictionaryIndex {
    let contents = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("failed to read word list {path}: {err}");
        process::exit(1);
    });
    DictionaryIndex::build(contents.lines())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: {} <word-list> <size 3..=7> [seed]", args[0]);
        process::exit(2);
    }

    let dictionary = load_dictionary(&args[1]);
    let size: usize = args[2].parse().unwrap_or_else(|_| {
        eprintln!("size must be an integer, got {:?}", args[2]);
        process::exit(2);
    });
    let seed: u64 = match args.get(3) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("seed must be an integer, got {raw:?}");
            process::exit(2);
        }),
        None => 0,
    };

    let mut config = GenerationConfig::new(size);
    config.seed = seed;

    let puzzle = match generate_filled_grid(&dictionary, &config) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            eprintln!("generation failed: {err}");
            process::exit(1);
        }
    };

    println!("{:?}", puzzle.statistics);
    println!("{}", puzzle.grid);
    println!();
    println!("Across:");
    for entry in &puzzle.entries.across {
        println!("  {:>2}. {}", entry.number, entry.word);
    }
    println!("Down:");
    for entry in &puzzle.entries.down {
        println!("  {:>2}. {}", entry.number, entry.word);
    }
}
