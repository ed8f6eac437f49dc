// Quick test: build an automaton from a word list and scan a text file with it.
//
//   cargo run -p polymatch-automaton --example scan_text -- WORDS TEXT
use std::fs;

use polymatch_automaton::{AhoCorasick, Automaton};

fn main() {
    let mut args = std::env::args().skip(1);
    let words_path = args.next().unwrap_or_else(|| "/usr/share/dict/words".to_string());
    let text_path = args.next().expect("usage: scan_text WORDS TEXT");

    let words = fs::read_to_string(&words_path).expect("failed to read word list");
    let text = fs::read_to_string(&text_path).expect("failed to read text");
    let words: Vec<&str> = words.lines().filter(|w| !w.is_empty()).collect();
    println!("Loaded {}: {} words", words_path, words.len());

    let ac = AhoCorasick::build(words.iter().map(|w| w.chars())).expect("failed to build automaton");
    println!(
        "States: {}, patterns: {}, longest: {}",
        ac.state_count(),
        ac.pattern_count(),
        ac.max_pattern_len()
    );

    let mut hits = vec![0usize; words.len()];
    ac.find_matches(text.chars(), |m| {
        hits[m.pattern().as_usize()] += 1;
        true
    });

    let mut ranked: Vec<(usize, &str)> = hits
        .iter()
        .copied()
        .zip(words.iter().copied())
        .filter(|&(n, _)| n > 0)
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(b.1)));

    println!("\n{} distinct words found", ranked.len());
    for (count, word) in ranked.iter().take(20) {
        println!("  {:15} {}", word, count);
    }
}
