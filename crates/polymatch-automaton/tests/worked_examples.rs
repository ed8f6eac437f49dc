//! End-to-end scans of known pattern sets, run against every transition
//! strategy and both children backends.

use polymatch_automaton::{
    AhoCorasick, Automaton, DenseAhoCorasick, HashedChildren, LazyAhoCorasick, Match,
    TrieBuilder,
};

const HISHER_PATTERNS: [&str; 8] = ["he", "is", "she", "his", "her", "h", "hishera", "azaza"];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Every strategy/backend combination built from the same patterns.
fn all_automata(patterns: &[&str]) -> Vec<(&'static str, Box<dyn Automaton<char>>)> {
    let chars = || patterns.iter().map(|p| p.chars());

    let ordered = AhoCorasick::build(chars()).unwrap();
    let mut hashed_builder = TrieBuilder::<char, HashedChildren<char>>::hashed();
    hashed_builder.extend(chars()).unwrap();
    let hashed = hashed_builder.complete();

    let dense = DenseAhoCorasick::new(AhoCorasick::build(chars()).unwrap()).unwrap();
    let mut dense_hashed_builder = TrieBuilder::<char, HashedChildren<char>>::hashed();
    dense_hashed_builder.extend(chars()).unwrap();
    let dense_hashed = DenseAhoCorasick::new(dense_hashed_builder.complete()).unwrap();

    let mut lazy_builder = TrieBuilder::<char>::new();
    lazy_builder.extend(chars()).unwrap();
    let lazy = LazyAhoCorasick::new(lazy_builder);

    let mut lazy_hashed_builder = TrieBuilder::<char, HashedChildren<char>>::hashed();
    lazy_hashed_builder.extend(chars()).unwrap();
    let lazy_hashed = LazyAhoCorasick::new(lazy_hashed_builder);

    vec![
        ("walk/ordered", Box::new(ordered) as Box<dyn Automaton<char>>),
        ("walk/hashed", Box::new(hashed) as Box<dyn Automaton<char>>),
        ("dense/ordered", Box::new(dense) as Box<dyn Automaton<char>>),
        ("dense/hashed", Box::new(dense_hashed) as Box<dyn Automaton<char>>),
        ("lazy/ordered", Box::new(lazy) as Box<dyn Automaton<char>>),
        ("lazy/hashed", Box::new(lazy_hashed) as Box<dyn Automaton<char>>),
    ]
}

/// Matched substrings in report order.
fn matched_strings(automaton: &dyn Automaton<char>, corpus: &str) -> Vec<String> {
    let chars: Vec<char> = corpus.chars().collect();
    let mut found = Vec::new();
    polymatch_automaton::search::find_matches(automaton, chars.iter().copied(), |m| {
        found.push(m.slice(&chars).iter().collect::<String>());
        true
    });
    found
}

/// Spans sorted by (end, start, pattern), for strategy-independent comparison.
fn sorted_matches(automaton: &dyn Automaton<char>, corpus: &str) -> Vec<Match> {
    let mut found = Vec::new();
    polymatch_automaton::search::find_matches(automaton, corpus.chars(), |m| {
        found.push(m);
        true
    });
    found.sort_by_key(|m| (m.end(), m.start(), m.pattern()));
    found
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn hisher_worked_example() {
    for (name, automaton) in all_automata(&HISHER_PATTERNS) {
        assert_eq!(
            matched_strings(automaton.as_ref(), "hisher"),
            vec!["h", "his", "is", "h", "she", "he", "her"],
            "{name}"
        );
    }
}

#[test]
fn hisher_spans() {
    let ac = AhoCorasick::build(HISHER_PATTERNS.map(str::chars)).unwrap();
    let mut spans = Vec::new();
    assert!(ac.find("hisher".chars(), |start, end| {
        spans.push((start, end));
        true
    }));
    assert_eq!(
        spans,
        vec![(0, 1), (0, 3), (1, 3), (3, 4), (2, 5), (3, 5), (3, 6)]
    );
}

#[test]
fn ends_are_non_decreasing() {
    for (name, automaton) in all_automata(&HISHER_PATTERNS) {
        let mut last_end = 0;
        polymatch_automaton::search::find_matches(
            automaton.as_ref(),
            "ahishersheazazazahishera".chars(),
            |m| {
                assert!(m.end() >= last_end, "{name}: {m:?} after end {last_end}");
                last_end = m.end();
                true
            },
        );
    }
}

#[test]
fn strategies_and_backends_agree() {
    let patterns = ["a", "ab", "bab", "bc", "bca", "c", "caa", "abcab"];
    let corpora = ["abccab", "", "bcabcabca", "aaaa", "xyzzy", "cabcaabcab"];
    let automata = all_automata(&patterns);
    let (_, reference) = &automata[0];
    for corpus in corpora {
        let expected = sorted_matches(reference.as_ref(), corpus);
        for (name, automaton) in &automata[1..] {
            assert_eq!(
                sorted_matches(automaton.as_ref(), corpus),
                expected,
                "{name} on {corpus:?}"
            );
        }
    }
}

#[test]
fn empty_pattern_set_matches_nothing() {
    for (name, automaton) in all_automata(&[]) {
        let mut calls = 0;
        let complete = polymatch_automaton::search::find_matches(
            automaton.as_ref(),
            "anything".chars(),
            |_| {
                calls += 1;
                true
            },
        );
        assert!(complete, "{name}");
        assert_eq!(calls, 0, "{name}");
        assert_eq!(automaton.state_count(), 1, "{name}");
    }
}

#[test]
fn empty_corpus_matches_nothing() {
    for (name, automaton) in all_automata(&HISHER_PATTERNS) {
        let mut calls = 0;
        let complete =
            polymatch_automaton::search::find_matches(automaton.as_ref(), "".chars(), |_| {
                calls += 1;
                true
            });
        assert!(complete, "{name}");
        assert_eq!(calls, 0, "{name}");
    }
}

#[test]
fn early_abort_stops_the_scan() {
    let ac = AhoCorasick::build(["ab"].map(str::chars)).unwrap();
    let mut calls = 0;
    let complete = ac.find("ab ab ab".chars(), |start, end| {
        calls += 1;
        assert_eq!((start, end), (0, 2));
        false
    });
    assert!(!complete);
    assert_eq!(calls, 1);
}

#[test]
fn abort_after_match_budget() {
    let ac = AhoCorasick::build(HISHER_PATTERNS.map(str::chars)).unwrap();
    let mut seen = Vec::new();
    let complete = ac.find_matches("hisherhisher".chars(), |m| {
        seen.push(m);
        seen.len() < 4
    });
    assert!(!complete);
    assert_eq!(seen.len(), 4);
}

#[test]
fn repeated_scans_are_identical() {
    let ac = AhoCorasick::build(HISHER_PATTERNS.map(str::chars)).unwrap();
    let first: Vec<Match> = ac.find_iter("hishershe".chars()).collect();
    for _ in 0..3 {
        let again: Vec<Match> = ac.find_iter("hishershe".chars()).collect();
        assert_eq!(again, first);
    }
}

#[test]
fn nested_and_overlapping_matches() {
    let ac = AhoCorasick::build(["aba", "b", "bab", "ababa"].map(str::chars)).unwrap();
    let spans: Vec<(usize, usize, usize)> = ac
        .find_iter("ababa".chars())
        .map(|m| (m.pattern().as_usize(), m.start(), m.end()))
        .collect();
    assert_eq!(
        spans,
        vec![
            (1, 1, 2),
            (0, 0, 3),
            (2, 1, 4),
            (1, 3, 4),
            (3, 0, 5),
            (0, 2, 5),
        ]
    );
}

#[test]
fn byte_patterns_over_binary_corpus() {
    let ac = AhoCorasick::build([&[0x00u8, 0xFF][..], &[0xFF, 0xFF][..]].map(|p| p.iter().copied()))
        .unwrap();
    let corpus = [0x10, 0x00, 0xFF, 0xFF, 0xFF];
    let spans: Vec<(usize, usize)> = ac
        .find_iter(corpus.iter().copied())
        .map(|m| (m.start(), m.end()))
        .collect();
    assert_eq!(spans, vec![(1, 3), (2, 4), (3, 5)]);
}

#[test]
fn shared_across_threads() {
    let ac = AhoCorasick::build(HISHER_PATTERNS.map(str::chars)).unwrap();
    let expected: Vec<Match> = ac.find_iter("hisher".chars()).collect();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let found: Vec<Match> = ac.find_iter("hisher".chars()).collect();
                assert_eq!(found, expected);
            });
        }
    });
}
