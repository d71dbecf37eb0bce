//! The dictionary index: a canonical normalized word set, bucketed by length,
//! with one trie per bucket answering pattern-match queries.
//!
//! A pattern is a per-position sequence of constraints (`Fixed` letter or
//! `Wildcard`). Queries descend the bucket's trie depth-first, following only
//! the children a pattern position admits, so enumeration and counting cost is
//! proportional to the pruned search rather than the bucket size.

use smallvec::SmallVec;

use crate::error::GenerationError;
use crate::MAX_SLOT_LENGTH;

pub const ALPHABET_SIZE: usize = 26;

/// A single position constraint within a slot pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternAtom {
    Wildcard,
    Fixed(char),
}

impl PatternAtom {
    fn admits(&self, letter: usize) -> bool {
        match *self {
            PatternAtom::Wildcard => true,
            PatternAtom::Fixed(c) => letter_index(c) == Some(letter),
        }
    }
}

/// The constraint a partially-filled slot currently places on candidate words.
pub type Pattern = SmallVec<[PatternAtom; MAX_SLOT_LENGTH]>;

/// Number of unconstrained positions in a pattern.
pub fn wildcard_count(pattern: &Pattern) -> usize {
    pattern
        .iter()
        .filter(|atom| matches!(atom, PatternAtom::Wildcard))
        .count()
}

/// If every position is fixed, the word the pattern spells.
pub fn completed_word(pattern: &Pattern) -> Option<String> {
    pattern
        .iter()
        .map(|atom| match atom {
            PatternAtom::Fixed(c) => Some(*c),
            PatternAtom::Wildcard => None,
        })
        .collect()
}

/// Parse a pattern from a compact string, `?` meaning wildcard and a letter
/// meaning itself: `"c?t"` matches "cat" and "cut".
pub fn parse_pattern(text: &str) -> Pattern {
    text.chars()
        .map(|c| match c {
            '?' => PatternAtom::Wildcard,
            c => {
                assert!(
                    c.is_ascii_lowercase(),
                    "pattern char must be '?' or a lowercase letter, got {c:?}"
                );
                PatternAtom::Fixed(c)
            }
        })
        .collect()
}

fn letter_index(c: char) -> Option<usize> {
    if c.is_ascii_lowercase() {
        Some(c as usize - 'a' as usize)
    } else {
        None
    }
}

fn index_letter(letter: usize) -> char {
    (b'a' + letter as u8) as char
}

const NO_CHILD: u32 = u32::MAX;

#[derive(Debug)]
struct Node {
    children: [u32; ALPHABET_SIZE],
    terminal: bool,
}

impl Node {
    fn new() -> Node {
        Node {
            children: [NO_CHILD; ALPHABET_SIZE],
            terminal: false,
        }
    }

    fn child(&self, letter: usize) -> Option<usize> {
        match self.children[letter] {
            NO_CHILD => None,
            idx => Some(idx as usize),
        }
    }
}

/// The trie covering a single word length. Nodes live in one arena vector;
/// node 0 is the root.
#[derive(Debug)]
struct Bucket {
    nodes: Vec<Node>,
    word_count: usize,
}

impl Bucket {
    fn new() -> Bucket {
        Bucket {
            nodes: vec![Node::new()],
            word_count: 0,
        }
    }

    /// Insert a word given as letter indices. Returns false if it was already
    /// present.
    fn insert(&mut self, letters: &[usize]) -> bool {
        let mut node_idx = 0;
        for &letter in letters {
            node_idx = match self.nodes[node_idx].child(letter) {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.nodes[node_idx].children[letter] = child as u32;
                    child
                }
            };
        }
        if self.nodes[node_idx].terminal {
            false
        } else {
            self.nodes[node_idx].terminal = true;
            self.word_count += 1;
            true
        }
    }

    fn contains(&self, letters: &[usize]) -> bool {
        let mut node_idx = 0;
        for &letter in letters {
            node_idx = match self.nodes[node_idx].child(letter) {
                Some(child) => child,
                None => return false,
            };
        }
        self.nodes[node_idx].terminal
    }

    fn count_matching(&self, pattern: &[PatternAtom]) -> usize {
        self.count_from(0, 0, pattern)
    }

    fn count_from(&self, node_idx: usize, depth: usize, pattern: &[PatternAtom]) -> usize {
        if depth == pattern.len() {
            return usize::from(self.nodes[node_idx].terminal);
        }
        let mut count = 0;
        for letter in 0..ALPHABET_SIZE {
            if !pattern[depth].admits(letter) {
                continue;
            }
            if let Some(child) = self.nodes[node_idx].child(letter) {
                count += self.count_from(child, depth + 1, pattern);
            }
        }
        count
    }

    fn has_matching(&self, pattern: &[PatternAtom]) -> bool {
        self.any_from(0, 0, pattern)
    }

    fn any_from(&self, node_idx: usize, depth: usize, pattern: &[PatternAtom]) -> bool {
        if depth == pattern.len() {
            return self.nodes[node_idx].terminal;
        }
        for letter in 0..ALPHABET_SIZE {
            if !pattern[depth].admits(letter) {
                continue;
            }
            if let Some(child) = self.nodes[node_idx].child(letter) {
                if self.any_from(child, depth + 1, pattern) {
                    return true;
                }
            }
        }
        false
    }
}

/// Normalize one candidate word to letter indices. `None` means the word
/// contains something other than ASCII letters.
fn word_letters(word: &str) -> Option<SmallVec<[usize; MAX_SLOT_LENGTH]>> {
    word.chars().map(letter_index).collect()
}

/// The immutable, shared dictionary index. Built once, then borrowed
/// read-only by every search.
#[derive(Debug)]
pub struct DictionaryIndex {
    /// Indexed by word length; lengths with no words hold an empty bucket.
    buckets: Vec<Bucket>,
    total_words: usize,
}

impl DictionaryIndex {
    /// Build an index from an unordered iterable of candidate words. Each
    /// candidate is trimmed and lowercased; candidates containing
    /// non-alphabetic characters are silently skipped, and duplicates
    /// collapse to one entry.
    pub fn build<I, S>(words: I) -> DictionaryIndex
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match Self::build_inner(words, false) {
            Ok(index) => index,
            Err(_) => unreachable!("lenient build cannot fail"),
        }
    }

    /// As [`build`](Self::build), but the first candidate containing a
    /// non-alphabetic character aborts the build with `MalformedWord`.
    pub fn build_strict<I, S>(words: I) -> Result<DictionaryIndex, GenerationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build_inner(words, true)
    }

    fn build_inner<I, S>(words: I, strict: bool) -> Result<DictionaryIndex, GenerationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = DictionaryIndex {
            buckets: Vec::new(),
            total_words: 0,
        };

        for word in words {
            let normalized = word.as_ref().trim().to_lowercase();
            if normalized.is_empty() {
                continue;
            }
            let letters = match word_letters(&normalized) {
                Some(letters) => letters,
                None if strict => {
                    return Err(GenerationError::MalformedWord { word: normalized });
                }
                None => continue,
            };

            let length = letters.len();
            if index.buckets.len() <= length {
                index.buckets.resize_with(length + 1, Bucket::new);
            }
            if index.buckets[length].insert(&letters) {
                index.total_words += 1;
            }
        }

        Ok(index)
    }

    /// Total number of distinct words in the index.
    pub fn len(&self) -> usize {
        self.total_words
    }

    pub fn is_empty(&self) -> bool {
        self.total_words == 0
    }

    /// Number of distinct words of exactly the given length.
    pub fn word_count(&self, length: usize) -> usize {
        self.buckets.get(length).map_or(0, |b| b.word_count)
    }

    /// Exact-match membership, O(|word|).
    pub fn contains(&self, word: &str) -> bool {
        let letters = match word_letters(word) {
            Some(letters) => letters,
            None => return false,
        };
        self.buckets
            .get(letters.len())
            .map_or(false, |b| b.contains(&letters))
    }

    /// Lazily enumerate every word of exactly `length` agreeing with
    /// `pattern`, in lexicographic order.
    ///
    /// The pattern's length must equal `length`; a mismatch is a programming
    /// error, not a dictionary miss.
    pub fn matching<'a>(&'a self, length: usize, pattern: &'a Pattern) -> Matches<'a> {
        assert_eq!(
            pattern.len(),
            length,
            "pattern length must match the requested word length"
        );
        Matches::new(self.buckets.get(length), pattern)
    }

    /// Number of words `matching(length, pattern)` would yield, computed over
    /// the same pruned traversal without materializing any of them.
    pub fn count_matching(&self, length: usize, pattern: &Pattern) -> usize {
        assert_eq!(
            pattern.len(),
            length,
            "pattern length must match the requested word length"
        );
        if length == 0 {
            return 0;
        }
        self.buckets
            .get(length)
            .map_or(0, |b| b.count_matching(pattern))
    }

    /// Whether at least one word matches, short-circuiting on the first hit.
    pub fn has_matching(&self, length: usize, pattern: &Pattern) -> bool {
        assert_eq!(
            pattern.len(),
            length,
            "pattern length must match the requested word length"
        );
        if length == 0 {
            return false;
        }
        self.buckets
            .get(length)
            .map_or(false, |b| b.has_matching(pattern))
    }
}

/// Iterator behind [`DictionaryIndex::matching`]: an explicit-stack
/// depth-first descent of one bucket's trie, pruned by the pattern. Children
/// are visited in alphabetical order, so output is lexicographic.
pub struct Matches<'a> {
    bucket: Option<&'a Bucket>,
    pattern: &'a [PatternAtom],
    /// One frame per trie level currently on the path: (node index, next
    /// child letter to try). The root frame carries no incoming letter, so
    /// `path` always holds `stack.len() - 1` letters.
    stack: Vec<(usize, usize)>,
    path: SmallVec<[usize; MAX_SLOT_LENGTH]>,
}

impl<'a> Matches<'a> {
    fn new(bucket: Option<&'a Bucket>, pattern: &'a [PatternAtom]) -> Matches<'a> {
        let mut matches = Matches {
            bucket,
            pattern,
            stack: Vec::with_capacity(pattern.len() + 1),
            path: SmallVec::new(),
        };
        if matches.bucket.is_some() && !pattern.is_empty() {
            matches.stack.push((0, 0));
        }
        matches
    }
}

impl Iterator for Matches<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let bucket = self.bucket?;
        loop {
            let depth = self.path.len();
            let (node_idx, cursor) = match self.stack.last_mut() {
                Some(frame) => frame,
                None => return None,
            };

            let mut descend = None;
            for letter in *cursor..ALPHABET_SIZE {
                if !self.pattern[depth].admits(letter) {
                    continue;
                }
                if let Some(child) = bucket.nodes[*node_idx].child(letter) {
                    descend = Some((letter, child));
                    break;
                }
            }

            match descend {
                None => {
                    self.stack.pop();
                    self.path.pop();
                }
                Some((letter, child)) => {
                    *cursor = letter + 1;
                    self.path.push(letter);
                    if self.path.len() == self.pattern.len() {
                        let emit = bucket.nodes[child].terminal;
                        let word: String = self.path.iter().map(|&l| index_letter(l)).collect();
                        self.path.pop();
                        if emit {
                            return Some(word);
                        }
                    } else {
                        self.stack.push((child, 0));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_index() -> DictionaryIndex {
        DictionaryIndex::build(["cat", "car", "arc", "tac", "cab", "rub", "crate", "trace"])
    }

    #[test]
    fn test_build_round_trip() {
        let index = small_index();
        assert_eq!(index.len(), 8);
        for word in ["cat", "car", "arc", "crate"] {
            assert!(index.contains(word), "expected {word} in index");
        }
        assert!(!index.contains("dog"));
        assert!(!index.contains("ca"));
        assert!(!index.contains("cate"));
    }

    #[test]
    fn test_build_normalizes_and_dedupes() {
        let index = DictionaryIndex::build(["  CAT ", "cat", "Cat", "wo rd", "naïve"]);
        assert_eq!(index.len(), 1);
        assert!(index.contains("cat"));
        assert_eq!(index.word_count(3), 1);
    }

    #[test]
    fn test_build_strict_rejects_malformed() {
        let err = DictionaryIndex::build_strict(["cat", "c4t"])
            .expect_err("strict build should reject c4t");
        assert_eq!(
            err,
            GenerationError::MalformedWord {
                word: "c4t".to_string()
            }
        );
    }

    #[test]
    fn test_matching_is_lexicographic_and_sound() {
        let index = small_index();
        let pattern = parse_pattern("ca?");
        let words: Vec<String> = index.matching(3, &pattern).collect();
        assert_eq!(words, ["cab", "car", "cat"]);

        let all: Vec<String> = index.matching(3, &parse_pattern("???")).collect();
        assert_eq!(all, ["arc", "cab", "car", "cat", "rub", "tac"]);
        for word in &all {
            assert!(index.contains(word));
        }
    }

    #[test]
    fn test_matching_completeness_under_masking() {
        let index = small_index();
        // Any masking of a known word must still yield that word.
        for masked in ["?rate", "c?ate", "cr?te", "cra?e", "crat?", "?????"] {
            let pattern = parse_pattern(masked);
            let words: Vec<String> = index.matching(5, &pattern).collect();
            assert!(
                words.contains(&"crate".to_string()),
                "pattern {masked} lost crate"
            );
        }
    }

    #[test]
    fn test_count_matching_agrees_with_matching() {
        let index = small_index();
        for text in ["ca?", "?a?", "???", "x??", "zzz"] {
            let pattern = parse_pattern(text);
            assert_eq!(
                index.count_matching(3, &pattern),
                index.matching(3, &pattern).count(),
                "count mismatch for {text}"
            );
        }
        assert!(index.has_matching(3, &parse_pattern("?r?")));
        assert!(!index.has_matching(3, &parse_pattern("q??")));
    }

    #[test]
    fn test_empty_length_and_bucket() {
        let index = small_index();
        assert_eq!(index.count_matching(0, &Pattern::new()), 0);
        assert_eq!(index.matching(0, &Pattern::new()).count(), 0);
        assert_eq!(index.count_matching(4, &parse_pattern("????")), 0);
        assert_eq!(index.word_count(9), 0);
    }

    #[test]
    #[should_panic(expected = "pattern length must match")]
    fn test_pattern_length_mismatch_is_a_bug() {
        let index = small_index();
        let _ = index.count_matching(4, &parse_pattern("???"));
    }

    #[test]
    fn test_completed_word() {
        assert_eq!(completed_word(&parse_pattern("cat")), Some("cat".into()));
        assert_eq!(completed_word(&parse_pattern("c?t")), None);
    }
}
