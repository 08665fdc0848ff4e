use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");
/// Sole word of the bank used when the bundled list is unusable.
const FALLBACK_WORD: &str = "unscramble";

/// Immutable, non-empty list of lowercase answer words without duplicates.
///
/// Order is preserved from the source so that a seeded random source picks
/// the same words on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Builds a bank from already loaded words, normalising them the same way
    /// the loaders do. Returns `None` when nothing usable is left.
    #[must_use]
    pub fn new<I, S>(words: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let words: Vec<String> = words
            .into_iter()
            .filter_map(|w| normalize(w.as_ref()))
            .filter(|w| seen.insert(w.clone()))
            .collect();

        if words.is_empty() { None } else { Some(Self { words }) }
    }

    /// The bank compiled into the binary.
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_bundled(EMBEDDED_WORDBANK)
    }

    /// Builds a bank from bundled text, falling back to a single word when
    /// the text has no usable entries.
    fn from_bundled(contents: &str) -> Self {
        Self::new(load_wordbank_from_str(contents)).unwrap_or_else(|| {
            log::warn!("Bundled word bank has no valid words, using '{FALLBACK_WORD}' only");
            Self {
                words: vec![FALLBACK_WORD.to_string()],
            }
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let words = load_wordbank_from_file(path)?;
        Self::new(words).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "word bank contains no usable words")
        })
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }
}

fn normalize(raw: &str) -> Option<String> {
    let word = raw.trim().to_lowercase();
    is_valid_word(&word).then_some(word)
}

fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn load_wordbank_from_str(data: &str) -> Vec<String> {
    data.lines().filter_map(normalize).collect()
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = normalize(&line?) {
            words.push(word);
        }
    }
    Ok(words)
}
