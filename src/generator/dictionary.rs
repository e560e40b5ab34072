//! Dictionary password generator with case/reversal variations

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use crate::error::{ArchiveForgeError, Result};
use crate::types::Variation;

/// Generator that expands every dictionary word into its configured variations.
///
/// All variations of one word are emitted together, in the configured order,
/// before moving on to the next word.
#[derive(Debug, Clone)]
pub struct DictionaryGenerator {
    words: Arc<[String]>,
    variations: Vec<Variation>,
    next_word: usize,
    pending: VecDeque<String>,
}

impl DictionaryGenerator {
    /// Create a generator that tries every word as-is
    pub fn new(words: Vec<String>) -> Result<Self> {
        Self::with_variations(words, vec![Variation::AsIs])
    }

    /// Create a generator with an explicit set of variations.
    ///
    /// Repeated variations are collapsed, keeping the first occurrence.
    pub fn with_variations(words: Vec<String>, variations: Vec<Variation>) -> Result<Self> {
        if words.is_empty() {
            return Err(ArchiveForgeError::empty_dictionary(None));
        }

        let mut unique = Vec::with_capacity(variations.len());
        for variation in variations {
            if !unique.contains(&variation) {
                unique.push(variation);
            }
        }
        if unique.is_empty() {
            return Err(crate::config_error!("At least one dictionary variation is required"));
        }

        Ok(Self {
            words: words.into(),
            variations: unique,
            next_word: 0,
            pending: VecDeque::new(),
        })
    }

    /// Load a dictionary file with one word per line.
    ///
    /// A file that cannot be read is reported as an empty dictionary.
    pub fn from_file(path: &Path, variations: Vec<Variation>) -> Result<Self> {
        let words = load_words(path)?;
        Self::with_variations(words, variations).map_err(|e| match e {
            ArchiveForgeError::EmptyDictionary { .. } => {
                ArchiveForgeError::empty_dictionary(Some(path.to_string_lossy().to_string()))
            }
            other => other,
        })
    }

    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    /// Number of words in the dictionary
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Index of the next word to expand
    pub fn word_index(&self) -> usize {
        self.next_word
    }

    /// Total number of candidates
    pub fn total(&self) -> u64 {
        self.words.len() as u64 * self.variations.len() as u64
    }

    /// Candidates not yet emitted
    pub fn remaining(&self) -> u64 {
        let words_left = (self.words.len() - self.next_word) as u64;
        self.pending.len() as u64 + words_left * self.variations.len() as u64
    }

    /// Check if generator is exhausted
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty() && self.next_word >= self.words.len()
    }

    /// Skip up to `count` candidates; whole words are skipped without
    /// expanding them. Returns how many were skipped.
    pub fn skip_candidates(&mut self, count: u64) -> u64 {
        let per_word = self.variations.len() as u64;
        let mut skipped = 0;

        while skipped < count {
            if !self.pending.is_empty() {
                let drop = (count - skipped).min(self.pending.len() as u64);
                self.pending.drain(..drop as usize);
                skipped += drop;
                continue;
            }

            let words_left = (self.words.len() - self.next_word) as u64;
            if words_left == 0 {
                break;
            }

            let whole = ((count - skipped) / per_word).min(words_left);
            if whole > 0 {
                self.next_word += whole as usize;
                skipped += whole * per_word;
            } else {
                self.expand_next_word();
            }
        }

        skipped
    }

    /// Generate next batch of candidates
    pub fn next_batch(&mut self, count: usize) -> Vec<String> {
        self.by_ref().take(count).collect()
    }

    fn expand_next_word(&mut self) -> bool {
        let Some(word) = self.words.get(self.next_word) else {
            return false;
        };
        self.next_word += 1;

        let reversed: String = word.chars().rev().collect();
        for variation in &self.variations {
            self.pending.push_back(variation.apply(word, &reversed));
        }
        true
    }
}

impl Iterator for DictionaryGenerator {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending.is_empty() && !self.expand_next_word() {
            return None;
        }
        self.pending.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

impl std::iter::FusedIterator for DictionaryGenerator {}

/// Read one word per line, stripping line endings only.
///
/// Lines that are not valid UTF-8 are skipped.
pub fn load_words(path: &Path) -> Result<Vec<String>> {
    let unreadable = |e: std::io::Error| {
        ArchiveForgeError::unreadable_dictionary(path.to_string_lossy(), e.to_string())
    };

    let reader = BufReader::new(File::open(path).map_err(unreadable)?);
    let mut words = Vec::new();
    let mut skipped = 0usize;

    for line in reader.split(b'\n') {
        let mut line = line.map_err(unreadable)?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        match String::from_utf8(line) {
            Ok(word) => words.push(word),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "Skipped dictionary lines that are not valid UTF-8");
    }
    tracing::debug!(path = %path.display(), words = words.len(), "Dictionary loaded");
    Ok(words)
}
