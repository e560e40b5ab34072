//! Brute-force password generator over a fixed alphabet

use super::alphabet::{Alphabet, Counter};
use crate::error::{ArchiveForgeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GeneratorState {
    Ready,
    Exhausted,
}

/// Generator for brute-force password candidates in odometer order.
///
/// Each advance increments digit 0 and carries into higher positions within the
/// same step, growing the effective length as it goes. Once the carry would need
/// more than `max_length` digits the generator is exhausted for good.
///
/// The carry keeps the incremented value of the next digit instead of starting
/// that length from zero, so lengths above 1 are only partially covered: `"ab"`
/// with `max_length = 2` yields `a, b, ab, bb`. Trailing whitespace is trimmed
/// from every candidate.
#[derive(Debug, Clone)]
pub struct CombinatorialGenerator {
    alphabet: Alphabet,
    counter: Counter,
    max_length: usize,
    effective_length: usize,
    state: GeneratorState,
    /// The counter already holds the first candidate
    primed: bool,
}

impl CombinatorialGenerator {
    /// Create a generator starting at the first candidate
    pub fn new(alphabet: Alphabet, max_length: usize) -> Result<Self> {
        Self::with_start(alphabet, max_length, None)
    }

    /// Create a generator that continues right after `start`.
    ///
    /// An empty `start` is treated as absent.
    pub fn with_start(alphabet: Alphabet, max_length: usize, start: Option<&str>) -> Result<Self> {
        if max_length == 0 {
            return Err(ArchiveForgeError::InvalidMaxLength { max_length });
        }

        let mut counter = Counter::new(max_length, alphabet.len());
        let start = start.filter(|s| !s.is_empty());

        let Some(start) = start else {
            return Ok(Self {
                alphabet,
                counter,
                max_length,
                effective_length: 1,
                state: GeneratorState::Ready,
                primed: true,
            });
        };

        let length = start.chars().count();
        if length > max_length {
            return Err(ArchiveForgeError::invalid_start(
                start,
                format!("longer than maximum length {}", max_length),
            ));
        }
        for (position, c) in start.chars().enumerate() {
            let digit = alphabet.index_of(c).ok_or_else(|| {
                ArchiveForgeError::invalid_start(start, format!("character '{}' is not in the alphabet", c))
            })?;
            counter.set_digit(position, digit);
        }

        Ok(Self {
            alphabet,
            counter,
            max_length,
            effective_length: length,
            state: GeneratorState::Ready,
            primed: false,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Number of counter digits currently contributing to candidates
    pub fn effective_length(&self) -> usize {
        self.effective_length
    }

    /// Check if generator is exhausted
    pub fn is_exhausted(&self) -> bool {
        self.state == GeneratorState::Exhausted
    }

    /// Untrimmed form of the last emitted candidate, usable as `start` to resume
    /// after it. `None` before the first candidate.
    pub fn checkpoint(&self) -> Option<String> {
        if self.primed {
            None
        } else {
            Some(self.counter.render(&self.alphabet, self.effective_length))
        }
    }

    /// Skip up to `count` candidates without building them; returns how many
    /// were skipped.
    pub fn skip_candidates(&mut self, count: u64) -> u64 {
        let mut skipped = 0;
        while skipped < count && self.step() {
            skipped += 1;
        }
        skipped
    }

    /// Generate next batch of candidates
    pub fn next_batch(&mut self, count: usize) -> Vec<String> {
        self.by_ref().take(count).collect()
    }

    /// Move to the next candidate. Returns `false` once exhausted.
    fn step(&mut self) -> bool {
        match self.state {
            GeneratorState::Exhausted => false,
            GeneratorState::Ready if self.primed => {
                self.primed = false;
                true
            }
            GeneratorState::Ready => self.advance(),
        }
    }

    fn advance(&mut self) -> bool {
        let length = self.effective_length;
        let mut position = 0;
        while !self.counter.increment(position) {
            position += 1;
            if position + 1 > self.max_length {
                // Every digit wrapped, so each held the last character.
                // Put them back so checkpoint() still names the final candidate.
                for digit in 0..self.max_length {
                    self.counter.set_digit(digit, self.alphabet.len() - 1);
                }
                self.effective_length = length;
                self.state = GeneratorState::Exhausted;
                return false;
            }
            self.effective_length = self.effective_length.max(position + 1);
        }
        true
    }

    fn candidate(&self) -> String {
        let raw = self.counter.render(&self.alphabet, self.effective_length);
        raw.trim_end().to_string()
    }
}

impl Iterator for CombinatorialGenerator {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step() {
            Some(self.candidate())
        } else {
            None
        }
    }
}

impl std::iter::FusedIterator for CombinatorialGenerator {}
