//! Password candidate generation
//!
//! Two strategies are available:
//! - brute force over a character alphabet ([`CombinatorialGenerator`])
//! - dictionary words with case/reversal variations ([`DictionaryGenerator`])

mod alphabet;
mod combinatorial;
mod dictionary;

pub use alphabet::{Alphabet, Counter};
pub use combinatorial::CombinatorialGenerator;
pub use dictionary::{load_words, DictionaryGenerator};

use crate::error::Result;
use crate::types::AttackMode;

/// Unified candidate source, driven through [`Iterator`]
#[derive(Debug, Clone)]
pub enum CandidateSource {
    Combinatorial(CombinatorialGenerator),
    Dictionary(DictionaryGenerator),
}

impl CandidateSource {
    /// Build the generator described by an attack mode
    pub fn from_mode(mode: &AttackMode) -> Result<Self> {
        match mode {
            AttackMode::BruteForce(config) => {
                let alphabet = Alphabet::new(&config.characters)?;
                let gen = CombinatorialGenerator::with_start(
                    alphabet,
                    config.max_length,
                    config.start.as_deref(),
                )?;
                Ok(CandidateSource::Combinatorial(gen))
            }
            AttackMode::Dictionary(config) => {
                let gen = DictionaryGenerator::from_file(&config.path, config.variations.clone())?;
                Ok(CandidateSource::Dictionary(gen))
            }
        }
    }

    /// Skip up to `count` candidates; returns how many were skipped
    pub fn skip_candidates(&mut self, count: u64) -> u64 {
        match self {
            CandidateSource::Combinatorial(g) => g.skip_candidates(count),
            CandidateSource::Dictionary(g) => g.skip_candidates(count),
        }
    }

    /// Check if source is exhausted
    pub fn is_exhausted(&self) -> bool {
        match self {
            CandidateSource::Combinatorial(g) => g.is_exhausted(),
            CandidateSource::Dictionary(g) => g.is_exhausted(),
        }
    }

    /// Restrict this source to every `stride`-th candidate starting at `index`
    pub fn partition(self, index: usize, stride: usize) -> Partition {
        Partition::new(self, index, stride)
    }
}

impl Iterator for CandidateSource {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            CandidateSource::Combinatorial(g) => g.next(),
            CandidateSource::Dictionary(g) => g.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            CandidateSource::Combinatorial(g) => g.size_hint(),
            CandidateSource::Dictionary(g) => g.size_hint(),
        }
    }
}

/// One interleaved slice of a candidate source.
///
/// Partition `index` of `stride` yields the candidates at positions
/// `index, index + stride, index + 2 * stride, ...` of the underlying source.
/// Each partition owns its own copy of the source.
#[derive(Debug, Clone)]
pub struct Partition {
    source: CandidateSource,
    index: usize,
    stride: usize,
    started: bool,
}

impl Partition {
    fn new(source: CandidateSource, index: usize, stride: usize) -> Self {
        let stride = stride.max(1);
        Self {
            source,
            index: index % stride,
            stride,
            started: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn stride(&self) -> usize {
        self.stride
    }
}

impl Iterator for Partition {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let gap = if self.started {
            self.stride as u64 - 1
        } else {
            self.started = true;
            self.index as u64
        };
        if self.source.skip_candidates(gap) < gap {
            return None;
        }
        self.source.next()
    }
}
