//! Alphabet and mixed-radix counter for brute-force generation

use std::sync::Arc;

use crate::error::{ArchiveForgeError, Result};
use crate::types::DEFAULT_CHARS;

/// Ordered character set used to build brute-force candidates.
///
/// Duplicate characters are allowed; they simply produce repeated candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Arc<[char]>,
}

impl Alphabet {
    /// Create an alphabet from the characters of `characters`, in order
    pub fn new(characters: &str) -> Result<Self> {
        let chars: Vec<char> = characters.chars().collect();
        if chars.is_empty() {
            return Err(ArchiveForgeError::EmptyAlphabet);
        }
        Ok(Self {
            chars: chars.into(),
        })
    }

    /// Number of characters (the counter radix)
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character for a digit value
    pub fn char_at(&self, digit: usize) -> char {
        self.chars[digit]
    }

    /// Digit value of the first occurrence of `c`
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.chars.iter().position(|&x| x == c)
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            chars: DEFAULT_CHARS.chars().collect::<Vec<_>>().into(),
        }
    }
}

/// Fixed-width counter whose digits range over `[0, radix)`.
///
/// Digit 0 is the least significant one and also the first character of a
/// candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    digits: Vec<usize>,
    radix: usize,
}

impl Counter {
    /// Create a zeroed counter
    pub fn new(width: usize, radix: usize) -> Self {
        Self {
            digits: vec![0; width],
            radix,
        }
    }

    pub fn width(&self) -> usize {
        self.digits.len()
    }

    pub fn digit(&self, position: usize) -> usize {
        self.digits[position]
    }

    pub fn set_digit(&mut self, position: usize, value: usize) {
        self.digits[position] = value % self.radix;
    }

    /// Increment one digit. On overflow the digit wraps to 0 and `false` is
    /// returned so the caller can carry into the next position.
    pub fn increment(&mut self, position: usize) -> bool {
        let digit = &mut self.digits[position];
        *digit += 1;
        if *digit >= self.radix {
            *digit = 0;
            false
        } else {
            true
        }
    }

    /// Map the first `length` digits through `alphabet`
    pub fn render(&self, alphabet: &Alphabet, length: usize) -> String {
        self.digits[..length]
            .iter()
            .map(|&d| alphabet.char_at(d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_alphabet_rejected() {
        assert!(matches!(
            Alphabet::new(""),
            Err(ArchiveForgeError::EmptyAlphabet)
        ));
    }

    #[test]
    fn test_alphabet_lookup() {
        let alphabet = Alphabet::new("abca").unwrap();
        assert_eq!(alphabet.len(), 4);
        assert_eq!(alphabet.index_of('a'), Some(0));
        assert_eq!(alphabet.index_of('c'), Some(2));
        assert_eq!(alphabet.index_of('z'), None);
        assert_eq!(alphabet.char_at(3), 'a');
    }

    #[test]
    fn test_default_alphabet() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.char_at(0), 'a');
        assert!(alphabet.index_of('{').is_some());
        assert_eq!(alphabet.len(), DEFAULT_CHARS.chars().count());
    }

    #[test]
    fn test_counter_increment_wraps() {
        let mut counter = Counter::new(2, 3);
        assert!(counter.increment(0));
        assert!(counter.increment(0));
        assert!(!counter.increment(0));
        assert_eq!(counter.digit(0), 0);
        assert_eq!(counter.digit(1), 0);
    }

    #[test]
    fn test_counter_render() {
        let alphabet = Alphabet::new("xyz").unwrap();
        let mut counter = Counter::new(3, alphabet.len());
        counter.set_digit(0, 2);
        counter.set_digit(1, 1);
        assert_eq!(counter.render(&alphabet, 1), "z");
        assert_eq!(counter.render(&alphabet, 3), "zyx");
    }
}
