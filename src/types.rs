//! Core types and structures for archive-forge

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ArchiveForgeError, Result};

/// Default characters for brute-force attacks
pub const DEFAULT_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.,;:'\"-_!@#$%^&*()[]{}";

/// Default maximum password length for brute-force attacks
pub const DEFAULT_MAX_LENGTH: usize = 10;

/// Default number of attempts between progress reports
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Textual variation applied to a dictionary word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variation {
    AsIs,
    LowerCase,
    UpperCase,
    Reverse,
    ReverseLowerCase,
    ReverseUpperCase,
}

impl Variation {
    /// All variations, in the order the dictionary attack tries them
    pub const ALL: [Variation; 6] = [
        Variation::AsIs,
        Variation::LowerCase,
        Variation::UpperCase,
        Variation::Reverse,
        Variation::ReverseLowerCase,
        Variation::ReverseUpperCase,
    ];

    /// Apply this variation to `word`; `reversed` must be `word` reversed.
    pub fn apply(&self, word: &str, reversed: &str) -> String {
        match self {
            Variation::AsIs => word.to_string(),
            Variation::LowerCase => word.to_lowercase(),
            Variation::UpperCase => word.to_uppercase(),
            Variation::Reverse => reversed.to_string(),
            Variation::ReverseLowerCase => reversed.to_lowercase(),
            Variation::ReverseUpperCase => reversed.to_uppercase(),
        }
    }
}

impl std::fmt::Display for Variation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variation::AsIs => write!(f, "as-is"),
            Variation::LowerCase => write!(f, "lower-case"),
            Variation::UpperCase => write!(f, "upper-case"),
            Variation::Reverse => write!(f, "reverse"),
            Variation::ReverseLowerCase => write!(f, "reverse-lower-case"),
            Variation::ReverseUpperCase => write!(f, "reverse-upper-case"),
        }
    }
}

impl FromStr for Variation {
    type Err = ArchiveForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "as-is" => Ok(Variation::AsIs),
            "lower-case" | "lower" => Ok(Variation::LowerCase),
            "upper-case" | "upper" => Ok(Variation::UpperCase),
            "reverse" => Ok(Variation::Reverse),
            "reverse-lower-case" | "reverse-lower" => Ok(Variation::ReverseLowerCase),
            "reverse-upper-case" | "reverse-upper" => Ok(Variation::ReverseUpperCase),
            other => Err(crate::config_error!(
                "Unknown variation '{}'. Supported variations: {}",
                other,
                Variation::ALL
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Outcome of an attack run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackResult {
    /// The archive opened with this password
    Found(String),
    /// Every candidate was tried without success
    NotFound,
}

impl AttackResult {
    pub fn is_found(&self) -> bool {
        matches!(self, AttackResult::Found(_))
    }

    /// The recovered password, if any
    pub fn password(&self) -> Option<&str> {
        match self {
            AttackResult::Found(password) => Some(password),
            AttackResult::NotFound => None,
        }
    }
}

impl std::fmt::Display for AttackResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttackResult::Found(password) => write!(f, "found: {}", password),
            AttackResult::NotFound => write!(f, "not found"),
        }
    }
}

/// Configuration for brute-force (combinatorial) attacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BruteForceConfig {
    pub characters: String,
    pub max_length: usize,
    /// Last password already tried; the attack continues right after it
    pub start: Option<String>,
}

impl Default for BruteForceConfig {
    fn default() -> Self {
        Self {
            characters: DEFAULT_CHARS.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            start: None,
        }
    }
}

/// Configuration for dictionary attacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    pub path: PathBuf,
    pub variations: Vec<Variation>,
}

impl DictionaryConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            variations: Variation::ALL.to_vec(),
        }
    }
}

/// Which candidate generator an attack uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AttackMode {
    BruteForce(BruteForceConfig),
    Dictionary(DictionaryConfig),
}

impl std::fmt::Display for AttackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttackMode::BruteForce(config) => write!(
                f,
                "brute-force ({} characters, up to {} long)",
                config.characters.chars().count(),
                config.max_length
            ),
            AttackMode::Dictionary(config) => write!(
                f,
                "dictionary ({}, {} variations)",
                config.path.display(),
                config.variations.len()
            ),
        }
    }
}

/// Configuration for running an attack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackConfig {
    /// Thread request: > 0 exact (capped at cores), 0 all cores, < 0 cores left free
    pub threads: i32,
    /// Attempts between progress reports, 0 disables reporting
    pub progress_interval: u64,
    /// Give up after this long
    pub timeout: Option<Duration>,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            threads: 2,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            timeout: None,
        }
    }
}

impl AttackConfig {
    /// Resolve the thread request against the number of available cores
    pub fn worker_count(&self) -> usize {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        resolve_threads(self.threads, cores)
    }
}

/// Map a thread request onto `cores`, never returning less than one
pub fn resolve_threads(requested: i32, cores: usize) -> usize {
    let cores = cores.max(1);
    match requested {
        0 => cores,
        n if n > 0 => (n as usize).min(cores),
        n => cores.saturating_sub(n.unsigned_abs() as usize).max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variation_apply() {
        let word = "CaT";
        let reversed: String = word.chars().rev().collect();
        let applied: Vec<String> = Variation::ALL
            .iter()
            .map(|v| v.apply(word, &reversed))
            .collect();
        assert_eq!(applied, vec!["CaT", "cat", "CAT", "TaC", "tac", "TAC"]);
    }

    #[test]
    fn test_variation_parse() {
        assert_eq!("as-is".parse::<Variation>().unwrap(), Variation::AsIs);
        assert_eq!("AS_IS".parse::<Variation>().unwrap(), Variation::AsIs);
        assert_eq!("upper".parse::<Variation>().unwrap(), Variation::UpperCase);
        assert_eq!(
            "reverse-lower-case".parse::<Variation>().unwrap(),
            Variation::ReverseLowerCase
        );
        assert!("sideways".parse::<Variation>().is_err());
    }

    #[test]
    fn test_variation_display_roundtrips_through_parse() {
        for variation in Variation::ALL {
            assert_eq!(variation.to_string().parse::<Variation>().unwrap(), variation);
        }
    }

    #[test]
    fn test_resolve_threads() {
        assert_eq!(resolve_threads(2, 8), 2);
        assert_eq!(resolve_threads(16, 8), 8);
        assert_eq!(resolve_threads(0, 8), 8);
        assert_eq!(resolve_threads(-2, 8), 6);
        assert_eq!(resolve_threads(-10, 8), 1);
        assert_eq!(resolve_threads(1, 0), 1);
    }

    #[test]
    fn test_attack_result() {
        let found = AttackResult::Found("secret".to_string());
        assert!(found.is_found());
        assert_eq!(found.password(), Some("secret"));
        assert_eq!(AttackResult::NotFound.password(), None);
    }

    #[test]
    fn test_attack_mode_serde() {
        let mode = AttackMode::BruteForce(BruteForceConfig::default());
        let json = serde_json::to_string(&mode).unwrap();
        assert!(json.contains("\"kind\":\"brute-force\""));
        let back: AttackMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mode);
    }
}
