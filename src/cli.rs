//! Command-line arguments

use std::path::PathBuf;
use std::time::Duration;

use archive_forge::types::{DEFAULT_CHARS, DEFAULT_MAX_LENGTH, DEFAULT_PROGRESS_INTERVAL};
use archive_forge::{
    config_error, AttackConfig, AttackMode, BruteForceConfig, DictionaryConfig, Result, Variation,
};
use clap::Parser;

/// Recover the password of an encrypted ZIP archive by brute force or dictionary attack.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Encrypted archive to attack
    #[arg(value_name = "ARCHIVE", env = "ARCHIVE_FORGE_ARCHIVE")]
    pub archive: PathBuf,

    /// Word list for a dictionary attack (one password per line)
    #[arg(short = 'd', long, value_name = "FILE", env = "ARCHIVE_FORGE_DICTIONARY")]
    pub dictionary: Option<PathBuf>,

    /// Dictionary variations to try, comma separated [default: all]
    #[arg(long, value_delimiter = ',', env = "ARCHIVE_FORGE_VARIATIONS")]
    pub variations: Vec<Variation>,

    /// Characters used to build brute-force passwords
    #[arg(short = 'c', long, default_value = DEFAULT_CHARS, env = "ARCHIVE_FORGE_CHARS")]
    pub chars: String,

    /// Longest brute-force password to try
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_LENGTH, env = "ARCHIVE_FORGE_MAX_LENGTH")]
    pub max_length: usize,

    /// Brute-force password to start from
    #[arg(short = 's', long, env = "ARCHIVE_FORGE_START")]
    pub start: Option<String>,

    /// Worker threads: N > 0 uses N (capped at cores), 0 all cores, -N leaves N cores free
    #[arg(
        short = 't',
        long,
        default_value_t = 2,
        allow_negative_numbers = true,
        env = "ARCHIVE_FORGE_THREADS"
    )]
    pub threads: i32,

    /// Write the recovered password here; a directory prints it instead
    #[arg(short = 'o', long, value_name = "PATH", env = "ARCHIVE_FORGE_PASSWORD_FILE")]
    pub password_file: Option<PathBuf>,

    /// Failed attempts between progress updates (0 disables)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL, env = "ARCHIVE_FORGE_PROGRESS_INTERVAL")]
    pub progress_interval: u64,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECONDS", env = "ARCHIVE_FORGE_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Checkpoint file [default: output/<archive>_attack.json]
    #[arg(long, value_name = "FILE", env = "ARCHIVE_FORGE_STATE")]
    pub state: Option<PathBuf>,

    /// Continue from the checkpoint file
    #[arg(long)]
    pub resume: bool,

    /// Hide the progress spinner
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Args {
    /// Candidate generation settings
    pub fn mode(&self) -> Result<AttackMode> {
        match &self.dictionary {
            Some(path) => {
                if self.start.is_some() {
                    return Err(config_error!("--start only applies to brute-force attacks"));
                }
                let mut config = DictionaryConfig::new(path);
                if !self.variations.is_empty() {
                    config.variations = self.variations.clone();
                }
                Ok(AttackMode::Dictionary(config))
            }
            None => {
                if !self.variations.is_empty() {
                    return Err(config_error!("--variations requires --dictionary"));
                }
                Ok(AttackMode::BruteForce(BruteForceConfig {
                    characters: self.chars.clone(),
                    max_length: self.max_length,
                    start: self.start.clone().filter(|s| !s.is_empty()),
                }))
            }
        }
    }

    pub fn attack_config(&self) -> AttackConfig {
        AttackConfig {
            threads: self.threads,
            progress_interval: self.progress_interval,
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}
