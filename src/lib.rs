//! Archive Forge - password recovery for encrypted archives
//!
//! Generates password candidates (brute force or dictionary) and tests them
//! against an encrypted ZIP archive until one opens it.

pub mod attack;
pub mod error;
pub mod generator;
pub mod oracle;
pub mod sink;
pub mod types;

// Re-export commonly used types
pub use error::{ArchiveForgeError, Result};
pub use types::{
    AttackConfig, AttackMode, AttackResult, BruteForceConfig, DictionaryConfig, Variation,
};

// Re-export main functionality
pub use attack::{AttackDriver, AttackState, ParallelAttack, StopSignal};
pub use generator::{CandidateSource, CombinatorialGenerator, DictionaryGenerator};
pub use oracle::{DecryptionOracle, OracleError, ZipOracle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    // `tracing` events reach env_logger through the `log` facade
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .try_init()
        .ok();
    Ok(())
}
