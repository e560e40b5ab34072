//! Attack state persistence for resume capability

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ParallelReport;
use crate::error::{ArchiveForgeError, Result};
use crate::generator::CandidateSource;
use crate::types::{AttackMode, AttackResult};

/// Persistent attack state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackState {
    /// Resume timestamps history (append-only)
    #[serde(default)]
    pub resumed_at: Vec<DateTime<Utc>>,
    /// Attack identifier
    pub attack_id: String,
    /// Archive under attack
    pub archive: PathBuf,
    /// Candidate generation settings
    pub mode: AttackMode,
    /// Every candidate before this position has been tried
    pub position: u64,
    /// Candidates tried across all sessions
    pub attempts: u64,
    /// Recovered password, once found
    #[serde(default)]
    pub password: Option<String>,
    /// Attack start time
    pub started_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Attack completed (found, or source exhausted)
    pub completed: bool,
}

impl AttackState {
    /// Create a new attack state
    pub fn new(archive: impl Into<PathBuf>, mode: AttackMode) -> Self {
        let now = Utc::now();
        Self {
            resumed_at: Vec::new(),
            attack_id: format!("attack_{}", now.format("%Y%m%d_%H%M%S")),
            archive: archive.into(),
            mode,
            position: 0,
            attempts: 0,
            password: None,
            started_at: now,
            updated_at: now,
            completed: false,
        }
    }

    /// Load state from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ArchiveForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;

        serde_json::from_str(&content).map_err(|e| ArchiveForgeError::parse(e.to_string(), Some(content)))
    }

    /// Save state to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ArchiveForgeError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
            })?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|e| {
            ArchiveForgeError::internal(format!("Failed to serialize state: {}", e))
        })?;

        std::fs::write(path, content).map_err(|e| {
            ArchiveForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })
    }

    /// Default state file path for an archive
    pub fn default_path(archive: &Path) -> PathBuf {
        let stem = archive
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "archive".to_string());
        PathBuf::from(format!("output/{}_attack.json", stem))
    }

    /// Check that a loaded state belongs to this archive and mode
    pub fn ensure_matches(&self, archive: &Path, mode: &AttackMode) -> Result<()> {
        if self.archive != archive {
            return Err(ArchiveForgeError::config(format!(
                "State file belongs to {}, not {}",
                self.archive.display(),
                archive.display()
            )));
        }
        if &self.mode != mode {
            return Err(ArchiveForgeError::config(
                "State file was written for different attack settings",
            ));
        }
        Ok(())
    }

    /// Record a resumed session
    pub fn mark_resumed(&mut self) {
        let now = Utc::now();
        self.resumed_at.push(now);
        self.updated_at = now;
    }

    /// Candidate source positioned after everything already tried
    pub fn resume_source(&self) -> Result<CandidateSource> {
        let mut source = CandidateSource::from_mode(&self.mode)?;
        let skipped = source.skip_candidates(self.position);
        if skipped < self.position {
            tracing::warn!(
                position = self.position,
                skipped,
                "Saved position lies past the end of the candidate source"
            );
        }
        Ok(source)
    }

    /// Fold a finished session into the state.
    ///
    /// `report` must come from a run over [`AttackState::resume_source`].
    pub fn record(&mut self, report: &ParallelReport) {
        self.attempts += report.attempts();
        match &report.result {
            AttackResult::Found(password) => {
                self.password = Some(password.clone());
                self.mark_completed();
            }
            AttackResult::NotFound => match report.covered() {
                Some(covered) => {
                    self.position += covered;
                    self.updated_at = Utc::now();
                }
                None => self.mark_completed(),
            },
        }
    }

    /// Mark as completed
    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack::{AttackReport, StopReason, WorkerReport};
    use crate::types::BruteForceConfig;
    use std::time::Duration;

    fn mode() -> AttackMode {
        AttackMode::BruteForce(BruteForceConfig {
            characters: "abc".to_string(),
            max_length: 3,
            start: None,
        })
    }

    fn worker(partition: usize, attempts: u64, stopped: Option<StopReason>) -> WorkerReport {
        WorkerReport {
            partition,
            report: AttackReport {
                result: AttackResult::NotFound,
                attempts,
                elapsed: Duration::ZERO,
                last_candidate: None,
                stopped,
            },
        }
    }

    #[test]
    fn test_state_creation() {
        let state = AttackState::new("secret.zip", mode());
        assert_eq!(state.position, 0);
        assert!(state.attack_id.starts_with("attack_"));
        assert!(!state.completed);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut state = AttackState::new("secret.zip", mode());
        state.position = 42;
        state.mark_resumed();
        state.save(&path).unwrap();

        let loaded = AttackState::load(&path).unwrap();
        assert_eq!(loaded.position, 42);
        assert_eq!(loaded.mode, mode());
        assert_eq!(loaded.resumed_at.len(), 1);
        assert!(loaded.ensure_matches(Path::new("secret.zip"), &mode()).is_ok());
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AttackState::load(&path),
            Err(ArchiveForgeError::Parse { .. })
        ));
    }

    #[test]
    fn test_mismatched_state_rejected() {
        let state = AttackState::new("secret.zip", mode());
        assert!(state.ensure_matches(Path::new("other.zip"), &mode()).is_err());

        let other = AttackMode::BruteForce(BruteForceConfig {
            characters: "xyz".to_string(),
            max_length: 3,
            start: None,
        });
        assert!(state
            .ensure_matches(Path::new("secret.zip"), &other)
            .unwrap_err()
            .is_config_error());
    }

    #[test]
    fn test_default_path() {
        assert_eq!(
            AttackState::default_path(Path::new("/data/backup.zip")),
            PathBuf::from("output/backup_attack.json")
        );
    }

    #[test]
    fn test_record_and_resume() {
        let mut state = AttackState::new("secret.zip", mode());
        let report = ParallelReport {
            result: AttackResult::NotFound,
            workers: vec![
                worker(0, 2, Some(StopReason::Cancelled)),
                worker(1, 2, Some(StopReason::Cancelled)),
            ],
            stride: 2,
            elapsed: Duration::ZERO,
        };
        state.record(&report);
        assert_eq!(state.position, 4);
        assert_eq!(state.attempts, 4);
        assert!(!state.completed);

        // a b c ab | bb ...
        let mut source = state.resume_source().unwrap();
        assert_eq!(source.next().as_deref(), Some("bb"));
    }

    #[test]
    fn test_record_found_completes() {
        let mut state = AttackState::new("secret.zip", mode());
        let report = ParallelReport {
            result: AttackResult::Found("cab".to_string()),
            workers: vec![worker(0, 12, None)],
            stride: 1,
            elapsed: Duration::ZERO,
        };
        state.record(&report);
        assert!(state.completed);
        assert_eq!(state.password.as_deref(), Some("cab"));
    }

    #[test]
    fn test_record_exhausted_completes() {
        let mut state = AttackState::new("secret.zip", mode());
        let report = ParallelReport {
            result: AttackResult::NotFound,
            workers: vec![worker(0, 14, None), worker(1, 13, None)],
            stride: 2,
            elapsed: Duration::ZERO,
        };
        state.record(&report);
        assert!(state.completed);
        assert_eq!(state.attempts, 27);
    }
}
