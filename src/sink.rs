//! Result delivery - where a recovered password ends up

use std::path::{Path, PathBuf};

use crate::error::{ArchiveForgeError, Result};
use crate::types::AttackResult;

/// Destination for the outcome of an attack
pub trait ResultSink {
    fn deliver(&mut self, result: &AttackResult) -> Result<()>;
}

/// Prints a recovered password to standard output
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn deliver(&mut self, result: &AttackResult) -> Result<()> {
        if let AttackResult::Found(password) = result {
            println!("{}", password);
        }
        Ok(())
    }
}

/// Writes a recovered password to a file, creating parent directories
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for FileSink {
    fn deliver(&mut self, result: &AttackResult) -> Result<()> {
        let AttackResult::Found(password) = result else {
            return Ok(());
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ArchiveForgeError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
            })?;
        }
        std::fs::write(&self.path, password).map_err(|e| {
            ArchiveForgeError::io(e.to_string(), Some(self.path.to_string_lossy().to_string()))
        })?;

        tracing::info!(path = %self.path.display(), "Password written");
        Ok(())
    }
}

/// Pick a sink for an output option: no path or a directory means the console
pub fn sink_for(output: Option<&Path>) -> Box<dyn ResultSink> {
    match output {
        Some(path) if !path.is_dir() => Box::new(FileSink::new(path)),
        _ => Box::new(ConsoleSink),
    }
}
