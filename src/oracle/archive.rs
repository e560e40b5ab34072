//! ZIP archive oracle

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::zip::result::ZipError;
use ::zip::ZipArchive;

use super::{DecryptionOracle, OracleError};
use crate::error::{ArchiveForgeError, Result};

/// Upper bound on the read buffer reserved up front; header sizes are untrusted.
const MAX_PREALLOCATION: u64 = 1 << 20;

fn preallocation(size: u64) -> usize {
    size.min(MAX_PREALLOCATION) as usize
}

/// Oracle that tests candidates against an encrypted ZIP entry.
///
/// The archive is read into memory once; clones share the bytes but each owns
/// its own reader, so every worker can hold an independent copy.
#[derive(Clone)]
pub struct ZipOracle {
    path: PathBuf,
    archive: ZipArchive<Cursor<Arc<[u8]>>>,
    entry: usize,
    entry_name: String,
    buffer: Vec<u8>,
}

impl ZipOracle {
    /// Open an archive from disk
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ArchiveForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;
        Self::from_bytes(path, bytes)
    }

    /// Build an oracle from archive bytes; `path` is only used in messages
    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Result<Self> {
        let shown = path.to_string_lossy().to_string();
        let reader = Cursor::new(Arc::<[u8]>::from(bytes));
        let mut archive = ZipArchive::new(reader).map_err(|e| map_zip_error(&shown, e))?;

        // Smallest encrypted entry keeps each full read cheap
        let mut target: Option<(usize, u64, String)> = None;
        for index in 0..archive.len() {
            let file = archive
                .by_index_raw(index)
                .map_err(|e| map_zip_error(&shown, e))?;
            if !file.encrypted() || file.is_dir() {
                continue;
            }
            let size = file.compressed_size();
            if target.as_ref().map_or(true, |(_, best, _)| size < *best) {
                target = Some((index, size, file.name().to_string()));
            }
        }

        let Some((entry, size, entry_name)) = target else {
            tracing::warn!(archive = %shown, "Archive has no encrypted entries");
            return Err(ArchiveForgeError::not_encrypted(shown));
        };

        tracing::debug!(archive = %shown, entry = %entry_name, size, "Selected encrypted entry");

        Ok(Self {
            path: path.to_path_buf(),
            archive,
            entry,
            entry_name,
            buffer: Vec::with_capacity(preallocation(size)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the entry used to verify candidates
    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }
}

impl DecryptionOracle for ZipOracle {
    fn try_password(&mut self, candidate: &str) -> std::result::Result<bool, OracleError> {
        let mut file = match self.archive.by_index_decrypt(self.entry, candidate.as_bytes()) {
            Ok(file) => file,
            Err(ZipError::InvalidPassword) => return Err(OracleError::Mismatch),
            Err(e) => return Err(map_oracle_error(&self.path.to_string_lossy(), e)),
        };

        // The header check lets roughly one wrong password in 256 through;
        // only a complete, checksummed read proves the password.
        self.buffer.clear();
        match file.read_to_end(&mut self.buffer) {
            Ok(_) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}

fn map_oracle_error(path: &str, err: ZipError) -> OracleError {
    match err {
        ZipError::Io(e) => OracleError::io(path, e.to_string()),
        ZipError::UnsupportedArchive(message) => OracleError::unsupported(message.to_string()),
        ZipError::InvalidPassword => OracleError::Mismatch,
        other => OracleError::corrupt(other.to_string()),
    }
}

fn map_zip_error(path: &str, err: ZipError) -> ArchiveForgeError {
    match err {
        ZipError::Io(e) => ArchiveForgeError::io(e.to_string(), Some(path.to_string())),
        other => ArchiveForgeError::Oracle(map_oracle_error(path, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use ::zip::unstable::write::FileOptionsExt;
    use ::zip::write::SimpleFileOptions;
    use ::zip::{CompressionMethod, ZipWriter};

    fn encrypted_zip(password: &'static str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .with_deprecated_encryption(password.as_bytes());
        writer.start_file("secret.txt", options).unwrap();
        writer.write_all(b"the treasure is buried under the old oak").unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn plain_zip() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("readme.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"nothing to hide").unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_correct_password_opens() {
        let mut oracle = ZipOracle::from_bytes(Path::new("test.zip"), encrypted_zip("hunter2")).unwrap();
        assert_eq!(oracle.entry_name(), "secret.txt");
        assert_eq!(oracle.try_password("hunter2"), Ok(true));
    }

    #[test]
    fn test_wrong_passwords_rejected() {
        let mut oracle = ZipOracle::from_bytes(Path::new("test.zip"), encrypted_zip("hunter2")).unwrap();
        for candidate in ["hunter", "Hunter2", "2retnuh", "", "password", "letmein"] {
            match oracle.try_password(candidate) {
                Ok(false) | Err(OracleError::Mismatch) => {}
                other => panic!("unexpected result for {candidate:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_clones_are_independent() {
        let oracle = ZipOracle::from_bytes(Path::new("test.zip"), encrypted_zip("pw")).unwrap();
        let mut first = oracle.clone();
        let mut second = oracle;
        assert!(!matches!(first.try_password("nope"), Ok(true)));
        assert_eq!(second.try_password("pw"), Ok(true));
        assert_eq!(first.try_password("pw"), Ok(true));
    }

    #[test]
    fn test_unencrypted_archive() {
        let err = ZipOracle::from_bytes(Path::new("plain.zip"), plain_zip()).err().unwrap();
        assert!(matches!(err, ArchiveForgeError::NotEncrypted { .. }));
    }

    #[test]
    fn test_garbage_archive() {
        let err = ZipOracle::from_bytes(Path::new("junk.zip"), b"definitely not a zip".to_vec())
            .err()
            .unwrap();
        assert!(matches!(err, ArchiveForgeError::Oracle(_) | ArchiveForgeError::Io { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ZipOracle::open(Path::new("/nonexistent/archive.zip")).err().unwrap();
        assert!(matches!(err, ArchiveForgeError::Io { .. }));
    }

    #[test]
    fn test_preallocation_is_capped() {
        assert_eq!(preallocation(42), 42);
        assert_eq!(preallocation(u64::MAX), 1 << 20);

        let oracle = ZipOracle::from_bytes(Path::new("test.zip"), encrypted_zip("pw")).unwrap();
        assert!(oracle.buffer.capacity() < 1 << 20);
    }
}
