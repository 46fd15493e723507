//! Snapshot file persistence.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::health::snapshot::StatusSnapshot;

/// Error type for snapshot persistence.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode snapshot {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// How a successful save went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// The directory was missing; it was created and the write retried once.
    WrittenAfterCreatingDir,
}

/// Persist `snapshot` to `path`.
///
/// The first attempt writes straight away. If it fails because the directory
/// does not exist, the directory is created and the same bytes are written
/// exactly once more. Any other failure is returned as is.
pub fn save_snapshot(snapshot: &StatusSnapshot, path: &Path) -> Result<SaveOutcome, StorageError> {
    let bytes = serde_json::to_vec_pretty(snapshot).map_err(StorageError::Encode)?;

    match write_atomic(path, &bytes) {
        Ok(()) => Ok(SaveOutcome::Written),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let dir = parent_dir(path);
            tracing::info!(dir = %dir.display(), "Snapshot directory missing, creating it");
            fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;

            tracing::info!(path = %path.display(), "Retrying snapshot save");
            write_atomic(path, &bytes).map_err(|e| StorageError::io(path, e))?;
            Ok(SaveOutcome::WrittenAfterCreatingDir)
        }
        Err(e) => Err(StorageError::io(path, e)),
    }
}

/// Read a previously saved snapshot. A missing file is `Ok(None)`.
pub fn load_snapshot(path: &Path) -> Result<Option<StatusSnapshot>, StorageError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StorageError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Write to a sibling temp file, then rename over the target.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = (|| {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
