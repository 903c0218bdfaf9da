//! Loader for the offline card pool.
//!
//! Reads a JSON array of `{name, set?, rarity?, image}` records from disk
//! once at startup. Entries that do not decode as a record are skipped here
//! and records without a usable image are dropped by the domain pool. A file
//! that leaves no usable card is rejected.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{OfflineCardPool, OfflineCardRecord};

/// Errors returned while loading the offline pool.
#[derive(Debug, Error)]
pub enum OfflinePoolLoadError {
    /// The file could not be opened or read.
    #[error("failed to read offline pool at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a JSON array of card records.
    #[error("invalid offline pool JSON at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Every record was rejected.
    #[error("offline pool at {path} holds no usable cards")]
    Empty { path: PathBuf },
}

/// Load and validate the offline pool stored at `path`.
///
/// # Errors
///
/// Returns [`OfflinePoolLoadError`] when the file is unreadable, malformed,
/// or contains no usable card.
pub fn load_offline_pool(path: &Path) -> Result<OfflineCardPool, OfflinePoolLoadError> {
    let payload = read_file(path)?;
    let entries: Vec<serde_json::Value> =
        serde_json::from_slice(&payload).map_err(|source| OfflinePoolLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let total = entries.len();
    let records: Vec<OfflineCardRecord> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();
    if records.len() < total {
        warn!(
            path = %path.display(),
            skipped = total - records.len(),
            "malformed offline pool entries skipped"
        );
    }
    let pool = OfflineCardPool::from_records(records);
    if pool.is_empty() {
        return Err(OfflinePoolLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    info!(path = %path.display(), cards = pool.len(), "offline card pool loaded");
    Ok(pool)
}

fn read_file(path: &Path) -> Result<Vec<u8>, OfflinePoolLoadError> {
    let read_error = |source| OfflinePoolLoadError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "offline pool path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    dir.read(Path::new(file_name)).map_err(read_error)
}
