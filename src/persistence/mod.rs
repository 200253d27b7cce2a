//! Save/load persistence with corruption recovery
//!
//! Features:
//! - Versioned JSON envelope
//! - Backup rotation (tmp → save, old save → backup)
//! - Corruption detection and recovery from the backup

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current envelope format
pub const FORMAT_VERSION: u32 = 1;

/// Wrapper written around every saved payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    /// Unix seconds
    pub saved_at: u64,
    pub payload: T,
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("no per-user data directory on this platform")]
    NoDataDir,
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt save file {}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported save version {found} (expected {FORMAT_VERSION})")]
    UnsupportedVersion { found: u32 },
}

impl PersistenceError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Per-user directory for saves
pub fn data_dir() -> Result<PathBuf, PersistenceError> {
    ProjectDirs::from("", "", "color-garage")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(PersistenceError::NoDataDir)
}

/// Seconds since the Unix epoch (0 if the clock is before it)
pub fn unix_time_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Previous save kept next to `path`
pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, ".bak")
}

/// Write `payload` to `path`: tmp file first, current save rotated to backup
pub fn save<T: Serialize>(path: &Path, payload: &T) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
    }

    let envelope = Envelope {
        version: FORMAT_VERSION,
        saved_at: unix_time_secs(),
        payload,
    };
    let json = serde_json::to_string_pretty(&envelope).map_err(|source| {
        PersistenceError::Corrupt {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let tmp = with_suffix(path, ".tmp");
    fs::write(&tmp, json).map_err(|e| PersistenceError::io(&tmp, e))?;

    if path.exists() {
        let backup = backup_path(path);
        fs::rename(path, &backup).map_err(|e| PersistenceError::io(&backup, e))?;
    }
    fs::rename(&tmp, path).map_err(|e| PersistenceError::io(path, e))?;

    log::debug!("Saved {}", path.display());
    Ok(())
}

fn read_envelope<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PersistenceError::io(path, e)),
    };

    let corrupt = |source| PersistenceError::Corrupt {
        path: path.to_path_buf(),
        source,
    };
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(&json).map_err(corrupt)?;
    if envelope.version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: envelope.version,
        });
    }
    let payload = serde_json::from_value(envelope.payload).map_err(corrupt)?;
    Ok(Some(payload))
}

/// Load a payload saved with [`save`]
///
/// Returns `Ok(None)` when nothing was ever saved. A corrupt primary file
/// falls back to the backup; the primary's error is returned only if the
/// backup is unusable too.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    match read_envelope(path) {
        Ok(Some(payload)) => Ok(Some(payload)),
        Ok(None) => Ok(None),
        Err(err) => {
            let backup = backup_path(path);
            log::warn!("{}; trying backup {}", err, backup.display());
            match read_envelope(&backup) {
                Ok(Some(payload)) => Ok(Some(payload)),
                _ => Err(err),
            }
        }
    }
}
