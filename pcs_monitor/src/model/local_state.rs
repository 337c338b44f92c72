//! Local token database persisted as a small JSON file.
//!
//! The file records the server time of the last processed update and every token
//! address seen so far:
//!
//! ```json
//! { "updated_at": 1634567890123, "data": ["0x0E09...", "0xbb4C..."] }
//! ```
//!
//! Design notes:
//! - `LocalState` is owned by the monitor loop; `StateStore` is only the file boundary.
//! - Saves go to a sibling `.tmp` file which is then renamed over the target, so the
//!   file is always either the previous or the new content.
//! - Addresses are written sorted so saving the same state twice yields the same bytes.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pcs_common::api::STALE_THRESHOLD_MS;
use pcs_common::{MonitorError, Result};
use serde::{Deserialize, Serialize};

/// File name of the local database inside the cache directory.
pub const DATABASE_FILE: &str = "pcs_token.json";

/// In-memory view of the local database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalState {
    /// Server time (ms since epoch) of the last recorded update.
    pub saved_time: i64,
    /// Addresses of every token already reported on.
    pub known_tokens: HashSet<String>,
}

impl LocalState {
    /// Create a state from a server time and a set of known addresses.
    pub fn new(saved_time: i64, known_tokens: HashSet<String>) -> Self {
        Self {
            saved_time,
            known_tokens,
        }
    }

    /// `true` when the state is older than the staleness threshold at `now_ms`.
    pub fn is_stale(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.saved_time) > STALE_THRESHOLD_MS
    }
}

/// On-disk layout; exactly two top-level fields.
#[derive(Serialize, Deserialize)]
struct DatabaseFile {
    updated_at: i64,
    data: Vec<String>,
}

/// Reads and writes the local database at a fixed path.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store for `<cache_dir>/pcs_token.json`.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            path: cache_dir.join(DATABASE_FILE),
        }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the database. Fails with `NotFound` when the file does not exist
    /// and with `Corrupt` when it cannot be parsed.
    pub fn load(&self) -> Result<LocalState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(MonitorError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let file: DatabaseFile = serde_json::from_str(&raw).map_err(|e| MonitorError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        Ok(LocalState::new(file.updated_at, file.data.into_iter().collect()))
    }

    /// Overwrite the database with `state`, creating the cache directory if needed.
    pub fn save(&self, state: &LocalState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut data: Vec<String> = state.known_tokens.iter().cloned().collect();
        data.sort();
        let json = serde_json::to_vec(&DatabaseFile {
            updated_at: state.saved_time,
            data,
        })?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}
