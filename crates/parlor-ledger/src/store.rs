//! A single persisted key-value store.
//!
//! One `Store` backs one JSON file mapping participant id to a value
//! (an integer balance, a card list, a pet list). The whole file is
//! rewritten on every mutation — there is no append log — which keeps
//! recovery trivial: the file on disk is always a complete snapshot.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use parlor_types::ParticipantId;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::LedgerError;

/// Suffix appended to a store file that failed to parse on load.
const BACKUP_SUFFIX: &str = "bak";

pub(crate) struct Store<T> {
    path: PathBuf,
    /// The authoritative in-memory state. The mutex is held across the
    /// full read-modify-write-persist cycle, so two mutations of the
    /// same store never interleave and no update is ever lost.
    map: Mutex<HashMap<ParticipantId, T>>,
}

impl<T> Store<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Opens the store at `path`, loading any existing file.
    ///
    /// A missing file is an empty store. A file that exists but fails
    /// to read or parse is renamed aside (`<name>.bak`) and the store
    /// starts empty — availability over durability, by contract.
    pub(crate) fn open(path: PathBuf) -> Self {
        let map = Self::load(&path);
        Self {
            path,
            map: Mutex::new(map),
        }
    }

    fn load(path: &Path) -> HashMap<ParticipantId, T> {
        if !path.exists() {
            return HashMap::new();
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read store file, starting empty"
                );
                return HashMap::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(map) => map,
            Err(e) => {
                let backup = backup_path(path);
                if let Err(rename_err) = fs::rename(path, &backup) {
                    tracing::warn!(
                        path = %path.display(),
                        error = %rename_err,
                        "failed to move corrupt store aside"
                    );
                }
                tracing::warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "corrupt store file, starting empty"
                );
                HashMap::new()
            }
        }
    }

    /// Reads from the store under the lock.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&HashMap<ParticipantId, T>) -> R) -> R {
        let map = self.map.lock().expect("store lock poisoned");
        f(&map)
    }

    /// Returns a clone of the value for `id`, if present.
    pub(crate) fn get(&self, id: ParticipantId) -> Option<T> {
        self.read(|map| map.get(&id).cloned())
    }

    /// Mutates the store and persists the result before returning.
    ///
    /// The closure runs against a scratch copy; the copy only becomes
    /// the authoritative state after the file write succeeds, so a
    /// failed persist leaves both memory and disk untouched.
    pub(crate) fn mutate<R>(
        &self,
        f: impl FnOnce(&mut HashMap<ParticipantId, T>) -> R,
    ) -> Result<R, LedgerError> {
        self.try_mutate(|map| Ok(f(map)))
    }

    /// Like [`mutate`](Self::mutate), but the closure may abort the
    /// mutation. On `Err` nothing is persisted and nothing is committed.
    pub(crate) fn try_mutate<R>(
        &self,
        f: impl FnOnce(&mut HashMap<ParticipantId, T>) -> Result<R, LedgerError>,
    ) -> Result<R, LedgerError> {
        let mut map = self.map.lock().expect("store lock poisoned");
        let mut next = map.clone();
        let result = f(&mut next)?;
        self.persist(&next)?;
        *map = next;
        Ok(result)
    }

    /// Writes the full store snapshot via temp-file-then-rename, so a
    /// crash mid-write can never leave a half-written file behind.
    fn persist(&self, map: &HashMap<ParticipantId, T>) -> Result<(), LedgerError> {
        let bytes = serde_json::to_vec_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.{BACKUP_SUFFIX}")),
        None => path.with_extension(BACKUP_SUFFIX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_appends_suffix() {
        let p = backup_path(Path::new("/data/balances.json"));
        assert_eq!(p, Path::new("/data/balances.json.bak"));
    }

    #[test]
    fn test_backup_path_without_extension() {
        let p = backup_path(Path::new("/data/balances"));
        assert_eq!(p, Path::new("/data/balances.bak"));
    }
}
