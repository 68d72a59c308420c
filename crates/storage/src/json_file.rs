use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use snafu::ResultExt;

use super::KeyValueStore;
use super::error::{
    CreateStoreDirectorySnafu, ParseStoreSnafu, ReadStoreSnafu, RenameTempStoreSnafu,
    SerializeStoreSnafu, StorageError, StorageResult, WriteStoreSnafu,
};

pub const DEFAULT_STORE_FILE_NAME: &str = "local_storage.json";

type Entries = BTreeMap<String, String>;

/// Key-value store persisted as one JSON object on disk.
///
/// Every write rewrites the whole file through a temporary sibling and a rename,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles issued from this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<Entries> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Entries::new());
            }
            Err(source) => {
                return Err(StorageError::ReadStore {
                    stage: "read-store-file",
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if text.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&text).context(ParseStoreSnafu {
            stage: "parse-store-file",
            path: self.path.clone(),
        })
    }

    /// Loads entries for a write, discarding a corrupt file instead of failing.
    fn read_entries_for_write(&self) -> StorageResult<Entries> {
        match self.read_entries() {
            Ok(entries) => Ok(entries),
            Err(StorageError::ParseStore { path, source, .. }) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %source,
                    "key-value store is corrupt; rewriting it from scratch"
                );
                Ok(Entries::new())
            }
            Err(error) => Err(error),
        }
    }

    fn write_entries(&self, entries: &Entries) -> StorageResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context(CreateStoreDirectorySnafu {
                stage: "create-store-directory",
                path: parent.to_path_buf(),
            })?;
        }

        let content = serde_json::to_string_pretty(entries).context(SerializeStoreSnafu {
            stage: "serialize-store-json",
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).context(WriteStoreSnafu {
            stage: "write-temporary-store-file",
            path: temp_path.clone(),
        })?;

        std::fs::rename(&temp_path, &self.path).context(RenameTempStoreSnafu {
            stage: "rename-temporary-store-file",
            from: temp_path,
            to: self.path.clone(),
        })?;

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            "saved key-value store"
        );
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries_for_write()?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("nested").join(DEFAULT_STORE_FILE_NAME))
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        assert_eq!(store.get("chatIconPos").expect("get"), None);
    }

    #[test]
    fn values_survive_a_fresh_instance() {
        let dir = tempfile::tempdir().expect("tempdir");
        store_in(&dir)
            .set("chatIconPos", r#"{"x":10.0,"y":20.0}"#.to_string())
            .expect("set");

        let reopened = store_in(&dir);
        assert_eq!(
            reopened.get("chatIconPos").expect("get").as_deref(),
            Some(r#"{"x":10.0,"y":20.0}"#)
        );
        assert!(!reopened.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn set_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.set("a", "1".to_string()).expect("set a");
        store.set("b", "2".to_string()).expect("set b");
        store.set("a", "3".to_string()).expect("overwrite a");

        assert_eq!(store.get("a").expect("get a").as_deref(), Some("3"));
        assert_eq!(store.get("b").expect("get b").as_deref(), Some("2"));
    }

    #[test]
    fn corrupt_file_fails_reads_but_is_replaced_on_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(store.path(), "not json at all").expect("write garbage");

        assert!(matches!(
            store.get("chatIconPos"),
            Err(StorageError::ParseStore { .. })
        ));

        store
            .set("chatIconPos", r#"{"x":1.0,"y":2.0}"#.to_string())
            .expect("set over corrupt file");
        assert_eq!(
            store.get("chatIconPos").expect("get").as_deref(),
            Some(r#"{"x":1.0,"y":2.0}"#)
        );
    }
}
