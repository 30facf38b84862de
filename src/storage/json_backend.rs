use std::{fs, io::ErrorKind, path::PathBuf};

use crate::{errors::LedgerError, utils::atomic};

use super::{Result, StorageBackend};

const RECORD_EXTENSION: &str = "json";

/// File-per-key backend: each record lives at `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), RECORD_EXTENSION))
    }
}

impl StorageBackend for JsonStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(LedgerError::Io(err)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(key);
        atomic::write_atomic(&path, value)?;
        tracing::trace!(path = %path.display(), bytes = value.len(), "record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.record_path(key)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(LedgerError::Io(err)),
            _ => Ok(()),
        }
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "record".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_record_reads_as_none() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).unwrap();
        assert_eq!(storage.read("ledger").unwrap(), None);
    }

    #[test]
    fn write_replaces_without_leaving_tmp_files() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).unwrap();
        storage.write("theme", "\"dark\"").unwrap();
        storage.write("theme", "\"light\"").unwrap();

        assert_eq!(storage.read("theme").unwrap().as_deref(), Some("\"light\""));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["theme.json".to_string()]);
    }

    #[test]
    fn keys_are_sanitized_into_file_names() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).unwrap();
        assert!(storage
            .record_path("../View Year")
            .ends_with("___view_year.json"));
        assert!(storage.record_path("view_month").ends_with("view_month.json"));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).unwrap();
        storage.write("view_year", "2025").unwrap();
        storage.remove("view_year").unwrap();
        storage.remove("view_year").unwrap();
        assert_eq!(storage.read("view_year").unwrap(), None);
    }
}
