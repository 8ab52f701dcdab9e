//! File-backed key-value storage.
//!
//! The persistence model is a flat string-to-string dictionary, kept as a
//! single JSON object on disk. The task collection lives under the `tasks`
//! key as a JSON-encoded string; theme settings live under `theme` and
//! `themeStyle`. Reads are lenient (a missing or malformed file yields an
//! empty map); writes rewrite the whole file atomically.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Keys currently in use.
pub const TASKS_KEY: &str = "tasks";
pub const THEME_KEY: &str = "theme";
pub const THEME_STYLE_KEY: &str = "themeStyle";

/// A persistent string dictionary bound to one file.
#[derive(Debug)]
pub struct Storage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl Storage {
    /// Open storage at `path`, reading existing content if present.
    /// A missing file or unreadable/malformed content starts empty.
    pub fn open(path: &Path) -> Self {
        let entries = if path.exists() {
            let mut buf = String::new();
            match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
                Ok(_) => match serde_json::from_str(&buf) {
                    Ok(map) => map,
                    Err(e) => {
                        eprintln!("Error parsing storage, starting fresh: {e}");
                        BTreeMap::new()
                    }
                },
                Err(e) => {
                    eprintln!("Error reading storage, starting fresh: {e}");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Storage {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set a value. Takes effect on disk at the next `save`.
    pub fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    /// Write the whole dictionary to disk, replacing any prior content.
    /// Atomic-ish write via temp + rename.
    pub fn save(&self) -> std::io::Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(&self.entries)
            .map_err(std::io::Error::other)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }

    /// The file this storage is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absent_file_opens_empty() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("storage.json"));
        assert_eq!(storage.get(TASKS_KEY), None);
    }

    #[test]
    fn set_save_open_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut storage = Storage::open(&path);
        storage.set(THEME_KEY, "dark".into());
        storage.set(TASKS_KEY, "[]".into());
        storage.save().unwrap();

        let reopened = Storage::open(&path);
        assert_eq!(reopened.get(THEME_KEY), Some("dark"));
        assert_eq!(reopened.get(TASKS_KEY), Some("[]"));
    }

    #[test]
    fn malformed_file_opens_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ not json").unwrap();
        let storage = Storage::open(&path);
        assert_eq!(storage.get(THEME_KEY), None);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut storage = Storage::open(&path);
        storage.set(THEME_KEY, "light".into());
        storage.save().unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn save_overwrites_prior_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut storage = Storage::open(&path);
        storage.set(THEME_KEY, "dark".into());
        storage.save().unwrap();
        storage.set(THEME_KEY, "light".into());
        storage.save().unwrap();
        assert_eq!(Storage::open(&path).get(THEME_KEY), Some("light"));
    }
}
