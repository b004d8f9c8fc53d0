//! Snapshot sinks.
//!
//! The engine hands every new snapshot to a [`SnapshotSink`] and moves on. A failing
//! sink is logged and counted but never fails the operation that produced the snapshot.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Destination for serialized snapshots.
pub trait SnapshotSink: Send + Sync {
    fn persist(&self, snapshot_json: &str) -> io::Result<()>;
}

/// Discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl SnapshotSink for NoopSink {
    fn persist(&self, _snapshot_json: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps the latest snapshot in a JSON file.
///
/// Writes go to a sibling temporary file first and are renamed into place, so a crash
/// mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored snapshot, `None` when nothing was saved yet.
    pub fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotSink for JsonFileSink {
    fn persist(&self, snapshot_json: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, snapshot_json)?;
        fs::rename(&temp, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSink::new(dir.path().join("cadence.json"));

        assert_eq!(sink.load().unwrap(), None);
    }

    #[test]
    fn test_persist_then_load() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSink::new(dir.path().join("nested/state.json"));

        sink.persist("{\"version\":1}").unwrap();
        sink.persist("{\"version\":2}").unwrap();

        assert_eq!(sink.load().unwrap().as_deref(), Some("{\"version\":2}"));
        assert!(!dir.path().join("nested/state.json.tmp").exists());
    }
}
