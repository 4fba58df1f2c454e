use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{DailyLog, Task};

const TASKS_FILE: &str = "tasks.json";
const LOGS_FILE: &str = "logs.json";

/// Whole-collection durable cache on the local disk.
///
/// Every read returns the full list; every write replaces the file as one
/// unit. There is no per-record versioning, so two processes writing the
/// same directory will overwrite each other.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the path to the tasks file (`tasks.json`).
    pub fn tasks_path(&self) -> PathBuf {
        self.dir.join(TASKS_FILE)
    }

    /// Returns the path to the diary file (`logs.json`).
    pub fn logs_path(&self) -> PathBuf {
        self.dir.join(LOGS_FILE)
    }

    /// Loads all tasks in stored order.
    ///
    /// Returns an empty vector if the file does not exist or cannot be parsed.
    pub fn load_tasks(&self) -> Vec<Task> {
        read_list(&self.tasks_path())
    }

    /// Replaces the stored task list.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        write_list(&self.tasks_path(), tasks)
    }

    /// Loads all diary entries, newest first.
    pub fn load_logs(&self) -> Vec<DailyLog> {
        read_list(&self.logs_path())
    }

    /// Puts an entry at the front of the diary.
    pub fn append_log(&self, log: &DailyLog) -> Result<()> {
        let mut logs = self.load_logs();
        logs.insert(0, log.clone());
        write_list(&self.logs_path(), &logs)
    }
}

fn read_list<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    match try_read_list(path) {
        Ok(items) => items,
        Err(err) => {
            warn!(error = %err, kind = err.kind(), "treating local store as empty");
            if matches!(err, Error::LocalCorruption { .. }) {
                set_aside(path);
            }
            Vec::new()
        }
    }
}

/// Moves an unparseable file to `<name>.corrupt` so the next write does not
/// destroy it.
fn set_aside(path: &Path) {
    let target = path.with_extension("json.corrupt");
    match fs::rename(path, &target) {
        Ok(()) => warn!(path = %target.display(), "moved unreadable local file aside"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not move unreadable local file aside"),
    }
}

fn try_read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&content).map_err(|e| Error::LocalCorruption {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // A bad record is dropped on its own so the rest of the list survives
    // the next write.
    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value(entry) {
            Ok(item) => items.push(item),
            Err(e) => warn!(
                path = %path.display(),
                index,
                error = %e,
                kind = "local_corruption",
                "skipping unreadable local record"
            ),
        }
    }
    Ok(items)
}

/// Writes to a sibling temp file and renames it over the target, so readers
/// see either the old list or the new one.
fn write_list<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(items)?;
    let temp_path = path.with_extension("json.tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskDraft;
    use chrono::Utc;
    use tempfile::TempDir;

    fn task(id: &str) -> Task {
        TaskDraft::new(format!("task {id}")).into_task(id.into(), Utc::now())
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("nested"));
        assert!(store.load_tasks().is_empty());
        assert!(store.load_logs().is_empty());
    }

    #[test]
    fn save_replaces_whole_list() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        store.save_tasks(&[task("a"), task("b")]).unwrap();
        store.save_tasks(&[task("c")]).unwrap();
        let ids: Vec<_> = store.load_tasks().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["c"]);
        assert!(!store.tasks_path().with_extension("json.tmp").exists());
    }

    #[test]
    fn unreadable_record_is_skipped() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        let mut good = serde_json::to_value(task("a")).unwrap();
        let mut bad = good.clone();
        bad["id"] = "b".into();
        bad["recurrence"] = "weekly".into();
        good["title"] = "kept".into();
        fs::write(store.tasks_path(), serde_json::to_string(&[bad, good]).unwrap()).unwrap();

        let tasks = store.load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "kept");
    }

    #[test]
    fn corrupt_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        fs::write(store.tasks_path(), "{not json").unwrap();
        assert!(matches!(
            try_read_list::<Task>(&store.tasks_path()),
            Err(Error::LocalCorruption { .. })
        ));
        assert!(store.load_tasks().is_empty());
        assert!(!store.tasks_path().exists());
        let kept = fs::read_to_string(store.tasks_path().with_extension("json.corrupt")).unwrap();
        assert_eq!(kept, "{not json");
    }
}
