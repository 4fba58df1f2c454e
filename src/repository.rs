//! The task persistence facade.
//!
//! Each call goes to the remote backend when one was configured at startup
//! and to the local store otherwise. Remote reads fall back to the local
//! snapshot on failure. Remote writes do not: remote is authoritative for
//! writes, so a failed remote create, update or delete leaves the local
//! store untouched and the plain forms only log the failure.

use std::sync::Arc;

use chrono::{Local, SubsecRound, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::mapper::{log_from_remote, remote_from_draft, task_from_remote, NewRemoteLog};
use crate::models::{DailyLog, Task, TaskDraft};
use crate::remote::{RemoteStore, RestStore};
use crate::storage::LocalStore;

/// How many diary entries `latest_logs` returns.
pub const LATEST_LOGS: usize = 5;

pub struct TaskRepository {
    local: LocalStore,
    remote: Option<Arc<dyn RemoteStore>>,
}

impl TaskRepository {
    /// Builds the repository for a probed configuration.
    ///
    /// A remote client that cannot be constructed is treated like missing
    /// credentials: the repository runs local-only for its whole lifetime.
    pub fn new(config: &StoreConfig) -> Self {
        let local = LocalStore::new(config.data_dir.clone());
        let remote = config.remote.as_ref().and_then(|remote| match RestStore::new(remote) {
            Ok(store) => Some(Arc::new(store) as Arc<dyn RemoteStore>),
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "remote client unavailable, using local storage only");
                None
            }
        });
        info!(remote = remote.is_some(), data_dir = %config.data_dir.display(), "task repository ready");
        Self { local, remote }
    }

    /// Builds the repository from explicit parts.
    pub fn with_stores(local: LocalStore, remote: Option<Arc<dyn RemoteStore>>) -> Self {
        Self { local, remote }
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn local_store(&self) -> &LocalStore {
        &self.local
    }

    /// Loads every task, newest first.
    ///
    /// Never fails: a remote error is logged and the local snapshot is
    /// returned as-is, however stale.
    pub async fn load_all(&self) -> Vec<Task> {
        let Some(remote) = &self.remote else {
            return self.local.load_tasks();
        };
        match remote.select_tasks().await {
            Ok(rows) => rows.into_iter().map(task_from_remote).collect(),
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "failed to load tasks remotely, using local copy");
                self.local.load_tasks()
            }
        }
    }

    /// Saves a new task and returns it, or `None` if it could not be saved.
    pub async fn create(&self, draft: TaskDraft) -> Option<Task> {
        match self.try_create(draft).await {
            Ok(task) => Some(task),
            Err(err) => {
                error!(error = %err, kind = err.kind(), "failed to create task");
                None
            }
        }
    }

    pub async fn try_create(&self, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        if let Some(remote) = &self.remote {
            let row = remote.insert_task(&remote_from_draft(&draft)).await?;
            return Ok(task_from_remote(row));
        }

        let task = draft.into_task(Uuid::new_v4().to_string(), Utc::now().trunc_subsecs(3));
        let mut tasks = self.local.load_tasks();
        tasks.insert(0, task.clone());
        self.local.save_tasks(&tasks)?;
        Ok(task)
    }

    /// Sets the completion flag. Failures are logged, never returned.
    pub async fn set_completion(&self, id: &str, is_completed: bool) {
        if let Err(err) = self.try_set_completion(id, is_completed).await {
            error!(error = %err, kind = err.kind(), id, "failed to update task");
        }
    }

    /// Sets the completion flag. An unknown id is not an error.
    pub async fn try_set_completion(&self, id: &str, is_completed: bool) -> Result<()> {
        if let Some(remote) = &self.remote {
            return remote.update_completion(id, is_completed).await;
        }

        let mut tasks = self.local.load_tasks();
        let mut changed = false;
        for task in tasks.iter_mut().filter(|t| t.id == id) {
            task.is_completed = is_completed;
            changed = true;
        }
        if changed {
            self.local.save_tasks(&tasks)?;
        }
        Ok(())
    }

    /// Deletes a task for good. Failures are logged, never returned.
    pub async fn delete(&self, id: &str) {
        if let Err(err) = self.try_delete(id).await {
            error!(error = %err, kind = err.kind(), id, "failed to delete task");
        }
    }

    pub async fn try_delete(&self, id: &str) -> Result<()> {
        if let Some(remote) = &self.remote {
            return remote.delete_task(id).await;
        }

        let mut tasks = self.local.load_tasks();
        let len_before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() != len_before {
            self.local.save_tasks(&tasks)?;
        }
        Ok(())
    }

    /// Adds a diary entry dated today. Blank entries are rejected.
    pub async fn append_log(&self, content: &str) -> Option<DailyLog> {
        match self.try_append_log(content).await {
            Ok(log) => Some(log),
            Err(err) => {
                error!(error = %err, kind = err.kind(), "failed to save diary entry");
                None
            }
        }
    }

    pub async fn try_append_log(&self, content: &str) -> Result<DailyLog> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::EmptyLog);
        }
        let log_date = Local::now().date_naive();

        if let Some(remote) = &self.remote {
            let row = NewRemoteLog {
                log_date,
                content: content.to_string(),
            };
            return Ok(log_from_remote(remote.insert_log(&row).await?));
        }

        let log = DailyLog {
            id: Uuid::new_v4().to_string(),
            log_date,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.local.append_log(&log)?;
        Ok(log)
    }

    /// The most recent diary entries, newest first.
    pub async fn latest_logs(&self) -> Vec<DailyLog> {
        if let Some(remote) = &self.remote {
            match remote.select_logs(LATEST_LOGS).await {
                Ok(rows) => return rows.into_iter().map(log_from_remote).collect(),
                Err(err) => {
                    warn!(error = %err, kind = err.kind(), "failed to load diary remotely, using local copy");
                }
            }
        }
        let mut logs = self.local.load_logs();
        logs.truncate(LATEST_LOGS);
        logs
    }
}
