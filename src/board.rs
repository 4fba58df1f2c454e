//! In-memory task list with optimistic updates.
//!
//! A toggle or removal is applied to the list right away and then
//! persisted. Each mutation is captured as a [`BoardCommand`] holding what
//! it replaced, so a failed save puts the list back the way it was instead
//! of leaving it out of step with storage.

use tracing::warn;

use crate::error::Result;
use crate::models::{Task, TaskDraft};
use crate::repository::TaskRepository;

/// A mutation together with the state needed to undo it.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardCommand {
    SetCompletion { id: String, previous: bool, next: bool },
    Remove { index: usize, task: Task },
}

#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub async fn load(repo: &TaskRepository) -> Self {
        Self::new(repo.load_all().await)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub async fn refresh(&mut self, repo: &TaskRepository) {
        self.tasks = repo.load_all().await;
    }

    /// Creates the task and, once saved, puts it at the top of the list.
    pub async fn add(&mut self, repo: &TaskRepository, draft: TaskDraft) -> Result<&Task> {
        let task = repo.try_create(draft).await?;
        self.tasks.insert(0, task);
        Ok(&self.tasks[0])
    }

    /// Flips a task's completion flag.
    ///
    /// Returns the new flag, or `None` if the id is not on the board.
    pub async fn toggle(&mut self, repo: &TaskRepository, id: &str) -> Result<Option<bool>> {
        let Some(current) = self.get(id).map(|t| t.is_completed) else {
            return Ok(None);
        };
        let found = self.set_completion(repo, id, !current).await?;
        Ok(found.then_some(!current))
    }

    /// Sets a task's completion flag. Returns `false` if the id is not on the board.
    pub async fn set_completion(
        &mut self,
        repo: &TaskRepository,
        id: &str,
        is_completed: bool,
    ) -> Result<bool> {
        let Some(previous) = self.get(id).map(|t| t.is_completed) else {
            return Ok(false);
        };
        let command = BoardCommand::SetCompletion {
            id: id.to_string(),
            previous,
            next: is_completed,
        };
        self.apply(&command);
        match repo.try_set_completion(id, is_completed).await {
            Ok(()) => Ok(true),
            Err(err) => {
                warn!(error = %err, id, "update failed, reverting board");
                self.revert(command);
                Err(err)
            }
        }
    }

    /// Removes a task. Returns `false` if the id is not on the board.
    pub async fn remove(&mut self, repo: &TaskRepository, id: &str) -> Result<bool> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        let command = BoardCommand::Remove {
            index,
            task: self.tasks[index].clone(),
        };
        self.apply(&command);
        match repo.try_delete(id).await {
            Ok(()) => Ok(true),
            Err(err) => {
                warn!(error = %err, id, "delete failed, reverting board");
                self.revert(command);
                Err(err)
            }
        }
    }

    fn apply(&mut self, command: &BoardCommand) {
        match command {
            BoardCommand::SetCompletion { id, next, .. } => self.set_flag(id, *next),
            BoardCommand::Remove { index, .. } => {
                self.tasks.remove(*index);
            }
        }
    }

    fn revert(&mut self, command: BoardCommand) {
        match command {
            BoardCommand::SetCompletion { id, previous, .. } => self.set_flag(&id, previous),
            BoardCommand::Remove { index, task } => {
                let index = index.min(self.tasks.len());
                self.tasks.insert(index, task);
            }
        }
    }

    fn set_flag(&mut self, id: &str, is_completed: bool) {
        for task in self.tasks.iter_mut().filter(|t| t.id == id) {
            task.is_completed = is_completed;
        }
    }
}
