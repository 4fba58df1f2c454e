//! Views derived from the task list. Nothing here is stored; every call
//! recomputes from the slice it is given.

use std::str::FromStr;

use chrono::NaiveDate;

use crate::models::{Category, Task, Urgency};

/// Urgency predicate with an "all" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrgencyFilter {
    #[default]
    All,
    Only(Urgency),
}

/// Category predicate with an "all" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl UrgencyFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            UrgencyFilter::All => true,
            UrgencyFilter::Only(u) => task.urgency == u,
        }
    }
}

impl CategoryFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => task.category == c,
        }
    }
}

impl FromStr for UrgencyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(UrgencyFilter::All);
        }
        s.parse().map(UrgencyFilter::Only)
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// Both predicates, combined with AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskFilter {
    pub urgency: UrgencyFilter,
    pub category: CategoryFilter,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.urgency.matches(task) && self.category.matches(task)
    }

    /// Matching tasks in source order. An empty result is normal.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Tasks scheduled exactly on `date`.
pub fn due_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.specific_date == Some(date))
        .collect()
}

/// High-urgency tasks that are not done yet.
pub fn urgent_pending(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.urgency == Urgency::High && !t.is_completed)
        .collect()
}

/// Pending and completed counts for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub pending: usize,
    pub done: usize,
}

pub fn progress(tasks: &[Task]) -> Progress {
    let done = tasks.iter().filter(|t| t.is_completed).count();
    Progress {
        pending: tasks.len() - done,
        done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_parses() {
        assert_eq!("ALL".parse::<UrgencyFilter>(), Ok(UrgencyFilter::All));
        assert_eq!(
            "high".parse::<UrgencyFilter>(),
            Ok(UrgencyFilter::Only(Urgency::High))
        );
        assert_eq!(
            "animals".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Animals))
        );
        assert!("sometimes".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn default_filter_admits_everything() {
        assert_eq!(TaskFilter::default().apply(&[]).len(), 0);
        assert_eq!(progress(&[]), Progress::default());
    }
}
