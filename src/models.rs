use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How often a task comes back around.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Monthly,
    Yearly,
}

/// Priority tier attached to a task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

/// Work classification of a task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Planting,
    Maintenance,
    Animals,
    #[default]
    General,
}

impl Category {
    /// Human-readable label used in tables.
    pub fn label(self) -> &'static str {
        match self {
            Category::Planting => "Planting & Harvest",
            Category::Maintenance => "Maintenance",
            Category::Animals => "Animals",
            Category::General => "General",
        }
    }
}

impl Recurrence {
    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Planting => "planting",
            Category::Maintenance => "maintenance",
            Category::Animals => "animals",
            Category::General => "general",
        }
    }
}

macro_rules! text_enum {
    ($ty:ident, $what:literal, [$($name:literal => $variant:ident),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(format!(
                        "unknown {} '{}' (expected one of: {})",
                        $what,
                        other,
                        [$($name),+].join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(Recurrence, "recurrence", ["none" => None, "monthly" => Monthly, "yearly" => Yearly]);
text_enum!(Urgency, "urgency", ["low" => Low, "medium" => Medium, "high" => High]);
text_enum!(Category, "category", [
    "planting" => Planting,
    "maintenance" => Maintenance,
    "animals" => Animals,
    "general" => General,
]);

/// A single piece of farm work.
///
/// This is also the shape persisted in the local task file, so field
/// names are camelCase and `createdAt` is stored as epoch milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier. Never changes once assigned.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The only field that may change after creation.
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub urgency: Urgency,
    /// Exact day the task is scheduled for. Only dated tasks show up on the calendar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<NaiveDate>,
    /// Month (1-12) for month-only recurring items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_reference: Option<u8>,
    #[serde(default)]
    pub category: Category,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Everything needed to create a task; id, completion and timestamp are assigned on save.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub recurrence: Recurrence,
    pub urgency: Urgency,
    pub specific_date: Option<NaiveDate>,
    pub month_reference: Option<u8>,
    pub category: Category,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Checks the draft can become a task: a non-blank title and a month in 1..=12.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidTask("title must not be empty".into()));
        }
        if let Some(month) = self.month_reference {
            if !(1..=12).contains(&month) {
                return Err(Error::InvalidTask(format!(
                    "month reference {} is outside 1-12",
                    month
                )));
            }
        }
        Ok(())
    }

    /// Builds the stored task. New tasks always start incomplete.
    pub fn into_task(self, id: String, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            is_completed: false,
            recurrence: self.recurrence,
            urgency: self.urgency,
            specific_date: self.specific_date,
            month_reference: self.month_reference,
            category: self.category,
            created_at,
        }
    }
}

/// An append-only diary entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyLog {
    pub id: String,
    pub log_date: NaiveDate,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
