//! Translation between [`Task`] and the remote table's row shape.
//!
//! The remote schema names columns in snake_case and leaves optional
//! columns null or absent. Reading a row never fails on a missing or
//! unrecognised value; it falls back to the task's documented default.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::models::{DailyLog, Task, TaskDraft};

/// Entity field name paired with its remote column.
pub const FIELD_TABLE: &[(&str, &str)] = &[
    ("id", "id"),
    ("title", "title"),
    ("description", "description"),
    ("isCompleted", "is_completed"),
    ("recurrence", "recurrence"),
    ("urgency", "urgency"),
    ("specificDate", "specific_date"),
    ("monthReference", "month_reference"),
    ("category", "category"),
    ("createdAt", "created_at"),
];

/// A task row as the remote backend returns it.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RemoteTask {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default)]
    pub specific_date: Option<String>,
    #[serde(default)]
    pub month_reference: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new task row. `id` and `created_at` are left to the server.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewRemoteTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub recurrence: String,
    pub urgency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_reference: Option<u8>,
    pub is_completed: bool,
}

/// Body of a completion update.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct CompletionPatch {
    pub is_completed: bool,
}

/// A diary row as the remote backend returns it.
#[derive(Deserialize, Debug, Clone)]
pub struct RemoteLog {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    pub log_date: NaiveDate,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a diary row.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewRemoteLog {
    pub log_date: NaiveDate,
    pub content: String,
}

/// Remote row to entity.
pub fn task_from_remote(row: RemoteTask) -> Task {
    let id = row.id;
    Task {
        recurrence: parse_or_default(&id, "recurrence", row.recurrence.as_deref()),
        urgency: parse_or_default(&id, "urgency", row.urgency.as_deref()),
        category: parse_or_default(&id, "category", row.category.as_deref()),
        specific_date: row.specific_date.as_deref().and_then(|raw| {
            let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
            if parsed.is_none() {
                warn!(task = %id, value = raw, "ignoring unreadable specific_date");
            }
            parsed
        }),
        month_reference: row
            .month_reference
            .and_then(|m| u8::try_from(m).ok())
            .filter(|m| (1..=12).contains(m)),
        title: row.title,
        description: row.description,
        is_completed: row.is_completed.unwrap_or(false),
        created_at: row.created_at.unwrap_or_default(),
        id,
    }
}

/// Entity draft to insert payload.
pub fn remote_from_draft(draft: &TaskDraft) -> NewRemoteTask {
    NewRemoteTask {
        title: draft.title.clone(),
        description: draft.description.clone(),
        category: draft.category.to_string(),
        recurrence: draft.recurrence.to_string(),
        urgency: draft.urgency.to_string(),
        specific_date: draft.specific_date,
        month_reference: draft.month_reference,
        is_completed: false,
    }
}

pub fn log_from_remote(row: RemoteLog) -> DailyLog {
    DailyLog {
        id: row.id,
        log_date: row.log_date,
        content: row.content,
        created_at: row.created_at.unwrap_or_default(),
    }
}

fn parse_or_default<T>(id: &str, column: &str, raw: Option<&str>) -> T
where
    T: std::str::FromStr + Default,
{
    match raw {
        None => T::default(),
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!(task = id, column, value, "unknown value, using default");
            T::default()
        }),
    }
}

fn id_from_text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
