use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TaskError;

/// Storage format of [`Task::date`]. Zero-padded and year-first, so the
/// string order matches chronological order.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Day component format used by the calendar projection.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Opaque task identifier.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Generates a fresh time-ordered identifier (UUID v7).
    pub fn generate() -> Self {
        TaskId(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

/// Progress state of a task. Any state may follow any other.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::InProgress, TaskStatus::Completed, TaskStatus::Cancelled];

    /// The literal label persisted in storage and used for status sorting.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in progress" | "in-progress" | "in_progress" | "inprogress" | "progress" => Ok(TaskStatus::InProgress),
            "completed" | "complete" | "done" => Ok(TaskStatus::Completed),
            "cancelled" | "canceled" | "cancel" => Ok(TaskStatus::Cancelled),
            _ => Err(TaskError::InvalidStatus(s.to_string())),
        }
    }
}

/// A single to-do item, the only entity persisted under the `tasks` key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier within the collection.
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// Due date as stored, normally in [`DATE_FORMAT`].
    pub date: String,
    /// Free-text address.
    pub location: String,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// Parsed form of [`Task::date`], if it is readable.
    pub fn due(&self) -> Option<NaiveDateTime> {
        parse_task_date(&self.date)
    }
}

/// Input for creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub date: NaiveDateTime,
    pub location: String,
}

/// Field replacements for an edit. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.status.is_none()
    }
}

/// Field a task list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    #[default]
    Date,
    Status,
}

/// Status selection for the filtered list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

/// User profile, stored independently of tasks under the `profile` key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            name: "Qara Lux".into(),
            email: "lux@qara.app".into(),
        }
    }
}

/// Formats a date-time in the storage format.
pub fn format_task_date(date: NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a stored task date.
///
/// Besides [`DATE_FORMAT`] this reads ISO `T`-separated timestamps, RFC 3339
/// and bare `yyyy-MM-dd` dates (taken as midnight).
pub fn parse_task_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    let formats = [
        DATE_FORMAT,
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDate::parse_from_str(s, DAY_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses user input for a due date, reporting the offending text on failure.
pub fn parse_date_input(s: &str) -> Result<NaiveDateTime, TaskError> {
    parse_task_date(s).ok_or_else(|| TaskError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let back: TaskStatus = serde_json::from_str("\"Cancelled\"").unwrap();
        assert_eq!(back, TaskStatus::Cancelled);
    }

    #[test]
    fn test_status_from_cli_spelling() {
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("Done".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert!("later".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("All".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "completed".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(TaskStatus::Completed)
        );
    }

    #[test]
    fn test_parse_task_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse_task_date("2024-01-01 09:30"), Some(expected));
        assert_eq!(parse_task_date("2024-01-01T09:30"), Some(expected));
        assert_eq!(parse_task_date("2024-01-01T09:30:00.000"), Some(expected));
        assert!(parse_task_date("2024-01-01").is_some());
        assert!(parse_task_date("tomorrow").is_none());
    }

    #[test]
    fn test_format_round_trip() {
        let dt = parse_task_date("2025-03-07 18:05").unwrap();
        assert_eq!(format_task_date(dt), "2025-03-07 18:05");
    }
}
