//! Task entity for the board.
//!
//! Tasks are owned exclusively by the [`Board`](crate::board::Board); the
//! outside world sees clones. Every mutation goes through an accessor that
//! reports whether anything actually changed, and `updated_at` moves only
//! on real changes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

/// Numeric task identifier, stable for the task's lifetime.
pub type TaskId = i64;

/// Workflow column of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Todo,
    Progress,
    Done,
}

impl Status {
    /// All columns, in board order.
    pub const ALL: [Status; 3] = [Status::Todo, Status::Progress, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::Progress => "progress",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(Status::Todo),
            "progress" => Ok(Status::Progress),
            "done" => Ok(Status::Done),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// Three-step classification scale.
///
/// Used for both `urgency_level` and `priority`; the two are independent
/// axes that happen to share a value set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Baixa,
    #[default]
    Normal,
    Urgente,
}

impl Level {
    /// Numeric weight for ordering: urgente=3, normal=2, baixa=1.
    pub fn weight(&self) -> u8 {
        match self {
            Level::Urgente => 3,
            Level::Normal => 2,
            Level::Baixa => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Baixa => "baixa",
            Level::Normal => "normal",
            Level::Urgente => "urgente",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "baixa" => Ok(Level::Baixa),
            "normal" => Ok(Level::Normal),
            "urgente" => Ok(Level::Urgente),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

/// A single task on the board.
///
/// The serde representation is the flat snapshot record used for
/// persistence and import/export: camelCase keys, lowercase enum values,
/// ISO-8601 timestamps. Deserialization trusts the payload; structural
/// checking happens separately through [`is_valid_task_data`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    description: String,
    #[serde(default)]
    detailed_description: String,
    #[serde(default)]
    urgency_level: Level,
    #[serde(default)]
    priority: Level,
    status: Status,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task in the `todo` column.
    ///
    /// The description is trimmed; an empty result is rejected. Length
    /// capping is the caller's concern (the board enforces its configured
    /// limit before constructing).
    pub fn new(description: &str) -> Result<Self> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyDescription);
        }

        let now = Utc::now();
        Ok(Self {
            id: next_task_id(),
            description: trimmed.to_string(),
            detailed_description: String::new(),
            urgency_level: Level::default(),
            priority: Level::default(),
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn detailed_description(&self) -> &str {
        &self.detailed_description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn urgency_level(&self) -> Level {
        self.urgency_level
    }

    pub fn priority(&self) -> Level {
        self.priority
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Numeric priority weight: urgente=3, normal=2, baixa=1.
    pub fn priority_weight(&self) -> u8 {
        self.priority.weight()
    }

    /// Move the task to another column. Returns false when the status is
    /// already `status` (no-op, `updated_at` untouched).
    pub fn update_status(&mut self, status: Status) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.touch();
        true
    }

    /// Replace the description. Trims the input and rejects an empty
    /// result; returns `Ok(false)` when the trimmed text is unchanged.
    pub fn update_description(&mut self, description: &str) -> Result<bool> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyDescription);
        }
        if self.description == trimmed {
            return Ok(false);
        }
        self.description = trimmed.to_string();
        self.touch();
        Ok(true)
    }

    /// Replace the free-text details. Trimmed; empty is allowed.
    pub fn update_detailed_description(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if self.detailed_description == trimmed {
            return false;
        }
        self.detailed_description = trimmed.to_string();
        self.touch();
        true
    }

    pub fn update_urgency_level(&mut self, level: Level) -> bool {
        if self.urgency_level == level {
            return false;
        }
        self.urgency_level = level;
        self.touch();
        true
    }

    pub fn update_priority(&mut self, level: Level) -> bool {
        if self.priority == level {
            return false;
        }
        self.priority = level;
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Time-based id with a random tie-break.
///
/// A ULID packs a millisecond timestamp above 80 bits of entropy; keeping
/// the top 64 bits yields ids that sort by creation time and stay distinct
/// within the same millisecond via the 16 entropy bits that survive.
fn next_task_id() -> TaskId {
    (u128::from(Ulid::new()) >> 64) as TaskId
}

/// Structural check for an imported task record.
///
/// Used as an import filter: a record failing it is skipped (with a
/// warning) instead of aborting the whole import. Required: integer `id`,
/// non-blank string `description`, `status` in the column enum. Optional
/// fields must be absent or well-typed/in-enum.
pub fn is_valid_task_data(value: &serde_json::Value) -> bool {
    let Some(record) = value.as_object() else {
        return false;
    };

    let id_ok = record
        .get("id")
        .map(|v| v.is_i64() || v.is_u64())
        .unwrap_or(false);
    let description_ok = record
        .get("description")
        .and_then(|v| v.as_str())
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);
    let status_ok = record
        .get("status")
        .and_then(|v| v.as_str())
        .map(|s| Status::from_str(s).is_ok())
        .unwrap_or(false);

    let detailed_ok = match record.get("detailedDescription") {
        None => true,
        Some(v) => v.is_string(),
    };
    let level_ok = |key: &str| match record.get(key) {
        None => true,
        Some(v) => v
            .as_str()
            .map(|s| Level::from_str(s).is_ok())
            .unwrap_or(false),
    };

    id_ok && description_ok && status_ok && detailed_ok && level_ok("urgencyLevel") && level_ok("priority")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_trims_and_defaults() {
        let task = Task::new("  Buy milk  ").unwrap();
        assert_eq!(task.description(), "Buy milk");
        assert_eq!(task.status(), Status::Todo);
        assert_eq!(task.urgency_level(), Level::Normal);
        assert_eq!(task.priority(), Level::Normal);
        assert_eq!(task.detailed_description(), "");
        assert!(task.id() > 0);
        assert!(task.updated_at() >= task.created_at());
    }

    #[test]
    fn new_task_rejects_blank_description() {
        let err = Task::new("   ").unwrap_err();
        assert!(matches!(err, Error::EmptyDescription));
    }

    #[test]
    fn ids_differ_between_tasks() {
        let a = Task::new("a").unwrap();
        let b = Task::new("b").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn update_status_same_value_is_noop() {
        let mut task = Task::new("demo").unwrap();
        let before = task.updated_at();
        assert!(!task.update_status(Status::Todo));
        assert_eq!(task.updated_at(), before);
    }

    #[test]
    fn update_status_changes_and_touches() {
        let mut task = Task::new("demo").unwrap();
        assert!(task.update_status(Status::Done));
        assert_eq!(task.status(), Status::Done);
        assert!(task.updated_at() >= task.created_at());
    }

    #[test]
    fn update_description_trims_and_detects_noop() {
        let mut task = Task::new("old").unwrap();
        assert!(task.update_description("  new  ").unwrap());
        assert_eq!(task.description(), "new");
        assert!(!task.update_description("new").unwrap());
    }

    #[test]
    fn update_description_rejects_blank() {
        let mut task = Task::new("old").unwrap();
        let err = task.update_description("  ").unwrap_err();
        assert!(matches!(err, Error::EmptyDescription));
        assert_eq!(task.description(), "old");
    }

    #[test]
    fn detailed_description_allows_empty() {
        let mut task = Task::new("demo").unwrap();
        assert!(task.update_detailed_description("notes"));
        assert_eq!(task.detailed_description(), "notes");
        assert!(task.update_detailed_description(""));
        assert_eq!(task.detailed_description(), "");
    }

    #[test]
    fn priority_weight_maps_levels() {
        let mut task = Task::new("demo").unwrap();
        assert_eq!(task.priority_weight(), 2);
        task.update_priority(Level::Urgente);
        assert_eq!(task.priority_weight(), 3);
        task.update_priority(Level::Baixa);
        assert_eq!(task.priority_weight(), 1);
    }

    #[test]
    fn status_and_level_parse_round_trip() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
        for level in [Level::Baixa, Level::Normal, Level::Urgente] {
            assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
        }
        assert!("doing".parse::<Status>().is_err());
        assert!("alta".parse::<Level>().is_err());
    }

    #[test]
    fn serde_round_trip_preserves_fields() {
        let mut task = Task::new("Buy milk").unwrap();
        task.update_detailed_description("2 liters");
        task.update_urgency_level(Level::Urgente);
        task.update_status(Status::Progress);

        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn snapshot_record_uses_camel_case_keys() {
        let task = Task::new("demo").unwrap();
        let value = serde_json::to_value(&task).unwrap();
        let record = value.as_object().unwrap();
        for key in [
            "id",
            "description",
            "detailedDescription",
            "urgencyLevel",
            "priority",
            "status",
            "createdAt",
            "updatedAt",
        ] {
            assert!(record.contains_key(key), "missing key {key}");
        }
        assert_eq!(record["status"], "todo");
        assert_eq!(record["urgencyLevel"], "normal");
    }

    #[test]
    fn valid_task_data_accepts_minimal_record() {
        let value = serde_json::json!({
            "id": 1,
            "description": "demo",
            "status": "todo",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z",
        });
        assert!(is_valid_task_data(&value));
    }

    #[test]
    fn valid_task_data_rejects_structural_problems() {
        let missing_description = serde_json::json!({ "id": 1, "status": "todo" });
        assert!(!is_valid_task_data(&missing_description));

        let blank_description =
            serde_json::json!({ "id": 1, "description": "  ", "status": "todo" });
        assert!(!is_valid_task_data(&blank_description));

        let string_id = serde_json::json!({ "id": "1", "description": "x", "status": "todo" });
        assert!(!is_valid_task_data(&string_id));

        let bad_status = serde_json::json!({ "id": 1, "description": "x", "status": "doing" });
        assert!(!is_valid_task_data(&bad_status));

        let bad_level = serde_json::json!({
            "id": 1, "description": "x", "status": "todo", "priority": "alta"
        });
        assert!(!is_valid_task_data(&bad_level));

        assert!(!is_valid_task_data(&serde_json::json!([1, 2])));
    }

    #[test]
    fn valid_task_data_tolerates_absent_optionals() {
        let value = serde_json::json!({ "id": 7, "description": "x", "status": "done" });
        assert!(is_valid_task_data(&value));
    }
}
