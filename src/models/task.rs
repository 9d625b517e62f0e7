use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

/// A task as stored and as returned by the API.
///
/// Title and description lengths (5 to 30 and up to 100 chars) are intended
/// limits, not enforced ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    #[serde(rename = "task_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owning user; cascade-deleted with the owner.
    pub user_id: Uuid,
}

/// Create/update body for a task.
///
/// An empty or absent field means "leave unchanged" on update; there is no
/// way to clear a field to empty. `deadline` is a bare `YYYY-MM-DD` date.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deadline: String,
}

impl Task {
    /// Builds a fresh task for `user_id`. Fails if the deadline date does not
    /// parse.
    pub fn new(payload: TaskPayload, user_id: Uuid) -> Result<Self, ApiError> {
        let deadline = parse_deadline(&payload.deadline)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title: payload.title,
            description: payload.description,
            deadline,
            created_at: now,
            updated_at: now,
            user_id,
        })
    }

    /// Partial merge: each non-empty payload field overwrites the stored one.
    /// `updated_at` moves only if something actually changed, so an all-empty
    /// payload is a no-op.
    pub fn apply(&mut self, payload: &TaskPayload) -> Result<(), ApiError> {
        let mut changed = false;

        if !payload.title.is_empty() {
            self.title = payload.title.clone();
            changed = true;
        }
        if !payload.description.is_empty() {
            self.description = payload.description.clone();
            changed = true;
        }
        if !payload.deadline.is_empty() {
            self.deadline = parse_deadline(&payload.deadline)?;
            changed = true;
        }

        if changed {
            self.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// Expands a bare `YYYY-MM-DD` date to an absolute UTC timestamp.
///
/// Deadlines carry no time of day in the API; the server pins them to 23:59
/// UTC of the given date.
fn parse_deadline(date: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(&format!("{}T23:59:00Z", date))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            ApiError::BadRequest(format!("invalid deadline {:?}, expected YYYY-MM-DD", date))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn payload(title: &str, description: &str, deadline: &str) -> TaskPayload {
        TaskPayload {
            title: title.to_string(),
            description: description.to_string(),
            deadline: deadline.to_string(),
        }
    }

    #[test]
    fn test_new_task_normalizes_deadline_to_end_of_day() {
        let task = Task::new(
            payload("Buy groceries", "milk, eggs", "2025-06-01"),
            Uuid::new_v4(),
        )
        .unwrap();
        assert_eq!(task.deadline.to_rfc3339(), "2025-06-01T23:59:00+00:00");
    }

    #[test]
    fn test_new_task_rejects_bad_deadline() {
        let result = Task::new(payload("Title", "", "01-06-2025"), Uuid::new_v4());
        assert!(matches!(result, Err(ApiError::BadRequest(_))));

        let result = Task::new(payload("Title", "", ""), Uuid::new_v4());
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_apply_overwrites_only_populated_fields() {
        let mut task = Task::new(
            payload("Original title", "original description", "2025-06-01"),
            Uuid::new_v4(),
        )
        .unwrap();

        task.apply(&payload("New title", "", "")).unwrap();

        assert_eq!(task.title, "New title");
        assert_eq!(task.description, "original description");
        assert_eq!(task.deadline.to_rfc3339(), "2025-06-01T23:59:00+00:00");
    }

    #[test]
    fn test_apply_all_empty_is_a_noop() {
        let mut task = Task::new(
            payload("Title", "description", "2025-06-01"),
            Uuid::new_v4(),
        )
        .unwrap();
        let snapshot = task.clone();

        task.apply(&TaskPayload::default()).unwrap();

        assert_eq!(task, snapshot);
    }

    #[test]
    fn test_apply_bad_deadline_leaves_task_deadline() {
        let mut task = Task::new(payload("Title", "", "2025-06-01"), Uuid::new_v4()).unwrap();
        let before = task.deadline;

        let result = task.apply(&payload("", "", "tomorrow"));

        assert!(result.is_err());
        assert_eq!(task.deadline, before);
    }

    #[test]
    fn test_task_serializes_id_as_task_id() {
        let task = Task::new(payload("Title", "", "2025-06-01"), Uuid::new_v4()).unwrap();
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("task_id").is_some());
        assert!(value.get("id").is_none());
    }
}
