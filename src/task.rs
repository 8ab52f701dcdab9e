//! Task record and its storage representation.
//!
//! A task is a flat record: title, free-text description, priority, optional
//! due date and time, category, and a completion flag. The serialized layout
//! keeps the field names and string forms of the original storage format
//! (`text`/`desc`/`priority`/`date`/`time`/`category`/`completed`), with
//! absent date/time written as empty strings so every persisted record
//! carries all seven fields.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::fields::{Category, Priority};

/// One to-do item with its metadata. The in-memory collection is an ordered
/// `Vec<Task>`; insertion order is the sole ordering and survives save/load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "text")]
    pub title: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub priority: Priority,
    #[serde(rename = "date", with = "opt_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "time", with = "opt_time")]
    pub due_time: Option<NaiveTime>,
    pub category: Category,
    pub completed: bool,
}

/// Field values for creating or editing a task. `completed` is not part of
/// a draft: creation always starts at false and an edit never touches it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub category: Category,
}

impl TaskDraft {
    /// Snapshot the editable attributes of an existing task.
    pub fn from_task(task: &Task) -> Self {
        TaskDraft {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date,
            due_time: task.due_time,
            category: task.category,
        }
    }
}

/// Format a due date/time pair for display ("2024-06-01 09:30", "2024-06-01",
/// or "-").
pub fn format_due(date: Option<NaiveDate>, time: Option<NaiveTime>) -> String {
    match (date, time) {
        (Some(d), Some(t)) => format!("{} {}", d.format("%Y-%m-%d"), t.format("%H:%M")),
        (Some(d), None) => d.format("%Y-%m-%d").to_string(),
        (None, Some(t)) => t.format("%H:%M").to_string(),
        (None, None) => "-".into(),
    }
}

/// `Option<NaiveDate>` as "YYYY-MM-DD", with `None` as the empty string.
/// A non-empty unparseable value is a deserialization error, which makes the
/// whole stored collection count as malformed.
mod opt_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(de::Error::custom)
    }
}

/// `Option<NaiveTime>` as "HH:MM", with `None` as the empty string. Reads
/// also accept "HH:MM:SS", which time inputs sometimes produce.
mod opt_time {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(t) => s.serialize_str(&t.format("%H:%M").to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map(Some)
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Task {
        Task {
            title: "Write report".into(),
            description: "Quarterly numbers".into(),
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            due_time: NaiveTime::from_hms_opt(9, 30, 0),
            category: Category::Work,
            completed: false,
        }
    }

    #[test]
    fn serializes_to_storage_layout() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "text": "Write report",
                "desc": "Quarterly numbers",
                "priority": "high",
                "date": "2024-06-01",
                "time": "09:30",
                "category": "Work",
                "completed": false
            })
        );
    }

    #[test]
    fn absent_date_and_time_serialize_as_empty_strings() {
        let mut task = sample();
        task.due_date = None;
        task.due_time = None;
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["date"], "");
        assert_eq!(value["time"], "");
        let back: Task = serde_json::from_value(value).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let task = sample();
        let encoded = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&encoded).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn seconds_in_time_are_accepted_on_read() {
        let raw = json!({
            "text": "t", "desc": "", "priority": "low",
            "date": "", "time": "14:05:30",
            "category": "Personal", "completed": true
        });
        let task: Task = serde_json::from_value(raw).unwrap();
        assert_eq!(task.due_time, NaiveTime::from_hms_opt(14, 5, 30));
    }

    #[test]
    fn unparseable_date_fails_deserialization() {
        let raw = json!({
            "text": "t", "desc": "", "priority": "low",
            "date": "not-a-date", "time": "",
            "category": "Work", "completed": false
        });
        assert!(serde_json::from_value::<Task>(raw).is_err());
    }
}
