use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Title used when neither the caller nor the upload supplied one.
pub const DEFAULT_MEETING_TITLE: &str = "Recent conversation";

/// A follow-up task pulled out of a meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub text: String,
    /// "high" | "medium" | "low". Anything else sorts as medium.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Free text from the model ("This week", "Before next session").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl ActionItem {
    /// Lenient conversion from model output. A bare string becomes the item
    /// text; an object needs a non-empty `text` (or `task` / `action`).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) if !text.trim().is_empty() => Some(ActionItem {
                text: text.trim().to_string(),
                priority: None,
                due: None,
                owner: None,
                completed: false,
            }),
            Value::Object(item) => {
                let text = ["text", "task", "action"]
                    .iter()
                    .find_map(|key| item.get(*key).and_then(Value::as_str))
                    .map(str::trim)
                    .filter(|t| !t.is_empty())?;

                Some(ActionItem {
                    text: text.to_string(),
                    priority: string_field(item, "priority").map(|p| p.to_lowercase()),
                    due: string_field(item, "due"),
                    owner: string_field(item, "owner"),
                    completed: item
                        .get("completed")
                        .and_then(Value::as_bool)
                        .unwrap_or(false),
                })
            }
            _ => None,
        }
    }

    /// Sort key: high → 0, medium (or unknown) → 1, low → 2.
    pub fn priority_rank(&self) -> u8 {
        match self.priority.as_deref() {
            Some("high") => 0,
            Some("low") => 2,
            _ => 1,
        }
    }
}

/// One extracted meeting as kept in the rolling history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRecord {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub summary: Option<String>,
    pub highlights: Vec<Value>,
    pub action_items: Vec<ActionItem>,
    /// "manual", "webhook", or the integration that pushed the notes.
    pub source: String,
}

impl MeetingRecord {
    pub fn from_extraction(title: &str, extraction: &Map<String, Value>, source: &str) -> Self {
        let action_items = extraction
            .get("actionItems")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(ActionItem::from_value).collect())
            .unwrap_or_default();

        MeetingRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            date: Utc::now(),
            summary: extraction
                .get("summary")
                .and_then(Value::as_str)
                .map(str::to_string),
            highlights: extraction
                .get("highlights")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            action_items,
            source: source.to_string(),
        }
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_item_from_object() {
        let item = ActionItem::from_value(&json!({
            "text": " Send portfolio link ",
            "priority": "HIGH",
            "due": "This week",
            "owner": ""
        }))
        .unwrap();
        assert_eq!(item.text, "Send portfolio link");
        assert_eq!(item.priority.as_deref(), Some("high"));
        assert_eq!(item.due.as_deref(), Some("This week"));
        assert!(item.owner.is_none());
        assert!(!item.completed);
        assert_eq!(item.priority_rank(), 0);
    }

    #[test]
    fn test_action_item_from_string_and_alternate_keys() {
        let from_string = ActionItem::from_value(&json!("Book a follow-up call")).unwrap();
        assert_eq!(from_string.text, "Book a follow-up call");
        assert_eq!(from_string.priority_rank(), 1);

        let from_task = ActionItem::from_value(&json!({"task": "Draft resume"})).unwrap();
        assert_eq!(from_task.text, "Draft resume");
    }

    #[test]
    fn test_action_item_rejects_empty_or_odd_values() {
        assert!(ActionItem::from_value(&json!({"priority": "low"})).is_none());
        assert!(ActionItem::from_value(&json!("  ")).is_none());
        assert!(ActionItem::from_value(&json!(42)).is_none());
    }

    #[test]
    fn test_meeting_record_from_extraction() {
        let extraction = json!({
            "summary": "Talked through the SQL project.",
            "highlights": ["Mentor liked the dashboard"],
            "actionItems": [
                {"text": "Add a README", "priority": "medium"},
                {"note": "no text here"},
                "Share the repo"
            ]
        });
        let record = MeetingRecord::from_extraction(
            "Mentor session",
            extraction.as_object().unwrap(),
            "manual",
        );

        assert_eq!(record.title, "Mentor session");
        assert_eq!(record.summary.as_deref(), Some("Talked through the SQL project."));
        assert_eq!(record.highlights.len(), 1);
        assert_eq!(record.action_items.len(), 2);
        assert_eq!(record.action_items[1].text, "Share the repo");
        assert_eq!(record.source, "manual");
    }

    #[test]
    fn test_meeting_record_serializes_camel_case() {
        let record = MeetingRecord::from_extraction("Sync", &Map::new(), "webhook");
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("actionItems").is_some());
        assert_eq!(value["summary"], Value::Null);
    }
}
