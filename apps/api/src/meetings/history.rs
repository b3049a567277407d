//! Rolling meeting history and the reminders derived from it.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::meeting::{ActionItem, MeetingRecord};

/// Most reminders surfaced at once.
pub const MAX_REMINDERS: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum HistoryError {
    #[error("Meeting {0} not found")]
    MeetingNotFound(Uuid),

    #[error("Meeting {meeting_id} has no action item at index {index}")]
    ActionItemNotFound { meeting_id: Uuid, index: usize },
}

/// Storage seam for meeting history. Newest records come first.
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    async fn recent(&self, limit: usize) -> Vec<MeetingRecord>;

    async fn append(&self, record: MeetingRecord);

    /// Sets `completed` on one action item and returns the updated item.
    async fn mark_complete(
        &self,
        meeting_id: Uuid,
        item_index: usize,
        completed: bool,
    ) -> Result<ActionItem, HistoryError>;
}

/// Process-local history. Lost on restart.
pub struct InMemoryMeetingRepository {
    capacity: usize,
    records: RwLock<VecDeque<MeetingRecord>>,
}

impl InMemoryMeetingRepository {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }
}

#[async_trait]
impl MeetingRepository for InMemoryMeetingRepository {
    async fn recent(&self, limit: usize) -> Vec<MeetingRecord> {
        self.records.read().await.iter().take(limit).cloned().collect()
    }

    async fn append(&self, record: MeetingRecord) {
        let mut records = self.records.write().await;
        records.push_front(record);
        records.truncate(self.capacity);
    }

    async fn mark_complete(
        &self,
        meeting_id: Uuid,
        item_index: usize,
        completed: bool,
    ) -> Result<ActionItem, HistoryError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == meeting_id)
            .ok_or(HistoryError::MeetingNotFound(meeting_id))?;

        let item = record.action_items.get_mut(item_index).ok_or(
            HistoryError::ActionItemNotFound {
                meeting_id,
                index: item_index,
            },
        )?;
        item.completed = completed;
        Ok(item.clone())
    }
}

/// An open action item with a due date, tagged with the meeting it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub meeting_id: Uuid,
    pub meeting_title: String,
    pub meeting_date: DateTime<Utc>,
    /// Position in the meeting's `actionItems`, for the toggle endpoint.
    pub item_index: usize,
    #[serde(flatten)]
    pub item: ActionItem,
}

/// Open items that have a `due` value, high priority first.
/// Order within a priority follows the history order (newest meeting first).
pub fn upcoming_reminders(records: &[MeetingRecord], limit: usize) -> Vec<Reminder> {
    let mut reminders: Vec<Reminder> = records
        .iter()
        .flat_map(|record| {
            record
                .action_items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.due.is_some() && !item.completed)
                .map(move |(index, item)| Reminder {
                    meeting_id: record.id,
                    meeting_title: record.title.clone(),
                    meeting_date: record.date,
                    item_index: index,
                    item: item.clone(),
                })
        })
        .collect();

    // sort_by_key is stable
    reminders.sort_by_key(|reminder| reminder.item.priority_rank());
    reminders.truncate(limit.min(MAX_REMINDERS));
    reminders
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn item(text: &str, priority: Option<&str>, due: Option<&str>) -> ActionItem {
        ActionItem {
            text: text.to_string(),
            priority: priority.map(str::to_string),
            due: due.map(str::to_string),
            owner: None,
            completed: false,
        }
    }

    fn record(title: &str, items: Vec<ActionItem>) -> MeetingRecord {
        let mut record = MeetingRecord::from_extraction(title, &Map::new(), "manual");
        record.action_items = items;
        record
    }

    #[tokio::test]
    async fn test_append_keeps_newest_first_within_capacity() {
        let repo = InMemoryMeetingRepository::new(3);
        for n in 0..5 {
            repo.append(record(&format!("Meeting {n}"), Vec::new())).await;
        }

        let titles: Vec<String> = repo.recent(10).await.into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Meeting 4", "Meeting 3", "Meeting 2"]);
        assert_eq!(repo.recent(1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_clamped() {
        let repo = InMemoryMeetingRepository::new(0);
        repo.append(record("Only", Vec::new())).await;
        assert_eq!(repo.recent(10).await.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_complete_updates_item() {
        let repo = InMemoryMeetingRepository::new(10);
        let meeting = record("Sync", vec![item("Draft README", None, Some("Friday"))]);
        let id = meeting.id;
        repo.append(meeting).await;

        let updated = repo.mark_complete(id, 0, true).await.unwrap();
        assert!(updated.completed);
        assert!(repo.recent(1).await[0].action_items[0].completed);

        let reopened = repo.mark_complete(id, 0, false).await.unwrap();
        assert!(!reopened.completed);
    }

    #[tokio::test]
    async fn test_mark_complete_unknown_targets() {
        let repo = InMemoryMeetingRepository::new(10);
        let meeting = record("Sync", vec![item("One", None, None)]);
        let id = meeting.id;
        repo.append(meeting).await;

        let missing = Uuid::new_v4();
        assert_eq!(
            repo.mark_complete(missing, 0, true).await,
            Err(HistoryError::MeetingNotFound(missing))
        );
        assert_eq!(
            repo.mark_complete(id, 3, true).await,
            Err(HistoryError::ActionItemNotFound { meeting_id: id, index: 3 })
        );
    }

    #[test]
    fn test_reminders_filter_and_order() {
        let mut done = item("Already done", Some("high"), Some("Today"));
        done.completed = true;

        let newer = record(
            "Newer",
            vec![
                item("Low one", Some("low"), Some("Next month")),
                item("No due date", Some("high"), None),
                item("Unranked", None, Some("This week")),
                done,
            ],
        );
        let older = record(
            "Older",
            vec![
                item("Urgent", Some("high"), Some("Tomorrow")),
                item("Medium", Some("medium"), Some("Soon")),
            ],
        );

        let reminders = upcoming_reminders(&[newer, older], 10);
        let texts: Vec<&str> = reminders.iter().map(|r| r.item.text.as_str()).collect();
        assert_eq!(texts, vec!["Urgent", "Unranked", "Medium", "Low one"]);
        assert_eq!(reminders[0].meeting_title, "Older");
        assert_eq!(reminders[1].item_index, 2);
    }

    #[test]
    fn test_reminders_are_capped() {
        let items = (0..8)
            .map(|n| item(&format!("Task {n}"), Some("medium"), Some("Soon")))
            .collect();
        let reminders = upcoming_reminders(&[record("Busy", items)], 100);
        assert_eq!(reminders.len(), MAX_REMINDERS);
        assert_eq!(reminders[0].item.text, "Task 0");
    }

    #[test]
    fn test_reminder_serializes_flat() {
        let meeting = record("Sync", vec![item("Ship it", Some("high"), Some("Friday"))]);
        let reminders = upcoming_reminders(&[meeting], 5);
        let value = serde_json::to_value(&reminders[0]).unwrap();
        assert_eq!(value["text"], json!("Ship it"));
        assert_eq!(value["meetingTitle"], json!("Sync"));
        assert_eq!(value["itemIndex"], json!(0));
        assert_eq!(value["completed"], json!(false));
    }
}
