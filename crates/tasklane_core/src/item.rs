use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Item status as the service serializes it ("Pending"/"Completed").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub todo_list_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoItem {
    pub fn is_pending(&self) -> bool {
        self.status == ItemStatus::Pending
    }
}

/// Number of items still Pending.
pub fn pending_count(items: &[TodoItem]) -> u64 {
    items.iter().filter(|i| i.is_pending()).count() as u64
}

/// Number of items already Completed.
pub fn completed_count(items: &[TodoItem]) -> u64 {
    items.iter().filter(|i| !i.is_pending()).count() as u64
}
