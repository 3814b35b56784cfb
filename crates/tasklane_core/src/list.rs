use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::TodoItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// The service may omit items on collection reads.
    #[serde(default)]
    pub items: Vec<TodoItem>,
}

impl TodoList {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_wire_shape_without_items() {
        let json = r#"{
            "id": "l1",
            "name": "groceries",
            "createdAt": "2026-01-02T03:04:05Z",
            "updatedAt": "2026-01-02T03:04:05Z"
        }"#;
        let list: TodoList = serde_json::from_str(json).unwrap();
        assert_eq!(list.name, "groceries");
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_list_wire_shape_with_items() {
        let json = r#"{
            "id": "l1",
            "name": "groceries",
            "createdAt": "2026-01-02T03:04:05Z",
            "updatedAt": "2026-01-02T03:04:05Z",
            "items": [{
                "id": "i1",
                "todoListId": "l1",
                "title": "buy milk",
                "status": "Pending",
                "createdAt": "2026-01-02T03:04:05Z",
                "updatedAt": "2026-01-02T03:04:05Z"
            }]
        }"#;
        let list: TodoList = serde_json::from_str(json).unwrap();
        assert_eq!(list.item_count(), 1);
        assert_eq!(list.items[0].id, "i1");
    }
}
