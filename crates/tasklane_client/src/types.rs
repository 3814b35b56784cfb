//! Request/response bodies for the todo service (camelCase on the wire).

use serde::{Deserialize, Serialize};
use tasklane_core::ItemStatus;

#[derive(Debug, Clone, Serialize)]
pub struct CreateListRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateItemRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ItemStatus,
}

impl CreateItemRequest {
    /// New item with the service default status (Pending).
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            status: ItemStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

impl UpdateItemRequest {
    pub fn status(status: ItemStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Returned by the complete-all call. `status_url` is the opaque location to
/// poll for job progress.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteAllResponse {
    pub status_url: String,
}
