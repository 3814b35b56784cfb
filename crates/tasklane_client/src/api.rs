//! The `TodoApi` trait — everything the runtime needs from the service.

use async_trait::async_trait;
use tasklane_core::{JobStatus, TodoItem, TodoList};

use crate::error::Result;
use crate::types::{
    CompleteAllResponse, CreateItemRequest, CreateListRequest, UpdateItemRequest,
    UpdateListRequest,
};

#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list_lists(&self) -> Result<Vec<TodoList>>;

    async fn get_list(&self, list_id: &str) -> Result<TodoList>;

    async fn create_list(&self, request: CreateListRequest) -> Result<TodoList>;

    async fn update_list(&self, list_id: &str, request: UpdateListRequest) -> Result<TodoList>;

    async fn delete_list(&self, list_id: &str) -> Result<()>;

    async fn list_items(&self, list_id: &str) -> Result<Vec<TodoItem>>;

    async fn create_item(&self, list_id: &str, request: CreateItemRequest) -> Result<TodoItem>;

    async fn update_item(
        &self,
        list_id: &str,
        item_id: &str,
        request: UpdateItemRequest,
    ) -> Result<TodoItem>;

    async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<()>;

    /// Starts the server-side bulk completion job for a list. The returned
    /// status location is the only handle to the job.
    async fn complete_all(&self, list_id: &str) -> Result<CompleteAllResponse>;

    /// One status fetch. No retry here; the poller owns the retry policy.
    async fn job_status(&self, status_location: &str) -> Result<JobStatus>;
}
