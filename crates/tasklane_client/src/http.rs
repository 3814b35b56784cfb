//! reqwest-backed implementation of [`TodoApi`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use tasklane_core::{JobStatus, TodoItem, TodoList};

use crate::api::TodoApi;
use crate::error::{Error, Result};
use crate::types::{
    CompleteAllResponse, CreateItemRequest, CreateListRequest, UpdateItemRequest,
    UpdateListRequest,
};

pub struct HttpTodoClient {
    base_url: String,
    client: Client,
}

impl HttpTodoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Status locations come back from the service as either absolute URLs or
    /// paths relative to the API root.
    fn status_url(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else if location.starts_with('/') {
            format!("{}{}", self.base_url, location)
        } else {
            format!("{}/{}", self.base_url, location)
        }
    }

    async fn check(operation: &str, response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(Error::api(operation, status, body))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        url: String,
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(operation, e))?;
        Self::check(operation, response)
            .await?
            .json()
            .await
            .map_err(|e| Error::transport(operation, e))
    }
}

#[async_trait]
impl TodoApi for HttpTodoClient {
    async fn list_lists(&self) -> Result<Vec<TodoList>> {
        self.get_json("fetch lists", self.url("/todoLists")).await
    }

    async fn get_list(&self, list_id: &str) -> Result<TodoList> {
        self.get_json("fetch list", self.url(&format!("/todoLists/{}", list_id)))
            .await
    }

    async fn create_list(&self, request: CreateListRequest) -> Result<TodoList> {
        const OP: &str = "create list";
        let response = self
            .client
            .post(self.url("/todoLists"))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::transport(OP, e))?;
        Self::check(OP, response)
            .await?
            .json()
            .await
            .map_err(|e| Error::transport(OP, e))
    }

    async fn update_list(&self, list_id: &str, request: UpdateListRequest) -> Result<TodoList> {
        const OP: &str = "rename list";
        let response = self
            .client
            .put(self.url(&format!("/todoLists/{}", list_id)))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::transport(OP, e))?;
        Self::check(OP, response)
            .await?
            .json()
            .await
            .map_err(|e| Error::transport(OP, e))
    }

    async fn delete_list(&self, list_id: &str) -> Result<()> {
        const OP: &str = "delete list";
        let response = self
            .client
            .delete(self.url(&format!("/todoLists/{}", list_id)))
            .send()
            .await
            .map_err(|e| Error::transport(OP, e))?;
        Self::check(OP, response).await?;
        Ok(())
    }

    async fn list_items(&self, list_id: &str) -> Result<Vec<TodoItem>> {
        self.get_json(
            "fetch items",
            self.url(&format!("/todoLists/{}/items", list_id)),
        )
        .await
    }

    async fn create_item(&self, list_id: &str, request: CreateItemRequest) -> Result<TodoItem> {
        const OP: &str = "create item";
        let response = self
            .client
            .post(self.url(&format!("/todoLists/{}/items", list_id)))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::transport(OP, e))?;
        Self::check(OP, response)
            .await?
            .json()
            .await
            .map_err(|e| Error::transport(OP, e))
    }

    async fn update_item(
        &self,
        list_id: &str,
        item_id: &str,
        request: UpdateItemRequest,
    ) -> Result<TodoItem> {
        const OP: &str = "update item";
        let response = self
            .client
            .put(self.url(&format!("/todoLists/{}/items/{}", list_id, item_id)))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::transport(OP, e))?;
        Self::check(OP, response)
            .await?
            .json()
            .await
            .map_err(|e| Error::transport(OP, e))
    }

    async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<()> {
        const OP: &str = "delete item";
        let response = self
            .client
            .delete(self.url(&format!("/todoLists/{}/items/{}", list_id, item_id)))
            .send()
            .await
            .map_err(|e| Error::transport(OP, e))?;
        Self::check(OP, response).await?;
        Ok(())
    }

    async fn complete_all(&self, list_id: &str) -> Result<CompleteAllResponse> {
        const OP: &str = "start bulk completion";
        let response = self
            .client
            .post(self.url(&format!("/todoLists/{}/items/complete-all", list_id)))
            .send()
            .await
            .map_err(|e| Error::transport(OP, e))?;
        Self::check(OP, response)
            .await?
            .json()
            .await
            .map_err(|e| Error::transport(OP, e))
    }

    async fn job_status(&self, status_location: &str) -> Result<JobStatus> {
        self.get_json("fetch job status", self.status_url(status_location))
            .await
    }
}
