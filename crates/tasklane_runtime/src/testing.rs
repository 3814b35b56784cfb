//! Scripted fakes for runtime tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tasklane_client::{
    CompleteAllResponse, CreateItemRequest, CreateListRequest, Error, Result, TodoApi,
    UpdateItemRequest, UpdateListRequest,
};
use tasklane_core::{ItemStatus, JobProgress, JobResult, JobState, JobStatus, TodoItem, TodoList};

use crate::cache::CacheInvalidation;

#[derive(Clone)]
enum Scripted {
    Status(JobStatus),
    Error(u16),
}

/// A `TodoApi` whose `job_status` answers follow a prepared script, with
/// call/overlap accounting for the scheduler properties.
pub(crate) struct ScriptedApi {
    script: Mutex<VecDeque<Scripted>>,
    repeat: Option<Scripted>,
    fetch_delay: Duration,
    status_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    complete_all: Option<std::result::Result<String, u16>>,
    complete_all_calls: AtomicUsize,
    lists: Vec<TodoList>,
    items: HashMap<String, Vec<TodoItem>>,
    list_calls: AtomicUsize,
    item_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            repeat: None,
            fetch_delay: Duration::ZERO,
            status_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            complete_all: None,
            complete_all_calls: AtomicUsize::new(0),
            lists: Vec::new(),
            items: HashMap::new(),
            list_calls: AtomicUsize::new(0),
            item_calls: AtomicUsize::new(0),
        }
    }

    fn push(self, entry: Scripted) -> Self {
        self.script.lock().unwrap().push_back(entry);
        self
    }

    pub fn push_running(self, percent: u8) -> Self {
        self.push(Scripted::Status(JobStatus {
            state: JobState::Running,
            progress: Some(JobProgress::Percent(percent)),
            result: None,
        }))
    }

    pub fn push_running_fraction(self, current: u64, total: u64) -> Self {
        self.push(Scripted::Status(JobStatus {
            state: JobState::Running,
            progress: Some(JobProgress::Fraction { current, total }),
            result: None,
        }))
    }

    pub fn push_completed(self, completed: Option<u64>) -> Self {
        self.push(Scripted::Status(JobStatus {
            state: JobState::Completed,
            progress: None,
            result: Some(JobResult { completed }),
        }))
    }

    pub fn push_failed(self) -> Self {
        self.push(Scripted::Status(JobStatus {
            state: JobState::Failed,
            progress: None,
            result: None,
        }))
    }

    pub fn push_status_error(self, status: u16) -> Self {
        self.push(Scripted::Error(status))
    }

    pub fn repeat_running(mut self, percent: u8) -> Self {
        self.repeat = Some(Scripted::Status(JobStatus {
            state: JobState::Running,
            progress: Some(JobProgress::Percent(percent)),
            result: None,
        }));
        self
    }

    pub fn repeat_status_error(mut self, status: u16) -> Self {
        self.repeat = Some(Scripted::Error(status));
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn with_complete_all(mut self, status_location: &str) -> Self {
        self.complete_all = Some(Ok(status_location.to_string()));
        self
    }

    pub fn with_complete_all_error(mut self, status: u16) -> Self {
        self.complete_all = Some(Err(status));
        self
    }

    pub fn with_lists(mut self, lists: Vec<TodoList>) -> Self {
        self.lists = lists;
        self
    }

    pub fn with_items(mut self, list_id: &str, items: Vec<TodoItem>) -> Self {
        self.items.insert(list_id.to_string(), items);
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn complete_all_calls(&self) -> usize {
        self.complete_all_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn item_calls(&self) -> usize {
        self.item_calls.load(Ordering::SeqCst)
    }

    fn api_error(operation: &str, status: u16) -> Error {
        Error::Api {
            operation: operation.to_string(),
            status,
            body: String::new(),
        }
    }
}

#[async_trait]
impl TodoApi for ScriptedApi {
    async fn list_lists(&self) -> Result<Vec<TodoList>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lists.clone())
    }

    async fn get_list(&self, list_id: &str) -> Result<TodoList> {
        self.lists
            .iter()
            .find(|l| l.id == list_id)
            .cloned()
            .ok_or_else(|| Self::api_error("fetch list", 404))
    }

    async fn create_list(&self, _request: CreateListRequest) -> Result<TodoList> {
        unimplemented!("not scripted")
    }

    async fn update_list(&self, _list_id: &str, _request: UpdateListRequest) -> Result<TodoList> {
        unimplemented!("not scripted")
    }

    async fn delete_list(&self, _list_id: &str) -> Result<()> {
        unimplemented!("not scripted")
    }

    async fn list_items(&self, list_id: &str) -> Result<Vec<TodoItem>> {
        self.item_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.get(list_id).cloned().unwrap_or_default())
    }

    async fn create_item(&self, _list_id: &str, _request: CreateItemRequest) -> Result<TodoItem> {
        unimplemented!("not scripted")
    }

    async fn update_item(
        &self,
        _list_id: &str,
        _item_id: &str,
        _request: UpdateItemRequest,
    ) -> Result<TodoItem> {
        unimplemented!("not scripted")
    }

    async fn delete_item(&self, _list_id: &str, _item_id: &str) -> Result<()> {
        unimplemented!("not scripted")
    }

    async fn complete_all(&self, _list_id: &str) -> Result<CompleteAllResponse> {
        self.complete_all_calls.fetch_add(1, Ordering::SeqCst);
        match &self.complete_all {
            Some(Ok(location)) => Ok(CompleteAllResponse {
                status_url: location.clone(),
            }),
            Some(Err(status)) => Err(Self::api_error("start bulk completion", *status)),
            None => Err(Self::api_error("start bulk completion", 501)),
        }
    }

    async fn job_status(&self, _status_location: &str) -> Result<JobStatus> {
        let n = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(n, Ordering::SeqCst);
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.repeat.clone());
        match next {
            Some(Scripted::Status(status)) => Ok(status),
            Some(Scripted::Error(status)) => Err(Self::api_error("fetch job status", status)),
            None => Err(Self::api_error("fetch job status", 410)),
        }
    }
}

/// Records invalidations for tracker assertions.
#[derive(Default)]
pub(crate) struct RecordingCache {
    pub items_invalidated: Mutex<Vec<String>>,
    pub lists_invalidated: AtomicUsize,
}

impl RecordingCache {
    pub fn items_invalidated(&self) -> Vec<String> {
        self.items_invalidated
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn lists_invalidated(&self) -> usize {
        self.lists_invalidated.load(Ordering::SeqCst)
    }
}

impl CacheInvalidation for RecordingCache {
    fn invalidate_items(&self, list_id: &str) {
        self.items_invalidated
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(list_id.to_string());
    }

    fn invalidate_lists(&self) {
        self.lists_invalidated.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) fn make_item(id: &str, list_id: &str, status: ItemStatus) -> TodoItem {
    TodoItem {
        id: id.to_string(),
        todo_list_id: list_id.to_string(),
        title: format!("item {}", id),
        description: None,
        status,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

pub(crate) fn make_list(id: &str, name: &str) -> TodoList {
    TodoList {
        id: id.to_string(),
        name: name.to_string(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
        items: Vec::new(),
    }
}
