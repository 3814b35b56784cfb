//! Read-through cache for lists and items with key-based invalidation.
//!
//! The tracker only depends on [`CacheInvalidation`]; screens read through the
//! accessors and every mutation or settled job drops the affected keys.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tasklane_client::{Result, TodoApi};
use tasklane_core::{TodoItem, TodoList};
use tracing::debug;

/// The two invalidation operations the job lifecycle needs.
pub trait CacheInvalidation: Send + Sync {
    /// Drop cached items for one list.
    fn invalidate_items(&self, list_id: &str);
    /// Drop the cached lists collection.
    fn invalidate_lists(&self);
}

#[derive(Default)]
pub struct ListCache {
    lists: Mutex<Option<Vec<TodoList>>>,
    items: Mutex<HashMap<String, Vec<TodoItem>>>,
}

impl ListCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lists_guard(&self) -> MutexGuard<'_, Option<Vec<TodoList>>> {
        self.lists.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn items_guard(&self) -> MutexGuard<'_, HashMap<String, Vec<TodoItem>>> {
        self.items.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// All lists, fetched once and served from cache until invalidated.
    pub async fn lists(&self, api: &dyn TodoApi) -> Result<Vec<TodoList>> {
        if let Some(cached) = self.lists_guard().clone() {
            return Ok(cached);
        }
        let fetched = api.list_lists().await?;
        *self.lists_guard() = Some(fetched.clone());
        Ok(fetched)
    }

    /// Items of one list, fetched once and served from cache until invalidated.
    pub async fn items(&self, api: &dyn TodoApi, list_id: &str) -> Result<Vec<TodoItem>> {
        if let Some(cached) = self.items_guard().get(list_id).cloned() {
            return Ok(cached);
        }
        let fetched = api.list_items(list_id).await?;
        self.items_guard()
            .insert(list_id.to_string(), fetched.clone());
        Ok(fetched)
    }
}

impl CacheInvalidation for ListCache {
    fn invalidate_items(&self, list_id: &str) {
        if self.items_guard().remove(list_id).is_some() {
            debug!(list_id, "cached items invalidated");
        }
    }

    fn invalidate_lists(&self) {
        *self.lists_guard() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{make_item, make_list, ScriptedApi};
    use std::sync::Arc;
    use tasklane_core::ItemStatus;

    #[tokio::test]
    async fn test_items_are_fetched_once() {
        let api = Arc::new(ScriptedApi::new().with_items(
            "l1",
            vec![make_item("i1", "l1", ItemStatus::Pending)],
        ));
        let cache = ListCache::new();

        let first = cache.items(api.as_ref(), "l1").await.unwrap();
        let second = cache.items(api.as_ref(), "l1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(api.item_calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_items_forces_refetch() {
        let api = Arc::new(ScriptedApi::new().with_items(
            "l1",
            vec![make_item("i1", "l1", ItemStatus::Pending)],
        ));
        let cache = ListCache::new();

        cache.items(api.as_ref(), "l1").await.unwrap();
        cache.invalidate_items("l1");
        cache.items(api.as_ref(), "l1").await.unwrap();

        assert_eq!(api.item_calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidation_is_per_list() {
        let api = Arc::new(
            ScriptedApi::new()
                .with_items("l1", vec![make_item("i1", "l1", ItemStatus::Pending)])
                .with_items("l2", vec![make_item("i2", "l2", ItemStatus::Completed)]),
        );
        let cache = ListCache::new();

        cache.items(api.as_ref(), "l1").await.unwrap();
        cache.items(api.as_ref(), "l2").await.unwrap();
        cache.invalidate_items("l1");
        cache.items(api.as_ref(), "l1").await.unwrap();
        cache.items(api.as_ref(), "l2").await.unwrap();

        assert_eq!(api.item_calls(), 3);
    }

    #[tokio::test]
    async fn test_lists_cache_and_invalidate() {
        let api = Arc::new(ScriptedApi::new().with_lists(vec![make_list("l1", "groceries")]));
        let cache = ListCache::new();

        cache.lists(api.as_ref()).await.unwrap();
        cache.lists(api.as_ref()).await.unwrap();
        assert_eq!(api.list_calls(), 1);

        cache.invalidate_lists();
        let lists = cache.lists(api.as_ref()).await.unwrap();
        assert_eq!(lists[0].name, "groceries");
        assert_eq!(api.list_calls(), 2);
    }
}
