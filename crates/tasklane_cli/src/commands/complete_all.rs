//! `tasklane complete-all` — start the bulk job and watch it to the end.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use tasklane_core::item;
use tasklane_runtime::{
    CacheInvalidation, DbStore, JobRegistry, JobTracker, ListCache,
};

use crate::commands::watch::watch_to_completion;
use crate::output;

pub async fn handle(base_url: Option<String>, list_id: &str, yes: bool) -> Result<()> {
    let config = super::runtime_config(base_url);
    let api = super::client(&config);

    let items = api.list_items(list_id).await?;
    let pending = item::pending_count(&items);
    if pending == 0 {
        output::dim("Nothing to do: the list has no pending items.");
        return Ok(());
    }

    let confirmed = yes
        || output::confirm(&format!(
            "Complete all {} pending items? This cannot be undone.",
            pending
        ))?;
    if !confirmed {
        output::dim("Aborted.");
        return Ok(());
    }

    let registry = JobRegistry::open(Box::new(DbStore::new(config.data_dir.clone())));
    let cache: Arc<dyn CacheInvalidation> = Arc::new(ListCache::new());
    let (event_tx, event_rx) = mpsc::channel(16);
    let (mut tracker, outcomes) =
        JobTracker::new(&config, Arc::clone(&api), registry, cache, event_tx);

    if !tracker.start_job(list_id, pending, confirmed).await? {
        return Ok(());
    }
    watch_to_completion(tracker, outcomes, event_rx).await
}
