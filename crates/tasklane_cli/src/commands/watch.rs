//! `tasklane watch` — resume polling a registered bulk job.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use tasklane_core::JobEvent;
use tasklane_runtime::{
    CacheInvalidation, DbStore, JobRegistry, JobTracker, ListCache, PollOutcome,
};

use crate::output;

pub async fn handle(base_url: Option<String>, list_id: &str) -> Result<()> {
    let config = super::runtime_config(base_url);
    let api = super::client(&config);

    let registry = JobRegistry::open(Box::new(DbStore::new(config.data_dir.clone())));
    let cache: Arc<dyn CacheInvalidation> = Arc::new(ListCache::new());
    let (event_tx, event_rx) = mpsc::channel(16);
    let (mut tracker, outcomes) =
        JobTracker::new(&config, Arc::clone(&api), registry, cache, event_tx);

    if !tracker.resume_on_load(list_id).await? {
        output::dim("No resumable job for this list.");
        return Ok(());
    }
    watch_to_completion(tracker, outcomes, event_rx).await
}

/// Drive an already-polling tracker to its terminal state, rendering live
/// progress, then print the outcome notification.
pub(crate) async fn watch_to_completion(
    mut tracker: JobTracker,
    mut outcomes: mpsc::Receiver<PollOutcome>,
    mut event_rx: mpsc::Receiver<JobEvent>,
) -> Result<()> {
    let bar = output::percent_bar("Completing");
    let mut progress = tracker.progress();
    bar.set_position(progress.borrow().percent as u64);

    loop {
        tokio::select! {
            outcome = outcomes.recv() => {
                match outcome {
                    Some(outcome) => tracker.handle_outcome(outcome).await?,
                    None => {}
                }
                break;
            }
            changed = progress.changed() => {
                if changed.is_err() {
                    break;
                }
                bar.set_position(progress.borrow().percent as u64);
            }
        }
    }
    bar.finish_and_clear();

    while let Ok(event) = event_rx.try_recv() {
        match event {
            JobEvent::Completed {
                completed: Some(n), ..
            } => output::success(&format!("Completed {} items", n)),
            JobEvent::Completed {
                completed: None, ..
            } => output::success("All pending items completed"),
            JobEvent::Failed { error, .. } => {
                output::error(&format!("Bulk completion failed: {}", error))
            }
            JobEvent::Started { .. } | JobEvent::Resumed { .. } | JobEvent::StartFailed { .. } => {}
        }
    }
    Ok(())
}
