//! Job Lifecycle Tracker: starts, resumes, and settles bulk completion jobs.
//!
//! The tracker owns the registry, the scheduler, and the cache handle, and is
//! the only writer of registry state. The interface drives it with
//! `start_job`/`resume_on_load` and pumps the outcome receiver (returned by
//! `new`) into `handle_outcome` from its select loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use tasklane_client::TodoApi;
use tasklane_core::{JobEvent, JobState};

use crate::cache::CacheInvalidation;
use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::poller::StatusPoller;
use crate::registry::JobRegistry;
use crate::scheduler::{PollOutcome, PollProgress, PollScheduler};

pub struct JobTracker {
    api: Arc<dyn TodoApi>,
    registry: JobRegistry,
    scheduler: PollScheduler,
    cache: Arc<dyn CacheInvalidation>,
    event_tx: mpsc::Sender<JobEvent>,
    outcome_tx: mpsc::Sender<PollOutcome>,
    resume_cutoff: Duration,
    /// Pending count at job start; fallback for the success notification when
    /// the terminal status carries no count.
    pending_at_start: HashMap<String, u64>,
}

impl JobTracker {
    /// Builds the tracker and hands back the outcome receiver the caller's
    /// event loop feeds into [`JobTracker::handle_outcome`].
    pub fn new(
        config: &RuntimeConfig,
        api: Arc<dyn TodoApi>,
        registry: JobRegistry,
        cache: Arc<dyn CacheInvalidation>,
        event_tx: mpsc::Sender<JobEvent>,
    ) -> (Self, mpsc::Receiver<PollOutcome>) {
        let poller = StatusPoller::new(
            Arc::clone(&api),
            config.poll_attempts,
            config.poll_retry_delay,
        );
        let scheduler = PollScheduler::new(poller, config.poll_interval);
        let (outcome_tx, outcome_rx) = mpsc::channel(8);
        let tracker = Self {
            api,
            registry,
            scheduler,
            cache,
            event_tx,
            outcome_tx,
            resume_cutoff: config.resume_cutoff,
            pending_at_start: HashMap::new(),
        };
        (tracker, outcome_rx)
    }

    /// Observable poll progress for the presentation layer.
    pub fn progress(&self) -> watch::Receiver<PollProgress> {
        self.scheduler.progress()
    }

    pub fn is_polling(&self) -> bool {
        self.scheduler.status_location().is_some()
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Starts a bulk completion job. `pending` is the list's current Pending
    /// count — zero means the operation is not offered, so this is a guard
    /// rather than an error. `confirmed` must already be collected by the
    /// interface. Returns whether a job was started.
    pub async fn start_job(&mut self, list_id: &str, pending: u64, confirmed: bool) -> Result<bool> {
        if pending == 0 || !confirmed {
            debug!(list_id, pending, confirmed, "bulk completion not started");
            return Ok(false);
        }
        match self.api.complete_all(list_id).await {
            Ok(response) => {
                if let Err(e) = self.registry.record(list_id, &response.status_url) {
                    // The job runs server-side either way; only resumability
                    // across a restart is lost.
                    warn!(list_id, error = %e, "could not persist job registry entry");
                }
                self.pending_at_start.insert(list_id.to_string(), pending);
                self.scheduler
                    .start(list_id, &response.status_url, self.outcome_tx.clone());
                info!(list_id, status_location = %response.status_url, "bulk completion started");
                self.emit(JobEvent::started(list_id)).await;
                Ok(true)
            }
            Err(e) => {
                self.emit(JobEvent::start_failed(list_id, e.to_string()))
                    .await;
                Err(e.into())
            }
        }
    }

    /// Resumes a previously registered job when one exists and is fresh.
    /// A stale entry is forgotten without telling the user — the job may have
    /// finished legitimately while the client was away, and re-polling a
    /// long-dead location is pointless.
    pub async fn resume_on_load(&mut self, list_id: &str) -> Result<bool> {
        let job = match self.registry.find(list_id) {
            Some(job) => job.clone(),
            None => return Ok(false),
        };
        if job.is_stale(self.resume_cutoff) {
            debug!(list_id, started_at = %job.started_at, "stored job is stale, discarding");
            self.registry.forget(list_id)?;
            return Ok(false);
        }
        self.scheduler
            .start(list_id, &job.status_location, self.outcome_tx.clone());
        info!(list_id, status_location = %job.status_location, "resumed bulk completion polling");
        self.emit(JobEvent::resumed(list_id)).await;
        Ok(true)
    }

    /// Settles a finished or errored job: forget the registry entry, drop the
    /// cached data the job may have changed, notify, and return the scheduler
    /// to Idle.
    pub async fn handle_outcome(&mut self, outcome: PollOutcome) -> Result<()> {
        match outcome {
            PollOutcome::Terminal { list_id, status } => {
                self.settle(&list_id)?;
                if status.state == JobState::Completed {
                    let completed = status
                        .completed_count()
                        .or_else(|| self.pending_at_start.get(&list_id).copied());
                    info!(list_id = %list_id, ?completed, "bulk completion finished");
                    self.emit(JobEvent::completed(&list_id, completed)).await;
                } else {
                    info!(list_id = %list_id, "bulk completion failed");
                    self.emit(JobEvent::failed(&list_id, "the job did not finish"))
                        .await;
                }
                self.pending_at_start.remove(&list_id);
                Ok(())
            }
            PollOutcome::Errored { list_id, error } => {
                self.settle(&list_id)?;
                self.pending_at_start.remove(&list_id);
                warn!(list_id = %list_id, error = %error, "polling gave up");
                self.emit(JobEvent::failed(&list_id, error)).await;
                Ok(())
            }
        }
    }

    fn settle(&mut self, list_id: &str) -> Result<()> {
        self.scheduler.stop();
        self.registry.forget(list_id)?;
        // The job may have changed items server-side even on failure.
        self.cache.invalidate_items(list_id);
        self.cache.invalidate_lists();
        Ok(())
    }

    async fn emit(&self, event: JobEvent) {
        let _ = self.event_tx.send(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryStore;
    use crate::testing::{RecordingCache, ScriptedApi};
    use chrono::Utc;
    use std::path::PathBuf;
    use tasklane_core::ActiveJob;

    fn test_config() -> RuntimeConfig {
        RuntimeConfig::new(PathBuf::from("/unused"))
            .with_poll_interval(Duration::from_millis(50))
            .with_poll_attempts(3)
            .with_poll_retry_delay(Duration::from_millis(2))
    }

    struct Harness {
        tracker: JobTracker,
        outcomes: mpsc::Receiver<PollOutcome>,
        api: Arc<ScriptedApi>,
        cache: Arc<RecordingCache>,
        event_rx: mpsc::Receiver<JobEvent>,
    }

    impl Harness {
        /// Wait for the poll loop to settle and run the terminal handling.
        async fn settle_next(&mut self) {
            let outcome = self.outcomes.recv().await.unwrap();
            self.tracker.handle_outcome(outcome).await.unwrap();
        }
    }

    fn harness(api: ScriptedApi, registry: JobRegistry) -> Harness {
        let api = Arc::new(api);
        let cache = Arc::new(RecordingCache::default());
        let (event_tx, event_rx) = mpsc::channel(16);
        let (tracker, outcomes) = JobTracker::new(
            &test_config(),
            Arc::clone(&api) as Arc<dyn TodoApi>,
            registry,
            Arc::clone(&cache) as Arc<dyn CacheInvalidation>,
            event_tx,
        );
        Harness {
            tracker,
            outcomes,
            api,
            cache,
            event_rx,
        }
    }

    fn registry_with_job(age_secs: i64) -> JobRegistry {
        let job = ActiveJob {
            list_id: "l1".to_string(),
            status_location: "/jobs/1".to_string(),
            started_at: Utc::now() - chrono::Duration::seconds(age_secs),
        };
        let payload = serde_json::to_string(&vec![job]).unwrap();
        JobRegistry::open(Box::new(MemoryStore::with_payload(payload)))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_start_requires_pending_and_confirmation() {
        let mut h = harness(
            ScriptedApi::new().with_complete_all("/jobs/1"),
            JobRegistry::open(Box::new(MemoryStore::new())),
        );

        assert!(!h.tracker.start_job("l1", 0, true).await.unwrap());
        assert!(!h.tracker.start_job("l1", 3, false).await.unwrap());
        assert_eq!(h.api.complete_all_calls(), 0);
        assert!(h.tracker.registry().find("l1").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_start_failure_leaves_no_registry_entry() {
        let mut h = harness(
            ScriptedApi::new().with_complete_all_error(500),
            JobRegistry::open(Box::new(MemoryStore::new())),
        );

        let err = h.tracker.start_job("l1", 3, true).await.unwrap_err();
        assert!(err.to_string().contains("start bulk completion"));
        assert!(h.tracker.registry().find("l1").is_none());
        assert!(!h.tracker.is_polling());

        match h.event_rx.try_recv().unwrap() {
            JobEvent::StartFailed { list_id, .. } => assert_eq!(list_id, "l1"),
            other => panic!("expected StartFailed, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_full_job_lifecycle() {
        // 5 items, 3 pending; polls report half done, then completed(3).
        let mut h = harness(
            ScriptedApi::new()
                .with_complete_all("/jobs/1")
                .push_running_fraction(1, 2)
                .push_completed(Some(3)),
            JobRegistry::open(Box::new(MemoryStore::new())),
        );

        let mut progress = h.tracker.progress();
        assert_eq!(progress.borrow_and_update().percent, 0);
        let percents = tokio::spawn(async move {
            let mut seen = vec![0u8];
            while progress.changed().await.is_ok() {
                let snapshot = *progress.borrow();
                if seen.last() != Some(&snapshot.percent) {
                    seen.push(snapshot.percent);
                }
                if !snapshot.polling {
                    break;
                }
            }
            seen
        });

        assert!(h.tracker.start_job("l1", 3, true).await.unwrap());
        assert_eq!(
            h.tracker.registry().find("l1").unwrap().status_location,
            "/jobs/1"
        );
        assert!(h.tracker.is_polling());

        h.settle_next().await;

        assert_eq!(percents.await.unwrap(), vec![0, 50, 100]);
        assert!(h.tracker.registry().find("l1").is_none());
        assert_eq!(h.cache.items_invalidated(), vec!["l1".to_string()]);
        assert_eq!(h.cache.lists_invalidated(), 1);

        match h.event_rx.try_recv().unwrap() {
            JobEvent::Started { list_id } => assert_eq!(list_id, "l1"),
            other => panic!("expected Started, got {:?}", other),
        }
        match h.event_rx.try_recv().unwrap() {
            JobEvent::Completed { list_id, completed } => {
                assert_eq!(list_id, "l1");
                assert_eq!(completed, Some(3));
            }
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_completed_without_count_falls_back_to_pending() {
        let mut h = harness(
            ScriptedApi::new()
                .with_complete_all("/jobs/1")
                .push_completed(None),
            JobRegistry::open(Box::new(MemoryStore::new())),
        );

        h.tracker.start_job("l1", 3, true).await.unwrap();
        h.settle_next().await;

        h.event_rx.try_recv().unwrap(); // Started
        match h.event_rx.try_recv().unwrap() {
            JobEvent::Completed { completed, .. } => assert_eq!(completed, Some(3)),
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fresh_job_resumes() {
        let mut h = harness(
            ScriptedApi::new().push_completed(None),
            registry_with_job(299),
        );

        assert!(h.tracker.resume_on_load("l1").await.unwrap());
        h.settle_next().await;

        assert!(h.tracker.registry().find("l1").is_none());
        match h.event_rx.try_recv().unwrap() {
            JobEvent::Resumed { list_id } => assert_eq!(list_id, "l1"),
            other => panic!("expected Resumed, got {:?}", other),
        }
        // No observed start, no result count: success notifies without one.
        match h.event_rx.try_recv().unwrap() {
            JobEvent::Completed { completed, .. } => assert_eq!(completed, None),
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stale_job_is_discarded_silently() {
        let mut h = harness(ScriptedApi::new(), registry_with_job(301));

        assert!(!h.tracker.resume_on_load("l1").await.unwrap());
        assert!(h.tracker.registry().find("l1").is_none());
        assert!(!h.tracker.is_polling());
        assert_eq!(h.api.status_calls(), 0);
        assert!(h.event_rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_resume_without_entry_is_noop() {
        let mut h = harness(
            ScriptedApi::new(),
            JobRegistry::open(Box::new(MemoryStore::new())),
        );

        assert!(!h.tracker.resume_on_load("l1").await.unwrap());
        assert_eq!(h.api.status_calls(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_resume_then_fail() {
        let mut h = harness(ScriptedApi::new().push_failed(), registry_with_job(10));

        assert!(h.tracker.resume_on_load("l1").await.unwrap());
        h.settle_next().await;

        assert!(h.tracker.registry().find("l1").is_none());
        assert_eq!(h.cache.items_invalidated(), vec!["l1".to_string()]);
        assert!(!h.tracker.is_polling());

        h.event_rx.try_recv().unwrap(); // Resumed
        match h.event_rx.try_recv().unwrap() {
            JobEvent::Failed { list_id, .. } => assert_eq!(list_id, "l1"),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_poll_errors_settle_like_failure() {
        let mut h = harness(
            ScriptedApi::new()
                .with_complete_all("/jobs/1")
                .repeat_status_error(503),
            JobRegistry::open(Box::new(MemoryStore::new())),
        );

        h.tracker.start_job("l1", 2, true).await.unwrap();
        h.settle_next().await;

        // Three attempts for the one poll, then the job is settled as failed.
        assert_eq!(h.api.status_calls(), 3);
        assert!(h.tracker.registry().find("l1").is_none());
        assert_eq!(h.cache.lists_invalidated(), 1);

        h.event_rx.try_recv().unwrap(); // Started
        assert!(matches!(
            h.event_rx.try_recv().unwrap(),
            JobEvent::Failed { .. }
        ));
    }
}
