//! Polling Scheduler: drives the Status Poller per status location.
//!
//! State machine per location: Idle (nothing tracked) → Active (one loop task)
//! → Terminal or Errored (the loop emits one outcome and exits). Polls are
//! strictly sequential: the loop awaits each fetch before sleeping, so a slow
//! fetch can never pile up concurrent requests. Switching locations cancels
//! the old loop synchronously; an in-flight fetch is dropped and its result
//! discarded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use tasklane_core::JobStatus;

use crate::poller::StatusPoller;

/// Snapshot the interface observes while a job is tracked. Percent is
/// monotonic non-decreasing within one job and resets to 0 only when a new
/// status location begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollProgress {
    pub percent: u8,
    pub polling: bool,
}

/// What a poll loop reports back when it ends.
#[derive(Debug)]
pub enum PollOutcome {
    /// The job reached completed or failed.
    Terminal { list_id: String, status: JobStatus },
    /// The poller gave up after exhausting its retries. Treated like failed.
    Errored { list_id: String, error: String },
}

pub struct PollScheduler {
    poller: Arc<StatusPoller>,
    interval: Duration,
    progress_tx: watch::Sender<PollProgress>,
    active: Option<ActivePoll>,
}

struct ActivePoll {
    status_location: String,
    cancel: CancellationToken,
}

impl PollScheduler {
    pub fn new(poller: StatusPoller, interval: Duration) -> Self {
        let (progress_tx, _) = watch::channel(PollProgress::default());
        Self {
            poller: Arc::new(poller),
            interval,
            progress_tx,
            active: None,
        }
    }

    /// Observable progress: current percent and whether polling is active.
    pub fn progress(&self) -> watch::Receiver<PollProgress> {
        self.progress_tx.subscribe()
    }

    pub fn status_location(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.status_location.as_str())
    }

    /// Begins polling a status location, replacing any previous one.
    pub fn start(
        &mut self,
        list_id: &str,
        status_location: &str,
        outcome_tx: mpsc::Sender<PollOutcome>,
    ) {
        self.stop();
        let cancel = CancellationToken::new();
        self.active = Some(ActivePoll {
            status_location: status_location.to_string(),
            cancel: cancel.clone(),
        });
        let _ = self.progress_tx.send(PollProgress {
            percent: 0,
            polling: true,
        });

        let poller = Arc::clone(&self.poller);
        let progress_tx = self.progress_tx.clone();
        let interval = self.interval;
        let list_id = list_id.to_string();
        let location = status_location.to_string();
        tokio::spawn(async move {
            loop {
                let fetched = tokio::select! {
                    _ = cancel.cancelled() => break,
                    result = poller.fetch_status(&list_id, &location) => result,
                };
                match fetched {
                    Ok(status) => {
                        let percent = status.percent();
                        progress_tx.send_modify(|p| p.percent = p.percent.max(percent));
                        if status.state.is_terminal() {
                            progress_tx.send_modify(|p| p.polling = false);
                            let _ = outcome_tx
                                .send(PollOutcome::Terminal {
                                    list_id: list_id.clone(),
                                    status,
                                })
                                .await;
                            break;
                        }
                    }
                    Err(e) => {
                        progress_tx.send_modify(|p| p.polling = false);
                        let _ = outcome_tx
                            .send(PollOutcome::Errored {
                                list_id: list_id.clone(),
                                error: e.to_string(),
                            })
                            .await;
                        break;
                    }
                }
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        });
    }

    /// Returns the scheduler to Idle. No further polls are scheduled for the
    /// old location; the last percent is kept until a new location starts.
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            debug!(status_location = %active.status_location, "polling stopped");
        }
        self.progress_tx.send_modify(|p| p.polling = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedApi;
    use tasklane_core::JobState;

    fn scheduler(api: Arc<ScriptedApi>, interval_ms: u64) -> PollScheduler {
        let poller = StatusPoller::new(api, 1, Duration::from_millis(1));
        PollScheduler::new(poller, Duration::from_millis(interval_ms))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_polls_never_overlap_when_fetch_is_slow() {
        // Each fetch takes 4x the poll interval.
        let api = Arc::new(ScriptedApi::new().repeat_running(50).with_fetch_delay(Duration::from_millis(40)));
        let mut scheduler = scheduler(Arc::clone(&api), 10);
        let (outcome_tx, _outcome_rx) = mpsc::channel(4);

        scheduler.start("l1", "/jobs/1", outcome_tx);
        tokio::time::sleep(Duration::from_millis(200)).await;
        scheduler.stop();

        assert!(api.status_calls() >= 2);
        assert_eq!(api.max_in_flight(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_terminal_state_stops_polling() {
        let api = Arc::new(
            ScriptedApi::new()
                .push_running(50)
                .push_completed(Some(3)),
        );
        let mut scheduler = scheduler(Arc::clone(&api), 10);
        let (outcome_tx, mut outcome_rx) = mpsc::channel(4);

        scheduler.start("l1", "/jobs/1", outcome_tx);
        let outcome = outcome_rx.recv().await.unwrap();
        match outcome {
            PollOutcome::Terminal { list_id, status } => {
                assert_eq!(list_id, "l1");
                assert_eq!(status.state, JobState::Completed);
            }
            other => panic!("expected Terminal, got {:?}", other),
        }

        // No further polls are issued for this location.
        let calls = api.status_calls();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(api.status_calls(), calls);
        assert!(!scheduler.progress().borrow().polling);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_exhausted_retries_surface_as_errored() {
        let api = Arc::new(ScriptedApi::new().repeat_status_error(503));
        let poller = StatusPoller::new(Arc::clone(&api) as Arc<dyn tasklane_client::TodoApi>, 3, Duration::from_millis(2));
        let mut scheduler = PollScheduler::new(poller, Duration::from_millis(10));
        let (outcome_tx, mut outcome_rx) = mpsc::channel(4);

        scheduler.start("l1", "/jobs/1", outcome_tx);
        match outcome_rx.recv().await.unwrap() {
            PollOutcome::Errored { list_id, .. } => assert_eq!(list_id, "l1"),
            other => panic!("expected Errored, got {:?}", other),
        }
        assert_eq!(api.status_calls(), 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_percent_is_monotonic_within_one_job() {
        let api = Arc::new(
            ScriptedApi::new()
                .push_running(50)
                .push_running(30)
                .push_completed(None),
        );
        let mut scheduler = scheduler(Arc::clone(&api), 10);
        let (outcome_tx, mut outcome_rx) = mpsc::channel(4);
        let mut progress = scheduler.progress();

        let seen = tokio::spawn(async move {
            let mut seen = vec![progress.borrow().percent];
            while progress.changed().await.is_ok() {
                let snapshot = *progress.borrow();
                seen.push(snapshot.percent);
                if !snapshot.polling {
                    break;
                }
            }
            seen
        });

        scheduler.start("l1", "/jobs/1", outcome_tx);
        outcome_rx.recv().await.unwrap();
        let seen = seen.await.unwrap();

        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "not monotonic: {:?}", seen);
        assert_eq!(*seen.last().unwrap(), 100);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stop_halts_scheduling_immediately() {
        let api = Arc::new(ScriptedApi::new().repeat_running(10).with_fetch_delay(Duration::from_millis(50)));
        let mut scheduler = scheduler(Arc::clone(&api), 10);
        let (outcome_tx, mut outcome_rx) = mpsc::channel(4);

        scheduler.start("l1", "/jobs/1", outcome_tx);
        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.stop();
        assert!(scheduler.status_location().is_none());
        assert!(!scheduler.progress().borrow().polling);

        // The abandoned loop never reports an outcome.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(outcome_rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_new_location_resets_percent() {
        let api = Arc::new(
            ScriptedApi::new()
                .push_running(80)
                .repeat_running(5),
        );
        let mut scheduler = scheduler(Arc::clone(&api), 10);
        let (outcome_tx, _outcome_rx) = mpsc::channel(4);

        scheduler.start("l1", "/jobs/1", outcome_tx.clone());
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(scheduler.progress().borrow().percent >= 80);

        // The new location starts over; at most one low-percent poll can have
        // landed by now, so the old 80 must be gone.
        scheduler.start("l1", "/jobs/2", outcome_tx);
        let snapshot = *scheduler.progress().borrow();
        assert!(snapshot.percent <= 5, "percent not reset: {}", snapshot.percent);
        assert!(snapshot.polling);
    }
}
