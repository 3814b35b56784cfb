//! `tasklane tui` — run the interactive TUI wired to the runtime.
//!
//! The TUI itself is synchronous; this module owns the async side: one app
//! loop holding the api client, the read-through cache, and the job tracker,
//! connected to the TUI through command/event channels.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::warn;

use tasklane_client::{CreateItemRequest, CreateListRequest, TodoApi, UpdateItemRequest,
    UpdateListRequest};
use tasklane_core::ItemStatus;
use tasklane_runtime::{
    CacheInvalidation, DbStore, JobRegistry, JobTracker, ListCache, PollOutcome, RuntimeConfig,
};
use tasklane_tui::{run_tui, AppEvent, UiCommand};

pub async fn handle(base_url: Option<String>) -> Result<()> {
    let config = super::runtime_config(base_url);

    let (cmd_tx, cmd_rx) = mpsc::channel::<UiCommand>(64);
    let (app_tx, app_rx) = mpsc::channel::<AppEvent>(256);

    tokio::spawn(run_app_loop(config, cmd_rx, app_tx));

    // Blocks this thread until the user quits; the app loop keeps running on
    // the runtime's worker threads meanwhile.
    run_tui(cmd_tx, app_rx)?;
    Ok(())
}

async fn run_app_loop(
    config: RuntimeConfig,
    mut cmd_rx: mpsc::Receiver<UiCommand>,
    app_tx: mpsc::Sender<AppEvent>,
) {
    let api = Arc::new(tasklane_client::HttpTodoClient::new(&config.base_url))
        as Arc<dyn TodoApi>;
    let cache = Arc::new(ListCache::new());
    let registry = JobRegistry::open(Box::new(DbStore::new(config.data_dir.clone())));
    let (event_tx, mut event_rx) = mpsc::channel(64);
    let (mut tracker, mut outcomes) = JobTracker::new(
        &config,
        Arc::clone(&api),
        registry,
        Arc::clone(&cache) as Arc<dyn CacheInvalidation>,
        event_tx,
    );

    // Forward the scheduler's progress observable into the TUI event stream.
    let mut progress_rx = tracker.progress();
    let progress_tx = app_tx.clone();
    tokio::spawn(async move {
        while progress_rx.changed().await.is_ok() {
            let snapshot = *progress_rx.borrow();
            if progress_tx
                .send(AppEvent::JobProgress(snapshot))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                handle_command(cmd, api.as_ref(), &cache, &mut tracker, &app_tx).await;
            }
            Some(outcome) = outcomes.recv() => {
                let settled_list = match &outcome {
                    PollOutcome::Terminal { list_id, .. }
                    | PollOutcome::Errored { list_id, .. } => list_id.clone(),
                };
                if let Err(e) = tracker.handle_outcome(outcome).await {
                    let _ = app_tx.send(AppEvent::Notice(e.to_string())).await;
                }
                // The settled job changed server data; push fresh copies.
                push_items(api.as_ref(), &cache, &settled_list, &app_tx).await;
                push_lists(api.as_ref(), &cache, &app_tx).await;
            }
            Some(event) = event_rx.recv() => {
                let _ = app_tx.send(AppEvent::Job(event)).await;
            }
        }
    }
}

async fn handle_command(
    cmd: UiCommand,
    api: &dyn TodoApi,
    cache: &Arc<ListCache>,
    tracker: &mut JobTracker,
    app_tx: &mpsc::Sender<AppEvent>,
) {
    match cmd {
        UiCommand::LoadLists => push_lists(api, cache, app_tx).await,
        UiCommand::OpenList { list_id } => {
            // Mount of the items screen: resume any registered job first.
            if let Err(e) = tracker.resume_on_load(&list_id).await {
                warn!(list_id = %list_id, error = %e, "resume on load failed");
            }
            push_items(api, cache, &list_id, app_tx).await;
        }
        UiCommand::CreateList { name } => {
            match api.create_list(CreateListRequest { name }).await {
                Ok(_) => {
                    cache.invalidate_lists();
                    push_lists(api, cache, app_tx).await;
                }
                Err(e) => notice(app_tx, e.to_string()).await,
            }
        }
        UiCommand::RenameList { list_id, name } => {
            match api
                .update_list(&list_id, UpdateListRequest { name: Some(name) })
                .await
            {
                Ok(_) => {
                    cache.invalidate_lists();
                    push_lists(api, cache, app_tx).await;
                }
                Err(e) => notice(app_tx, e.to_string()).await,
            }
        }
        UiCommand::DeleteList { list_id } => match api.delete_list(&list_id).await {
            Ok(()) => {
                cache.invalidate_lists();
                cache.invalidate_items(&list_id);
                push_lists(api, cache, app_tx).await;
            }
            Err(e) => notice(app_tx, e.to_string()).await,
        },
        UiCommand::CreateItem { list_id, title } => {
            match api
                .create_item(&list_id, CreateItemRequest::new(title, None))
                .await
            {
                Ok(_) => {
                    cache.invalidate_items(&list_id);
                    push_items(api, cache, &list_id, app_tx).await;
                }
                Err(e) => notice(app_tx, e.to_string()).await,
            }
        }
        UiCommand::ToggleItem { list_id, item_id } => {
            let toggled = match cache.items(api, &list_id).await {
                Ok(items) => items.iter().find(|i| i.id == item_id).map(|i| {
                    if i.is_pending() {
                        ItemStatus::Completed
                    } else {
                        ItemStatus::Pending
                    }
                }),
                Err(_) => None,
            };
            let Some(status) = toggled else { return };
            match api
                .update_item(&list_id, &item_id, UpdateItemRequest::status(status))
                .await
            {
                Ok(_) => {
                    cache.invalidate_items(&list_id);
                    push_items(api, cache, &list_id, app_tx).await;
                }
                Err(e) => notice(app_tx, e.to_string()).await,
            }
        }
        UiCommand::DeleteItem { list_id, item_id } => {
            match api.delete_item(&list_id, &item_id).await {
                Ok(()) => {
                    cache.invalidate_items(&list_id);
                    push_items(api, cache, &list_id, app_tx).await;
                }
                Err(e) => notice(app_tx, e.to_string()).await,
            }
        }
        UiCommand::CompleteAll { list_id, pending } => {
            // Confirmation was collected on screen; a start failure surfaces
            // through the StartFailed event.
            if let Err(e) = tracker.start_job(&list_id, pending, true).await {
                warn!(list_id = %list_id, error = %e, "bulk completion start failed");
            }
        }
    }
}

async fn push_lists(api: &dyn TodoApi, cache: &Arc<ListCache>, app_tx: &mpsc::Sender<AppEvent>) {
    match cache.lists(api).await {
        Ok(lists) => {
            let _ = app_tx.send(AppEvent::Lists(lists)).await;
        }
        Err(e) => notice(app_tx, e.to_string()).await,
    }
}

async fn push_items(
    api: &dyn TodoApi,
    cache: &Arc<ListCache>,
    list_id: &str,
    app_tx: &mpsc::Sender<AppEvent>,
) {
    match cache.items(api, list_id).await {
        Ok(items) => {
            let _ = app_tx
                .send(AppEvent::Items {
                    list_id: list_id.to_string(),
                    items,
                })
                .await;
        }
        Err(e) => notice(app_tx, e.to_string()).await,
    }
}

async fn notice(app_tx: &mpsc::Sender<AppEvent>, message: String) {
    let _ = app_tx.send(AppEvent::Notice(message)).await;
}
