//! Job Registry: the durable source of truth for in-flight bulk jobs.
//!
//! The in-memory tracker can die with the process; this registry is what
//! decides on the next start whether there is a job worth watching. Every
//! mutation rewrites the whole collection before returning.

use std::path::PathBuf;
use std::sync::Mutex;

use tasklane_core::{db, ActiveJob};
use tracing::warn;

use crate::error::{Result, RuntimeError};

/// Namespace tag the registry is stored under in the app_state table.
pub const REGISTRY_KEY: &str = "active_jobs";

/// Storage backend for the serialized registry payload. Injectable so tests
/// run against an in-memory store.
pub trait RegistryStore: Send + Sync {
    /// Raw payload, or None when nothing has been stored yet.
    fn load(&self) -> anyhow::Result<Option<String>>;
    fn save(&self, payload: &str) -> anyhow::Result<()>;
}

/// SQLite-backed store under the data dir.
pub struct DbStore {
    data_dir: PathBuf,
}

impl DbStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

impl RegistryStore for DbStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        let conn = db::open_db_at(&self.data_dir)?;
        db::get_state(&conn, REGISTRY_KEY)
    }

    fn save(&self, payload: &str) -> anyhow::Result<()> {
        let conn = db::open_db_at(&self.data_dir)?;
        db::set_state(&conn, REGISTRY_KEY, payload)
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    payload: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Mutex::new(Some(payload.into())),
        }
    }
}

impl RegistryStore for MemoryStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.payload.lock().unwrap_or_else(|p| p.into_inner()).clone())
    }

    fn save(&self, payload: &str) -> anyhow::Result<()> {
        *self.payload.lock().unwrap_or_else(|p| p.into_inner()) = Some(payload.to_string());
        Ok(())
    }
}

impl<T: RegistryStore + ?Sized> RegistryStore for std::sync::Arc<T> {
    fn load(&self) -> anyhow::Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, payload: &str) -> anyhow::Result<()> {
        (**self).save(payload)
    }
}

pub struct JobRegistry {
    store: Box<dyn RegistryStore>,
    jobs: Vec<ActiveJob>,
}

impl JobRegistry {
    /// Loads the stored collection. Unreadable or corrupt storage reads as
    /// empty; the caller never sees the difference.
    pub fn open(store: Box<dyn RegistryStore>) -> Self {
        let jobs = match store.load() {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(jobs) => jobs,
                Err(e) => {
                    warn!(error = %e, "job registry payload corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "job registry unreadable, starting empty");
                Vec::new()
            }
        };
        Self { store, jobs }
    }

    /// Upserts the entry for a list with `started_at = now`, replacing any
    /// prior entry for the same list.
    pub fn record(&mut self, list_id: &str, status_location: &str) -> Result<ActiveJob> {
        self.jobs.retain(|j| j.list_id != list_id);
        let job = ActiveJob::new(list_id, status_location);
        self.jobs.push(job.clone());
        self.persist()?;
        Ok(job)
    }

    /// Removes the entry for a list; no-op when absent.
    pub fn forget(&mut self, list_id: &str) -> Result<()> {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.list_id != list_id);
        if self.jobs.len() != before {
            self.persist()?;
        }
        Ok(())
    }

    pub fn find(&self, list_id: &str) -> Option<&ActiveJob> {
        self.jobs.iter().find(|j| j.list_id == list_id)
    }

    /// Writes the whole collection; completes before returning so a restart
    /// right after a mutation observes the new state.
    fn persist(&self) -> Result<()> {
        let payload = serde_json::to_string(&self.jobs)
            .map_err(|e| RuntimeError::Registry(e.to_string()))?;
        self.store
            .save(&payload)
            .map_err(|e| RuntimeError::Registry(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_record_then_find() {
        let mut registry = JobRegistry::open(Box::new(MemoryStore::new()));
        registry.record("l1", "/jobs/1").unwrap();

        let job = registry.find("l1").unwrap();
        assert_eq!(job.list_id, "l1");
        assert_eq!(job.status_location, "/jobs/1");
        assert!((Utc::now() - job.started_at).num_seconds() < 2);
    }

    #[test]
    fn test_record_replaces_prior_entry() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let mut registry = JobRegistry::open(Box::new(std::sync::Arc::clone(&store)));
        registry.record("l1", "/jobs/1").unwrap();
        registry.record("l1", "/jobs/2").unwrap();

        assert_eq!(registry.find("l1").unwrap().status_location, "/jobs/2");

        // Exactly one entry survives the overwrite, and it is the second one.
        let payload = store.load().unwrap().unwrap();
        let jobs: Vec<tasklane_core::ActiveJob> = serde_json::from_str(&payload).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].status_location, "/jobs/2");
    }

    #[test]
    fn test_forget_is_noop_when_absent() {
        let mut registry = JobRegistry::open(Box::new(MemoryStore::new()));
        registry.forget("nope").unwrap();
        assert!(registry.find("nope").is_none());
    }

    #[test]
    fn test_forget_removes_entry() {
        let mut registry = JobRegistry::open(Box::new(MemoryStore::new()));
        registry.record("l1", "/jobs/1").unwrap();
        registry.record("l2", "/jobs/2").unwrap();
        registry.forget("l1").unwrap();

        assert!(registry.find("l1").is_none());
        assert!(registry.find("l2").is_some());
    }

    #[test]
    fn test_corrupt_payload_reads_as_empty() {
        let registry = JobRegistry::open(Box::new(MemoryStore::with_payload("not json {")));
        assert!(registry.find("l1").is_none());
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join(".tasklane");

        let mut registry = JobRegistry::open(Box::new(DbStore::new(data_dir.clone())));
        registry.record("l1", "/jobs/1").unwrap();

        let reopened = JobRegistry::open(Box::new(DbStore::new(data_dir.clone())));
        assert_eq!(reopened.find("l1").unwrap().status_location, "/jobs/1");

        let mut registry = JobRegistry::open(Box::new(DbStore::new(data_dir.clone())));
        registry.forget("l1").unwrap();
        let reopened = JobRegistry::open(Box::new(DbStore::new(data_dir)));
        assert!(reopened.find("l1").is_none());
    }
}
