use serde::{Deserialize, Serialize};

/// Lifecycle events the job tracker emits for the interface layer.
/// Progress while polling flows through the scheduler's watch channel instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEvent {
    Started { list_id: String },

    Resumed { list_id: String },

    Completed {
        list_id: String,
        completed: Option<u64>,
    },

    Failed { list_id: String, error: String },

    StartFailed { list_id: String, error: String },
}

impl JobEvent {
    pub fn started(list_id: impl Into<String>) -> Self {
        JobEvent::Started {
            list_id: list_id.into(),
        }
    }

    pub fn resumed(list_id: impl Into<String>) -> Self {
        JobEvent::Resumed {
            list_id: list_id.into(),
        }
    }

    pub fn completed(list_id: impl Into<String>, completed: Option<u64>) -> Self {
        JobEvent::Completed {
            list_id: list_id.into(),
            completed,
        }
    }

    pub fn failed(list_id: impl Into<String>, error: impl Into<String>) -> Self {
        JobEvent::Failed {
            list_id: list_id.into(),
            error: error.into(),
        }
    }

    pub fn start_failed(list_id: impl Into<String>, error: impl Into<String>) -> Self {
        JobEvent::StartFailed {
            list_id: list_id.into(),
            error: error.into(),
        }
    }

    pub fn list_id(&self) -> &str {
        match self {
            JobEvent::Started { list_id }
            | JobEvent::Resumed { list_id }
            | JobEvent::Completed { list_id, .. }
            | JobEvent::Failed { list_id, .. }
            | JobEvent::StartFailed { list_id, .. } => list_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started() {
        let event = JobEvent::started("l1");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"started""#));
        assert!(json.contains(r#""list_id":"l1""#));
    }

    #[test]
    fn test_completed_with_count() {
        let event = JobEvent::completed("l1", Some(3));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"completed""#));
        assert!(json.contains(r#""completed":3"#));
    }

    #[test]
    fn test_failed() {
        let event = JobEvent::failed("l1", "poll gave up");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"failed""#));
        assert!(json.contains("poll gave up"));
    }

    #[test]
    fn test_list_id_accessor() {
        for event in [
            JobEvent::started("l9"),
            JobEvent::resumed("l9"),
            JobEvent::completed("l9", None),
            JobEvent::failed("l9", "e"),
            JobEvent::start_failed("l9", "e"),
        ] {
            assert_eq!(event.list_id(), "l9");
        }
    }

    #[test]
    fn test_event_roundtrip() {
        let event = JobEvent::completed("l1", None);
        let json = serde_json::to_string(&event).unwrap();
        let decoded: JobEvent = serde_json::from_str(&json).unwrap();
        if let JobEvent::Completed { list_id, completed } = decoded {
            assert_eq!(list_id, "l1");
            assert_eq!(completed, None);
        } else {
            panic!("expected Completed variant");
        }
    }
}
