//! Presentation bridge: pure projection of tracker + scheduler state into the
//! enable/disable and label signals the interactive elements consume. Holds
//! no state of its own.

use crate::scheduler::PollProgress;

/// The bulk trigger only exists while the list has pending items.
pub fn bulk_trigger_visible(pending: u64) -> bool {
    pending > 0
}

/// Per-item mutation and deletion controls are locked while a job runs.
pub fn item_controls_enabled(progress: PollProgress) -> bool {
    !progress.polling
}

/// Label for the bulk trigger: live percentage while polling, the normal
/// call-to-action otherwise, nothing when the trigger is hidden.
pub fn bulk_trigger_label(pending: u64, progress: PollProgress) -> Option<String> {
    if progress.polling {
        Some(format!("Completing... {}%", progress.percent))
    } else if pending > 0 {
        Some(format!("Complete All ({})", pending))
    } else {
        None
    }
}

/// "3 of 5 completed" subtitle; absent for an empty list.
pub fn completion_summary(completed: u64, total: u64) -> Option<String> {
    if total == 0 {
        return None;
    }
    Some(format!("{} of {} completed", completed, total))
}
