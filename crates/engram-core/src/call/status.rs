//! Call status lifecycle
//!
//! Statuses move `Pending → Executing → {Completed | Failed}` and never
//! regress; the two terminal states accept no further transitions. The cell
//! is shared between the submitting caller and the spawned execution task,
//! so both observe the same lifecycle.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Lifecycle state of one model or tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Pending,
    Executing,
    Completed,
    Failed,
}

impl CallStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallStatus::Completed | CallStatus::Failed)
    }
}

/// Shared, monotonic status cell.
#[derive(Debug, Clone)]
pub struct StatusCell {
    inner: Arc<Mutex<CallStatus>>,
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusCell {
    /// New cell starting at `Pending`.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CallStatus::Pending)),
        }
    }

    pub fn get(&self) -> CallStatus {
        *self.inner.lock()
    }

    /// Apply a transition; returns `false` and leaves the cell untouched if
    /// the step is not a legal successor of the current status.
    pub fn advance(&self, next: CallStatus) -> bool {
        let mut current = self.inner.lock();
        let allowed = matches!(
            (*current, next),
            (CallStatus::Pending, CallStatus::Executing)
                | (CallStatus::Executing, CallStatus::Completed)
                | (CallStatus::Executing, CallStatus::Failed)
        );
        if allowed {
            *current = next;
        } else {
            let current = *current;
            warn!(?current, requested = ?next, "Refusing illegal call status transition");
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_lifecycle() {
        let cell = StatusCell::new();
        assert_eq!(cell.get(), CallStatus::Pending);
        assert!(cell.advance(CallStatus::Executing));
        assert!(cell.advance(CallStatus::Completed));
        assert_eq!(cell.get(), CallStatus::Completed);
        assert!(cell.get().is_terminal());
    }

    #[test]
    fn test_failed_lifecycle() {
        let cell = StatusCell::new();
        assert!(cell.advance(CallStatus::Executing));
        assert!(cell.advance(CallStatus::Failed));
        assert_eq!(cell.get(), CallStatus::Failed);
    }

    #[test]
    fn test_no_skipping_or_regression() {
        let cell = StatusCell::new();
        // cannot complete before dispatch
        assert!(!cell.advance(CallStatus::Completed));
        assert_eq!(cell.get(), CallStatus::Pending);

        assert!(cell.advance(CallStatus::Executing));
        // cannot go back
        assert!(!cell.advance(CallStatus::Pending));
        assert!(cell.advance(CallStatus::Failed));

        // terminal states accept nothing further
        assert!(!cell.advance(CallStatus::Executing));
        assert!(!cell.advance(CallStatus::Completed));
        assert_eq!(cell.get(), CallStatus::Failed);
    }

    #[test]
    fn test_cell_is_shared_between_clones() {
        let cell = StatusCell::new();
        let observer = cell.clone();
        cell.advance(CallStatus::Executing);
        assert_eq!(observer.get(), CallStatus::Executing);
    }
}
