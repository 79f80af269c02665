//! Outcome notifications for store observers.

use std::fmt;

use tokio::sync::broadcast;

use super::status::Operation;
use crate::event::EventId;

const DEFAULT_CAPACITY: usize = 64;

/// What happened in the store, for observers that show feedback to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreNotice {
    Loaded { count: usize },
    /// The repository could not be loaded; the sample events are shown instead
    Degraded { message: String },
    Created { id: EventId },
    Updated { id: EventId },
    Deleted { id: EventId },
    Failed { operation: Operation, message: String },
}

impl StoreNotice {
    pub fn is_failure(&self) -> bool {
        matches!(self, StoreNotice::Degraded { .. } | StoreNotice::Failed { .. })
    }
}

impl fmt::Display for StoreNotice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreNotice::Loaded { count } => write!(f, "Loaded {count} events"),
            StoreNotice::Degraded { message } => write!(f, "{message}"),
            StoreNotice::Created { .. } => write!(f, "Event created successfully"),
            StoreNotice::Updated { .. } => write!(f, "Event updated successfully"),
            StoreNotice::Deleted { .. } => write!(f, "Event deleted successfully"),
            StoreNotice::Failed { operation, message } => {
                write!(f, "Could not {operation} event: {message}")
            }
        }
    }
}

/// Broadcasts notices. Never blocks; lagging receivers drop old notices.
pub(crate) struct Notifier {
    tx: broadcast::Sender<StoreNotice>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(DEFAULT_CAPACITY);
        Notifier { tx }
    }

    pub fn emit(&self, notice: StoreNotice) {
        tracing::trace!(%notice, "store notice");
        // No subscribers is fine
        let _ = self.tx.send(notice);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreNotice> {
        self.tx.subscribe()
    }
}
