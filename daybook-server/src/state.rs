use std::sync::Arc;

use daybook_core::{EventRepository, MemoryRepository};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    repository: Arc<dyn EventRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        AppState { repository }
    }

    /// In-memory state, optionally seeded with the sample events.
    pub fn in_memory(seed_sample_data: bool) -> Self {
        let repository = if seed_sample_data {
            MemoryRepository::with_sample_events()
        } else {
            MemoryRepository::new()
        };
        Self::new(Arc::new(repository))
    }

    pub fn repository(&self) -> &dyn EventRepository {
        self.repository.as_ref()
    }
}
