//! Durable event storage.
//!
//! `EventRepository` is the seam between the store and whatever actually keeps
//! events. Two backends ship with daybook: [`MemoryRepository`] (optionally
//! seeded with the sample events) and [`RemoteRepository`], an HTTP client for
//! the event service.

mod memory;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::{Backend, DaybookConfig};
use crate::error::DaybookResult;
use crate::event::{Event, EventDraft};

pub use memory::MemoryRepository;
pub use remote::RemoteRepository;

/// Storage for calendar events.
///
/// Mutations must be visible to every later read on the same repository.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// All known events, in no particular order.
    async fn list_all(&self) -> DaybookResult<Vec<Event>>;

    /// Fails with `NotFound` if no event has this id.
    async fn get_by_id(&self, id: &str) -> DaybookResult<Event>;

    /// Validate and store a new event under a freshly assigned id.
    async fn create(&self, draft: EventDraft) -> DaybookResult<Event>;

    /// Replace the stored event with the same id. Fails with `NotFound` if absent.
    async fn update(&self, event: Event) -> DaybookResult<Event>;

    /// Fails with `NotFound` if absent.
    async fn delete(&self, id: &str) -> DaybookResult<()>;

    /// Events starting on the same local calendar day as `date`.
    async fn list_by_date(&self, date: NaiveDate) -> DaybookResult<Vec<Event>>;

    /// Events starting after now, soonest first, at most `count`.
    async fn list_upcoming(&self, count: usize) -> DaybookResult<Vec<Event>>;
}

/// Build the repository selected by `config`.
pub fn from_config(config: &DaybookConfig) -> DaybookResult<Arc<dyn EventRepository>> {
    let repository: Arc<dyn EventRepository> = match config.backend {
        Backend::Sample => Arc::new(MemoryRepository::with_sample_events()),
        Backend::Remote => Arc::new(RemoteRepository::new(
            &config.api_url,
            config.request_timeout(),
        )?),
    };
    Ok(repository)
}
