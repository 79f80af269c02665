//! In-memory event repository.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::EventRepository;
use crate::error::{DaybookError, DaybookResult};
use crate::event::{Event, EventDraft};
use crate::query;
use crate::sample::sample_events;

/// Keeps events in insertion order for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    events: RwLock<Vec<Event>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing events. Later duplicates of an id are dropped.
    pub fn with_events(events: Vec<Event>) -> Self {
        MemoryRepository {
            events: RwLock::new(query::unique_by_id(events)),
        }
    }

    pub fn with_sample_events() -> Self {
        Self::with_events(sample_events(Local::now().naive_local()))
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    fn fresh_id(events: &[Event]) -> String {
        loop {
            let id = format!("event-{}", Uuid::new_v4().simple());
            if !events.iter().any(|e| e.id == id) {
                return id;
            }
        }
    }
}

#[async_trait]
impl EventRepository for MemoryRepository {
    async fn list_all(&self) -> DaybookResult<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> DaybookResult<Event> {
        self.events
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| DaybookError::NotFound(id.to_string()))
    }

    async fn create(&self, draft: EventDraft) -> DaybookResult<Event> {
        draft.validate()?;

        let mut events = self.events.write().await;
        let event = draft.into_event(Self::fresh_id(&events));
        events.push(event.clone());

        tracing::debug!(id = %event.id, "stored new event");
        Ok(event)
    }

    async fn update(&self, event: Event) -> DaybookResult<Event> {
        event.validate()?;

        let mut events = self.events.write().await;
        let slot = events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| DaybookError::NotFound(event.id.clone()))?;
        *slot = event.clone();

        Ok(event)
    }

    async fn delete(&self, id: &str) -> DaybookResult<()> {
        let mut events = self.events.write().await;
        let position = events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| DaybookError::NotFound(id.to_string()))?;
        events.remove(position);

        Ok(())
    }

    async fn list_by_date(&self, date: NaiveDate) -> DaybookResult<Vec<Event>> {
        Ok(query::events_on(self.events.read().await.iter(), &date))
    }

    async fn list_upcoming(&self, count: usize) -> DaybookResult<Vec<Event>> {
        let now = Local::now().naive_local();
        Ok(query::upcoming(self.events.read().await.iter(), now, count))
    }
}
