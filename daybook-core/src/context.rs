//! Session-scoped access to the event store.
//!
//! A [`StoreContext`] is mounted once when the application starts and owns the
//! session's single [`EventStore`]. Consumers get cheap [`StoreHandle`] clones.
//! Once the context is unmounted (or dropped) every handle fails with
//! [`DaybookError::NoActiveContext`]; a handle that was never attached to a
//! context (`StoreHandle::default()`) fails the same way.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::config::DaybookConfig;
use crate::day::{DayCell, HourSlot};
use crate::error::{DaybookError, DaybookResult};
use crate::event::{Event, EventDraft};
use crate::repository::{self, EventRepository};
use crate::store::{EventStore, OpStatus, Operation, StoreNotice};

type Slot = Arc<RwLock<Option<Arc<EventStore>>>>;

pub struct StoreContext {
    slot: Slot,
}

impl StoreContext {
    /// Build the session's store on `repository` and load it.
    pub async fn mount(repository: Arc<dyn EventRepository>) -> Self {
        let store = EventStore::open(repository).await;
        tracing::debug!(events = store.len(), degraded = store.is_degraded(), "store context mounted");

        StoreContext {
            slot: Arc::new(RwLock::new(Some(Arc::new(store)))),
        }
    }

    /// Mount on the repository selected by `config`.
    pub async fn mount_with_config(config: &DaybookConfig) -> DaybookResult<Self> {
        let repository = repository::from_config(config)?;
        Ok(Self::mount(repository).await)
    }

    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            slot: Arc::clone(&self.slot),
        }
    }

    pub fn is_active(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Tear down the store. Outstanding handles stop working; operations
    /// already in flight run to completion.
    pub fn unmount(self) {
        // Drop does the work
    }
}

impl Drop for StoreContext {
    fn drop(&mut self) {
        if self.slot.write().take().is_some() {
            tracing::debug!("store context unmounted");
        }
    }
}

/// A consumer's reference to the session store.
#[derive(Clone, Default)]
pub struct StoreHandle {
    slot: Slot,
}

impl StoreHandle {
    fn store(&self) -> DaybookResult<Arc<EventStore>> {
        self.slot
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(DaybookError::NoActiveContext)
    }

    pub fn is_active(&self) -> bool {
        self.slot.read().is_some()
    }

    pub fn events(&self) -> DaybookResult<Vec<Event>> {
        Ok(self.store()?.events())
    }

    pub fn events_sorted(&self) -> DaybookResult<Vec<Event>> {
        Ok(self.store()?.events_sorted())
    }

    pub fn get_event(&self, id: &str) -> DaybookResult<Option<Event>> {
        Ok(self.store()?.get_event(id))
    }

    pub fn get_events_by_date<D: Datelike>(&self, date: &D) -> DaybookResult<Vec<Event>> {
        Ok(self.store()?.get_events_by_date(date))
    }

    pub fn get_upcoming_events(&self, count: Option<usize>) -> DaybookResult<Vec<Event>> {
        Ok(self.store()?.get_upcoming_events(count))
    }

    pub fn get_upcoming_events_at(
        &self,
        now: NaiveDateTime,
        count: usize,
    ) -> DaybookResult<Vec<Event>> {
        Ok(self.store()?.get_upcoming_events_at(now, count))
    }

    pub fn day_slots(&self, date: NaiveDate) -> DaybookResult<Vec<HourSlot>> {
        Ok(self.store()?.day_slots(date))
    }

    pub fn month_grid(&self, anchor: NaiveDate) -> DaybookResult<Vec<DayCell>> {
        Ok(self.store()?.month_grid(anchor))
    }

    pub async fn add_event(&self, draft: EventDraft) -> DaybookResult<Event> {
        self.store()?.add_event(draft).await
    }

    pub async fn update_event(&self, event: Event) -> DaybookResult<Event> {
        self.store()?.update_event(event).await
    }

    pub async fn delete_event(&self, id: &str) -> DaybookResult<()> {
        self.store()?.delete_event(id).await
    }

    /// Retry loading from the configured repository.
    pub async fn reload(&self) -> DaybookResult<()> {
        self.store()?.load().await;
        Ok(())
    }

    pub fn loading(&self) -> DaybookResult<bool> {
        Ok(self.store()?.loading())
    }

    pub fn error(&self) -> DaybookResult<Option<String>> {
        Ok(self.store()?.error())
    }

    pub fn status(&self, op: Operation) -> DaybookResult<OpStatus> {
        Ok(self.store()?.status(op))
    }

    pub fn is_degraded(&self) -> DaybookResult<bool> {
        Ok(self.store()?.is_degraded())
    }

    pub fn subscribe(&self) -> DaybookResult<broadcast::Receiver<StoreNotice>> {
        Ok(self.store()?.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Backend;
    use crate::repository::MemoryRepository;
    use chrono::Duration;

    fn draft() -> EventDraft {
        let start = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        EventDraft::new("Standup", start, start + Duration::minutes(15))
    }

    #[tokio::test]
    async fn test_handles_share_one_store() {
        let context = StoreContext::mount(Arc::new(MemoryRepository::new())).await;
        let form = context.handle();
        let grid = context.handle();

        let created = form.add_event(draft()).await.unwrap();

        assert_eq!(
            grid.get_events_by_date(&created.start_time).unwrap(),
            vec![created]
        );
    }

    #[tokio::test]
    async fn test_handle_fails_after_unmount() {
        let context = StoreContext::mount(Arc::new(MemoryRepository::new())).await;
        let handle = context.handle();
        assert!(handle.is_active());

        context.unmount();

        assert!(!handle.is_active());
        assert_eq!(handle.events(), Err(DaybookError::NoActiveContext));
        assert_eq!(
            handle.add_event(draft()).await,
            Err(DaybookError::NoActiveContext)
        );
        assert_eq!(
            handle.delete_event("1").await,
            Err(DaybookError::NoActiveContext)
        );
    }

    #[tokio::test]
    async fn test_detached_handle_fails_fast() {
        let handle = StoreHandle::default();
        assert_eq!(
            handle.get_upcoming_events(None),
            Err(DaybookError::NoActiveContext)
        );
        assert_eq!(
            handle.error().unwrap_err().to_string(),
            "No active store context"
        );
    }

    #[tokio::test]
    async fn test_mount_with_sample_config() {
        let config = DaybookConfig {
            backend: Backend::Sample,
            ..DaybookConfig::default()
        };
        let context = StoreContext::mount_with_config(&config).await.unwrap();
        let handle = context.handle();

        assert_eq!(handle.events().unwrap().len(), 5);
        assert!(!handle.is_degraded().unwrap());
        assert_eq!(handle.loading(), Ok(false));
        assert_eq!(handle.get_upcoming_events(None).unwrap().len(), 5);
    }
}
