//! Cached event store.
//!
//! `EventStore` keeps the session's events in memory on top of an
//! [`EventRepository`]. Queries are answered from the cache and never touch
//! the repository; mutations go to the repository first and are applied to
//! the cache only once the repository has accepted them, so the cache always
//! holds the last known-good repository state.
//!
//! Mutations are serialized: overlapping calls run one after another, in call
//! order. Queries do not wait for pending mutations.
//!
//! If the initial load fails the store falls back to the built-in sample
//! events, backed by an in-memory repository, and reports itself as degraded.
//! Calling [`EventStore::load`] again retries the configured repository.

mod notice;
mod status;

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use parking_lot::{Mutex, RwLock};
use tokio::sync::{Mutex as AsyncMutex, broadcast};

use crate::day::{DayCell, HourSlot, hour_slots, is_same_month, month_grid_days};
use crate::error::{DaybookError, DaybookResult};
use crate::event::{Event, EventDraft};
use crate::query::{self, DEFAULT_UPCOMING_COUNT};
use crate::repository::{EventRepository, MemoryRepository};
use crate::sample::sample_events;

pub use notice::StoreNotice;
pub use status::{OpStatus, Operation};

use notice::Notifier;
use status::StatusBoard;

pub struct EventStore {
    /// The repository the store was opened with
    primary: Arc<dyn EventRepository>,
    /// The repository mutations go to (the sample fallback while degraded)
    active: RwLock<Arc<dyn EventRepository>>,
    cache: RwLock<Vec<Event>>,
    status: Mutex<StatusBoard>,
    mutations: AsyncMutex<()>,
    notifier: Notifier,
}

/// Tracks one in-flight operation; ends it when dropped.
struct InFlight<'a> {
    store: &'a EventStore,
    op: Operation,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.store.status.lock().end(self.op);
    }
}

impl EventStore {
    /// Create a store with an empty cache. Call [`load`](Self::load) before use.
    pub fn new(repository: Arc<dyn EventRepository>) -> Self {
        EventStore {
            active: RwLock::new(Arc::clone(&repository)),
            primary: repository,
            cache: RwLock::new(Vec::new()),
            status: Mutex::new(StatusBoard::default()),
            mutations: AsyncMutex::new(()),
            notifier: Notifier::new(),
        }
    }

    /// Create a store and load it. Never fails; see [`load`](Self::load).
    pub async fn open(repository: Arc<dyn EventRepository>) -> Self {
        let store = Self::new(repository);
        store.load().await;
        store
    }

    /// Replace the cache with the repository's full event set.
    ///
    /// On failure the cache holds the sample events, mutations go to an
    /// in-memory repository seeded with them, and the load error is recorded.
    pub async fn load(&self) {
        let _gate = self.mutations.lock().await;
        let _op = self.begin(Operation::Load);

        match self.primary.list_all().await {
            Ok(events) => {
                let events = query::unique_by_id(events);
                let count = events.len();
                *self.cache.write() = events;
                *self.active.write() = Arc::clone(&self.primary);
                self.status.lock().set_degraded(false);

                tracing::info!(count, "loaded events");
                self.notifier.emit(StoreNotice::Loaded { count });
            }
            Err(err) => {
                let fallback = sample_events(Local::now().naive_local());
                let message = format!("Could not load events, showing sample events instead: {err}");
                tracing::warn!(error = %err, "event load failed, falling back to sample events");

                *self.active.write() = Arc::new(MemoryRepository::with_events(fallback.clone()));
                *self.cache.write() = fallback;
                {
                    let mut status = self.status.lock();
                    status.fail(Operation::Load, message.clone());
                    status.set_degraded(true);
                }
                self.notifier.emit(StoreNotice::Degraded { message });
            }
        }
    }

    // QUERIES:

    /// All cached events in insertion order.
    pub fn events(&self) -> Vec<Event> {
        self.cache.read().clone()
    }

    /// All cached events, earliest start first.
    pub fn events_sorted(&self) -> Vec<Event> {
        query::sorted_by_start(self.cache.read().iter())
    }

    pub fn get_event(&self, id: &str) -> Option<Event> {
        self.cache.read().iter().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Events starting on the same calendar day as `date` (a date or a
    /// timestamp; only its year, month and day are compared).
    pub fn get_events_by_date<D: Datelike>(&self, date: &D) -> Vec<Event> {
        query::events_on(self.cache.read().iter(), date)
    }

    /// Future events, soonest first, at most `count` (default 5).
    pub fn get_upcoming_events(&self, count: Option<usize>) -> Vec<Event> {
        let now = Local::now().naive_local();
        self.get_upcoming_events_at(now, count.unwrap_or(DEFAULT_UPCOMING_COUNT))
    }

    /// Events starting strictly after `now`, soonest first, at most `count`.
    pub fn get_upcoming_events_at(&self, now: NaiveDateTime, count: usize) -> Vec<Event> {
        query::upcoming(self.cache.read().iter(), now, count)
    }

    /// The day's events in 24 hour slots.
    pub fn day_slots(&self, date: NaiveDate) -> Vec<HourSlot> {
        hour_slots(self.get_events_by_date(&date))
    }

    /// The cells of the month view around `anchor`, whole weeks from Sunday.
    pub fn month_grid(&self, anchor: NaiveDate) -> Vec<DayCell> {
        let cache = self.cache.read();
        month_grid_days(anchor)
            .into_iter()
            .map(|date| DayCell {
                date,
                in_month: is_same_month(date, anchor),
                events: query::events_on(cache.iter(), &date),
            })
            .collect()
    }

    // MUTATIONS:

    /// Store a new event and append it to the cache.
    pub async fn add_event(&self, draft: EventDraft) -> DaybookResult<Event> {
        let _op = self.begin(Operation::Add);
        let _gate = self.mutations.lock().await;

        let result = match draft.validate() {
            Ok(()) => self.repository().create(draft).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(event) => {
                {
                    let mut cache = self.cache.write();
                    if let Some(existing) = cache.iter_mut().find(|e| e.id == event.id) {
                        tracing::warn!(id = %event.id, "repository reused an id, replacing cached event");
                        *existing = event.clone();
                    } else {
                        cache.push(event.clone());
                    }
                }
                tracing::info!(id = %event.id, "event created");
                self.notifier.emit(StoreNotice::Created {
                    id: event.id.clone(),
                });
                Ok(event)
            }
            Err(err) => Err(self.fail(Operation::Add, err)),
        }
    }

    /// Replace an event (matched by id) in the repository and the cache.
    pub async fn update_event(&self, event: Event) -> DaybookResult<Event> {
        let _op = self.begin(Operation::Update);
        let _gate = self.mutations.lock().await;

        let result = match event.validate() {
            Ok(()) => self.repository().update(event).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(updated) => {
                {
                    let mut cache = self.cache.write();
                    match cache.iter_mut().find(|e| e.id == updated.id) {
                        Some(existing) => *existing = updated.clone(),
                        None => cache.push(updated.clone()),
                    }
                }
                tracing::info!(id = %updated.id, "event updated");
                self.notifier.emit(StoreNotice::Updated {
                    id: updated.id.clone(),
                });
                Ok(updated)
            }
            Err(err) => Err(self.fail(Operation::Update, err)),
        }
    }

    /// Delete an event from the repository and the cache.
    pub async fn delete_event(&self, id: &str) -> DaybookResult<()> {
        let _op = self.begin(Operation::Delete);
        let _gate = self.mutations.lock().await;

        match self.repository().delete(id).await {
            Ok(()) => {
                self.cache.write().retain(|e| e.id != id);
                tracing::info!(id, "event deleted");
                self.notifier.emit(StoreNotice::Deleted { id: id.to_string() });
                Ok(())
            }
            Err(err) => Err(self.fail(Operation::Delete, err)),
        }
    }

    // STATUS:

    /// Whether any operation is in flight.
    pub fn loading(&self) -> bool {
        self.status.lock().loading()
    }

    /// The most recent unresolved error of any operation.
    pub fn error(&self) -> Option<String> {
        self.status.lock().error()
    }

    pub fn status(&self, op: Operation) -> OpStatus {
        self.status.lock().status(op)
    }

    /// Whether the store is running on the sample fallback.
    pub fn is_degraded(&self) -> bool {
        self.status.lock().degraded()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreNotice> {
        self.notifier.subscribe()
    }

    fn repository(&self) -> Arc<dyn EventRepository> {
        Arc::clone(&self.active.read())
    }

    fn begin(&self, op: Operation) -> InFlight<'_> {
        self.status.lock().begin(op);
        InFlight { store: self, op }
    }

    fn fail(&self, op: Operation, err: DaybookError) -> DaybookError {
        tracing::warn!(operation = %op, error = %err, "event operation failed");
        self.status.lock().fail(op, err.to_string());
        self.notifier.emit(StoreNotice::Failed {
            operation: op,
            message: err.to_string(),
        });
        err
    }
}
