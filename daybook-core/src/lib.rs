//! Core of the daybook calendar.
//!
//! - `event`: the event record and its validation
//! - `repository`: durable storage (in-memory sample store or the event service)
//! - `store`: the session cache with day/hour bucketing and upcoming ordering
//! - `context`: the session-scoped handle UI code uses to reach the store

pub mod config;
pub mod context;
pub mod day;
pub mod error;
pub mod event;
pub mod query;
pub mod repository;
pub mod sample;
pub mod store;

pub use config::{Backend, DaybookConfig};
pub use context::{StoreContext, StoreHandle};
pub use error::{DaybookError, DaybookResult};
pub use event::{Attendee, AttendeeStatus, Event, EventDraft, EventId, parse_timestamp};
pub use repository::{EventRepository, MemoryRepository, RemoteRepository};
pub use store::{EventStore, OpStatus, Operation, StoreNotice};
