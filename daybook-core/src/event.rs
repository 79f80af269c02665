//! Calendar event types.
//!
//! Events carry timezone-naive wall-clock timestamps. Repositories assign the
//! `id`; everything else is owned by whoever creates the event. On the wire an
//! event is a flat camelCase object and absent optional fields are omitted.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::day::day_key;
use crate::error::{DaybookError, DaybookResult};

pub type EventId = String;

/// Response status of an attendee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendeeStatus {
    Pending,
    Confirmed,
    Declined,
}

impl fmt::Display for AttendeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            AttendeeStatus::Pending => "pending",
            AttendeeStatus::Confirmed => "confirmed",
            AttendeeStatus::Declined => "declined",
        };
        write!(f, "{label}")
    }
}

/// An event attendee. Attendees live and die with their event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: AttendeeStatus,
}

/// An event that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Display hint, opaque to the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
    /// Minutes before the start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<Attendee>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        EventDraft {
            title: title.into(),
            description: String::new(),
            start_time,
            end_time,
            location: None,
            color: None,
            is_all_day: None,
            reminder: None,
            attendees: None,
            created_by: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_reminder(mut self, minutes: u32) -> Self {
        self.reminder = Some(minutes);
        self
    }

    pub fn with_attendees(mut self, attendees: Vec<Attendee>) -> Self {
        self.attendees = Some(attendees);
        self
    }

    /// Check the preconditions every stored event must satisfy.
    pub fn validate(&self) -> DaybookResult<()> {
        validate_fields(&self.title, self.start_time, self.end_time)
    }

    /// Attach a repository-assigned id.
    pub fn into_event(self, id: impl Into<EventId>) -> Event {
        Event {
            id: id.into(),
            title: self.title,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location,
            color: self.color,
            is_all_day: self.is_all_day,
            reminder: self.reminder,
            attendees: self.attendees,
            created_by: self.created_by,
        }
    }
}

/// A stored calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<Attendee>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Event {
    pub fn validate(&self) -> DaybookResult<()> {
        validate_fields(&self.title, self.start_time, self.end_time)
    }

    /// The `YYYY-MM-DD` key of the day this event starts on.
    pub fn day_key(&self) -> String {
        day_key(&self.start_time)
    }

    /// Hour of day (0-23) the event starts in.
    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn is_all_day(&self) -> bool {
        self.is_all_day.unwrap_or(false)
    }

    /// Wall-clock instant at which the reminder should fire, if one is set.
    pub fn reminder_at(&self) -> Option<NaiveDateTime> {
        self.reminder
            .map(|minutes| self.start_time - Duration::minutes(i64::from(minutes)))
    }

    pub fn attendees(&self) -> &[Attendee] {
        self.attendees.as_deref().unwrap_or_default()
    }

    /// The event without its id, e.g. to use as a template for a new one.
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location.clone(),
            color: self.color.clone(),
            is_all_day: self.is_all_day,
            reminder: self.reminder,
            attendees: self.attendees.clone(),
            created_by: self.created_by.clone(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

fn validate_fields(title: &str, start: NaiveDateTime, end: NaiveDateTime) -> DaybookResult<()> {
    if title.trim().is_empty() {
        return Err(DaybookError::Validation("title must not be empty".into()));
    }
    if end < start {
        return Err(DaybookError::Validation(format!(
            "end time {} is before start time {}",
            end.format("%Y-%m-%d %H:%M"),
            start.format("%Y-%m-%d %H:%M")
        )));
    }
    Ok(())
}

/// Parse a timestamp in any form accepted on the wire.
pub fn parse_timestamp(raw: &str) -> DaybookResult<NaiveDateTime> {
    wall_clock::parse(raw.trim())
        .ok_or_else(|| DaybookError::Validation(format!("invalid timestamp '{raw}'")))
}

/// ISO-8601 wall-clock timestamps.
///
/// Serializes as `YYYY-MM-DDTHH:MM:SS`, plus fractional seconds if the value
/// has any. Accepts that form (with optional
/// fractional seconds, or without seconds) and RFC 3339 strings carrying an
/// offset, which are converted to local wall-clock time.
pub(crate) mod wall_clock {
    use chrono::{DateTime, Local, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de};

    // Sub-second digits are written only when present
    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.with_timezone(&Local).naive_local())
            })
    }
}
