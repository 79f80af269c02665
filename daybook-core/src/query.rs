//! Read-only event queries shared by the store and the in-memory repository.
//!
//! None of these functions mutate their input; results are fresh clones.

use chrono::{Datelike, NaiveDateTime};

use crate::day::day_key;
use crate::event::Event;

/// Number of events returned by upcoming queries when no count is given.
pub const DEFAULT_UPCOMING_COUNT: usize = 5;

/// Events starting on the same calendar day as `date`, in input order.
pub fn events_on<'a, D: Datelike>(
    events: impl IntoIterator<Item = &'a Event>,
    date: &D,
) -> Vec<Event> {
    let key = day_key(date);
    events
        .into_iter()
        .filter(|event| event.day_key() == key)
        .cloned()
        .collect()
}

/// Events starting strictly after `now`, soonest first, at most `count`.
///
/// The sort is stable, so events with equal start times keep input order.
pub fn upcoming<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    now: NaiveDateTime,
    count: usize,
) -> Vec<Event> {
    let mut future: Vec<Event> = events
        .into_iter()
        .filter(|event| event.start_time > now)
        .cloned()
        .collect();
    future.sort_by_key(|event| event.start_time);
    future.truncate(count);
    future
}

/// All events ascending by start time (stable).
pub fn sorted_by_start<'a>(events: impl IntoIterator<Item = &'a Event>) -> Vec<Event> {
    let mut all: Vec<Event> = events.into_iter().cloned().collect();
    all.sort_by_key(|event| event.start_time);
    all
}

/// Keep the first event for each id, preserving order.
pub(crate) fn unique_by_id(events: Vec<Event>) -> Vec<Event> {
    let mut unique: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        if unique.iter().any(|e| e.id == event.id) {
            tracing::warn!(id = %event.id, "dropping event with duplicate id");
        } else {
            unique.push(event);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDraft;
    use chrono::{Duration, NaiveDate};

    fn event_at(id: &str, start: NaiveDateTime) -> Event {
        EventDraft::new(id, start, start + Duration::minutes(30)).into_event(id)
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_events_on_buckets_by_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let events = vec![
            event_at("late", day.and_hms_opt(23, 59, 0).unwrap()),
            event_at("next", NaiveDate::from_ymd_opt(2024, 3, 16).unwrap().and_hms_opt(0, 0, 0).unwrap()),
            event_at("early", day.and_hms_opt(0, 1, 0).unwrap()),
        ];

        assert_eq!(ids(&events_on(&events, &day)), vec!["late", "early"]);
        // A timestamp query uses only its date part
        let noon = day.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(ids(&events_on(&events, &noon)), vec!["late", "early"]);
    }

    #[test]
    fn test_upcoming_orders_and_truncates() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let events = vec![
            event_at("plus1", now + Duration::hours(1)),
            event_at("plus3", now + Duration::hours(3)),
            event_at("minus1", now - Duration::hours(1)),
            event_at("plus2", now + Duration::hours(2)),
        ];

        assert_eq!(ids(&upcoming(&events, now, 2)), vec!["plus1", "plus2"]);
        assert_eq!(
            ids(&upcoming(&events, now, DEFAULT_UPCOMING_COUNT)),
            vec!["plus1", "plus2", "plus3"]
        );
    }

    #[test]
    fn test_upcoming_excludes_events_starting_now() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let events = vec![event_at("now", now)];
        assert!(upcoming(&events, now, 5).is_empty());
    }

    #[test]
    fn test_upcoming_ties_keep_insertion_order() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let start = now + Duration::hours(1);
        let events = vec![
            event_at("b", start),
            event_at("later", now + Duration::hours(2)),
            event_at("a", start),
        ];

        assert_eq!(ids(&upcoming(&events, now, 5)), vec!["b", "a", "later"]);
    }

    #[test]
    fn test_sorted_by_start() {
        let base = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let events = vec![
            event_at("c", base + Duration::days(2)),
            event_at("a", base - Duration::days(1)),
            event_at("b", base),
        ];
        assert_eq!(ids(&sorted_by_start(&events)), vec!["a", "b", "c"]);
        // Input untouched
        assert_eq!(ids(&events), vec!["c", "a", "b"]);
    }
}
