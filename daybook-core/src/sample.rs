//! Built-in sample events.
//!
//! Used to seed the in-memory repository and as the store's fallback when the
//! configured repository cannot be loaded. Times are relative to `now` so the
//! set always has something to show in the upcoming list.

use chrono::{Duration, NaiveDateTime};

use crate::event::{Attendee, AttendeeStatus, Event, EventDraft};

pub fn sample_events(now: NaiveDateTime) -> Vec<Event> {
    let hours = Duration::hours;
    let days = Duration::days;

    vec![
        EventDraft::new("Team Meeting", now + hours(2), now + hours(3))
            .with_description("Weekly sync with the product team")
            .with_location("Conference Room A")
            .into_event("1"),
        EventDraft::new("Lunch with Sarah", now + hours(4), now + hours(5))
            .with_description("Discuss project timeline")
            .with_location("Cafe Nero")
            .into_event("2"),
        EventDraft::new(
            "Project Deadline",
            now + days(1) + hours(10),
            now + days(1) + hours(11),
        )
        .with_description("Submit final deliverables")
        .into_event("3"),
        EventDraft::new(
            "Dentist Appointment",
            now + days(2) + hours(9),
            now + days(2) + hours(10),
        )
        .with_description("Regular checkup")
        .with_location("Dental Clinic")
        .with_reminder(60)
        .into_event("4"),
        EventDraft {
            is_all_day: Some(false),
            ..EventDraft::new(
                "All Hands Meeting",
                now + days(3) + hours(14),
                now + days(3) + hours(15),
            )
            .with_description("Company monthly update")
            .with_location("Main Auditorium")
            .with_attendees(vec![
                Attendee {
                    id: "u1".into(),
                    name: "John Doe".into(),
                    email: "john@example.com".into(),
                    status: AttendeeStatus::Confirmed,
                },
                Attendee {
                    id: "u2".into(),
                    name: "Jane Smith".into(),
                    email: "jane@example.com".into(),
                    status: AttendeeStatus::Pending,
                },
            ])
        }
        .into_event("5"),
    ]
}
