use anyhow::Result;
use daybook_core::{DaybookError, Event, StoreHandle};
use owo_colors::OwoColorize;

use super::new::parse_when;
use crate::render::Render;

/// Fields to change; `None` leaves a field as it is.
#[derive(Default)]
pub struct Changes {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub reminder: Option<u32>,
}

pub async fn run(store: &StoreHandle, id: &str, changes: Changes) -> Result<()> {
    let event = store
        .get_event(id)?
        .ok_or_else(|| DaybookError::NotFound(id.to_string()))?;
    let event = apply(event, changes)?;

    let mut notices = store.subscribe()?;
    let updated = store.update_event(event).await?;
    super::print_notices(&mut notices);
    println!("  {}", updated.render().yellow());

    Ok(())
}

fn apply(mut event: Event, changes: Changes) -> Result<Event> {
    if let Some(start) = changes.start.as_deref() {
        // Moving the start keeps the duration unless an end is given too
        let duration = event.duration();
        event.start_time = parse_when(start)?.0;
        event.end_time = event.start_time + duration;
    }
    if let Some(end) = changes.end.as_deref() {
        event.end_time = parse_when(end)?.0;
    }
    if let Some(title) = changes.title {
        event.title = title;
    }
    if let Some(location) = changes.location {
        event.location = (!location.is_empty()).then_some(location);
    }
    if let Some(description) = changes.description {
        event.description = description;
    }
    if let Some(minutes) = changes.reminder {
        event.reminder = (minutes > 0).then_some(minutes);
    }
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use daybook_core::EventDraft;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 20)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn dentist() -> Event {
        EventDraft::new("Dentist", at(9, 0), at(10, 0))
            .with_location("Dental Clinic")
            .with_reminder(60)
            .into_event("4")
    }

    #[test]
    fn moving_start_keeps_duration() {
        let changes = Changes {
            start: Some("2026-03-20T14:00".to_string()),
            ..Default::default()
        };
        let event = apply(dentist(), changes).unwrap();
        assert_eq!(event.start_time, at(14, 0));
        assert_eq!(event.end_time, at(15, 0));
    }

    #[test]
    fn explicit_end_wins() {
        let changes = Changes {
            start: Some("2026-03-20T14:00".to_string()),
            end: Some("2026-03-20T14:30".to_string()),
            ..Default::default()
        };
        let event = apply(dentist(), changes).unwrap();
        assert_eq!(event.end_time, at(14, 30));
    }

    #[test]
    fn empty_values_clear_optional_fields() {
        let changes = Changes {
            location: Some(String::new()),
            reminder: Some(0),
            ..Default::default()
        };
        let event = apply(dentist(), changes).unwrap();
        assert_eq!(event.location, None);
        assert_eq!(event.reminder, None);
        assert_eq!(event.title, "Dentist");
    }

    #[test]
    fn no_changes_is_identity() {
        assert_eq!(apply(dentist(), Changes::default()).unwrap(), dentist());
    }
}
