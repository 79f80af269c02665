use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use daybook_core::day::parse_day;
use daybook_core::{EventDraft, StoreHandle, parse_timestamp};
use owo_colors::OwoColorize;

use crate::render::Render;

pub struct NewArgs {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub reminder: Option<u32>,
    pub all_day: bool,
}

pub async fn run(store: &StoreHandle, args: NewArgs) -> Result<()> {
    let draft = build_draft(args)?;

    let mut notices = store.subscribe()?;
    let event = store.add_event(draft).await?;
    super::print_notices(&mut notices);
    println!("  {}", event.render().green());

    Ok(())
}

fn build_draft(args: NewArgs) -> Result<EventDraft> {
    let (start, date_only) = parse_when(&args.start)?;
    let all_day = args.all_day || date_only;

    let end = match args.end.as_deref() {
        Some(s) => parse_when(s)?.0,
        None => default_end(start, all_day),
    };

    let mut draft = EventDraft::new(args.title, start, end);
    if let Some(location) = args.location.filter(|l| !l.is_empty()) {
        draft = draft.with_location(location);
    }
    if let Some(description) = args.description {
        draft = draft.with_description(description);
    }
    if let Some(minutes) = args.reminder {
        draft = draft.with_reminder(minutes);
    }
    if all_day {
        draft.is_all_day = Some(true);
    }

    Ok(draft)
}

/// Parse a date/time argument. A bare `YYYY-MM-DD` means midnight and is
/// reported as date-only.
pub fn parse_when(input: &str) -> Result<(NaiveDateTime, bool)> {
    if let Ok(dt) = parse_timestamp(input) {
        return Ok((dt, false));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M") {
        return Ok((dt, false));
    }
    if let Ok(date) = parse_day(input.trim()) {
        return Ok((date.and_time(chrono::NaiveTime::MIN), true));
    }
    anyhow::bail!(
        "Could not parse date/time: \"{}\" (expected e.g. 2025-03-20T15:00)",
        input
    )
}

/// Default end time: +1 hour for timed events, end of the day for all-day events.
fn default_end(start: NaiveDateTime, all_day: bool) -> NaiveDateTime {
    if all_day {
        start.date().and_time(chrono::NaiveTime::MIN) + Duration::days(1) - Duration::seconds(1)
    } else {
        start + Duration::hours(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 20)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn args(start: &str) -> NewArgs {
        NewArgs {
            title: "Lunch".to_string(),
            start: start.to_string(),
            end: None,
            location: None,
            description: None,
            reminder: None,
            all_day: false,
        }
    }

    #[test]
    fn parse_when_accepts_iso_and_space_forms() {
        assert_eq!(parse_when("2026-03-20T15:00").unwrap(), (at(15, 0), false));
        assert_eq!(parse_when("2026-03-20T15:00:00").unwrap(), (at(15, 0), false));
        assert_eq!(parse_when("2026-03-20 15:00").unwrap(), (at(15, 0), false));
    }

    #[test]
    fn parse_when_date_only() {
        assert_eq!(parse_when("2026-03-20").unwrap(), (at(0, 0), true));
    }

    #[test]
    fn parse_when_invalid_input() {
        assert!(parse_when("next friday").is_err());
    }

    #[test]
    fn timed_event_defaults_to_one_hour() {
        let draft = build_draft(args("2026-03-20T12:30")).unwrap();
        assert_eq!(draft.start_time, at(12, 30));
        assert_eq!(draft.end_time, at(13, 30));
        assert_eq!(draft.is_all_day, None);
    }

    #[test]
    fn date_only_event_is_all_day() {
        let draft = build_draft(args("2026-03-20")).unwrap();
        assert_eq!(draft.is_all_day, Some(true));
        let end = NaiveDate::from_ymd_opt(2026, 3, 20)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(draft.end_time, end);
    }

    #[test]
    fn empty_location_is_dropped() {
        let mut a = args("2026-03-20T12:30");
        a.location = Some(String::new());
        a.reminder = Some(15);
        let draft = build_draft(a).unwrap();
        assert_eq!(draft.location, None);
        assert_eq!(draft.reminder, Some(15));
    }
}
