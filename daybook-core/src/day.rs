//! Calendar-day arithmetic: day keys, the month grid and hour slots.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::error::{DaybookError, DaybookResult};
use crate::event::Event;

/// Format of day keys and of dates in URLs.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

pub const HOURS_PER_DAY: u32 = 24;

/// The `YYYY-MM-DD` key of a date or timestamp.
///
/// Two instants are on the same calendar day exactly when their keys are
/// equal; time of day is ignored.
pub fn day_key<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn is_same_day<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    day_key(a) == day_key(b)
}

/// Parse YYYY-MM-DD
pub fn parse_day(s: &str) -> DaybookResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DAY_FORMAT).map_err(|_| {
        DaybookError::Validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
    })
}

/// Parse YYYY-MM as the first day of that month
pub fn parse_month(s: &str) -> DaybookResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{s}-01"), DAY_FORMAT).map_err(|_| {
        DaybookError::Validation(format!("Invalid month '{}'. Expected YYYY-MM", s))
    })
}

/// All days shown by a month view: from the Sunday on or before the first of
/// `anchor`'s month through the Saturday on or after its last day.
pub fn month_grid_days(anchor: NaiveDate) -> Vec<NaiveDate> {
    let month_start = anchor.with_day(1).unwrap_or(anchor);
    // Clamped at the ends of the representable date range
    let month_end = month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);

    let lead = Duration::days(i64::from(month_start.weekday().num_days_from_sunday()));
    let trail = Duration::days(i64::from(6 - month_end.weekday().num_days_from_sunday()));
    let grid_start = month_start.checked_sub_signed(lead).unwrap_or(NaiveDate::MIN);
    let grid_end = month_end.checked_add_signed(trail).unwrap_or(NaiveDate::MAX);

    grid_start
        .iter_days()
        .take_while(|day| *day <= grid_end)
        .collect()
}

pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// One row of a day view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourSlot {
    pub hour: u32,
    pub events: Vec<Event>,
}

/// Bucket a day's events into 24 hour slots by the hour they start in.
/// Events keep their relative order within a slot.
pub fn hour_slots(events: Vec<Event>) -> Vec<HourSlot> {
    let mut slots: Vec<HourSlot> = (0..HOURS_PER_DAY)
        .map(|hour| HourSlot {
            hour,
            events: Vec::new(),
        })
        .collect();

    for event in events {
        let hour = event.start_hour() as usize;
        slots[hour].events.push(event);
    }

    slots
}

/// One cell of a month view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Whether the cell belongs to the month being shown (vs. padding days)
    pub in_month: bool,
    pub events: Vec<Event>,
}
