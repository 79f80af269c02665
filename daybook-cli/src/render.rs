//! Terminal rendering for daybook types.
//!
//! Extension traits that add colored output to daybook-core types using
//! owo_colors.

use chrono::{Datelike, NaiveDate, Weekday};
use daybook_core::Event;
use daybook_core::StoreNotice;
use daybook_core::day::{DayCell, HourSlot};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!("{} {}", format_time(self), self.title);
        if let Some(location) = &self.location {
            line.push_str(&format!(" {}", format!("@ {location}").dimmed()));
        }
        if self.reminder.is_some() {
            line.push_str(" ⏰");
        }
        format!("{} {}", line, format!("[{}]", self.id).dimmed())
    }
}

impl Render for StoreNotice {
    fn render(&self) -> String {
        if self.is_failure() {
            self.to_string().red().to_string()
        } else {
            self.to_string().green().to_string()
        }
    }
}

impl Render for HourSlot {
    fn render(&self) -> String {
        let label = format!("{:02}:00", self.hour);
        if self.events.is_empty() {
            return label.dimmed().to_string();
        }

        let titles: Vec<String> = self
            .events
            .iter()
            .map(|e| format!("{} {}", e.title, format!("[{}]", e.id).dimmed()))
            .collect();
        format!("{} {}", label.bold(), titles.join(", "))
    }
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        -1 => "Yesterday".to_string(),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Format the time portion of an event (e.g. "  15:00" or "all-day")
pub fn format_time(event: &Event) -> String {
    if event.is_all_day() {
        "all-day".to_string()
    } else {
        format!("{:>7}", event.start_time.format("%H:%M"))
    }
}

/// Render a month grid (Sunday first) with event counts per day.
pub fn render_month(cells: &[DayCell], today: NaiveDate) -> Vec<String> {
    let header = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ]
    .iter()
    .map(|d| format!("{:<6}", &d.to_string()[..2]))
    .collect::<String>();

    let mut lines = vec![header.trim_end().bold().to_string()];
    for week in cells.chunks(7) {
        let row: Vec<String> = week.iter().map(|cell| render_cell(cell, today)).collect();
        lines.push(row.join(" "));
    }
    lines
}

fn render_cell(cell: &DayCell, today: NaiveDate) -> String {
    let count = if cell.events.is_empty() {
        "  ".to_string()
    } else {
        format!("•{}", cell.events.len().min(9))
    };
    let text = format!("{:>2}{:<3}", cell.date.day(), count);

    if !cell.in_month {
        text.dimmed().to_string()
    } else if cell.date == today {
        text.reversed().to_string()
    } else if !cell.events.is_empty() {
        text.cyan().to_string()
    } else {
        text
    }
}

/// Group events (already ordered) under date labels.
pub fn render_by_day(events: &[Event], today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_date: Option<NaiveDate> = None;

    for event in events {
        let date = event.start_time.date();
        if current_date != Some(date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(format_date_label(date, today).bold().to_string());
            current_date = Some(date);
        }
        lines.push(format!("  {}", event.render()));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybook_core::EventDraft;
    use daybook_core::day::month_grid_days;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn event(id: &str, d: u32, hour: u32) -> Event {
        let start = day(d).and_hms_opt(hour, 0, 0).unwrap();
        EventDraft::new(format!("event {id}"), start, start).into_event(id)
    }

    #[test]
    fn date_labels() {
        let today = day(15);
        assert_eq!(format_date_label(day(14), today), "Yesterday");
        assert_eq!(format_date_label(day(15), today), "Today");
        assert_eq!(format_date_label(day(16), today), "Tomorrow");
        assert_eq!(format_date_label(day(20), today), "Wed Mar 20");
    }

    #[test]
    fn time_column() {
        let mut e = event("1", 15, 9);
        assert_eq!(format_time(&e), "  09:00");
        e.is_all_day = Some(true);
        assert_eq!(format_time(&e), "all-day");
    }

    #[test]
    fn groups_by_day_with_blank_line_between() {
        let events = vec![event("1", 15, 9), event("2", 15, 11), event("3", 16, 8)];
        let lines = render_by_day(&events, day(15));

        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("Today"));
        assert!(lines[1].contains("event 1"));
        assert!(lines[2].contains("event 2"));
        assert_eq!(lines[3], "");
        assert!(lines[4].contains("Tomorrow"));
    }

    #[test]
    fn month_has_header_and_one_row_per_week() {
        let cells: Vec<DayCell> = month_grid_days(day(1))
            .into_iter()
            .map(|date| DayCell {
                date,
                in_month: date.month() == 3,
                events: Vec::new(),
            })
            .collect();

        let lines = render_month(&cells, day(15));
        assert_eq!(lines.len(), 1 + cells.len() / 7);
        assert!(lines[0].contains("Su"));
    }
}
