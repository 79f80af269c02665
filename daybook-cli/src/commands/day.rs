use anyhow::Result;
use daybook_core::StoreHandle;
use daybook_core::day::{HourSlot, parse_day};
use owo_colors::OwoColorize;

use crate::render::{Render, format_date_label};

pub fn run(store: &StoreHandle, date: Option<&str>) -> Result<()> {
    let today = super::today();
    let date = match date {
        Some(s) => parse_day(s)?,
        None => today,
    };

    let label = format!("{} ({})", format_date_label(date, today), date);
    println!("{}", label.bold());

    let slots = store.day_slots(date)?;
    if slots.iter().all(|slot| slot.events.is_empty()) {
        println!("  {}", "No events".dimmed());
        return Ok(());
    }

    // All-day events go above the hour grid
    for event in slots.iter().flat_map(|s| &s.events).filter(|e| e.is_all_day()) {
        println!("  {}", event.render());
    }

    for slot in slots {
        let timed = HourSlot {
            hour: slot.hour,
            events: slot.events.into_iter().filter(|e| !e.is_all_day()).collect(),
        };
        println!("  {}", timed.render());
    }

    Ok(())
}
