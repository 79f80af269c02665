use anyhow::Result;
use daybook_core::StoreHandle;
use owo_colors::OwoColorize;

use crate::render::render_by_day;

pub fn run(store: &StoreHandle) -> Result<()> {
    let events = store.events_sorted()?;

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for line in render_by_day(&events, super::today()) {
        println!("{line}");
    }

    Ok(())
}
