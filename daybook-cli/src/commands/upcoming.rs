use anyhow::Result;
use daybook_core::StoreHandle;
use owo_colors::OwoColorize;

use crate::render::render_by_day;

pub fn run(store: &StoreHandle, count: usize) -> Result<()> {
    let events = store.get_upcoming_events(Some(count))?;

    if events.is_empty() {
        println!("{}", "Nothing coming up".dimmed());
        return Ok(());
    }

    for line in render_by_day(&events, super::today()) {
        println!("{line}");
    }

    Ok(())
}
