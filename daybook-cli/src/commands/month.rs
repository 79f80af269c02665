use anyhow::Result;
use chrono::Datelike;
use daybook_core::StoreHandle;
use daybook_core::day::parse_month;
use owo_colors::OwoColorize;

use crate::render::render_month;

pub fn run(store: &StoreHandle, month: Option<&str>) -> Result<()> {
    let today = super::today();
    let anchor = match month {
        Some(s) => parse_month(s)?,
        None => today.with_day(1).unwrap_or(today),
    };

    println!("{}", anchor.format("%B %Y").to_string().bold());
    for line in render_month(&store.month_grid(anchor)?, today) {
        println!("{line}");
    }

    Ok(())
}
