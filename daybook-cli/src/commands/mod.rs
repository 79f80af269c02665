pub mod config;
pub mod day;
pub mod delete;
pub mod edit;
pub mod events;
pub mod month;
pub mod new;
pub mod upcoming;

use daybook_core::StoreNotice;
use tokio::sync::broadcast;

use crate::render::Render;

/// Print the success notices a mutation produced.
///
/// Failures are reported through the returned error instead.
pub fn print_notices(notices: &mut broadcast::Receiver<StoreNotice>) {
    while let Ok(notice) = notices.try_recv() {
        if !notice.is_failure() {
            println!("{}", notice.render());
        }
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
