use anyhow::Result;
use daybook_core::StoreHandle;

pub async fn run(store: &StoreHandle, id: &str) -> Result<()> {
    let mut notices = store.subscribe()?;
    store.delete_event(id).await?;
    super::print_notices(&mut notices);
    Ok(())
}
