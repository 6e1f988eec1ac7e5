use anyhow::{Result, anyhow};

use crate::common::MetaContext;

/// Print the stored name answering to `name`, whatever its suffix.
pub fn find_command(ctx: &MetaContext, name: &str, mut handler: impl FnMut(String)) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;
    match store.find(&location, name, None)? {
        Some(stored) => {
            handler(stored);
            Ok(())
        }
        None => Err(anyhow!("No entry named {} at {}", name, location.display())),
    }
}
