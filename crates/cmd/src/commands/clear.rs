use anyhow::{Context, Result};

use crate::common::MetaContext;

/// Drop the live value of `metapath` into its history.
pub fn clear_command(ctx: &MetaContext, metapath: &str, mut handler: impl FnMut(String)) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;
    store
        .clear(&location, metapath)
        .with_context(|| format!("Failed to clear {}", metapath))?;
    handler(format!("cleared {}", metapath));
    Ok(())
}

/// Remove `metapath` with its children and history, or only its history.
///
/// Removed entries go to the trash unless `permanent`.
pub fn remove_command(
    ctx: &MetaContext,
    metapath: &str,
    history_only: bool,
    permanent: bool,
    mut handler: impl FnMut(String),
) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;
    if history_only {
        store
            .purge_history(&location, metapath)
            .with_context(|| format!("Failed to purge history of {}", metapath))?;
        handler(format!("purged history of {}", metapath));
    } else {
        store
            .remove(&location, metapath, permanent)
            .with_context(|| format!("Failed to remove {}", metapath))?;
        handler(format!("removed {}", metapath));
    }
    Ok(())
}

/// Bring back an entry removed to the trash.
pub fn recover_command(ctx: &MetaContext, metapath: &str, mut handler: impl FnMut(String)) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;
    let entry = store
        .recover(&location, metapath)
        .with_context(|| format!("Failed to recover {}", metapath))?;
    handler(entry.metapath.to_string());
    Ok(())
}
