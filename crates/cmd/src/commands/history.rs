use anyhow::{Context, Result};

use crate::common::{MetaContext, format_history, format_typed};

/// Print every superseded value of `metapath`, oldest first.
pub fn history_command(ctx: &MetaContext, metapath: &str, mut handler: impl FnMut(String)) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;
    let history = store
        .history(&location, metapath)
        .with_context(|| format!("Failed to read history of {}", metapath))?;
    for (ordinal, record) in history.iter().enumerate() {
        handler(format_history(ordinal, record));
    }
    Ok(())
}

/// Print the value recorded at `ordinal` without changing anything.
pub fn restore_command(
    ctx: &MetaContext,
    metapath: &str,
    ordinal: usize,
    mut handler: impl FnMut(String),
) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;
    let typed = store
        .restore(&location, metapath, ordinal)
        .with_context(|| format!("Failed to restore {} version {}", metapath, ordinal))?;
    handler(format_typed(&typed));
    Ok(())
}

/// Write the value recorded at `ordinal` back as the live value.
pub fn revert_command(
    ctx: &MetaContext,
    metapath: &str,
    ordinal: usize,
    mut handler: impl FnMut(String),
) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;
    let entry = store
        .revert(&location, metapath, ordinal)
        .with_context(|| format!("Failed to revert {} to version {}", metapath, ordinal))?;
    handler(entry.metapath.to_string());
    Ok(())
}
