use anyhow::{Context, Result};

use crate::common::{MetaContext, format_typed};
use diagnostics::log_debug;

/// Print the live value of `metapath` at the context's location.
///
/// With `children`, print the stored names of the entry's children instead.
pub fn read_command(
    ctx: &MetaContext,
    metapath: &str,
    suffix: Option<&str>,
    children: bool,
    mut handler: impl FnMut(String),
) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;
    log_debug!("Reading {metapath}", metapath: metapath);

    if children {
        for name in store
            .read_children(&location, metapath)
            .with_context(|| format!("Failed to list children of {}", metapath))?
        {
            handler(name);
        }
        return Ok(());
    }

    let typed = store
        .read(&location, metapath, suffix)
        .with_context(|| format!("Failed to read {}", metapath))?;
    handler(format_typed(&typed));
    Ok(())
}
