use anyhow::{Context, Result};

use crate::common::{MetaContext, format_pulled};

/// Print the value of `metapath`, falling back to up to `depth` ancestors.
pub fn pull_command(
    ctx: &MetaContext,
    metapath: &str,
    depth: i64,
    lazy: bool,
    mut handler: impl FnMut(String),
) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;
    let pulled = store
        .pull(&location, metapath, depth, lazy)
        .with_context(|| format!("Failed to pull {}", metapath))?;
    handler(format_pulled(&pulled, &location, ctx.verbose));
    Ok(())
}

/// Pull through every ancestor.
///
/// With `children`, print every valued child of `metapath` merged over all
/// ancestors instead, one `name  value  (suffix)` line each.
pub fn inherit_command(
    ctx: &MetaContext,
    metapath: &str,
    children: bool,
    mut handler: impl FnMut(String),
) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;
    if children {
        let merged = store
            .inherit_children(&location, metapath)
            .with_context(|| format!("Failed to inherit children of {}", metapath))?;
        for (name, pulled) in merged {
            handler(format!("{}\t{}", name, format_pulled(&pulled, &location, ctx.verbose)));
        }
        return Ok(());
    }

    let pulled = store
        .inherit(&location, metapath)
        .with_context(|| format!("Failed to inherit {}", metapath))?;
    handler(format_pulled(&pulled, &location, ctx.verbose));
    Ok(())
}
