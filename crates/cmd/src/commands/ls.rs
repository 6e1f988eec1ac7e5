use anyhow::Result;

use crate::common::MetaContext;
use metastore::EntryKind;

/// List the entries at the location, or the children of `metapath`.
pub fn ls_command(ctx: &MetaContext, metapath: Option<&str>, mut handler: impl FnMut(String)) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;

    let entries = match metapath {
        Some(metapath) => store.ls_entry(&location, metapath)?,
        None => store.entries().children(&location)?,
    };

    for entry in entries {
        if !ctx.verbose {
            handler(entry.stored_name());
            continue;
        }
        let line = match store.entries().kind(&entry)? {
            EntryKind::Container => format!("{}/", entry.stored_name()),
            EntryKind::Leaf(typed) => format!("{}\t{}", entry.stored_name(), typed.value),
            EntryKind::Branch(typed) => format!("{}/\t{}", entry.stored_name(), typed.value),
        };
        handler(line);
    }
    Ok(())
}
