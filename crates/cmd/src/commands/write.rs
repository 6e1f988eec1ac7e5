use anyhow::{Context, Result};

use crate::common::{MetaContext, parse_value_as};
use metastore::{MetaPath, Value};

/// Write a value given on the command line.
///
/// `raw` is parsed as JSON and falls back to a plain string, unless the
/// requested type is a string type, which keeps `raw` verbatim. No value
/// writes null, which with an explicit type stores that type's default.
pub fn write_command(
    ctx: &MetaContext,
    metapath: &str,
    raw: Option<&str>,
    suffix: Option<&str>,
    mut handler: impl FnMut(String),
) -> Result<()> {
    let store = ctx.open_store()?;
    let location = ctx.location()?;

    let parsed = MetaPath::split(metapath, store.registry())
        .with_context(|| format!("Invalid metapath {}", metapath))?;
    let kind = suffix
        .or(parsed.suffix())
        .and_then(|token| store.registry().type_for_suffix(token));
    let value = raw.map_or(Value::Null, |raw| parse_value_as(raw, kind));

    let entry = store
        .write(&location, metapath, value, suffix)
        .with_context(|| format!("Failed to write {}", metapath))?;

    if ctx.verbose {
        let history = store.history(&location, metapath)?;
        handler(format!("{} ({} superseded)", entry.metapath, history.len()));
    } else {
        handler(entry.metapath.to_string());
    }
    Ok(())
}
