//! JSON persistence for transformed data.
//!
//! Output is pretty-printed with a fixed space indent and written as UTF-8
//! without escaping non-ASCII characters.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

/// Indent used for grouped, filtered, sorted and count files.
pub const DEFAULT_INDENT: usize = 4;

/// Indent used for cumulative tables.
pub const CUMULATIVE_INDENT: usize = 2;

/// Serializes `value` as pretty JSON indented by `indent` spaces.
pub fn to_pretty_json(value: &impl Serialize, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Writes `value` to `path` as pretty JSON, creating parent directories.
pub fn write_json(path: &Path, value: &impl Serialize, indent: usize) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let json = to_pretty_json(value, indent)?;
    debug!(path = %path.display(), bytes = json.len(), "Writing JSON");
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;

    Ok(())
}
