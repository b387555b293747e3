//! JSON output formatting

use std::io::{self, Write};

use serde::Serialize;
use serde::ser::Error as _;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::Result;
use crate::tree::EntryInfo;

use super::config::OutputConfig;

/// Render an entry as JSON text, without a trailing newline.
pub fn render(info: &EntryInfo, config: &OutputConfig) -> Result<String> {
    if config.compact {
        return Ok(serde_json::to_string(info)?);
    }

    let indent = " ".repeat(config.indent);
    let mut buf = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    info.serialize(&mut serializer)?;

    Ok(String::from_utf8(buf).map_err(serde_json::Error::custom)?)
}

/// Write one rendered entry followed by a newline.
pub fn write_json<W: Write>(
    writer: &mut W,
    info: &EntryInfo,
    config: &OutputConfig,
) -> io::Result<()> {
    let json = render(info, config).map_err(io::Error::other)?;
    writeln!(writer, "{}", json)
}

/// Print an entry as JSON to stdout.
pub fn print_json(info: &EntryInfo, config: &OutputConfig) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, info, config)
}
