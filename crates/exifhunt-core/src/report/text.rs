//! Plain text reports.

use std::io::{self, Write};

use crate::types::MediaEntry;

/// Write one block per entry: the file name, one indented `key: value` line
/// per metadata pair, and a blank separator line.
pub fn write_text_report<W: Write>(entries: &[MediaEntry], mut writer: W) -> io::Result<()> {
    for entry in entries {
        writeln!(writer, "{}", entry.file_name)?;
        for line in entry.metadata_lines() {
            writeln!(writer, "  {line}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}
