//! Output encodings for project records.

use std::io::{self, Write};

use crate::error::Result;
use crate::models::ProjectRecord;

/// CSV header row.
pub const CSV_HEADER: [&str; 3] = ["Name", "URL", "Team Members"];

/// Separator used to join team members into one CSV field.
pub const TEAM_SEPARATOR: &str = "; ";

/// Encode records as a compact JSON array.
pub fn to_json(records: &[ProjectRecord]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(records)?)
}

/// Stream records as CSV rows, header first.
pub fn write_csv<W: Write>(mut w: W, records: &[ProjectRecord]) -> io::Result<()> {
    write_row(&mut w, &CSV_HEADER)?;
    for record in records {
        let team = record.team_field(TEAM_SEPARATOR);
        write_row(&mut w, &[&record.name, &record.url, &team])?;
    }
    w.flush()
}

/// Encode records as CSV into memory.
pub fn to_csv(records: &[ProjectRecord]) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    Ok(buf)
}

fn needs_quotes(field: &str) -> bool {
    field.starts_with(' ')
        || field.starts_with('\t')
        || field.contains([',', '"', '\r', '\n'])
}

/// Write a single comma-separated row terminated by `\n`.
fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}
