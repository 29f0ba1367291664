//! Human-readable dumps of a table's fields and records.

use std::io::{self, Write};
use std::ops::ControlFlow;

use crate::error::Result;

use super::database::Database;

/// Write one block per field: index, name, type character and length.
pub fn dump_fields<W: Write>(db: &Database, out: &mut W) -> io::Result<()> {
    for (index, field) in db.fields().iter().enumerate() {
        writeln!(
            out,
            "field {} ({}):\n  type: {}\n  length: {}",
            index,
            field.name_lossy(),
            field.tag() as char,
            field.len()
        )?;
    }
    Ok(())
}

/// Write a quoted, comma-terminated line for one record: the deletion flag
/// followed by every decoded field. Absent values print as `''`.
pub fn write_record<W: Write>(db: &Database, record: &[u8], out: &mut W) -> io::Result<()> {
    let flag: &[u8] = if Database::is_deleted(record) { b"*" } else { b"" };
    write_quoted(out, flag)?;
    for index in 0..db.field_count() {
        let value = db.decode_field(record, index);
        write_quoted(out, value.as_bytes())?;
    }
    out.write_all(b"\n")
}

/// Write a column header line, then every record through [`write_record`].
pub fn dump_records<W: Write>(db: &Database, out: &mut W) -> Result<()> {
    write!(out, "'delete',")?;
    for field in db.fields().iter() {
        write!(
            out,
            "'{}({}, {})',",
            field.name_lossy(),
            field.tag() as char,
            field.len()
        )?;
    }
    writeln!(out)?;

    let mut failure = None;
    let flow = db.iterate(|record| match write_record(db, record.data(), out) {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => {
            failure = Some(e);
            ControlFlow::Break(())
        }
    })?;

    match failure {
        Some(e) if flow.is_break() => Err(e.into()),
        _ => Ok(()),
    }
}

/// Raw bytes go out untouched so that code-page text survives.
fn write_quoted<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    out.write_all(b"'")?;
    out.write_all(bytes)?;
    out.write_all(b"',")
}
