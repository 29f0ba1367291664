use anyhow::{Context, Result};
use dbf_reader::db::{dump_fields, dump_records, trimmed_eq, write_record, Database};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, DB_NAME_KEY};

/// A `.dbf` argument names the table; anything else is a config file whose
/// `db_name` entry does.
pub fn resolve_table(arg: &str) -> Result<PathBuf> {
    let path = Path::new(arg);
    let is_table = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dbf"));
    if is_table {
        return Ok(path.to_path_buf());
    }

    let config = Config::load(path).context("Failed to init config")?;
    let name = config
        .get(DB_NAME_KEY)
        .with_context(|| format!("No {} entry in {}", DB_NAME_KEY, path.display()))?;
    Ok(PathBuf::from(name))
}

fn open(path: &Path) -> Result<Database> {
    Database::open(path).context("Failed to open database file")
}

pub fn dbinfo(path: &Path) -> Result<()> {
    let db = open(path)?;
    let info = db.info();
    println!("db type: 0x{:02x}", info.kind);
    println!(
        "last update: {:02}/{:02}/{:02}",
        info.last_update[0], info.last_update[1], info.last_update[2]
    );
    println!("header length: {}", info.header_len);
    println!("number of records: {}", info.record_count);
    println!("byte(s) per records: {}", info.record_len);
    println!("is db encrypted: {}", if info.encrypted { "yes" } else { "no" });
    println!("number of fields: {}", db.field_count());
    println!("memo file: {}", if db.has_memo() { "yes" } else { "no" });
    db.close();
    Ok(())
}

pub fn fields(path: &Path) -> Result<()> {
    let db = open(path)?;
    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "field description:")?;
    dump_fields(&db, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn dump(path: &Path) -> Result<()> {
    let db = open(path)?;
    let mut out = BufWriter::new(io::stdout().lock());
    dump_records(&db, &mut out).context("Failed to dump records")?;
    out.flush()?;
    Ok(())
}

pub fn find(path: &Path, field: &str, value: &str) -> Result<()> {
    let db = open(path)?;
    let index = db
        .field_index(field)
        .with_context(|| format!("Field '{}' not found", field))?;

    let found = db
        .find(0, index, value.as_bytes(), trimmed_eq)
        .context("Failed to search records")?;
    match found {
        Some(record) => {
            let mut out = BufWriter::new(io::stdout().lock());
            write!(out, "{}: ", record.index())?;
            write_record(&db, &record, &mut out)?;
            out.flush()?;
        }
        None => println!("no record with {} = '{}'", field, value),
    }
    Ok(())
}
