//! DBF table and FPT memo file reading.

mod cache;
mod constants;
mod cursor;
mod database;
mod dump;
mod field;
mod header;
mod julian;
mod memo;
mod value;

// Re-export public API
pub use cursor::{trimmed_eq, Cursor, Found, Record};
pub use database::{Database, DbInfo, OpenOptions};
pub use dump::{dump_fields, dump_records, write_record};
pub use field::{Field, FieldTable, FieldType};
pub use header::{FileHeader, MemoHeader};
pub use julian::DateTime;
pub use memo::MemoFile;
pub use value::{FieldValue, Payload};
