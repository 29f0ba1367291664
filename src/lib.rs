//! # dbf-reader
//!
//! Read-only access to DBF tables and their FPT memo files.
//!
//! A table is loaded whole at open time; records are then decoded field by
//! field, walked with a callback, or searched linearly.
//!
//! ```no_run
//! use std::ops::ControlFlow;
//! use dbf_reader::Database;
//!
//! let db = Database::open("CUST.DBF")?;
//! let name = db.field_index("NAME").unwrap_or(0);
//! db.iterate(|record| {
//!     println!("{}", db.decode_field(record.data(), name).to_string_lossy());
//!     ControlFlow::Continue(())
//! })?;
//! # Ok::<(), dbf_reader::DbfError>(())
//! ```
pub mod db;
pub mod error;

pub use db::{Database, DbInfo, FieldValue, OpenOptions, Payload, Record};
pub use error::{DbfError, Result};
