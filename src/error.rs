//! Error type for the DBF reader.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that cannot be expressed as an absent value.
///
/// Decoding never fails; unreadable or blank data decodes to an absent
/// value instead. Errors are limited to opening a table and to misuse of a
/// handle's single iterator and find buffers.
#[derive(Debug, Error)]
pub enum DbfError {
    /// The table file itself could not be opened.
    #[error("cannot open table {}: {}", path.display(), source)]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error while loading the header, fields or records.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A traversal tried to claim a buffer that another traversal on the
    /// same handle still holds.
    #[error("{resource} buffer of this table is already in use")]
    Busy { resource: &'static str },
}

pub type Result<T> = std::result::Result<T, DbfError>;
