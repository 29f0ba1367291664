//! Database handle for a DBF table.

use bytes::Bytes;
use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{DbfError, Result};

use super::cache::RecordCache;
use super::constants::DELETED_MARKER;
use super::field::{read_field_table, Field, FieldTable};
use super::header::{read_file_header, FileHeader, MemoHeader};
use super::memo::MemoFile;
use super::value::{decode, FieldValue};

/// Summary of the table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbInfo {
    pub kind: u8,
    /// Raw year-offset, month and day bytes.
    pub last_update: [u8; 3],
    pub header_len: u16,
    pub record_count: u32,
    pub record_len: u16,
    pub encrypted: bool,
    pub code_page: u8,
}

/// Options for opening a table.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    memo: bool,
    memo_path: Option<PathBuf>,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            memo: true,
            memo_path: None,
        }
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether to open the companion memo file when the table flags one.
    /// With `false`, every memo field decodes as absent.
    pub fn memo(&mut self, memo: bool) -> &mut Self {
        self.memo = memo;
        self
    }

    /// Read memo blocks from `path` instead of the file next to the table.
    pub fn memo_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.memo_path = Some(path.into());
        self
    }

    /// Open the table at `path` and load all of its records.
    ///
    /// Reads the header, opens the companion memo file when the header flags
    /// one, parses the field descriptors and fills the record cache.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the `.dbf` table file
    ///
    /// # Returns
    ///
    /// Returns the open table, or [`DbfError::Open`] if the file cannot be
    /// opened and [`DbfError::Io`] if it cannot be read.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Database> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DbfError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        let header = read_file_header(&mut reader)?;
        let memo = if header.has_memo() && self.memo {
            self.open_memo(path)
        } else {
            None
        };
        let fields = read_field_table(&mut reader)?;
        let cache = RecordCache::load(&mut reader, &header)?;

        tracing::debug!(
            path = %path.display(),
            records = header.record_count,
            record_len = header.record_len,
            fields = fields.len(),
            memo = memo.is_some(),
            cached = cache.is_loaded(),
            "opened table"
        );

        Ok(Database {
            path: path.to_path_buf(),
            header,
            fields,
            cache,
            memo,
            iter_buf: RefCell::new(Vec::new()),
            find_buf: RefCell::new(Vec::new()),
        })
    }

    /// A missing or unreadable memo file is only worth a warning.
    fn open_memo(&self, table: &Path) -> Option<MemoFile> {
        let candidates = match &self.memo_path {
            Some(path) => vec![path.clone()],
            None => memo_candidates(table),
        };

        for candidate in &candidates {
            let Ok(file) = File::open(candidate) else {
                continue;
            };
            match MemoFile::new(file) {
                Ok(memo) => return Some(memo),
                Err(e) => {
                    tracing::warn!(path = %candidate.display(), error = %e, "memo file unreadable");
                    return None;
                }
            }
        }

        tracing::warn!(table = %table.display(), "memo file missing");
        None
    }
}

/// `FPT` next to the table, trying the case of the table's own extension
/// first.
fn memo_candidates(table: &Path) -> Vec<PathBuf> {
    let lower = table
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.chars().all(|c| !c.is_ascii_uppercase()));
    let order = if lower { ["fpt", "FPT"] } else { ["FPT", "fpt"] };
    order.iter().map(|ext| table.with_extension(ext)).collect()
}

/// An open DBF table.
///
/// Header, fields and records are read once by [`Database::open`] and never
/// change afterwards.
#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    header: FileHeader,
    fields: FieldTable,
    cache: RecordCache,
    memo: Option<MemoFile>,
    /// Claimed by a live [`Cursor`](super::Cursor).
    pub(super) iter_buf: RefCell<Vec<u8>>,
    /// Claimed by a running find and by the [`Found`](super::Found) it returns.
    pub(super) find_buf: RefCell<Vec<u8>>,
}

impl Database {
    /// Open a table with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        OpenOptions::new().open(path)
    }

    /// Close the table, releasing the record cache and the memo file.
    pub fn close(self) {
        tracing::debug!(path = %self.path.display(), "closed table");
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn info(&self) -> DbInfo {
        DbInfo {
            kind: self.header.kind,
            last_update: self.header.last_update,
            header_len: self.header.header_len,
            record_count: self.header.record_count,
            record_len: self.header.record_len,
            encrypted: self.header.encryption != 0,
            code_page: self.header.code_page,
        }
    }

    /// The memo header, when a memo file is open.
    pub fn memo_header(&self) -> Option<MemoHeader> {
        self.memo.as_ref().map(MemoFile::header)
    }

    pub fn has_memo(&self) -> bool {
        self.memo.is_some()
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    /// Number of fields, at most 255.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Index of the field named exactly `name`.
    pub fn field_index(&self, name: impl AsRef<[u8]>) -> Option<usize> {
        self.fields.position(name.as_ref())
    }

    pub fn record_count(&self) -> u32 {
        self.header.record_count
    }

    /// Records actually present in the file, at most [`Database::record_count`].
    /// Traversals stop here since every later record reads as "not read".
    pub(super) fn readable_records(&self) -> u32 {
        self.cache.cached_records()
    }

    pub fn record_len(&self) -> usize {
        self.header.record_len as usize
    }

    /// Zero-copy view of record `index`, or `None` if it cannot be read.
    pub fn record(&self, index: u32) -> Option<Bytes> {
        self.cache.record(index)
    }

    /// Copy record `index` into `dest`. Returns false if nothing was read.
    pub fn read_record(&self, index: u32, dest: &mut [u8]) -> bool {
        self.cache.read(index, dest)
    }

    /// Whether the deletion flag of `record` is set.
    pub fn is_deleted(record: &[u8]) -> bool {
        record.first() == Some(&DELETED_MARKER)
    }

    /// Decode field `index` of `record`. An unknown index decodes as absent.
    pub fn decode_field(&self, record: &[u8], index: usize) -> FieldValue {
        match self.fields.get(index) {
            Some(field) => decode(field, record, self.memo.as_ref()),
            None => FieldValue::absent(0),
        }
    }

    /// Whether the raw bytes of field `index` start with `bytes`.
    ///
    /// False if the index is unknown or `bytes` is longer than the field.
    pub fn compare_field(&self, record: &[u8], index: usize, bytes: &[u8]) -> bool {
        let Some(field) = self.fields.get(index) else {
            return false;
        };
        if bytes.len() > field.len() {
            return false;
        }
        let start = field.offset();
        record.get(start..start + bytes.len()) == Some(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memo_candidates_follow_extension_case() {
        let lower = memo_candidates(Path::new("/data/ship.dbf"));
        assert_eq!(lower[0], Path::new("/data/ship.fpt"));
        assert_eq!(lower[1], Path::new("/data/ship.FPT"));

        let upper = memo_candidates(Path::new("CUST.DBF"));
        assert_eq!(upper[0], Path::new("CUST.FPT"));
    }

    #[test]
    fn deletion_marker() {
        assert!(Database::is_deleted(b"*ABC"));
        assert!(!Database::is_deleted(b" ABC"));
        assert!(!Database::is_deleted(b""));
    }

    #[test]
    fn missing_table_is_an_open_error() {
        let err = Database::open("/nonexistent/table.dbf").unwrap_err();
        assert!(matches!(err, DbfError::Open { .. }));
    }
}
