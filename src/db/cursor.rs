//! Sequential traversal and linear search over the records of a table.
//!
//! A table owns one iterator buffer and one find buffer. A traversal claims
//! its buffer for as long as it runs (a [`Found`] keeps the find buffer
//! claimed until it is dropped), and a second claim on the same table fails
//! with [`DbfError::Busy`]. Nesting traversals over *different* tables, for
//! example a find on one table from inside an iteration over another, is
//! fine.

use std::cell::{Ref, RefMut};
use std::ops::{ControlFlow, Deref};

use crate::error::{DbfError, Result};

use super::database::Database;
use super::value::FieldValue;

/// A record handed to an iteration callback.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    index: u32,
    data: &'a [u8],
}

impl<'a> Record<'a> {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn is_deleted(&self) -> bool {
        Database::is_deleted(self.data)
    }
}

/// A record returned by [`Database::find`].
///
/// Borrows the table's find buffer; drop it before the next find on the
/// same table.
#[derive(Debug)]
pub struct Found<'db> {
    index: u32,
    data: Ref<'db, [u8]>,
}

impl Found<'_> {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_deleted(&self) -> bool {
        Database::is_deleted(&self.data)
    }
}

impl Deref for Found<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

/// An iteration over every record of a table.
///
/// Created by [`Database::cursor`], run by [`Cursor::start`], torn down by
/// [`Cursor::finish`] or by dropping it.
pub struct Cursor<'db, F> {
    db: &'db Database,
    buf: RefMut<'db, Vec<u8>>,
    callback: F,
}

impl<F> Cursor<'_, F>
where
    F: FnMut(&Record<'_>) -> ControlFlow<()>,
{
    /// Visit records in index order, up to the last one present in the file.
    ///
    /// Stops at the first callback that breaks and returns its result.
    /// Records that cannot be read are skipped.
    pub fn start(&mut self) -> ControlFlow<()> {
        let len = self.db.record_len();
        for index in 0..self.db.readable_records() {
            if !self.db.read_record(index, &mut self.buf) {
                continue;
            }
            let record = Record {
                index,
                data: &self.buf[..len],
            };
            if (self.callback)(&record).is_break() {
                tracing::trace!(index, "iteration stopped by callback");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Release the iterator buffer.
    pub fn finish(self) {}
}

impl Database {
    /// Claim the iterator buffer and bind `callback` to it.
    ///
    /// Fails with [`DbfError::Busy`] while another cursor on this table is
    /// alive, including from inside that cursor's own callback.
    pub fn cursor<F>(&self, callback: F) -> Result<Cursor<'_, F>>
    where
        F: FnMut(&Record<'_>) -> ControlFlow<()>,
    {
        let mut buf = self
            .iter_buf
            .try_borrow_mut()
            .map_err(|_| DbfError::Busy {
                resource: "iterator",
            })?;
        buf.resize(self.record_len(), 0);
        Ok(Cursor {
            db: self,
            buf,
            callback,
        })
    }

    /// Run `callback` over every record; see [`Cursor::start`].
    pub fn iterate<F>(&self, callback: F) -> Result<ControlFlow<()>>
    where
        F: FnMut(&Record<'_>) -> ControlFlow<()>,
    {
        let mut cursor = self.cursor(callback)?;
        let flow = cursor.start();
        cursor.finish();
        Ok(flow)
    }

    /// Find the first record at or after `start` whose field `field` matches.
    ///
    /// Each candidate's field is decoded and passed to `predicate` together
    /// with `target`; the decoded value is released before moving on.
    ///
    /// # Arguments
    ///
    /// * `start` - Index of the first record to test
    /// * `field` - Index of the field to decode and test
    /// * `target` - Bytes handed to `predicate` alongside each decoded value
    /// * `predicate` - Match test, for example [`trimmed_eq`]
    ///
    /// # Returns
    ///
    /// Returns the first matching record, `None` when no record matches, or
    /// [`DbfError::Busy`] while this table's find buffer is still claimed.
    pub fn find<P>(
        &self,
        start: u32,
        field: usize,
        target: &[u8],
        mut predicate: P,
    ) -> Result<Option<Found<'_>>>
    where
        P: FnMut(&FieldValue, &[u8]) -> bool,
    {
        let busy = || DbfError::Busy { resource: "find" };

        let hit = {
            let mut buf = self.find_buf.try_borrow_mut().map_err(|_| busy())?;
            buf.resize(self.record_len(), 0);

            let mut hit = None;
            for index in start..self.readable_records() {
                if !self.read_record(index, &mut buf) {
                    continue;
                }
                let value = self.decode_field(&buf, field);
                let matched = predicate(&value, target);
                value.release();
                if matched {
                    hit = Some(index);
                    break;
                }
            }
            hit
        };

        let Some(index) = hit else {
            return Ok(None);
        };
        let buf = self.find_buf.try_borrow().map_err(|_| busy())?;
        Ok(Some(Found {
            index,
            data: Ref::map(buf, |b| b.as_slice()),
        }))
    }
}

/// Predicate for [`Database::find`]: the decoded value, with trailing
/// spaces trimmed, equals the target exactly.
pub fn trimmed_eq(value: &FieldValue, target: &[u8]) -> bool {
    let bytes = value.as_bytes();
    let end = bytes.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
    !value.is_absent() && &bytes[..end] == target
}
