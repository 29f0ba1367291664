//! Block reader for the FPT memo file.

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use bytes::Buf;

use super::constants::{MEMO_BLOCK_HEADER_SIZE, MEMO_LENGTH_OFFSET};
use super::header::{read_memo_header, MemoHeader};

/// An open memo file and its parsed header.
///
/// Lookups take `&self`; the reader sits behind a `RefCell` because every
/// lookup seeks.
#[derive(Debug)]
pub struct MemoFile<R = File> {
    reader: RefCell<R>,
    header: MemoHeader,
}

impl<R: Read + Seek> MemoFile<R> {
    pub fn new(mut reader: R) -> io::Result<Self> {
        let header = read_memo_header(&mut reader)?;
        tracing::debug!(
            next_free = header.next_free,
            block_size = header.block_size,
            "memo header"
        );
        Ok(Self {
            reader: RefCell::new(reader),
            header,
        })
    }

    pub fn header(&self) -> MemoHeader {
        self.header
    }

    /// Read the payload of memo block `block` into `buf`.
    ///
    /// Returns the payload length, truncated to `buf.len()`. An empty `buf`
    /// probes: nothing is copied and the full declared length is returned.
    /// Block 0 and any seek or read failure yield 0.
    pub fn read_block(&self, block: u32, buf: &mut [u8]) -> usize {
        if block == 0 {
            return 0;
        }
        match self.try_read_block(block, buf) {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(block, error = %e, "memo block unreadable");
                0
            }
        }
    }

    fn try_read_block(&self, block: u32, buf: &mut [u8]) -> io::Result<usize> {
        let mut reader = self
            .reader
            .try_borrow_mut()
            .map_err(|_| io::Error::other("memo reader already in use"))?;

        let offset = block as u64 * self.header.block_size as u64;
        reader.seek(SeekFrom::Start(offset))?;

        let mut block_header = [0u8; MEMO_BLOCK_HEADER_SIZE];
        reader.read_exact(&mut block_header)?;
        let declared = (&block_header[MEMO_LENGTH_OFFSET..]).get_u32() as usize;

        if buf.is_empty() {
            return Ok(declared);
        }
        let len = declared.min(buf.len());
        reader.read_exact(&mut buf[..len])?;
        Ok(len)
    }

    /// Probe the block length, then read the whole payload.
    ///
    /// A declared length running past the end of the file cannot be read in
    /// full, so it yields an empty payload without allocating for it.
    pub fn read_payload(&self, block: u32) -> Vec<u8> {
        let declared = self.read_block(block, &mut []);
        if declared == 0 {
            return Vec::new();
        }
        let room = self.payload_room(block).unwrap_or(0);
        if declared as u64 > room {
            tracing::debug!(block, declared, room, "memo length exceeds file");
            return Vec::new();
        }

        let mut payload = vec![0u8; declared];
        let len = self.read_block(block, &mut payload);
        payload.truncate(len);
        payload
    }

    /// Bytes between the payload start of `block` and the end of the file.
    fn payload_room(&self, block: u32) -> io::Result<u64> {
        let mut reader = self
            .reader
            .try_borrow_mut()
            .map_err(|_| io::Error::other("memo reader already in use"))?;
        let end = reader.seek(SeekFrom::End(0))?;
        let start = block as u64 * self.header.block_size as u64 + MEMO_BLOCK_HEADER_SIZE as u64;
        Ok(end.saturating_sub(start))
    }
}
