//! Header parsing for the DBF table file and its FPT memo file.

use bytes::Buf;
use std::io::{self, Read, Seek, SeekFrom};

use super::constants::{
    CODE_PAGE_OFFSET, ENCRYPTION_OFFSET, FILE_HEADER_SIZE, FLAG_HAS_MEMO, FLAGS_OFFSET,
    HEADER_LENGTH_OFFSET, LAST_UPDATE_OFFSET, MEMO_BLOCK_SIZE_OFFSET, MEMO_HEADER_SIZE,
    RECORD_COUNT_OFFSET, RECORD_LENGTH_OFFSET,
};

/// The fixed 32-byte header at the start of a table file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileHeader {
    pub kind: u8,
    /// Raw year-offset, month and day bytes. Not validated.
    pub last_update: [u8; 3],
    pub record_count: u32,
    /// Length of header plus field descriptors, i.e. the offset of record 0.
    pub header_len: u16,
    pub record_len: u16,
    pub encryption: u8,
    pub flags: u8,
    pub code_page: u8,
}

impl FileHeader {
    /// Decode a header from its 32 raw bytes.
    pub fn parse(raw: &[u8; FILE_HEADER_SIZE]) -> Self {
        let mut last_update = [0u8; 3];
        (&raw[LAST_UPDATE_OFFSET..]).copy_to_slice(&mut last_update);

        Self {
            kind: raw[0],
            last_update,
            record_count: (&raw[RECORD_COUNT_OFFSET..]).get_u32_le(),
            header_len: (&raw[HEADER_LENGTH_OFFSET..]).get_u16_le(),
            record_len: (&raw[RECORD_LENGTH_OFFSET..]).get_u16_le(),
            encryption: raw[ENCRYPTION_OFFSET],
            flags: raw[FLAGS_OFFSET],
            code_page: raw[CODE_PAGE_OFFSET],
        }
    }

    /// Whether the table announces a companion memo file.
    pub fn has_memo(&self) -> bool {
        self.flags & FLAG_HAS_MEMO != 0
    }

    /// Size in bytes of the whole record area.
    pub fn record_area_len(&self) -> u64 {
        self.record_count as u64 * self.record_len as u64
    }
}

/// The 8-byte header at the start of a memo file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoHeader {
    pub next_free: u32,
    pub block_size: u16,
}

impl MemoHeader {
    /// Decode a memo header. Both integers are big-endian.
    pub fn parse(raw: &[u8; MEMO_HEADER_SIZE]) -> Self {
        Self {
            next_free: (&raw[..]).get_u32(),
            block_size: (&raw[MEMO_BLOCK_SIZE_OFFSET..]).get_u16(),
        }
    }
}

/// Fill `buf` from `reader` until it is full or the stream ends.
///
/// Returns the number of bytes read. A short count is not an error; the
/// unread tail of `buf` is left untouched.
pub(crate) fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read the table file header at offset 0.
///
/// A truncated file yields a header whose missing bytes are zero.
///
/// # Arguments
///
/// * `reader` - The opened table file
///
/// # Returns
///
/// Returns the parsed header, or an error if seeking or reading fails.
pub fn read_file_header<R: Read + Seek>(reader: &mut R) -> io::Result<FileHeader> {
    let mut raw = [0u8; FILE_HEADER_SIZE];
    reader.seek(SeekFrom::Start(0))?;
    let n = read_up_to(reader, &mut raw)?;
    if n < FILE_HEADER_SIZE {
        tracing::debug!(read = n, "short table header, missing bytes read as zero");
    }
    Ok(FileHeader::parse(&raw))
}

/// Read the memo file header at offset 0.
///
/// The next free block and the block size are both big-endian, unlike the
/// table header.
///
/// # Arguments
///
/// * `reader` - The opened memo file
///
/// # Returns
///
/// Returns the parsed header, or an error if seeking or reading fails.
pub fn read_memo_header<R: Read + Seek>(reader: &mut R) -> io::Result<MemoHeader> {
    let mut raw = [0u8; MEMO_HEADER_SIZE];
    reader.seek(SeekFrom::Start(0))?;
    let n = read_up_to(reader, &mut raw)?;
    if n < MEMO_HEADER_SIZE {
        tracing::debug!(read = n, "short memo header, missing bytes read as zero");
    }
    Ok(MemoHeader::parse(&raw))
}
