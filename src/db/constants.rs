//! Constants used throughout the DBF and FPT parsing.

/// Size of the fixed table file header.
pub const FILE_HEADER_SIZE: usize = 32;

/// Offset of the three raw last-update bytes (years since 1900, month, day).
pub const LAST_UPDATE_OFFSET: usize = 1;

/// Offset of the record count (u32, little-endian) in the file header.
pub const RECORD_COUNT_OFFSET: usize = 4;

/// Offset of the header length (u16, little-endian), which is also the
/// offset of the first record.
pub const HEADER_LENGTH_OFFSET: usize = 8;

/// Offset of the record length (u16, little-endian).
pub const RECORD_LENGTH_OFFSET: usize = 10;

/// Offset of the encryption flag in the file header.
pub const ENCRYPTION_OFFSET: usize = 15;

/// Offset of the table flags byte in the file header.
pub const FLAGS_OFFSET: usize = 28;

/// Table flag bit announcing a companion memo file.
pub const FLAG_HAS_MEMO: u8 = 0x02;

/// Offset of the code page mark in the file header.
pub const CODE_PAGE_OFFSET: usize = 29;

/// Size of one field descriptor.
pub const FIELD_DESCRIPTOR_SIZE: usize = 32;

/// Width of the NUL-padded field name.
pub const FIELD_NAME_LEN: usize = 11;

/// Offset of the type character in a field descriptor.
pub const FIELD_TYPE_OFFSET: usize = 11;

/// Offset of the length byte in a field descriptor.
pub const FIELD_LENGTH_OFFSET: usize = 16;

/// Byte that ends the field descriptor block.
pub const FIELD_TERMINATOR: u8 = 0x0D;

/// The field count is stored in a single byte.
pub const MAX_FIELDS: usize = 255;

/// Size of the memo file header.
pub const MEMO_HEADER_SIZE: usize = 8;

/// Offset of the block size (u16, big-endian) in the memo file header.
pub const MEMO_BLOCK_SIZE_OFFSET: usize = 6;

/// Size of the header in front of every memo block.
pub const MEMO_BLOCK_HEADER_SIZE: usize = 8;

/// Offset of the payload length (u32, big-endian) in a memo block header.
pub const MEMO_LENGTH_OFFSET: usize = 4;

/// Deletion marker stored in byte 0 of a deleted record.
pub const DELETED_MARKER: u8 = b'*';
