//! Field descriptor table parsing.

use std::borrow::Cow;
use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Range;

use super::constants::{
    FIELD_DESCRIPTOR_SIZE, FIELD_LENGTH_OFFSET, FIELD_NAME_LEN, FIELD_TERMINATOR,
    FIELD_TYPE_OFFSET, FILE_HEADER_SIZE, MAX_FIELDS,
};
use super::header::read_up_to;

/// The decoding rule selected by a field's type character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Character,
    Numeric,
    Date,
    Logical,
    DateTime,
    Memo,
    /// Any type character without a decoder.
    Other(u8),
}

impl FieldType {
    /// Map a type character, ignoring ASCII case.
    pub fn from_tag(tag: u8) -> Self {
        match tag.to_ascii_uppercase() {
            b'C' => Self::Character,
            b'N' => Self::Numeric,
            b'D' => Self::Date,
            b'L' => Self::Logical,
            b'T' => Self::DateTime,
            b'M' => Self::Memo,
            _ => Self::Other(tag),
        }
    }
}

/// One column of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: [u8; FIELD_NAME_LEN],
    tag: u8,
    len: u8,
    offset: usize,
}

impl Field {
    /// Build a descriptor from its 32 raw bytes and its offset in a record.
    fn from_descriptor(raw: &[u8; FIELD_DESCRIPTOR_SIZE], offset: usize) -> Self {
        let mut name = [0u8; FIELD_NAME_LEN];
        name.copy_from_slice(&raw[..FIELD_NAME_LEN]);
        Self {
            name,
            tag: raw[FIELD_TYPE_OFFSET],
            len: raw[FIELD_LENGTH_OFFSET],
            offset,
        }
    }

    /// The name bytes up to the first NUL. A full-width name has no NUL.
    pub fn name(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(FIELD_NAME_LEN);
        &self.name[..end]
    }

    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name())
    }

    /// The type character exactly as stored.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    pub fn kind(&self) -> FieldType {
        FieldType::from_tag(self.tag)
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Byte offset of the field from the start of a record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte range of the field inside a record.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len()
    }
}

/// The ordered, index-addressable list of a table's fields.
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    fields: Vec<Field>,
}

impl FieldTable {
    /// Parse descriptors until the 0x0D terminator or a short read.
    ///
    /// Offsets start at 1; byte 0 of every record is the deletion flag.
    pub fn parse<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut fields = Vec::new();
        let mut offset = 1;
        let mut raw = [0u8; FIELD_DESCRIPTOR_SIZE];

        loop {
            let n = read_up_to(reader, &mut raw)?;
            if n < FIELD_DESCRIPTOR_SIZE {
                if n > 0 {
                    tracing::debug!(read = n, "field descriptor block truncated");
                }
                break;
            }
            if raw[0] == FIELD_TERMINATOR {
                break;
            }
            if fields.len() == MAX_FIELDS {
                tracing::warn!("more than {} field descriptors, ignoring the rest", MAX_FIELDS);
                break;
            }

            let field = Field::from_descriptor(&raw, offset);
            offset += field.len();
            tracing::trace!(
                name = %field.name_lossy(),
                tag = %(field.tag as char),
                len = field.len(),
                offset = field.offset,
                "field descriptor"
            );
            fields.push(field);
        }

        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Index of the first field whose name equals `name` exactly.
    pub fn position(&self, name: &[u8]) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    /// Bytes covered by the deletion flag plus every field.
    pub fn span(&self) -> usize {
        self.fields.last().map_or(1, |f| f.offset + f.len())
    }
}

/// Read the field table that follows the 32-byte file header.
pub fn read_field_table<R: Read + Seek>(reader: &mut R) -> io::Result<FieldTable> {
    reader.seek(SeekFrom::Start(FILE_HEADER_SIZE as u64))?;
    FieldTable::parse(reader)
}
