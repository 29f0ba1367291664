//! Typed decoding of a single field out of a raw record.

use std::borrow::Cow;
use std::io::{Read, Seek};

use super::field::{Field, FieldType};
use super::julian::DateTime;
use super::memo::MemoFile;

/// Decoded bytes of a present field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Character, Numeric, Date, Logical and DateTime fields. Raw bytes in
    /// the table's code page, not transcoded.
    Text(Vec<u8>),
    /// Memo contents.
    Binary(Vec<u8>),
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(bytes) | Payload::Binary(bytes) => bytes,
        }
    }
}

/// The decoded value of one field in one record.
///
/// Owns its payload; dropping the value releases it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    tag: u8,
    payload: Option<Payload>,
}

impl FieldValue {
    /// A blank, unsupported or unreadable field.
    pub fn absent(tag: u8) -> Self {
        Self { tag, payload: None }
    }

    fn text(tag: u8, bytes: Vec<u8>) -> Self {
        Self {
            tag,
            payload: Some(Payload::Text(bytes)),
        }
    }

    /// The type character of the field this value came from, as stored.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn is_absent(&self) -> bool {
        self.payload.is_none()
    }

    /// Payload length in bytes; 0 when absent.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The payload bytes, empty when absent.
    pub fn as_bytes(&self) -> &[u8] {
        self.payload
            .as_ref()
            .map(Payload::as_bytes)
            .unwrap_or_default()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    pub fn into_payload(self) -> Option<Payload> {
        self.payload
    }

    /// Release the payload now rather than at the end of the scope.
    pub fn release(self) {}
}

/// Decode `field` out of `record`.
///
/// Never fails: blank fields, unknown types, records too short for the
/// field and unreadable memo blocks all decode to an absent value.
pub fn decode<R: Read + Seek>(
    field: &Field,
    record: &[u8],
    memo: Option<&MemoFile<R>>,
) -> FieldValue {
    let tag = field.tag();
    let Some(raw) = record.get(field.range()) else {
        return FieldValue::absent(tag);
    };

    match field.kind() {
        FieldType::Character => FieldValue::text(tag, decode_character(raw)),
        FieldType::Numeric => match raw.last() {
            Some(&last) if last != b' ' => FieldValue::text(tag, raw.to_vec()),
            _ => FieldValue::absent(tag),
        },
        FieldType::Date => match raw {
            [y1, y2, y3, y4, m1, m2, d1, d2, ..] if *y1 != b' ' => {
                FieldValue::text(tag, vec![*y1, *y2, *y3, *y4, b'/', *m1, *m2, b'/', *d1, *d2])
            }
            _ => FieldValue::absent(tag),
        },
        FieldType::Logical => match raw.first() {
            Some(b) => FieldValue::text(tag, vec![b.to_ascii_uppercase()]),
            None => FieldValue::absent(tag),
        },
        FieldType::DateTime => match raw.first_chunk::<8>() {
            Some(chunk) if chunk[0] != 0 && chunk[0] != b' ' => {
                let stamp = DateTime::from_le_bytes(*chunk);
                FieldValue::text(tag, stamp.to_string().into_bytes())
            }
            _ => FieldValue::absent(tag),
        },
        FieldType::Memo => decode_memo(tag, raw, memo),
        FieldType::Other(_) => FieldValue::absent(tag),
    }
}

/// Cut at the first NUL, strip trailing spaces, then re-append a single
/// space when more than one byte is left.
fn decode_character(raw: &[u8]) -> Vec<u8> {
    let text = match raw.iter().position(|&b| b == 0) {
        Some(nul) => &raw[..nul],
        None => raw,
    };
    let end = text.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);

    let mut out = Vec::with_capacity(end + 1);
    out.extend_from_slice(&text[..end]);
    if out.len() > 1 {
        out.push(b' ');
    }
    out
}

/// Memo payloads carry the same single trailing space as character fields.
fn decode_memo<R: Read + Seek>(tag: u8, raw: &[u8], memo: Option<&MemoFile<R>>) -> FieldValue {
    let Some(block) = raw.first_chunk::<4>().map(|b| u32::from_le_bytes(*b)) else {
        return FieldValue::absent(tag);
    };
    let Some(memo) = memo.filter(|_| block != 0) else {
        return FieldValue::absent(tag);
    };

    let mut payload = memo.read_payload(block);
    payload.push(b' ');
    FieldValue {
        tag,
        payload: Some(Payload::Binary(payload)),
    }
}
