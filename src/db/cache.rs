//! In-memory copy of the whole record area.

use bytes::Bytes;
use std::io::{self, Read, Seek, SeekFrom};

use super::header::{read_up_to, FileHeader};

/// Every record of the table, loaded once at open time.
///
/// Records are fixed-length and stored back to back, so record `i` lives
/// at `i * record_len`.
#[derive(Debug, Clone, Default)]
pub struct RecordCache {
    data: Bytes,
    record_len: usize,
    record_count: u32,
    loaded: bool,
}

impl RecordCache {
    /// Read `record_count * record_len` bytes starting at the header length.
    ///
    /// The buffer never outgrows the bytes actually present after the header,
    /// so a header that overstates the record count cannot force a large
    /// allocation. A partial final record reads as zero past the end of the
    /// file; records lying wholly beyond it are not read. If the buffer
    /// cannot be allocated the cache stays unloaded and every lookup reports
    /// "not read".
    ///
    /// # Arguments
    ///
    /// * `reader` - The table file, positioned anywhere
    /// * `header` - The already parsed table header
    ///
    /// # Returns
    ///
    /// Returns the cache, or an error if seeking or reading fails.
    pub fn load<R: Read + Seek>(reader: &mut R, header: &FileHeader) -> io::Result<Self> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        let present = file_len.saturating_sub(header.header_len as u64);
        let record_len = header.record_len as u64;
        let available = if record_len == 0 {
            header.record_count
        } else {
            let whole = present.div_ceil(record_len);
            u32::try_from(whole).map_or(header.record_count, |n| n.min(header.record_count))
        };
        if available < header.record_count {
            tracing::debug!(
                declared = header.record_count,
                available,
                "record area truncated"
            );
        }

        let area = available as u64 * record_len;
        let mut buf = Vec::new();
        let reserved = usize::try_from(area)
            .ok()
            .filter(|&size| buf.try_reserve_exact(size).is_ok());
        let Some(size) = reserved else {
            tracing::warn!(bytes = area, "cannot allocate record cache, records unavailable");
            return Ok(Self::default());
        };
        buf.resize(size, 0);

        reader.seek(SeekFrom::Start(header.header_len as u64))?;
        read_up_to(reader, &mut buf)?;

        Ok(Self {
            data: Bytes::from(buf),
            record_len: header.record_len as usize,
            record_count: available,
            loaded: true,
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of records backed by bytes of the file; 0 when unloaded.
    pub fn cached_records(&self) -> u32 {
        if self.loaded { self.record_count } else { 0 }
    }

    fn span(&self, index: u32) -> Option<std::ops::Range<usize>> {
        if !self.loaded || index >= self.record_count {
            return None;
        }
        let start = index as usize * self.record_len;
        Some(start..start + self.record_len)
    }

    /// Zero-copy view of record `index`.
    pub fn record(&self, index: u32) -> Option<Bytes> {
        self.span(index).map(|range| self.data.slice(range))
    }

    /// Copy record `index` into the front of `dest`.
    ///
    /// Returns false when the index is out of range, the cache is unloaded
    /// or `dest` is shorter than one record.
    pub fn read(&self, index: u32, dest: &mut [u8]) -> bool {
        match self.span(index) {
            Some(range) if dest.len() >= self.record_len => {
                dest[..self.record_len].copy_from_slice(&self.data[range]);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header(record_count: u32, record_len: u16, header_len: u16) -> FileHeader {
        FileHeader {
            record_count,
            record_len,
            header_len,
            ..FileHeader::default()
        }
    }

    #[test]
    fn loads_records_after_header() {
        let mut file = vec![0xEE; 4];
        file.extend_from_slice(b" AAA BBB*CCC");
        let cache = RecordCache::load(&mut Cursor::new(file), &header(3, 4, 4)).unwrap();

        assert!(cache.is_loaded());
        assert_eq!(&cache.record(0).unwrap()[..], b" AAA");
        assert_eq!(&cache.record(2).unwrap()[..], b"*CCC");
        assert!(cache.record(3).is_none());

        let mut dest = [0u8; 4];
        assert!(cache.read(1, &mut dest));
        assert_eq!(&dest, b" BBB");
        assert!(!cache.read(3, &mut dest));
        assert!(!cache.read(0, &mut [0u8; 2]));
    }

    #[test]
    fn truncated_area_reads_as_zero() {
        let cache = RecordCache::load(&mut Cursor::new(b"xyz".to_vec()), &header(3, 2, 0)).unwrap();
        assert_eq!(&cache.record(0).unwrap()[..], b"xy");
        assert_eq!(&cache.record(1).unwrap()[..], &[b'z', 0]);
        assert!(cache.record(2).is_none());
        assert_eq!(cache.data.len(), 4);
    }

    #[test]
    fn overstated_record_count_is_bounded_by_file_size() {
        let mut file = vec![0u8; 32];
        file.extend_from_slice(b" AAA");
        let cache =
            RecordCache::load(&mut Cursor::new(file), &header(1_000_000, 1000, 32)).unwrap();

        assert!(cache.is_loaded());
        assert_eq!(cache.data.len(), 1000);
        assert_eq!(&cache.record(0).unwrap()[..4], b" AAA");
        assert!(cache.record(1).is_none());
        assert!(cache.record(999_999).is_none());
        assert_eq!(cache.cached_records(), 1);
    }

    #[test]
    fn largest_declared_area_without_records_loads_nothing() {
        let cache =
            RecordCache::load(&mut Cursor::new(vec![0u8; 32]), &header(u32::MAX, u16::MAX, 32))
                .unwrap();
        assert!(cache.record(0).is_none());
        assert!(!cache.read(0, &mut vec![0u8; u16::MAX as usize]));
    }

    #[test]
    fn unloaded_cache_reads_nothing() {
        let cache = RecordCache::default();
        assert!(!cache.is_loaded());
        assert!(cache.record(0).is_none());
        assert!(!cache.read(0, &mut [0u8; 8]));
    }
}
