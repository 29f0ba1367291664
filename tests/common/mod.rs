//! Builders for DBF and FPT fixtures written to a temporary directory.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub struct TableBuilder {
    fields: Vec<([u8; 11], u8, u8)>,
    records: Vec<(bool, Vec<Vec<u8>>)>,
    memo: bool,
    terminated: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            records: Vec::new(),
            memo: false,
            terminated: true,
        }
    }

    pub fn field(mut self, name: &str, tag: u8, len: u8) -> Self {
        let mut raw = [0u8; 11];
        raw[..name.len()].copy_from_slice(name.as_bytes());
        self.fields.push((raw, tag, len));
        self
    }

    /// Values are space-padded to their field length.
    pub fn record(mut self, values: &[&[u8]]) -> Self {
        self.records
            .push((false, values.iter().map(|v| v.to_vec()).collect()));
        self
    }

    pub fn deleted_record(mut self, values: &[&[u8]]) -> Self {
        self.records
            .push((true, values.iter().map(|v| v.to_vec()).collect()));
        self
    }

    pub fn with_memo(mut self) -> Self {
        self.memo = true;
        self
    }

    /// Leave out the 0x0D terminator after the descriptors.
    pub fn unterminated(mut self) -> Self {
        self.terminated = false;
        self
    }

    pub fn record_len(&self) -> usize {
        1 + self.fields.iter().map(|f| f.2 as usize).sum::<usize>()
    }

    pub fn bytes(&self) -> Vec<u8> {
        let header_len = 32 + 32 * self.fields.len() + usize::from(self.terminated);
        let record_len = self.record_len();

        let mut out = vec![0u8; 32];
        out[0] = 0x30;
        out[1..4].copy_from_slice(&[118, 10, 17]);
        out[4..8].copy_from_slice(&(self.records.len() as u32).to_le_bytes());
        out[8..10].copy_from_slice(&(header_len as u16).to_le_bytes());
        out[10..12].copy_from_slice(&(record_len as u16).to_le_bytes());
        out[28] = if self.memo { 0x02 } else { 0x00 };
        out[29] = 0x03;

        for (name, tag, len) in &self.fields {
            let mut raw = [0u8; 32];
            raw[..11].copy_from_slice(name);
            raw[11] = *tag;
            raw[16] = *len;
            out.extend_from_slice(&raw);
        }
        if self.terminated {
            out.push(0x0D);
        }

        for (deleted, values) in &self.records {
            out.push(if *deleted { b'*' } else { b' ' });
            for (i, (_, _, len)) in self.fields.iter().enumerate() {
                let mut cell = values.get(i).cloned().unwrap_or_default();
                cell.resize(*len as usize, b' ');
                out.extend_from_slice(&cell);
            }
        }
        out
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.bytes()).unwrap();
        path
    }
}

/// An FPT file with the given payloads at the given block indices.
pub fn memo_file(block_size: u16, blocks: &[(u32, &[u8])]) -> Vec<u8> {
    let next_free = blocks.iter().map(|b| b.0 + 1).max().unwrap_or(1);
    let mut out = vec![0u8; block_size as usize];
    out[0..4].copy_from_slice(&next_free.to_be_bytes());
    out[6..8].copy_from_slice(&block_size.to_be_bytes());

    for (block, payload) in blocks {
        let start = *block as usize * block_size as usize;
        let end = start + 8 + payload.len();
        if out.len() < end {
            out.resize(end, 0);
        }
        out[start..start + 4].copy_from_slice(&1u32.to_be_bytes());
        out[start + 4..start + 8].copy_from_slice(&(payload.len() as u32).to_be_bytes());
        out[start + 8..end].copy_from_slice(payload);
    }
    out
}

pub fn block_ref(block: u32) -> Vec<u8> {
    block.to_le_bytes().to_vec()
}
