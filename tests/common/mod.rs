//! Builders of in memory tables and memo files used by the integration tests.
#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use dbfreader::{Table, TableOptions};

pub const FOXPRO: u8 = 0x30;
pub const DBASE_3: u8 = 0x03;

const HEADER_SIZE: usize = 32;
const DESCRIPTOR_SIZE: usize = 32;
const BACKLINK_SIZE: usize = 263;

struct FieldSpec {
    name: String,
    code: u8,
    length: u8,
    decimals: u8,
}

/// Builds the bytes of a `.dbf` file
pub struct DbfBuilder {
    version: u8,
    fields: Vec<FieldSpec>,
    records: Vec<Vec<u8>>,
}

impl DbfBuilder {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            fields: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn field(mut self, name: &str, code: char, length: u8, decimals: u8) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_owned(),
            code: code as u8,
            length,
            decimals,
        });
        self
    }

    /// Adds a record, text values shorter than their field are padded with spaces
    pub fn record(mut self, deleted: bool, values: &[&[u8]]) -> Self {
        assert_eq!(values.len(), self.fields.len(), "one value per field");
        let mut bytes = vec![if deleted { b'*' } else { b' ' }];
        for (value, spec) in values.iter().zip(&self.fields) {
            assert!(value.len() <= spec.length as usize, "value too long for {}", spec.name);
            let start = bytes.len();
            bytes.extend_from_slice(value);
            bytes.resize(start + spec.length as usize, b' ');
        }
        self.records.push(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut header_length = HEADER_SIZE + DESCRIPTOR_SIZE * self.fields.len() + 1;
        if matches!(self.version, 0x30..=0x32) {
            header_length += BACKLINK_SIZE;
        }
        let record_size = 1 + self.fields.iter().map(|f| f.length as usize).sum::<usize>();

        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[0] = self.version;
        bytes[1..4].copy_from_slice(&[124, 7, 20]);
        bytes[4..8].copy_from_slice(&(self.records.len() as u32).to_le_bytes());
        bytes[8..10].copy_from_slice(&(header_length as u16).to_le_bytes());
        bytes[10..12].copy_from_slice(&(record_size as u16).to_le_bytes());
        bytes[29] = 0x03;

        let mut displacement = 1u32;
        for spec in &self.fields {
            let mut descriptor = [0u8; DESCRIPTOR_SIZE];
            descriptor[..spec.name.len()].copy_from_slice(spec.name.as_bytes());
            descriptor[11] = spec.code;
            descriptor[12..16].copy_from_slice(&displacement.to_le_bytes());
            descriptor[16] = spec.length;
            descriptor[17] = spec.decimals;
            bytes.extend_from_slice(&descriptor);
            displacement += u32::from(spec.length);
        }
        bytes.push(0x0D);
        bytes.resize(header_length, 0);

        for record in &self.records {
            bytes.extend_from_slice(record);
        }
        bytes.push(0x1A);
        bytes
    }

    pub fn open(&self) -> Table<Cursor<Vec<u8>>> {
        self.open_with(TableOptions::default())
    }

    pub fn open_with(&self, options: TableOptions) -> Table<Cursor<Vec<u8>>> {
        Table::open(Cursor::new(self.build()), options).unwrap()
    }
}

/// Builds a FoxPro memo file (`.fpt`) holding `memos`,
/// returns it along with the block index of each memo
pub fn fpt(block_size: u16, memos: &[&[u8]]) -> (Vec<u8>, Vec<u32>) {
    let block_size = block_size as usize;
    let mut bytes = vec![0u8; 512];
    let mut indices = Vec::with_capacity(memos.len());
    for memo in memos {
        indices.push((bytes.len() / block_size) as u32);
        let start = bytes.len();
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&(memo.len() as u32).to_be_bytes());
        bytes.extend_from_slice(memo);
        let used = bytes.len() - start;
        bytes.resize(start + used.div_ceil(block_size) * block_size, 0);
    }
    let next_free = (bytes.len() / block_size) as u32;
    bytes[0..4].copy_from_slice(&next_free.to_be_bytes());
    bytes[6..8].copy_from_slice(&(block_size as u16).to_be_bytes());
    (bytes, indices)
}

/// Little endian bytes of a FoxPro DateTime
pub fn date_time(julian_day: i32, milliseconds: i32) -> Vec<u8> {
    let mut bytes = julian_day.to_le_bytes().to_vec();
    bytes.extend_from_slice(&milliseconds.to_le_bytes());
    bytes
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
