//! Read only access to the records of a FoxPro / dBase table.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::encoding::{DynEncoding, TableEncoding};
use crate::field::{DeletionFlag, DELETION_FLAG_SIZE};
use crate::header::{Header, BACKLINK_SIZE, TERMINATOR_VALUE};
use crate::memo::{MemoFileType, MemoReader};
use crate::ser::JsonRecord;
use crate::{Error, ErrorKind, FieldInfo, FieldType, FieldValue, Record};

/// Options used when opening a [Table]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    encoding: TableEncoding,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the encoding used to decode Character and Memo fields
    pub fn with_encoding(mut self, encoding: TableEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn encoding(&self) -> TableEncoding {
        self.encoding
    }
}

/// An opened table.
///
/// Records are read by index with [Table::record_at]. The table also keeps
/// a record pointer, moved with [Table::go_to] and [Table::skip], from which
/// single fields can be read with [Table::field].
pub struct Table<T> {
    source: T,
    memo_reader: Option<MemoReader<T>>,
    header: Header,
    fields: Vec<FieldInfo>,
    /// Position of each field inside a record, the deletion flag comes first
    field_offsets: Vec<usize>,
    encoding: DynEncoding,
    /// Holds the bytes of the last record read, deletion flag included
    record_buffer: Vec<u8>,
    position: usize,
}

impl<T> Table<T> {
    pub fn num_records(&self) -> usize {
        self.header.num_records as usize
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Returns the information about the fields of the records
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(FieldInfo::name).collect()
    }

    /// Date stored in the header, `None` if it is not a valid date
    pub fn last_update(&self) -> Option<time::Date> {
        self.header.last_update()
    }

    pub fn code_page_mark(&self) -> u8 {
        self.header.code_page_mark
    }

    /// Index of the record the pointer is on,
    /// equal to [Table::num_records] when past the last record
    pub fn position(&self) -> usize {
        self.position
    }

    /// True when the record pointer is past the last record
    pub fn eof(&self) -> bool {
        self.position >= self.num_records()
    }

    /// True when the record pointer is on the first record
    pub fn bof(&self) -> bool {
        self.position == 0
    }

    /// Moves the record pointer to the record at `index`.
    ///
    /// An index past the last record moves the pointer to the end
    /// of the table and returns an error.
    pub fn go_to(&mut self, index: usize) -> Result<(), Error> {
        let num_records = self.num_records();
        if index >= num_records {
            self.position = num_records;
            return Err(Error::new(
                ErrorKind::RecordOutOfRange { index, num_records },
                index,
            ));
        }
        self.position = index;
        Ok(())
    }

    /// Moves the record pointer by `offset` records,
    /// stopping at the start or past the end of the table
    pub fn skip(&mut self, offset: i64) {
        let num_records = self.num_records() as i64;
        let target = (self.position as i64).saturating_add(offset);
        self.position = target.clamp(0, num_records) as usize;
    }
}

impl<T: Read + Seek> Table<T> {
    /// Opens a table read from `source`.
    ///
    /// The header and field descriptors are read immediately, records are
    /// read on demand.
    ///
    /// Memo fields need a memo source, see [Table::set_memo_source].
    ///
    /// # Example
    ///
    /// ```
    /// use dbfreader::{Table, TableOptions};
    /// use std::io::Cursor;
    ///
    /// let mut bytes = vec![0u8; 33];
    /// bytes[0] = 0x03;
    /// bytes[8..10].copy_from_slice(&33u16.to_le_bytes());
    /// bytes[10..12].copy_from_slice(&1u16.to_le_bytes());
    /// bytes[32] = 0x0D;
    ///
    /// let table = Table::open(Cursor::new(bytes), TableOptions::default()).unwrap();
    /// assert_eq!(table.num_records(), 0);
    /// assert!(table.eof());
    /// ```
    pub fn open(mut source: T, options: TableOptions) -> Result<Self, Error> {
        let mut header =
            Header::read_from(&mut source).map_err(|error| Error::io_error(error, 0))?;

        let descriptors_end = if header.file_type.is_visual_fox_pro() {
            header
                .offset_to_first_record
                .checked_sub(BACKLINK_SIZE)
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::InvalidHeader("header too short for a Visual FoxPro table"),
                        0,
                    )
                })?
        } else {
            header.offset_to_first_record
        };
        let max_num_fields = (descriptors_end as usize)
            .checked_sub(Header::SIZE + std::mem::size_of::<u8>())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidHeader("header length is shorter than the header"),
                    0,
                )
            })?
            / FieldInfo::SIZE;

        let encoding = options.encoding.to_encoding();
        let mut fields = Vec::<FieldInfo>::with_capacity(max_num_fields);
        let mut descriptor = [0u8; FieldInfo::SIZE];
        for _ in 0..max_num_fields {
            source
                .read_exact(&mut descriptor[..1])
                .map_err(|error| Error::io_error(error, 0))?;
            if descriptor[0] == TERMINATOR_VALUE {
                break;
            }
            source
                .read_exact(&mut descriptor[1..])
                .map_err(|error| Error::io_error(error, 0))?;
            let info = FieldInfo::read_with_encoding(&mut &descriptor[..], &encoding)
                .map_err(|kind| Error::new(kind, 0))?;
            fields.push(info);
        }

        let mut field_offsets = Vec::with_capacity(fields.len());
        let mut record_size = DELETION_FLAG_SIZE;
        for info in &fields {
            field_offsets.push(record_size);
            record_size += info.length() as usize;
        }
        // Some files do not count the deletion flag in the record size
        if (header.size_of_record as usize) < record_size {
            header.size_of_record = u16::try_from(record_size).map_err(|_| {
                Error::new(ErrorKind::InvalidHeader("records are too large"), 0)
            })?;
        }

        source
            .seek(SeekFrom::Start(u64::from(header.offset_to_first_record)))
            .map_err(|error| Error::io_error(error, 0))?;

        log::debug!(
            "opened table: version {:#04x}, {} fields, {} records of {} bytes",
            header.file_type.0,
            fields.len(),
            header.num_records,
            header.size_of_record
        );

        Ok(Self {
            source,
            memo_reader: None,
            header,
            fields,
            field_offsets,
            encoding: DynEncoding::new(encoding),
            record_buffer: vec![0u8; record_size],
            position: 0,
        })
    }

    /// Sets the source of the memo file, needed to read Memo fields.
    ///
    /// Tables whose version does not name a memo format are read
    /// as FoxPro memos (`.fpt`).
    pub fn set_memo_source(&mut self, source: T) -> Result<(), Error> {
        let memo_type = self.memo_file_type();
        let memo_reader =
            MemoReader::new(memo_type, source).map_err(|error| Error::io_error(error, 0))?;
        self.memo_reader = Some(memo_reader);
        Ok(())
    }

    /// Reads the record at `index`.
    ///
    /// Each call is independent, a failure does not prevent
    /// reading other records.
    pub fn record_at(&mut self, index: usize) -> Result<Record, Error> {
        self.read_record_into_buffer(index)?;
        let deleted = DeletionFlag::from_byte(self.record_buffer[0]) == DeletionFlag::Deleted;
        let values = (0..self.fields.len())
            .map(|field_index| self.read_field_from_buffer(index, field_index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Record::new(values, deleted))
    }

    /// Reads the value of the field at `field_index` of the record
    /// the pointer is on.
    pub fn field(&mut self, field_index: usize) -> Result<FieldValue, Error> {
        let index = self.position;
        if field_index >= self.fields.len() {
            return Err(Error::new(
                ErrorKind::FieldOutOfRange {
                    index: field_index,
                    num_fields: self.fields.len(),
                },
                index,
            ));
        }
        self.read_record_into_buffer(index)?;
        self.read_field_from_buffer(index, field_index)
    }

    /// Returns the record at `index` as a JSON object of field name to value.
    ///
    /// With `trim`, surrounding whitespace is removed from Character and Memo values.
    pub fn record_to_json(&mut self, index: usize, trim: bool) -> Result<String, Error> {
        let record = self.record_at(index)?;
        serde_json::to_string(&JsonRecord::new(&self.fields, &record, trim))
            .map_err(|error| Error::new(ErrorKind::Json(error), index))
    }

    fn memo_file_type(&self) -> MemoFileType {
        self.header
            .file_type
            .supported_memo_type()
            .unwrap_or(MemoFileType::FoxBaseMemo)
    }

    fn read_record_into_buffer(&mut self, index: usize) -> Result<(), Error> {
        let num_records = self.num_records();
        if index >= num_records {
            return Err(Error::new(
                ErrorKind::RecordOutOfRange { index, num_records },
                index,
            ));
        }
        self.source
            .seek(SeekFrom::Start(self.header.record_position(index)))
            .map_err(|error| Error::io_error(error, index))?;
        self.source
            .read_exact(&mut self.record_buffer)
            .map_err(|error| Error::io_error(error, index))
    }

    fn read_field_from_buffer(
        &mut self,
        index: usize,
        field_index: usize,
    ) -> Result<FieldValue, Error> {
        let info = &self.fields[field_index];
        let start = self.field_offsets[field_index];
        let bytes = &self.record_buffer[start..start + info.length() as usize];
        FieldValue::read_from(bytes, &mut self.memo_reader, info, &self.encoding)
            .map_err(|kind| Error::with_field(kind, index, info))
    }
}

impl Table<BufReader<File>> {
    /// Opens the table at `path`, along with its memo file when
    /// at least one field is a Memo.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: TableOptions) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|error| Error::io_error(error, 0))?;
        let mut table = Table::open(BufReader::new(file), options)?;

        let at_least_one_field_is_memo = table
            .fields
            .iter()
            .any(|info| info.field_type() == FieldType::Memo);

        if at_least_one_field_is_memo {
            let memo_file = open_memo_file(path, table.memo_file_type())
                .map_err(|error| Error::new(ErrorKind::ErrorOpeningMemoFile(error), 0))?;
            table.set_memo_source(BufReader::new(memo_file))?;
        }
        Ok(table)
    }
}

/// Opens the memo file next to the table, trying
/// the lowercase extension first (`.fpt`, then `.FPT`)
fn open_memo_file(table_path: &Path, memo_type: MemoFileType) -> std::io::Result<File> {
    let extension = memo_type.extension();
    File::open(table_path.with_extension(extension))
        .or_else(|_| File::open(table_path.with_extension(extension.to_ascii_uppercase())))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    /// Table with a single Character field of length 5
    fn table_bytes(names: &[&[u8]], deleted: &[bool]) -> Vec<u8> {
        let mut bytes = vec![0u8; Header::SIZE];
        bytes[0] = 0x03;
        bytes[4..8].copy_from_slice(&(names.len() as u32).to_le_bytes());
        bytes[8..10].copy_from_slice(&65u16.to_le_bytes());
        bytes[10..12].copy_from_slice(&6u16.to_le_bytes());

        let mut descriptor = [0u8; FieldInfo::SIZE];
        descriptor[..4].copy_from_slice(b"NAME");
        descriptor[11] = b'C';
        descriptor[16] = 5;
        bytes.extend_from_slice(&descriptor);
        bytes.push(TERMINATOR_VALUE);

        for (name, deleted) in names.iter().zip(deleted) {
            bytes.push(if *deleted { b'*' } else { b' ' });
            let mut value = name.to_vec();
            value.resize(5, b' ');
            bytes.extend_from_slice(&value);
        }
        bytes.push(0x1A);
        bytes
    }

    fn open(bytes: Vec<u8>) -> Table<Cursor<Vec<u8>>> {
        Table::open(Cursor::new(bytes), TableOptions::default()).unwrap()
    }

    #[test]
    fn read_records_by_index() {
        let mut table = open(table_bytes(&[b"abc", b"de"], &[false, true]));
        assert_eq!(table.num_records(), 2);
        assert_eq!(table.field_names(), vec!["NAME"]);

        let second = table.record_at(1).unwrap();
        assert!(second.is_deleted());
        assert_eq!(second.values(), &[FieldValue::Character("de   ".to_owned())]);

        let first = table.record_at(0).unwrap();
        assert!(!first.is_deleted());
        assert_eq!(first.get(0), Some(&FieldValue::Character("abc  ".to_owned())));
    }

    #[test]
    fn record_out_of_range() {
        let mut table = open(table_bytes(&[b"abc"], &[false]));
        let error = table.record_at(1).unwrap_err();
        assert!(matches!(
            error.kind(),
            ErrorKind::RecordOutOfRange {
                index: 1,
                num_records: 1
            }
        ));
    }

    #[test]
    fn truncated_record_is_an_io_error() {
        let mut bytes = table_bytes(&[b"abc", b"de"], &[false, false]);
        bytes.truncate(bytes.len() - 4);
        let mut table = open(bytes);
        assert!(table.record_at(0).is_ok());
        let error = table.record_at(1).unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::IoError(_)));
        assert_eq!(error.record_num(), 1);
    }

    #[test]
    fn header_length_too_short() {
        let mut bytes = table_bytes(&[], &[]);
        bytes[8..10].copy_from_slice(&20u16.to_le_bytes());
        let error = Table::open(Cursor::new(bytes), TableOptions::default())
            .err()
            .unwrap();
        assert!(matches!(error.kind(), ErrorKind::InvalidHeader(_)));
    }

    #[test]
    fn cursor_navigation() {
        let mut table = open(table_bytes(&[b"a", b"b", b"c"], &[false; 3]));
        assert!(table.bof());
        assert!(!table.eof());

        table.skip(1);
        assert_eq!(table.position(), 1);
        assert_eq!(table.field(0).unwrap(), FieldValue::Character("b    ".to_owned()));

        table.skip(10);
        assert!(table.eof());
        assert!(table.field(0).is_err());

        table.skip(-10);
        assert!(table.bof());
        assert_eq!(table.position(), 0);

        assert!(table.go_to(2).is_ok());
        assert!(!table.eof());
        assert!(table.go_to(3).is_err());
        assert!(table.eof());
    }

    #[test]
    fn field_out_of_range() {
        let mut table = open(table_bytes(&[b"a"], &[false]));
        let error = table.field(1).unwrap_err();
        assert!(matches!(
            error.kind(),
            ErrorKind::FieldOutOfRange {
                index: 1,
                num_fields: 1
            }
        ));
    }

    #[test]
    fn options_carry_encoding() {
        let options = TableOptions::new().with_encoding(TableEncoding::Big5);
        assert_eq!(options.encoding(), TableEncoding::Big5);
        assert_eq!(TableOptions::default().encoding(), TableEncoding::Win1250);
    }
}
