use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

use crate::memo::MemoFileType;

/// Value of the byte between the last field descriptor and the first record
pub(crate) const TERMINATOR_VALUE: u8 = 0x0D;

/// Visual FoxPro tables store the path of their database container
/// between the field descriptors and the first record
pub(crate) const BACKLINK_SIZE: u16 = 263;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct FileType(pub(crate) u8);

impl FileType {
    pub(crate) fn is_visual_fox_pro(self) -> bool {
        matches!(self.0, 0x30 | 0x31 | 0x32)
    }

    pub(crate) fn supported_memo_type(self) -> Option<MemoFileType> {
        match self.0 {
            0x83 => Some(MemoFileType::DbaseMemo),
            0x8B | 0x8E => Some(MemoFileType::DbaseMemo4),
            0xF5 | 0xFB | 0x30 | 0x31 | 0x32 => Some(MemoFileType::FoxBaseMemo),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Header {
    pub(crate) file_type: FileType,
    /// year (since 1900), month, day
    pub(crate) last_update: [u8; 3],
    pub(crate) num_records: u32,
    pub(crate) offset_to_first_record: u16,
    pub(crate) size_of_record: u16,
    pub(crate) code_page_mark: u8,
}

impl Header {
    pub(crate) const SIZE: usize = 32;

    pub(crate) fn read_from<T: Read>(source: &mut T) -> Result<Self, std::io::Error> {
        let file_type = FileType(source.read_u8()?);

        let mut last_update = [0u8; 3];
        source.read_exact(&mut last_update)?;

        let num_records = source.read_u32::<LittleEndian>()?;
        let offset_to_first_record = source.read_u16::<LittleEndian>()?;
        let size_of_record = source.read_u16::<LittleEndian>()?;

        // reserved, transaction flag, encryption flag, multi-user data
        let mut _reserved = [0u8; 16];
        source.read_exact(&mut _reserved)?;

        let _table_flags = source.read_u8()?;
        let code_page_mark = source.read_u8()?;

        let mut _reserved = [0u8; 2];
        source.read_exact(&mut _reserved)?;

        Ok(Self {
            file_type,
            last_update,
            num_records,
            offset_to_first_record,
            size_of_record,
            code_page_mark,
        })
    }

    /// Date of the last update, `None` when the stored bytes are not a valid date
    pub(crate) fn last_update(&self) -> Option<time::Date> {
        let [year, month, day] = self.last_update;
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(1900 + i32::from(year), month, day).ok()
    }

    /// Byte position of the record (its deletion flag) in the file
    pub(crate) fn record_position(&self, index: usize) -> u64 {
        u64::from(self.offset_to_first_record) + (index as u64 * u64::from(self.size_of_record))
    }
}
