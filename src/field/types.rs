use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io::{Read, Seek};

use crate::encoding::Encoding;
use crate::memo::MemoReader;
use crate::{ErrorKind, FieldInfo};

/// Number of milliseconds in a day, FoxPro DateTime stores the time of the day as such
const MILLISECONDS_PER_DAY: i32 = 86_400_000;

/// FoxPro stores currency values as integers scaled by this factor
const CURRENCY_SCALE: f64 = 10_000.0;

/// Enum listing all the field types we know of
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldType {
    // dBASE III
    Character,
    Date,
    Float,
    Numeric,
    Logical,
    Memo,
    // Visual FoxPro
    Currency,
    DateTime,
    Integer,
    Double,
    /// Any other type code, its values are kept as raw bytes
    Unknown(char),
}

impl FieldType {
    /// Returns the type code stored in the field descriptor
    pub fn code(self) -> char {
        match self {
            FieldType::Character => 'C',
            FieldType::Date => 'D',
            FieldType::Float => 'F',
            FieldType::Numeric => 'N',
            FieldType::Logical => 'L',
            FieldType::Memo => 'M',
            FieldType::Currency => 'Y',
            FieldType::DateTime => 'T',
            FieldType::Integer => 'I',
            FieldType::Double => 'B',
            FieldType::Unknown(c) => c,
        }
    }
}

impl From<char> for FieldType {
    fn from(c: char) -> Self {
        match c {
            // dBASE III field types
            // All stored as strings
            'C' => FieldType::Character,
            'D' => FieldType::Date,
            'F' => FieldType::Float,
            'N' => FieldType::Numeric,
            'L' => FieldType::Logical,
            'M' => FieldType::Memo,
            // Visual FoxPro field types
            // stored in binary formats
            'Y' => FieldType::Currency,
            'T' => FieldType::DateTime,
            'I' => FieldType::Integer,
            'B' => FieldType::Double,
            other => FieldType::Unknown(other),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Enum where each variant stores the record value
///
/// Variants holding an `Option` use `None` for values that are blank,
/// zero-filled or otherwise unset in the file.
#[derive(Debug, PartialEq, Clone)]
pub enum FieldValue {
    // dBase III fields
    /// dBase String type, as stored: padding is kept
    Character(String),
    /// dBase type to represent numbers, stored as String in the file
    Numeric(Option<f64>),
    /// dBase type for boolean values, stored as a character in the file
    Logical(Option<bool>),
    /// dBase type for dates, stored as a `YYYYMMDD` string in the file
    Date(Option<time::Date>),
    /// Another dBase type to represent numbers, stored as String in the file
    Float(Option<f64>),
    /// Memo is a dBase type that allows to store Strings
    /// that are longer than 255 bytes.
    /// These strings are stored in an external file
    /// called the `Memo file`
    Memo(String),
    //Visual FoxPro fields
    Integer(i32),
    Currency(f64),
    DateTime(Option<time::PrimitiveDateTime>),
    Double(f64),
    /// Raw bytes of a field whose type is not supported
    Unknown(Vec<u8>),
}

impl FieldValue {
    /// Decodes the bytes of one field, `bytes` holds exactly `field_info.length()` bytes
    pub(crate) fn read_from<M: Read + Seek, E: Encoding>(
        bytes: &[u8],
        memo_reader: &mut Option<MemoReader<M>>,
        field_info: &FieldInfo,
        encoding: &E,
    ) -> Result<Self, ErrorKind> {
        let mut source = bytes;
        let value = match field_info.field_type {
            FieldType::Logical => match bytes.first().copied().unwrap_or(b' ') {
                b'1' | b'T' | b't' | b'Y' | b'y' => FieldValue::Logical(Some(true)),
                b'0' | b'N' | b'n' | b'F' | b'f' => FieldValue::Logical(Some(false)),
                // ' ', '?' and anything else
                _ => FieldValue::Logical(None),
            },
            FieldType::Character => FieldValue::Character(encoding.decode(bytes)?.into_owned()),
            FieldType::Numeric => FieldValue::Numeric(parse_number(bytes)?),
            FieldType::Float => FieldValue::Float(parse_number(bytes)?),
            FieldType::Date => FieldValue::Date(parse_date(bytes)?),
            FieldType::Integer => FieldValue::Integer(source.read_i32::<LittleEndian>()?),
            FieldType::Double => FieldValue::Double(source.read_f64::<LittleEndian>()?),
            FieldType::Currency => {
                FieldValue::Currency(source.read_i64::<LittleEndian>()? as f64 / CURRENCY_SCALE)
            }
            FieldType::DateTime => {
                let julian_day_number = source.read_i32::<LittleEndian>()?;
                let milliseconds = source.read_i32::<LittleEndian>()?;
                FieldValue::DateTime(date_time_from_parts(julian_day_number, milliseconds)?)
            }
            FieldType::Memo => {
                let index_in_memo = if field_info.field_length > 4 {
                    let trimmed = trimmed_ascii(bytes);
                    if trimmed.is_empty() {
                        0
                    } else {
                        trimmed.parse::<u32>()?
                    }
                } else {
                    source.read_u32::<LittleEndian>()?
                };

                if index_in_memo == 0 {
                    FieldValue::Memo(String::new())
                } else if let Some(memo_reader) = memo_reader {
                    let data_from_memo = memo_reader.read_data_at(index_in_memo)?;
                    FieldValue::Memo(encoding.decode(data_from_memo)?.into_owned())
                } else {
                    return Err(ErrorKind::MissingMemoFile);
                }
            }
            FieldType::Unknown(_) => FieldValue::Unknown(bytes.to_vec()),
        };
        Ok(value)
    }

    /// Returns the corresponding field type of the contained value
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Character(_) => FieldType::Character,
            FieldValue::Numeric(_) => FieldType::Numeric,
            FieldValue::Logical(_) => FieldType::Logical,
            FieldValue::Integer(_) => FieldType::Integer,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::Date(_) => FieldType::Date,
            FieldValue::Memo(_) => FieldType::Memo,
            FieldValue::Currency(_) => FieldType::Currency,
            FieldValue::DateTime(_) => FieldType::DateTime,
            FieldValue::Unknown(_) => FieldType::Unknown('?'),
        }
    }
}

/// Generic representation of the value, used when no type specific rule applies
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Character(s) | FieldValue::Memo(s) => f.write_str(s),
            FieldValue::Numeric(Some(v)) | FieldValue::Float(Some(v)) => write!(f, "{}", v),
            FieldValue::Logical(Some(b)) => write!(f, "{}", b),
            FieldValue::Date(Some(d)) => write!(f, "{}", d),
            FieldValue::DateTime(Some(dt)) => write!(f, "{}", dt),
            FieldValue::Numeric(None)
            | FieldValue::Float(None)
            | FieldValue::Logical(None)
            | FieldValue::Date(None)
            | FieldValue::DateTime(None) => Ok(()),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Currency(v) | FieldValue::Double(v) => write!(f, "{}", v),
            FieldValue::Unknown(bytes) => f.write_str(String::from_utf8_lossy(bytes).trim()),
        }
    }
}

fn trimmed_ascii(bytes: &[u8]) -> &str {
    // Numbers & memo indices are plain ASCII, anything else will fail to parse
    std::str::from_utf8(bytes)
        .unwrap_or("\u{FFFD}")
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
}

fn parse_number(bytes: &[u8]) -> Result<Option<f64>, ErrorKind> {
    let trimmed = trimmed_ascii(bytes);
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '*') {
        Ok(None)
    } else {
        Ok(Some(trimmed.parse::<f64>()?))
    }
}

fn parse_date(bytes: &[u8]) -> Result<Option<time::Date>, ErrorKind> {
    let trimmed = trimmed_ascii(bytes);
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '0') {
        return Ok(None);
    }
    if trimmed.len() != 8 || !trimmed.is_ascii() {
        return Err(ErrorKind::InvalidDate);
    }
    let year = trimmed[0..4].parse::<i32>()?;
    let month = trimmed[4..6].parse::<u8>()?;
    let day = trimmed[6..8].parse::<u8>()?;
    let month = time::Month::try_from(month)?;
    Ok(Some(time::Date::from_calendar_date(year, month, day)?))
}

fn date_time_from_parts(
    julian_day_number: i32,
    milliseconds: i32,
) -> Result<Option<time::PrimitiveDateTime>, ErrorKind> {
    if julian_day_number == 0 {
        return Ok(None);
    }
    if !(0..MILLISECONDS_PER_DAY).contains(&milliseconds) {
        return Err(ErrorKind::InvalidDate);
    }
    let date = time::Date::from_julian_day(julian_day_number)?;
    let seconds_of_day = milliseconds / 1_000;
    let time = time::Time::from_hms(
        (seconds_of_day / 3_600) as u8,
        (seconds_of_day % 3_600 / 60) as u8,
        (seconds_of_day % 60) as u8,
    )?;
    Ok(Some(time::PrimitiveDateTime::new(date, time)))
}
