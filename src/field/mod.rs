use byteorder::ReadBytesExt;
use std::io::Read;

mod conversion;
pub mod types;

use self::types::FieldType;
use crate::encoding::Encoding;
use crate::ErrorKind;
pub use conversion::FieldConversionError;

pub(crate) const DELETION_FLAG_SIZE: usize = 1; // 1 byte
const FIELD_NAME_LENGTH: usize = 11;

/// Struct giving the info for a record field
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FieldInfo {
    /// The name of the field
    pub(crate) name: String,
    /// The field type
    pub(crate) field_type: FieldType,
    pub(crate) field_length: u8,
    pub(crate) num_decimal_places: u8,
}

impl FieldInfo {
    pub(crate) const SIZE: usize = 32;

    /// Creates the description of a field
    ///
    /// # Example
    ///
    /// ```
    /// use dbfreader::{FieldInfo, FieldType};
    ///
    /// let price = FieldInfo::new("PRICE", FieldType::Numeric, 10, 2);
    /// assert_eq!(price.decimal_count(), 2);
    /// ```
    pub fn new(name: &str, field_type: FieldType, length: u8, num_decimal_places: u8) -> Self {
        Self {
            name: name.to_owned(),
            field_type,
            field_length: length,
            num_decimal_places,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn length(&self) -> u8 {
        self.field_length
    }

    /// Number of digits after the decimal point,
    /// only meaningful for Numeric and Float fields
    pub fn decimal_count(&self) -> u8 {
        self.num_decimal_places
    }

    /// Reads a field descriptor, the encoding is used only for the name
    pub(crate) fn read_with_encoding<T: Read, E: Encoding>(
        source: &mut T,
        encoding: &E,
    ) -> Result<Self, ErrorKind> {
        let mut name = [0u8; FIELD_NAME_LENGTH];
        source.read_exact(&mut name)?;
        let field_type = source.read_u8()?;

        let mut _displacement_field = [0u8; 4];
        source.read_exact(&mut _displacement_field)?;

        let field_length = source.read_u8()?;
        let num_decimal_places = source.read_u8()?;

        // flags, autoincrement next value & step, reserved
        let mut _reserved = [0u8; 14];
        source.read_exact(&mut _reserved)?;

        // names are ASCIIZ, garbage may follow the first \0
        let name_end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        let name = encoding.decode(&name[..name_end])?.trim().to_owned();

        Ok(Self {
            name,
            field_type: FieldType::from(field_type as char),
            field_length,
            num_decimal_places,
        })
    }
}

impl std::fmt::Display for FieldInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FieldInfo {{ Name: {}, Field Type: {} }}",
            self.name, self.field_type
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DeletionFlag {
    NotDeleted,
    Deleted,
}

impl DeletionFlag {
    pub(crate) const fn from_byte(byte: u8) -> Self {
        match byte {
            0x20 => Self::NotDeleted,
            0x2A => Self::Deleted,
            // Silently consider other values as not deleted
            _ => Self::NotDeleted,
        }
    }
}
