use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::{FieldInfo, FieldValue, Record};

const JSON_DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const JSON_DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// JSON view of a record: an object mapping each field name to its value,
/// in the order of the table's fields.
///
/// # Example
///
/// ```
/// use dbfreader::{FieldInfo, FieldType, FieldValue, JsonRecord, Record};
///
/// let fields = [FieldInfo::new("NAME", FieldType::Character, 10, 0)];
/// let record = Record::new(vec![FieldValue::Character("Hello     ".to_owned())], false);
///
/// let json = serde_json::to_string(&JsonRecord::new(&fields, &record, true)).unwrap();
/// assert_eq!(json, r#"{"NAME":"Hello"}"#);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct JsonRecord<'a> {
    fields: &'a [FieldInfo],
    record: &'a Record,
    trim: bool,
}

impl<'a> JsonRecord<'a> {
    /// `trim` removes surrounding whitespace from Character and Memo values
    pub fn new(fields: &'a [FieldInfo], record: &'a Record, trim: bool) -> Self {
        Self {
            fields,
            record,
            trim,
        }
    }
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.fields.len() != self.record.len() {
            return Err(S::Error::custom(format!(
                "the record has {} values but the table declares {} fields",
                self.record.len(),
                self.fields.len()
            )));
        }
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (info, value) in self.fields.iter().zip(self.record.values()) {
            map.serialize_entry(
                info.name(),
                &JsonValue {
                    value,
                    trim: self.trim,
                },
            )?;
        }
        map.end()
    }
}

struct JsonValue<'a> {
    value: &'a FieldValue,
    trim: bool,
}

impl Serialize for JsonValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            FieldValue::Character(text) | FieldValue::Memo(text) => {
                if self.trim {
                    serializer.serialize_str(text.trim())
                } else {
                    serializer.serialize_str(text)
                }
            }
            FieldValue::Numeric(Some(v)) | FieldValue::Float(Some(v)) => serializer.serialize_f64(*v),
            FieldValue::Double(v) | FieldValue::Currency(v) => serializer.serialize_f64(*v),
            FieldValue::Integer(i) => serializer.serialize_i32(*i),
            FieldValue::Logical(Some(b)) => serializer.serialize_bool(*b),
            FieldValue::Date(Some(date)) => {
                let text = date.format(JSON_DATE_FORMAT).map_err(S::Error::custom)?;
                serializer.serialize_str(&text)
            }
            FieldValue::DateTime(Some(date_time)) => {
                let text = date_time
                    .format(JSON_DATE_TIME_FORMAT)
                    .map_err(S::Error::custom)?;
                serializer.serialize_str(&text)
            }
            FieldValue::Numeric(None)
            | FieldValue::Float(None)
            | FieldValue::Logical(None)
            | FieldValue::Date(None)
            | FieldValue::DateTime(None) => serializer.serialize_none(),
            FieldValue::Unknown(bytes) => {
                serializer.serialize_str(String::from_utf8_lossy(bytes).trim())
            }
        }
    }
}
