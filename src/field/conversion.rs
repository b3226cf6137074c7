use super::types::{FieldType, FieldValue};

/// Errors that can happen when trying to convert a FieldValue into
/// a more concrete type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldConversionError {
    /// Happens when the conversion could not be mode because the FieldType
    /// does not mat the expected one
    FieldTypeNotAsExpected {
        /// The expected FieldType of the FieldValue the conversion was tried on
        expected: FieldType,
        /// The actual FieldType of the FieldValue the conversion was tried on
        actual: FieldType,
    },
    /// The value cannot be represented in the requested type
    IncompatibleType,
}

impl std::fmt::Display for FieldConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldConversionError::FieldTypeNotAsExpected { expected, actual } => {
                write!(f, "Cannot convert from {actual} to {expected}")
            }
            FieldConversionError::IncompatibleType => write!(f, "The type is not compatible"),
        }
    }
}

impl std::error::Error for FieldConversionError {}

/// Conversions of a value to the representation expected for a field type.
///
/// `Ok(None)` means the value is absent (blank / unset in the file).
impl FieldValue {
    fn not_as_expected(&self, expected: FieldType) -> FieldConversionError {
        FieldConversionError::FieldTypeNotAsExpected {
            expected,
            actual: self.field_type(),
        }
    }

    /// Text of Character and Memo values
    pub fn to_text(&self) -> Result<&str, FieldConversionError> {
        match self {
            FieldValue::Character(s) | FieldValue::Memo(s) => Ok(s.as_str()),
            _ => Err(self.not_as_expected(FieldType::Character)),
        }
    }

    /// Any numeric value as a float
    pub fn to_f64(&self) -> Result<Option<f64>, FieldConversionError> {
        match *self {
            FieldValue::Numeric(v) | FieldValue::Float(v) => Ok(v),
            FieldValue::Double(v) | FieldValue::Currency(v) => Ok(Some(v)),
            FieldValue::Integer(i) => Ok(Some(f64::from(i))),
            _ => Err(self.not_as_expected(FieldType::Numeric)),
        }
    }

    /// Any numeric value as an integer, decimals are truncated
    pub fn to_i64(&self) -> Result<Option<i64>, FieldConversionError> {
        match *self {
            FieldValue::Integer(i) => Ok(Some(i64::from(i))),
            FieldValue::Numeric(Some(v))
            | FieldValue::Float(Some(v))
            | FieldValue::Double(v)
            | FieldValue::Currency(v) => {
                if v.is_finite() && v.abs() < i64::MAX as f64 {
                    Ok(Some(v.trunc() as i64))
                } else {
                    Err(FieldConversionError::IncompatibleType)
                }
            }
            FieldValue::Numeric(None) | FieldValue::Float(None) => Ok(None),
            _ => Err(self.not_as_expected(FieldType::Integer)),
        }
    }

    pub fn to_bool(&self) -> Result<Option<bool>, FieldConversionError> {
        match *self {
            FieldValue::Logical(b) => Ok(b),
            _ => Err(self.not_as_expected(FieldType::Logical)),
        }
    }

    /// Date of Date and DateTime values
    pub fn to_date(&self) -> Result<Option<time::Date>, FieldConversionError> {
        match *self {
            FieldValue::Date(d) => Ok(d),
            FieldValue::DateTime(dt) => Ok(dt.map(|dt| dt.date())),
            _ => Err(self.not_as_expected(FieldType::Date)),
        }
    }

    /// Timestamp of Date and DateTime values, dates are at midnight
    pub fn to_date_time(&self) -> Result<Option<time::PrimitiveDateTime>, FieldConversionError> {
        match *self {
            FieldValue::DateTime(dt) => Ok(dt),
            FieldValue::Date(d) => Ok(d.map(|d| d.midnight())),
            _ => Err(self.not_as_expected(FieldType::DateTime)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn numeric_conversions() {
        assert_eq!(FieldValue::Numeric(Some(12.9)).to_i64(), Ok(Some(12)));
        assert_eq!(FieldValue::Integer(-3).to_f64(), Ok(Some(-3.0)));
        assert_eq!(FieldValue::Numeric(None).to_i64(), Ok(None));
        assert_eq!(
            FieldValue::Double(f64::NAN).to_i64(),
            Err(FieldConversionError::IncompatibleType)
        );
    }

    #[test]
    fn mismatched_types() {
        let value = FieldValue::Character("abc".to_owned());
        assert_eq!(
            value.to_f64(),
            Err(FieldConversionError::FieldTypeNotAsExpected {
                expected: FieldType::Numeric,
                actual: FieldType::Character,
            })
        );
        assert!(FieldValue::Logical(Some(true)).to_text().is_err());
    }

    #[test]
    fn date_conversions() {
        let date = FieldValue::Date(Some(date!(2020 - 02 - 29)));
        assert_eq!(
            date.to_date_time(),
            Ok(Some(datetime!(2020 - 02 - 29 00:00:00)))
        );
        let date_time = FieldValue::DateTime(Some(datetime!(2020 - 02 - 29 23:59:59)));
        assert_eq!(date_time.to_date(), Ok(Some(date!(2020 - 02 - 29))));
        assert_eq!(FieldValue::DateTime(None).to_date(), Ok(None));
    }
}
