//! Rendering of field values as text, for the console and for CSV export.
//!
//! The rules depend on the type declared by the field descriptor, not on
//! the variant of the value. A value that does not fit its declared type
//! is rendered with its generic [Display](std::fmt::Display) form.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::{ErrorKind, FieldConversionError, FieldInfo, FieldType, FieldValue, Record};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Console form of values that are not set
const CONSOLE_NULL: &str = "null";

/// Decimal places of scaled Numeric and of Float values on the console
const CONSOLE_DECIMALS: usize = 2;

/// Decimal places of Currency values in exports
const CURRENCY_DECIMALS: usize = 4;

/// Where a formatted value is going to be shown
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormatContext {
    /// Human readable output
    Console,
    /// CSV cells
    Export,
}

/// Formats `value` according to the type declared by `field`.
///
/// Never fails: values that cannot be interpreted as the declared type
/// fall back to their generic form.
///
/// # Example
///
/// ```
/// use dbfreader::{format_value, FieldInfo, FieldType, FieldValue, FormatContext};
///
/// let price = FieldInfo::new("PRICE", FieldType::Numeric, 8, 3);
/// let value = FieldValue::Numeric(Some(12.5));
///
/// assert_eq!(format_value(&value, &price, FormatContext::Export), "12.500");
/// assert_eq!(format_value(&value, &price, FormatContext::Console), "12.50");
/// ```
pub fn format_value(value: &FieldValue, field: &FieldInfo, context: FormatContext) -> String {
    let formatted = match context {
        FormatContext::Console => console_form(value, field),
        FormatContext::Export => export_form(value, field),
    };
    formatted.unwrap_or_else(|_| value.to_string())
}

/// Formats every value of `record`, pairing them by position with `fields`.
///
/// Fails with [ErrorKind::FieldCountMismatch] when the record does not
/// hold exactly one value per field.
pub fn format_record(
    record: &Record,
    fields: &[FieldInfo],
    context: FormatContext,
) -> Result<Vec<String>, ErrorKind> {
    if record.len() != fields.len() {
        return Err(ErrorKind::FieldCountMismatch {
            expected: fields.len(),
            actual: record.len(),
        });
    }
    Ok(record
        .values()
        .iter()
        .zip(fields)
        .map(|(value, field)| format_value(value, field, context))
        .collect())
}

fn export_form(value: &FieldValue, field: &FieldInfo) -> Result<String, FieldConversionError> {
    let formatted = match field.field_type() {
        FieldType::Character => value.to_text()?.trim().to_owned(),
        FieldType::Memo => value.to_text()?.to_owned(),
        FieldType::Numeric if field.decimal_count() == 0 => or_empty(value.to_i64()?),
        FieldType::Numeric => match value.to_f64()? {
            Some(v) => format!("{:.*}", usize::from(field.decimal_count()), v),
            None => String::new(),
        },
        // Display of f64 is the shortest representation that round trips
        FieldType::Float | FieldType::Double => or_empty(value.to_f64()?),
        FieldType::Currency => match value.to_f64()? {
            Some(v) => format!("{:.*}", CURRENCY_DECIMALS, v),
            None => String::new(),
        },
        FieldType::Integer => or_empty(value.to_i64()?),
        FieldType::Logical => or_empty(value.to_bool()?),
        FieldType::Date => match value.to_date()? {
            Some(date) => date
                .format(DATE_FORMAT)
                .map_err(|_| FieldConversionError::IncompatibleType)?,
            None => String::new(),
        },
        FieldType::DateTime => or_empty(format_date_time(value)?),
        FieldType::Unknown(_) => value.to_string(),
    };
    Ok(formatted)
}

fn console_form(value: &FieldValue, field: &FieldInfo) -> Result<String, FieldConversionError> {
    let formatted = match field.field_type() {
        FieldType::Character => format!("{:?}", value.to_text()?.trim()),
        FieldType::Memo => value.to_text()?.to_owned(),
        FieldType::Numeric if field.decimal_count() == 0 => or_null(value.to_i64()?),
        FieldType::Numeric | FieldType::Float => match value.to_f64()? {
            Some(v) => format!("{:.*}", CONSOLE_DECIMALS, v),
            None => CONSOLE_NULL.to_owned(),
        },
        FieldType::Integer => or_null(value.to_i64()?),
        FieldType::Logical => or_null(value.to_bool()?),
        FieldType::Date | FieldType::DateTime => or_null(format_date_time(value)?),
        FieldType::Double | FieldType::Currency | FieldType::Unknown(_) => value.to_string(),
    };
    Ok(formatted)
}

fn format_date_time(value: &FieldValue) -> Result<Option<String>, FieldConversionError> {
    value
        .to_date_time()?
        .map(|date_time| {
            date_time
                .format(DATE_TIME_FORMAT)
                .map_err(|_| FieldConversionError::IncompatibleType)
        })
        .transpose()
}

fn or_empty<V: ToString>(value: Option<V>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

fn or_null<V: ToString>(value: Option<V>) -> String {
    value.map_or_else(|| CONSOLE_NULL.to_owned(), |v| v.to_string())
}
