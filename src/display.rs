//! Human readable narration of a table's content.
//!
//! Every function writes to the given output; records that cannot be
//! read are logged and skipped.

use std::io::{self, Read, Seek, Write};

use crate::export::RecordSource;
use crate::format::{format_record, FormatContext};
use crate::{Error, FieldInfo, Table};

/// Number of records shown by default
pub const DEFAULT_MAX_RECORDS: usize = 10;

/// Prints the number of records and the field names
pub fn print_summary<T, W: Write>(out: &mut W, table: &Table<T>) -> io::Result<()> {
    writeln!(out, "Total records: {}", table.num_records())?;
    writeln!(out, "Number of fields: {}", table.num_fields())?;
    writeln!(out, "Field names: [{}]", table.field_names().join(" "))
}

pub fn print_field_details<W: Write>(out: &mut W, fields: &[FieldInfo]) -> io::Result<()> {
    writeln!(out, "\nField details:")?;
    for (i, info) in fields.iter().enumerate() {
        writeln!(
            out,
            "  {}: {} (Type: {}, Length: {}, Decimals: {})",
            i,
            info.name(),
            info.field_type(),
            info.length(),
            info.decimal_count()
        )?;
    }
    Ok(())
}

/// Prints at most `max_records` records, starting from the first one.
///
/// Deleted records are shown as `[DELETED]`, without their values.
pub fn print_records<S, W>(out: &mut W, source: &mut S, max_records: usize) -> io::Result<()>
where
    S: RecordSource + ?Sized,
    W: Write,
{
    let count = source.num_records().min(max_records);
    writeln!(out, "\nFirst {} records:", count)?;
    for index in 0..count {
        let record = match source.record_at(index) {
            Ok(record) => record,
            Err(error) => {
                log::warn!("Error reading record {}: {}", index, error);
                continue;
            }
        };

        if record.is_deleted() {
            writeln!(out, "Record {}: [DELETED]", index)?;
            continue;
        }

        let values = match format_record(&record, source.fields(), FormatContext::Console) {
            Ok(values) => values,
            Err(kind) => {
                log::warn!("Error reading record {}: {}", index, Error::new(kind, index));
                continue;
            }
        };

        writeln!(out, "Record {}:", index)?;
        for (info, value) in source.fields().iter().zip(values) {
            writeln!(out, "  {}: {}", info.name(), value)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Shows the record pointer moving: to the first record,
/// reading its first field, then one record forward.
///
/// Prints nothing for tables without records.
pub fn print_navigation_demo<T, W>(out: &mut W, table: &mut Table<T>) -> io::Result<()>
where
    T: Read + Seek,
    W: Write,
{
    if table.num_records() == 0 {
        return Ok(());
    }
    writeln!(out, "Demonstrating record navigation:")?;

    if let Err(error) = table.go_to(0) {
        log::warn!("Error going to first record: {}", error);
        return Ok(());
    }
    writeln!(
        out,
        "At record 0, EOF: {}, BOF: {}",
        table.eof(),
        table.bof()
    )?;

    if table.num_fields() > 0 {
        match table.field(0) {
            Ok(value) => writeln!(out, "Field 0 value: {}", value.to_string().trim())?,
            Err(error) => log::warn!("Error reading field 0: {}", error),
        }
    }

    table.skip(1);
    writeln!(
        out,
        "After Skip(1), at record {}, EOF: {}",
        table.position(),
        table.eof()
    )
}

/// Prints the record at `index` as JSON, with trimmed text
pub fn print_record_json<T, W>(out: &mut W, table: &mut Table<T>, index: usize) -> io::Result<()>
where
    T: Read + Seek,
    W: Write,
{
    if index >= table.num_records() {
        return Ok(());
    }
    writeln!(out, "\nRecord {} as JSON:", index)?;
    match table.record_to_json(index, true) {
        Ok(json) => writeln!(out, "{}", json),
        Err(error) => {
            log::warn!("Error converting to JSON: {}", error);
            Ok(())
        }
    }
}
