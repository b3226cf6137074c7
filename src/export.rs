//! Export of whole tables to CSV.

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use crate::format::{format_record, FormatContext};
use crate::{Error, FieldInfo, Record, Table};

/// Progress is logged every this many written records,
/// for sources with more records than that
const PROGRESS_INTERVAL: usize = 1000;

/// Anything records can be exported from
pub trait RecordSource {
    /// Fields of the records, in order
    fn fields(&self) -> &[FieldInfo];

    fn num_records(&self) -> usize;

    /// Reads the record at `index`, a failure only concerns that record
    fn record_at(&mut self, index: usize) -> Result<Record, Error>;
}

impl<T: Read + Seek> RecordSource for Table<T> {
    fn fields(&self) -> &[FieldInfo] {
        Table::fields(self)
    }

    fn num_records(&self) -> usize {
        Table::num_records(self)
    }

    fn record_at(&mut self, index: usize) -> Result<Record, Error> {
        Table::record_at(self, index)
    }
}

/// What an export did
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of data rows written, the header row is not counted
    pub records_written: usize,
    /// Records skipped because they are marked as deleted
    pub deleted_skipped: usize,
    /// Records skipped because they could not be read
    pub read_failures: usize,
}

/// Writes all the records of `source` as CSV into `sink`.
///
/// The first row holds the field names. Deleted records are skipped, as are
/// records that cannot be read (a warning is logged for each).
///
/// Failing to write to the sink stops the export, rows already written
/// are left in the sink.
///
/// # Example
///
/// ```
/// use dbfreader::export::{export, RecordSource};
/// use dbfreader::{Error, FieldInfo, FieldType, FieldValue, Record};
///
/// struct Prices(Vec<FieldInfo>);
///
/// impl RecordSource for Prices {
///     fn fields(&self) -> &[FieldInfo] {
///         &self.0
///     }
///
///     fn num_records(&self) -> usize {
///         1
///     }
///
///     fn record_at(&mut self, _index: usize) -> Result<Record, Error> {
///         Ok(Record::new(vec![FieldValue::Numeric(Some(3.5))], false))
///     }
/// }
///
/// let mut source = Prices(vec![FieldInfo::new("PRICE", FieldType::Numeric, 8, 2)]);
/// let mut csv = Vec::new();
/// let summary = export(&mut source, &mut csv).unwrap();
///
/// assert_eq!(summary.records_written, 1);
/// assert_eq!(String::from_utf8(csv).unwrap(), "PRICE\n3.50\n");
/// ```
pub fn export<S, W>(source: &mut S, sink: W) -> Result<ExportSummary, Error>
where
    S: RecordSource + ?Sized,
    W: Write,
{
    let mut writer = csv::WriterBuilder::new().from_writer(sink);
    let fields = source.fields().to_vec();

    writer
        .write_record(fields.iter().map(FieldInfo::name))
        .map_err(|error| Error::csv_error(error, 0))?;

    let num_records = source.num_records();
    let mut summary = ExportSummary::default();
    for index in 0..num_records {
        let record = match source.record_at(index) {
            Ok(record) => record,
            Err(error) => {
                log::warn!("Error reading record {}: {}", index, error);
                summary.read_failures += 1;
                continue;
            }
        };

        if record.is_deleted() {
            summary.deleted_skipped += 1;
            continue;
        }

        let row = match format_record(&record, &fields, FormatContext::Export) {
            Ok(row) => row,
            Err(kind) => {
                log::warn!("Error reading record {}: {}", index, Error::new(kind, index));
                summary.read_failures += 1;
                continue;
            }
        };

        writer
            .write_record(&row)
            .map_err(|error| Error::csv_error(error, index))?;
        summary.records_written += 1;

        if num_records > PROGRESS_INTERVAL && summary.records_written % PROGRESS_INTERVAL == 0 {
            log::info!(
                "Processed {}/{} records...",
                summary.records_written,
                num_records
            );
        }
    }

    writer
        .flush()
        .map_err(|error| Error::io_error(error, num_records))?;

    log::debug!(
        "export done: {} written, {} deleted, {} unreadable",
        summary.records_written,
        summary.deleted_skipped,
        summary.read_failures
    );
    Ok(summary)
}

/// Same as [export], writing to a file created (or truncated) at `path`.
///
/// The file is closed when the function returns, whether it succeeded or not.
pub fn export_to_path<S, P>(source: &mut S, path: P) -> Result<ExportSummary, Error>
where
    S: RecordSource + ?Sized,
    P: AsRef<Path>,
{
    let file = File::create(path).map_err(|error| Error::io_error(error, 0))?;
    export(source, file)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ErrorKind, FieldType, FieldValue};

    /// Source whose records are given up front, `None` being a read failure
    struct FakeSource {
        fields: Vec<FieldInfo>,
        records: Vec<Option<Record>>,
    }

    impl RecordSource for FakeSource {
        fn fields(&self) -> &[FieldInfo] {
            &self.fields
        }

        fn num_records(&self) -> usize {
            self.records.len()
        }

        fn record_at(&mut self, index: usize) -> Result<Record, Error> {
            self.records[index]
                .clone()
                .ok_or_else(|| Error::new(ErrorKind::InvalidDate, index))
        }
    }

    fn fields() -> Vec<FieldInfo> {
        vec![
            FieldInfo::new("NAME", FieldType::Character, 10, 0),
            FieldInfo::new("PRICE", FieldType::Numeric, 8, 2),
        ]
    }

    fn row(name: &str, price: f64, deleted: bool) -> Option<Record> {
        Some(Record::new(
            vec![
                FieldValue::Character(name.to_owned()),
                FieldValue::Numeric(Some(price)),
            ],
            deleted,
        ))
    }

    fn run(records: Vec<Option<Record>>) -> (Result<ExportSummary, Error>, String) {
        let mut source = FakeSource {
            fields: fields(),
            records,
        };
        let mut sink = Vec::new();
        let result = export(&mut source, &mut sink);
        (result, String::from_utf8(sink).unwrap())
    }

    #[test]
    fn deleted_failed_and_valid_records() {
        let (result, csv) = run(vec![
            row("Gone", 1.0, true),
            None,
            row(" Hello ", 12.345, false),
        ]);
        let summary = result.unwrap();

        assert_eq!(
            summary,
            ExportSummary {
                records_written: 1,
                deleted_skipped: 1,
                read_failures: 1,
            }
        );
        assert_eq!(csv, "NAME,PRICE\nHello,12.35\n");
    }

    #[test]
    fn empty_source_writes_the_header() {
        let (result, csv) = run(vec![]);
        assert_eq!(result.unwrap().records_written, 0);
        assert_eq!(csv, "NAME,PRICE\n");
    }

    #[test]
    fn all_records_deleted() {
        let (result, csv) = run(vec![row("a", 1.0, true), row("b", 2.0, true)]);
        let summary = result.unwrap();
        assert_eq!(summary.records_written, 0);
        assert_eq!(summary.deleted_skipped, 2);
        assert_eq!(csv, "NAME,PRICE\n");
    }

    #[test]
    fn value_count_mismatch_is_skipped() {
        let short = Record::new(vec![FieldValue::Character("short".to_owned())], false);
        let (result, csv) = run(vec![Some(short), row("ok", 2.0, false)]);
        let summary = result.unwrap();
        assert_eq!(summary.records_written, 1);
        assert_eq!(summary.read_failures, 1);
        assert_eq!(csv, "NAME,PRICE\nok,2.00\n");
    }

    #[test]
    fn fields_needing_quotes() {
        let (result, csv) = run(vec![row("Smith, John", 0.5, false)]);
        assert!(result.is_ok());
        assert_eq!(csv, "NAME,PRICE\n\"Smith, John\",0.50\n");
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_failure_is_fatal() {
        let mut source = FakeSource {
            fields: fields(),
            records: vec![row("Hello", 1.0, false)],
        };
        let error = export(&mut source, BrokenSink).unwrap_err();
        assert!(matches!(
            error.kind(),
            ErrorKind::IoError(_) | ErrorKind::Csv(_)
        ));
    }

    /// Accepts `capacity` bytes, then fails every write
    struct FillingSink {
        written: Vec<u8>,
        capacity: usize,
    }

    impl Write for FillingSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let room = self.capacity - self.written.len();
            if room == 0 {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
            }
            let accepted = room.min(buf.len());
            self.written.extend_from_slice(&buf[..accepted]);
            Ok(accepted)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_failing_midway_keeps_earlier_rows() {
        let records: Vec<_> = (0..5_000)
            .map(|i| row(&format!("item{}", i), 1.5, false))
            .collect();
        let (_, complete) = run(records.clone());

        let mut source = FakeSource {
            fields: fields(),
            records,
        };
        let mut sink = FillingSink {
            written: Vec::new(),
            capacity: 20_000,
        };
        let error = export(&mut source, &mut sink).unwrap_err();
        assert!(matches!(
            error.kind(),
            ErrorKind::IoError(_) | ErrorKind::Csv(_)
        ));

        let written = String::from_utf8(sink.written).unwrap();
        assert_eq!(written.len(), 20_000);
        assert!(written.starts_with("NAME,PRICE\nitem0,1.50\nitem1,1.50\n"));
        assert!(complete.starts_with(&written));
    }
}
