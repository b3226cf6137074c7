//! dbfreader opens FoxPro / dBase tables (`.dbf`), formats their values
//! and exports them to CSV.
//!
//! # Reading
//!
//! A [Table] is opened with explicit [TableOptions], which carry the text
//! encoding used to decode Character and Memo fields.
//!
//! Records are fetched by index; each [Record] holds its
//! [FieldValue]s in the same order as the table's [FieldInfo]s.
//!
//! ```no_run
//! use dbfreader::{FieldValue, Table, TableEncoding, TableOptions};
//!
//! let options = TableOptions::new().with_encoding(TableEncoding::Big5);
//! let mut table = Table::open_with_options("stations.dbf", options).unwrap();
//! for index in 0..table.num_records() {
//!     let record = table.record_at(index).unwrap();
//!     for (info, value) in table.fields().iter().zip(record.values()) {
//!         match value {
//!             FieldValue::Character(text) => println!("{}: {:?}", info.name(), text.trim()),
//!             other => println!("{}: {}", info.name(), other),
//!         }
//!     }
//! }
//! ```
//!
//! # Exporting
//!
//! [export()] streams every non deleted record of a [RecordSource] into a CSV sink,
//! skipping records that cannot be read.
//!
//! ```no_run
//! let mut table = dbfreader::Table::open_with_options(
//!     "stations.dbf",
//!     dbfreader::TableOptions::default(),
//! ).unwrap();
//! let summary = dbfreader::export_to_path(&mut table, "stations.csv").unwrap();
//! println!("{} records written", summary.records_written);
//! ```

mod encoding;
mod error;
mod field;
mod header;
mod memo;
mod record;
mod ser;
mod table;

pub mod display;
pub mod export;
pub mod format;

pub use crate::encoding::{Encoding, EncodingRs, TableEncoding};
pub use crate::error::{DecodeError, Error, ErrorKind};
pub use crate::export::{export, export_to_path, ExportSummary, RecordSource};
pub use crate::field::types::{FieldType, FieldValue};
pub use crate::field::{FieldConversionError, FieldInfo};
pub use crate::format::{format_record, format_value, FormatContext};
pub use crate::record::Record;
pub use crate::ser::JsonRecord;
pub use crate::table::{Table, TableOptions};
