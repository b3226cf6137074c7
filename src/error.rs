use crate::FieldInfo;

#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Wrapper of `std::io::Error` to forward any reading/writing error
    IoError(std::io::Error),
    /// Wrapper to forward errors whe trying to parse a float from the file
    ParseFloatError(std::num::ParseFloatError),
    /// Wrapper to forward errors whe trying to parse an integer value from the file
    ParseIntError(std::num::ParseIntError),
    /// A Date or DateTime field holds a value that is not a valid calendar date
    InvalidDate,
    /// The file header is not one of a dBase / FoxPro table
    InvalidHeader(&'static str),
    /// Happens when at least one field is a Memo type
    /// and the that additional memo file could not be found / was not given
    MissingMemoFile,
    /// Something went wrong when we tried to open the associated memo file
    ErrorOpeningMemoFile(std::io::Error),
    /// A string from the table could not be decoded
    StringDecodeError(DecodeError),
    /// The requested record does not exist
    RecordOutOfRange { index: usize, num_records: usize },
    /// The requested field does not exist
    FieldOutOfRange { index: usize, num_fields: usize },
    /// A record does not hold one value per field of the table
    FieldCountMismatch { expected: usize, actual: usize },
    /// The CSV sink rejected a row
    Csv(csv::Error),
    /// A record could not be serialized to JSON
    Json(serde_json::Error),
}

/// The error type for this crate
pub struct Error {
    pub(crate) record_num: usize,
    pub(crate) field: Option<FieldInfo>,
    pub(crate) kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, record_num: usize) -> Self {
        Self {
            record_num,
            field: None,
            kind,
        }
    }

    pub(crate) fn with_field(kind: ErrorKind, record_num: usize, field: &FieldInfo) -> Self {
        Self {
            record_num,
            field: Some(field.clone()),
            kind,
        }
    }

    pub(crate) fn io_error(error: std::io::Error, record_num: usize) -> Self {
        Self::new(ErrorKind::IoError(error), record_num)
    }

    pub(crate) fn csv_error(error: csv::Error, record_num: usize) -> Self {
        Self::new(ErrorKind::Csv(error), record_num)
    }

    /// Returns the kind of error that happened
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the index of record index for which the error occurred
    ///
    /// 0 may be the first record or an error that occurred before
    /// handling the first record (eg: an error reading the header)
    pub fn record_num(&self) -> usize {
        self.record_num
    }

    /// Returns the information of the record field for which the error occurred
    pub fn field(&self) -> &Option<FieldInfo> {
        &self.field
    }
}

impl From<std::io::Error> for ErrorKind {
    fn from(e: std::io::Error) -> Self {
        ErrorKind::IoError(e)
    }
}

impl From<std::num::ParseFloatError> for ErrorKind {
    fn from(p: std::num::ParseFloatError) -> Self {
        ErrorKind::ParseFloatError(p)
    }
}

impl From<std::num::ParseIntError> for ErrorKind {
    fn from(p: std::num::ParseIntError) -> Self {
        ErrorKind::ParseIntError(p)
    }
}

impl From<DecodeError> for ErrorKind {
    fn from(e: DecodeError) -> Self {
        ErrorKind::StringDecodeError(e)
    }
}

impl From<time::error::ComponentRange> for ErrorKind {
    fn from(_: time::error::ComponentRange) -> Self {
        ErrorKind::InvalidDate
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field_info) = &self.field {
            write!(
                f,
                "Error {{ record_num: {}, kind: {:?}, {} }}",
                self.record_num, self.kind, field_info
            )
        } else {
            write!(
                f,
                "Error {{ record_num: {}, kind: {:?} }}",
                self.record_num, self.kind
            )
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field_info) => write!(
                f,
                "record {}, field '{}': {}",
                self.record_num,
                field_info.name(),
                self.kind
            ),
            None => write!(f, "record {}: {}", self.record_num, self.kind),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::IoError(e) | ErrorKind::ErrorOpeningMemoFile(e) => Some(e),
            ErrorKind::ParseFloatError(e) => Some(e),
            ErrorKind::ParseIntError(e) => Some(e),
            ErrorKind::StringDecodeError(e) => Some(e),
            ErrorKind::Csv(e) => Some(e),
            ErrorKind::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::IoError(e) => write!(f, "I/O error: {}", e),
            ErrorKind::ParseFloatError(e) => write!(f, "invalid decimal value: {}", e),
            ErrorKind::ParseIntError(e) => write!(f, "invalid integer value: {}", e),
            ErrorKind::InvalidDate => write!(f, "invalid date"),
            ErrorKind::InvalidHeader(reason) => write!(f, "invalid header: {}", reason),
            ErrorKind::MissingMemoFile => write!(f, "the memo file could not be found"),
            ErrorKind::ErrorOpeningMemoFile(e) => {
                write!(f, "the memo file could not be opened: {}", e)
            }
            ErrorKind::StringDecodeError(e) => write!(f, "{}", e),
            ErrorKind::RecordOutOfRange { index, num_records } => write!(
                f,
                "record {} is out of range, the table has {} records",
                index, num_records
            ),
            ErrorKind::FieldOutOfRange { index, num_fields } => write!(
                f,
                "field {} is out of range, the table has {} fields",
                index, num_fields
            ),
            ErrorKind::FieldCountMismatch { expected, actual } => write!(
                f,
                "the record has {} values but the table declares {} fields",
                actual, expected
            ),
            ErrorKind::Csv(e) => write!(f, "CSV error: {}", e),
            ErrorKind::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub enum DecodeError {
    Message(String),
}

impl From<String> for DecodeError {
    fn from(msg: String) -> Self {
        Self::Message(msg)
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Message(msg) => write!(f, "string could not be decoded: {}", msg),
        }
    }
}

impl std::error::Error for DecodeError {}
