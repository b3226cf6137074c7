//! Support for working with different codepages / encodings.

use crate::error::DecodeError;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

mod encoding_rs;

pub use self::encoding_rs::EncodingRs;

/// Trait for reading strings from the table and memo files.
pub trait Encoding: EncodingClone + Send {
    /// Decode encoding into UTF-8 string. If codepoints can't be represented, an error is returned.
    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, DecodeError>;
}

/// Trait to be able to clone a `Box<dyn Encoding>`
pub trait EncodingClone {
    fn clone_box(&self) -> Box<dyn Encoding>;
}

impl<T> EncodingClone for T
where
    T: 'static + Encoding + Clone,
{
    fn clone_box(&self) -> Box<dyn Encoding> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Encoding> {
    fn clone(&self) -> Box<dyn Encoding> {
        self.clone_box()
    }
}

/// The encodings that can be selected by name when opening a table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TableEncoding {
    /// Windows-1250, the single byte Windows code page
    #[default]
    Win1250,
    /// Big5, Traditional Chinese double byte encoding
    Big5,
    /// UTF-8
    Utf8,
}

impl TableEncoding {
    pub const ALL: [TableEncoding; 3] = [Self::Win1250, Self::Big5, Self::Utf8];

    /// The name used to select this encoding
    pub fn name(self) -> &'static str {
        match self {
            Self::Win1250 => "win1250",
            Self::Big5 => "big5",
            Self::Utf8 => "utf8",
        }
    }

    /// Looks up an encoding by its name, case insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|encoding| encoding.name().eq_ignore_ascii_case(name))
    }

    /// Same as [Self::from_name] but unknown names fall back to the default
    /// encoding, with a warning.
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            let fallback = Self::default();
            log::warn!(
                "Unsupported encoding: {}. Using {} as default.",
                name,
                fallback
            );
            fallback
        })
    }

    pub fn to_encoding(self) -> EncodingRs {
        let encoding = match self {
            Self::Win1250 => ::encoding_rs::WINDOWS_1250,
            Self::Big5 => ::encoding_rs::BIG5,
            Self::Utf8 => ::encoding_rs::UTF_8,
        };
        EncodingRs::from(encoding)
    }
}

impl fmt::Display for TableEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TableEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unsupported encoding '{}'", s))
    }
}

#[derive(Clone)]
pub(crate) struct DynEncoding {
    inner: Box<dyn Encoding>,
}

impl DynEncoding {
    pub(crate) fn new<E: Encoding + 'static>(encoding: E) -> Self {
        Self {
            inner: Box::new(encoding) as Box<dyn Encoding>,
        }
    }
}

impl fmt::Debug for DynEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynEncoding(...)")
    }
}

impl Encoding for DynEncoding {
    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, DecodeError> {
        self.inner.decode(bytes)
    }
}
