use super::{DecodeError, Encoding};

use std::borrow::Cow;

/// [Encoding] backed by an `encoding_rs` encoding.
///
/// Malformed byte sequences are reported as errors instead of being
/// replaced.
#[derive(Copy, Clone)]
pub struct EncodingRs(&'static encoding_rs::Encoding);

impl From<&'static encoding_rs::Encoding> for EncodingRs {
    fn from(item: &'static encoding_rs::Encoding) -> Self {
        EncodingRs(item)
    }
}

impl std::fmt::Debug for EncodingRs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncodingRs({})", self.0.name())
    }
}

impl Encoding for EncodingRs {
    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>, DecodeError> {
        self.0
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(|| DecodeError::Message(format!("malformed {} sequence", self.0.name())))
    }
}
