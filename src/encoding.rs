//! Character encoding helpers.
//!
//! The filter operates on already-decoded text and never infers or changes
//! encodings; pipelines decode fetched bytes here with a caller-supplied
//! encoding before handing the markup on.

use encoding_rs::Encoding;

pub use encoding_rs::UTF_8;

use crate::error::{Error, Result};

/// Resolve a WHATWG encoding label (`"utf-8"`, `"ISO-8859-1"`, ...).
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes()).ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

/// Decode `bytes` with the given encoding.
///
/// Invalid sequences become the Unicode replacement character (�) rather
/// than causing errors.
#[must_use]
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (decoded, _encoding_used, _had_errors) = encoding.decode(bytes);
    decoded.into_owned()
}
