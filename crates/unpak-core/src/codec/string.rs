//! Character data.

use super::{Codec, TArray};
use crate::archive::Archive;
use crate::error::Result;
use std::fmt;

/// Length-prefixed, NUL-terminated string
///
/// Stored as an array of bytes whose last element is the terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FString(String);

impl FString {
    /// Creates a string from `s`
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the string contents
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Codec for FString {
    fn serialize(&mut self, ar: &mut Archive) -> Result<()> {
        let chars = TArray::<u8>::decode(ar)?;
        let bytes = chars.as_slice();
        let bytes = match bytes.iter().position(|&b| b == 0) {
            Some(end) => &bytes[..end],
            None => bytes,
        };
        self.0 = String::from_utf8_lossy(bytes).into_owned();
        Ok(())
    }
}

impl fmt::Display for FString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<FString> for String {
    fn from(s: FString) -> Self {
        s.0
    }
}

/// Serializes a fixed-length character field.
///
/// Loading reads exactly `length` bytes and returns the text up to the first
/// NUL. Storing writes `text` truncated or NUL-padded to `length` bytes.
pub fn serialize_chars(ar: &mut Archive, text: &mut String, length: usize) -> Result<()> {
    let mut buf = vec![0u8; length];
    if !ar.is_loading() {
        let n = text.len().min(length);
        buf[..n].copy_from_slice(&text.as_bytes()[..n]);
    }
    ar.transfer(&mut buf)?;
    if ar.is_loading() {
        let end = buf.iter().position(|&b| b == 0).unwrap_or(length);
        *text = String::from_utf8_lossy(&buf[..end]).into_owned();
    }
    Ok(())
}
