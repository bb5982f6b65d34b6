use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecErrorCode {
    /// Input matches neither the framed nor the unframed save shape.
    FormatUnrecognized,
    /// Framed prefix matched but both the direct and substitution-repaired
    /// inflate paths failed.
    FramedDecode,
    /// Unframed decompression produced no document.
    UnframedDecode,
    /// A dictionary code pointed outside the live dictionary and did not
    /// match the pending self-reference rule.
    CorruptDictionaryReference,
    /// The bit reader ran out of input before a terminator code.
    TruncatedStream,
    InvalidHexLength,
    InvalidHexChars,
    /// A document could not be serialized for encoding.
    Encode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    pub code: CodecErrorCode,
    pub message: String,
}

impl CodecError {
    pub fn new(code: CodecErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for CodecError {}
