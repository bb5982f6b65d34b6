use crate::antimatter;
use crate::atomidle;
use crate::error::{CodecError, CodecErrorCode};
use crate::value::SaveValue;

use super::types::{DecodedSave, SaveFormat};

/// Sniff which codec an input blob belongs to. The framed prefix wins
/// wherever it appears; otherwise the input qualifies as unframed only
/// when every character is drawn from the unframed symbol alphabet.
pub fn detect_format(text: &str) -> Option<SaveFormat> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains(antimatter::SAVE_PREFIX) {
        return Some(SaveFormat::Antimatter);
    }
    if trimmed.bytes().all(is_symbol_char) {
        return Some(SaveFormat::AtomIdle);
    }
    None
}

/// Decode a save blob of either format.
pub fn decode_save(text: &str) -> Result<DecodedSave, CodecError> {
    match detect_format(text) {
        Some(SaveFormat::Antimatter) => antimatter::decode(text).map(|document| DecodedSave {
            format: SaveFormat::Antimatter,
            document,
        }),
        Some(SaveFormat::AtomIdle) => atomidle::decode(text.trim()).map(|document| DecodedSave {
            format: SaveFormat::AtomIdle,
            document,
        }),
        None => Err(CodecError::new(
            CodecErrorCode::FormatUnrecognized,
            "input matches neither the framed nor the unframed save shape",
        )),
    }
}

/// Encode a document in the framed format, the one save format the
/// editor hands back out.
pub fn encode_save(document: &SaveValue) -> Result<String, CodecError> {
    antimatter::encode(document)
}

pub fn encode_save_as(document: &SaveValue, format: SaveFormat) -> Result<String, CodecError> {
    match format {
        SaveFormat::Antimatter => antimatter::encode(document),
        SaveFormat::AtomIdle => atomidle::encode(document),
    }
}

fn is_symbol_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'+' || byte == b'/' || byte == b'='
}
