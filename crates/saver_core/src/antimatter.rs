//! Framed zlib save codec used by Antimatter Dimensions exports.
//!
//! A framed blob is `PREFIX + payload + SUFFIX` where the payload is
//! base64-encoded deflated JSON text, run through a character substitution
//! that keeps `+`, `/`, and `0` out of the save string.

use std::io::{self, Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::{CodecError, CodecErrorCode};
use crate::value::SaveValue;

pub const SAVE_PREFIX: &str = "AntimatterDimensionsSavefileFormatAAB";
pub const SAVE_SUFFIX: &str = "EndOfSavefile";

/// Decode a framed save blob into a document.
///
/// The payload is first tried as plain base64. Externally produced blobs
/// may carry the substitution cipher, so on any failure the payload is
/// repaired (`0b`→`+`, `0c`→`/`, `0a`→`0`) and the pipeline retried.
pub fn decode(text: &str) -> Result<SaveValue, CodecError> {
    let trimmed = text.trim();
    let Some(start) = trimmed.find(SAVE_PREFIX) else {
        return Err(CodecError::new(
            CodecErrorCode::FormatUnrecognized,
            "input does not carry the framed save prefix",
        ));
    };

    let interior = &trimmed[start + SAVE_PREFIX.len()..];
    let interior = match interior.rfind(SAVE_SUFFIX) {
        Some(end) => &interior[..end],
        None => interior,
    };
    let payload: String = interior.chars().filter(|c| !c.is_whitespace()).collect();

    match decode_payload(&payload) {
        Ok(document) => Ok(document),
        Err(direct_err) => decode_payload(&deobfuscate(&payload)).map_err(|repaired_err| {
            CodecError::new(
                CodecErrorCode::FramedDecode,
                format!(
                    "failed to decode framed payload: direct: {direct_err}; after substitution repair: {repaired_err}"
                ),
            )
        }),
    }
}

/// Encode a document as a framed save blob. Exactly inverts the direct
/// decode path, modulo the substitution cipher which decode repairs away.
pub fn encode(document: &SaveValue) -> Result<String, CodecError> {
    let json = document.to_json_text().map_err(|e| {
        CodecError::new(
            CodecErrorCode::Encode,
            format!("failed to serialize document: {e}"),
        )
    })?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(json.as_bytes())
        .and_then(|_| encoder.finish())
        .map(|compressed| {
            let encoded = STANDARD.encode(compressed);
            format!("{SAVE_PREFIX}{}{SAVE_SUFFIX}", obfuscate(&encoded))
        })
        .map_err(|e| {
            CodecError::new(
                CodecErrorCode::Encode,
                format!("failed to compress document: {e}"),
            )
        })
}

fn decode_payload(payload: &str) -> io::Result<SaveValue> {
    let compressed = STANDARD
        .decode(payload)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut inflated = Vec::new();
    decoder.read_to_end(&mut inflated)?;

    let text = String::from_utf8(inflated)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    SaveValue::from_json_text(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Forward substitution, as a single pass so the `0` characters introduced
/// for `+` and `/` are never re-substituted.
fn obfuscate(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    for c in encoded.chars() {
        match c {
            '+' => out.push_str("0b"),
            '/' => out.push_str("0c"),
            '0' => out.push_str("0a"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse substitution; the three scans must run in this order.
fn deobfuscate(encoded: &str) -> String {
    encoded.replace("0b", "+").replace("0c", "/").replace("0a", "0")
}
