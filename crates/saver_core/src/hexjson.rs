//! Hex/JSON codec backing the converter workflow: input is either
//! structured text already or hex-encoded bytes of structured text.

use crate::error::{CodecError, CodecErrorCode};
use crate::value::SaveValue;

pub fn decode_hex_or_json(text: &str) -> Result<SaveValue, CodecError> {
    let cleaned = text.trim();
    if let Ok(document) = SaveValue::from_json_text(cleaned) {
        return Ok(document);
    }

    if cleaned.is_empty() {
        return Err(CodecError::new(
            CodecErrorCode::FormatUnrecognized,
            "input is empty",
        ));
    }
    if !cleaned.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodecError::new(
            CodecErrorCode::InvalidHexChars,
            "input must be structured text or hex-encoded data",
        ));
    }
    if cleaned.len() % 2 != 0 {
        return Err(CodecError::new(
            CodecErrorCode::InvalidHexLength,
            "hex input has an odd number of digits",
        ));
    }

    let bytes = hex::decode(cleaned).map_err(|e| {
        CodecError::new(CodecErrorCode::InvalidHexChars, format!("invalid hex: {e}"))
    })?;
    let decoded = String::from_utf8(bytes).map_err(|_| {
        CodecError::new(
            CodecErrorCode::FormatUnrecognized,
            "hex payload is not UTF-8 text",
        )
    })?;
    SaveValue::from_json_text(&decoded).map_err(|e| {
        CodecError::new(
            CodecErrorCode::FormatUnrecognized,
            format!("hex payload is not a structured document: {e}"),
        )
    })
}

/// Lowercase hex, two digits per byte, no separators.
pub fn encode_as_hex(document: &SaveValue) -> Result<String, CodecError> {
    let json = document.to_json_text().map_err(|e| {
        CodecError::new(
            CodecErrorCode::Encode,
            format!("failed to serialize document: {e}"),
        )
    })?;
    Ok(hex::encode(json.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::{decode_hex_or_json, encode_as_hex};
    use crate::error::CodecErrorCode;

    #[test]
    fn plain_structured_text_passes_through() {
        let document = decode_hex_or_json(r#"{"atoms":"5"}"#).expect("plain text");
        assert_eq!(
            document.to_json_text().expect("serialize"),
            r#"{"atoms":"5"}"#
        );
    }

    #[test]
    fn hex_round_trip_matches_original_text() {
        let document = decode_hex_or_json("7b2261746f6d73223a2235227d").expect("hex text");
        let encoded = encode_as_hex(&document).expect("encode");
        assert_eq!(encoded, "7b2261746f6d73223a2235227d");
        assert_eq!(
            decode_hex_or_json(&encoded).expect("round trip"),
            document
        );
    }

    #[test]
    fn odd_length_hex_is_rejected() {
        let err = decode_hex_or_json("7b226").expect_err("odd length");
        assert_eq!(err.code, CodecErrorCode::InvalidHexLength);
    }

    #[test]
    fn non_hex_text_is_rejected() {
        let err = decode_hex_or_json("not hex, not a document").expect_err("bad charset");
        assert_eq!(err.code, CodecErrorCode::InvalidHexChars);
    }

    #[test]
    fn hex_of_non_document_payload_is_rejected() {
        // "zz" as bytes: 7a7a decodes but is not structured text.
        let err = decode_hex_or_json("7a7a").expect_err("payload not a document");
        assert_eq!(err.code, CodecErrorCode::FormatUnrecognized);
    }
}
