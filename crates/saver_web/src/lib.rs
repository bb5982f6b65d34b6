//! String-in/string-out boundary for the browser UI. Documents cross the
//! boundary as JSON text; the UI owns parsing, rendering, and editing.

use saver_core::core_api::{
    CodecError, CodecErrorCode, SaveFormat, SaveValue, decode_hex_or_json, decode_save,
    encode_as_hex, encode_save, encode_save_as, merge_into_template,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

impl From<CodecError> for WebError {
    fn from(err: CodecError) -> Self {
        let code = match err.code {
            CodecErrorCode::FormatUnrecognized => "format_unrecognized",
            CodecErrorCode::FramedDecode => "framed_decode",
            CodecErrorCode::UnframedDecode => "unframed_decode",
            CodecErrorCode::CorruptDictionaryReference => "corrupt_dictionary_reference",
            CodecErrorCode::TruncatedStream => "truncated_stream",
            CodecErrorCode::InvalidHexLength => "invalid_hex_length",
            CodecErrorCode::InvalidHexChars => "invalid_hex_chars",
            CodecErrorCode::Encode => "encode_failed",
        };
        Self::new(code, err.message)
    }
}

/// Decode a pasted or uploaded save blob; returns the document as JSON text.
#[wasm_bindgen]
pub fn decode_save_text(text: &str) -> Result<String, JsValue> {
    decode_save_text_impl(text).map_err(|err| err.to_js_value())
}

/// Encode a document (JSON text) as a framed save blob for download.
#[wasm_bindgen]
pub fn encode_save_text(json: &str) -> Result<String, JsValue> {
    encode_save_text_impl(json, None).map_err(|err| err.to_js_value())
}

/// Encode a document choosing the framing: "antimatter" or "atom".
#[wasm_bindgen]
pub fn encode_save_text_as(json: &str, format: &str) -> Result<String, JsValue> {
    parse_format(format)
        .and_then(|format| encode_save_text_impl(json, Some(format)))
        .map_err(|err| err.to_js_value())
}

/// Decode converter input (hex or JSON text) into document JSON text.
#[wasm_bindgen]
pub fn decode_converter_text(text: &str) -> Result<String, JsValue> {
    decode_converter_text_impl(text).map_err(|err| err.to_js_value())
}

/// Hex-encode a document (JSON text) for the converter workflow.
#[wasm_bindgen]
pub fn encode_converter_hex(json: &str) -> Result<String, JsValue> {
    encode_converter_hex_impl(json).map_err(|err| err.to_js_value())
}

/// Merge an old document into a template document; both arrive and leave
/// as JSON text.
#[wasm_bindgen]
pub fn convert_save_text(old_json: &str, template_json: &str) -> Result<String, JsValue> {
    convert_save_text_impl(old_json, template_json).map_err(|err| err.to_js_value())
}

fn decode_save_text_impl(text: &str) -> Result<String, WebError> {
    if text.trim().is_empty() {
        return Err(WebError::new(
            "format_unrecognized",
            "The pasted save is empty. Paste or upload a save blob first.",
        ));
    }
    let decoded = decode_save(text).map_err(WebError::from)?;
    document_to_json(&decoded.document)
}

fn encode_save_text_impl(json: &str, format: Option<SaveFormat>) -> Result<String, WebError> {
    let document = parse_document(json)?;
    let encoded = match format {
        Some(format) => encode_save_as(&document, format),
        None => encode_save(&document),
    };
    encoded.map_err(WebError::from)
}

fn decode_converter_text_impl(text: &str) -> Result<String, WebError> {
    let document = decode_hex_or_json(text).map_err(WebError::from)?;
    document_to_json(&document)
}

fn encode_converter_hex_impl(json: &str) -> Result<String, WebError> {
    let document = parse_document(json)?;
    encode_as_hex(&document).map_err(WebError::from)
}

fn convert_save_text_impl(old_json: &str, template_json: &str) -> Result<String, WebError> {
    let old = parse_document(old_json)?;
    let template = parse_document(template_json)?;
    document_to_json(&merge_into_template(&old, &template))
}

fn parse_document(json: &str) -> Result<SaveValue, WebError> {
    SaveValue::from_json_text(json).map_err(|e| {
        WebError::new("invalid_input", format!("document is not valid JSON: {e}"))
    })
}

fn document_to_json(document: &SaveValue) -> Result<String, WebError> {
    document.to_json_text().map_err(|e| {
        WebError::new(
            "encode_failed",
            format!("failed to serialize decoded document: {e}"),
        )
    })
}

fn parse_format(raw: &str) -> Result<SaveFormat, WebError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "ad" | "antimatter" | "framed" => Ok(SaveFormat::Antimatter),
        "atom" | "atom-idle" | "atomidle" | "unframed" => Ok(SaveFormat::AtomIdle),
        _ => Err(WebError::new(
            "invalid_input",
            format!("Invalid format '{raw}'. Expected one of: antimatter, atom"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        convert_save_text_impl, decode_converter_text_impl, decode_save_text_impl,
        encode_save_text_impl, parse_format,
    };
    use saver_core::core_api::SaveFormat;

    #[test]
    fn save_text_round_trips_through_the_boundary() {
        let json = r#"{"antimatter":"1.86e+11205","infinities":3}"#;
        let blob = encode_save_text_impl(json, None).expect("encode should succeed");
        let decoded = decode_save_text_impl(&blob).expect("decode should succeed");
        assert_eq!(decoded, json);
    }

    #[test]
    fn unframed_encoding_is_reachable() {
        let json = r#"{"atoms":"5"}"#;
        let blob = encode_save_text_impl(json, Some(SaveFormat::AtomIdle))
            .expect("encode should succeed");
        let decoded = decode_save_text_impl(&blob).expect("decode should succeed");
        assert_eq!(decoded, json);
    }

    #[test]
    fn empty_input_is_rejected_up_front() {
        let err = decode_save_text_impl("   ").expect_err("empty input should fail");
        assert_eq!(err.code, "format_unrecognized");
    }

    #[test]
    fn malformed_document_json_is_invalid_input() {
        let err = encode_save_text_impl("{not json", None).expect_err("bad json should fail");
        assert_eq!(err.code, "invalid_input");
    }

    #[test]
    fn converter_accepts_hex_and_merges() {
        // hex of {"atoms":"5"}
        let decoded =
            decode_converter_text_impl("7b2261746f6d73223a2235227d").expect("hex decode");
        assert_eq!(decoded, r#"{"atoms":"5"}"#);

        let merged = convert_save_text_impl(
            r#"{"a":1,"b":[{"x":1}]}"#,
            r#"{"a":0,"b":[{"x":0,"y":9}],"c":7}"#,
        )
        .expect("merge");
        assert_eq!(merged, r#"{"a":1,"b":[{"x":1,"y":9}],"c":7}"#);
    }

    #[test]
    fn converter_reports_hex_errors_with_codes() {
        let err = decode_converter_text_impl("7b226").expect_err("odd length should fail");
        assert_eq!(err.code, "invalid_hex_length");
    }

    #[test]
    fn parse_format_accepts_aliases() {
        assert_eq!(
            parse_format("Antimatter").expect("alias"),
            SaveFormat::Antimatter
        );
        assert_eq!(parse_format(" atom ").expect("alias"), SaveFormat::AtomIdle);
        assert!(parse_format("zip").is_err());
    }
}
