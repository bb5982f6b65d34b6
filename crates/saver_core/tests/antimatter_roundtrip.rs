use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::ZlibEncoder;

use saver_core::antimatter::{self, SAVE_PREFIX, SAVE_SUFFIX};
use saver_core::core_api::CodecErrorCode;
use saver_core::value::{SaveNumber, SaveValue};

fn deflated_base64(json: &str) -> String {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(json.as_bytes())
        .expect("failed to write test payload");
    let compressed = encoder.finish().expect("failed to finish test payload");
    STANDARD.encode(compressed)
}

/// The substitution externally produced blobs carry: bare `0` first, then
/// `+` and `/`, so none of the passes rescan another's output.
fn externally_substituted(encoded: &str) -> String {
    encoded
        .replace('0', "0a")
        .replace('+', "0b")
        .replace('/', "0c")
}

#[test]
fn decodes_plain_framed_blob() {
    let blob = format!("{SAVE_PREFIX}{}{SAVE_SUFFIX}", deflated_base64(r#"{"antimatter":5}"#));
    let document = antimatter::decode(&blob).expect("failed to decode framed blob");

    let expected = SaveValue::from_json_text(r#"{"antimatter":5}"#).expect("expected document");
    assert_eq!(document, expected);
    assert_eq!(
        document.get_path("antimatter"),
        Some(&SaveValue::Number(SaveNumber::Int(5)))
    );
}

#[test]
fn encode_then_decode_returns_the_same_document() {
    let document = SaveValue::from_json_text(
        r#"{"antimatter":"1.86e+11205","infinities":12,"options":{"theme":"dark","news":true},"resources":[1,2.5,null]}"#,
    )
    .expect("test document");

    let blob = antimatter::encode(&document).expect("failed to encode document");
    assert!(blob.starts_with(SAVE_PREFIX));
    assert!(blob.ends_with(SAVE_SUFFIX));

    let decoded = antimatter::decode(&blob).expect("failed to decode encoded blob");
    assert_eq!(decoded, document);
}

#[test]
fn encode_is_stable_for_unmodified_documents() {
    let document = SaveValue::from_json_text(r#"{"antimatter":5,"dimensions":[10,20,30]}"#)
        .expect("test document");
    let blob = antimatter::encode(&document).expect("first encode");
    let decoded = antimatter::decode(&blob).expect("decode");
    let blob_again = antimatter::encode(&decoded).expect("second encode");
    assert_eq!(blob, blob_again);
}

#[test]
fn decodes_blob_with_substituted_payload() {
    let payload = externally_substituted(&deflated_base64(r#"{"antimatter":5}"#));
    let blob = format!("{SAVE_PREFIX}{payload}{SAVE_SUFFIX}");

    let document = antimatter::decode(&blob).expect("failed to decode substituted blob");
    let expected = SaveValue::from_json_text(r#"{"antimatter":5}"#).expect("expected document");
    assert_eq!(document, expected);
}

#[test]
fn payload_whitespace_is_stripped() {
    let encoded = deflated_base64(r#"{"antimatter":5}"#);
    let mid = encoded.len() / 2;
    let blob = format!(
        "  {SAVE_PREFIX}{}\r\n  {}{SAVE_SUFFIX}\n",
        &encoded[..mid],
        &encoded[mid..]
    );

    let document = antimatter::decode(&blob).expect("failed to decode wrapped blob");
    let expected = SaveValue::from_json_text(r#"{"antimatter":5}"#).expect("expected document");
    assert_eq!(document, expected);
}

#[test]
fn missing_suffix_still_decodes() {
    let blob = format!("{SAVE_PREFIX}{}", deflated_base64(r#"{"antimatter":5}"#));
    let document = antimatter::decode(&blob).expect("failed to decode suffixless blob");
    let expected = SaveValue::from_json_text(r#"{"antimatter":5}"#).expect("expected document");
    assert_eq!(document, expected);
}

#[test]
fn garbage_payload_reports_framed_decode_failure() {
    let blob = format!("{SAVE_PREFIX}this is not base64 at all{SAVE_SUFFIX}");
    let err = antimatter::decode(&blob).expect_err("garbage payload should fail");
    assert_eq!(err.code, CodecErrorCode::FramedDecode);
}

#[test]
fn valid_base64_with_non_deflate_bytes_fails_both_paths() {
    let blob = format!("{SAVE_PREFIX}{}{SAVE_SUFFIX}", STANDARD.encode(b"not deflate"));
    let err = antimatter::decode(&blob).expect_err("non-deflate payload should fail");
    assert_eq!(err.code, CodecErrorCode::FramedDecode);
}

#[test]
fn prefixless_input_is_not_this_codec() {
    let err = antimatter::decode("AAAAAA==").expect_err("prefixless input");
    assert_eq!(err.code, CodecErrorCode::FormatUnrecognized);
}
