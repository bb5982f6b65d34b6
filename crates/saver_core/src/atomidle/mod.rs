//! Unframed save codec used by Atom Idle exports: a self-describing
//! LZ78-style compressor over 6-bit symbol streams, with no external
//! compression library involved.
//!
//! Token stream layout: a 2-bit header picks the width of the first
//! literal (0 = 8-bit, 1 = 16-bit code unit, 2 = empty stream). After
//! that, codes of a growing bit width either introduce a literal (codes
//! 0/1), terminate (code 2), or index the dictionary directly. The code
//! width starts at 3 bits and grows by one each time the enlarge counter
//! runs out, which keeps the width just large enough to address the
//! dictionary.

mod bits;

use std::collections::{HashMap, HashSet};

use bits::{BitReader, BitWriter};

use crate::error::{CodecError, CodecErrorCode};
use crate::value::SaveValue;

const CODE_LITERAL_8: u32 = 0;
const CODE_LITERAL_16: u32 = 1;
const CODE_END_OF_STREAM: u32 = 2;
const FIRST_TOKEN_BITS: u32 = 2;

/// Decode an unframed save blob into a document.
pub fn decode(text: &str) -> Result<SaveValue, CodecError> {
    let json = decompress(text)?;
    if json.is_empty() {
        return Err(CodecError::new(
            CodecErrorCode::UnframedDecode,
            "decompression produced no output",
        ));
    }
    SaveValue::from_json_text(&json).map_err(|e| {
        CodecError::new(
            CodecErrorCode::UnframedDecode,
            format!("decompressed text is not a structured document: {e}"),
        )
    })
}

/// Encode a document as an unframed save blob.
pub fn encode(document: &SaveValue) -> Result<String, CodecError> {
    let json = document.to_json_text().map_err(|e| {
        CodecError::new(
            CodecErrorCode::Encode,
            format!("failed to serialize document: {e}"),
        )
    })?;
    Ok(compress(&json))
}

/// Decompress a symbol stream into text.
///
/// The dictionary starts with three placeholder entries (codes 0-2 are
/// claimed by the literal and terminator markers) and grows by one entry
/// per decoded token, so it never needs to be described in the stream.
pub fn decompress(input: &str) -> Result<String, CodecError> {
    if input.is_empty() {
        return Ok(String::new());
    }

    let mut reader = BitReader::new(input.as_bytes());
    let mut dictionary: Vec<Vec<u16>> =
        vec![vec![u16::from(b'0')], vec![u16::from(b'1')], vec![u16::from(b'2')]];
    let mut enlarge_in: u64 = 4;
    let mut code_bits: u32 = 3;

    let first_unit = match reader.read_bits(FIRST_TOKEN_BITS)? {
        CODE_LITERAL_8 => reader.read_bits(8)? as u16,
        CODE_LITERAL_16 => reader.read_bits(16)? as u16,
        CODE_END_OF_STREAM => return Ok(String::new()),
        other => {
            return Err(CodecError::new(
                CodecErrorCode::CorruptDictionaryReference,
                format!("invalid leading code {other}"),
            ));
        }
    };
    dictionary.push(vec![first_unit]);
    let mut previous = vec![first_unit];
    let mut output = vec![first_unit];

    loop {
        let code = reader.read_bits(code_bits)?;
        let entry_index = match code {
            CODE_LITERAL_8 => {
                let unit = reader.read_bits(8)? as u16;
                dictionary.push(vec![unit]);
                enlarge_in -= 1;
                dictionary.len() - 1
            }
            CODE_LITERAL_16 => {
                let unit = reader.read_bits(16)? as u16;
                dictionary.push(vec![unit]);
                enlarge_in -= 1;
                dictionary.len() - 1
            }
            CODE_END_OF_STREAM => {
                return String::from_utf16(&output).map_err(|e| {
                    CodecError::new(
                        CodecErrorCode::UnframedDecode,
                        format!("decompressed data is not valid text: {e}"),
                    )
                });
            }
            direct => direct as usize,
        };
        if enlarge_in == 0 {
            enlarge_in = 1 << code_bits;
            code_bits += 1;
        }

        let entry = if let Some(known) = dictionary.get(entry_index) {
            known.clone()
        } else if entry_index == dictionary.len() {
            // Pending self-reference: the encoder used the entry it was
            // about to create, `previous + previous[0]`.
            let mut pending = previous.clone();
            pending.push(previous[0]);
            pending
        } else {
            return Err(CodecError::new(
                CodecErrorCode::CorruptDictionaryReference,
                format!(
                    "code {entry_index} exceeds dictionary size {}",
                    dictionary.len()
                ),
            ));
        };

        output.extend_from_slice(&entry);
        let mut grown = previous.clone();
        grown.push(entry[0]);
        dictionary.push(grown);
        enlarge_in -= 1;
        previous = entry;

        if enlarge_in == 0 {
            enlarge_in = 1 << code_bits;
            code_bits += 1;
        }
    }
}

/// Compress text into a symbol stream; the exact inverse of
/// [`decompress`].
///
/// The first appearance of each code unit is emitted in literal form (the
/// decoder grows its dictionary from those), every later phrase as a
/// dictionary code. The enlarge counter starts at 2 to compensate for the
/// first literal, which the decoder handles before entering its loop.
pub fn compress(input: &str) -> String {
    let mut dictionary: HashMap<Vec<u16>, u32> = HashMap::new();
    let mut pending_literals: HashSet<Vec<u16>> = HashSet::new();
    let mut next_code: u32 = 3;
    let mut enlarge_in: u64 = 2;
    let mut code_bits: u32 = 2;
    let mut writer = BitWriter::new();
    let mut w: Vec<u16> = Vec::new();

    for unit in input.encode_utf16() {
        let single = vec![unit];
        if !dictionary.contains_key(&single) {
            dictionary.insert(single.clone(), next_code);
            next_code += 1;
            pending_literals.insert(single.clone());
        }

        let mut wc = w.clone();
        wc.push(unit);
        if dictionary.contains_key(&wc) {
            w = wc;
        } else {
            emit_phrase(
                &mut writer,
                &dictionary,
                &mut pending_literals,
                &w,
                &mut enlarge_in,
                &mut code_bits,
            );
            dictionary.insert(wc, next_code);
            next_code += 1;
            w = single;
        }
    }

    if !w.is_empty() {
        emit_phrase(
            &mut writer,
            &dictionary,
            &mut pending_literals,
            &w,
            &mut enlarge_in,
            &mut code_bits,
        );
    }

    writer.push_bits(CODE_END_OF_STREAM, code_bits);
    let stream = writer.finish();
    match stream.len() % 4 {
        1 => stream + "===",
        2 => stream + "==",
        3 => stream + "=",
        _ => stream,
    }
}

fn emit_phrase(
    writer: &mut BitWriter,
    dictionary: &HashMap<Vec<u16>, u32>,
    pending_literals: &mut HashSet<Vec<u16>>,
    phrase: &[u16],
    enlarge_in: &mut u64,
    code_bits: &mut u32,
) {
    if pending_literals.remove(phrase) {
        if phrase[0] < 256 {
            writer.push_bits(CODE_LITERAL_8, *code_bits);
            writer.push_bits(u32::from(phrase[0]), 8);
        } else {
            writer.push_bits(CODE_LITERAL_16, *code_bits);
            writer.push_bits(u32::from(phrase[0]), 16);
        }
        *enlarge_in -= 1;
        if *enlarge_in == 0 {
            *enlarge_in = 1 << *code_bits;
            *code_bits += 1;
        }
    } else {
        writer.push_bits(dictionary[phrase], *code_bits);
    }

    *enlarge_in -= 1;
    if *enlarge_in == 0 {
        *enlarge_in = 1 << *code_bits;
        *code_bits += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{compress, decompress};

    #[test]
    fn empty_text_compresses_to_bare_terminator() {
        assert_eq!(compress(""), "Q===");
        assert_eq!(decompress("Q===").expect("terminator-only stream"), "");
    }

    #[test]
    fn single_character_known_vector() {
        assert_eq!(compress("5"), "KxA=");
        assert_eq!(decompress("KxA=").expect("single literal stream"), "5");
    }

    #[test]
    fn empty_input_decompresses_to_empty() {
        assert_eq!(decompress("").expect("empty input"), "");
    }

    #[test]
    fn round_trips_through_a_pending_self_reference() {
        // "aaa" makes the encoder reference the dictionary entry it is
        // about to create, the classic LZ78 corner case.
        assert_eq!(decompress(&compress("aaa")).expect("round trip"), "aaa");
        assert_eq!(decompress(&compress("aaaaaaa")).expect("round trip"), "aaaaaaa");
    }

    #[test]
    fn round_trips_repetitive_text() {
        let text = "ababababababababababcabcabcabcabc";
        assert_eq!(decompress(&compress(text)).expect("round trip"), text);
    }

    #[test]
    fn round_trips_sixteen_bit_literals() {
        let text = "резервная копия — 保存";
        assert_eq!(decompress(&compress(text)).expect("round trip"), text);
    }
}
