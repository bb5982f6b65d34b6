mod engine;
mod types;

pub use crate::error::{CodecError, CodecErrorCode};
pub use crate::hexjson::{decode_hex_or_json, encode_as_hex};
pub use crate::merge::merge_into_template;
pub use crate::value::{SaveNumber, SaveValue};
pub use engine::{decode_save, detect_format, encode_save, encode_save_as};
pub use types::{DecodedSave, SaveFormat};
