use serde::{Deserialize, Serialize};

use crate::value::SaveValue;

/// Wire framing a save blob was (or should be) written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveFormat {
    /// Framed zlib blob (`AntimatterDimensionsSavefileFormatAAB` ... `EndOfSavefile`).
    Antimatter,
    /// Unframed dictionary-LZ symbol stream.
    AtomIdle,
}

impl SaveFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Antimatter => "antimatter",
            Self::AtomIdle => "atom-idle",
        }
    }
}

/// A decoded save together with the framing it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSave {
    pub format: SaveFormat,
    pub document: SaveValue,
}
