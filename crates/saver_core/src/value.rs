use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

/// A decoded save document: the schema-free tree both codecs decode into
/// and encode from. Key order of tables is preserved across a round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveValue {
    Null,
    Bool(bool),
    Number(SaveNumber),
    Text(String),
    List(Vec<SaveValue>),
    Table(IndexMap<String, SaveValue>),
}

/// Numeric leaf of a [`SaveValue`] tree.
///
/// Idle games routinely store magnitudes far beyond `f64` range (for
/// example `1.86e+11205`). Such literals are kept verbatim in `Big` so
/// they survive a decode/encode round trip byte-for-byte instead of
/// collapsing to infinity.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveNumber {
    Int(i64),
    Float(f64),
    Big(String),
}

impl SaveValue {
    /// Parse JSON-equivalent text into a document.
    pub fn from_json_text(text: &str) -> Result<Self, serde_json::Error> {
        let raw: JsonValue = serde_json::from_str(text)?;
        Ok(Self::from_json(raw))
    }

    /// Serialize the document as compact JSON-equivalent text.
    pub fn to_json_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_json())
    }

    /// Serialize the document as pretty-printed JSON-equivalent text.
    pub fn to_json_text_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_json())
    }

    pub fn from_json(raw: JsonValue) -> Self {
        match raw {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Number(SaveNumber::from_json_number(&n)),
            JsonValue::String(s) => Self::Text(s),
            JsonValue::Array(items) => {
                Self::List(items.into_iter().map(Self::from_json).collect())
            }
            JsonValue::Object(entries) => {
                let mut table = IndexMap::with_capacity(entries.len());
                for (key, value) in entries {
                    table.insert(key, Self::from_json(value));
                }
                Self::Table(table)
            }
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Number(n) => n.to_json(),
            Self::Text(s) => JsonValue::String(s.clone()),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Table(table) => {
                let mut entries = JsonMap::new();
                for (key, value) in table {
                    entries.insert(key.clone(), value.to_json());
                }
                JsonValue::Object(entries)
            }
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }

    pub fn as_table(&self) -> Option<&IndexMap<String, SaveValue>> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Walk a dot-separated path (`"player.resources.0"`); numeric
    /// segments index lists.
    pub fn get_path(&self, path: &str) -> Option<&SaveValue> {
        let mut current = self;
        for segment in path.split('.') {
            current = match current {
                Self::Table(table) => table.get(segment)?,
                Self::List(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get_path_mut(&mut self, path: &str) -> Option<&mut SaveValue> {
        let mut current = self;
        for segment in path.split('.') {
            current = match current {
                Self::Table(table) => table.get_mut(segment)?,
                Self::List(items) => items.get_mut(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Assign a value at a dot-separated path, creating intermediate
    /// containers along the way (a list when the next segment is numeric,
    /// a table otherwise). Returns false when an existing non-container
    /// value blocks the walk.
    pub fn set_path(&mut self, path: &str, value: SaveValue) -> bool {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };

        let mut current = self;
        for (i, segment) in parents.iter().enumerate() {
            let next_is_index = segments[i + 1].parse::<usize>().is_ok();
            current = match current {
                SaveValue::Table(table) => {
                    let slot = table
                        .entry((*segment).to_string())
                        .or_insert(SaveValue::Null);
                    if matches!(slot, SaveValue::Null) {
                        *slot = if next_is_index {
                            SaveValue::List(Vec::new())
                        } else {
                            SaveValue::Table(IndexMap::new())
                        };
                    }
                    if !matches!(slot, SaveValue::Table(_) | SaveValue::List(_)) {
                        return false;
                    }
                    slot
                }
                SaveValue::List(items) => {
                    let Ok(index) = segment.parse::<usize>() else {
                        return false;
                    };
                    if index >= items.len() {
                        items.resize(index + 1, SaveValue::Null);
                    }
                    &mut items[index]
                }
                _ => return false,
            };
        }

        match current {
            SaveValue::Table(table) => {
                table.insert((*last).to_string(), value);
                true
            }
            SaveValue::List(items) => {
                let Ok(index) = last.parse::<usize>() else {
                    return false;
                };
                if index >= items.len() {
                    items.resize(index + 1, SaveValue::Null);
                }
                items[index] = value;
                true
            }
            _ => false,
        }
    }

    /// Remove the value at a dot-separated path. List removal shifts the
    /// remaining elements; table removal keeps the surviving key order.
    pub fn remove_path(&mut self, path: &str) -> bool {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };

        let mut current = self;
        for segment in parents {
            current = match current {
                SaveValue::Table(table) => match table.get_mut(*segment) {
                    Some(next) => next,
                    None => return false,
                },
                SaveValue::List(items) => {
                    let Ok(index) = segment.parse::<usize>() else {
                        return false;
                    };
                    match items.get_mut(index) {
                        Some(next) => next,
                        None => return false,
                    }
                }
                _ => return false,
            };
        }

        match current {
            SaveValue::Table(table) => table.shift_remove(*last).is_some(),
            SaveValue::List(items) => match last.parse::<usize>() {
                Ok(index) if index < items.len() => {
                    items.remove(index);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}

impl SaveNumber {
    fn from_json_number(n: &JsonNumber) -> Self {
        if let Some(i) = n.as_i64() {
            return Self::Int(i);
        }
        let literal = n.to_string();
        if !literal.contains(['.', 'e', 'E']) {
            // Integer beyond i64 range; keep the digits rather than round
            // through f64.
            return Self::Big(literal);
        }
        match n.as_f64() {
            Some(f) if f.is_finite() => Self::Float(f),
            _ => Self::Big(literal),
        }
    }

    fn to_json(&self) -> JsonValue {
        match self {
            Self::Int(i) => JsonValue::Number(JsonNumber::from(*i)),
            Self::Float(f) => match JsonNumber::from_f64(*f) {
                Some(n) => JsonValue::Number(n),
                // Non-finite floats have no JSON form; JSON.stringify emits null.
                None => JsonValue::Null,
            },
            Self::Big(literal) => {
                JsonValue::Number(JsonNumber::from_string_unchecked(literal.clone()))
            }
        }
    }
}

impl fmt::Display for SaveNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Big(literal) => f.write_str(literal),
        }
    }
}
