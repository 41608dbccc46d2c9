//! Plutus datum values in cardano "detailed schema" JSON
//!
//! The detailed schema is the JSON encoding used by cardano-cli and the
//! hosted indexing providers for datum values:
//!
//! ```text
//! {"constructor": 0, "fields": [...]}
//! {"map": [{"k": ..., "v": ...}]}
//! {"list": [...]}
//! {"int": 42}
//! {"bytes": "<hex>"}
//! ```

use serde::{Deserialize, Serialize};

/// A key/value pair inside a Plutus map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub k: PlutusData,
    pub v: PlutusData,
}

/// A Plutus datum / redeemer value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlutusData {
    Constr {
        constructor: u64,
        fields: Vec<PlutusData>,
    },
    Map {
        map: Vec<MapEntry>,
    },
    List {
        list: Vec<PlutusData>,
    },
    Int {
        int: i64,
    },
    Bytes {
        bytes: String,
    },
}

impl PlutusData {
    /// Constructor value (`Constr tag [fields]`)
    pub fn constr(tag: u64, fields: Vec<PlutusData>) -> Self {
        Self::Constr {
            constructor: tag,
            fields,
        }
    }

    pub fn map(entries: Vec<(PlutusData, PlutusData)>) -> Self {
        Self::Map {
            map: entries.into_iter().map(|(k, v)| MapEntry { k, v }).collect(),
        }
    }

    pub fn list(items: Vec<PlutusData>) -> Self {
        Self::List { list: items }
    }

    pub fn int(value: i64) -> Self {
        Self::Int { int: value }
    }

    /// Byte string from pre-encoded hex
    pub fn bytes(hex_str: impl Into<String>) -> Self {
        Self::Bytes {
            bytes: hex_str.into(),
        }
    }

    /// Byte string from a UTF-8 string (hex-encoded on the wire)
    pub fn bytes_utf8(s: &str) -> Self {
        Self::Bytes {
            bytes: hex::encode(s.as_bytes()),
        }
    }

    pub fn as_constr(&self) -> Option<(u64, &[PlutusData])> {
        match self {
            Self::Constr {
                constructor,
                fields,
            } => Some((*constructor, fields)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[MapEntry]> {
        match self {
            Self::Map { map } => Some(map),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int { int } => Some(*int),
            _ => None,
        }
    }

    pub fn as_bytes_hex(&self) -> Option<&str> {
        match self {
            Self::Bytes { bytes } => Some(bytes),
            _ => None,
        }
    }

    /// Decode a byte string back into UTF-8
    pub fn bytes_as_utf8(&self) -> Option<String> {
        let raw = hex::decode(self.as_bytes_hex()?).ok()?;
        String::from_utf8(raw).ok()
    }

    /// Serialize to detailed-schema JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
