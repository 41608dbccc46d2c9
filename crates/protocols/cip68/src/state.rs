//! Reference datum encoding and the authorship guard

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cardano_tx::PlutusData;
use forge_core::{KeyHash, ProtocolError};

use crate::constants::{CIP68_VERSION, METADATA_AUTHOR_KEY};

/// The structured metadata carried inline on a reference token:
/// `Constr 0 [ Map{bytes -> bytes}, Int version ]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDatum {
    pub metadata: BTreeMap<String, String>,
    pub version: i64,
}

impl ReferenceDatum {
    pub fn new(metadata: BTreeMap<String, String>) -> Self {
        Self {
            metadata,
            version: CIP68_VERSION,
        }
    }

    /// Recorded author's payment key hash, if any
    pub fn author(&self) -> Option<&str> {
        self.metadata.get(METADATA_AUTHOR_KEY).map(String::as_str)
    }

    /// Encode as a Plutus datum value
    pub fn to_plutus_data(&self) -> PlutusData {
        let entries = self
            .metadata
            .iter()
            .map(|(k, v)| (PlutusData::bytes_utf8(k), PlutusData::bytes_utf8(v)))
            .collect();
        PlutusData::constr(0, vec![PlutusData::map(entries), PlutusData::int(self.version)])
    }

    /// Decode from a Plutus datum value.
    ///
    /// Non-string map entries are skipped; the shape itself must match.
    pub fn from_plutus_data(datum: &PlutusData) -> Result<Self, ProtocolError> {
        let (tag, fields) = datum.as_constr().ok_or_else(|| ProtocolError::DatumParse {
            message: "expected a constructor datum".to_string(),
        })?;

        if tag != 0 || fields.len() < 2 {
            return Err(ProtocolError::DatumParse {
                message: format!("unexpected datum shape: Constr {tag} with {} fields", fields.len()),
            });
        }

        let entries = fields[0].as_map().ok_or_else(|| ProtocolError::DatumParse {
            message: "metadata field is not a map".to_string(),
        })?;

        let mut metadata = BTreeMap::new();
        for entry in entries {
            if let (Some(k), Some(v)) = (entry.k.bytes_as_utf8(), entry.v.bytes_as_utf8()) {
                metadata.insert(k, v);
            }
        }

        let version = fields[1].as_int().ok_or_else(|| ProtocolError::DatumParse {
            message: "version field is not an int".to_string(),
        })?;

        Ok(Self { metadata, version })
    }
}

/// Require the caller to be the recorded author of an asset.
///
/// Aborts before any chain call when the reference datum's author entry is
/// missing or does not match the caller's payment key hash.
pub fn ensure_author(
    datum: &PlutusData,
    asset_name: &str,
    key_hash: &KeyHash,
) -> Result<(), ProtocolError> {
    let parsed = ReferenceDatum::from_plutus_data(datum)?;
    if parsed.author() != Some(key_hash.as_str()) {
        return Err(ProtocolError::NotAssetAuthor {
            asset: asset_name.to_string(),
            key_hash: key_hash.to_string(),
        });
    }
    Ok(())
}
