//! Detection and removal of the CBOR metadata blob solc appends to runtime code.
//!
//! Layout of the tail of a contract compiled with metadata:
//!
//! ```text
//! ... runtime code ... | a2 64 'i' 'p' 'f' 's' ... (CBOR map) | len_hi len_lo
//! ```
//!
//! The final two bytes hold the big-endian length of the CBOR map, so the blob
//! occupies `length + 2` bytes in total.

use std::collections::BTreeMap;

use ciborium::value::Value;
use ethernity_core::{utils::encode_hex, Error, Result};
use serde::Serialize;
use tracing::debug;

use crate::config::MetadataScan;

/// First two bytes of the metadata map: a two entry map whose first key is a
/// four character text string.
pub const METADATA_MARKER: [u8; 2] = [0xa2, 0x64];

/// Size of the trailing length field.
pub const LENGTH_FIELD_SIZE: usize = 2;

/// Decoded compiler metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipfs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bzzr0: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bzzr1: Option<String>,
    pub experimental: bool,
    /// Keys not covered above, values rendered as text.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
    /// Bytes removed from the code, length field included.
    pub length: usize,
}

/// Whether the metadata marker occurs in the region selected by `scan`.
pub fn has_marker(code: &[u8], scan: MetadataScan) -> bool {
    let region = match scan {
        MetadataScan::Anywhere => code,
        MetadataScan::Trailing(n) => &code[code.len().saturating_sub(n)..],
    };
    region.windows(METADATA_MARKER.len()).any(|w| w == METADATA_MARKER)
}

/// Removes the metadata blob, searching for the marker in the whole stream.
pub fn strip_metadata(code: &[u8]) -> Result<&[u8]> {
    split_metadata(code, MetadataScan::Anywhere).map(|(runtime, _)| runtime)
}

/// Splits `code` into the executable part and its decoded metadata.
///
/// Code without the marker is returned unchanged with `None`.
pub fn split_metadata(code: &[u8], scan: MetadataScan) -> Result<(&[u8], Option<ContractMetadata>)> {
    if !has_marker(code, scan) {
        return Ok((code, None));
    }
    let len = code.len();
    let declared = u16::from_be_bytes([code[len - 2], code[len - 1]]) as usize;
    let total = declared + LENGTH_FIELD_SIZE;
    if total > len {
        return Err(Error::MalformedMetadata(format!(
            "declared length {} exceeds the {} bytes available",
            total, len
        )));
    }
    let start = len - total;
    let mut metadata = decode_metadata(&code[start..len - LENGTH_FIELD_SIZE])?;
    metadata.length = total;
    debug!(removed = total, remaining = start, solc = ?metadata.solc, "stripped contract metadata");
    Ok((&code[..start], Some(metadata)))
}

fn decode_metadata(payload: &[u8]) -> Result<ContractMetadata> {
    let mut reader = payload;
    let value: Value = ciborium::de::from_reader(&mut reader)
        .map_err(|e| Error::MalformedMetadata(format!("invalid CBOR: {}", e)))?;
    if !reader.is_empty() {
        return Err(Error::MalformedMetadata(format!(
            "{} unexpected bytes after the CBOR map",
            reader.len()
        )));
    }
    let entries = match value {
        Value::Map(entries) => entries,
        _ => return Err(Error::MalformedMetadata("metadata is not a CBOR map".to_string())),
    };

    let mut metadata = ContractMetadata::default();
    for (key, value) in entries {
        let key = match key {
            Value::Text(k) => k,
            other => return Err(Error::MalformedMetadata(format!("non-text key {:?}", other))),
        };
        match (key.as_str(), value) {
            ("solc", Value::Bytes(v)) if v.len() == 3 => {
                metadata.solc = Some(format!("{}.{}.{}", v[0], v[1], v[2]));
            }
            ("solc", Value::Text(v)) => metadata.solc = Some(v),
            ("ipfs", Value::Bytes(v)) => metadata.ipfs = Some(encode_hex(&v)),
            ("bzzr0", Value::Bytes(v)) => metadata.bzzr0 = Some(encode_hex(&v)),
            ("bzzr1", Value::Bytes(v)) => metadata.bzzr1 = Some(encode_hex(&v)),
            ("experimental", Value::Bool(v)) => metadata.experimental = v,
            (_, value) => {
                metadata.extra.insert(key.clone(), render_value(&value));
            }
        }
    }
    Ok(metadata)
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Bytes(b) => encode_hex(b),
        Value::Text(t) => t.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Integer(i) => i128::from(*i).to_string(),
        other => format!("{:?}", other),
    }
}
