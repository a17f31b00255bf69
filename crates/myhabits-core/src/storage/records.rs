//! Versioned record envelopes for persisted collections.
//!
//! Collections are written as `{"version": N, "items": [...]}`. Version 0 is
//! the first, unversioned layout, a bare JSON array, and is upgraded on
//! read. Content that cannot be parsed at all decodes to an empty collection
//! with a warning; the next write to that key replaces it. A collection
//! carrying a version newer than `SCHEMA_VERSION` still decodes, but the
//! habit store refuses to write it back rather than downgrade it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Current collection schema version.
///
/// Increment this when the shape of a stored record changes, and teach
/// `upgrade` how to lift the previous version.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored<T> {
    Versioned { version: u32, items: Vec<T> },
    Legacy(Vec<T>),
}

/// Result of decoding one stored collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub items: Vec<T>,
    /// Version found on disk, `None` when the key was absent or unreadable.
    pub found_version: Option<u32>,
}

impl<T> Decoded<T> {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            found_version: None,
        }
    }

    /// True when the stored value is older than `SCHEMA_VERSION`.
    pub fn needs_upgrade(&self) -> bool {
        self.found_version.is_some_and(|v| v < SCHEMA_VERSION)
    }
}

/// Decode the raw value stored under `key`.
pub fn decode_collection<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Decoded<T> {
    let Some(raw) = raw else {
        return Decoded::empty();
    };

    match serde_json::from_str::<Stored<T>>(raw) {
        Ok(stored) => upgrade(key, stored),
        Err(e) => {
            tracing::warn!(key, error = %e, "unreadable collection, treating as empty");
            Decoded::empty()
        }
    }
}

fn upgrade<T>(key: &str, stored: Stored<T>) -> Decoded<T> {
    match stored {
        Stored::Legacy(items) => {
            tracing::debug!(key, count = items.len(), "upgrading unversioned collection");
            Decoded {
                items,
                found_version: Some(0),
            }
        }
        Stored::Versioned { version, items } => {
            if version > SCHEMA_VERSION {
                tracing::warn!(
                    key,
                    version,
                    supported = SCHEMA_VERSION,
                    "collection written by a newer version"
                );
            }
            Decoded {
                items,
                found_version: Some(version),
            }
        }
    }
}

/// Encode a collection at the current schema version.
pub fn encode_collection<T: Serialize>(items: &[T]) -> Result<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        items,
    })?)
}

/// Decode a single nullable record, `None` on absence or parse failure.
pub fn decode_record<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(key, error = %e, "unreadable record, treating as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_is_empty_without_version() {
        let decoded: Decoded<u32> = decode_collection("k", None);
        assert!(decoded.items.is_empty());
        assert_eq!(decoded.found_version, None);
        assert!(!decoded.needs_upgrade());
    }

    #[test]
    fn bare_array_is_version_zero() {
        let decoded: Decoded<u32> = decode_collection("k", Some("[1,2,3]"));
        assert_eq!(decoded.items, vec![1, 2, 3]);
        assert_eq!(decoded.found_version, Some(0));
        assert!(decoded.needs_upgrade());
    }

    #[test]
    fn envelope_roundtrip() {
        let raw = encode_collection(&[4u32, 5]).unwrap();
        assert_eq!(raw, r#"{"version":1,"items":[4,5]}"#);
        let decoded: Decoded<u32> = decode_collection("k", Some(&raw));
        assert_eq!(decoded.items, vec![4, 5]);
        assert!(!decoded.needs_upgrade());
    }

    #[test]
    fn garbage_falls_back_to_empty() {
        let decoded: Decoded<u32> = decode_collection("k", Some("{not json"));
        assert!(decoded.items.is_empty());
        assert_eq!(decoded.found_version, None);
    }

    #[test]
    fn bad_record_is_absent() {
        assert_eq!(decode_record::<u32>("k", Some("\"x\"")), None);
        assert_eq!(decode_record::<u32>("k", Some("7")), Some(7));
        assert_eq!(decode_record::<u32>("k", None), None);
    }
}
