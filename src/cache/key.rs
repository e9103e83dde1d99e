//! Cache Key Module
//!
//! Deterministic fingerprints for cacheable requests and SHA-256 content
//! hashes for uploaded files.

use std::collections::BTreeMap;
use std::io::{self, Read};

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Chunk size for streaming content hashes
const HASH_CHUNK_SIZE: usize = 64 * 1024;

// == Make Key ==
/// Builds the cache key for `operation` called with `args`.
///
/// The key is `"<operation>:<sha256 of canonical args>"`. Canonical form
/// sorts object fields at every level and drops `null` fields, so field
/// order never matters and an omitted optional argument matches `None`.
///
/// Arguments that fail to serialize (a map with non-string keys, say) hash
/// as `null`.
pub fn make_key<T: Serialize + ?Sized>(operation: &str, args: &T) -> String {
    let canonical = serde_json::to_value(args)
        .map(canonicalize)
        .unwrap_or(Value::Null);

    // Serializing a Value cannot fail
    let encoded = serde_json::to_string(&canonical).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(encoded.as_bytes());
    format!("{}:{}", operation, hex::encode(hasher.finalize()))
}

/// Rebuilds a JSON value with sorted object fields and no null fields.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

// == Content Hash ==
/// Lowercase hex SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Lowercase hex SHA-256 of everything readable from `reader`.
///
/// Reads in fixed-size chunks, so large files never need to be held in
/// memory at once.
pub fn content_hash_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
