// Metadata documents: reading them from disk and shaping the body of the
// dataset creation request.

use crate::error::LoadError;
use serde_json::{Map, Value};
use std::path::Path;

/// Top-level key that, when present, holds the whole creation payload.
pub const WRAPPER_KEY: &str = "datasetVersion";

/// Read and parse one JSON metadata file.
pub fn load_metadata(path: &Path) -> Result<Value, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the creation payload. A document carrying `datasetVersion` is
/// reduced to that key alone; anything else is sent as-is.
pub fn creation_payload(document: Value) -> Value {
    match document {
        Value::Object(mut fields) if fields.contains_key(WRAPPER_KEY) => {
            let mut payload = Map::new();
            if let Some(version) = fields.remove(WRAPPER_KEY) {
                payload.insert(WRAPPER_KEY.to_string(), version);
            }
            Value::Object(payload)
        }
        other => other,
    }
}
