use canonical_json::to_string;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Value could not be converted to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Floating point numbers have no canonical form in this profile.
    #[error("floating point number at {0}")]
    FloatingPoint(String),
    /// Generic failure from the RFC 8785 encoder.
    #[error("other error: {0}")]
    Other(String),
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Produces the canonical (RFC 8785) UTF-8 bytes of a serializable value.
///
/// These bytes are what transaction signatures and payload hashes commit to,
/// so two parties serializing the same header or event always agree on them.
/// Only integers are accepted as JSON numbers.
pub fn canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CanonicalizationError> {
    let value = serde_json::to_value(value)?;
    validate(&value, Path::root())?;
    let canonical = to_string(&value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
    Ok(canonical.into_bytes())
}

fn validate(value: &Value, path: Path) -> Result<(), CanonicalizationError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                validate(child, path.push_field(key))?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                validate(item, path.push_index(idx))?;
            }
            Ok(())
        }
        Value::Number(num) if num.is_f64() => {
            Err(CanonicalizationError::FloatingPoint(path.to_string()))
        }
        _ => Ok(()),
    }
}
