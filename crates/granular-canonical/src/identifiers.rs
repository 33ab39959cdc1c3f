use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    RegistryName,
    "Name of an independent registry hosting certificate streams.",
    r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$"
);
newtype!(
    GridArea,
    "Grid (price) area a certificate was issued in, e.g. `DK1`.",
    r"^[A-Za-z0-9][A-Za-z0-9_-]{0,63}$"
);

/// Globally unique address of one certificate's event stream.
///
/// The registry names the ledger that hosts the stream; the UUID is unique
/// within it. Immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FederatedStreamId {
    /// Hosting registry.
    pub registry: RegistryName,
    /// Stream identifier within the registry.
    pub stream_id: Uuid,
}

impl FederatedStreamId {
    /// Creates a stream id.
    pub fn new(registry: impl Into<RegistryName>, stream_id: Uuid) -> Self {
        Self {
            registry: registry.into(),
            stream_id,
        }
    }

    /// Creates a stream id with a fresh random UUID.
    pub fn random(registry: impl Into<RegistryName>) -> Self {
        Self::new(registry, Uuid::new_v4())
    }

    /// Label binding range proofs to this stream (the hyphenated UUID).
    pub fn proof_label(&self) -> String {
        self.stream_id.hyphenated().to_string()
    }
}

impl fmt::Display for FederatedStreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.registry, self.stream_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_area_pattern() {
        assert!(GridArea::parse("DK1").is_ok());
        assert!(GridArea::parse("").is_err());
        assert!(GridArea::parse("DK 1").is_err());
    }

    #[test]
    fn stream_id_display_and_json_shape() {
        let id = FederatedStreamId::new(
            "registry-a",
            Uuid::parse_str("7c9e6679-7425-40de-944b-e07fc1f90ae7").unwrap(),
        );
        assert_eq!(id.to_string(), "registry-a/7c9e6679-7425-40de-944b-e07fc1f90ae7");
        assert_eq!(id.proof_label(), "7c9e6679-7425-40de-944b-e07fc1f90ae7");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            r#"{"registry":"registry-a","stream_id":"7c9e6679-7425-40de-944b-e07fc1f90ae7"}"#
        );
    }
}
