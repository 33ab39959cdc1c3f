use serde::{Deserialize, Serialize};

/// Outcome of verifying one transaction.
///
/// Serialized as `{ "valid": bool, "error_message": string }` where the
/// message is empty exactly when the verdict is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "VerdictWire", from = "VerdictWire")]
pub enum VerificationResult {
    /// The transaction may be appended.
    Valid,
    /// The transaction must be rejected, with the first violated rule.
    Invalid(String),
}

impl VerificationResult {
    /// Shorthand for an invalid verdict.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }

    /// Whether the verdict is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The rejection reason, empty for a valid verdict.
    pub fn error_message(&self) -> &str {
        match self {
            Self::Valid => "",
            Self::Invalid(reason) => reason,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct VerdictWire {
    valid: bool,
    #[serde(default)]
    error_message: String,
}

impl From<VerificationResult> for VerdictWire {
    fn from(result: VerificationResult) -> Self {
        match result {
            VerificationResult::Valid => Self {
                valid: true,
                error_message: String::new(),
            },
            VerificationResult::Invalid(reason) => Self {
                valid: false,
                error_message: reason,
            },
        }
    }
}

impl From<VerdictWire> for VerificationResult {
    fn from(wire: VerdictWire) -> Self {
        if wire.valid {
            Self::Valid
        } else {
            Self::Invalid(wire.error_message)
        }
    }
}
