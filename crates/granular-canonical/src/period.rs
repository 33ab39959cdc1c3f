use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Time interval a certificate attests to.
///
/// Deserialization does not enforce `start < end`; verifiers report the
/// violation as a verdict instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl Period {
    /// Creates a period, rejecting empty or inverted intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::EmptyPeriod {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Length of the period (negative when inverted).
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}
