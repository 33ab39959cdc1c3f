//! Output formatting utilities.

use granular_canonical::{bytes, VerificationResult};
use granular_core::{AllocationSlice, CertificateSlice, GranularCertificate};
use serde_json::{json, Value};

/// Pretty JSON, `{}` if serialization fails.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// `{valid, error_message}` of a verdict.
pub fn verdict_json(verdict: &VerificationResult) -> Value {
    serde_json::to_value(verdict).unwrap_or(Value::Null)
}

fn slice_json(slice: &CertificateSlice) -> Value {
    json!({
        "slice_id": slice.id().to_string(),
        "commitment": bytes::encode(slice.commitment.as_bytes()),
        "owner": bytes::encode(slice.owner.as_bytes()),
    })
}

fn allocation_json(allocation: &AllocationSlice) -> Value {
    json!({
        "allocation_id": allocation.allocation_id,
        "slice": slice_json(&allocation.slice),
        "production_certificate_id": allocation.production_certificate_id,
        "consumption_certificate_id": allocation.consumption_certificate_id,
        "production_source_slice": allocation.production_source_slice.to_string(),
        "consumption_source_slice": allocation.consumption_source_slice.to_string(),
    })
}

/// Public view of a projected certificate. Carries no opening material.
pub fn certificate_json(certificate: &GranularCertificate, events: usize) -> Value {
    json!({
        "certificate_id": certificate.id(),
        "type": certificate.certificate_type(),
        "grid_area": certificate.grid_area(),
        "period": certificate.period(),
        "asset_id_hash": bytes::encode(certificate.asset_id_hash()),
        "event_count": events,
        "slices": certificate.slices().map(slice_json).collect::<Vec<_>>(),
        "allocations": certificate.allocations().map(allocation_json).collect::<Vec<_>>(),
        "claims": certificate.claims().map(allocation_json).collect::<Vec<_>>(),
    })
}
