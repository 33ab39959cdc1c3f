use granular_canonical::{FederatedStreamId, GridArea, Period, SliceId};
use granular_commitment::{Commitment, Opening, Scalar};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::PayloadError;
use crate::keys::PublicKeyBytes;

/// Whether a certificate attests production or consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateType {
    /// Produced electricity.
    Production,
    /// Consumed electricity.
    Consumption,
}

impl CertificateType {
    /// The type on the other side of an allocation.
    pub fn opposite(self) -> Self {
        match self {
            CertificateType::Production => CertificateType::Consumption,
            CertificateType::Consumption => CertificateType::Production,
        }
    }
}

/// Hidden quantity with its range proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityCommitment {
    /// Pedersen commitment to the quantity.
    pub commitment: Commitment,
    /// Range proof over the commitment, labelled with the certificate stream id.
    #[serde(with = "granular_canonical::bytes")]
    pub range_proof: Vec<u8>,
}

/// Creates a certificate and its first slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedEvent {
    /// Stream of the new certificate.
    pub certificate_id: FederatedStreamId,
    /// Production or consumption.
    #[serde(rename = "type")]
    pub certificate_type: CertificateType,
    /// Metering period.
    pub period: Period,
    /// Grid area the quantity was metered in.
    pub grid_area: GridArea,
    /// Opaque digest identifying the metering asset.
    #[serde(with = "granular_canonical::bytes", default)]
    pub asset_id_hash: Vec<u8>,
    /// Hidden quantity of the initial slice.
    pub quantity_commitment: QuantityCommitment,
    /// Owner of the initial slice.
    pub owner_public_key: PublicKeyBytes,
    /// Opening of the quantity, for certificates that publish it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_quantity: Option<Opening>,
}

/// One slice produced by splitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSlice {
    /// Hidden quantity of the slice.
    pub quantity: QuantityCommitment,
    /// Owner of the slice.
    pub new_owner: PublicKeyBytes,
}

/// Evidence that the new slices add up to the source slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConservationProof {
    /// Zero-knowledge proof that `source − Σ new = 0·G + x·H`.
    SumProof {
        /// Equality proof between the source and the summed new commitments.
        #[serde(with = "granular_canonical::bytes")]
        proof: Vec<u8>,
    },
    /// Openings disclosed to the verifier for a two-way split.
    DisclosedSplit {
        /// Opening of the source slice.
        source: Opening,
        /// Opening of the first new slice.
        quantity: Opening,
        /// Opening of the second new slice.
        remainder: Opening,
        /// `source.r − (quantity.r + remainder.r)`.
        #[serde(with = "granular_commitment::scalar")]
        zero_randomizer: Scalar,
    },
}

/// Splits one slice into several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlicedEvent {
    /// Certificate stream.
    pub certificate_id: FederatedStreamId,
    /// Slice being consumed.
    pub source_slice: SliceId,
    /// Replacement slices.
    pub new_slices: Vec<NewSlice>,
    /// Conservation evidence.
    pub conservation: ConservationProof,
}

/// Hands a slice to a new owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferredEvent {
    /// Certificate stream.
    pub certificate_id: FederatedStreamId,
    /// Slice changing hands.
    pub source_slice: SliceId,
    /// Receiving owner.
    pub new_owner: PublicKeyBytes,
}

/// Pairs a production slice with a consumption slice of equal quantity.
///
/// The same payload is appended to both certificate streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedEvent {
    /// Allocation identifier, also the equality proof label.
    pub allocation_id: Uuid,
    /// Production certificate stream.
    pub production_certificate_id: FederatedStreamId,
    /// Consumption certificate stream.
    pub consumption_certificate_id: FederatedStreamId,
    /// Production slice being allocated.
    pub production_source_slice: SliceId,
    /// Consumption slice being allocated.
    pub consumption_source_slice: SliceId,
    /// Equality proof between production and consumption commitments.
    #[serde(with = "granular_canonical::bytes")]
    pub equality_proof: Vec<u8>,
}

impl AllocatedEvent {
    /// Label binding the equality proof to this allocation.
    pub fn proof_label(&self) -> String {
        self.allocation_id.hyphenated().to_string()
    }

    /// Certificate id on the given side.
    pub fn certificate_id(&self, side: CertificateType) -> &FederatedStreamId {
        match side {
            CertificateType::Production => &self.production_certificate_id,
            CertificateType::Consumption => &self.consumption_certificate_id,
        }
    }

    /// Source slice on the given side.
    pub fn source_slice(&self, side: CertificateType) -> &SliceId {
        match side {
            CertificateType::Production => &self.production_source_slice,
            CertificateType::Consumption => &self.consumption_source_slice,
        }
    }
}

/// Finalises an allocation on one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedEvent {
    /// Certificate stream.
    pub certificate_id: FederatedStreamId,
    /// Allocation being claimed.
    pub allocation_id: Uuid,
}

/// Discriminant of [`CertificateEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`IssuedEvent`].
    Issued,
    /// [`SlicedEvent`].
    Sliced,
    /// [`TransferredEvent`].
    Transferred,
    /// [`AllocatedEvent`].
    Allocated,
    /// [`ClaimedEvent`].
    Claimed,
}

impl EventKind {
    /// All kinds.
    pub const ALL: [EventKind; 5] = [
        EventKind::Issued,
        EventKind::Sliced,
        EventKind::Transferred,
        EventKind::Allocated,
        EventKind::Claimed,
    ];

    /// Payload type name used in transaction headers.
    pub fn payload_type(self) -> &'static str {
        match self {
            EventKind::Issued => "granular.v1.IssuedEvent",
            EventKind::Sliced => "granular.v1.SlicedEvent",
            EventKind::Transferred => "granular.v1.TransferredEvent",
            EventKind::Allocated => "granular.v1.AllocatedEvent",
            EventKind::Claimed => "granular.v1.ClaimedEvent",
        }
    }

    /// Looks up a kind by its payload type name.
    pub fn from_payload_type(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.payload_type() == name)
    }
}

/// Closed set of certificate events.
#[derive(Debug, Clone, PartialEq)]
pub enum CertificateEvent {
    /// Certificate creation.
    Issued(IssuedEvent),
    /// Slice split.
    Sliced(SlicedEvent),
    /// Ownership change.
    Transferred(TransferredEvent),
    /// Cross-certificate allocation.
    Allocated(AllocatedEvent),
    /// Allocation finalisation.
    Claimed(ClaimedEvent),
}

impl CertificateEvent {
    /// Kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            CertificateEvent::Issued(_) => EventKind::Issued,
            CertificateEvent::Sliced(_) => EventKind::Sliced,
            CertificateEvent::Transferred(_) => EventKind::Transferred,
            CertificateEvent::Allocated(_) => EventKind::Allocated,
            CertificateEvent::Claimed(_) => EventKind::Claimed,
        }
    }

    /// Whether this event may be appended to `stream`.
    ///
    /// Allocations belong to both of their certificate streams.
    pub fn targets(&self, stream: &FederatedStreamId) -> bool {
        match self {
            CertificateEvent::Issued(e) => &e.certificate_id == stream,
            CertificateEvent::Sliced(e) => &e.certificate_id == stream,
            CertificateEvent::Transferred(e) => &e.certificate_id == stream,
            CertificateEvent::Allocated(e) => {
                &e.production_certificate_id == stream || &e.consumption_certificate_id == stream
            }
            CertificateEvent::Claimed(e) => &e.certificate_id == stream,
        }
    }

    /// Decodes a payload of the named type.
    pub fn decode(payload_type: &str, payload: &[u8]) -> Result<Self, PayloadError> {
        let kind = EventKind::from_payload_type(payload_type)
            .ok_or_else(|| PayloadError::UnsupportedType(payload_type.to_string()))?;
        Self::decode_kind(kind, payload)
    }

    /// Decodes a payload of a known kind.
    pub fn decode_kind(kind: EventKind, payload: &[u8]) -> Result<Self, PayloadError> {
        Ok(match kind {
            EventKind::Issued => CertificateEvent::Issued(serde_json::from_slice(payload)?),
            EventKind::Sliced => CertificateEvent::Sliced(serde_json::from_slice(payload)?),
            EventKind::Transferred => CertificateEvent::Transferred(serde_json::from_slice(payload)?),
            EventKind::Allocated => CertificateEvent::Allocated(serde_json::from_slice(payload)?),
            EventKind::Claimed => CertificateEvent::Claimed(serde_json::from_slice(payload)?),
        })
    }

    /// Canonical JSON bytes of the payload.
    pub fn payload_bytes(&self) -> Result<Vec<u8>, granular_canonical::CanonicalizationError> {
        match self {
            CertificateEvent::Issued(e) => granular_canonical::canonical_bytes(e),
            CertificateEvent::Sliced(e) => granular_canonical::canonical_bytes(e),
            CertificateEvent::Transferred(e) => granular_canonical::canonical_bytes(e),
            CertificateEvent::Allocated(e) => granular_canonical::canonical_bytes(e),
            CertificateEvent::Claimed(e) => granular_canonical::canonical_bytes(e),
        }
    }
}

impl From<IssuedEvent> for CertificateEvent {
    fn from(event: IssuedEvent) -> Self {
        CertificateEvent::Issued(event)
    }
}

impl From<SlicedEvent> for CertificateEvent {
    fn from(event: SlicedEvent) -> Self {
        CertificateEvent::Sliced(event)
    }
}

impl From<TransferredEvent> for CertificateEvent {
    fn from(event: TransferredEvent) -> Self {
        CertificateEvent::Transferred(event)
    }
}

impl From<AllocatedEvent> for CertificateEvent {
    fn from(event: AllocatedEvent) -> Self {
        CertificateEvent::Allocated(event)
    }
}

impl From<ClaimedEvent> for CertificateEvent {
    fn from(event: ClaimedEvent) -> Self {
        CertificateEvent::Claimed(event)
    }
}
