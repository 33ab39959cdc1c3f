//! Shared fixture: one in-memory registry with a DK1 issuer.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use ed25519_dalek::SigningKey;
use granular_canonical::{FederatedStreamId, GridArea, Period, SliceId, VerificationResult};
use granular_commitment::{prove_equality, prove_range, prove_sum, split_opening, Opening};
use granular_core::{
    AllocatedEvent, CertificateEvent, CertificateType, ClaimedEvent, ConservationProof,
    EventStore, FederatedModelLoader, GranularCertificate, IssuedEvent, IssuerKeyRegistry,
    IssuerRegistryHandle, MemoryEventStore, ModelLoader, NewSlice, PublicKeyBytes,
    QuantityCommitment, SlicedEvent, Transaction, TransferredEvent, VerificationDispatcher,
};
use rand::rngs::OsRng;
use uuid::Uuid;

pub const REGISTRY: &str = "registry-a";
pub const AREA: &str = "DK1";
pub const OTHER_AREA: &str = "DK2";

pub fn new_key() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

/// Period of `minutes` starting on the hour.
pub fn period_of(minutes: i64) -> Period {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    Period {
        start,
        end: start + Duration::minutes(minutes),
    }
}

pub fn quantity(opening: &Opening, stream: &FederatedStreamId) -> QuantityCommitment {
    QuantityCommitment {
        commitment: opening.commit(),
        range_proof: prove_range(opening, stream.proof_label().as_bytes()).unwrap(),
    }
}

pub fn issued_event(
    stream: &FederatedStreamId,
    certificate_type: CertificateType,
    opening: &Opening,
    owner: &SigningKey,
    period: Period,
) -> IssuedEvent {
    IssuedEvent {
        certificate_id: stream.clone(),
        certificate_type,
        period,
        grid_area: GridArea::new(AREA),
        asset_id_hash: vec![7; 32],
        quantity_commitment: quantity(opening, stream),
        owner_public_key: PublicKeyBytes::from_key(&owner.verifying_key()),
        public_quantity: None,
    }
}

/// Slices `source` into `values`, all owned by `owner`, with a sum-zero proof.
pub fn sliced_event(
    stream: &FederatedStreamId,
    source: &Opening,
    values: &[u32],
    owner: &SigningKey,
) -> (SlicedEvent, Vec<Opening>) {
    let openings: Vec<Opening> = values.iter().map(|v| Opening::random(*v)).collect();
    (slice_into(stream, source, &openings, owner), openings)
}

/// Slices `source` into the given openings, all owned by `owner`.
pub fn slice_into(
    stream: &FederatedStreamId,
    source: &Opening,
    openings: &[Opening],
    owner: &SigningKey,
) -> SlicedEvent {
    let proof = prove_sum(source, openings, stream.proof_label().as_bytes()).unwrap();
    SlicedEvent {
        certificate_id: stream.clone(),
        source_slice: source.commit().slice_id(),
        new_slices: openings
            .iter()
            .map(|opening| NewSlice {
                quantity: quantity(opening, stream),
                new_owner: PublicKeyBytes::from_key(&owner.verifying_key()),
            })
            .collect(),
        conservation: ConservationProof::SumProof { proof },
    }
}

/// Two-way split disclosing the openings.
pub fn disclosed_split(
    stream: &FederatedStreamId,
    source: &Opening,
    amount: u32,
    owner: &SigningKey,
) -> (SlicedEvent, Opening, Opening) {
    let witness = split_opening(source, amount).unwrap();
    let new_slice = |opening: &Opening| NewSlice {
        quantity: quantity(opening, stream),
        new_owner: PublicKeyBytes::from_key(&owner.verifying_key()),
    };
    let event = SlicedEvent {
        certificate_id: stream.clone(),
        source_slice: source.commit().slice_id(),
        new_slices: vec![new_slice(&witness.quantity), new_slice(&witness.remainder)],
        conservation: ConservationProof::DisclosedSplit {
            source: source.clone(),
            quantity: witness.quantity.clone(),
            remainder: witness.remainder.clone(),
            zero_randomizer: witness.zero_randomizer,
        },
    };
    (event, witness.quantity.clone(), witness.remainder.clone())
}

pub fn transferred_event(stream: &FederatedStreamId, slice: SliceId, new_owner: &SigningKey) -> TransferredEvent {
    TransferredEvent {
        certificate_id: stream.clone(),
        source_slice: slice,
        new_owner: PublicKeyBytes::from_key(&new_owner.verifying_key()),
    }
}

pub fn allocated_event(
    allocation_id: Uuid,
    production: (&FederatedStreamId, &Opening),
    consumption: (&FederatedStreamId, &Opening),
) -> AllocatedEvent {
    let label = allocation_id.hyphenated().to_string();
    AllocatedEvent {
        allocation_id,
        production_certificate_id: production.0.clone(),
        consumption_certificate_id: consumption.0.clone(),
        production_source_slice: production.1.commit().slice_id(),
        consumption_source_slice: consumption.1.commit().slice_id(),
        equality_proof: prove_equality(production.1, consumption.1, label.as_bytes()).unwrap(),
    }
}

pub fn claimed_event(stream: &FederatedStreamId, allocation_id: Uuid) -> ClaimedEvent {
    ClaimedEvent {
        certificate_id: stream.clone(),
        allocation_id,
    }
}

pub fn sign(stream: &FederatedStreamId, event: impl Into<CertificateEvent>, key: &SigningKey) -> Transaction {
    Transaction::sign(stream.clone(), &event.into(), key).unwrap()
}

/// An issued certificate and the secrets its holder keeps.
pub struct Issued {
    pub id: FederatedStreamId,
    pub opening: Opening,
    pub owner: SigningKey,
}

pub struct Fixture {
    pub issuer: SigningKey,
    pub issuers: IssuerRegistryHandle,
    pub store: Arc<MemoryEventStore>,
    pub loader: Arc<FederatedModelLoader>,
    pub dispatcher: VerificationDispatcher,
}

impl Fixture {
    pub fn new() -> Self {
        let issuer = new_key();
        let issuers = IssuerRegistryHandle::new(
            IssuerKeyRegistry::new()
                .with_area(GridArea::new(AREA), [issuer.verifying_key()])
                .with_area(GridArea::new(OTHER_AREA), [issuer.verifying_key()]),
        );
        let store = Arc::new(MemoryEventStore::new());
        let loader = Arc::new(FederatedModelLoader::new().with_store(REGISTRY, store.clone()));
        let dispatcher = VerificationDispatcher::new(loader.clone(), loader.clone(), issuers.clone());
        Self {
            issuer,
            issuers,
            store,
            loader,
            dispatcher,
        }
    }

    /// Verifies and, when valid, appends.
    pub async fn submit(&self, transaction: Transaction) -> VerificationResult {
        let verdict = self.dispatcher.verify(&transaction).await.unwrap();
        if verdict.is_valid() {
            self.store.append(transaction).await.unwrap();
        }
        verdict
    }

    pub async fn submit_event(
        &self,
        stream: &FederatedStreamId,
        event: impl Into<CertificateEvent>,
        key: &SigningKey,
    ) -> VerificationResult {
        self.submit(sign(stream, event, key)).await
    }

    pub async fn issue(&self, certificate_type: CertificateType, value: u32) -> Issued {
        self.issue_in(certificate_type, value, period_of(60), AREA).await
    }

    pub async fn issue_in(
        &self,
        certificate_type: CertificateType,
        value: u32,
        period: Period,
        area: &str,
    ) -> Issued {
        let id = FederatedStreamId::random(REGISTRY);
        let opening = Opening::random(value);
        let owner = new_key();
        let mut event = issued_event(&id, certificate_type, &opening, &owner, period);
        event.grid_area = GridArea::new(area);
        assert_eq!(self.submit_event(&id, event, &self.issuer).await, VerificationResult::Valid);
        Issued { id, opening, owner }
    }

    pub async fn model(&self, id: &FederatedStreamId) -> GranularCertificate {
        self.loader.get(id).await.unwrap().0.expect("certificate exists")
    }
}
