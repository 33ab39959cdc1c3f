//! The projected state of one certificate.

use std::collections::{BTreeMap, BTreeSet};

use ed25519_dalek::VerifyingKey;
use granular_canonical::{FederatedStreamId, GridArea, Period, SliceId};
use granular_commitment::Commitment;
use tracing::warn;
use uuid::Uuid;

use crate::events::{
    AllocatedEvent, CertificateEvent, CertificateType, ClaimedEvent, IssuedEvent, SlicedEvent,
    TransferredEvent,
};

/// A committed quantity and the key allowed to spend it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateSlice {
    /// Hidden quantity.
    pub commitment: Commitment,
    /// Current owner.
    pub owner: VerifyingKey,
}

impl CertificateSlice {
    /// Lookup key of this slice.
    pub fn id(&self) -> SliceId {
        self.commitment.slice_id()
    }
}

/// A slice removed from the active set by an allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationSlice {
    /// The allocated slice.
    pub slice: CertificateSlice,
    /// Allocation identifier.
    pub allocation_id: Uuid,
    /// Production side of the allocation.
    pub production_certificate_id: FederatedStreamId,
    /// Consumption side of the allocation.
    pub consumption_certificate_id: FederatedStreamId,
    /// Production slice named by the allocation.
    pub production_source_slice: SliceId,
    /// Consumption slice named by the allocation.
    pub consumption_source_slice: SliceId,
}

impl AllocationSlice {
    /// Certificate on the other side of the allocation from `side`.
    pub fn counterpart(&self, side: CertificateType) -> &FederatedStreamId {
        match side {
            CertificateType::Production => &self.consumption_certificate_id,
            CertificateType::Consumption => &self.production_certificate_id,
        }
    }
}

/// Current state of a granular certificate, folded from its event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GranularCertificate {
    id: FederatedStreamId,
    certificate_type: CertificateType,
    grid_area: GridArea,
    period: Period,
    asset_id_hash: Vec<u8>,
    slices: BTreeMap<SliceId, CertificateSlice>,
    allocations: BTreeMap<Uuid, AllocationSlice>,
    claims: BTreeMap<Uuid, AllocationSlice>,
    consumed: BTreeSet<SliceId>,
}

impl GranularCertificate {
    /// Creates the certificate described by an issuance.
    ///
    /// Returns `None` when the owner key does not decode, which only a log
    /// that bypassed verification can contain.
    pub fn issue(event: &IssuedEvent) -> Option<Self> {
        let Some(owner) = event.owner_public_key.to_verifying_key() else {
            warn!(certificate = %event.certificate_id, "issued event has an undecodable owner key");
            return None;
        };
        let slice = CertificateSlice {
            commitment: event.quantity_commitment.commitment,
            owner,
        };
        Some(Self {
            id: event.certificate_id.clone(),
            certificate_type: event.certificate_type,
            grid_area: event.grid_area.clone(),
            period: event.period,
            asset_id_hash: event.asset_id_hash.clone(),
            slices: BTreeMap::from([(slice.id(), slice)]),
            allocations: BTreeMap::new(),
            claims: BTreeMap::new(),
            consumed: BTreeSet::new(),
        })
    }

    /// Stream id.
    pub fn id(&self) -> &FederatedStreamId {
        &self.id
    }

    /// Production or consumption.
    pub fn certificate_type(&self) -> CertificateType {
        self.certificate_type
    }

    /// Grid area.
    pub fn grid_area(&self) -> &GridArea {
        &self.grid_area
    }

    /// Metering period.
    pub fn period(&self) -> &Period {
        &self.period
    }

    /// Opaque asset digest from issuance.
    pub fn asset_id_hash(&self) -> &[u8] {
        &self.asset_id_hash
    }

    /// Active slices in id order.
    pub fn slices(&self) -> impl Iterator<Item = &CertificateSlice> {
        self.slices.values()
    }

    /// Pending allocations in id order.
    pub fn allocations(&self) -> impl Iterator<Item = &AllocationSlice> {
        self.allocations.values()
    }

    /// Claimed allocations in id order.
    pub fn claims(&self) -> impl Iterator<Item = &AllocationSlice> {
        self.claims.values()
    }

    /// Active slice by id.
    pub fn get_certificate_slice(&self, id: &SliceId) -> Option<&CertificateSlice> {
        self.slices.get(id)
    }

    /// Pending allocation by id.
    pub fn get_allocation(&self, id: &Uuid) -> Option<&AllocationSlice> {
        self.allocations.get(id)
    }

    /// Claimed allocation by id.
    pub fn get_claim(&self, id: &Uuid) -> Option<&AllocationSlice> {
        self.claims.get(id)
    }

    /// Whether `id` was ever allocated on this certificate.
    pub fn has_allocation_id(&self, id: &Uuid) -> bool {
        self.allocations.contains_key(id) || self.claims.contains_key(id)
    }

    /// Whether `id` names a slice this certificate holds or has held.
    ///
    /// Covers active, allocated and claimed slices and slices consumed by a
    /// split. Such an id can never be minted again.
    pub fn is_slice_id_used(&self, id: &SliceId) -> bool {
        self.slices.contains_key(id)
            || self.consumed.contains(id)
            || self
                .allocations
                .values()
                .chain(self.claims.values())
                .any(|allocation| allocation.slice.id() == *id)
    }

    /// Applies a later event from this certificate's stream.
    ///
    /// Effects that reference absent slices or allocations are skipped.
    pub fn apply(&mut self, event: &CertificateEvent) {
        match event {
            CertificateEvent::Issued(_) => {
                warn!(certificate = %self.id, "ignoring repeated issued event");
            }
            CertificateEvent::Sliced(e) => self.apply_sliced(e),
            CertificateEvent::Transferred(e) => self.apply_transferred(e),
            CertificateEvent::Allocated(e) => self.apply_allocated(e),
            CertificateEvent::Claimed(e) => self.apply_claimed(e),
        }
    }

    fn apply_sliced(&mut self, event: &SlicedEvent) {
        if self.slices.remove(&event.source_slice).is_none() {
            warn!(certificate = %self.id, slice = %event.source_slice, "sliced event references a missing slice");
            return;
        }
        self.consumed.insert(event.source_slice);
        for new_slice in &event.new_slices {
            let commitment = new_slice.quantity.commitment;
            let Some(owner) = new_slice.new_owner.to_verifying_key() else {
                warn!(certificate = %self.id, slice = %commitment.slice_id(), "skipping slice with undecodable owner");
                continue;
            };
            let slice = CertificateSlice { commitment, owner };
            if self.is_slice_id_used(&slice.id()) {
                warn!(certificate = %self.id, slice = %slice.id(), "skipping slice with an id already in use");
                continue;
            }
            self.slices.insert(slice.id(), slice);
        }
    }

    fn apply_transferred(&mut self, event: &TransferredEvent) {
        let Some(slice) = self.slices.get_mut(&event.source_slice) else {
            warn!(certificate = %self.id, slice = %event.source_slice, "transferred event references a missing slice");
            return;
        };
        match event.new_owner.to_verifying_key() {
            Some(owner) => slice.owner = owner,
            None => warn!(certificate = %self.id, slice = %event.source_slice, "transfer to undecodable owner ignored"),
        }
    }

    fn apply_allocated(&mut self, event: &AllocatedEvent) {
        if self.has_allocation_id(&event.allocation_id) {
            warn!(certificate = %self.id, allocation = %event.allocation_id, "allocation id already applied");
            return;
        }
        let slice_id = event.source_slice(self.certificate_type);
        let Some(slice) = self.slices.remove(slice_id) else {
            warn!(certificate = %self.id, slice = %slice_id, "allocated event references a missing slice");
            return;
        };
        self.allocations.insert(
            event.allocation_id,
            AllocationSlice {
                slice,
                allocation_id: event.allocation_id,
                production_certificate_id: event.production_certificate_id.clone(),
                consumption_certificate_id: event.consumption_certificate_id.clone(),
                production_source_slice: event.production_source_slice,
                consumption_source_slice: event.consumption_source_slice,
            },
        );
    }

    fn apply_claimed(&mut self, event: &ClaimedEvent) {
        let Some(allocation) = self.allocations.remove(&event.allocation_id) else {
            warn!(certificate = %self.id, allocation = %event.allocation_id, "claimed event references a missing allocation");
            return;
        };
        self.claims.insert(event.allocation_id, allocation);
    }
}
