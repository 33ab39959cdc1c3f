use bulletproofs::{BulletproofGens, PedersenGens};
use std::sync::OnceLock;

use crate::range_proof::RANGE_BITS;

static PEDERSEN: OnceLock<PedersenGens> = OnceLock::new();
static BULLETPROOF: OnceLock<BulletproofGens> = OnceLock::new();

/// Value base `G` and blinding base `H`.
pub fn pedersen_gens() -> &'static PedersenGens {
    PEDERSEN.get_or_init(PedersenGens::default)
}

/// Generators for single-party range proofs over [`RANGE_BITS`] bits.
pub fn bulletproof_gens() -> &'static BulletproofGens {
    BULLETPROOF.get_or_init(|| BulletproofGens::new(RANGE_BITS, 1))
}
