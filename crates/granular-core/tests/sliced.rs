mod common;

use common::*;
use granular_canonical::{FederatedStreamId, SliceId, VerificationResult};
use granular_commitment::{split_opening, Opening};
use granular_core::{CertificateType, ConservationProof, PublicKeyBytes};

fn invalid(reason: &str) -> VerificationResult {
    VerificationResult::invalid(reason)
}

#[tokio::test]
async fn disclosed_split_by_owner_is_valid() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let (event, quantity, remainder) = disclosed_split(&cert.id, &cert.opening, 150, &cert.owner);

    let foreign = sign(&cert.id, event.clone(), &new_key());
    assert_eq!(fx.submit(foreign).await, invalid("Invalid signature for slice"));

    assert_eq!(fx.submit_event(&cert.id, event, &cert.owner).await, VerificationResult::Valid);

    let model = fx.model(&cert.id).await;
    assert!(model.get_certificate_slice(&cert.opening.commit().slice_id()).is_none());
    assert!(model.get_certificate_slice(&quantity.commit().slice_id()).is_some());
    assert!(model.get_certificate_slice(&remainder.commit().slice_id()).is_some());
}

#[tokio::test]
async fn sum_proof_over_three_slices_is_valid() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let (event, openings) = sliced_event(&cert.id, &cert.opening, &[100, 100, 50], &cert.owner);

    assert_eq!(fx.submit_event(&cert.id, event, &cert.owner).await, VerificationResult::Valid);
    assert_eq!(fx.model(&cert.id).await.slices().count(), openings.len());
}

#[tokio::test]
async fn consumed_slice_cannot_be_sliced_again() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let (event, _) = sliced_event(&cert.id, &cert.opening, &[200, 50], &cert.owner);
    assert_eq!(fx.submit_event(&cert.id, event.clone(), &cert.owner).await, VerificationResult::Valid);

    assert_eq!(fx.submit_event(&cert.id, event, &cert.owner).await, invalid("Slice not found"));
}

#[tokio::test]
async fn missing_certificate() {
    let fx = Fixture::new();
    let id = FederatedStreamId::random(REGISTRY);
    let owner = new_key();
    let (event, _) = sliced_event(&id, &Opening::random(10), &[5, 5], &owner);

    assert_eq!(fx.submit_event(&id, event, &owner).await, invalid("Certificate does not exist"));
}

#[tokio::test]
async fn unknown_slice() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let (mut event, _) = sliced_event(&cert.id, &cert.opening, &[200, 50], &cert.owner);
    event.source_slice = SliceId::from_commitment_bytes(b"not a slice");

    assert_eq!(fx.submit_event(&cert.id, event, &cert.owner).await, invalid("Slice not found"));
}

#[tokio::test]
async fn empty_slice_list() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let (mut event, _) = sliced_event(&cert.id, &cert.opening, &[250], &cert.owner);
    event.new_slices.clear();

    assert_eq!(
        fx.submit_event(&cert.id, event, &cert.owner).await,
        invalid("Sliced event has no new slices")
    );
}

#[tokio::test]
async fn new_owner_key_must_decode() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let (mut event, _) = sliced_event(&cert.id, &cert.opening, &[200, 50], &cert.owner);
    event.new_slices[1].new_owner = PublicKeyBytes::new(vec![1, 2, 3]);

    assert_eq!(
        fx.submit_event(&cert.id, event, &cert.owner).await,
        invalid("Invalid NewOwner key, not a valid publicKey")
    );
}

#[tokio::test]
async fn new_slice_range_proof_is_checked() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let (mut event, openings) = sliced_event(&cert.id, &cert.opening, &[200, 50], &cert.owner);
    let elsewhere = FederatedStreamId::random(REGISTRY);
    event.new_slices[0].quantity = quantity(&openings[0], &elsewhere);

    assert_eq!(
        fx.submit_event(&cert.id, event, &cert.owner).await,
        invalid("Invalid range proof for new slice")
    );
}

#[tokio::test]
async fn sum_proof_must_conserve_quantity() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let (mut event, _) = sliced_event(&cert.id, &cert.opening, &[200, 50], &cert.owner);
    let inflated = Opening::random(60);
    event.new_slices[1].quantity = quantity(&inflated, &cert.id);

    assert_eq!(fx.submit_event(&cert.id, event, &cert.owner).await, invalid("Invalid sum proof"));
}

#[tokio::test]
async fn disclosed_split_needs_two_slices() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let (mut event, _, _) = disclosed_split(&cert.id, &cert.opening, 150, &cert.owner);
    let extra = event.new_slices[0].clone();
    event.new_slices.push(extra);

    assert_eq!(
        fx.submit_event(&cert.id, event, &cert.owner).await,
        invalid("Disclosed split requires exactly two new slices")
    );
}

#[tokio::test]
async fn disclosed_split_reports_conservation_failure() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let (mut event, _, _) = disclosed_split(&cert.id, &cert.opening, 150, &cert.owner);
    let other = split_opening(&Opening::random(250), 150).unwrap();
    if let ConservationProof::DisclosedSplit { zero_randomizer, .. } = &mut event.conservation {
        *zero_randomizer = other.zero_randomizer;
    }

    assert_eq!(
        fx.submit_event(&cert.id, event, &cert.owner).await,
        invalid("R to zero is not valid")
    );
}

#[tokio::test]
async fn transferred_slice_changes_owner() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Consumption, 40).await;
    let slice = cert.opening.commit().slice_id();
    let buyer = new_key();

    let event = transferred_event(&cert.id, slice, &buyer);
    assert_eq!(
        fx.submit_event(&cert.id, event.clone(), &buyer).await,
        invalid("Invalid signature for slice")
    );
    assert_eq!(fx.submit_event(&cert.id, event, &cert.owner).await, VerificationResult::Valid);
    assert_eq!(
        fx.model(&cert.id).await.get_certificate_slice(&slice).unwrap().owner,
        buyer.verifying_key()
    );

    let mut bad_owner = transferred_event(&cert.id, slice, &buyer);
    bad_owner.new_owner = PublicKeyBytes::new(vec![9; 31]);
    assert_eq!(
        fx.submit_event(&cert.id, bad_owner, &buyer).await,
        invalid("Invalid NewOwner key, not a valid publicKey")
    );

    let unknown = transferred_event(&cert.id, SliceId::from_commitment_bytes(b"gone"), &buyer);
    assert_eq!(fx.submit_event(&cert.id, unknown, &buyer).await, invalid("Slice not found"));
}

#[tokio::test]
async fn new_slice_cannot_take_over_a_transferred_slice() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let x = Opening::random(100);
    let y = Opening::random(150);
    let split = slice_into(&cert.id, &cert.opening, &[x.clone(), y.clone()], &cert.owner);
    assert_eq!(fx.submit_event(&cert.id, split, &cert.owner).await, VerificationResult::Valid);

    let bob = new_key();
    let x_id = x.commit().slice_id();
    let transfer = transferred_event(&cert.id, x_id, &bob);
    assert_eq!(fx.submit_event(&cert.id, transfer, &cert.owner).await, VerificationResult::Valid);

    let reslice = slice_into(&cert.id, &y, &[x.clone(), Opening::random(50)], &cert.owner);
    assert_eq!(
        fx.submit_event(&cert.id, reslice, &cert.owner).await,
        invalid("Slice id already in use")
    );

    let model = fx.model(&cert.id).await;
    assert_eq!(model.slices().count(), 2);
    assert_eq!(model.get_certificate_slice(&x_id).unwrap().owner, bob.verifying_key());
}

#[tokio::test]
async fn repeated_new_slice_is_rejected() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let half = Opening::random(125);

    let event = slice_into(&cert.id, &cert.opening, &[half.clone(), half], &cert.owner);
    assert_eq!(
        fx.submit_event(&cert.id, event, &cert.owner).await,
        invalid("Slice id already in use")
    );
    assert_eq!(fx.model(&cert.id).await.slices().count(), 1);
}

#[tokio::test]
async fn consumed_slice_id_cannot_be_minted_again() {
    let fx = Fixture::new();
    let cert = fx.issue(CertificateType::Production, 250).await;
    let a = Opening::random(100);
    let b = Opening::random(150);
    let split = slice_into(&cert.id, &cert.opening, &[a.clone(), b.clone()], &cert.owner);
    assert_eq!(fx.submit_event(&cert.id, split, &cert.owner).await, VerificationResult::Valid);

    let (resplit, _) = sliced_event(&cert.id, &a, &[60, 40], &cert.owner);
    assert_eq!(fx.submit_event(&cert.id, resplit, &cert.owner).await, VerificationResult::Valid);

    let revive = slice_into(&cert.id, &b, &[a, Opening::random(50)], &cert.owner);
    assert_eq!(
        fx.submit_event(&cert.id, revive, &cert.owner).await,
        invalid("Slice id already in use")
    );
}
