use std::sync::Arc;

use chrono::{TimeZone, Utc};
use ed25519_dalek::SigningKey;
use granular_canonical::{FederatedStreamId, GridArea, Period};
use granular_commitment::{prove_range, Opening};
use granular_core::{
    CertificateEvent, CertificateType, ClaimedEvent, EventStore, FederatedModelLoader, IssuedEvent,
    ModelLoader, PublicKeyBytes, QuantityCommitment, Transaction,
};
use granular_journal::{JournalEventStore, JournalReader, JournalWriter, ReadMode, WriteOptions};
use rand::rngs::OsRng;
use tempfile::TempDir;
use uuid::Uuid;

fn claimed_tx(stream: &FederatedStreamId) -> Transaction {
    let event = CertificateEvent::Claimed(ClaimedEvent {
        certificate_id: stream.clone(),
        allocation_id: Uuid::new_v4(),
    });
    Transaction::sign(stream.clone(), &event, &SigningKey::generate(&mut OsRng)).unwrap()
}

fn issued_tx(stream: &FederatedStreamId, opening: &Opening) -> Transaction {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let owner = SigningKey::generate(&mut OsRng);
    let event = CertificateEvent::Issued(IssuedEvent {
        certificate_id: stream.clone(),
        certificate_type: CertificateType::Production,
        period: Period::new(start, start + chrono::Duration::hours(1)).unwrap(),
        grid_area: GridArea::new("DK1"),
        asset_id_hash: vec![1; 32],
        quantity_commitment: QuantityCommitment {
            commitment: opening.commit(),
            range_proof: prove_range(opening, stream.proof_label().as_bytes()).unwrap(),
        },
        owner_public_key: PublicKeyBytes::from_key(&owner.verifying_key()),
        public_quantity: None,
    });
    Transaction::sign(stream.clone(), &event, &SigningKey::generate(&mut OsRng)).unwrap()
}

#[test]
fn test_write_read_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("stream.gcj");
    let stream = FederatedStreamId::random("registry-a");
    let first = claimed_tx(&stream);
    let second = claimed_tx(&stream);

    {
        let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
        writer.append_transaction(&first).unwrap();
        writer.append_transaction(&second).unwrap();
        writer.finish().unwrap();
    }

    let mut reader = JournalReader::open(&journal_path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_transaction().unwrap(), Some(first));
    assert_eq!(reader.read_transaction().unwrap(), Some(second));
    assert_eq!(reader.read_transaction().unwrap(), None);
}

#[test]
fn test_reopen_appends() {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("stream.gcj");
    let stream = FederatedStreamId::random("registry-a");

    for _ in 0..3 {
        let mut writer = JournalWriter::open(&journal_path, WriteOptions::default()).unwrap();
        writer.append_transaction(&claimed_tx(&stream)).unwrap();
        writer.finish().unwrap();
    }

    let transactions = JournalReader::open(&journal_path, ReadMode::Strict)
        .unwrap()
        .read_all()
        .unwrap();
    assert_eq!(transactions.len(), 3);
}

#[tokio::test]
async fn test_store_keeps_streams_apart() {
    let temp_dir = TempDir::new().unwrap();
    let store = JournalEventStore::open(temp_dir.path(), ReadMode::Strict).unwrap();
    let a = FederatedStreamId::random("registry-a");
    let b = FederatedStreamId::random("registry-a");

    store.append(claimed_tx(&a)).await.unwrap();
    store.append(claimed_tx(&a)).await.unwrap();
    store.append(claimed_tx(&b)).await.unwrap();

    assert_eq!(store.get_events(&a.stream_id).await.unwrap().len(), 2);
    assert_eq!(store.get_events(&b.stream_id).await.unwrap().len(), 1);
    assert!(store.get_events(&Uuid::new_v4()).await.unwrap().is_empty());
    assert!(store.stream_path(&a.stream_id).exists());
}

#[tokio::test]
async fn test_loader_projects_journal() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(JournalEventStore::open(temp_dir.path(), ReadMode::Strict).unwrap());
    let loader = FederatedModelLoader::new().with_store("registry-a", store.clone());
    let stream = FederatedStreamId::random("registry-a");
    let opening = Opening::random(42);

    store.append(issued_tx(&stream, &opening)).await.unwrap();

    let (model, count) = loader.get(&stream).await.unwrap();
    let model = model.unwrap();
    assert_eq!(count, 1);
    assert_eq!(model.id(), &stream);
    assert!(model.get_certificate_slice(&opening.commit().slice_id()).is_some());
}
