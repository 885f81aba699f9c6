use std::sync::Arc;

use user_records::{BackendError, Record, RecordId, RecordStore, RefreshOutcome, StoreError};

use crate::support::{ana, bo, GatedBackend};

fn spawn_refresh(
    store: &RecordStore<GatedBackend>,
) -> tokio::task::JoinHandle<Result<RefreshOutcome, StoreError>> {
    let store = store.clone();
    tokio::spawn(async move { store.refresh().await })
}

fn older() -> Vec<Record> {
    vec![ana()]
}

fn newer() -> Vec<Record> {
    vec![ana(), bo()]
}

#[tokio::test]
async fn stale_response_does_not_overwrite_newer_data() {
    let backend = Arc::new(GatedBackend::new());
    let store = RecordStore::from_arc(backend.clone());

    let a = spawn_refresh(&store);
    backend.wait_for_lists(1).await;
    let b = spawn_refresh(&store);
    backend.wait_for_lists(2).await;

    // B resolves first with the newer collection
    backend.release(1, Ok(newer()));
    let b = b.await.unwrap().unwrap();
    assert_eq!(
        b,
        RefreshOutcome::Applied {
            generation: 2,
            records: 2
        }
    );

    // A resolves late with older data and is dropped
    backend.release(0, Ok(older()));
    let a = a.await.unwrap().unwrap();
    assert_eq!(a, RefreshOutcome::Stale { generation: 1 });

    assert_eq!(store.view(), newer());
    assert_eq!(store.generation(), 2);
}

#[tokio::test]
async fn in_order_responses_are_both_applied() {
    let backend = Arc::new(GatedBackend::new());
    let store = RecordStore::from_arc(backend.clone());

    let a = spawn_refresh(&store);
    backend.wait_for_lists(1).await;
    let b = spawn_refresh(&store);
    backend.wait_for_lists(2).await;

    backend.release(0, Ok(older()));
    assert!(a.await.unwrap().unwrap().is_applied());
    assert_eq!(store.view(), older());

    backend.release(1, Ok(newer()));
    assert!(b.await.unwrap().unwrap().is_applied());
    assert_eq!(store.view(), newer());
}

#[tokio::test]
async fn older_response_applies_when_the_newer_one_failed() {
    let backend = Arc::new(GatedBackend::new());
    let store = RecordStore::from_arc(backend.clone());

    let a = spawn_refresh(&store);
    backend.wait_for_lists(1).await;
    let b = spawn_refresh(&store);
    backend.wait_for_lists(2).await;

    backend.release(1, Err(BackendError::status(502)));
    assert!(b.await.unwrap().is_err());

    backend.release(0, Ok(older()));
    assert_eq!(
        a.await.unwrap().unwrap(),
        RefreshOutcome::Applied {
            generation: 1,
            records: 1
        }
    );
    assert_eq!(store.view(), older());
}

#[tokio::test]
async fn overlapping_deletes_each_refresh() {
    let backend = Arc::new(GatedBackend::new());
    let store = RecordStore::from_arc(backend.clone());
    for record in [ana(), bo()] {
        let draft = Record {
            id: None,
            ..record
        };
        store.upsert(&draft).await.unwrap();
    }

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.remove(&RecordId::Number(1)).await })
    };
    let second = {
        let store = store.clone();
        tokio::spawn(async move { store.remove(&RecordId::Number(2)).await })
    };
    backend.wait_for_lists(2).await;

    backend.release(0, Ok(vec![bo()]));
    backend.release(1, Ok(vec![]));
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    // whichever finished last, the newest generation wins
    assert_eq!(store.generation(), 2);
    assert!(store.view().is_empty());
}
