use user_records::{BackendError, Operation, RecordStore, RefreshOutcome, StoreError};

use crate::support::{ana, bo, cy, seeded};

#[tokio::test]
async fn starts_empty_until_refreshed() {
    let store = RecordStore::new(seeded());
    assert!(store.records().is_empty());
    assert!(store.view().is_empty());
    assert_eq!(store.generation(), 0);
    assert!(store.backend().calls().is_empty());
}

#[tokio::test]
async fn refresh_replaces_collection_in_backend_order() {
    let store = RecordStore::new(seeded());

    let outcome = store.refresh().await.unwrap();
    assert_eq!(
        outcome,
        RefreshOutcome::Applied {
            generation: 1,
            records: 3
        }
    );
    assert_eq!(store.records(), vec![ana(), bo(), cy()]);
    assert_eq!(store.view(), store.records());
}

#[tokio::test]
async fn refresh_clears_an_active_search() {
    let store = RecordStore::new(seeded());
    store.refresh().await.unwrap();

    assert_eq!(store.search("clerk"), vec![bo()]);
    assert_eq!(store.query(), "clerk");

    store.refresh().await.unwrap();
    assert_eq!(store.query(), "");
    assert_eq!(store.view(), vec![ana(), bo(), cy()]);
}

#[tokio::test]
async fn failed_refresh_keeps_stale_state() {
    let backend = seeded();
    let store = RecordStore::new(backend.clone());
    store.refresh().await.unwrap();
    store.search("pilot");

    backend.fail_next(Operation::List, BackendError::Transport("connection reset".into()));
    let err = store.refresh().await.unwrap_err();

    assert_eq!(
        err,
        StoreError::Fetch(BackendError::Transport("connection reset".into()))
    );
    assert!(err.is_retryable());
    assert_eq!(store.records(), vec![ana(), bo(), cy()]);
    assert_eq!(store.view(), vec![cy()]);
    assert_eq!(store.query(), "pilot");
    assert_eq!(store.generation(), 1);
}

#[tokio::test]
async fn refresh_is_idempotent_without_mutations() {
    let store = RecordStore::new(seeded());
    store.refresh().await.unwrap();
    let first = store.view();
    store.refresh().await.unwrap();
    assert_eq!(store.view(), first);
    assert_eq!(store.generation(), 2);
}

#[tokio::test]
async fn search_works_on_the_fetched_collection() {
    let store = RecordStore::new(seeded());
    store.refresh().await.unwrap();

    assert_eq!(store.search("L"), vec![bo(), cy()]);
    assert_eq!(store.search(""), vec![ana(), bo(), cy()]);
    assert!(store.search("nobody").is_empty());
    // the collection itself is never filtered
    assert_eq!(store.records().len(), 3);
}

#[tokio::test]
async fn view_row_reads_one_record_of_the_filtered_view() {
    let store = RecordStore::new(seeded());
    assert_eq!(store.view_row(0), None);
    store.refresh().await.unwrap();

    assert_eq!(store.view_row(1), Some(bo()));
    store.search("pilot");
    assert_eq!(store.view_row(0), Some(cy()));
    assert_eq!(store.view_row(1), None);
}
