use todo_core::store::{load_todos, save_todos, STORAGE_KEY};
use todo_core::{LocalStore, MutationOutcome, RecordStore, StoreError, Task, TodoState};

#[tokio::test]
async fn state_survives_reopening_the_blob() {
    let dir = tempfile::tempdir().unwrap();

    let first_session = TodoState::activate(LocalStore::new(dir.path())).await;
    let MutationOutcome::Committed(id) = first_session.add("water plants").await else {
        panic!("add should commit");
    };
    first_session.add("call mom").await;
    first_session.toggle(id).await;
    let expected = first_session.all();
    drop(first_session);

    let second_session = TodoState::activate(LocalStore::new(dir.path())).await;
    assert_eq!(second_session.all(), expected);
    assert!(second_session.error().is_none());
}

#[tokio::test]
async fn malformed_blob_starts_empty_without_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(format!("{STORAGE_KEY}.json")), b"[{\"id\": 1").unwrap();

    let state = TodoState::activate(LocalStore::new(dir.path())).await;

    assert!(state.all().is_empty());
    assert!(state.error().is_none());
}

#[tokio::test]
async fn store_contract_matches_the_table_backend() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    let task = Task::new("contract");

    store.create_one(&task).await.unwrap();
    assert!(matches!(
        store.create_one(&task).await,
        Err(StoreError::Conflict(_))
    ));

    store.delete_one(task.id).await.unwrap();
    assert!(matches!(
        store.delete_one(task.id).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(load_todos(dir.path()).is_empty());
}

#[test]
fn save_then_load_is_equal_modulo_creation_order() {
    let dir = tempfile::tempdir().unwrap();
    let b = Task::with_id(uuid::Uuid::new_v4(), "b", 2);
    let a = Task::with_id(uuid::Uuid::new_v4(), "a", 1);
    let c = Task::with_id(uuid::Uuid::new_v4(), "c", 3);

    save_todos(dir.path(), &[b.clone(), c.clone(), a.clone()]).unwrap();

    assert_eq!(load_todos(dir.path()), vec![a, b, c]);
}
