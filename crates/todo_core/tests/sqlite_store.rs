use todo_core::{MutationOutcome, SqliteStore, TodoState};

#[tokio::test]
async fn state_over_table_backend_stays_in_sync() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.sqlite3");

    let state = TodoState::activate(SqliteStore::open(&path).unwrap()).await;
    let MutationOutcome::Committed(keep) = state.add("keep me").await else {
        panic!("add should commit");
    };
    let MutationOutcome::Committed(gone) = state.add("delete me").await else {
        panic!("add should commit");
    };
    state.toggle(keep).await;
    state.update(keep, "kept and done").await;
    state.remove(gone).await;
    let expected = state.all();
    drop(state);

    let reopened = TodoState::activate(SqliteStore::open(&path).unwrap()).await;
    assert_eq!(reopened.all(), expected);
    assert_eq!(expected.len(), 1);
    assert_eq!(expected[0].text, "kept and done");
    assert!(expected[0].completed);
}
