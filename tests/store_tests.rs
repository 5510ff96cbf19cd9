use contas_core::{
    auth::UserId,
    domain::RecordId,
    errors::LedgerError,
    store::{Collection, DocumentStore, JsonStore},
};
use serde_json::{json, Map, Value};
use std::fs;
use tempfile::tempdir;

fn doc(description: &str, amount: f64) -> Value {
    json!({ "description": description, "amount": amount })
}

fn changes(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

#[test]
fn create_assigns_unique_ids_and_lists_back() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path().to_path_buf()).unwrap();
    let user = UserId::from("ana");

    let first = store
        .create(&user, Collection::Incomes, doc("Salário", 4200.0))
        .unwrap();
    let second = store
        .create(&user, Collection::Incomes, doc("Freela", 800.0))
        .unwrap();
    assert_ne!(first, second);

    let documents = store.list_all(&user, Collection::Incomes).unwrap();
    assert_eq!(documents.len(), 2);
    assert!(documents.iter().any(|d| d.id == first));
    assert!(documents.iter().any(|d| d.id == second));
}

#[test]
fn update_merges_fields_and_null_removes_them() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path().to_path_buf()).unwrap();
    let user = UserId::from("ana");

    let id = store
        .create(
            &user,
            Collection::Expenses,
            json!({
                "description": "Notebook",
                "amount": 250.0,
                "currentParcel": 3,
            }),
        )
        .unwrap();

    store
        .update(
            &user,
            Collection::Expenses,
            &id,
            changes(&[("amount", json!(300.0)), ("currentParcel", Value::Null)]),
        )
        .unwrap();

    let documents = store.list_all(&user, Collection::Expenses).unwrap();
    let fields = &documents[0].fields;
    assert_eq!(fields["description"], json!("Notebook"));
    assert_eq!(fields["amount"], json!(300.0));
    assert!(fields.get("currentParcel").is_none());
}

#[test]
fn update_missing_document_fails_not_found() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path().to_path_buf()).unwrap();
    let user = UserId::from("ana");

    let err = store
        .update(
            &user,
            Collection::Expenses,
            &RecordId::from("ghost"),
            changes(&[("amount", json!(1.0))]),
        )
        .expect_err("update absent id");
    match err {
        LedgerError::NotFound { collection, id } => {
            assert_eq!(collection, "expenses");
            assert_eq!(id, "ghost");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn delete_missing_document_fails_not_found() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path().to_path_buf()).unwrap();
    let user = UserId::from("ana");

    let err = store
        .delete(&user, Collection::Incomes, &RecordId::from("ghost"))
        .expect_err("delete absent id");
    assert!(matches!(err, LedgerError::NotFound { .. }));
}

#[test]
fn collections_and_users_are_isolated() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path().to_path_buf()).unwrap();
    let ana = UserId::from("ana");
    let bia = UserId::from("bia");

    store
        .create(&ana, Collection::Expenses, doc("Luz", 120.0))
        .unwrap();

    assert!(store.list_all(&ana, Collection::Incomes).unwrap().is_empty());
    assert!(store.list_all(&bia, Collection::Expenses).unwrap().is_empty());
}

#[test]
fn data_survives_a_store_reopen() {
    let temp = tempdir().unwrap();
    let user = UserId::from("ana");

    let id = {
        let store = JsonStore::new(temp.path().to_path_buf()).unwrap();
        store
            .create(&user, Collection::Expenses, doc("Aluguel", 1500.0))
            .unwrap()
    };

    let reopened = JsonStore::new(temp.path().to_path_buf()).unwrap();
    let documents = reopened.list_all(&user, Collection::Expenses).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, id);
}

#[test]
fn writes_leave_no_temp_files_behind() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path().to_path_buf()).unwrap();
    let user = UserId::from("ana");

    store
        .create(&user, Collection::Expenses, doc("Luz", 120.0))
        .unwrap();

    let collection_path = store.collection_path(&user, Collection::Expenses);
    let dir = collection_path.parent().unwrap();
    let leftovers: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext == "tmp")
                .unwrap_or(false)
        })
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn unusual_user_ids_map_to_safe_directories() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(temp.path().to_path_buf()).unwrap();
    let user = UserId::from("ana@example.com");

    store
        .create(&user, Collection::Incomes, doc("Salário", 4200.0))
        .unwrap();

    let path = store.collection_path(&user, Collection::Incomes);
    assert!(path.exists());
    let dir_name = path
        .parent()
        .and_then(|parent| parent.file_name())
        .and_then(|name| name.to_str())
        .unwrap();
    assert!(!dir_name.contains('@'));
    assert!(!dir_name.contains('/'));
}
