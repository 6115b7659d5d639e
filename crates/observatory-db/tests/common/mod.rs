//! Store contract shared by the in-memory and `PostgreSQL` test suites.
//!
//! Every function takes a `&dyn ObservationStore` so the same assertions
//! run against each implementation.

#![allow(dead_code)]

use std::collections::BTreeSet;

use observatory_db::{DbError, ObservationStore};
use observatory_types::{Fields, ObservationId};
use serde_json::{Value, json};

/// Turn a `json!` object literal into a field map.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub async fn create_then_get_round_trips(store: &dyn ObservationStore) {
    let payload = fields(json!({"species": "owl", "count": 3, "tags": ["night", "forest"]}));
    let created = store.create(payload.clone()).await.unwrap();
    assert_eq!(created.fields, payload);

    let fetched = store.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

pub async fn create_ignores_supplied_id(store: &dyn ObservationStore) {
    let forged = ObservationId::new();
    let created = store
        .create(fields(json!({"_id": forged.to_string(), "species": "wren"})))
        .await
        .unwrap();
    assert_ne!(created.id, forged);
    assert!(created.get("_id").is_none());
}

pub async fn get_missing_is_not_found(store: &dyn ObservationStore) {
    let missing = ObservationId::new();
    let err = store.get_by_id(missing).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound(id) if id == missing));
}

pub async fn update_merges_fields(store: &dyn ObservationStore) {
    let created = store.create(fields(json!({"a": 1, "b": 2}))).await.unwrap();

    let updated = store
        .update_by_id(created.id, fields(json!({"b": 3})))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.fields, fields(json!({"a": 1, "b": 3})));

    let stored = store.get_by_id(created.id).await.unwrap();
    assert_eq!(stored.fields, fields(json!({"a": 1, "b": 3})));
}

pub async fn update_with_empty_patch_is_a_no_op(store: &dyn ObservationStore) {
    let created = store.create(fields(json!({"a": 1}))).await.unwrap();
    let updated = store.update_by_id(created.id, Fields::new()).await.unwrap();
    assert_eq!(updated, created);
}

pub async fn update_missing_is_not_found(store: &dyn ObservationStore) {
    let err = store
        .update_by_id(ObservationId::new(), fields(json!({"a": 1})))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));
}

pub async fn delete_returns_value_then_not_found(store: &dyn ObservationStore) {
    let created = store.create(fields(json!({"species": "heron"}))).await.unwrap();

    let deleted = store.delete_by_id(created.id).await.unwrap();
    assert_eq!(deleted, created);

    let err = store.delete_by_id(created.id).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));

    let err = store.get_by_id(created.id).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));
}

/// Create `n` documents and return their ids.
pub async fn create_many(store: &dyn ObservationStore, n: usize) -> Vec<ObservationId> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let obs = store.create(fields(json!({"seq": i}))).await.unwrap();
        ids.push(obs.id);
    }
    ids
}

pub async fn list_contains_every_created(store: &dyn ObservationStore) {
    let created: BTreeSet<ObservationId> = create_many(store, 5).await.into_iter().collect();
    let listed: BTreeSet<ObservationId> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert!(created.is_subset(&listed));
}
