//! Scenario tests for the projects cache & sync manager.
//!
//! Exercises the full public surface against the in-memory store:
//! - visibility merge with deduplication
//! - create/get/delete lifecycle, cache preconditions, event emission
//! - partial updates and cache reconstruction
//! - collaborator membership invariants and round-trips
//! - display-name resolution

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;

use common::{manager_on, project_data, seed_project, seed_user, InstrumentedStore};
use planbase_core::{CoreError, ProjectStatus, ProjectUpdate};
use planbase_events::{DomainEvent, EventBus};
use planbase_store::{DocumentStore, MemoryStore};
use planbase_sync::SyncError;

fn setup() -> (Arc<MemoryStore>, Arc<EventBus>, planbase_sync::ProjectsManager) {
    common::init_tracing();
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(EventBus::default());
    let manager = manager_on(store.clone(), bus.clone());
    (store, bus, manager)
}

// ---------------------------------------------------------------------------
// Visibility merge
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_returns_owned_union_collaborating_without_duplicates() {
    let (store, _bus, mut manager) = setup();
    seed_project(store.as_ref(), "p1", "u1", &[]).await;
    seed_project(store.as_ref(), "p2", "u2", &["u1"]).await;
    seed_project(store.as_ref(), "p3", "u2", &["u9"]).await;

    manager.refresh("u1").await.unwrap();

    let ids: Vec<_> = manager.projects().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p1", "p2"]);
}

#[tokio::test]
async fn refresh_deduplicates_a_document_matching_both_predicates() {
    let (store, _bus, mut manager) = setup();
    // Violates the owner/collaborator invariant; seeded directly to check
    // the defensive dedup path.
    seed_project(store.as_ref(), "p1", "u1", &["u1"]).await;

    manager.refresh("u1").await.unwrap();

    assert_eq!(manager.projects().len(), 1);
    assert_eq!(manager.projects()[0].id, "p1");
}

#[tokio::test]
async fn refresh_replaces_the_cache_wholesale() {
    let (store, _bus, mut manager) = setup();
    seed_project(store.as_ref(), "p1", "u1", &[]).await;
    manager.refresh("u1").await.unwrap();
    assert_eq!(manager.projects().len(), 1);

    // Remote delete behind the manager's back, then refresh again.
    store.delete("Projects", "p1").await.unwrap();
    seed_project(store.as_ref(), "p2", "u1", &[]).await;
    manager.refresh("u1").await.unwrap();

    let ids: Vec<_> = manager.projects().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p2"]);
}

// ---------------------------------------------------------------------------
// Create / get / delete lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_round_trips_the_project() {
    let (_store, _bus, mut manager) = setup();
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();

    let fetched = manager.get_project(&created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert!(fetched.collaborators.is_empty());
    assert!(fetched.activity_logs.is_empty());
}

#[tokio::test]
async fn create_honors_a_caller_supplied_id() {
    let (_store, _bus, mut manager) = setup();
    let created = manager
        .create_project(
            project_data("Harbor Tower"),
            "u1".to_string(),
            Some("chosen-id".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(created.id, "chosen-id");
}

#[tokio::test]
async fn create_appends_to_cache_and_publishes_after_the_write() {
    let (_store, bus, mut manager) = setup();
    let mut rx = bus.subscribe();

    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();

    assert_eq!(manager.projects().len(), 1);
    let envelope = rx.recv().await.unwrap();
    assert_eq!(
        envelope.event,
        DomainEvent::ProjectCreated {
            project_id: created.id.clone(),
            name: "Harbor Tower".to_string(),
            owner: "u1".to_string(),
        }
    );
}

#[tokio::test]
async fn get_missing_project_is_not_found() {
    let (_store, _bus, manager) = setup();
    let err = manager.get_project("ghost").await.unwrap_err();
    assert_matches!(err, SyncError::Core(CoreError::NotFound { entity: "project", .. }));
}

#[tokio::test]
async fn delete_requires_the_project_in_the_cache_and_skips_the_remote_call() {
    let store = Arc::new(InstrumentedStore::new());
    let bus = Arc::new(EventBus::default());
    let mut manager = manager_on(store.clone(), bus);

    let err = manager.delete_project("ghost").await.unwrap_err();
    assert_matches!(err, SyncError::Core(CoreError::Precondition(_)));
    assert_eq!(store.delete_calls(), 0);
}

#[tokio::test]
async fn delete_removes_remote_document_and_cache_entry() {
    let (store, bus, mut manager) = setup();
    let mut rx = bus.subscribe();
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();
    rx.recv().await.unwrap(); // drain the creation event

    manager.delete_project(&created.id).await.unwrap();

    assert!(manager.projects().is_empty());
    assert!(store.get("Projects", &created.id).await.unwrap().is_none());
    let envelope = rx.recv().await.unwrap();
    assert_eq!(
        envelope.event,
        DomainEvent::ProjectDeleted {
            project_id: created.id,
        }
    );
}

#[tokio::test]
async fn failed_remote_delete_keeps_the_cache_entry() {
    let store = Arc::new(InstrumentedStore::new());
    let bus = Arc::new(EventBus::default());
    let mut manager = manager_on(store.clone(), bus);
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();

    store.set_fail_deletes(true);
    let err = manager.delete_project(&created.id).await.unwrap_err();
    assert_matches!(err, SyncError::Store(_));
    assert_eq!(manager.projects().len(), 1);
}

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_writes_partial_fields_and_merges_the_cache_entry() {
    let (store, _bus, mut manager) = setup();
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();

    let update = ProjectUpdate {
        status: Some(ProjectStatus::Finished),
        ..Default::default()
    };
    manager.update_project(&created.id, update).await.unwrap();

    let cached = &manager.projects()[0];
    assert_eq!(cached.status, ProjectStatus::Finished);
    assert_eq!(cached.name, "Harbor Tower");

    let doc = store.get("Projects", &created.id).await.unwrap().unwrap();
    assert_eq!(doc.fields["status"], "Finished");
    assert_eq!(doc.fields["name"], "Harbor Tower");
}

#[tokio::test]
async fn update_of_a_missing_remote_document_surfaces_the_store_error() {
    let (_store, _bus, mut manager) = setup();
    let update = ProjectUpdate {
        name: Some("renamed".to_string()),
        ..Default::default()
    };
    let err = manager.update_project("ghost", update).await.unwrap_err();
    assert_matches!(err, SyncError::Store(_));
}

// ---------------------------------------------------------------------------
// Collaborator membership
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_collaborator_resolves_email_and_updates_remote_and_cache() {
    let (store, _bus, mut manager) = setup();
    seed_user(store.as_ref(), "u2", "eng@example.com", Some("Grace")).await;
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();

    let uid = manager
        .add_collaborator(&created.id, "eng@example.com")
        .await
        .unwrap();
    assert_eq!(uid, "u2");

    let doc = store.get("Projects", &created.id).await.unwrap().unwrap();
    assert_eq!(doc.fields["collaborators"], json!(["u2"]));
    assert_eq!(manager.projects()[0].collaborators, ["u2"]);
}

#[tokio::test]
async fn added_collaborator_sees_the_project_until_removed() {
    let (store, bus, mut owner_manager) = setup();
    seed_user(store.as_ref(), "u2", "eng@example.com", Some("Grace")).await;
    let created = owner_manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();
    owner_manager
        .add_collaborator(&created.id, "eng@example.com")
        .await
        .unwrap();

    let mut collaborator_manager = manager_on(store.clone(), bus);
    collaborator_manager.refresh("u2").await.unwrap();
    let ids: Vec<_> = collaborator_manager
        .projects()
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, [created.id.as_str()]);

    owner_manager
        .remove_collaborator(&created.id, "u2")
        .await
        .unwrap();
    collaborator_manager.refresh("u2").await.unwrap();
    assert!(collaborator_manager.projects().is_empty());
}

#[tokio::test]
async fn the_owner_cannot_be_added_as_collaborator() {
    let (store, _bus, mut manager) = setup();
    seed_user(store.as_ref(), "u1", "owner@example.com", Some("Ada")).await;
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();

    let err = manager
        .add_collaborator(&created.id, "owner@example.com")
        .await
        .unwrap_err();
    assert_matches!(err, SyncError::Core(CoreError::InvariantViolation(_)));

    let doc = store.get("Projects", &created.id).await.unwrap().unwrap();
    assert_eq!(doc.fields["collaborators"], json!([]));
}

#[tokio::test]
async fn adding_an_existing_collaborator_fails_without_a_remote_write() {
    let (store, _bus, mut manager) = setup();
    seed_user(store.as_ref(), "u2", "eng@example.com", Some("Grace")).await;
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();
    manager
        .add_collaborator(&created.id, "eng@example.com")
        .await
        .unwrap();

    let err = manager
        .add_collaborator(&created.id, "eng@example.com")
        .await
        .unwrap_err();
    assert_matches!(err, SyncError::Core(CoreError::InvariantViolation(_)));

    let doc = store.get("Projects", &created.id).await.unwrap().unwrap();
    assert_eq!(doc.fields["collaborators"], json!(["u2"]));
}

#[tokio::test]
async fn add_collaborator_with_unknown_email_is_user_not_found() {
    let (_store, _bus, mut manager) = setup();
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();

    let err = manager
        .add_collaborator(&created.id, "ghost@example.com")
        .await
        .unwrap_err();
    assert_matches!(err, SyncError::Core(CoreError::NotFound { entity: "user", .. }));
}

#[tokio::test]
async fn add_collaborator_to_a_vanished_project_is_project_not_found() {
    let (store, _bus, mut manager) = setup();
    seed_user(store.as_ref(), "u2", "eng@example.com", Some("Grace")).await;
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();
    // Deleted remotely by another party; the manager's cache is now stale.
    store.delete("Projects", &created.id).await.unwrap();

    let err = manager
        .add_collaborator(&created.id, "eng@example.com")
        .await
        .unwrap_err();
    assert_matches!(
        err,
        SyncError::Core(CoreError::NotFound {
            entity: "project",
            ..
        })
    );
}

#[tokio::test]
async fn removing_an_absent_collaborator_is_an_invariant_violation() {
    let (_store, _bus, mut manager) = setup();
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();

    let err = manager
        .remove_collaborator(&created.id, "u2")
        .await
        .unwrap_err();
    assert_matches!(err, SyncError::Core(CoreError::InvariantViolation(_)));
}

#[tokio::test]
async fn add_then_remove_restores_the_prior_collaborator_set() {
    let (store, _bus, mut manager) = setup();
    seed_user(store.as_ref(), "u2", "eng@example.com", Some("Grace")).await;
    seed_user(store.as_ref(), "u3", "dev@example.com", Some("Linus")).await;
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();
    manager
        .add_collaborator(&created.id, "dev@example.com")
        .await
        .unwrap();

    manager
        .add_collaborator(&created.id, "eng@example.com")
        .await
        .unwrap();
    manager
        .remove_collaborator(&created.id, "u2")
        .await
        .unwrap();

    let doc = store.get("Projects", &created.id).await.unwrap().unwrap();
    assert_eq!(doc.fields["collaborators"], json!(["u3"]));
    assert_eq!(manager.projects()[0].collaborators, ["u3"]);
}

#[tokio::test]
async fn remove_acts_on_fresh_remote_membership_not_the_cache() {
    let (store, _bus, mut manager) = setup();
    let created = manager
        .create_project(project_data("Harbor Tower"), "u1".to_string(), None)
        .await
        .unwrap();
    // A concurrent writer added two collaborators the cache knows nothing
    // about.
    store
        .array_union("Projects", &created.id, "collaborators", json!("u2"))
        .await
        .unwrap();
    store
        .array_union("Projects", &created.id, "collaborators", json!("u3"))
        .await
        .unwrap();

    manager
        .remove_collaborator(&created.id, "u2")
        .await
        .unwrap();

    let doc = store.get("Projects", &created.id).await.unwrap().unwrap();
    assert_eq!(doc.fields["collaborators"], json!(["u3"]));
}

// ---------------------------------------------------------------------------
// Display-name resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn display_names_omit_missing_users_and_default_missing_fields() {
    let (store, _bus, manager) = setup();
    seed_user(store.as_ref(), "u2", "eng@example.com", Some("Grace")).await;
    seed_user(store.as_ref(), "u4", "anon@example.com", None).await;

    let names = manager
        .resolve_collaborator_display_names(&[
            "u2".to_string(),
            "u3".to_string(), // no record
            "u4".to_string(),
        ])
        .await
        .unwrap();

    assert_eq!(names.len(), 2);
    assert_eq!(names["u2"].name, "Grace");
    assert_eq!(names["u2"].last_name, "Tester");
    assert_eq!(names["u4"].name, "Unknown");
    assert_eq!(names["u4"].last_name, "");
    assert!(!names.contains_key("u3"));
}
