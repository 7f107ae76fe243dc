//! Shared helpers for the sync-layer scenario tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use planbase_core::{NewProject, ProjectStatus, UserRole};
use planbase_events::EventBus;
use planbase_store::{Document, DocumentStore, MemoryStore, Predicate, StoreError};
use planbase_sync::{ProjectsManager, SyncConfig};

pub fn project_data(name: &str) -> NewProject {
    NewProject {
        name: name.to_string(),
        description: "scenario project".to_string(),
        status: ProjectStatus::Active,
        user_role: UserRole::Architect,
        finish_date: Utc.with_ymd_and_hms(2027, 6, 1, 0, 0, 0).unwrap(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap(),
    }
}

/// Write a project document directly, bypassing the manager.
pub async fn seed_project(store: &dyn DocumentStore, id: &str, owner: &str, collaborators: &[&str]) {
    store
        .set(
            "Projects",
            id,
            json!({
                "name": format!("project {id}"),
                "description": "seeded",
                "status": "Active",
                "userRole": "Engineer",
                "finishDate": "2027-06-01T00:00:00Z",
                "owner": owner,
                "collaborators": collaborators,
                "createdAt": "2026-01-15T09:30:00Z",
                "activityLogs": [],
            }),
        )
        .await
        .unwrap();
}

/// Write a user record directly, bypassing registration.
pub async fn seed_user(store: &dyn DocumentStore, uid: &str, email: &str, name: Option<&str>) {
    let mut fields = json!({
        "email": email,
        "role": "basic",
        "createdAt": "2026-01-10T08:00:00Z",
    });
    if let Some(name) = name {
        fields["name"] = json!(name);
        fields["lastName"] = json!("Tester");
    }
    store.set("Users", uid, fields).await.unwrap();
}

pub fn manager_on(store: Arc<dyn DocumentStore>, bus: Arc<EventBus>) -> ProjectsManager {
    ProjectsManager::new(store, bus, SyncConfig::default())
}

/// Opt-in log output for test debugging (`RUST_LOG=planbase_sync=debug`).
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ---------------------------------------------------------------------------
// InstrumentedStore
// ---------------------------------------------------------------------------

/// Delegating store that counts delete calls and can be told to fail them,
/// for asserting "no remote call was issued" and partial-failure paths.
#[derive(Default)]
pub struct InstrumentedStore {
    inner: MemoryStore,
    pub delete_calls: AtomicUsize,
    pub fail_deletes: AtomicBool,
}

impl InstrumentedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for InstrumentedStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        self.inner.set(collection, id, fields).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected delete failure".to_string()));
        }
        self.inner.delete(collection, id).await
    }

    async fn query(
        &self,
        collection: &str,
        predicate: Predicate,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.query(collection, predicate).await
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        self.inner.array_union(collection, id, field, value).await
    }

    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        self.inner.array_remove(collection, id, field, value).await
    }
}
