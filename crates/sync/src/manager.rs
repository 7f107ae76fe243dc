//! Projects cache & sync manager.
//!
//! Owns the authoritative in-process list of projects visible to the
//! active user. Every operation goes to the remote store first; the cache
//! is touched only after the remote write is acknowledged, and lifecycle
//! events are published on the bus at the same point. There is no
//! optimistic insert, no retry, and no internal serialization of
//! concurrent callers — the `&mut self` receivers push that to the caller.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use planbase_core::types::{ProjectId, Uid};
use planbase_core::user::UserRecord;
use planbase_core::{CoreError, DisplayName, NewProject, Project, ProjectUpdate};
use planbase_events::{DomainEvent, EventBus};
use planbase_store::{Document, DocumentStore, Predicate, StoreError};

use crate::config::{fields, SyncConfig};
use crate::error::SyncResult;
use crate::resolver::MembershipResolver;

pub struct ProjectsManager {
    store: Arc<dyn DocumentStore>,
    bus: Arc<EventBus>,
    resolver: MembershipResolver,
    config: SyncConfig,
    cache: Vec<Project>,
}

impl ProjectsManager {
    /// Construct a manager with an empty cache. Performs no I/O; call
    /// [`refresh`](Self::refresh) to populate the cache.
    pub fn new(store: Arc<dyn DocumentStore>, bus: Arc<EventBus>, config: SyncConfig) -> Self {
        let resolver = MembershipResolver::new(Arc::clone(&store), &config.users_collection);
        Self {
            store,
            bus,
            resolver,
            config,
            cache: Vec::new(),
        }
    }

    /// The cached projects, in merged query order.
    pub fn projects(&self) -> &[Project] {
        &self.cache
    }

    /// Replace the cache with the projects currently visible to `user_uid`.
    ///
    /// Runs the two ownership predicates ("owner equals" and "collaborators
    /// contains") concurrently and merges the results, deduplicating by
    /// document id. A document matched by both predicates cannot occur
    /// while the owner/collaborator invariant holds, but is handled anyway.
    /// Full replacement semantics: prior cache entries absent from the new
    /// result are dropped.
    pub async fn refresh(&mut self, user_uid: &str) -> SyncResult<()> {
        let projects = &self.config.projects_collection;
        let (owned, collaborating) = tokio::try_join!(
            self.store
                .query(projects, Predicate::field_equals(fields::OWNER, user_uid)),
            self.store.query(
                projects,
                Predicate::array_contains(fields::COLLABORATORS, user_uid)
            ),
        )?;

        let mut merged: Vec<Project> = Vec::with_capacity(owned.len() + collaborating.len());
        for doc in owned.into_iter().chain(collaborating) {
            if merged.iter().any(|p| p.id == doc.id) {
                continue;
            }
            merged.push(decode_project(&doc)?);
        }

        tracing::debug!(user_uid, count = merged.len(), "project cache refreshed");
        self.cache = merged;
        Ok(())
    }

    /// Create a project owned by `owner`, with an empty collaborator set
    /// and activity log.
    ///
    /// The id is caller-supplied or store-minted. On a failed remote write
    /// the cache is left unchanged and nothing is published.
    pub async fn create_project(
        &mut self,
        data: NewProject,
        owner: Uid,
        id: Option<ProjectId>,
    ) -> SyncResult<Project> {
        let id = id.unwrap_or_else(|| self.store.generate_id());
        let project = Project::new(data, owner, id);

        let fields = serde_json::to_value(&project)?;
        self.store
            .set(&self.config.projects_collection, &project.id, fields)
            .await?;

        tracing::info!(project_id = %project.id, owner = %project.owner, "project created");
        self.bus.publish(DomainEvent::ProjectCreated {
            project_id: project.id.clone(),
            name: project.name.clone(),
            owner: project.owner.clone(),
        });

        self.cache.push(project.clone());
        Ok(project)
    }

    /// Point read straight from the store. Neither consults nor mutates
    /// the cache.
    pub async fn get_project(&self, id: &str) -> SyncResult<Project> {
        let doc = self
            .store
            .get(&self.config.projects_collection, id)
            .await?
            .ok_or_else(|| CoreError::not_found("project", id))?;
        Ok(decode_project(&doc)?)
    }

    /// Delete a project that is present in the local cache.
    ///
    /// The cache-presence requirement is a consistency precondition, not a
    /// remote existence check: a miss fails before any remote call. On a
    /// failed remote delete the cache entry is kept.
    pub async fn delete_project(&mut self, id: &str) -> SyncResult<()> {
        let position = self
            .cache
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::Precondition(format!("project {id} is not in the local cache")))?;

        self.store
            .delete(&self.config.projects_collection, id)
            .await?;

        self.cache.remove(position);
        tracing::info!(project_id = %id, "project deleted");
        self.bus.publish(DomainEvent::ProjectDeleted {
            project_id: id.to_string(),
        });
        Ok(())
    }

    /// Write a partial field update remotely, then merge the same fields
    /// over the cached copy if one exists.
    ///
    /// No optimistic concurrency check: a concurrent remote writer can be
    /// overwritten by a stale partial update unless the caller guards.
    pub async fn update_project(&mut self, id: &str, update: ProjectUpdate) -> SyncResult<()> {
        if update.is_empty() {
            return Ok(());
        }

        let fields = serde_json::to_value(&update)?;
        self.store
            .update(&self.config.projects_collection, id, fields)
            .await?;

        if let Some(cached) = self.cache.iter_mut().find(|p| p.id == id) {
            update.merge_into(cached);
        }
        tracing::debug!(project_id = %id, "project updated");
        Ok(())
    }

    /// Add the user behind `collaborator_email` to the project's
    /// collaborator set.
    ///
    /// Membership invariants are validated against a fresh remote read,
    /// never the cache. The remote append is an idempotent set-union, so a
    /// concurrent identical add is harmless. Returns the resolved UID.
    pub async fn add_collaborator(
        &mut self,
        project_id: &str,
        collaborator_email: &str,
    ) -> SyncResult<Uid> {
        let uid = self.resolver.resolve_by_email(collaborator_email).await?;

        let doc = self
            .store
            .get(&self.config.projects_collection, project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("project", project_id))?;
        let project = decode_project(&doc)?;
        project.ensure_can_add_collaborator(&uid)?;

        self.store
            .array_union(
                &self.config.projects_collection,
                project_id,
                fields::COLLABORATORS,
                json!(uid),
            )
            .await?;

        if let Some(cached) = self.cache.iter_mut().find(|p| p.id == project_id) {
            if !cached.collaborators.contains(&uid) {
                cached.collaborators.push(uid.clone());
            }
        }
        tracing::info!(project_id, collaborator = %uid, "collaborator added");
        Ok(uid)
    }

    /// Remove `collaborator_uid` from the project's collaborator set.
    ///
    /// The filtered list is re-derived from the just-read remote state, not
    /// from the cache, so a stale cache cannot resurrect membership.
    pub async fn remove_collaborator(
        &mut self,
        project_id: &str,
        collaborator_uid: &str,
    ) -> SyncResult<()> {
        let doc = self
            .store
            .get(&self.config.projects_collection, project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("project", project_id))?;
        let project = decode_project(&doc)?;
        project.ensure_collaborator_present(collaborator_uid)?;

        let remaining: Vec<&Uid> = project
            .collaborators
            .iter()
            .filter(|c| c.as_str() != collaborator_uid)
            .collect();
        self.store
            .update(
                &self.config.projects_collection,
                project_id,
                json!({ (fields::COLLABORATORS): remaining }),
            )
            .await?;

        if let Some(cached) = self.cache.iter_mut().find(|p| p.id == project_id) {
            cached.collaborators.retain(|c| c != collaborator_uid);
        }
        tracing::info!(project_id, collaborator = %collaborator_uid, "collaborator removed");
        Ok(())
    }

    /// Resolve display records for a set of UIDs with concurrent point
    /// reads. UIDs without a user record are silently omitted; records
    /// without name fields fall back to placeholders.
    pub async fn resolve_collaborator_display_names(
        &self,
        uids: &[Uid],
    ) -> SyncResult<HashMap<Uid, DisplayName>> {
        let users = &self.config.users_collection;
        let lookups = uids.iter().map(|uid| self.store.get(users, uid));
        let results = futures::future::try_join_all(lookups).await?;

        let mut names = HashMap::new();
        for (uid, doc) in uids.iter().zip(results) {
            let Some(doc) = doc else {
                continue;
            };
            let record: UserRecord = doc.decode()?;
            names.insert(uid.clone(), record.display_name());
        }
        Ok(names)
    }
}

/// Decode a project document, injecting the document key as the entity id.
fn decode_project(doc: &Document) -> Result<Project, StoreError> {
    let mut project: Project = doc.decode()?;
    project.id = doc.id.clone();
    Ok(project)
}
