//! Release repository port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::release::Release;
use crate::dto::release::{ReleasePage, ReleaseQuery};
use crate::ports::RepositoryResult;

/// Persistence interface for the Release aggregate.
#[async_trait]
pub trait ReleaseRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Release>>;

    /// Filtered, sorted, paged listing scoped to one workspace.
    async fn find_all(&self, query: &ReleaseQuery) -> RepositoryResult<ReleasePage>;

    /// Persist the aggregate and return it at its new storage revision.
    /// Fails with [`RepositoryError::Conflict`](crate::ports::RepositoryError)
    /// when the stored revision no longer matches the loaded one.
    async fn save(&self, release: &Release) -> RepositoryResult<Release>;

    /// Administrative removal; no domain rule governs deletion.
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;

    async fn exists(&self, id: Uuid) -> RepositoryResult<bool>;
}
