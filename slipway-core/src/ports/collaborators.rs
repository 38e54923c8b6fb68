//! Read-only collaborator lookups
//!
//! Products, features and bugs live outside this system; these ports only
//! resolve a human-readable name for denormalization at link time and carry
//! the workspace id for tenant-ownership checks. A workspace mismatch is
//! surfaced to callers exactly like "not found".

use async_trait::async_trait;
use uuid::Uuid;

use crate::ports::RepositoryResult;

/// Minimal view of a product.
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    pub workspace_id: Uuid,
}

/// Minimal view of a feature.
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    pub id: Uuid,
    pub title: String,
    pub workspace_id: Uuid,
}

/// Minimal view of a bug.
#[derive(Debug, Clone)]
pub struct BugRecord {
    pub id: Uuid,
    pub title: String,
    pub workspace_id: Uuid,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<ProductRecord>>;
}

#[async_trait]
pub trait FeatureRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<FeatureRecord>>;
}

#[async_trait]
pub trait BugRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<BugRecord>>;
}
