//! Collaborator Lookups
//!
//! Read-only access to the product, feature and bug tables owned by other
//! subsystems. Slipway never writes these.

use async_trait::async_trait;
use slipway_core::ports::collaborators::{
    BugRecord, BugRepository, FeatureRecord, FeatureRepository, ProductRecord, ProductRepository,
};
use slipway_core::ports::RepositoryResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::storage_error;

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<ProductRecord>> {
        let row = sqlx::query_as::<_, (Uuid, String, Uuid)>(
            "SELECT id, name, workspace_id FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(|(id, name, workspace_id)| ProductRecord { id, name, workspace_id }))
    }
}

pub struct PgFeatureRepository {
    pool: PgPool,
}

impl PgFeatureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeatureRepository for PgFeatureRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<FeatureRecord>> {
        let row = sqlx::query_as::<_, (Uuid, String, Uuid)>(
            "SELECT id, title, workspace_id FROM features WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(|(id, title, workspace_id)| FeatureRecord { id, title, workspace_id }))
    }
}

pub struct PgBugRepository {
    pool: PgPool,
}

impl PgBugRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BugRepository for PgBugRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<BugRecord>> {
        let row = sqlx::query_as::<_, (Uuid, String, Uuid)>(
            "SELECT id, title, workspace_id FROM bugs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(|(id, title, workspace_id)| BugRecord { id, title, workspace_id }))
    }
}
