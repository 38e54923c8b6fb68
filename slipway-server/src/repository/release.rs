//! Release Repository
//!
//! Postgres persistence for the Release aggregate. Nested collections are
//! stored as JSONB; saves are guarded by the revision column so concurrent
//! writers surface as conflicts instead of lost updates.

use async_trait::async_trait;
use slipway_core::domain::pipeline::{PipelineStep, canonical_pipeline};
use slipway_core::domain::release::{
    ApprovalStatus, Approver, LinkedBugFix, LinkedFeature, Release, ReleaseParts, ReleaseStatus,
    RollbackLog,
};
use slipway_core::dto::release::{ReleasePage, ReleaseQuery, ReleaseSortField, SortOrder};
use slipway_core::ports::release::ReleaseRepository;
use slipway_core::ports::{RepositoryError, RepositoryResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::storage_error;

const RELEASE_COLUMNS: &str = "id, version, build_id, product_id, product_name, platform, status, \
     release_date, planned_date, features, bug_fixes, test_coverage, pipeline, rollback_logs, \
     release_notes, approval_status, approvers, workspace_id, created_at, updated_at, revision";

pub struct PgReleaseRepository {
    pool: PgPool,
}

impl PgReleaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReleaseRepository for PgReleaseRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Release>> {
        let row = sqlx::query_as::<_, ReleaseRow>(&format!(
            "SELECT {RELEASE_COLUMNS} FROM releases WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_all(&self, query: &ReleaseQuery) -> RepositoryResult<ReleasePage> {
        let order_column = match query.sort_by {
            ReleaseSortField::CreatedAt => "created_at",
            ReleaseSortField::PlannedDate => "planned_date",
            ReleaseSortField::Version => "version",
        };
        let direction = match query.sort_order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        let filter = "workspace_id = $1 \
             AND ($2::text IS NULL OR status = $2) \
             AND ($3::uuid IS NULL OR product_id = $3) \
             AND ($4::text IS NULL OR platform = $4)";

        let rows = sqlx::query_as::<_, ReleaseRow>(&format!(
            "SELECT {RELEASE_COLUMNS} FROM releases WHERE {filter} \
             ORDER BY {order_column} {direction} LIMIT $5 OFFSET $6"
        ))
        .bind(query.workspace_id)
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.product_id)
        .bind(query.platform.as_deref())
        .bind(i64::from(query.limit))
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM releases WHERE {filter}"
        ))
        .bind(query.workspace_id)
        .bind(query.status.map(|s| s.as_str()))
        .bind(query.product_id)
        .bind(query.platform.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(ReleasePage {
            releases: rows.into_iter().map(|r| r.into()).collect(),
            total: total as u64,
        })
    }

    async fn save(&self, release: &Release) -> RepositoryResult<Release> {
        let next_revision = release.revision() + 1;

        if release.revision() == 0 {
            // First save. A duplicate id means someone else inserted this
            // aggregate in the meantime.
            let result = sqlx::query(
                r#"
                INSERT INTO releases (
                    id, version, build_id, product_id, product_name, platform, status,
                    release_date, planned_date, features, bug_fixes, test_coverage,
                    pipeline, rollback_logs, release_notes, approval_status, approvers,
                    workspace_id, created_at, updated_at, revision
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                        $15, $16, $17, $18, $19, $20, $21)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(release.id())
            .bind(release.version())
            .bind(release.build_id())
            .bind(release.product_id())
            .bind(release.product_name())
            .bind(release.platform())
            .bind(release.status().as_str())
            .bind(release.release_date())
            .bind(release.planned_date())
            .bind(serde_json::to_value(release.features()).unwrap())
            .bind(serde_json::to_value(release.bug_fixes()).unwrap())
            .bind(release.test_coverage())
            .bind(serde_json::to_value(release.pipeline()).unwrap())
            .bind(serde_json::to_value(release.rollback_logs()).unwrap())
            .bind(release.release_notes())
            .bind(release.approval_status().map(|s| s.as_str()))
            .bind(serde_json::to_value(release.approvers()).unwrap())
            .bind(release.workspace_id())
            .bind(release.created_at())
            .bind(release.updated_at())
            .bind(next_revision)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::Conflict);
            }
        } else {
            let result = sqlx::query(
                r#"
                UPDATE releases
                SET version = $3, build_id = $4, product_name = $5, platform = $6,
                    status = $7, release_date = $8, planned_date = $9, features = $10,
                    bug_fixes = $11, test_coverage = $12, pipeline = $13,
                    rollback_logs = $14, release_notes = $15, approval_status = $16,
                    approvers = $17, updated_at = $18, revision = $19
                WHERE id = $1 AND revision = $2
                "#,
            )
            .bind(release.id())
            .bind(release.revision())
            .bind(release.version())
            .bind(release.build_id())
            .bind(release.product_name())
            .bind(release.platform())
            .bind(release.status().as_str())
            .bind(release.release_date())
            .bind(release.planned_date())
            .bind(serde_json::to_value(release.features()).unwrap())
            .bind(serde_json::to_value(release.bug_fixes()).unwrap())
            .bind(release.test_coverage())
            .bind(serde_json::to_value(release.pipeline()).unwrap())
            .bind(serde_json::to_value(release.rollback_logs()).unwrap())
            .bind(release.release_notes())
            .bind(release.approval_status().map(|s| s.as_str()))
            .bind(serde_json::to_value(release.approvers()).unwrap())
            .bind(release.updated_at())
            .bind(next_revision)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::Conflict);
            }
        }

        Ok(release.at_revision(next_revision))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM releases WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: Uuid) -> RepositoryResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM releases WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(exists)
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ReleaseRow {
    id: Uuid,
    version: String,
    build_id: String,
    product_id: Uuid,
    product_name: String,
    platform: String,
    status: String,
    release_date: Option<chrono::DateTime<chrono::Utc>>,
    planned_date: Option<chrono::DateTime<chrono::Utc>>,
    features: serde_json::Value,
    bug_fixes: serde_json::Value,
    test_coverage: f32,
    pipeline: serde_json::Value,
    rollback_logs: serde_json::Value,
    release_notes: Option<String>,
    approval_status: Option<String>,
    approvers: serde_json::Value,
    workspace_id: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    revision: i64,
}

impl From<ReleaseRow> for Release {
    fn from(row: ReleaseRow) -> Self {
        let features: Vec<LinkedFeature> = serde_json::from_value(row.features).unwrap_or_default();
        let bug_fixes: Vec<LinkedBugFix> = serde_json::from_value(row.bug_fixes).unwrap_or_default();
        // A release always carries the canonical pipeline; fall back to it
        // rather than reconstituting an empty one.
        let pipeline: Vec<PipelineStep> =
            serde_json::from_value(row.pipeline).unwrap_or_else(|_| canonical_pipeline());
        let rollback_logs: Vec<RollbackLog> =
            serde_json::from_value(row.rollback_logs).unwrap_or_default();
        let approvers: Vec<Approver> = serde_json::from_value(row.approvers).unwrap_or_default();

        Release::reconstitute(ReleaseParts {
            id: row.id,
            version: row.version,
            build_id: row.build_id,
            product_id: row.product_id,
            product_name: row.product_name,
            platform: row.platform,
            status: ReleaseStatus::parse(&row.status).unwrap_or(ReleaseStatus::Planning),
            release_date: row.release_date,
            planned_date: row.planned_date,
            features,
            bug_fixes,
            test_coverage: row.test_coverage,
            pipeline,
            rollback_logs,
            release_notes: row.release_notes,
            approval_status: row.approval_status.as_deref().and_then(ApprovalStatus::parse),
            approvers,
            workspace_id: row.workspace_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            revision: row.revision,
        })
    }
}
