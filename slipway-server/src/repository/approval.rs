//! Approval Workflow Repository
//!
//! Postgres persistence for approval workflows, keyed by feature. Gates are
//! stored whole as JSONB; saves carry the same revision guard as releases.

use async_trait::async_trait;
use slipway_core::domain::approval::{ApprovalGate, ApprovalWorkflow, WorkflowParts, WorkflowStatus};
use slipway_core::ports::approval::ApprovalWorkflowRepository;
use slipway_core::ports::{RepositoryError, RepositoryResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::storage_error;

pub struct PgApprovalWorkflowRepository {
    pool: PgPool,
}

impl PgApprovalWorkflowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApprovalWorkflowRepository for PgApprovalWorkflowRepository {
    async fn find_by_feature_id(&self, feature_id: Uuid) -> RepositoryResult<Option<ApprovalWorkflow>> {
        let row = sqlx::query_as::<_, WorkflowRow>(
            r#"
            SELECT id, feature_id, workspace_id, status, current_gate_index, gates,
                   created_at, updated_at, revision
            FROM approval_workflows
            WHERE feature_id = $1
            "#,
        )
        .bind(feature_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(|r| r.into()))
    }

    async fn save(&self, workflow: &ApprovalWorkflow) -> RepositoryResult<ApprovalWorkflow> {
        let next_revision = workflow.revision() + 1;

        if workflow.revision() == 0 {
            // First save; the unique feature_id constraint also rejects a
            // second workflow racing in for the same feature.
            let result = sqlx::query(
                r#"
                INSERT INTO approval_workflows (
                    id, feature_id, workspace_id, status, current_gate_index, gates,
                    created_at, updated_at, revision
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(workflow.id())
            .bind(workflow.feature_id())
            .bind(workflow.workspace_id())
            .bind(workflow.status().as_str())
            .bind(workflow.current_gate_index() as i32)
            .bind(serde_json::to_value(workflow.gates()).unwrap())
            .bind(workflow.created_at())
            .bind(workflow.updated_at())
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
                UPDATE approval_workflows
                SET status = $3, current_gate_index = $4, gates = $5, updated_at = $6,
                    revision = $7
                WHERE id = $1 AND revision = $2
                "#,
            )
            .bind(workflow.id())
            .bind(workflow.revision())
            .bind(workflow.status().as_str())
            .bind(workflow.current_gate_index() as i32)
            .bind(serde_json::to_value(workflow.gates()).unwrap())
            .bind(workflow.updated_at())
            .bind(next_revision)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::Conflict);
            }
        }

        Ok(workflow.at_revision(next_revision))
    }

    async fn exists(&self, feature_id: Uuid) -> RepositoryResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM approval_workflows WHERE feature_id = $1)",
        )
        .bind(feature_id)
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
struct WorkflowRow {
    id: Uuid,
    feature_id: Uuid,
    workspace_id: Uuid,
    status: String,
    current_gate_index: i32,
    gates: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    revision: i64,
}

impl From<WorkflowRow> for ApprovalWorkflow {
    fn from(row: WorkflowRow) -> Self {
        let gates: Vec<ApprovalGate> = serde_json::from_value(row.gates).unwrap_or_default();

        ApprovalWorkflow::reconstitute(WorkflowParts {
            id: row.id,
            feature_id: row.feature_id,
            workspace_id: row.workspace_id,
            status: WorkflowStatus::parse(&row.status).unwrap_or(WorkflowStatus::NotStarted),
            current_gate_index: row.current_gate_index.max(0) as usize,
            gates,
            created_at: row.created_at,
            updated_at: row.updated_at,
            revision: row.revision,
        })
    }
}
