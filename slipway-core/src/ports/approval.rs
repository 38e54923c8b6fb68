//! Approval workflow repository port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::approval::ApprovalWorkflow;
use crate::ports::RepositoryResult;

/// Persistence interface for approval workflows. Workflows are keyed by the
/// feature they sign off; a feature has at most one.
#[async_trait]
pub trait ApprovalWorkflowRepository: Send + Sync {
    async fn find_by_feature_id(&self, feature_id: Uuid) -> RepositoryResult<Option<ApprovalWorkflow>>;

    /// Persist the workflow and return it at its new storage revision.
    async fn save(&self, workflow: &ApprovalWorkflow) -> RepositoryResult<ApprovalWorkflow>;

    async fn exists(&self, feature_id: Uuid) -> RepositoryResult<bool>;
}
