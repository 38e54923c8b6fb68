//! Release DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::pipeline::PipelineStage;
use crate::domain::release::{ApproverIdentity, Release, ReleaseStatus};

/// Request to create a new release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRelease {
    pub version: String,
    pub build_id: String,
    pub product_id: Uuid,
    pub platform: String,
    pub workspace_id: Uuid,
    pub planned_date: Option<DateTime<Utc>>,
    pub release_notes: Option<String>,
}

/// Partial metadata update; absent fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRelease {
    pub version: Option<String>,
    pub build_id: Option<String>,
    pub planned_date: Option<DateTime<Utc>>,
    pub release_notes: Option<String>,
    pub test_coverage: Option<f32>,
}

/// Request to overwrite the release lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ReleaseStatus,
}

/// Mark a pipeline stage as running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartStage {
    pub stage: PipelineStage,
}

/// Report the outcome of a pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteStage {
    pub stage: PipelineStage,
    pub success: bool,
    pub logs: Option<String>,
}

/// Reset a pipeline stage for another run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryStage {
    pub stage: PipelineStage,
}

/// Record a rollback to an earlier version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackRequest {
    pub target_version: String,
    pub reason: String,
    pub rolled_back_by: String,
    pub notes: Option<String>,
}

/// Link a feature to a release; the title is resolved server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkFeature {
    pub feature_id: Uuid,
}

/// Link a bug fix to a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkBugFix {
    pub bug_id: Uuid,
}

/// Replace the approver list with fresh pending entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub approvers: Vec<ApproverIdentity>,
}

/// An approver signing off on a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub user_id: String,
    pub comment: Option<String>,
}

/// An approver rejecting a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionDecision {
    pub user_id: String,
    pub reason: String,
}

/// Field to sort release listings by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseSortField {
    #[default]
    CreatedAt,
    PlannedDate,
    Version,
}

/// Sort direction for release listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

/// Filtered, sorted, paged release listing query. The workspace is always
/// part of the query; cross-tenant listings do not exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseQuery {
    pub workspace_id: Uuid,
    pub status: Option<ReleaseStatus>,
    pub product_id: Option<Uuid>,
    pub platform: Option<String>,
    #[serde(default)]
    pub sort_by: ReleaseSortField,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl ReleaseQuery {
    /// Listing for a workspace with no filters, first page, default sort.
    pub fn for_workspace(workspace_id: Uuid) -> Self {
        Self {
            workspace_id,
            status: None,
            product_id: None,
            platform: None,
            sort_by: ReleaseSortField::default(),
            sort_order: SortOrder::default(),
            page: default_page(),
            limit: default_limit(),
        }
    }

    /// Rows to skip for the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of a release listing, with the unpaged total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleasePage {
    pub releases: Vec<Release>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_offset() {
        let mut query = ReleaseQuery::for_workspace(Uuid::new_v4());
        assert_eq!(query.offset(), 0);

        query.page = 3;
        query.limit = 25;
        assert_eq!(query.offset(), 50);

        // Page 0 is treated like page 1 rather than underflowing.
        query.page = 0;
        assert_eq!(query.offset(), 0);
    }
}
