//! Release-related API endpoints

use crate::SlipwayClient;
use crate::error::Result;
use slipway_core::domain::pipeline::PipelineStage;
use slipway_core::domain::release::Release;
use slipway_core::dto::release::{
    ApprovalDecision, ApprovalRequest, CompleteStage, CreateRelease, LinkBugFix, LinkFeature,
    RejectionDecision, ReleasePage, ReleaseQuery, RetryStage, RollbackRequest, StartStage,
    StatusChange, UpdateRelease,
};
use uuid::Uuid;

impl SlipwayClient {
    // =============================================================================
    // Release Lifecycle
    // =============================================================================

    /// Create a new release
    pub async fn create_release(&self, req: CreateRelease) -> Result<Release> {
        let url = format!("{}/release/create", self.base_url);
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }

    /// List releases in a workspace, filtered, sorted and paged
    pub async fn list_releases(&self, query: &ReleaseQuery) -> Result<ReleasePage> {
        let url = format!("{}/release/list", self.base_url);
        let response = self.client.get(&url).query(query).send().await?;

        self.handle_response(response).await
    }

    /// Get a release by ID
    pub async fn get_release(&self, workspace_id: Uuid, release_id: Uuid) -> Result<Release> {
        let url = format!("{}/release/{}", self.base_url, release_id);
        let response = self
            .client
            .get(&url)
            .query(&[("workspace_id", workspace_id)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Partially update release metadata
    pub async fn update_release(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        req: UpdateRelease,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/update", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Overwrite the release lifecycle status
    pub async fn change_status(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        req: StatusChange,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/status", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete a release
    pub async fn delete_release(&self, workspace_id: Uuid, release_id: Uuid) -> Result<()> {
        let url = format!("{}/release/{}", self.base_url, release_id);
        let response = self
            .client
            .delete(&url)
            .query(&[("workspace_id", workspace_id)])
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Pipeline Stage Reporting
    // =============================================================================

    /// Mark a pipeline stage as running
    pub async fn start_stage(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        stage: PipelineStage,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/pipeline/start", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&StartStage { stage })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Record the outcome of a pipeline stage
    pub async fn complete_stage(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        req: CompleteStage,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/pipeline/complete", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Reset a pipeline stage for another run
    pub async fn retry_stage(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        stage: PipelineStage,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/pipeline/retry", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&RetryStage { stage })
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Rollback and Work-Item Linking
    // =============================================================================

    /// Append a rollback ledger entry, forcing the release into rolled_back
    pub async fn record_rollback(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        req: RollbackRequest,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/rollback", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Link a feature to a release
    pub async fn link_feature(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        feature_id: Uuid,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/feature/link", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&LinkFeature { feature_id })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Unlink a feature from a release
    pub async fn unlink_feature(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        feature_id: Uuid,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/feature/unlink", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&LinkFeature { feature_id })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Link a bug fix to a release
    pub async fn link_bug_fix(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        bug_id: Uuid,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/bug/link", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&LinkBugFix { bug_id })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Unlink a bug fix from a release
    pub async fn unlink_bug_fix(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        bug_id: Uuid,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/bug/unlink", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&LinkBugFix { bug_id })
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Release Approval
    // =============================================================================

    /// Replace the approver list with fresh pending entries
    pub async fn request_approval(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        req: ApprovalRequest,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/approval/request", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Record an approver's sign-off
    pub async fn approve_release(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        req: ApprovalDecision,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/approval/approve", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Record an approver's rejection
    pub async fn reject_release(
        &self,
        workspace_id: Uuid,
        release_id: Uuid,
        req: RejectionDecision,
    ) -> Result<Release> {
        let url = format!("{}/release/{}/approval/reject", self.base_url, release_id);
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
