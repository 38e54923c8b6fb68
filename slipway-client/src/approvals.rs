//! Approval-workflow API endpoints

use crate::SlipwayClient;
use crate::error::Result;
use slipway_core::domain::approval::ApprovalWorkflow;
use slipway_core::dto::approval::{
    AssignGate, ChangeRequest, CommentRequest, CreateWorkflow, GateDecision, GateRejection,
};
use uuid::Uuid;

impl SlipwayClient {
    // =============================================================================
    // Approval Workflows
    // =============================================================================

    /// Create the approval workflow for a feature
    pub async fn create_workflow(&self, req: CreateWorkflow) -> Result<ApprovalWorkflow> {
        let url = format!("{}/workflow/create", self.base_url);
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }

    /// Get the workflow attached to a feature
    pub async fn get_workflow(&self, workspace_id: Uuid, feature_id: Uuid) -> Result<ApprovalWorkflow> {
        let url = format!("{}/workflow/feature/{}", self.base_url, feature_id);
        let response = self
            .client
            .get(&url)
            .query(&[("workspace_id", workspace_id)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Approve a gate
    pub async fn approve_gate(
        &self,
        workspace_id: Uuid,
        feature_id: Uuid,
        gate_id: Uuid,
        req: GateDecision,
    ) -> Result<ApprovalWorkflow> {
        let url = format!(
            "{}/workflow/feature/{}/gate/{}/approve",
            self.base_url, feature_id, gate_id
        );
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Reject a gate, terminal for the workflow
    pub async fn reject_gate(
        &self,
        workspace_id: Uuid,
        feature_id: Uuid,
        gate_id: Uuid,
        req: GateRejection,
    ) -> Result<ApprovalWorkflow> {
        let url = format!(
            "{}/workflow/feature/{}/gate/{}/reject",
            self.base_url, feature_id, gate_id
        );
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Send a gate back for changes
    pub async fn request_changes(
        &self,
        workspace_id: Uuid,
        feature_id: Uuid,
        gate_id: Uuid,
        req: ChangeRequest,
    ) -> Result<ApprovalWorkflow> {
        let url = format!(
            "{}/workflow/feature/{}/gate/{}/request-changes",
            self.base_url, feature_id, gate_id
        );
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Leave a comment on a gate
    pub async fn add_gate_comment(
        &self,
        workspace_id: Uuid,
        feature_id: Uuid,
        gate_id: Uuid,
        req: CommentRequest,
    ) -> Result<ApprovalWorkflow> {
        let url = format!(
            "{}/workflow/feature/{}/gate/{}/comment",
            self.base_url, feature_id, gate_id
        );
        let response = self
            .client
            .post(&url)
            .query(&[("workspace_id", workspace_id)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Assign a gate to a user
    pub async fn assign_gate(
        &self,
        workspace_id: Uuid,
        feature_id: Uuid,
        gate_id: Uuid,
        req: AssignGate,
    ) -> Result<ApprovalWorkflow> {
        let url = format!(
            "{}/workflow/feature/{}/gate/{}/assign",
            self.base_url, feature_id, gate_id
        );
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
