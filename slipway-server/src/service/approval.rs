//! Approval Workflow Service
//!
//! Business logic for feature sign-off chains. Feature existence and tenant
//! ownership are checked here before the gate engine runs; cross-tenant
//! access is indistinguishable from not-found.

use std::sync::Arc;

use slipway_core::domain::approval::ApprovalWorkflow;
use slipway_core::dto::approval::{
    AssignGate, ChangeRequest, CommentRequest, CreateWorkflow, GateDecision, GateRejection,
};
use slipway_core::ports::approval::ApprovalWorkflowRepository;
use slipway_core::ports::collaborators::FeatureRepository;
use slipway_core::ports::RepositoryError;
use uuid::Uuid;

/// Service error type
#[derive(Debug)]
pub enum WorkflowError {
    WorkflowNotFound(Uuid),
    FeatureNotFound(Uuid),
    ValidationError(String),
    Conflict,
    RepositoryError(RepositoryError),
}

impl From<RepositoryError> for WorkflowError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict => WorkflowError::Conflict,
            other => WorkflowError::RepositoryError(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[derive(Clone)]
pub struct ApprovalService {
    workflows: Arc<dyn ApprovalWorkflowRepository>,
    features: Arc<dyn FeatureRepository>,
}

impl ApprovalService {
    pub fn new(
        workflows: Arc<dyn ApprovalWorkflowRepository>,
        features: Arc<dyn FeatureRepository>,
    ) -> Self {
        Self { workflows, features }
    }

    /// Create the approval workflow for a feature. A feature has at most one.
    pub async fn create_workflow(&self, req: CreateWorkflow) -> Result<ApprovalWorkflow> {
        let feature = self
            .features
            .find_by_id(req.feature_id)
            .await?
            .filter(|f| f.workspace_id == req.workspace_id)
            .ok_or(WorkflowError::FeatureNotFound(req.feature_id))?;

        if self.workflows.exists(feature.id).await? {
            return Err(WorkflowError::ValidationError(
                "Approval workflow already exists for this feature".to_string(),
            ));
        }

        let workflow = ApprovalWorkflow::create(feature.id, req.workspace_id, req.gates);
        let workflow = self.workflows.save(&workflow).await?;

        tracing::info!(
            "Approval workflow created for feature {} ({} gates)",
            workflow.feature_id(),
            workflow.gates().len()
        );

        Ok(workflow)
    }

    /// Get the workflow attached to a feature
    pub async fn get_for_feature(&self, workspace_id: Uuid, feature_id: Uuid) -> Result<ApprovalWorkflow> {
        self.load(workspace_id, feature_id).await
    }

    /// Approve a gate
    pub async fn approve_gate(
        &self,
        workspace_id: Uuid,
        feature_id: Uuid,
        gate_id: Uuid,
        req: GateDecision,
    ) -> Result<ApprovalWorkflow> {
        let mut workflow = self.load(workspace_id, feature_id).await?;

        if !workflow.approve_gate(gate_id, &req.user_id, &req.user_name) {
            return Err(WorkflowError::ValidationError("Failed to approve gate".to_string()));
        }
        let workflow = self.workflows.save(&workflow).await?;

        tracing::info!(
            "Gate {} approved by {} (workflow now {})",
            gate_id,
            req.user_id,
            workflow.status().as_str()
        );

        Ok(workflow)
    }

    /// Reject a gate, terminal for the workflow
    pub async fn reject_gate(
        &self,
        workspace_id: Uuid,
        feature_id: Uuid,
        gate_id: Uuid,
        req: GateRejection,
    ) -> Result<ApprovalWorkflow> {
        let mut workflow = self.load(workspace_id, feature_id).await?;

        if !workflow.reject_gate(gate_id, &req.user_id, &req.user_name, req.reason) {
            return Err(WorkflowError::ValidationError("Failed to reject gate".to_string()));
        }
        let workflow = self.workflows.save(&workflow).await?;

        tracing::info!("Gate {} rejected by {}", gate_id, req.user_id);

        Ok(workflow)
    }

    /// Send a gate back for changes
    pub async fn request_changes(
        &self,
        workspace_id: Uuid,
        feature_id: Uuid,
        gate_id: Uuid,
        req: ChangeRequest,
    ) -> Result<ApprovalWorkflow> {
        let mut workflow = self.load(workspace_id, feature_id).await?;

        if !workflow.request_changes(gate_id, &req.user_id, &req.user_name, req.comment) {
            return Err(WorkflowError::ValidationError("Failed to request changes".to_string()));
        }
        let workflow = self.workflows.save(&workflow).await?;

        Ok(workflow)
    }

    /// Leave a comment on a gate
    pub async fn add_comment(
        &self,
        workspace_id: Uuid,
        feature_id: Uuid,
        gate_id: Uuid,
        req: CommentRequest,
    ) -> Result<ApprovalWorkflow> {
        let mut workflow = self.load(workspace_id, feature_id).await?;

        if !workflow.add_comment(gate_id, &req.user_id, &req.user_name, req.text) {
            return Err(WorkflowError::ValidationError("Failed to add comment".to_string()));
        }
        let workflow = self.workflows.save(&workflow).await?;

        Ok(workflow)
    }

    /// Assign a gate to a user
    pub async fn assign_gate(
        &self,
        workspace_id: Uuid,
        feature_id: Uuid,
        gate_id: Uuid,
        req: AssignGate,
    ) -> Result<ApprovalWorkflow> {
        let mut workflow = self.load(workspace_id, feature_id).await?;

        if !workflow.assign_gate(gate_id, &req.user_id, &req.user_name) {
            return Err(WorkflowError::ValidationError("Failed to assign gate".to_string()));
        }
        let workflow = self.workflows.save(&workflow).await?;

        Ok(workflow)
    }

    async fn load(&self, workspace_id: Uuid, feature_id: Uuid) -> Result<ApprovalWorkflow> {
        self.workflows
            .find_by_feature_id(feature_id)
            .await?
            .filter(|w| w.workspace_id() == workspace_id)
            .ok_or(WorkflowError::WorkflowNotFound(feature_id))
    }
}
