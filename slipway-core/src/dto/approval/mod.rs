//! Approval workflow DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::approval::GateDefinition;

/// Request to create an approval workflow for a feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkflow {
    pub feature_id: Uuid,
    pub workspace_id: Uuid,
    #[serde(default)]
    pub gates: Vec<GateDefinition>,
}

/// A user approving a gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDecision {
    pub user_id: String,
    pub user_name: String,
}

/// A user rejecting a gate, which is terminal for the workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateRejection {
    pub user_id: String,
    pub user_name: String,
    pub reason: String,
}

/// A user sending a gate back for changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub user_id: String,
    pub user_name: String,
    pub comment: String,
}

/// A comment on a gate, with no status effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub user_id: String,
    pub user_name: String,
    pub text: String,
}

/// Assign a gate to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignGate {
    pub user_id: String,
    pub user_name: String,
}
