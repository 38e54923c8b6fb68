//! Approval gate workflow
//!
//! A generic sequential sign-off chain: ordered gates, each approved,
//! rejected or sent back for changes by a designated user. The same engine
//! backs feature sign-off and release approval. All gate operations locate
//! the gate by id and return `false` when it is unknown, leaving the
//! workflow untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall state of an approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    NotStarted,
    InProgress,
    Completed,
    Rejected,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::NotStarted => "not_started",
            WorkflowStatus::InProgress => "in_progress",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<WorkflowStatus> {
        match s {
            "not_started" => Some(WorkflowStatus::NotStarted),
            "in_progress" => Some(WorkflowStatus::InProgress),
            "completed" => Some(WorkflowStatus::Completed),
            "rejected" => Some(WorkflowStatus::Rejected),
            _ => None,
        }
    }
}

/// Decision state of a single gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    Pending,
    Approved,
    Rejected,
    ChangesRequested,
}

impl GateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateStatus::Pending => "pending",
            GateStatus::Approved => "approved",
            GateStatus::Rejected => "rejected",
            GateStatus::ChangesRequested => "changes_requested",
        }
    }
}

/// A comment left on a gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateComment {
    pub id: Uuid,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// One checkpoint in the sign-off chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalGate {
    pub id: Uuid,
    pub gate_type: String,
    pub label: String,
    pub order: u32,
    pub status: GateStatus,
    pub assigned_to: Option<String>,
    pub assigned_to_name: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub approved_by_name: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<String>,
    pub rejected_by_name: Option<String>,
    pub comments: Vec<GateComment>,
}

/// Gate blueprint supplied when a workflow is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDefinition {
    pub gate_type: String,
    pub label: String,
    pub order: u32,
}

/// Full persisted state of a workflow, as loaded from storage.
#[derive(Debug, Clone)]
pub struct WorkflowParts {
    pub id: Uuid,
    pub feature_id: Uuid,
    pub workspace_id: Uuid,
    pub status: WorkflowStatus,
    pub current_gate_index: usize,
    pub gates: Vec<ApprovalGate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: i64,
}

/// Sequential approval workflow attached to a feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalWorkflow {
    id: Uuid,
    feature_id: Uuid,
    workspace_id: Uuid,
    status: WorkflowStatus,
    current_gate_index: usize,
    gates: Vec<ApprovalGate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: i64,
}

impl ApprovalWorkflow {
    /// Create a workflow for a feature. With gates supplied the workflow is
    /// immediately in progress; without any it sits in `not_started`.
    pub fn create(feature_id: Uuid, workspace_id: Uuid, gates: Vec<GateDefinition>) -> ApprovalWorkflow {
        let now = Utc::now();
        let status = if gates.is_empty() {
            WorkflowStatus::NotStarted
        } else {
            WorkflowStatus::InProgress
        };

        let mut gates: Vec<ApprovalGate> = gates
            .into_iter()
            .map(|def| ApprovalGate {
                id: Uuid::new_v4(),
                gate_type: def.gate_type,
                label: def.label,
                order: def.order,
                status: GateStatus::Pending,
                assigned_to: None,
                assigned_to_name: None,
                approved_at: None,
                approved_by: None,
                approved_by_name: None,
                rejected_at: None,
                rejected_by: None,
                rejected_by_name: None,
                comments: Vec::new(),
            })
            .collect();
        gates.sort_by_key(|g| g.order);

        ApprovalWorkflow {
            id: Uuid::new_v4(),
            feature_id,
            workspace_id,
            status,
            current_gate_index: 0,
            gates,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    /// Restore a workflow from persisted state.
    pub fn reconstitute(parts: WorkflowParts) -> ApprovalWorkflow {
        ApprovalWorkflow {
            id: parts.id,
            feature_id: parts.feature_id,
            workspace_id: parts.workspace_id,
            status: parts.status,
            current_gate_index: parts.current_gate_index,
            gates: parts.gates,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
            revision: parts.revision,
        }
    }

    /// Copy of this workflow at the given storage revision. Repository use
    /// only, after a successful save.
    pub fn at_revision(&self, revision: i64) -> ApprovalWorkflow {
        let mut workflow = self.clone();
        workflow.revision = revision;
        workflow
    }

    // =========================================================================
    // Gate operations
    // =========================================================================

    /// Approve a gate. Advances the current index when the approved gate is
    /// the current one; approving the highest-order gate completes the
    /// workflow. Gates are located by id, so out-of-order approval is
    /// possible and accepted.
    pub fn approve_gate(&mut self, gate_id: Uuid, user_id: &str, user_name: &str) -> bool {
        let Some(pos) = self.gates.iter().position(|g| g.id == gate_id) else {
            return false;
        };
        let highest_order = self.gates.iter().map(|g| g.order).max();

        let gate = &mut self.gates[pos];
        gate.status = GateStatus::Approved;
        gate.approved_at = Some(Utc::now());
        gate.approved_by = Some(user_id.to_string());
        gate.approved_by_name = Some(user_name.to_string());

        if pos == self.current_gate_index {
            self.current_gate_index += 1;
        }
        if Some(self.gates[pos].order) == highest_order {
            self.status = WorkflowStatus::Completed;
        }
        self.touch();
        true
    }

    /// Reject a gate, recording who and why. Rejection is terminal for the
    /// workflow as a whole.
    pub fn reject_gate(&mut self, gate_id: Uuid, user_id: &str, user_name: &str, reason: String) -> bool {
        let Some(gate) = self.gates.iter_mut().find(|g| g.id == gate_id) else {
            return false;
        };
        let now = Utc::now();

        gate.status = GateStatus::Rejected;
        gate.rejected_at = Some(now);
        gate.rejected_by = Some(user_id.to_string());
        gate.rejected_by_name = Some(user_name.to_string());
        gate.comments.push(GateComment {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            text: reason,
            created_at: now,
        });

        self.status = WorkflowStatus::Rejected;
        self.touch();
        true
    }

    /// Send a gate back for changes with an explanatory comment. The
    /// workflow neither advances nor completes.
    pub fn request_changes(&mut self, gate_id: Uuid, user_id: &str, user_name: &str, comment: String) -> bool {
        let Some(gate) = self.gates.iter_mut().find(|g| g.id == gate_id) else {
            return false;
        };

        gate.status = GateStatus::ChangesRequested;
        gate.comments.push(GateComment {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            text: comment,
            created_at: Utc::now(),
        });
        self.touch();
        true
    }

    /// Leave a comment on a gate without touching its status.
    pub fn add_comment(&mut self, gate_id: Uuid, user_id: &str, user_name: &str, text: String) -> bool {
        let Some(gate) = self.gates.iter_mut().find(|g| g.id == gate_id) else {
            return false;
        };

        gate.comments.push(GateComment {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            text,
            created_at: Utc::now(),
        });
        self.touch();
        true
    }

    /// Assign a gate to a user.
    pub fn assign_gate(&mut self, gate_id: Uuid, user_id: &str, user_name: &str) -> bool {
        let Some(gate) = self.gates.iter_mut().find(|g| g.id == gate_id) else {
            return false;
        };

        gate.assigned_to = Some(user_id.to_string());
        gate.assigned_to_name = Some(user_name.to_string());
        self.touch();
        true
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn feature_id(&self) -> Uuid {
        self.feature_id
    }

    pub fn workspace_id(&self) -> Uuid {
        self.workspace_id
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn current_gate_index(&self) -> usize {
        self.current_gate_index
    }

    pub fn gates(&self) -> &[ApprovalGate] {
        &self.gates
    }

    pub fn gate(&self, gate_id: Uuid) -> Option<&ApprovalGate> {
        self.gates.iter().find(|g| g.id == gate_id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn revision(&self) -> i64 {
        self.revision
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
