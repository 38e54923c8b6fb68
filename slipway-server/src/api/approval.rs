//! Approval Workflow API Handlers
//!
//! HTTP endpoints for feature sign-off chains.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use slipway_core::domain::approval::ApprovalWorkflow;
use slipway_core::dto::approval::{
    AssignGate, ChangeRequest, CommentRequest, CreateWorkflow, GateDecision, GateRejection,
};
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::api::{AppState, WorkspaceScope};

/// POST /workflow/create
/// Create the approval workflow for a feature
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(req): Json<CreateWorkflow>,
) -> ApiResult<Json<ApprovalWorkflow>> {
    tracing::info!("Creating approval workflow for feature {}", req.feature_id);

    let workflow = state.approvals.create_workflow(req).await?;
    Ok(Json(workflow))
}

/// GET /workflow/feature/{feature_id}
/// Get the workflow attached to a feature
pub async fn get_workflow(
    State(state): State<AppState>,
    Path(feature_id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
) -> ApiResult<Json<ApprovalWorkflow>> {
    tracing::debug!("Getting approval workflow for feature {}", feature_id);

    let workflow = state
        .approvals
        .get_for_feature(scope.workspace_id, feature_id)
        .await?;
    Ok(Json(workflow))
}

/// POST /workflow/feature/{feature_id}/gate/{gate_id}/approve
/// Approve a gate
pub async fn approve_gate(
    State(state): State<AppState>,
    Path((feature_id, gate_id)): Path<(Uuid, Uuid)>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<GateDecision>,
) -> ApiResult<Json<ApprovalWorkflow>> {
    let workflow = state
        .approvals
        .approve_gate(scope.workspace_id, feature_id, gate_id, req)
        .await?;
    Ok(Json(workflow))
}

/// POST /workflow/feature/{feature_id}/gate/{gate_id}/reject
/// Reject a gate, terminal for the workflow
pub async fn reject_gate(
    State(state): State<AppState>,
    Path((feature_id, gate_id)): Path<(Uuid, Uuid)>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<GateRejection>,
) -> ApiResult<Json<ApprovalWorkflow>> {
    let workflow = state
        .approvals
        .reject_gate(scope.workspace_id, feature_id, gate_id, req)
        .await?;
    Ok(Json(workflow))
}

/// POST /workflow/feature/{feature_id}/gate/{gate_id}/request-changes
/// Send a gate back for changes
pub async fn request_changes(
    State(state): State<AppState>,
    Path((feature_id, gate_id)): Path<(Uuid, Uuid)>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<ChangeRequest>,
) -> ApiResult<Json<ApprovalWorkflow>> {
    let workflow = state
        .approvals
        .request_changes(scope.workspace_id, feature_id, gate_id, req)
        .await?;
    Ok(Json(workflow))
}

/// POST /workflow/feature/{feature_id}/gate/{gate_id}/comment
/// Leave a comment on a gate
pub async fn add_comment(
    State(state): State<AppState>,
    Path((feature_id, gate_id)): Path<(Uuid, Uuid)>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<CommentRequest>,
) -> ApiResult<Json<ApprovalWorkflow>> {
    let workflow = state
        .approvals
        .add_comment(scope.workspace_id, feature_id, gate_id, req)
        .await?;
    Ok(Json(workflow))
}

/// POST /workflow/feature/{feature_id}/gate/{gate_id}/assign
/// Assign a gate to a user
pub async fn assign_gate(
    State(state): State<AppState>,
    Path((feature_id, gate_id)): Path<(Uuid, Uuid)>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<AssignGate>,
) -> ApiResult<Json<ApprovalWorkflow>> {
    let workflow = state
        .approvals
        .assign_gate(scope.workspace_id, feature_id, gate_id, req)
        .await?;
    Ok(Json(workflow))
}
