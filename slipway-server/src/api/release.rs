//! Release API Handlers
//!
//! HTTP endpoints for the release lifecycle.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use slipway_core::domain::release::Release;
use slipway_core::dto::release::{
    ApprovalDecision, ApprovalRequest, CompleteStage, CreateRelease, LinkBugFix, LinkFeature,
    RejectionDecision, ReleasePage, ReleaseQuery, RetryStage, RollbackRequest, StartStage,
    StatusChange, UpdateRelease,
};
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::api::{AppState, WorkspaceScope};

/// POST /release/create
/// Create a new release
pub async fn create_release(
    State(state): State<AppState>,
    Json(req): Json<CreateRelease>,
) -> ApiResult<Json<Release>> {
    tracing::info!("Creating release {}", req.version);

    let release = state.releases.create_release(req).await?;
    Ok(Json(release))
}

/// GET /release/list
/// List releases in a workspace, filtered, sorted and paged
pub async fn list_releases(
    State(state): State<AppState>,
    Query(query): Query<ReleaseQuery>,
) -> ApiResult<Json<ReleasePage>> {
    tracing::debug!("Listing releases for workspace {}", query.workspace_id);

    let page = state.releases.list_releases(query).await?;
    Ok(Json(page))
}

/// GET /release/{id}
/// Get release by ID
pub async fn get_release(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
) -> ApiResult<Json<Release>> {
    tracing::debug!("Getting release {}", id);

    let release = state.releases.get_release(scope.workspace_id, id).await?;
    Ok(Json(release))
}

/// POST /release/{id}/update
/// Partially update release metadata
pub async fn update_release(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<UpdateRelease>,
) -> ApiResult<Json<Release>> {
    let release = state.releases.update_release(scope.workspace_id, id, req).await?;
    Ok(Json(release))
}

/// POST /release/{id}/status
/// Overwrite the lifecycle status
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<StatusChange>,
) -> ApiResult<Json<Release>> {
    let release = state
        .releases
        .change_status(scope.workspace_id, id, req.status)
        .await?;
    Ok(Json(release))
}

/// POST /release/{id}/pipeline/start
/// Mark a pipeline stage as running
pub async fn start_stage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<StartStage>,
) -> ApiResult<Json<Release>> {
    let release = state
        .releases
        .start_stage(scope.workspace_id, id, req.stage)
        .await?;
    Ok(Json(release))
}

/// POST /release/{id}/pipeline/complete
/// Record a pipeline stage outcome
pub async fn complete_stage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<CompleteStage>,
) -> ApiResult<Json<Release>> {
    let release = state
        .releases
        .complete_stage(scope.workspace_id, id, req)
        .await?;
    Ok(Json(release))
}

/// POST /release/{id}/pipeline/retry
/// Reset a pipeline stage for another run
pub async fn retry_stage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<RetryStage>,
) -> ApiResult<Json<Release>> {
    let release = state
        .releases
        .retry_stage(scope.workspace_id, id, req.stage)
        .await?;
    Ok(Json(release))
}

/// POST /release/{id}/rollback
/// Append a rollback ledger entry
pub async fn record_rollback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<RollbackRequest>,
) -> ApiResult<Json<Release>> {
    let release = state
        .releases
        .record_rollback(scope.workspace_id, id, req)
        .await?;
    Ok(Json(release))
}

/// POST /release/{id}/feature/link
/// Link a feature to a release
pub async fn link_feature(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<LinkFeature>,
) -> ApiResult<Json<Release>> {
    let release = state
        .releases
        .link_feature(scope.workspace_id, id, req.feature_id)
        .await?;
    Ok(Json(release))
}

/// POST /release/{id}/feature/unlink
/// Unlink a feature from a release
pub async fn unlink_feature(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<LinkFeature>,
) -> ApiResult<Json<Release>> {
    let release = state
        .releases
        .unlink_feature(scope.workspace_id, id, req.feature_id)
        .await?;
    Ok(Json(release))
}

/// POST /release/{id}/bug/link
/// Link a bug fix to a release
pub async fn link_bug_fix(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<LinkBugFix>,
) -> ApiResult<Json<Release>> {
    let release = state
        .releases
        .link_bug_fix(scope.workspace_id, id, req.bug_id)
        .await?;
    Ok(Json(release))
}

/// POST /release/{id}/bug/unlink
/// Unlink a bug fix from a release
pub async fn unlink_bug_fix(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<LinkBugFix>,
) -> ApiResult<Json<Release>> {
    let release = state
        .releases
        .unlink_bug_fix(scope.workspace_id, id, req.bug_id)
        .await?;
    Ok(Json(release))
}

/// POST /release/{id}/approval/request
/// Replace the approver list with fresh pending entries
pub async fn request_approval(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<ApprovalRequest>,
) -> ApiResult<Json<Release>> {
    let release = state
        .releases
        .request_approval(scope.workspace_id, id, req)
        .await?;
    Ok(Json(release))
}

/// POST /release/{id}/approval/approve
/// Record an approver's sign-off
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<ApprovalDecision>,
) -> ApiResult<Json<Release>> {
    let release = state.releases.approve(scope.workspace_id, id, req).await?;
    Ok(Json(release))
}

/// POST /release/{id}/approval/reject
/// Record an approver's rejection
pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
    Json(req): Json<RejectionDecision>,
) -> ApiResult<Json<Release>> {
    let release = state.releases.reject(scope.workspace_id, id, req).await?;
    Ok(Json(release))
}

/// DELETE /release/{id}
/// Delete a release
pub async fn delete_release(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<WorkspaceScope>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting release {}", id);

    state.releases.delete_release(scope.workspace_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
