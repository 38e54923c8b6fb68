//! API Module
//!
//! HTTP API layer for the server: one endpoint per use case, translating
//! service failures into status codes. Each submodule handles endpoints for
//! a specific aggregate.

pub mod approval;
pub mod error;
pub mod health;
pub mod release;

use axum::{
    Router,
    routing::{delete, get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::service::approval::ApprovalService;
use crate::service::release::ReleaseService;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub releases: ReleaseService,
    pub approvals: ApprovalService,
}

/// Tenant scope carried as a query parameter on per-aggregate routes. The
/// session layer in front of this service is expected to have vetted it.
#[derive(Debug, Deserialize)]
pub struct WorkspaceScope {
    pub workspace_id: Uuid,
}

/// Create the main API router with all endpoints
pub fn create_router(releases: ReleaseService, approvals: ApprovalService) -> Router {
    let state = AppState { releases, approvals };

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Release endpoints
        .route("/release/create", post(release::create_release))
        .route("/release/list", get(release::list_releases))
        .route("/release/{id}", get(release::get_release))
        .route("/release/{id}", delete(release::delete_release))
        .route("/release/{id}/update", post(release::update_release))
        .route("/release/{id}/status", post(release::change_status))
        .route("/release/{id}/pipeline/start", post(release::start_stage))
        .route("/release/{id}/pipeline/complete", post(release::complete_stage))
        .route("/release/{id}/pipeline/retry", post(release::retry_stage))
        .route("/release/{id}/rollback", post(release::record_rollback))
        .route("/release/{id}/feature/link", post(release::link_feature))
        .route("/release/{id}/feature/unlink", post(release::unlink_feature))
        .route("/release/{id}/bug/link", post(release::link_bug_fix))
        .route("/release/{id}/bug/unlink", post(release::unlink_bug_fix))
        .route("/release/{id}/approval/request", post(release::request_approval))
        .route("/release/{id}/approval/approve", post(release::approve))
        .route("/release/{id}/approval/reject", post(release::reject))
        // Approval workflow endpoints
        .route("/workflow/create", post(approval::create_workflow))
        .route("/workflow/feature/{feature_id}", get(approval::get_workflow))
        .route(
            "/workflow/feature/{feature_id}/gate/{gate_id}/approve",
            post(approval::approve_gate),
        )
        .route(
            "/workflow/feature/{feature_id}/gate/{gate_id}/reject",
            post(approval::reject_gate),
        )
        .route(
            "/workflow/feature/{feature_id}/gate/{gate_id}/request-changes",
            post(approval::request_changes),
        )
        .route(
            "/workflow/feature/{feature_id}/gate/{gate_id}/comment",
            post(approval::add_comment),
        )
        .route(
            "/workflow/feature/{feature_id}/gate/{gate_id}/assign",
            post(approval::assign_gate),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
