//! Release Service
//!
//! Business logic for the release lifecycle: creation, pipeline reporting,
//! rollback, work-item linking and release approval.

use std::sync::Arc;

use slipway_core::domain::pipeline::PipelineStage;
use slipway_core::domain::release::{NewRelease, Release, ReleaseStatus};
use slipway_core::dto::release::{
    ApprovalDecision, ApprovalRequest, CompleteStage, CreateRelease, RejectionDecision,
    ReleasePage, ReleaseQuery, RollbackRequest, UpdateRelease,
};
use slipway_core::ports::collaborators::{BugRepository, FeatureRepository, ProductRepository};
use slipway_core::ports::release::ReleaseRepository;
use slipway_core::ports::RepositoryError;
use uuid::Uuid;

/// Service error type
#[derive(Debug)]
pub enum ReleaseError {
    NotFound(Uuid),
    ProductNotFound(Uuid),
    FeatureNotFound(Uuid),
    BugNotFound(Uuid),
    ValidationError(String),
    Conflict,
    RepositoryError(RepositoryError),
}

impl From<RepositoryError> for ReleaseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict => ReleaseError::Conflict,
            other => ReleaseError::RepositoryError(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReleaseError>;

#[derive(Clone)]
pub struct ReleaseService {
    releases: Arc<dyn ReleaseRepository>,
    products: Arc<dyn ProductRepository>,
    features: Arc<dyn FeatureRepository>,
    bugs: Arc<dyn BugRepository>,
}

impl ReleaseService {
    pub fn new(
        releases: Arc<dyn ReleaseRepository>,
        products: Arc<dyn ProductRepository>,
        features: Arc<dyn FeatureRepository>,
        bugs: Arc<dyn BugRepository>,
    ) -> Self {
        Self { releases, products, features, bugs }
    }

    /// Create a new release for a product in the caller's workspace
    pub async fn create_release(&self, req: CreateRelease) -> Result<Release> {
        validate_create_request(&req)?;

        // Resolve the product name and verify tenant ownership. A product in
        // another workspace is indistinguishable from a missing one.
        let product = self
            .products
            .find_by_id(req.product_id)
            .await?
            .filter(|p| p.workspace_id == req.workspace_id)
            .ok_or(ReleaseError::ProductNotFound(req.product_id))?;

        let release = Release::create(NewRelease {
            version: req.version,
            build_id: req.build_id,
            product_id: product.id,
            product_name: product.name,
            platform: req.platform,
            workspace_id: req.workspace_id,
            planned_date: req.planned_date,
            release_notes: req.release_notes,
        });
        let release = self.releases.save(&release).await?;

        tracing::info!("Release created: {} ({})", release.version(), release.id());

        Ok(release)
    }

    /// Get a release by ID
    pub async fn get_release(&self, workspace_id: Uuid, id: Uuid) -> Result<Release> {
        self.load(workspace_id, id).await
    }

    /// List releases for a workspace, filtered, sorted and paged
    pub async fn list_releases(&self, query: ReleaseQuery) -> Result<ReleasePage> {
        let page = self.releases.find_all(&query).await?;
        Ok(page)
    }

    /// Partially update release metadata
    pub async fn update_release(&self, workspace_id: Uuid, id: Uuid, req: UpdateRelease) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        release.apply_update(
            req.version,
            req.build_id,
            req.planned_date,
            req.release_notes,
            req.test_coverage,
        );
        let release = self.releases.save(&release).await?;

        Ok(release)
    }

    /// Overwrite the lifecycle status
    pub async fn change_status(&self, workspace_id: Uuid, id: Uuid, status: ReleaseStatus) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        release.set_status(status);
        let release = self.releases.save(&release).await?;

        tracing::info!("Release {} status changed to {}", id, status.as_str());

        Ok(release)
    }

    /// Mark a pipeline stage as running
    pub async fn start_stage(&self, workspace_id: Uuid, id: Uuid, stage: PipelineStage) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        if !release.start_stage(stage) {
            return Err(ReleaseError::ValidationError("Pipeline stage not found".to_string()));
        }
        let release = self.releases.save(&release).await?;

        tracing::info!("Release {} stage {} started", id, stage.as_str());

        Ok(release)
    }

    /// Record the outcome of a pipeline stage
    pub async fn complete_stage(&self, workspace_id: Uuid, id: Uuid, req: CompleteStage) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        if !release.complete_stage(req.stage, req.success, req.logs) {
            return Err(ReleaseError::ValidationError("Pipeline stage not found".to_string()));
        }
        let release = self.releases.save(&release).await?;

        tracing::info!(
            "Release {} stage {} completed: {}",
            id,
            req.stage.as_str(),
            if req.success { "passed" } else { "failed" }
        );

        Ok(release)
    }

    /// Reset a pipeline stage for another run
    pub async fn retry_stage(&self, workspace_id: Uuid, id: Uuid, stage: PipelineStage) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        if !release.retry_stage(stage) {
            return Err(ReleaseError::ValidationError("Pipeline stage not found".to_string()));
        }
        let release = self.releases.save(&release).await?;

        tracing::info!("Release {} stage {} reset for retry", id, stage.as_str());

        Ok(release)
    }

    /// Append a rollback ledger entry, forcing the release into rolled_back
    pub async fn record_rollback(&self, workspace_id: Uuid, id: Uuid, req: RollbackRequest) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        release.add_rollback_log(req.target_version, req.reason, req.rolled_back_by, req.notes);
        let release = self.releases.save(&release).await?;

        tracing::warn!("Release {} rolled back", id);

        Ok(release)
    }

    /// Link a feature, denormalizing its current title into the release
    pub async fn link_feature(&self, workspace_id: Uuid, id: Uuid, feature_id: Uuid) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        let feature = self
            .features
            .find_by_id(feature_id)
            .await?
            .filter(|f| f.workspace_id == workspace_id)
            .ok_or(ReleaseError::FeatureNotFound(feature_id))?;

        release.link_feature(feature.id, feature.title);
        let release = self.releases.save(&release).await?;

        Ok(release)
    }

    /// Unlink a feature from a release
    pub async fn unlink_feature(&self, workspace_id: Uuid, id: Uuid, feature_id: Uuid) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        if !release.unlink_feature(feature_id) {
            return Err(ReleaseError::ValidationError(
                "Feature is not linked to this release".to_string(),
            ));
        }
        let release = self.releases.save(&release).await?;

        Ok(release)
    }

    /// Link a bug fix, denormalizing its current title into the release
    pub async fn link_bug_fix(&self, workspace_id: Uuid, id: Uuid, bug_id: Uuid) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        let bug = self
            .bugs
            .find_by_id(bug_id)
            .await?
            .filter(|b| b.workspace_id == workspace_id)
            .ok_or(ReleaseError::BugNotFound(bug_id))?;

        release.link_bug_fix(bug.id, bug.title);
        let release = self.releases.save(&release).await?;

        Ok(release)
    }

    /// Unlink a bug fix from a release
    pub async fn unlink_bug_fix(&self, workspace_id: Uuid, id: Uuid, bug_id: Uuid) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        if !release.unlink_bug_fix(bug_id) {
            return Err(ReleaseError::ValidationError(
                "Bug fix is not linked to this release".to_string(),
            ));
        }
        let release = self.releases.save(&release).await?;

        Ok(release)
    }

    /// Replace the approver list with fresh pending entries
    pub async fn request_approval(&self, workspace_id: Uuid, id: Uuid, req: ApprovalRequest) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        release.request_approval(req.approvers);
        let release = self.releases.save(&release).await?;

        tracing::info!("Approval requested for release {}", id);

        Ok(release)
    }

    /// Record an approver's sign-off
    pub async fn approve(&self, workspace_id: Uuid, id: Uuid, req: ApprovalDecision) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        if !release.approve(&req.user_id, req.comment) {
            return Err(ReleaseError::ValidationError(
                "User is not an approver for this release".to_string(),
            ));
        }
        let release = self.releases.save(&release).await?;

        tracing::info!("Release {} approved by {}", id, req.user_id);

        Ok(release)
    }

    /// Record an approver's rejection
    pub async fn reject(&self, workspace_id: Uuid, id: Uuid, req: RejectionDecision) -> Result<Release> {
        let mut release = self.load(workspace_id, id).await?;

        if !release.reject(&req.user_id, req.reason) {
            return Err(ReleaseError::ValidationError(
                "User is not an approver for this release".to_string(),
            ));
        }
        let release = self.releases.save(&release).await?;

        tracing::info!("Release {} rejected by {}", id, req.user_id);

        Ok(release)
    }

    /// Delete a release. Administrative: no domain rule governs deletion.
    pub async fn delete_release(&self, workspace_id: Uuid, id: Uuid) -> Result<()> {
        let release = self.load(workspace_id, id).await?;

        let deleted = self.releases.delete(release.id()).await?;
        if !deleted {
            return Err(ReleaseError::NotFound(id));
        }

        tracing::info!("Release deleted: {}", id);

        Ok(())
    }

    /// Load a release, treating a workspace mismatch exactly like absence so
    /// cross-tenant existence never leaks.
    async fn load(&self, workspace_id: Uuid, id: Uuid) -> Result<Release> {
        self.releases
            .find_by_id(id)
            .await?
            .filter(|r| r.workspace_id() == workspace_id)
            .ok_or(ReleaseError::NotFound(id))
    }
}

// =============================================================================
// Validation
// =============================================================================

fn validate_create_request(req: &CreateRelease) -> Result<()> {
    if req.version.trim().is_empty() {
        return Err(ReleaseError::ValidationError(
            "Release version cannot be empty".to_string(),
        ));
    }

    if req.build_id.trim().is_empty() {
        return Err(ReleaseError::ValidationError(
            "Build id cannot be empty".to_string(),
        ));
    }

    if req.platform.trim().is_empty() {
        return Err(ReleaseError::ValidationError(
            "Platform cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::{
        InMemoryBugRepository, InMemoryFeatureRepository, InMemoryProductRepository,
        InMemoryReleaseRepository,
    };
    use slipway_core::domain::pipeline::StepStatus;
    use slipway_core::domain::release::{ApprovalStatus, ApproverIdentity};
    use slipway_core::ports::collaborators::{BugRecord, FeatureRecord, ProductRecord};

    struct Fixture {
        service: ReleaseService,
        products: Arc<InMemoryProductRepository>,
        features: Arc<InMemoryFeatureRepository>,
        bugs: Arc<InMemoryBugRepository>,
        workspace_id: Uuid,
        product_id: Uuid,
    }

    fn fixture() -> Fixture {
        let releases = Arc::new(InMemoryReleaseRepository::default());
        let products = Arc::new(InMemoryProductRepository::default());
        let features = Arc::new(InMemoryFeatureRepository::default());
        let bugs = Arc::new(InMemoryBugRepository::default());

        let workspace_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        products.insert(ProductRecord {
            id: product_id,
            name: "Atlas".to_string(),
            workspace_id,
        });

        let service = ReleaseService::new(
            releases,
            products.clone(),
            features.clone(),
            bugs.clone(),
        );

        Fixture { service, products, features, bugs, workspace_id, product_id }
    }

    fn create_request(fix: &Fixture) -> CreateRelease {
        CreateRelease {
            version: "1.0.0".to_string(),
            build_id: "build-77".to_string(),
            product_id: fix.product_id,
            platform: "ios".to_string(),
            workspace_id: fix.workspace_id,
            planned_date: None,
            release_notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_release_resolves_product_name() {
        let fix = fixture();

        let release = fix.service.create_release(create_request(&fix)).await.unwrap();

        assert_eq!(release.product_name(), "Atlas");
        assert_eq!(release.status(), ReleaseStatus::Planning);
        assert_eq!(release.revision(), 1);

        let loaded = fix
            .service
            .get_release(fix.workspace_id, release.id())
            .await
            .unwrap();
        assert_eq!(loaded.pipeline().len(), 6);
    }

    #[tokio::test]
    async fn test_create_release_rejects_foreign_product() {
        let fix = fixture();
        let foreign_product = Uuid::new_v4();
        fix.products.insert(ProductRecord {
            id: foreign_product,
            name: "Someone else's".to_string(),
            workspace_id: Uuid::new_v4(),
        });

        let mut req = create_request(&fix);
        req.product_id = foreign_product;

        let result = fix.service.create_release(req).await;
        assert!(matches!(result, Err(ReleaseError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_release_validates_fields() {
        let fix = fixture();
        let mut req = create_request(&fix);
        req.version = "  ".to_string();

        let result = fix.service.create_release(req).await;
        assert!(matches!(result, Err(ReleaseError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_get_release_hides_other_workspaces() {
        let fix = fixture();
        let release = fix.service.create_release(create_request(&fix)).await.unwrap();

        let result = fix.service.get_release(Uuid::new_v4(), release.id()).await;
        assert!(matches!(result, Err(ReleaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_build_stage_runs_to_passed() {
        let fix = fixture();
        let release = fix.service.create_release(create_request(&fix)).await.unwrap();

        fix.service
            .start_stage(fix.workspace_id, release.id(), PipelineStage::Build)
            .await
            .unwrap();
        let release = fix
            .service
            .complete_stage(
                fix.workspace_id,
                release.id(),
                CompleteStage { stage: PipelineStage::Build, success: true, logs: None },
            )
            .await
            .unwrap();

        let step = &release.pipeline()[0];
        assert_eq!(step.stage, PipelineStage::Build);
        assert_eq!(step.status, StepStatus::Passed);
        assert!(step.started_at.is_some());
        assert!(step.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_link_feature_denormalizes_title() {
        let fix = fixture();
        let release = fix.service.create_release(create_request(&fix)).await.unwrap();
        let feature_id = Uuid::new_v4();
        fix.features.insert(FeatureRecord {
            id: feature_id,
            title: "Dark mode".to_string(),
            workspace_id: fix.workspace_id,
        });

        let release = fix
            .service
            .link_feature(fix.workspace_id, release.id(), feature_id)
            .await
            .unwrap();

        assert_eq!(release.features().len(), 1);
        assert_eq!(release.features()[0].title, "Dark mode");
    }

    #[tokio::test]
    async fn test_link_feature_rejects_cross_tenant() {
        let fix = fixture();
        let release = fix.service.create_release(create_request(&fix)).await.unwrap();
        let feature_id = Uuid::new_v4();
        fix.features.insert(FeatureRecord {
            id: feature_id,
            title: "Dark mode".to_string(),
            workspace_id: Uuid::new_v4(),
        });

        let result = fix
            .service
            .link_feature(fix.workspace_id, release.id(), feature_id)
            .await;
        assert!(matches!(result, Err(ReleaseError::FeatureNotFound(_))));
    }

    #[tokio::test]
    async fn test_unlink_absent_feature_is_a_validation_failure() {
        let fix = fixture();
        let release = fix.service.create_release(create_request(&fix)).await.unwrap();

        let result = fix
            .service
            .unlink_feature(fix.workspace_id, release.id(), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(ReleaseError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_bug_fix_linking() {
        let fix = fixture();
        let release = fix.service.create_release(create_request(&fix)).await.unwrap();
        let bug_id = Uuid::new_v4();
        fix.bugs.insert(BugRecord {
            id: bug_id,
            title: "Crash on login".to_string(),
            workspace_id: fix.workspace_id,
        });

        let release = fix
            .service
            .link_bug_fix(fix.workspace_id, release.id(), bug_id)
            .await
            .unwrap();
        assert_eq!(release.bug_fixes().len(), 1);

        let release = fix
            .service
            .unlink_bug_fix(fix.workspace_id, release.id(), bug_id)
            .await
            .unwrap();
        assert!(release.bug_fixes().is_empty());
    }

    #[tokio::test]
    async fn test_approval_flow_through_service() {
        let fix = fixture();
        let release = fix.service.create_release(create_request(&fix)).await.unwrap();

        fix.service
            .request_approval(
                fix.workspace_id,
                release.id(),
                ApprovalRequest {
                    approvers: vec![
                        ApproverIdentity { user_id: "u1".to_string(), user_name: "Ana".to_string() },
                        ApproverIdentity { user_id: "u2".to_string(), user_name: "Ben".to_string() },
                    ],
                },
            )
            .await
            .unwrap();

        let release = fix
            .service
            .approve(
                fix.workspace_id,
                release.id(),
                ApprovalDecision { user_id: "u1".to_string(), comment: None },
            )
            .await
            .unwrap();
        assert_eq!(release.approval_status(), Some(ApprovalStatus::Pending));

        let release = fix
            .service
            .approve(
                fix.workspace_id,
                release.id(),
                ApprovalDecision { user_id: "u2".to_string(), comment: None },
            )
            .await
            .unwrap();
        assert_eq!(release.approval_status(), Some(ApprovalStatus::Approved));
    }

    #[tokio::test]
    async fn test_approve_by_non_approver_fails() {
        let fix = fixture();
        let release = fix.service.create_release(create_request(&fix)).await.unwrap();

        let result = fix
            .service
            .approve(
                fix.workspace_id,
                release.id(),
                ApprovalDecision { user_id: "ghost".to_string(), comment: None },
            )
            .await;
        assert!(matches!(result, Err(ReleaseError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_rollback_through_service() {
        let fix = fixture();
        let release = fix.service.create_release(create_request(&fix)).await.unwrap();
        fix.service
            .change_status(fix.workspace_id, release.id(), ReleaseStatus::Released)
            .await
            .unwrap();

        let release = fix
            .service
            .record_rollback(
                fix.workspace_id,
                release.id(),
                RollbackRequest {
                    target_version: "0.9.0".to_string(),
                    reason: "regression".to_string(),
                    rolled_back_by: "ops-user".to_string(),
                    notes: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(release.status(), ReleaseStatus::RolledBack);
        assert_eq!(release.rollback_logs().len(), 1);
    }

    #[tokio::test]
    async fn test_list_releases_filters_by_status() {
        let fix = fixture();
        let first = fix.service.create_release(create_request(&fix)).await.unwrap();
        fix.service.create_release(create_request(&fix)).await.unwrap();
        fix.service
            .change_status(fix.workspace_id, first.id(), ReleaseStatus::Testing)
            .await
            .unwrap();

        let mut query = ReleaseQuery::for_workspace(fix.workspace_id);
        query.status = Some(ReleaseStatus::Testing);
        let page = fix.service.list_releases(query).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.releases[0].id(), first.id());
    }

    #[tokio::test]
    async fn test_delete_release() {
        let fix = fixture();
        let release = fix.service.create_release(create_request(&fix)).await.unwrap();

        fix.service
            .delete_release(fix.workspace_id, release.id())
            .await
            .unwrap();

        let result = fix.service.get_release(fix.workspace_id, release.id()).await;
        assert!(matches!(result, Err(ReleaseError::NotFound(_))));
    }
}
