//! Release aggregate
//!
//! A release tracks one deployable version of a product from planning to
//! production. It owns the deployment pipeline, the linked features and bug
//! fixes, the rollback ledger and the approver list, and is mutated only
//! through its own methods. Methods that can fail for expected reasons
//! (unknown approver, unlinked feature) return `false` and leave state
//! untouched; callers translate that into a labeled failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::pipeline::{PipelineStage, PipelineStep, StepStatus, canonical_pipeline};

/// Lifecycle status of a release.
///
/// Transitions are caller-driven and deliberately unconstrained; the one
/// exception is `rolled_back`, which is forced by the rollback ledger and
/// never left again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    Planning,
    InDevelopment,
    Testing,
    Staged,
    Released,
    RolledBack,
}

impl ReleaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseStatus::Planning => "planning",
            ReleaseStatus::InDevelopment => "in_development",
            ReleaseStatus::Testing => "testing",
            ReleaseStatus::Staged => "staged",
            ReleaseStatus::Released => "released",
            ReleaseStatus::RolledBack => "rolled_back",
        }
    }

    pub fn parse(s: &str) -> Option<ReleaseStatus> {
        match s {
            "planning" => Some(ReleaseStatus::Planning),
            "in_development" => Some(ReleaseStatus::InDevelopment),
            "testing" => Some(ReleaseStatus::Testing),
            "staged" => Some(ReleaseStatus::Staged),
            "released" => Some(ReleaseStatus::Released),
            "rolled_back" => Some(ReleaseStatus::RolledBack),
            _ => None,
        }
    }
}

/// Sign-off decision state, used both per approver and for the overall
/// release verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<ApprovalStatus> {
        match s {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }
}

/// A user asked to sign off on a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approver {
    pub user_id: String,
    pub user_name: String,
    pub status: ApprovalStatus,
    pub comment: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
}

/// Identity of a user, as supplied when requesting approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproverIdentity {
    pub user_id: String,
    pub user_name: String,
}

/// A feature shipped by a release. The title is denormalized from the
/// feature directory at link time and goes stale if the source is renamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedFeature {
    pub feature_id: Uuid,
    pub title: String,
}

/// A bug fix shipped by a release, denormalized like [`LinkedFeature`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedBugFix {
    pub bug_id: Uuid,
    pub title: String,
}

/// One entry of the append-only rollback ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackLog {
    pub id: Uuid,
    pub version: String,
    pub reason: String,
    pub rolled_back_at: DateTime<Utc>,
    pub rolled_back_by: String,
    pub notes: Option<String>,
}

/// Input for creating a brand-new release.
#[derive(Debug, Clone)]
pub struct NewRelease {
    pub version: String,
    pub build_id: String,
    pub product_id: Uuid,
    pub product_name: String,
    pub platform: String,
    pub workspace_id: Uuid,
    pub planned_date: Option<DateTime<Utc>>,
    pub release_notes: Option<String>,
}

/// Full persisted state of a release, as loaded from storage.
///
/// Only repositories should build one of these; everything else goes through
/// [`Release::create`] and the mutation methods.
#[derive(Debug, Clone)]
pub struct ReleaseParts {
    pub id: Uuid,
    pub version: String,
    pub build_id: String,
    pub product_id: Uuid,
    pub product_name: String,
    pub platform: String,
    pub status: ReleaseStatus,
    pub release_date: Option<DateTime<Utc>>,
    pub planned_date: Option<DateTime<Utc>>,
    pub features: Vec<LinkedFeature>,
    pub bug_fixes: Vec<LinkedBugFix>,
    pub test_coverage: f32,
    pub pipeline: Vec<PipelineStep>,
    pub rollback_logs: Vec<RollbackLog>,
    pub release_notes: Option<String>,
    pub approval_status: Option<ApprovalStatus>,
    pub approvers: Vec<Approver>,
    pub workspace_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: i64,
}

/// A deployable version of a product, tracked through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    id: Uuid,
    version: String,
    build_id: String,
    product_id: Uuid,
    product_name: String,
    platform: String,
    status: ReleaseStatus,
    release_date: Option<DateTime<Utc>>,
    planned_date: Option<DateTime<Utc>>,
    features: Vec<LinkedFeature>,
    bug_fixes: Vec<LinkedBugFix>,
    test_coverage: f32,
    pipeline: Vec<PipelineStep>,
    rollback_logs: Vec<RollbackLog>,
    release_notes: Option<String>,
    approval_status: Option<ApprovalStatus>,
    approvers: Vec<Approver>,
    workspace_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: i64,
}

impl Release {
    /// Create a new release in planning, with the full pipeline pre-populated
    /// as pending and no linked work, rollback history or approvers.
    pub fn create(input: NewRelease) -> Release {
        let now = Utc::now();

        Release {
            id: Uuid::new_v4(),
            version: input.version,
            build_id: input.build_id,
            product_id: input.product_id,
            product_name: input.product_name,
            platform: input.platform,
            status: ReleaseStatus::Planning,
            release_date: None,
            planned_date: input.planned_date,
            features: Vec::new(),
            bug_fixes: Vec::new(),
            test_coverage: 0.0,
            pipeline: canonical_pipeline(),
            rollback_logs: Vec::new(),
            release_notes: input.release_notes,
            approval_status: None,
            approvers: Vec::new(),
            workspace_id: input.workspace_id,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    /// Restore a release from persisted state.
    pub fn reconstitute(parts: ReleaseParts) -> Release {
        Release {
            id: parts.id,
            version: parts.version,
            build_id: parts.build_id,
            product_id: parts.product_id,
            product_name: parts.product_name,
            platform: parts.platform,
            status: parts.status,
            release_date: parts.release_date,
            planned_date: parts.planned_date,
            features: parts.features,
            bug_fixes: parts.bug_fixes,
            test_coverage: parts.test_coverage,
            pipeline: parts.pipeline,
            rollback_logs: parts.rollback_logs,
            release_notes: parts.release_notes,
            approval_status: parts.approval_status,
            approvers: parts.approvers,
            workspace_id: parts.workspace_id,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
            revision: parts.revision,
        }
    }

    /// Copy of this release at the given storage revision. Used by
    /// repositories after a successful save; not part of the domain surface.
    pub fn at_revision(&self, revision: i64) -> Release {
        let mut release = self.clone();
        release.revision = revision;
        release
    }

    // =========================================================================
    // Field updates
    // =========================================================================

    /// Partial metadata update. Absent fields are left untouched; present
    /// fields are taken as-is.
    pub fn apply_update(
        &mut self,
        version: Option<String>,
        build_id: Option<String>,
        planned_date: Option<DateTime<Utc>>,
        release_notes: Option<String>,
        test_coverage: Option<f32>,
    ) {
        if let Some(version) = version {
            self.version = version;
        }
        if let Some(build_id) = build_id {
            self.build_id = build_id;
        }
        if let Some(planned_date) = planned_date {
            self.planned_date = Some(planned_date);
        }
        if let Some(release_notes) = release_notes {
            self.release_notes = Some(release_notes);
        }
        if let Some(test_coverage) = test_coverage {
            self.test_coverage = test_coverage;
        }
        self.touch();
    }

    /// Overwrite the lifecycle status. No transition graph is enforced;
    /// entering `released` stamps the release date.
    pub fn set_status(&mut self, status: ReleaseStatus) {
        self.status = status;
        if status == ReleaseStatus::Released {
            self.release_date = Some(Utc::now());
        }
        self.touch();
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Mark a stage as running. Upstream stages are not checked; external
    /// tooling decides when a stage actually starts.
    pub fn start_stage(&mut self, stage: PipelineStage) -> bool {
        let Some(step) = self.pipeline.iter_mut().find(|s| s.stage == stage) else {
            return false;
        };

        step.status = StepStatus::Running;
        step.started_at = Some(Utc::now());
        self.touch();
        true
    }

    /// Record the outcome of a stage, appending captured logs if supplied.
    pub fn complete_stage(&mut self, stage: PipelineStage, success: bool, logs: Option<String>) -> bool {
        let Some(step) = self.pipeline.iter_mut().find(|s| s.stage == stage) else {
            return false;
        };

        step.status = if success { StepStatus::Passed } else { StepStatus::Failed };
        step.completed_at = Some(Utc::now());
        if let Some(logs) = logs {
            match &mut step.logs {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(&logs);
                }
                None => step.logs = Some(logs),
            }
        }
        self.touch();
        true
    }

    /// Reset a stage to pending so it can run again. Timestamps are cleared,
    /// logs from earlier attempts are retained.
    pub fn retry_stage(&mut self, stage: PipelineStage) -> bool {
        let Some(step) = self.pipeline.iter_mut().find(|s| s.stage == stage) else {
            return false;
        };

        step.status = StepStatus::Pending;
        step.started_at = None;
        step.completed_at = None;
        self.touch();
        true
    }

    // =========================================================================
    // Rollback ledger
    // =========================================================================

    /// Append a rollback entry and force the release into `rolled_back`.
    /// The ledger is append-only; there is no un-rollback.
    pub fn add_rollback_log(
        &mut self,
        target_version: String,
        reason: String,
        rolled_back_by: String,
        notes: Option<String>,
    ) {
        self.rollback_logs.push(RollbackLog {
            id: Uuid::new_v4(),
            version: target_version,
            reason,
            rolled_back_at: Utc::now(),
            rolled_back_by,
            notes,
        });
        self.status = ReleaseStatus::RolledBack;
        self.touch();
    }

    // =========================================================================
    // Feature / bug fix linking
    // =========================================================================

    /// Link a feature to this release. Linking an already-linked feature is
    /// a no-op; the stored title is whatever the caller resolved at link time.
    pub fn link_feature(&mut self, feature_id: Uuid, title: String) {
        if self.features.iter().any(|f| f.feature_id == feature_id) {
            return;
        }
        self.features.push(LinkedFeature { feature_id, title });
        self.touch();
    }

    /// Unlink a feature. Returns false, without mutating anything, when the
    /// feature was never linked.
    pub fn unlink_feature(&mut self, feature_id: Uuid) -> bool {
        let Some(pos) = self.features.iter().position(|f| f.feature_id == feature_id) else {
            return false;
        };
        self.features.remove(pos);
        self.touch();
        true
    }

    /// Link a bug fix, with the same set semantics as [`Release::link_feature`].
    pub fn link_bug_fix(&mut self, bug_id: Uuid, title: String) {
        if self.bug_fixes.iter().any(|b| b.bug_id == bug_id) {
            return;
        }
        self.bug_fixes.push(LinkedBugFix { bug_id, title });
        self.touch();
    }

    /// Unlink a bug fix. Returns false when the bug was never linked.
    pub fn unlink_bug_fix(&mut self, bug_id: Uuid) -> bool {
        let Some(pos) = self.bug_fixes.iter().position(|b| b.bug_id == bug_id) else {
            return false;
        };
        self.bug_fixes.remove(pos);
        self.touch();
        true
    }

    // =========================================================================
    // Approval
    // =========================================================================

    /// Replace the approver list wholesale with fresh pending entries.
    /// Destructive by design: any prior decisions are discarded.
    pub fn request_approval(&mut self, approvers: Vec<ApproverIdentity>) {
        self.approvers = approvers
            .into_iter()
            .map(|identity| Approver {
                user_id: identity.user_id,
                user_name: identity.user_name,
                status: ApprovalStatus::Pending,
                comment: None,
                approved_at: None,
            })
            .collect();
        self.approval_status = Some(ApprovalStatus::Pending);
        self.touch();
    }

    /// Record an approval. Returns false when the user is not an approver.
    /// The overall verdict becomes approved only once every approver agrees.
    pub fn approve(&mut self, user_id: &str, comment: Option<String>) -> bool {
        let Some(approver) = self.approvers.iter_mut().find(|a| a.user_id == user_id) else {
            return false;
        };

        approver.status = ApprovalStatus::Approved;
        approver.comment = comment;
        approver.approved_at = Some(Utc::now());

        if self.approvers.iter().all(|a| a.status == ApprovalStatus::Approved) {
            self.approval_status = Some(ApprovalStatus::Approved);
        }
        self.touch();
        true
    }

    /// Record a rejection. A single rejection settles the overall verdict
    /// immediately; the other approvers' state is irrelevant.
    pub fn reject(&mut self, user_id: &str, reason: String) -> bool {
        let Some(approver) = self.approvers.iter_mut().find(|a| a.user_id == user_id) else {
            return false;
        };

        approver.status = ApprovalStatus::Rejected;
        approver.comment = Some(reason);
        approver.approved_at = Some(Utc::now());

        self.approval_status = Some(ApprovalStatus::Rejected);
        self.touch();
        true
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    pub fn product_id(&self) -> Uuid {
        self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn status(&self) -> ReleaseStatus {
        self.status
    }

    pub fn release_date(&self) -> Option<DateTime<Utc>> {
        self.release_date
    }

    pub fn planned_date(&self) -> Option<DateTime<Utc>> {
        self.planned_date
    }

    pub fn features(&self) -> &[LinkedFeature] {
        &self.features
    }

    pub fn bug_fixes(&self) -> &[LinkedBugFix] {
        &self.bug_fixes
    }

    pub fn test_coverage(&self) -> f32 {
        self.test_coverage
    }

    pub fn pipeline(&self) -> &[PipelineStep] {
        &self.pipeline
    }

    /// The pipeline step for a stage. Present for every canonical stage on
    /// any release built through [`Release::create`].
    pub fn step(&self, stage: PipelineStage) -> Option<&PipelineStep> {
        self.pipeline.iter().find(|s| s.stage == stage)
    }

    pub fn rollback_logs(&self) -> &[RollbackLog] {
        &self.rollback_logs
    }

    pub fn release_notes(&self) -> Option<&str> {
        self.release_notes.as_deref()
    }

    pub fn approval_status(&self) -> Option<ApprovalStatus> {
        self.approval_status
    }

    pub fn approvers(&self) -> &[Approver] {
        &self.approvers
    }

    pub fn workspace_id(&self) -> Uuid {
        self.workspace_id
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

#[cfg(test)]
mod tests {
    use super::*;

    fn new_release() -> Release {
        Release::create(NewRelease {
            version: "1.0.0".to_string(),
            build_id: "build-2041".to_string(),
            product_id: Uuid::new_v4(),
            product_name: "Atlas".to_string(),
            platform: "ios".to_string(),
            workspace_id: Uuid::new_v4(),
            planned_date: None,
            release_notes: None,
        })
    }

    fn identity(user_id: &str, user_name: &str) -> ApproverIdentity {
        ApproverIdentity {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
        }
    }

    #[test]
    fn test_create_initial_state() {
        let release = new_release();

        assert_eq!(release.status(), ReleaseStatus::Planning);
        assert_eq!(release.pipeline().len(), 6);
        assert!(release.pipeline().iter().all(|s| s.status == StepStatus::Pending));
        assert!(release.features().is_empty());
        assert!(release.bug_fixes().is_empty());
        assert!(release.rollback_logs().is_empty());
        assert!(release.approvers().is_empty());
        assert!(release.approval_status().is_none());
        assert!(release.release_date().is_none());
    }

    #[test]
    fn test_build_stage_passes() {
        let mut release = new_release();

        assert!(release.start_stage(PipelineStage::Build));
        assert!(release.complete_stage(PipelineStage::Build, true, None));

        let step = &release.pipeline()[0];
        assert_eq!(step.stage, PipelineStage::Build);
        assert_eq!(step.status, StepStatus::Passed);
        assert!(step.started_at.is_some());
        assert!(step.completed_at.is_some());
    }

    #[test]
    fn test_failed_stage_retry_resets_but_keeps_logs() {
        let mut release = new_release();

        release.start_stage(PipelineStage::UnitTests);
        release.complete_stage(PipelineStage::UnitTests, false, Some("2 assertions failed".to_string()));

        let step = release.step(PipelineStage::UnitTests).unwrap();
        assert_eq!(step.status, StepStatus::Failed);

        assert!(release.retry_stage(PipelineStage::UnitTests));
        let step = release.step(PipelineStage::UnitTests).unwrap();
        assert_eq!(step.status, StepStatus::Pending);
        assert!(step.started_at.is_none());
        assert!(step.completed_at.is_none());
        assert_eq!(step.logs.as_deref(), Some("2 assertions failed"));
    }

    #[test]
    fn test_complete_stage_appends_logs() {
        let mut release = new_release();

        release.complete_stage(PipelineStage::Build, false, Some("attempt 1".to_string()));
        release.retry_stage(PipelineStage::Build);
        release.complete_stage(PipelineStage::Build, true, Some("attempt 2".to_string()));

        let step = release.step(PipelineStage::Build).unwrap();
        assert_eq!(step.logs.as_deref(), Some("attempt 1\nattempt 2"));
    }

    #[test]
    fn test_set_status_released_stamps_date() {
        let mut release = new_release();

        release.set_status(ReleaseStatus::Released);
        assert_eq!(release.status(), ReleaseStatus::Released);
        assert!(release.release_date().is_some());
    }

    #[test]
    fn test_set_status_is_unconstrained() {
        // Pinned behavior: no transition graph, any jump is accepted.
        let mut release = new_release();

        release.set_status(ReleaseStatus::Released);
        release.set_status(ReleaseStatus::Planning);
        assert_eq!(release.status(), ReleaseStatus::Planning);
    }

    #[test]
    fn test_rollback_forces_status_and_appends() {
        let mut release = new_release();
        release.set_status(ReleaseStatus::Released);

        release.add_rollback_log(
            "0.9.0".to_string(),
            "regression".to_string(),
            "ops-user".to_string(),
            None,
        );

        assert_eq!(release.status(), ReleaseStatus::RolledBack);
        assert_eq!(release.rollback_logs().len(), 1);
        assert_eq!(release.rollback_logs()[0].version, "0.9.0");
        assert_eq!(release.rollback_logs()[0].rolled_back_by, "ops-user");

        // Ledger only grows; status stays rolled back.
        release.add_rollback_log(
            "0.8.0".to_string(),
            "second regression".to_string(),
            "ops-user".to_string(),
            Some("escalated".to_string()),
        );
        assert_eq!(release.rollback_logs().len(), 2);
        assert_eq!(release.status(), ReleaseStatus::RolledBack);
    }

    #[test]
    fn test_link_feature_is_idempotent() {
        let mut release = new_release();
        let feature_id = Uuid::new_v4();

        release.link_feature(feature_id, "Dark mode".to_string());
        release.link_feature(feature_id, "Dark mode".to_string());

        assert_eq!(release.features().len(), 1);
    }

    #[test]
    fn test_unlink_absent_feature_fails_without_mutation() {
        let mut release = new_release();
        release.link_feature(Uuid::new_v4(), "Dark mode".to_string());

        assert!(!release.unlink_feature(Uuid::new_v4()));
        assert_eq!(release.features().len(), 1);
    }

    #[test]
    fn test_bug_fix_linking_mirrors_features() {
        let mut release = new_release();
        let bug_id = Uuid::new_v4();

        release.link_bug_fix(bug_id, "Crash on login".to_string());
        release.link_bug_fix(bug_id, "Crash on login".to_string());
        assert_eq!(release.bug_fixes().len(), 1);

        assert!(release.unlink_bug_fix(bug_id));
        assert!(!release.unlink_bug_fix(bug_id));
        assert!(release.bug_fixes().is_empty());
    }

    #[test]
    fn test_unanimous_approval() {
        let mut release = new_release();
        release.request_approval(vec![identity("u1", "Ana"), identity("u2", "Ben")]);

        assert!(release.approve("u1", None));
        assert_eq!(release.approval_status(), Some(ApprovalStatus::Pending));

        assert!(release.approve("u2", Some("lgtm".to_string())));
        assert_eq!(release.approval_status(), Some(ApprovalStatus::Approved));
        assert!(release.approvers().iter().all(|a| a.approved_at.is_some()));
    }

    #[test]
    fn test_single_rejection_settles_verdict() {
        let mut release = new_release();
        release.request_approval(vec![identity("u1", "Ana"), identity("u2", "Ben")]);

        assert!(release.reject("u1", "coverage regressed".to_string()));
        assert_eq!(release.approval_status(), Some(ApprovalStatus::Rejected));
        // u2 never voted.
        assert_eq!(release.approvers()[1].status, ApprovalStatus::Pending);
    }

    #[test]
    fn test_approve_unknown_user_fails() {
        let mut release = new_release();
        release.request_approval(vec![identity("u1", "Ana")]);

        assert!(!release.approve("ghost", None));
        assert!(!release.reject("ghost", "nope".to_string()));
        assert_eq!(release.approval_status(), Some(ApprovalStatus::Pending));
    }

    #[test]
    fn test_request_approval_replaces_wholesale() {
        // Pinned behavior: a second request discards prior decisions.
        let mut release = new_release();
        release.request_approval(vec![identity("u1", "Ana"), identity("u2", "Ben")]);
        release.approve("u1", None);

        release.request_approval(vec![identity("u2", "Ben"), identity("u3", "Cleo")]);

        assert_eq!(release.approvers().len(), 2);
        assert!(release.approvers().iter().all(|a| a.status == ApprovalStatus::Pending));
        assert_eq!(release.approval_status(), Some(ApprovalStatus::Pending));
        assert!(!release.approve("u1", None));
    }

    #[test]
    fn test_apply_update_partial() {
        let mut release = new_release();

        release.apply_update(Some("1.0.1".to_string()), None, None, Some("hotfix".to_string()), Some(83.5));

        assert_eq!(release.version(), "1.0.1");
        assert_eq!(release.build_id(), "build-2041");
        assert_eq!(release.release_notes(), Some("hotfix"));
        assert_eq!(release.test_coverage(), 83.5);
    }

    #[test]
    fn test_mutations_stamp_updated_at() {
        let mut release = new_release();
        let initial = release.updated_at();

        release.link_feature(Uuid::new_v4(), "Dark mode".to_string());
        assert!(release.updated_at() >= initial);

        let after_link = release.updated_at();
        release.set_status(ReleaseStatus::Testing);
        assert!(release.updated_at() >= after_link);
    }

    #[test]
    fn test_reconstitute_round_trip() {
        let mut release = new_release();
        release.start_stage(PipelineStage::Build);
        release.complete_stage(PipelineStage::Build, true, Some("ok".to_string()));
        release.link_feature(Uuid::new_v4(), "Dark mode".to_string());
        release.request_approval(vec![identity("u1", "Ana")]);
        release.add_rollback_log("0.9.0".to_string(), "regression".to_string(), "ops".to_string(), None);

        let parts = ReleaseParts {
            id: release.id(),
            version: release.version().to_string(),
            build_id: release.build_id().to_string(),
            product_id: release.product_id(),
            product_name: release.product_name().to_string(),
            platform: release.platform().to_string(),
            status: release.status(),
            release_date: release.release_date(),
            planned_date: release.planned_date(),
            features: release.features().to_vec(),
            bug_fixes: release.bug_fixes().to_vec(),
            test_coverage: release.test_coverage(),
            pipeline: release.pipeline().to_vec(),
            rollback_logs: release.rollback_logs().to_vec(),
            release_notes: release.release_notes().map(str::to_string),
            approval_status: release.approval_status(),
            approvers: release.approvers().to_vec(),
            workspace_id: release.workspace_id(),
            created_at: release.created_at(),
            updated_at: release.updated_at(),
            revision: release.revision(),
        };
        let restored = Release::reconstitute(parts);

        assert_eq!(restored.id(), release.id());
        assert_eq!(restored.status(), ReleaseStatus::RolledBack);
        assert_eq!(restored.pipeline().len(), 6);
        assert_eq!(restored.step(PipelineStage::Build).unwrap().status, StepStatus::Passed);
        assert_eq!(restored.features().len(), 1);
        assert_eq!(restored.rollback_logs().len(), 1);
        assert_eq!(restored.approvers().len(), 1);
        assert_eq!(restored.updated_at(), release.updated_at());
    }
}
