//! Deployment pipeline types
//!
//! Every release owns exactly one pipeline: the six canonical stages in fixed
//! order, created together with the release and never resized. Stage results
//! are reported by external CI tooling; Slipway only records them.

use serde::{Deserialize, Serialize};

/// Canonical deployment stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Build,
    UnitTests,
    IntegrationTests,
    SecurityScan,
    StagingDeploy,
    ProductionDeploy,
}

impl PipelineStage {
    /// All stages in canonical order.
    pub const ALL: [PipelineStage; 6] = [
        PipelineStage::Build,
        PipelineStage::UnitTests,
        PipelineStage::IntegrationTests,
        PipelineStage::SecurityScan,
        PipelineStage::StagingDeploy,
        PipelineStage::ProductionDeploy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Build => "build",
            PipelineStage::UnitTests => "unit_tests",
            PipelineStage::IntegrationTests => "integration_tests",
            PipelineStage::SecurityScan => "security_scan",
            PipelineStage::StagingDeploy => "staging_deploy",
            PipelineStage::ProductionDeploy => "production_deploy",
        }
    }

    pub fn parse(s: &str) -> Option<PipelineStage> {
        match s {
            "build" => Some(PipelineStage::Build),
            "unit_tests" => Some(PipelineStage::UnitTests),
            "integration_tests" => Some(PipelineStage::IntegrationTests),
            "security_scan" => Some(PipelineStage::SecurityScan),
            "staging_deploy" => Some(PipelineStage::StagingDeploy),
            "production_deploy" => Some(PipelineStage::ProductionDeploy),
            _ => None,
        }
    }
}

/// Execution status of a single pipeline step.
///
/// Transitions per stage, independent of sibling stages:
/// pending -> running -> {passed, failed}; a retry resets to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Passed,
    Failed,
    Skipped,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Passed => "passed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        }
    }
}

/// One step of a release pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStep {
    pub stage: PipelineStage,
    pub status: StepStatus,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub logs: Option<String>,
}

impl PipelineStep {
    /// A fresh, never-run step for the given stage.
    pub fn initial(stage: PipelineStage) -> Self {
        Self {
            stage,
            status: StepStatus::Pending,
            started_at: None,
            completed_at: None,
            logs: None,
        }
    }
}

/// Build the canonical six-step pipeline, every step pending.
pub fn canonical_pipeline() -> Vec<PipelineStep> {
    PipelineStage::ALL.into_iter().map(PipelineStep::initial).collect()
}
