//! In-memory port implementations
//!
//! Test doubles for the persistence ports, with the same conflict semantics
//! as the postgres adapters. Only compiled for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use slipway_core::domain::approval::ApprovalWorkflow;
use slipway_core::domain::release::Release;
use slipway_core::dto::release::{ReleasePage, ReleaseQuery, ReleaseSortField, SortOrder};
use slipway_core::ports::collaborators::{
    BugRecord, BugRepository, FeatureRecord, FeatureRepository, ProductRecord, ProductRepository,
};
use slipway_core::ports::{
    ApprovalWorkflowRepository, ReleaseRepository, RepositoryError, RepositoryResult,
};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryReleaseRepository {
    releases: Mutex<HashMap<Uuid, Release>>,
}

#[async_trait]
impl ReleaseRepository for InMemoryReleaseRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Release>> {
        Ok(self.releases.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(&self, query: &ReleaseQuery) -> RepositoryResult<ReleasePage> {
        let releases = self.releases.lock().unwrap();

        let mut matches: Vec<Release> = releases
            .values()
            .filter(|r| r.workspace_id() == query.workspace_id)
            .filter(|r| query.status.is_none_or(|s| r.status() == s))
            .filter(|r| query.product_id.is_none_or(|p| r.product_id() == p))
            .filter(|r| query.platform.as_deref().is_none_or(|p| r.platform() == p))
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match query.sort_by {
                ReleaseSortField::CreatedAt => a.created_at().cmp(&b.created_at()),
                ReleaseSortField::PlannedDate => a.planned_date().cmp(&b.planned_date()),
                ReleaseSortField::Version => a.version().cmp(b.version()),
            };
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matches.len() as u64;
        let releases = matches
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        Ok(ReleasePage { releases, total })
    }

    async fn save(&self, release: &Release) -> RepositoryResult<Release> {
        let mut releases = self.releases.lock().unwrap();

        let stored_revision = releases.get(&release.id()).map(|r| r.revision()).unwrap_or(0);
        if stored_revision != release.revision() {
            return Err(RepositoryError::Conflict);
        }

        let saved = release.at_revision(release.revision() + 1);
        releases.insert(saved.id(), saved.clone());
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        Ok(self.releases.lock().unwrap().remove(&id).is_some())
    }

    async fn exists(&self, id: Uuid) -> RepositoryResult<bool> {
        Ok(self.releases.lock().unwrap().contains_key(&id))
    }
}

#[derive(Default)]
pub struct InMemoryApprovalWorkflowRepository {
    workflows: Mutex<HashMap<Uuid, ApprovalWorkflow>>,
}

#[async_trait]
impl ApprovalWorkflowRepository for InMemoryApprovalWorkflowRepository {
    async fn find_by_feature_id(&self, feature_id: Uuid) -> RepositoryResult<Option<ApprovalWorkflow>> {
        Ok(self.workflows.lock().unwrap().get(&feature_id).cloned())
    }

    async fn save(&self, workflow: &ApprovalWorkflow) -> RepositoryResult<ApprovalWorkflow> {
        let mut workflows = self.workflows.lock().unwrap();

        let stored_revision = workflows
            .get(&workflow.feature_id())
            .map(|w| w.revision())
            .unwrap_or(0);
        if stored_revision != workflow.revision() {
            return Err(RepositoryError::Conflict);
        }

        let saved = workflow.at_revision(workflow.revision() + 1);
        workflows.insert(saved.feature_id(), saved.clone());
        Ok(saved)
    }

    async fn exists(&self, feature_id: Uuid) -> RepositoryResult<bool> {
        Ok(self.workflows.lock().unwrap().contains_key(&feature_id))
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<HashMap<Uuid, ProductRecord>>,
}

impl InMemoryProductRepository {
    pub fn insert(&self, record: ProductRecord) {
        self.products.lock().unwrap().insert(record.id, record);
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<ProductRecord>> {
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryFeatureRepository {
    features: Mutex<HashMap<Uuid, FeatureRecord>>,
}

impl InMemoryFeatureRepository {
    pub fn insert(&self, record: FeatureRecord) {
        self.features.lock().unwrap().insert(record.id, record);
    }
}

#[async_trait]
impl FeatureRepository for InMemoryFeatureRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<FeatureRecord>> {
        Ok(self.features.lock().unwrap().get(&id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryBugRepository {
    bugs: Mutex<HashMap<Uuid, BugRecord>>,
}

impl InMemoryBugRepository {
    pub fn insert(&self, record: BugRecord) {
        self.bugs.lock().unwrap().insert(record.id, record);
    }
}

#[async_trait]
impl BugRepository for InMemoryBugRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<BugRecord>> {
        Ok(self.bugs.lock().unwrap().get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slipway_core::domain::release::NewRelease;

    fn new_release(workspace_id: Uuid) -> Release {
        Release::create(NewRelease {
            version: "1.0.0".to_string(),
            build_id: "build-1".to_string(),
            product_id: Uuid::new_v4(),
            product_name: "Atlas".to_string(),
            platform: "ios".to_string(),
            workspace_id,
            planned_date: None,
            release_notes: None,
        })
    }

    #[tokio::test]
    async fn test_save_then_reload_round_trip() {
        let repo = InMemoryReleaseRepository::default();
        let mut release = new_release(Uuid::new_v4());
        release.start_stage(slipway_core::domain::pipeline::PipelineStage::Build);

        let saved = repo.save(&release).await.unwrap();
        assert_eq!(saved.revision(), 1);

        assert!(repo.exists(release.id()).await.unwrap());
        let loaded = repo.find_by_id(release.id()).await.unwrap().unwrap();
        assert_eq!(loaded.revision(), 1);
        assert_eq!(loaded.pipeline().len(), 6);
        assert_eq!(loaded.updated_at(), release.updated_at());
    }

    #[tokio::test]
    async fn test_stale_save_is_a_conflict() {
        let repo = InMemoryReleaseRepository::default();
        let release = new_release(Uuid::new_v4());

        let first = repo.save(&release).await.unwrap();
        let mut winner = first.clone();
        let mut loser = first;

        winner.set_status(slipway_core::domain::release::ReleaseStatus::Testing);
        repo.save(&winner).await.unwrap();

        loser.set_status(slipway_core::domain::release::ReleaseStatus::Staged);
        let result = repo.save(&loser).await;
        assert!(matches!(result, Err(RepositoryError::Conflict)));

        // The winner's write is intact.
        let stored = repo.find_by_id(winner.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), slipway_core::domain::release::ReleaseStatus::Testing);
    }

    #[tokio::test]
    async fn test_find_all_filters_and_pages() {
        let repo = InMemoryReleaseRepository::default();
        let workspace_id = Uuid::new_v4();

        for _ in 0..3 {
            repo.save(&new_release(workspace_id)).await.unwrap();
        }
        repo.save(&new_release(Uuid::new_v4())).await.unwrap();

        let mut query = ReleaseQuery::for_workspace(workspace_id);
        query.limit = 2;
        let page = repo.find_all(&query).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.releases.len(), 2);

        query.page = 2;
        let page = repo.find_all(&query).await.unwrap();
        assert_eq!(page.releases.len(), 1);
    }
}
