//! Persistence ports
//!
//! Repository interfaces consumed by the use-case layer and implemented by
//! the storage adapters in the server crate. Services receive them by
//! constructor injection; nothing in the core touches a database directly.

pub mod approval;
pub mod collaborators;
pub mod release;

pub use approval::ApprovalWorkflowRepository;
pub use collaborators::{
    BugRecord, BugRepository, FeatureRecord, FeatureRepository, ProductRecord, ProductRepository,
};
pub use release::ReleaseRepository;

use thiserror::Error;

/// Errors surfaced by persistence adapters.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Optimistic-lock failure: the aggregate changed under us between load
    /// and save. The caller's in-memory mutation is discarded.
    #[error("concurrent modification detected")]
    Conflict,

    /// Any other storage-layer failure, carried as text so the core stays
    /// free of driver types.
    #[error("storage error: {0}")]
    Storage(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
