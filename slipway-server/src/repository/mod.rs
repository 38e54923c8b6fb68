//! Repository Module
//!
//! Storage adapters implementing the persistence ports from slipway-core.
//! Each adapter handles database operations for a specific aggregate.

pub mod approval;
pub mod collaborators;
pub mod release;

#[cfg(test)]
pub mod memory;

use slipway_core::ports::RepositoryError;

/// Carry a driver error across the port boundary as text.
pub(crate) fn storage_error(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(err.to_string())
}
