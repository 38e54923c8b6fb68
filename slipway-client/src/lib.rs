//! Slipway HTTP Client
//!
//! A simple, type-safe HTTP client for the Slipway release-lifecycle API.
//!
//! # Example
//!
//! ```no_run
//! use slipway_client::SlipwayClient;
//! use slipway_core::dto::release::CreateRelease;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SlipwayClient::new("http://localhost:8080");
//!
//!     let release = client.create_release(CreateRelease {
//!         version: "1.4.0".to_string(),
//!         build_id: "build-2041".to_string(),
//!         product_id: Uuid::new_v4(),
//!         platform: "ios".to_string(),
//!         workspace_id: Uuid::new_v4(),
//!         planned_date: None,
//!         release_notes: None,
//!     }).await?;
//!
//!     println!("Created release: {}", release.id());
//!     Ok(())
//! }
//! ```

pub mod error;
mod approvals;
mod releases;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the Slipway server API
///
/// Methods are organized into logical groups:
/// - Release lifecycle (create, list, update, status, delete)
/// - Pipeline stage reporting (start, complete, retry)
/// - Rollback and work-item linking
/// - Release approval and gate workflows
#[derive(Debug, Clone)]
pub struct SlipwayClient {
    /// Base URL of the server (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl SlipwayClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the Slipway API (e.g., "http://localhost:8080")
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new client with a custom HTTP client, for configuring
    /// timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!("API request failed with status {}: {}", status, error_text);
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!("API request failed with status {}: {}", status, error_text);
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
