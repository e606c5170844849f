//! Trait describing menu sources and the errors they raise.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::MenuItem;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to a menu backend.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Metadata describing where a menu comes from.
pub struct SourceMeta {
    /// Short identifier used in logs.
    pub id: String,
    /// Human-friendly description, usually the endpoint.
    pub name: String,
}

#[async_trait]
/// Trait for backends publishing the restaurant menu.
pub trait MenuPort: Send + Sync {
    /// Metadata describing the backend.
    fn source(&self) -> &SourceMeta;

    /// Fetch the full menu.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend cannot be reached or answers garbage.
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, PortError>;
}
