//! Boundaries between a draft session and the services it depends on.
//!
//! The draft engine only sees these traits; [`CatalogGateway`] and
//! [`SubmissionGateway`] adapt the in-process backend to them.

mod catalog;
mod submission;

pub use catalog::*;
pub use submission::*;

use async_trait::async_trait;
use thiserror::Error;
use crate::domain::{OrderSubmission, Product};

/// Opaque gateway failure carrying a human-readable message.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Source of the products a draft can be built from.
#[async_trait]
pub trait ProductCatalog: Send + Sync + 'static {
    async fn fetch_all(&self) -> Result<Vec<Product>, GatewayError>;
    async fn fetch_by_id(&self, id: &str) -> Result<Product, GatewayError>;
}

/// Destination of finalized drafts.
#[async_trait]
pub trait OrderSubmitter: Send + Sync + 'static {
    async fn submit(&self, submission: &OrderSubmission) -> Result<(), GatewayError>;
}
