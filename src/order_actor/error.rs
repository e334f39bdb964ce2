use thiserror::Error;

/// Errors that can occur while placing an order with the backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Invalid client: {0}")]
    InvalidClient(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
