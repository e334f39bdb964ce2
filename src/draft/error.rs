use thiserror::Error;
use super::DraftPhase;

/// Errors reported by a draft session.
///
/// None of these are fatal: the session stays usable after every one of them
/// except `SessionClosed` and `ServiceUnavailable`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DraftError {
    #[error("Could not load products: {0}")]
    CatalogLoad(String),
    #[error("Product already in draft: {0}")]
    DuplicateProduct(String),
    #[error("Product not in draft: {0}")]
    LineNotFound(String),
    #[error("Product unavailable: {0}")]
    ProductUnavailable(String),
    #[error("{0}")]
    Submission(String),
    #[error("A submission is already in progress")]
    SubmissionInProgress,
    #[error("Cannot {action} while {phase}")]
    InvalidPhase { action: &'static str, phase: DraftPhase },
    #[error("Order session is closed")]
    SessionClosed,
    #[error("Draft service unavailable: {0}")]
    ServiceUnavailable(String),
}
