use tokio::sync::oneshot;
use crate::domain::Product;
use crate::gateway::GatewayError;
use super::{DraftError, DraftSnapshot};

pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// The closed set of intents a draft session accepts. Each variant carries
/// its parameters and a oneshot channel for the response.
#[derive(Debug)]
pub enum DraftRequest {
    LoadCatalog {
        respond_to: ServiceResponse<Vec<Product>, DraftError>,
    },
    SelectProduct {
        product: Product,
        respond_to: ServiceResponse<DraftSnapshot, DraftError>,
    },
    SelectProductById {
        product_id: String,
        respond_to: ServiceResponse<DraftSnapshot, DraftError>,
    },
    IncreaseQuantity {
        product_id: String,
        respond_to: ServiceResponse<DraftSnapshot, DraftError>,
    },
    DecreaseQuantity {
        product_id: String,
        respond_to: ServiceResponse<DraftSnapshot, DraftError>,
    },
    ClosePicker {
        respond_to: ServiceResponse<DraftSnapshot, DraftError>,
    },
    DismissError {
        respond_to: ServiceResponse<DraftSnapshot, DraftError>,
    },
    EnterConfirmation {
        respond_to: ServiceResponse<DraftSnapshot, DraftError>,
    },
    ExitConfirmation {
        respond_to: ServiceResponse<DraftSnapshot, DraftError>,
    },
    Submit {
        respond_to: ServiceResponse<(), DraftError>,
    },
    GetSnapshot {
        respond_to: ServiceResponse<DraftSnapshot, DraftError>,
    },
    Discard {
        respond_to: ServiceResponse<(), DraftError>,
    },
}

/// Sent back to the session by the task that ran a submission.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub result: Result<(), GatewayError>,
    pub respond_to: ServiceResponse<(), DraftError>,
}
