use async_trait::async_trait;
use tracing::{info, instrument};
use crate::app_system::SessionConfig;
use crate::clients::OrderClient;
use crate::domain::OrderSubmission;
use super::{GatewayError, OrderSubmitter};

/// [`OrderSubmitter`] that places orders through the order actor on behalf
/// of the session's vendor.
#[derive(Clone)]
pub struct SubmissionGateway {
    orders: OrderClient,
    session: SessionConfig,
}

impl SubmissionGateway {
    pub fn new(orders: OrderClient, session: SessionConfig) -> Self {
        Self { orders, session }
    }
}

#[async_trait]
impl OrderSubmitter for SubmissionGateway {
    #[instrument(name = "submit_order", skip(self, submission), fields(client_id = %submission.client_id))]
    async fn submit(&self, submission: &OrderSubmission) -> Result<(), GatewayError> {
        self.session.authorize()?;
        let order_id = self
            .orders
            .place_order(self.session.vendor_id.clone(), submission.clone())
            .await
            .map_err(|e| GatewayError::new(e.to_string()))?;
        info!(order_id = %order_id, "Order submitted");
        Ok(())
    }
}
