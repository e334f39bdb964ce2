use tracing::{error, info, instrument, warn};
use crate::actor_framework::ResourceClient;
use crate::clients::{ClientDirectory, ProductClient};
use crate::domain::{Order, OrderCreate, OrderItem, OrderSubmission};
use crate::order_actor::OrderError;

/// Totals within this distance are considered equal.
const TOTAL_TOLERANCE: f64 = 0.005;

/// Client for interacting with the Order actor.
///
/// This client handles the orchestration of placing an order: validating the
/// client and every product, reserving stock, and finally storing the order.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    client_directory: ClientDirectory,
    product_client: ProductClient,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        client_directory: ClientDirectory,
        product_client: ProductClient,
    ) -> Self {
        Self {
            inner,
            client_directory,
            product_client,
        }
    }

    #[instrument(
        skip(self, submission),
        fields(client_id = %submission.client_id, items = submission.items.len(), total = %submission.total)
    )]
    pub async fn place_order(&self, vendor_id: String, submission: OrderSubmission) -> Result<String, OrderError> {
        info!("Processing place_order request");

        if submission.items.is_empty() {
            return Err(OrderError::ValidationError("Order has no items".to_string()));
        }

        // Step 1: Validate client
        match self.client_directory.get_client(submission.client_id.clone()).await {
            Ok(Some(client)) => info!(client_name = %client.name, "Client validation successful"),
            Ok(None) => {
                error!("Client not found");
                return Err(OrderError::InvalidClient(submission.client_id.clone()));
            }
            Err(e) => {
                error!(error = %e, "Client validation failed");
                return Err(OrderError::InvalidClient(format!("Client validation failed: {}", e)));
            }
        }

        // Step 2: Validate products
        for item in &submission.items {
            match self.product_client.get_product(item.product_id.clone()).await {
                Ok(Some(product)) => info!(product_name = %product.name, "Product validation successful"),
                Ok(None) => {
                    error!(product_id = %item.product_id, "Product not found");
                    return Err(OrderError::InvalidProduct(item.product_id.clone()));
                }
                Err(e) => {
                    error!(error = %e, "Product validation failed");
                    return Err(OrderError::InvalidProduct(format!("Product validation failed: {}", e)));
                }
            }
        }

        // Step 3: Check the total against the lines
        let expected: f64 = submission
            .items
            .iter()
            .map(|item| item.unit_price * f64::from(item.quantity))
            .sum();
        if (expected - submission.total).abs() > TOTAL_TOLERANCE {
            error!(expected = %expected, "Total does not match lines");
            return Err(OrderError::ValidationError(format!(
                "Total {} does not match lines ({})",
                submission.total, expected
            )));
        }

        // Step 4: Reserve stock, releasing earlier reservations on failure
        let mut reserved: Vec<&OrderItem> = Vec::new();
        for item in &submission.items {
            if let Err(e) = self.product_client.reserve_stock(item.product_id.clone(), item.quantity).await {
                error!(error = %e, product_id = %item.product_id, "Stock reservation failed");
                self.release(&reserved).await;
                return Err(OrderError::InsufficientStock(format!("Stock reservation failed: {}", e)));
            }
            reserved.push(item);
        }

        info!("Stock reserved successfully");

        // Step 5: Create order in ResourceActor
        let params = OrderCreate {
            client_id: submission.client_id,
            vendor_id,
            items: submission.items.clone(),
            total: submission.total,
        };

        match self.inner.create(params).await {
            Ok(order_id) => {
                info!(order_id = %order_id, "Order placed");
                Ok(order_id)
            }
            Err(e) => {
                self.release(&reserved).await;
                Err(OrderError::ActorCommunicationError(e.to_string()))
            }
        }
    }

    async fn release(&self, items: &[&OrderItem]) {
        for item in items {
            if let Err(e) = self.product_client.release_stock(item.product_id.clone(), item.quantity).await {
                warn!(error = %e, product_id = %item.product_id, "Failed to release reserved stock");
            }
        }
    }
}

impl_client_methods!(OrderClient, Order, OrderError, order);
