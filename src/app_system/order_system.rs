use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, instrument};
use crate::actor_framework::ResourceActor;
use crate::client_actor::ClientError;
use crate::clients::{ClientDirectory, OrderClient, ProductClient};
use crate::domain::{Client, Order, Product};
use crate::draft::{DraftClient, DraftService};
use crate::gateway::{CatalogGateway, OrderSubmitter, ProductCatalog, SubmissionGateway};
use super::SessionConfig;

fn id_generator(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

/// The main application system that orchestrates all actors.
///
/// Starts the backend actors, wires the gateways with the session config,
/// and opens draft sessions on request.
pub struct OrderSystem {
    pub product_client: ProductClient,
    pub client_directory: ClientDirectory,
    pub order_client: OrderClient,
    session: SessionConfig,
    catalog: Arc<dyn ProductCatalog>,
    submitter: Arc<dyn OrderSubmitter>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Create and start the backend actors.
    ///
    /// **Startup Order:**
    /// 1. Product and client actors (no dependencies)
    /// 2. Order actor, whose client orchestrates the other two
    /// 3. Gateways over those clients, carrying the session config
    #[instrument(name = "order_system", skip(session), fields(vendor_id = %session.vendor_id))]
    pub fn new(session: SessionConfig) -> Self {
        info!("Starting order system");
        let buffer = session.channel_buffer;

        let (product_actor, product_resource_client) = ResourceActor::<Product>::new(buffer, id_generator("product"));
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        let (client_actor, client_resource_client) = ResourceActor::<Client>::new(buffer, id_generator("client"));
        let client_directory = ClientDirectory::new(client_resource_client);
        let client_handle = tokio::spawn(client_actor.run());

        let (order_actor, order_resource_client) = ResourceActor::<Order>::new(buffer, id_generator("order"));
        let order_client = OrderClient::new(order_resource_client, client_directory.clone(), product_client.clone());
        let order_handle = tokio::spawn(order_actor.run());

        let catalog: Arc<dyn ProductCatalog> = Arc::new(CatalogGateway::new(product_client.clone(), session.clone()));
        let submitter: Arc<dyn OrderSubmitter> = Arc::new(SubmissionGateway::new(order_client.clone(), session.clone()));

        info!("Order system started successfully");

        Self {
            product_client,
            client_directory,
            order_client,
            session,
            catalog,
            submitter,
            handles: vec![product_handle, client_handle, order_handle],
        }
    }

    /// Opens a draft session for `client_id`.
    ///
    /// The session actor runs until it is discarded or every handle to it is
    /// dropped; it is not tied to the system's shutdown.
    #[instrument(skip(self))]
    pub async fn start_order(&self, client_id: String) -> Result<DraftClient, ClientError> {
        let client = self.client_directory.require_client(client_id).await?;
        info!(client_name = %client.name, "Opening order draft");

        let (service, draft) = DraftService::new(
            self.session.channel_buffer,
            client,
            Arc::clone(&self.catalog),
            Arc::clone(&self.submitter),
        );
        tokio::spawn(service.run());
        Ok(draft)
    }

    /// Drops the backend clients, which closes the actor channels, and waits
    /// for the actors to stop.
    ///
    /// Open draft sessions keep the gateways alive; finish or drop them first.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        // The gateways hold clones of the backend clients too.
        drop(self.catalog);
        drop(self.submitter);
        drop(self.order_client);
        drop(self.client_directory);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
