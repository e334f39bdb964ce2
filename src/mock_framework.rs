//! # Mock Framework
//!
//! Utilities for testing clients and draft sessions in isolation.
//!
//! Use [`create_mock_client`] to get a resource client and a receiver, then
//! helpers like [`expect_get`] or [`expect_action`] to assert requests and
//! answer them. For draft sessions, [`StaticCatalog`] answers catalog calls
//! from a fixed list and [`create_mock_submitter`] hands every submission to
//! the test, which decides when and how it completes.

use std::collections::VecDeque;
use std::sync::Mutex;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::domain::{OrderSubmission, Product};
use crate::gateway::{GatewayError, OrderSubmitter, ProductCatalog};

/// Creates a mock client and a receiver for asserting requests.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<oneshot::Sender<Result<Vec<T>, FrameworkError>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, oneshot::Sender<Result<T::ActionResult, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

// =============================================================================
// Gateway mocks
// =============================================================================

/// Catalog answering from a fixed product list. Queued failures are returned
/// first, one per call.
pub struct StaticCatalog {
    products: Vec<Product>,
    failures: Mutex<VecDeque<GatewayError>>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            failures: Mutex::new(VecDeque::new()),
        }
    }

    pub fn fail_next(self, message: &str) -> Self {
        self.failures.lock().unwrap().push_back(GatewayError::new(message));
        self
    }

    fn next_failure(&self) -> Option<GatewayError> {
        self.failures.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl ProductCatalog for StaticCatalog {
    async fn fetch_all(&self) -> Result<Vec<Product>, GatewayError> {
        match self.next_failure() {
            Some(e) => Err(e),
            None => Ok(self.products.clone()),
        }
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Product, GatewayError> {
        if let Some(e) = self.next_failure() {
            return Err(e);
        }
        self.products
            .iter()
            .find(|product| product.id == id)
            .cloned()
            .ok_or_else(|| GatewayError::new(format!("Product not found: {}", id)))
    }
}

pub type PendingSubmission = (OrderSubmission, oneshot::Sender<Result<(), GatewayError>>);

/// Submitter that forwards every submission to the test.
pub struct MockSubmitter {
    sender: mpsc::Sender<PendingSubmission>,
}

#[async_trait]
impl OrderSubmitter for MockSubmitter {
    async fn submit(&self, submission: &OrderSubmission) -> Result<(), GatewayError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send((submission.clone(), respond_to))
            .await
            .map_err(|_| GatewayError::new("Mock submitter closed"))?;
        response.await.map_err(|_| GatewayError::new("Mock submitter dropped"))?
    }
}

pub fn create_mock_submitter(buffer_size: usize) -> (MockSubmitter, mpsc::Receiver<PendingSubmission>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MockSubmitter { sender }, receiver)
}

/// Waits for the next submission reaching the gateway.
pub async fn expect_submission(receiver: &mut mpsc::Receiver<PendingSubmission>) -> Option<PendingSubmission> {
    receiver.recv().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Client, ClientCreate};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Client>(10);

        let create_task = tokio::spawn(async move {
            let params = ClientCreate { name: "Test".to_string(), email: "test@example.com".to_string() };
            client.create(params).await
        });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.name, "Test");
        responder.send(Ok("client_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("client_1".to_string()));
    }

    #[tokio::test]
    async fn test_static_catalog_failures_come_first() {
        let catalog = StaticCatalog::new(vec![Product::new("p1", "Gauze", 1.0, 1)]).fail_next("down");
        assert_eq!(catalog.fetch_all().await, Err(GatewayError::new("down")));
        assert_eq!(catalog.fetch_all().await.map(|p| p.len()), Ok(1));
        assert!(catalog.fetch_by_id("p9").await.is_err());
    }
}
