use async_trait::async_trait;
use tracing::{debug, instrument};
use crate::app_system::SessionConfig;
use crate::clients::ProductClient;
use crate::domain::Product;
use super::{GatewayError, ProductCatalog};

/// [`ProductCatalog`] backed by the product actor.
#[derive(Clone)]
pub struct CatalogGateway {
    products: ProductClient,
    session: SessionConfig,
}

impl CatalogGateway {
    pub fn new(products: ProductClient, session: SessionConfig) -> Self {
        Self { products, session }
    }
}

#[async_trait]
impl ProductCatalog for CatalogGateway {
    #[instrument(name = "catalog_fetch_all", skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Product>, GatewayError> {
        self.session.authorize()?;
        let products = self
            .products
            .list_products()
            .await
            .map_err(|e| GatewayError::new(e.to_string()))?;
        debug!(count = products.len(), "Catalog fetched");
        Ok(products)
    }

    #[instrument(name = "catalog_fetch_by_id", skip(self))]
    async fn fetch_by_id(&self, id: &str) -> Result<Product, GatewayError> {
        self.session.authorize()?;
        self.products
            .get_product(id.to_string())
            .await
            .map_err(|e| GatewayError::new(e.to_string()))?
            .ok_or_else(|| GatewayError::new(format!("Product not found: {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_framework::{create_mock_client, expect_get, expect_list};

    fn gateway(session: SessionConfig) -> (CatalogGateway, tokio::sync::mpsc::Receiver<crate::actor_framework::ResourceRequest<Product>>) {
        let (inner, receiver) = create_mock_client::<Product>(4);
        (CatalogGateway::new(ProductClient::new(inner), session), receiver)
    }

    #[tokio::test]
    async fn test_fetch_all_lists_products() {
        let (catalog, mut product_rx) = gateway(SessionConfig::new("vendor_1", "token"));

        let fetch = tokio::spawn(async move { catalog.fetch_all().await });

        let responder = expect_list(&mut product_rx).await.expect("Expected Product List");
        responder
            .send(Ok(vec![Product::new("p1", "Gauze", 10.0, 5), Product::new("p2", "Bandage", 4.0, 2)]))
            .unwrap();

        let products = fetch.await.unwrap().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].name, "Bandage");
    }

    #[tokio::test]
    async fn test_fetch_by_id_reports_missing_product() {
        let (catalog, mut product_rx) = gateway(SessionConfig::new("vendor_1", "token"));

        let fetch = tokio::spawn(async move { catalog.fetch_by_id("p9").await });

        let (id, responder) = expect_get(&mut product_rx).await.expect("Expected Product Get");
        assert_eq!(id, "p9");
        responder.send(Ok(None)).unwrap();

        assert_eq!(fetch.await.unwrap(), Err(GatewayError::new("Product not found: p9")));
    }

    #[tokio::test]
    async fn test_unauthenticated_session_sends_nothing() {
        let session = SessionConfig { auth_token: None, ..SessionConfig::new("vendor_1", "unused") };
        let (catalog, mut product_rx) = gateway(session);

        let err = catalog.fetch_all().await.unwrap_err();
        assert_eq!(err.message, "Session is not authenticated");

        drop(catalog);
        assert!(product_rx.recv().await.is_none());
    }
}
