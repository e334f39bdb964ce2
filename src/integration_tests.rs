#[cfg(test)]
mod tests {
    use crate::app_system::{OrderSystem, SessionConfig};
    use crate::client_actor::ClientError;
    use crate::clients::{ClientDirectory, OrderClient, ProductClient};
    use crate::domain::{Client, Order, OrderItem, OrderStatus, OrderSubmission, Product, ProductCreate};
    use crate::draft::{DraftError, DraftPhase};
    use crate::mock_framework::{create_mock_client, expect_action, expect_create, expect_get};
    use crate::order_actor::OrderError;
    use crate::product_actor::{ProductAction, ProductActionResult};

    fn mocked_order_client() -> (
        OrderClient,
        tokio::sync::mpsc::Receiver<crate::actor_framework::ResourceRequest<Client>>,
        tokio::sync::mpsc::Receiver<crate::actor_framework::ResourceRequest<Product>>,
        tokio::sync::mpsc::Receiver<crate::actor_framework::ResourceRequest<Order>>,
    ) {
        let (client_inner, client_rx) = create_mock_client::<Client>(10);
        let (product_inner, product_rx) = create_mock_client::<Product>(10);
        let (order_inner, order_rx) = create_mock_client::<Order>(10);

        let client_directory = ClientDirectory::new(client_inner);
        let product_client = ProductClient::new(product_inner);
        let order_client = OrderClient::new(order_inner, client_directory, product_client);
        (order_client, client_rx, product_rx, order_rx)
    }

    fn submission() -> OrderSubmission {
        OrderSubmission {
            client_id: "client_1".into(),
            items: vec![
                OrderItem { product_id: "product_1".into(), quantity: 2, unit_price: 10.0 },
                OrderItem { product_id: "product_2".into(), quantity: 1, unit_price: 4.0 },
            ],
            total: 24.0,
        }
    }

    #[tokio::test]
    async fn test_place_order_flow() {
        let (order_client, mut client_rx, mut product_rx, mut order_rx) = mocked_order_client();

        let order_task = tokio::spawn(async move { order_client.place_order("vendor_1".into(), submission()).await });

        // Client lookup
        let (client_id, responder) = expect_get(&mut client_rx).await.expect("Expected Client Get");
        assert_eq!(client_id, "client_1");
        responder.send(Ok(Some(Client::new("Clinica Norte", "compras@norte.test")))).unwrap();

        // Product lookups, in line order
        for (id, name) in [("product_1", "Gauze"), ("product_2", "Bandage")] {
            let (product_id, responder) = expect_get(&mut product_rx).await.expect("Expected Product Get");
            assert_eq!(product_id, id);
            responder.send(Ok(Some(Product::new(id, name, 1.0, 10)))).unwrap();
        }

        // Stock reservations
        for (id, qty) in [("product_1", 2), ("product_2", 1)] {
            let (product_id, action, responder) = expect_action(&mut product_rx).await.expect("Expected Product Action");
            assert_eq!(product_id, id);
            match action {
                ProductAction::ReserveStock(requested) => assert_eq!(requested, qty),
                other => panic!("Unexpected action: {:?}", other),
            }
            responder.send(Ok(ProductActionResult::ReserveStock(10 - qty))).unwrap();
        }

        // Order creation
        let (params, responder) = expect_create(&mut order_rx).await.expect("Expected Order Create");
        assert_eq!(params.client_id, "client_1");
        assert_eq!(params.vendor_id, "vendor_1");
        assert_eq!(params.items.len(), 2);
        assert_eq!(params.total, 24.0);
        responder.send(Ok("order_1".to_string())).unwrap();

        assert_eq!(order_task.await.unwrap(), Ok("order_1".to_string()));
    }

    #[tokio::test]
    async fn test_failed_reservation_releases_earlier_lines() {
        let (order_client, mut client_rx, mut product_rx, _order_rx) = mocked_order_client();

        let order_task = tokio::spawn(async move { order_client.place_order("vendor_1".into(), submission()).await });

        let (_, responder) = expect_get(&mut client_rx).await.expect("Expected Client Get");
        responder.send(Ok(Some(Client::new("Clinica Norte", "compras@norte.test")))).unwrap();
        for id in ["product_1", "product_2"] {
            let (_, responder) = expect_get(&mut product_rx).await.expect("Expected Product Get");
            responder.send(Ok(Some(Product::new(id, "Item", 1.0, 10)))).unwrap();
        }

        let (_, _, responder) = expect_action(&mut product_rx).await.expect("Expected first reservation");
        responder.send(Ok(ProductActionResult::ReserveStock(8))).unwrap();

        let (_, _, responder) = expect_action(&mut product_rx).await.expect("Expected second reservation");
        responder
            .send(Err(crate::actor_framework::FrameworkError::Rejected("Insufficient stock".into())))
            .unwrap();

        let (product_id, action, responder) = expect_action(&mut product_rx).await.expect("Expected release");
        assert_eq!(product_id, "product_1");
        assert!(matches!(action, ProductAction::ReleaseStock(2)));
        responder.send(Ok(ProductActionResult::ReleaseStock(10))).unwrap();

        let result = order_task.await.unwrap();
        assert!(matches!(result, Err(OrderError::InsufficientStock(_))));
    }

    #[tokio::test]
    async fn test_mismatched_total_is_rejected() {
        let (order_client, mut client_rx, mut product_rx, _order_rx) = mocked_order_client();
        let mut bad = submission();
        bad.total = 99.0;

        let order_task = tokio::spawn(async move { order_client.place_order("vendor_1".into(), bad).await });

        let (_, responder) = expect_get(&mut client_rx).await.expect("Expected Client Get");
        responder.send(Ok(Some(Client::new("Clinica Norte", "compras@norte.test")))).unwrap();
        for id in ["product_1", "product_2"] {
            let (_, responder) = expect_get(&mut product_rx).await.expect("Expected Product Get");
            responder.send(Ok(Some(Product::new(id, "Item", 1.0, 10)))).unwrap();
        }

        assert!(matches!(order_task.await.unwrap(), Err(OrderError::ValidationError(_))));
    }

    // =========================================================================
    // Full system
    // =========================================================================

    async fn seeded_system(session: SessionConfig) -> (OrderSystem, String) {
        let system = OrderSystem::new(session);
        let client_id = system
            .client_directory
            .register_client(Client::new("Clinica Norte", "compras@norte.test"))
            .await
            .unwrap();
        for (name, price, stock) in [("Gauze", 10.0, 3), ("Bandage", 4.0, 10), ("Syringe", 0.5, 100)] {
            system
                .product_client
                .create_product(ProductCreate { name: name.into(), price, stock })
                .await
                .unwrap();
        }
        (system, client_id)
    }

    #[tokio::test]
    async fn test_draft_submission_reserves_stock() {
        let (system, client_id) = seeded_system(SessionConfig::new("vendor_1", "token")).await;
        let draft = system.start_order(client_id.clone()).await.unwrap();

        let candidates = draft.load_catalog().await.unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].name, "Bandage");

        // product_1 is Gauze with 3 in stock
        draft.select_product_by_id("product_1".into()).await.unwrap();
        for _ in 0..5 {
            draft.increase_quantity("product_1".into()).await.unwrap();
        }
        draft.select_product(candidates[0].clone()).await.unwrap();
        let snapshot = draft.enter_confirmation().await.unwrap();
        assert_eq!(snapshot.quantity_of("product_1"), Some(3));
        assert_eq!(snapshot.total, 34.0);

        draft.submit().await.unwrap();
        assert_eq!(draft.current().phase, DraftPhase::Submitted);

        assert_eq!(system.product_client.check_stock("product_1".into()).await, Ok(0));
        assert_eq!(system.product_client.check_stock("product_2".into()).await, Ok(9));

        let orders = system.order_client.list_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].client_id, client_id);
        assert_eq!(orders[0].vendor_id, "vendor_1");
        assert_eq!(orders[0].total, 34.0);
        assert_eq!(orders[0].status, OrderStatus::Created);
        assert_eq!(orders[0].items.len(), 2);
        assert_eq!(system.order_client.get_order(orders[0].id.clone()).await.unwrap().map(|o| o.total), Some(34.0));

        drop(draft);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_backend_rejection_keeps_draft_for_retry() {
        let (system, client_id) = seeded_system(SessionConfig::new("vendor_1", "token")).await;
        let draft = system.start_order(client_id).await.unwrap();

        draft.select_product_by_id("product_1".into()).await.unwrap();
        draft.increase_quantity("product_1".into()).await.unwrap();
        draft.enter_confirmation().await.unwrap();

        // Someone else takes the stock after the snapshot was taken
        system.product_client.reserve_stock("product_1".into(), 2).await.unwrap();

        let err = draft.submit().await.unwrap_err();
        assert!(matches!(err, DraftError::Submission(_)));
        let snapshot = draft.snapshot().await.unwrap();
        assert_eq!(snapshot.phase, DraftPhase::Confirming);
        assert!(snapshot.error.is_some());
        assert_eq!(snapshot.quantity_of("product_1"), Some(2));

        // Back to editing, lower the quantity and retry
        draft.exit_confirmation().await.unwrap();
        draft.decrease_quantity("product_1".into()).await.unwrap();
        draft.enter_confirmation().await.unwrap();
        draft.submit().await.unwrap();
        assert_eq!(system.product_client.check_stock("product_1".into()).await, Ok(0));
    }

    #[tokio::test]
    async fn test_unauthenticated_session_cannot_load_catalog() {
        let session = SessionConfig { auth_token: None, ..SessionConfig::new("vendor_1", "unused") };
        let (system, client_id) = seeded_system(session).await;
        let draft = system.start_order(client_id).await.unwrap();

        let err = draft.load_catalog().await.unwrap_err();
        assert_eq!(err, DraftError::CatalogLoad("Session is not authenticated".into()));
        assert!(draft.current().candidates.is_empty());
    }

    #[tokio::test]
    async fn test_start_order_requires_known_client() {
        let (system, _) = seeded_system(SessionConfig::new("vendor_1", "token")).await;
        let result = system.start_order("client_99".into()).await;
        assert!(matches!(result, Err(ClientError::NotFound(id)) if id == "client_99"));
    }
}
