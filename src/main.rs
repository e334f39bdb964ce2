mod actor_framework;
mod app_system;
mod client_actor;
mod clients;
mod domain;
mod draft;
mod gateway;
mod order_actor;
mod product_actor;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;

use tracing::{error, info, warn, Instrument};
use crate::app_system::{setup_tracing, OrderSystem, SessionConfig};
use crate::domain::{Client, ProductCreate};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let mut session = SessionConfig::from_env().map_err(|e| e.to_string())?;
    if session.auth_token.is_none() {
        warn!("ORDER_AUTH_TOKEN not set, using a local demo token");
        session.auth_token = Some("local-demo".to_string());
    }

    info!(vendor_id = %session.vendor_id, "Starting order draft demo");
    let system = OrderSystem::new(session);

    // Seed the backend with a client and a few products
    let client_id = system
        .client_directory
        .register_client(Client::new("Clinica Norte", "compras@norte.test"))
        .await
        .map_err(|e| e.to_string())?;

    for (name, price, stock) in [("Sterile gauze", 3.5, 40), ("Nitrile gloves", 12.0, 6), ("Syringe 5ml", 0.8, 300)] {
        system
            .product_client
            .create_product(ProductCreate { name: name.to_string(), price, stock })
            .await
            .map_err(|e| e.to_string())?;
    }

    let draft = system.start_order(client_id).await.map_err(|e| e.to_string())?;

    // Observer: log every published state
    let mut updates = draft.subscribe();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            info!(
                phase = %snapshot.phase,
                lines = snapshot.lines.len(),
                total = %snapshot.total,
                "Draft updated"
            );
        }
    });

    let span = tracing::info_span!("order_flow");
    let outcome = async {
        let candidates = draft.load_catalog().await?;
        if candidates.is_empty() {
            draft.close_picker().await?;
        }
        for product in candidates.iter().take(2) {
            draft.select_product(product.clone()).await?;
        }
        if let Some(first) = candidates.first() {
            for _ in 0..3 {
                draft.increase_quantity(first.id.clone()).await?;
            }
        }
        draft.enter_confirmation().await?;
        draft.submit().await
    }
    .instrument(span)
    .await;

    match outcome {
        Ok(()) => {
            for order in system.order_client.list_orders().await.map_err(|e| e.to_string())? {
                info!(
                    order_id = %order.id,
                    items = order.items.len(),
                    total = %order.total,
                    status = ?order.status,
                    "Order submitted successfully"
                );
                for item in &order.items {
                    let remaining = system
                        .product_client
                        .check_stock(item.product_id.clone())
                        .await
                        .map_err(|e| e.to_string())?;
                    info!(product_id = %item.product_id, remaining, "Stock after order");
                }
            }
        }
        Err(e) => {
            error!(error = %e, "Order flow failed");
            let _ = draft.discard().await;
        }
    }

    // Closing the session lets the watcher finish
    drop(draft);
    let _ = watcher.await;

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
