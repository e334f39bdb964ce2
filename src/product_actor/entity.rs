use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate};
use super::actions::{ProductAction, ProductActionResult};

impl Entity for Product {
    type Id = String;
    type CreateParams = ProductCreate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    /// Creates a new Product from creation parameters.
    ///
    /// Rejects negative or non-finite prices and blank names.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, String> {
        if params.name.trim().is_empty() {
            return Err("Product name required".to_string());
        }
        if !params.price.is_finite() || params.price < 0.0 {
            return Err(format!("Invalid price: {}", params.price));
        }
        Ok(Self {
            id,
            name: params.name,
            price: params.price,
            stock: params.stock,
        })
    }

    /// Handles stock actions.
    ///
    /// # Errors
    /// Returns an error if attempting to reserve more stock than available.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::ReserveStock(amount) => {
                if self.stock >= amount {
                    self.stock -= amount;
                    Ok(ProductActionResult::ReserveStock(self.stock))
                } else {
                    Err(format!("Insufficient stock: {} available, {} requested", self.stock, amount))
                }
            }
            ProductAction::ReleaseStock(amount) => {
                self.stock = self.stock.saturating_add(amount);
                Ok(ProductActionResult::ReleaseStock(self.stock))
            }
        }
    }
}
