use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderStatus};

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Action = ();
    type ActionResult = ();

    /// Creates a new Order from creation parameters.
    ///
    /// # Notes
    /// The order is initialized with status `Created` and never changes
    /// afterwards. Empty orders are rejected.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, String> {
        if params.items.is_empty() {
            return Err("Order has no items".to_string());
        }
        Ok(Self {
            id,
            client_id: params.client_id,
            vendor_id: params.vendor_id,
            items: params.items,
            total: params.total,
            status: OrderStatus::Created,
        })
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
