use super::Product;

/// One product-quantity pair in a draft.
///
/// `quantity` is always within `1..=product.stock`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product: Product,
    pub quantity: u32,
}

impl OrderLine {
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// The in-progress, unsubmitted basket for one client.
///
/// Lines keep selection order and never share a product id. The total is
/// derived from the lines on every read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    lines: Vec<OrderLine>,
    confirming: bool,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    pub fn set_confirming(&mut self, confirming: bool) {
        self.confirming = confirming;
    }

    pub fn total(&self) -> f64 {
        self.lines.iter().map(OrderLine::subtotal).sum()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.line(product_id).is_some()
    }

    pub fn line(&self, product_id: &str) -> Option<&OrderLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }

    /// Appends a line with quantity 1. Returns the product back if its id is
    /// already in the draft or it has no stock.
    pub fn add(&mut self, product: Product) -> Result<(), Product> {
        if product.stock == 0 || self.contains(&product.id) {
            return Err(product);
        }
        self.lines.push(OrderLine { product, quantity: 1 });
        Ok(())
    }

    /// Increments the line's quantity unless that would exceed the product's
    /// stock. Returns whether the quantity changed.
    pub fn increase(&mut self, product_id: &str) -> bool {
        match self.lines.iter_mut().find(|line| line.product.id == product_id) {
            Some(line) if line.quantity < line.product.stock => {
                line.quantity += 1;
                true
            }
            _ => false,
        }
    }

    /// Decrements the line's quantity. A line at quantity 1 is removed and its
    /// product handed back.
    pub fn decrease(&mut self, product_id: &str) -> Option<Decrease> {
        let index = self.lines.iter().position(|line| line.product.id == product_id)?;
        if self.lines[index].quantity <= 1 {
            let line = self.lines.remove(index);
            Some(Decrease::Removed(line.product))
        } else {
            self.lines[index].quantity -= 1;
            Some(Decrease::Decremented(self.lines[index].quantity))
        }
    }

    /// Builds the payload sent to the order submission gateway.
    pub fn to_submission(&self, client_id: impl Into<String>) -> OrderSubmission {
        OrderSubmission {
            client_id: client_id.into(),
            items: self
                .lines
                .iter()
                .map(|line| OrderItem {
                    product_id: line.product.id.clone(),
                    quantity: line.quantity,
                    unit_price: line.product.price,
                })
                .collect(),
            total: self.total(),
        }
    }
}

/// Outcome of [`OrderDraft::decrease`].
#[derive(Debug, Clone, PartialEq)]
pub enum Decrease {
    Decremented(u32),
    Removed(Product),
}

/// A submitted line: product id, quantity and the unit price the client saw.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Payload handed to the order submission gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSubmission {
    pub client_id: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Created,
}

/// An order accepted by the backend.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub client_id: String,
    pub vendor_id: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
}

/// Parameters for storing a new order.
#[derive(Debug)]
pub struct OrderCreate {
    pub client_id: String,
    pub vendor_id: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
}
