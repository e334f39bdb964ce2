use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};
use crate::domain::Product;
use super::{DraftError, DraftRequest, DraftSnapshot};

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, DraftError> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| DraftError::ServiceUnavailable("Actor closed".to_string()))?;

                response.await.map_err(|_| DraftError::ServiceUnavailable("Actor dropped".to_string()))?
            }
        }
    };
}

/// Handle to one draft session. Cheap to clone; every clone talks to the
/// same session.
#[derive(Clone)]
pub struct DraftClient {
    sender: mpsc::Sender<DraftRequest>,
    state: watch::Receiver<DraftSnapshot>,
}

impl DraftClient {
    pub fn new(sender: mpsc::Sender<DraftRequest>, state: watch::Receiver<DraftSnapshot>) -> Self {
        Self { sender, state }
    }

    /// Subscribes to state changes. The receiver starts at the latest
    /// published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DraftSnapshot> {
        self.state.clone()
    }

    /// Latest published snapshot, without a round trip to the session.
    pub fn current(&self) -> DraftSnapshot {
        self.state.borrow().clone()
    }
}

client_method!(DraftClient => fn load_catalog() -> Vec<Product> as DraftRequest::LoadCatalog);
client_method!(DraftClient => fn select_product(product: Product) -> DraftSnapshot as DraftRequest::SelectProduct);
client_method!(DraftClient => fn select_product_by_id(product_id: String) -> DraftSnapshot as DraftRequest::SelectProductById);
client_method!(DraftClient => fn increase_quantity(product_id: String) -> DraftSnapshot as DraftRequest::IncreaseQuantity);
client_method!(DraftClient => fn decrease_quantity(product_id: String) -> DraftSnapshot as DraftRequest::DecreaseQuantity);
client_method!(DraftClient => fn close_picker() -> DraftSnapshot as DraftRequest::ClosePicker);
client_method!(DraftClient => fn dismiss_error() -> DraftSnapshot as DraftRequest::DismissError);
client_method!(DraftClient => fn enter_confirmation() -> DraftSnapshot as DraftRequest::EnterConfirmation);
client_method!(DraftClient => fn exit_confirmation() -> DraftSnapshot as DraftRequest::ExitConfirmation);
client_method!(DraftClient => fn submit() -> () as DraftRequest::Submit);
client_method!(DraftClient => fn snapshot() -> DraftSnapshot as DraftRequest::GetSnapshot);
client_method!(DraftClient => fn discard() -> () as DraftRequest::Discard);
