use tracing::{debug, instrument};
use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::client_actor::ClientError;
use crate::domain::{Client, ClientCreate};

/// Handle over the Client actor: registration and lookup of the
/// distributor's clients.
#[derive(Clone)]
pub struct ClientDirectory {
    inner: ResourceClient<Client>,
}

impl_basic_client!(ClientDirectory, Client, ClientError, client);

impl ClientDirectory {
    #[instrument(skip(self, client), fields(client_name = %client.name))]
    pub async fn register_client(&self, client: Client) -> Result<String, ClientError> {
        debug!("Sending request");
        let params = ClientCreate {
            name: client.name,
            email: client.email,
        };
        self.inner.create(params).await.map_err(|e| match e {
            FrameworkError::Rejected(msg) => ClientError::ValidationError(msg),
            other => ClientError::ActorCommunicationError(other.to_string()),
        })
    }

    /// Like `get_client`, but a missing client is an error.
    pub async fn require_client(&self, id: String) -> Result<Client, ClientError> {
        self.get_client(id.clone()).await?.ok_or(ClientError::NotFound(id))
    }
}
