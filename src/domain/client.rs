/// A client of the distributor: the party an order is placed for.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Client {
    /// Creates a new Client instance.
    ///
    /// # Notes
    /// The `id` field is initialized as an empty string and will be set by the actor system.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Payload for registering a new client.
#[derive(Debug, Clone)]
pub struct ClientCreate {
    pub name: String,
    pub email: String,
}
