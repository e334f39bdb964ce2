use crate::actor_framework::Entity;
use crate::domain::{Client, ClientCreate};

fn validate_email(email: &str) -> Result<(), String> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(format!("Invalid email: {}", email))
    }
}

impl Entity for Client {
    type Id = String;
    type CreateParams = ClientCreate;
    type Action = ();
    type ActionResult = ();

    /// Registers a client. Name and a plausible email are required.
    fn from_create_params(id: String, params: ClientCreate) -> Result<Self, String> {
        if params.name.trim().is_empty() {
            return Err("Client name required".to_string());
        }
        validate_email(&params.email)?;
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
        })
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
