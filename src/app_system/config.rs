use std::fmt;
use thiserror::Error;
use crate::gateway::GatewayError;

const DEFAULT_VENDOR_ID: &str = "vendor_local";
const DEFAULT_CHANNEL_BUFFER: usize = 32;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Session settings owned by the application and passed to every gateway.
#[derive(Clone, PartialEq)]
pub struct SessionConfig {
    pub vendor_id: String,
    pub auth_token: Option<String>,
    pub channel_buffer: usize,
}

impl SessionConfig {
    pub fn new(vendor_id: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            vendor_id: vendor_id.into(),
            auth_token: Some(auth_token.into()),
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
        }
    }

    /// Reads `ORDER_VENDOR_ID`, `ORDER_AUTH_TOKEN` and `ORDER_CHANNEL_BUFFER`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vendor_id = lookup("ORDER_VENDOR_ID").unwrap_or_else(|| DEFAULT_VENDOR_ID.to_string());
        let auth_token = lookup("ORDER_AUTH_TOKEN").filter(|token| !token.trim().is_empty());
        let channel_buffer = match lookup("ORDER_CHANNEL_BUFFER") {
            None => DEFAULT_CHANNEL_BUFFER,
            Some(value) => match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidValue { key: "ORDER_CHANNEL_BUFFER", value }),
            },
        };
        Ok(Self {
            vendor_id,
            auth_token,
            channel_buffer,
        })
    }

    /// Returns the token gateways must present.
    pub fn authorize(&self) -> Result<&str, GatewayError> {
        self.auth_token
            .as_deref()
            .ok_or_else(|| GatewayError::new("Session is not authenticated"))
    }
}

// Keeps the token out of logs.
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("vendor_id", &self.vendor_id)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("channel_buffer", &self.channel_buffer)
            .finish()
    }
}
