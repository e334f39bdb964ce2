//! Order draft sessions.
//!
//! A session is one [`DraftService`] actor owning a [`DraftEngine`]. Callers
//! drive it through a [`DraftClient`] and observe it through the
//! [`DraftSnapshot`]s it publishes after every transition.

mod client;
mod engine;
mod error;
mod messages;
mod service;
mod state;

pub use client::*;
pub use engine::*;
pub use error::*;
pub use messages::*;
pub use service::*;
pub use state::*;
