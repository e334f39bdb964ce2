//! Typed handles over the backend resource actors.

#[macro_use]
mod macros;
mod client_directory;
mod order_client;
mod product_client;

pub use client_directory::*;
pub use order_client::*;
pub use product_client::*;
