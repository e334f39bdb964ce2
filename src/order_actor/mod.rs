//! Storage of placed orders.

pub mod entity;
pub mod error;

pub use error::*;
