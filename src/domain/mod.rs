pub mod client;
pub mod product;
pub mod order;

pub use client::*;
pub use product::*;
pub use order::*;
