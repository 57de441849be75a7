//! Pricing module containing discount resolution and amount calculation

pub mod amount;
pub mod discount;

pub use amount::*;
pub use discount::*;
