//! Request handlers for inventory operations.

mod report;
mod stock;

pub use report::*;
pub use stock::*;
