pub mod contract;
mod error;
pub mod helpers;
pub mod manager;
mod math;
pub mod modules;
pub mod queries;
pub mod registry;
pub mod router;
pub mod routes;
pub mod state;
pub mod taker_fee;
pub mod taker_fee_share;

#[cfg(test)]
pub mod tests;

pub use crate::error::ContractError;
