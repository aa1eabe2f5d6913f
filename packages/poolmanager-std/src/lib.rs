pub mod cosmwasm_pool;
pub mod denom;
pub mod incentives;
pub mod migrate_guards;
pub mod pool_manager;
pub mod routes;
pub mod taker_fee;
pub mod tokenfactory;
