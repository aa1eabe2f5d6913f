pub mod cfmm;
pub mod contract_pool;
