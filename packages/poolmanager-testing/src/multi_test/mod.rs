pub mod alloyed_pool_mock;
pub mod incentives_mock;
pub mod stargate_mock;
