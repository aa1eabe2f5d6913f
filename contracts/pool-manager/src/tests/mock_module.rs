use cosmwasm_std::{Addr, Coin, CosmosMsg, Decimal, Deps, DepsMut, Env, Uint128};
use poolmanager_std::pool_manager::{CreatePoolMsg, PoolInfo, PoolType};

use crate::registry::{IncentiveOracle, PoolModule, SwapOutcome};
use crate::ContractError;

/// The address every well behaved [`MockModule`] pool lives at.
pub const MOCK_POOL_ADDRESS: &str = "mock_pool";

/// A pool module that reports whatever it is told to from `create_pool`, to exercise the
/// checks the pool manager runs on module output.
pub struct MockModule {
    pub pool_type: PoolType,
    /// Added to the assigned pool id in the returned pool.
    pub id_offset: u64,
    /// Returned instead of [`MOCK_POOL_ADDRESS`] when set.
    pub address_override: Option<Addr>,
}

impl MockModule {
    pub fn new(pool_type: PoolType) -> Self {
        Self {
            pool_type,
            id_offset: 0,
            address_override: None,
        }
    }

    fn pool(&self, pool_id: u64) -> PoolInfo {
        PoolInfo {
            id: pool_id,
            address: Addr::unchecked(MOCK_POOL_ADDRESS),
            pool_type: self.pool_type,
            pool_denoms: vec!["uatom".to_string(), "uosmo".to_string()],
            spread_factor: Decimal::zero(),
            total_shares: None,
            active: true,
        }
    }
}

impl PoolModule for MockModule {
    fn create_pool(
        &self,
        _deps: DepsMut,
        _env: &Env,
        pool_id: u64,
        _msg: &CreatePoolMsg,
    ) -> Result<PoolInfo, ContractError> {
        let mut pool = self.pool(pool_id + self.id_offset);
        if let Some(address) = &self.address_override {
            pool.address = address.clone();
        }
        Ok(pool)
    }

    fn initialize_pool(
        &self,
        _deps: DepsMut,
        _env: &Env,
        _pool: &PoolInfo,
        _creator: &Addr,
    ) -> Result<Vec<CosmosMsg>, ContractError> {
        Ok(vec![])
    }

    fn pool_address(&self, _deps: Deps, _env: &Env, _pool_id: u64) -> Result<Addr, ContractError> {
        Ok(Addr::unchecked(MOCK_POOL_ADDRESS))
    }

    fn get_pool(&self, _deps: Deps, pool_id: u64) -> Result<PoolInfo, ContractError> {
        Ok(self.pool(pool_id))
    }

    fn get_total_pool_liquidity(
        &self,
        _deps: Deps,
        pool_id: u64,
    ) -> Result<Vec<Coin>, ContractError> {
        Err(ContractError::PoolNotFound { pool_id })
    }

    fn calculate_spot_price(
        &self,
        _deps: Deps,
        pool_id: u64,
        _quote_denom: &str,
        _base_denom: &str,
    ) -> Result<Decimal, ContractError> {
        Err(ContractError::PoolNotFound { pool_id })
    }

    fn calc_out_amt_given_in(
        &self,
        _deps: Deps,
        pool: &PoolInfo,
        _token_in: &Coin,
        _token_out_denom: &str,
        _spread_factor: Decimal,
    ) -> Result<Coin, ContractError> {
        Err(ContractError::PoolNotFound { pool_id: pool.id })
    }

    fn calc_in_amt_given_out(
        &self,
        _deps: Deps,
        pool: &PoolInfo,
        _token_out: &Coin,
        _token_in_denom: &str,
        _spread_factor: Decimal,
    ) -> Result<Coin, ContractError> {
        Err(ContractError::PoolNotFound { pool_id: pool.id })
    }

    fn swap_exact_amount_in(
        &self,
        _deps: DepsMut,
        _env: &Env,
        pool: &PoolInfo,
        _token_in: &Coin,
        _token_out_denom: &str,
        _token_out_min_amount: Uint128,
        _spread_factor: Decimal,
    ) -> Result<SwapOutcome, ContractError> {
        Err(ContractError::PoolNotFound { pool_id: pool.id })
    }

    fn swap_exact_amount_out(
        &self,
        _deps: DepsMut,
        _env: &Env,
        pool: &PoolInfo,
        _token_in_denom: &str,
        _token_in_max_amount: Uint128,
        _token_out: &Coin,
        _spread_factor: Decimal,
    ) -> Result<SwapOutcome, ContractError> {
        Err(ContractError::PoolNotFound { pool_id: pool.id })
    }
}

/// Treats a fixed set of pools as incentivized.
pub struct StaticIncentives(pub Vec<u64>);

impl IncentiveOracle for StaticIncentives {
    fn is_pool_incentivized(&self, _deps: Deps, pool_id: u64) -> Result<bool, ContractError> {
        Ok(self.0.contains(&pool_id))
    }
}
