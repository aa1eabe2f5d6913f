use std::cmp::max;

use cosmwasm_std::{ensure, Decimal, Deps};
use poolmanager_std::pool_manager::{PoolInfo, PoolType, BASE_DENOM};

use crate::registry::{PoolManager, PoolModule};
use crate::ContractError;

pub mod commands;
pub mod estimate;
pub mod multihop;
pub mod volume;

/// A route hop bound to the module and pool executing it.
pub struct Hop<'m> {
    pub module: &'m dyn PoolModule,
    pub pool: PoolInfo,
    /// Spread factor charged on this hop, discounted for incentivized routes through the base
    /// asset.
    pub spread_factor: Decimal,
}

impl PoolManager {
    /// Resolves each pool of a route to its module and an active pool.
    ///
    /// Two hop routes through the base asset over two distinct incentivized pools are charged a
    /// single route spread factor `max(max(f0, f1), (f0 + f1) / 2)`, split across the hops in
    /// proportion to each pool's own spread factor.
    pub fn resolve_hops(
        &self,
        deps: Deps,
        pool_ids: &[u64],
        intermediate_denoms: &[&str],
        token_in_denom: &str,
        token_out_denom: &str,
    ) -> Result<Vec<Hop<'_>>, ContractError> {
        let mut hops = pool_ids
            .iter()
            .map(|pool_id| {
                let module = self.get_pool_module(deps.storage, *pool_id)?;
                let pool = module.get_pool(deps, *pool_id)?;
                ensure!(
                    pool.active,
                    ContractError::InactivePool { pool_id: *pool_id }
                );

                Ok(Hop {
                    module,
                    spread_factor: pool.spread_factor,
                    pool,
                })
            })
            .collect::<Result<Vec<_>, ContractError>>()?;

        if self.is_base_routed_multihop(
            deps,
            pool_ids,
            intermediate_denoms,
            token_in_denom,
            token_out_denom,
        )? {
            let sum = hops[0].spread_factor.checked_add(hops[1].spread_factor)?;
            if !sum.is_zero() {
                let route_spread_factor = max(
                    max(hops[0].spread_factor, hops[1].spread_factor),
                    sum * Decimal::percent(50),
                );
                for hop in hops.iter_mut() {
                    hop.spread_factor =
                        route_spread_factor.checked_mul(hop.spread_factor.checked_div(sum)?)?;
                }
            }
        }

        Ok(hops)
    }

    /// Records a swap through `pool`. Pool contracts are quoted against their state before the
    /// message runs, so each one is swapped through at most once per message.
    pub(crate) fn claim_pool_swap(&self, pool: &PoolInfo) -> Result<(), ContractError> {
        if !matches!(pool.pool_type, PoolType::Concentrated | PoolType::CosmWasm) {
            return Ok(());
        }

        ensure!(
            self.swapped_pool_contracts.borrow_mut().insert(pool.id),
            ContractError::PoolContractSwappedTwice { pool_id: pool.id }
        );
        Ok(())
    }

    /// Whether the route is a two hop trade through the base asset over distinct incentivized
    /// pools.
    pub fn is_base_routed_multihop(
        &self,
        deps: Deps,
        pool_ids: &[u64],
        intermediate_denoms: &[&str],
        token_in_denom: &str,
        token_out_denom: &str,
    ) -> Result<bool, ContractError> {
        if pool_ids.len() != 2
            || intermediate_denoms != [BASE_DENOM]
            || token_in_denom == token_out_denom
            || pool_ids[0] == pool_ids[1]
        {
            return Ok(false);
        }

        Ok(self.incentives.is_pool_incentivized(deps, pool_ids[0])?
            && self.incentives.is_pool_incentivized(deps, pool_ids[1])?)
    }
}
