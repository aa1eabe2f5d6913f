use std::collections::BTreeMap;

use cosmwasm_std::{Decimal, Deps, DepsMut, Uint128};
use poolmanager_std::pool_manager::BASE_DENOM;

use crate::registry::PoolManager;
use crate::state::{DIRECT_BASE_ROUTES, POOL_ROUTES};
use crate::ContractError;

impl PoolManager {
    /// The pool pairing `denom` with the base asset that holds the most base asset liquidity.
    pub fn get_direct_base_route_with_most_liquidity(
        &self,
        deps: Deps,
        denom: &str,
    ) -> Result<u64, ContractError> {
        DIRECT_BASE_ROUTES
            .may_load(deps.storage, denom)?
            .ok_or_else(|| ContractError::NoDirectBaseRoute {
                denom: denom.to_string(),
            })
    }

    /// Offers `pool_id` as the direct base route of every other denom it trades. The pool takes
    /// over a denom when it holds more base asset than the indexed pool; ties go to the lowest
    /// pool id. Pools that can't report their liquidity are left out.
    pub fn refresh_direct_base_routes(
        &self,
        deps: DepsMut,
        pool_id: u64,
    ) -> Result<(), ContractError> {
        let Some((denoms, base_liquidity)) = self.base_liquidity(deps.as_ref(), pool_id)? else {
            return Ok(());
        };

        let mut indexed_liquidity: BTreeMap<u64, Uint128> = BTreeMap::new();
        for denom in denoms.iter().filter(|denom| denom.as_str() != BASE_DENOM) {
            let replaces = match DIRECT_BASE_ROUTES.may_load(deps.storage, denom)? {
                None => !base_liquidity.is_zero(),
                Some(current) if current == pool_id => false,
                Some(current) => {
                    let current_liquidity = match indexed_liquidity.get(&current) {
                        Some(liquidity) => *liquidity,
                        None => {
                            let liquidity = self
                                .base_liquidity(deps.as_ref(), current)?
                                .map(|(_, liquidity)| liquidity)
                                .unwrap_or_default();
                            indexed_liquidity.insert(current, liquidity);
                            liquidity
                        }
                    };

                    base_liquidity > current_liquidity
                        || (base_liquidity == current_liquidity && pool_id < current)
                }
            };

            if replaces {
                DIRECT_BASE_ROUTES.save(deps.storage, denom, &pool_id)?;
            }
        }

        Ok(())
    }

    /// Denoms of a pool trading the base asset, with the base asset amount it holds. Reads the
    /// persisted route directly so route cache gas accounting is left alone.
    fn base_liquidity(
        &self,
        deps: Deps,
        pool_id: u64,
    ) -> Result<Option<(Vec<String>, Uint128)>, ContractError> {
        let Some(pool_type) = POOL_ROUTES.may_load(deps.storage, pool_id)? else {
            return Ok(None);
        };
        let module = self.module(pool_type)?;

        let Ok(denoms) = module.get_pool_denoms(deps, pool_id) else {
            return Ok(None);
        };
        if !denoms.iter().any(|denom| denom == BASE_DENOM) {
            return Ok(None);
        }
        let Ok(liquidity) = module.get_total_pool_liquidity(deps, pool_id) else {
            return Ok(None);
        };

        let base = liquidity
            .iter()
            .find(|coin| coin.denom == BASE_DENOM)
            .map(|coin| coin.amount)
            .unwrap_or_default();
        Ok(Some((denoms, base)))
    }

    /// Values `amount` of `denom` in the base asset through its most liquid direct base pool.
    /// Denoms without such a pool are worth zero.
    pub fn input_denom_to_base(
        &self,
        deps: Deps,
        denom: &str,
        amount: Uint128,
    ) -> Result<Uint128, ContractError> {
        if denom == BASE_DENOM {
            return Ok(amount);
        }

        let pool_id = match self.get_direct_base_route_with_most_liquidity(deps, denom) {
            Ok(pool_id) => pool_id,
            Err(ContractError::NoDirectBaseRoute { .. }) => return Ok(Uint128::zero()),
            Err(err) => return Err(err),
        };

        let spot_price = self
            .get_pool_module(deps.storage, pool_id)?
            .calculate_spot_price(deps, pool_id, BASE_DENOM, denom)?;

        Ok(amount.checked_multiply_ratio(spot_price.atomics(), Decimal::one().atomics())?)
    }
}
