use cosmwasm_std::{Coin, DepsMut, StdResult, Storage, Uint128};

use crate::registry::PoolManager;
use crate::state::POOL_VOLUME;
use crate::ContractError;

impl PoolManager {
    /// Adds the base asset value of `token_in` to the pool's cumulative volume. Inputs that
    /// cannot be priced are not counted.
    pub fn track_volume(
        &self,
        mut deps: DepsMut,
        pool_id: u64,
        token_in: &Coin,
    ) -> Result<(), ContractError> {
        self.refresh_direct_base_routes(deps.branch(), pool_id)?;

        let volume = self
            .input_denom_to_base(deps.as_ref(), &token_in.denom, token_in.amount)
            .unwrap_or_default();

        Ok(add_pool_volume(deps.storage, pool_id, volume)?)
    }
}

fn add_pool_volume(storage: &mut dyn Storage, pool_id: u64, volume: Uint128) -> StdResult<()> {
    if volume.is_zero() {
        return Ok(());
    }

    POOL_VOLUME.update(storage, pool_id, |total| -> StdResult<_> {
        Ok(total.unwrap_or_default().checked_add(volume)?)
    })?;
    Ok(())
}

/// Cumulative volume of a pool in the base asset.
pub fn get_pool_volume(storage: &dyn Storage, pool_id: u64) -> StdResult<Uint128> {
    Ok(POOL_VOLUME.may_load(storage, pool_id)?.unwrap_or_default())
}
