use std::collections::BTreeMap;

use cosmwasm_std::{Coin, Deps, Order, StdResult, Uint128};
use cw_storage_plus::Bound;
use poolmanager_std::pool_manager::{
    DenomPairTakerFee, EstimateSwapExactAmountInResponse, EstimateSwapExactAmountOutResponse,
    LiquidityResponse, NumPoolsResponse, Params, PoolDenomsResponse, PoolInfo, PoolTypeResponse,
    PoolVolumeResponse, PoolsResponse, RegisteredAlloyedPool, SpotPriceResponse,
    TakerFeeShareAgreement, TakerFeeTrackersResponse, TradingPairTakerFeeResponse,
};
use poolmanager_std::routes::{SwapAmountInRoute, SwapAmountOutRoute};

use crate::registry::PoolManager;
use crate::router::volume::get_pool_volume;
use crate::state::{
    get_registered_alloyed_pool, page_limit, read_coins, read_denom_pair_taker_fees,
    read_pool_routes, read_registered_alloyed_pools, NEXT_POOL_ID, PARAMS, POOL_ROUTES,
    TAKER_FEES_FOR_COMMUNITY_POOL, TAKER_FEES_FOR_STAKERS, TAKER_FEE_SHARE_ACCRUED,
    TAKER_FEE_SHARE_AGREEMENTS, TAKER_FEE_TRACKER_START_HEIGHT,
};
use crate::taker_fee::get_trading_pair_taker_fee;
use crate::ContractError;

pub fn query_params(deps: Deps) -> StdResult<Params> {
    PARAMS.load(deps.storage)
}

/// Number of pools created so far.
pub fn query_num_pools(deps: Deps) -> StdResult<NumPoolsResponse> {
    let next_pool_id = NEXT_POOL_ID.load(deps.storage)?;
    Ok(NumPoolsResponse {
        num_pools: next_pool_id.saturating_sub(1),
    })
}

pub fn query_pool_type(
    deps: Deps,
    manager: &PoolManager,
    pool_id: u64,
) -> Result<PoolTypeResponse, ContractError> {
    Ok(PoolTypeResponse {
        pool_type: manager.get_pool_type(deps.storage, pool_id)?,
    })
}

pub fn query_pool(
    deps: Deps,
    manager: &PoolManager,
    pool_id: u64,
) -> Result<PoolInfo, ContractError> {
    manager.get_pool(deps, pool_id)
}

/// A page of pools of every module, ordered by id.
pub fn query_all_pools(
    deps: Deps,
    manager: &PoolManager,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> Result<PoolsResponse, ContractError> {
    let pools = read_pool_routes(deps.storage, start_after, limit)?
        .into_iter()
        .map(|(pool_id, pool_type)| manager.module(pool_type)?.get_pool(deps, pool_id))
        .collect::<Result<Vec<_>, ContractError>>()?;

    Ok(PoolsResponse { pools })
}

/// A page of the pools trading `denom`, ordered by id. Pools whose state can't be read are
/// skipped.
pub fn query_list_pools_by_denom(
    deps: Deps,
    manager: &PoolManager,
    denom: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> Result<PoolsResponse, ContractError> {
    let limit = page_limit(limit);
    let start = start_after.map(Bound::exclusive);

    let mut pools = vec![];
    for item in POOL_ROUTES.range(deps.storage, start, None, Order::Ascending) {
        if pools.len() == limit {
            break;
        }
        let (pool_id, pool_type) = item?;
        let Ok(pool) = manager
            .module(pool_type)
            .and_then(|module| module.get_pool(deps, pool_id))
        else {
            continue;
        };
        if pool.pool_denoms.contains(&denom) {
            pools.push(pool);
        }
    }

    Ok(PoolsResponse { pools })
}

pub fn query_pool_denoms(
    deps: Deps,
    manager: &PoolManager,
    pool_id: u64,
) -> Result<PoolDenomsResponse, ContractError> {
    Ok(PoolDenomsResponse {
        denoms: manager
            .get_pool_module(deps.storage, pool_id)?
            .get_pool_denoms(deps, pool_id)?,
    })
}

pub fn query_spot_price(
    deps: Deps,
    manager: &PoolManager,
    pool_id: u64,
    quote_asset_denom: String,
    base_asset_denom: String,
) -> Result<SpotPriceResponse, ContractError> {
    let spot_price = manager
        .get_pool_module(deps.storage, pool_id)?
        .calculate_spot_price(deps, pool_id, &quote_asset_denom, &base_asset_denom)?;

    Ok(SpotPriceResponse { spot_price })
}

pub fn query_total_pool_liquidity(
    deps: Deps,
    manager: &PoolManager,
    pool_id: u64,
) -> Result<LiquidityResponse, ContractError> {
    Ok(LiquidityResponse {
        liquidity: manager
            .get_pool_module(deps.storage, pool_id)?
            .get_total_pool_liquidity(deps, pool_id)?,
    })
}

/// Liquidity of a page of pools summed per denom. Callers add up the pages by pool id.
pub fn query_total_liquidity(
    deps: Deps,
    manager: &PoolManager,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> Result<LiquidityResponse, ContractError> {
    let mut totals: BTreeMap<String, Uint128> = BTreeMap::new();
    for (pool_id, pool_type) in read_pool_routes(deps.storage, start_after, limit)? {
        let liquidity = manager
            .module(pool_type)?
            .get_total_pool_liquidity(deps, pool_id)?;
        for coin in liquidity {
            let total = totals.entry(coin.denom).or_default();
            *total = total.checked_add(coin.amount)?;
        }
    }

    Ok(LiquidityResponse {
        liquidity: totals
            .into_iter()
            .map(|(denom, amount)| Coin { denom, amount })
            .collect(),
    })
}

pub fn query_estimate_swap_exact_amount_in(
    deps: Deps,
    manager: &PoolManager,
    routes: Vec<SwapAmountInRoute>,
    token_in: Coin,
    with_taker_fee: bool,
) -> Result<EstimateSwapExactAmountInResponse, ContractError> {
    Ok(EstimateSwapExactAmountInResponse {
        token_out_amount: manager.estimate_swap_exact_amount_in(
            deps,
            &routes,
            &token_in,
            with_taker_fee,
        )?,
    })
}

pub fn query_estimate_swap_exact_amount_out(
    deps: Deps,
    manager: &PoolManager,
    routes: Vec<SwapAmountOutRoute>,
    token_out: Coin,
) -> Result<EstimateSwapExactAmountOutResponse, ContractError> {
    Ok(EstimateSwapExactAmountOutResponse {
        token_in_amount: manager.estimate_swap_exact_amount_out(deps, &routes, &token_out)?,
    })
}

pub fn query_trading_pair_taker_fee(
    deps: Deps,
    denom0: String,
    denom1: String,
) -> Result<TradingPairTakerFeeResponse, ContractError> {
    Ok(TradingPairTakerFeeResponse {
        taker_fee: get_trading_pair_taker_fee(deps.storage, &denom0, &denom1)?,
    })
}

/// A page of the pair taker fee overrides, ordered by pair.
pub fn query_all_denom_pair_taker_fees(
    deps: Deps,
    start_after: Option<(String, String)>,
    limit: Option<u32>,
) -> StdResult<Vec<DenomPairTakerFee>> {
    read_denom_pair_taker_fees(deps.storage, start_after, limit)
}

pub fn query_taker_fee_trackers(deps: Deps) -> StdResult<TakerFeeTrackersResponse> {
    Ok(TakerFeeTrackersResponse {
        for_staking_rewards: read_coins(deps.storage, &TAKER_FEES_FOR_STAKERS)?,
        for_community_pool: read_coins(deps.storage, &TAKER_FEES_FOR_COMMUNITY_POOL)?,
        start_height: TAKER_FEE_TRACKER_START_HEIGHT.load(deps.storage)?,
    })
}

pub fn query_taker_fee_share_agreement(
    deps: Deps,
    denom: String,
) -> StdResult<Option<TakerFeeShareAgreement>> {
    TAKER_FEE_SHARE_AGREEMENTS.may_load(deps.storage, &denom)
}

pub fn query_all_taker_fee_share_agreements(
    deps: Deps,
) -> StdResult<Vec<TakerFeeShareAgreement>> {
    TAKER_FEE_SHARE_AGREEMENTS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, agreement)| agreement))
        .collect()
}

pub fn query_registered_alloyed_pool(
    deps: Deps,
    pool_id: u64,
) -> Result<RegisteredAlloyedPool, ContractError> {
    get_registered_alloyed_pool(deps.storage, pool_id)?
        .ok_or(ContractError::NoRegisteredAlloyedPool { pool_id })
}

pub fn query_all_registered_alloyed_pools(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Vec<RegisteredAlloyedPool>> {
    read_registered_alloyed_pools(deps.storage, start_after, limit)
}

/// Skimmed taker fees accrued for `denom`, one coin per fee denom.
pub fn query_taker_fee_share_accumulators(deps: Deps, denom: String) -> StdResult<Vec<Coin>> {
    TAKER_FEE_SHARE_ACCRUED
        .prefix(&denom)
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(fee_denom, amount)| Coin::new(amount.u128(), fee_denom)))
        .collect()
}

pub fn query_pool_volume(deps: Deps, pool_id: u64) -> StdResult<PoolVolumeResponse> {
    Ok(PoolVolumeResponse {
        volume: get_pool_volume(deps.storage, pool_id)?,
    })
}
