#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response};
use cw2::{get_contract_version, set_contract_version};
use poolmanager_std::pool_manager::{
    ExecuteMsg, InstantiateMsg, MigrateMsg, Params, QueryMsg, SudoMsg,
};
use semver::Version;

use crate::error::ContractError;
use crate::registry::PoolManager;
use crate::state::{NEXT_POOL_ID, PARAMS, TAKER_FEE_TRACKER_START_HEIGHT};
use crate::{manager, queries, router, taker_fee, taker_fee_share};

// version info for migration info
pub const CONTRACT_NAME: &str = "crates.io:pool-manager";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let params = Params {
        pool_creation_fee: msg.pool_creation_fee,
        taker_fee_params: msg.taker_fee_params,
        authorized_quote_denoms: msg.authorized_quote_denoms,
        taker_fee_collector: deps.api.addr_validate(&msg.taker_fee_collector)?,
        community_pool: deps.api.addr_validate(&msg.community_pool)?,
        incentives: msg
            .incentives
            .map(|incentives| deps.api.addr_validate(&incentives))
            .transpose()?,
        unrestricted_pool_creators: msg
            .unrestricted_pool_creators
            .iter()
            .map(|creator| deps.api.addr_validate(creator))
            .collect::<Result<_, _>>()?,
    };
    manager::validate_params(deps.api, &params)?;
    PARAMS.save(deps.storage, &params)?;

    // pool ids start at 1
    NEXT_POOL_ID.save(deps.storage, &1u64)?;
    TAKER_FEE_TRACKER_START_HEIGHT.save(deps.storage, &env.block.height)?;
    cw_ownable::initialize_owner(deps.storage, deps.api, Some(info.sender.as_str()))?;

    Ok(Response::default().add_attributes(vec![
        ("action", "instantiate".to_string()),
        ("owner", info.sender.to_string()),
    ]))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let manager = PoolManager::from_params(&PARAMS.load(deps.storage)?);

    match msg {
        ExecuteMsg::CreatePool { pool } => {
            manager::commands::create_pool(deps, env, info, &manager, pool)
        }
        ExecuteMsg::CreateConcentratedPoolAsPoolManager { contract_address } => {
            manager::commands::create_concentrated_pool_as_pool_manager(
                deps,
                env,
                info,
                &manager,
                contract_address,
            )
        }
        ExecuteMsg::SwapExactAmountIn {
            routes,
            token_out_min_amount,
        } => router::commands::swap_exact_amount_in(
            deps,
            env,
            info,
            &manager,
            routes,
            token_out_min_amount,
        ),
        ExecuteMsg::SwapExactAmountOut { routes, token_out } => {
            router::commands::swap_exact_amount_out(deps, env, info, &manager, routes, token_out)
        }
        ExecuteMsg::SplitRouteSwapExactAmountIn {
            routes,
            token_in_denom,
            token_out_min_amount,
        } => router::commands::split_route_swap_exact_amount_in(
            deps,
            env,
            info,
            &manager,
            routes,
            token_in_denom,
            token_out_min_amount,
        ),
        ExecuteMsg::SplitRouteSwapExactAmountOut {
            routes,
            token_out_denom,
        } => router::commands::split_route_swap_exact_amount_out(
            deps,
            env,
            info,
            &manager,
            routes,
            token_out_denom,
        ),
        ExecuteMsg::SwapExactAmountInNoTakerFee {
            pool_id,
            token_out_denom,
            token_out_min_amount,
        } => router::commands::swap_exact_amount_in_no_taker_fee(
            deps,
            env,
            info,
            &manager,
            pool_id,
            token_out_denom,
            token_out_min_amount,
        ),
        ExecuteMsg::SetDenomPairTakerFee {
            denom_pair_taker_fees,
        } => taker_fee::commands::set_denom_pair_taker_fees(deps, info, denom_pair_taker_fees),
        ExecuteMsg::SetTakerFeeShareAgreementForDenom {
            denom,
            skim_percent,
            skim_address,
        } => taker_fee_share::commands::set_taker_fee_share_agreement_for_denom(
            deps,
            info,
            &manager,
            denom,
            skim_percent,
            skim_address,
        ),
        ExecuteMsg::SetRegisteredAlloyedPool { pool_id } => {
            taker_fee_share::commands::set_registered_alloyed_pool(deps, info, &manager, pool_id)
        }
        ExecuteMsg::RecalculateAlloyedPool { pool_id } => {
            taker_fee_share::commands::execute_recalculate_alloyed_pool(deps, &manager, pool_id)
        }
        ExecuteMsg::UpdateParams {
            pool_creation_fee,
            taker_fee_params,
            authorized_quote_denoms,
            taker_fee_collector,
            community_pool,
            incentives,
            unrestricted_pool_creators,
        } => manager::update_params(
            deps,
            info,
            pool_creation_fee,
            taker_fee_params,
            authorized_quote_denoms,
            taker_fee_collector,
            community_pool,
            incentives,
            unrestricted_pool_creators,
        ),
        ExecuteMsg::UpdateOwnership(action) => {
            Ok(
                cw_ownable::update_ownership(deps, &env.block, &info.sender, action).map(
                    |ownership| {
                        Response::default()
                            .add_attribute("action", "update_ownership")
                            .add_attributes(ownership.into_attributes())
                    },
                )?,
            )
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn sudo(deps: DepsMut, _env: Env, msg: SudoMsg) -> Result<Response, ContractError> {
    let manager = PoolManager::from_params(&PARAMS.load(deps.storage)?);

    match msg {
        SudoMsg::BeginBlock {} => {
            let (agreements, alloyed_pools) =
                manager.with_taker_fee_share_cache(deps.storage, |cache| {
                    (cache.agreements.len(), cache.alloyed_pool_ids.len())
                })?;

            Ok(Response::default().add_attributes(vec![
                ("action", "begin_block".to_string()),
                ("taker_fee_share_agreements", agreements.to_string()),
                ("registered_alloyed_pools", alloyed_pools.to_string()),
            ]))
        }
        SudoMsg::EndBlock { changed_pool_ids } => {
            taker_fee_share::commands::recalculate_changed_alloyed_pools(
                deps,
                &manager,
                changed_pool_ids,
            )
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let manager = PoolManager::from_params(&PARAMS.load(deps.storage)?);

    match msg {
        QueryMsg::Params {} => Ok(to_json_binary(&queries::query_params(deps)?)?),
        QueryMsg::NumPools {} => Ok(to_json_binary(&queries::query_num_pools(deps)?)?),
        QueryMsg::PoolType { pool_id } => Ok(to_json_binary(&queries::query_pool_type(
            deps, &manager, pool_id,
        )?)?),
        QueryMsg::Pool { pool_id } => Ok(to_json_binary(&queries::query_pool(
            deps, &manager, pool_id,
        )?)?),
        QueryMsg::AllPools { start_after, limit } => Ok(to_json_binary(
            &queries::query_all_pools(deps, &manager, start_after, limit)?,
        )?),
        QueryMsg::ListPoolsByDenom {
            denom,
            start_after,
            limit,
        } => Ok(to_json_binary(&queries::query_list_pools_by_denom(
            deps,
            &manager,
            denom,
            start_after,
            limit,
        )?)?),
        QueryMsg::PoolDenoms { pool_id } => Ok(to_json_binary(&queries::query_pool_denoms(
            deps, &manager, pool_id,
        )?)?),
        QueryMsg::SpotPrice {
            pool_id,
            quote_asset_denom,
            base_asset_denom,
        } => Ok(to_json_binary(&queries::query_spot_price(
            deps,
            &manager,
            pool_id,
            quote_asset_denom,
            base_asset_denom,
        )?)?),
        QueryMsg::TotalPoolLiquidity { pool_id } => Ok(to_json_binary(
            &queries::query_total_pool_liquidity(deps, &manager, pool_id)?,
        )?),
        QueryMsg::TotalLiquidity { start_after, limit } => Ok(to_json_binary(
            &queries::query_total_liquidity(deps, &manager, start_after, limit)?,
        )?),
        QueryMsg::EstimateSwapExactAmountIn { routes, token_in } => Ok(to_json_binary(
            &queries::query_estimate_swap_exact_amount_in(deps, &manager, routes, token_in, true)?,
        )?),
        QueryMsg::EstimateSwapExactAmountInWithoutTakerFee { routes, token_in } => {
            Ok(to_json_binary(
                &queries::query_estimate_swap_exact_amount_in(
                    deps, &manager, routes, token_in, false,
                )?,
            )?)
        }
        QueryMsg::EstimateSwapExactAmountOut { routes, token_out } => Ok(to_json_binary(
            &queries::query_estimate_swap_exact_amount_out(deps, &manager, routes, token_out)?,
        )?),
        QueryMsg::TradingPairTakerFee { denom0, denom1 } => Ok(to_json_binary(
            &queries::query_trading_pair_taker_fee(deps, denom0, denom1)?,
        )?),
        QueryMsg::AllDenomPairTakerFees { start_after, limit } => Ok(to_json_binary(
            &queries::query_all_denom_pair_taker_fees(deps, start_after, limit)?,
        )?),
        QueryMsg::TakerFeeTrackers {} => {
            Ok(to_json_binary(&queries::query_taker_fee_trackers(deps)?)?)
        }
        QueryMsg::TakerFeeShareAgreement { denom } => Ok(to_json_binary(
            &queries::query_taker_fee_share_agreement(deps, denom)?,
        )?),
        QueryMsg::AllTakerFeeShareAgreements {} => Ok(to_json_binary(
            &queries::query_all_taker_fee_share_agreements(deps)?,
        )?),
        QueryMsg::RegisteredAlloyedPool { pool_id } => Ok(to_json_binary(
            &queries::query_registered_alloyed_pool(deps, pool_id)?,
        )?),
        QueryMsg::AllRegisteredAlloyedPools { start_after, limit } => Ok(to_json_binary(
            &queries::query_all_registered_alloyed_pools(deps, start_after, limit)?,
        )?),
        QueryMsg::TakerFeeShareAccumulators { denom } => Ok(to_json_binary(
            &queries::query_taker_fee_share_accumulators(deps, denom)?,
        )?),
        QueryMsg::PoolVolume { pool_id } => {
            Ok(to_json_binary(&queries::query_pool_volume(deps, pool_id)?)?)
        }
        QueryMsg::Ownership {} => Ok(to_json_binary(&cw_ownable::get_ownership(deps.storage)?)?),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    use poolmanager_std::migrate_guards::check_contract_name;

    check_contract_name(deps.storage, CONTRACT_NAME)?;

    let version: Version = CONTRACT_VERSION.parse()?;
    let storage_version: Version = get_contract_version(deps.storage)?.version.parse()?;

    if storage_version >= version {
        return Err(ContractError::MigrateInvalidVersion {
            current_version: storage_version,
            new_version: version,
        });
    }

    // community pool whitelist was introduced in 1.1.0, seeded from the quote denoms
    if storage_version < Version::new(1, 1, 0) {
        PARAMS.update(deps.storage, |mut params| -> Result<_, ContractError> {
            params.taker_fee_params.community_pool_denom_whitelist =
                params.authorized_quote_denoms.clone();
            Ok(params)
        })?;
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::default().add_attributes(vec![
        ("action", "migrate".to_string()),
        ("from_version", storage_version.to_string()),
        ("to_version", version.to_string()),
    ]))
}
