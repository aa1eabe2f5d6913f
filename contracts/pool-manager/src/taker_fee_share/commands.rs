use cosmwasm_std::{ensure, Addr, Decimal, Deps, DepsMut, Event, MessageInfo, Response};
use poolmanager_std::cosmwasm_pool::{
    GetShareDenomResponse, ListAssetConfigsResponse, PoolQueryMsg, TotalPoolLiquidityResponse,
};
use poolmanager_std::denom::validate_denom;
use poolmanager_std::pool_manager::{
    AlloyContractTakerFeeShareState, PoolType, RegisteredAlloyedPool, TakerFeeShareAgreement,
};

use crate::registry::PoolManager;
use crate::state::{get_registered_alloyed_pool, REGISTERED_ALLOYED_POOLS};
use crate::taker_fee_share::snapshot::compute_alloyed_taker_fee_share;
use crate::ContractError;

/// Sets the taker fee share agreement of a denom and recalculates every registered alloyed
/// pool holding it.
pub fn set_taker_fee_share_agreement_for_denom(
    mut deps: DepsMut,
    info: MessageInfo,
    manager: &PoolManager,
    denom: String,
    skim_percent: Decimal,
    skim_address: String,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    validate_denom(&denom)?;
    ensure!(
        skim_percent <= Decimal::one(),
        ContractError::InvalidSkimPercent { skim_percent }
    );

    let agreement = TakerFeeShareAgreement {
        denom,
        skim_percent,
        skim_address: deps.api.addr_validate(&skim_address)?,
    };
    manager.save_taker_fee_share_agreement(deps.storage, &agreement)?;

    let pool_ids =
        manager.with_taker_fee_share_cache(deps.storage, |cache| cache.alloyed_pool_ids.clone())?;
    for pool_id in pool_ids {
        let pool_denoms = manager
            .get_pool_module(deps.storage, pool_id)?
            .get_pool_denoms(deps.as_ref(), pool_id)?;
        if pool_denoms.contains(&agreement.denom) {
            recalculate_alloyed_pool(deps.branch(), manager, pool_id)?;
        }
    }

    Ok(Response::default()
        .add_attribute("action", "set_taker_fee_share_agreement_for_denom")
        .add_event(
            Event::new("taker_fee_share_agreement")
                .add_attribute("denom", agreement.denom)
                .add_attribute("skim_percent", agreement.skim_percent.to_string())
                .add_attribute("skim_address", agreement.skim_address),
        ))
}

/// Registers a programmable pool as an alloyed asset pool and takes the first snapshot of its
/// taker fee share composition.
pub fn set_registered_alloyed_pool(
    deps: DepsMut,
    info: MessageInfo,
    manager: &PoolManager,
    pool_id: u64,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let pool_type = manager.get_pool_type(deps.storage, pool_id)?;
    ensure!(
        pool_type == PoolType::CosmWasm,
        ContractError::NotCosmWasmPool { pool_id, pool_type }
    );

    let contract_address = manager.get_pool(deps.as_ref(), pool_id)?.address;
    let alloyed_denom = query_alloyed_denom(deps.as_ref(), &contract_address)?;
    let state = snapshot_alloyed_pool(deps.as_ref(), manager, pool_id, contract_address)?;

    // the share denom may have changed since the pool was last registered
    if let Some(stale) = get_registered_alloyed_pool(deps.storage, pool_id)? {
        REGISTERED_ALLOYED_POOLS.remove(deps.storage, stale.alloyed_denom)?;
    }

    let registered = RegisteredAlloyedPool {
        pool_id,
        alloyed_denom,
        state,
    };
    REGISTERED_ALLOYED_POOLS.save(deps.storage, registered.alloyed_denom.clone(), &registered)?;
    manager.cache_alloyed_pool(&registered);

    Ok(Response::default()
        .add_attribute("action", "set_registered_alloyed_pool")
        .add_event(
            Event::new("registered_alloyed_pool")
                .add_attribute("pool_id", pool_id.to_string())
                .add_attribute("alloyed_denom", registered.alloyed_denom),
        ))
}

/// Recomputes the snapshot of a registered alloyed pool, e.g. after its liquidity changed.
pub fn recalculate_alloyed_pool(
    deps: DepsMut,
    manager: &PoolManager,
    pool_id: u64,
) -> Result<(), ContractError> {
    let mut registered = get_registered_alloyed_pool(deps.storage, pool_id)?
        .ok_or(ContractError::NoRegisteredAlloyedPool { pool_id })?;

    registered.state = snapshot_alloyed_pool(
        deps.as_ref(),
        manager,
        pool_id,
        registered.state.contract_address.clone(),
    )?;
    REGISTERED_ALLOYED_POOLS.save(deps.storage, registered.alloyed_denom.clone(), &registered)?;
    manager.cache_alloyed_pool(&registered);

    Ok(())
}

pub fn execute_recalculate_alloyed_pool(
    deps: DepsMut,
    manager: &PoolManager,
    pool_id: u64,
) -> Result<Response, ContractError> {
    recalculate_alloyed_pool(deps, manager, pool_id)?;

    Ok(Response::default().add_attributes(vec![
        ("action", "recalculate_alloyed_pool".to_string()),
        ("pool_id", pool_id.to_string()),
    ]))
}

/// Recalculates the registered alloyed pools among the pools whose liquidity changed.
pub fn recalculate_changed_alloyed_pools(
    mut deps: DepsMut,
    manager: &PoolManager,
    changed_pool_ids: Vec<u64>,
) -> Result<Response, ContractError> {
    let registered = manager.with_taker_fee_share_cache(deps.storage, |cache| {
        cache.alloyed_pool_ids.clone()
    })?;

    let mut recalculated = vec![];
    for pool_id in changed_pool_ids {
        if registered.contains(&pool_id) && !recalculated.contains(&pool_id) {
            recalculate_alloyed_pool(deps.branch(), manager, pool_id)?;
            recalculated.push(pool_id);
        }
    }

    Ok(Response::default().add_attributes(vec![
        ("action", "end_block".to_string()),
        ("recalculated_alloyed_pools", recalculated.len().to_string()),
    ]))
}

/// Queries the share denom of an alloyed pool and checks it is
/// `factory/<contract address>/alloyed/<subdenom>`.
pub fn query_alloyed_denom(deps: Deps, contract_address: &Addr) -> Result<String, ContractError> {
    let response: GetShareDenomResponse = deps
        .querier
        .query_wasm_smart(contract_address, &PoolQueryMsg::GetShareDenom {})?;

    validate_alloyed_denom(&response.share_denom, contract_address)?;
    Ok(response.share_denom)
}

pub fn validate_alloyed_denom(denom: &str, contract_address: &Addr) -> Result<(), ContractError> {
    let parts: Vec<&str> = denom.split('/').collect();
    let [prefix, contract, namespace, _subdenom] = parts.as_slice() else {
        return Err(ContractError::InvalidAlloyedDenomFormat {
            denom: denom.to_string(),
        });
    };

    ensure!(
        *prefix == "factory",
        ContractError::InvalidAlloyedDenomPartPrefix {
            denom: denom.to_string(),
            part: prefix.to_string(),
        }
    );
    ensure!(
        *contract == contract_address.as_str(),
        ContractError::InvalidAlloyedDenomPartContract {
            denom: denom.to_string(),
            expected: contract_address.to_string(),
            part: contract.to_string(),
        }
    );
    ensure!(
        *namespace == "alloyed",
        ContractError::InvalidAlloyedDenomPartAlloyed {
            denom: denom.to_string(),
            part: namespace.to_string(),
        }
    );

    Ok(())
}

fn snapshot_alloyed_pool(
    deps: Deps,
    manager: &PoolManager,
    pool_id: u64,
    contract_address: Addr,
) -> Result<AlloyContractTakerFeeShareState, ContractError> {
    let liquidity: TotalPoolLiquidityResponse = deps
        .querier
        .query_wasm_smart(&contract_address, &PoolQueryMsg::GetTotalPoolLiquidity {})?;
    let asset_configs: ListAssetConfigsResponse = deps
        .querier
        .query_wasm_smart(&contract_address, &PoolQueryMsg::ListAssetConfigs {})?;

    manager.with_taker_fee_share_cache(deps.storage, |cache| {
        compute_alloyed_taker_fee_share(
            pool_id,
            &contract_address,
            &liquidity.total_pool_liquidity,
            &asset_configs.asset_configs,
            |denom| cache.agreements.get(denom),
        )
    })?
}
