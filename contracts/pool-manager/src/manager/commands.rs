use std::collections::BTreeMap;

use cosmwasm_std::{
    ensure, BankMsg, Coin, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response, Uint128,
};
use poolmanager_std::pool_manager::{CreatePoolMsg, PoolInfo};

use crate::registry::PoolManager;
use crate::state::{NEXT_POOL_ID, PARAMS, POOL_ACCOUNTS};
use crate::ContractError;

/// Pool ids must stay representable as a JSON safe integer.
pub const MAX_POOL_ID: u64 = (1 << 53) - 1;

/// Creates a pool from the funds sent by the creator.
///
/// The funds must match the initial liquidity plus the pool creation fee exactly, denom by
/// denom. Creators listed in `unrestricted_pool_creators` don't pay the fee.
pub fn create_pool(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    manager: &PoolManager,
    msg: CreatePoolMsg,
) -> Result<Response, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    let pays_fee = !params.unrestricted_pool_creators.contains(&info.sender);

    let mut required = coin_totals(msg.initial_liquidity())?;
    if pays_fee {
        for fee in &params.pool_creation_fee {
            let total = required.entry(fee.denom.clone()).or_default();
            *total = total.checked_add(fee.amount)?;
        }
    }
    let sent = coin_totals(&info.funds)?;

    for denom in required.keys().chain(sent.keys()) {
        let amount = sent.get(denom).copied().unwrap_or_default();
        let expected = required.get(denom).copied().unwrap_or_default();
        ensure!(
            amount == expected,
            ContractError::InvalidPoolCreationFee {
                denom: denom.clone(),
                amount,
                expected,
            }
        );
    }

    let mut messages: Vec<CosmosMsg> = vec![];
    let creation_fee: Vec<Coin> = params
        .pool_creation_fee
        .iter()
        .filter(|fee| !fee.amount.is_zero())
        .cloned()
        .collect();
    if pays_fee && !creation_fee.is_empty() {
        messages.push(
            BankMsg::Send {
                to_address: params.community_pool.to_string(),
                amount: creation_fee,
            }
            .into(),
        );
    }

    let (pool, init_messages) = create_pool_unchecked(deps, &env, &info, manager, &msg)?;
    messages.extend(init_messages);

    Ok(Response::default()
        .add_messages(messages)
        .add_attribute("action", "create_pool")
        .add_event(pool_created_event(&pool, &info)))
}

/// Registers a concentrated pool on behalf of the pool manager itself, skipping the creation
/// fee.
pub fn create_concentrated_pool_as_pool_manager(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    manager: &PoolManager,
    contract_address: String,
) -> Result<Response, ContractError> {
    ensure!(
        info.sender == env.contract.address,
        ContractError::InvalidPoolCreator {
            creator: info.sender.to_string(),
            expected: env.contract.address.to_string(),
        }
    );

    let msg = CreatePoolMsg::Concentrated { contract_address };
    let (pool, messages) = create_pool_unchecked(deps, &env, &info, manager, &msg)?;

    Ok(Response::default()
        .add_messages(messages)
        .add_attribute("action", "create_concentrated_pool_as_pool_manager")
        .add_event(pool_created_event(&pool, &info)))
}

/// Assigns the next pool id, lets the module build the pool and registers its route.
fn create_pool_unchecked(
    mut deps: DepsMut,
    env: &Env,
    info: &MessageInfo,
    manager: &PoolManager,
    msg: &CreatePoolMsg,
) -> Result<(PoolInfo, Vec<CosmosMsg>), ContractError> {
    let pool_type = msg.pool_type();
    let module = manager
        .module(pool_type)
        .map_err(|_| ContractError::InvalidPoolType { pool_type })?;

    let pool_id = NEXT_POOL_ID.load(deps.storage)?;
    ensure!(
        pool_id <= MAX_POOL_ID,
        ContractError::MaxPoolIdReached { max: MAX_POOL_ID }
    );
    NEXT_POOL_ID.save(deps.storage, &(pool_id + 1))?;

    let pool = module.create_pool(deps.branch(), env, pool_id, msg)?;
    manager.set_pool_route(deps.storage, pool_id, pool_type)?;

    ensure!(
        pool.id == pool_id,
        ContractError::IncorrectPoolId {
            expected: pool_id,
            actual: pool.id,
        }
    );
    let expected_address = module.pool_address(deps.as_ref(), env, pool_id)?;
    ensure!(
        pool.address == expected_address,
        ContractError::IncorrectPoolAddress {
            expected: expected_address.to_string(),
            actual: pool.address.to_string(),
        }
    );

    let messages = module.initialize_pool(deps.branch(), env, &pool, &info.sender)?;
    POOL_ACCOUNTS.save(deps.storage, &pool.address, &pool_id)?;
    manager.refresh_direct_base_routes(deps.branch(), pool_id)?;

    Ok((pool, messages))
}

fn pool_created_event(pool: &PoolInfo, info: &MessageInfo) -> Event {
    Event::new("pool_created")
        .add_attribute("pool_id", pool.id.to_string())
        .add_attribute("pool_type", pool.pool_type.to_string())
        .add_attribute("pool_address", pool.address.to_string())
        .add_attribute("creator", info.sender.to_string())
}

/// Sums coins per denom, ignoring zero amounts.
fn coin_totals(coins: &[Coin]) -> Result<BTreeMap<String, Uint128>, ContractError> {
    let mut totals: BTreeMap<String, Uint128> = BTreeMap::new();
    for coin in coins.iter().filter(|coin| !coin.amount.is_zero()) {
        let total = totals.entry(coin.denom.clone()).or_default();
        *total = total.checked_add(coin.amount)?;
    }
    Ok(totals)
}
