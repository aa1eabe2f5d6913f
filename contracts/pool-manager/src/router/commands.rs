use cosmwasm_std::{
    coin, ensure, BankMsg, Coin, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response, Uint128,
};
use poolmanager_std::routes::{
    validate_swap_amount_in_split_route, validate_swap_amount_out_split_route, RouteError,
    SwapAmountInRoute, SwapAmountInSplitRoute, SwapAmountOutRoute, SwapAmountOutSplitRoute,
};

use crate::registry::PoolManager;
use crate::state::PARAMS;
use crate::ContractError;

/// Swaps the sent coin through `routes` and sends the output to the sender.
pub fn swap_exact_amount_in(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    manager: &PoolManager,
    routes: Vec<SwapAmountInRoute>,
    token_out_min_amount: Uint128,
) -> Result<Response, ContractError> {
    let token_in = cw_utils::one_coin(&info)?;
    let token_out_denom = routes
        .last()
        .ok_or(RouteError::EmptyRoutes)?
        .token_out_denom
        .clone();

    let execution = manager.route_exact_amount_in(
        deps,
        &env,
        &info.sender,
        &routes,
        token_in.clone(),
        token_out_min_amount,
    )?;
    let token_out = coin(execution.amount.u128(), token_out_denom);

    Ok(Response::default()
        .add_messages(execution.messages)
        .add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![token_out.clone()],
        })
        .add_attributes(vec![
            ("action", "swap_exact_amount_in".to_string()),
            ("sender", info.sender.to_string()),
            ("token_in", token_in.to_string()),
            ("token_out", token_out.to_string()),
        ]))
}

/// Buys `token_out` with at most the sent coin, refunding what is left.
pub fn swap_exact_amount_out(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    manager: &PoolManager,
    routes: Vec<SwapAmountOutRoute>,
    token_out: Coin,
) -> Result<Response, ContractError> {
    let token_in_denom = routes
        .first()
        .ok_or(RouteError::EmptyRoutes)?
        .token_in_denom
        .clone();
    let token_in_max_amount = cw_utils::must_pay(&info, &token_in_denom)?;

    let execution = manager.route_exact_amount_out(
        deps,
        &env,
        &info.sender,
        &routes,
        token_in_max_amount,
        token_out.clone(),
    )?;

    let mut messages = execution.messages;
    messages.push(
        BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![token_out.clone()],
        }
        .into(),
    );
    messages.extend(refund(
        &info,
        &token_in_denom,
        token_in_max_amount.checked_sub(execution.amount)?,
    ));

    Ok(Response::default().add_messages(messages).add_attributes(vec![
        ("action", "swap_exact_amount_out".to_string()),
        ("sender", info.sender.to_string()),
        (
            "token_in",
            coin(execution.amount.u128(), token_in_denom).to_string(),
        ),
        ("token_out", token_out.to_string()),
    ]))
}

/// Runs every leg of a split exact amount in swap and sends the summed output to the sender.
pub fn split_route_swap_exact_amount_in(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    manager: &PoolManager,
    routes: Vec<SwapAmountInSplitRoute>,
    token_in_denom: String,
    token_out_min_amount: Uint128,
) -> Result<Response, ContractError> {
    validate_swap_amount_in_split_route(&routes)?;

    let paid = cw_utils::must_pay(&info, &token_in_denom)?;
    let total_in = routes
        .iter()
        .try_fold(Uint128::zero(), |total, route| {
            total.checked_add(route.token_in_amount)
        })?;
    ensure!(
        total_in == paid,
        ContractError::FundsMismatch {
            denom: token_in_denom,
            expected: total_in,
            actual: paid,
        }
    );

    let token_out_denom = routes[0].pools[routes[0].pools.len() - 1]
        .token_out_denom
        .clone();

    let mut messages: Vec<CosmosMsg> = vec![];
    let mut total_out = Uint128::zero();
    for route in &routes {
        let execution = manager.route_exact_amount_in(
            deps.branch(),
            &env,
            &info.sender,
            &route.pools,
            coin(route.token_in_amount.u128(), &token_in_denom),
            Uint128::zero(),
        )?;
        messages.extend(execution.messages);
        total_out = total_out.checked_add(execution.amount)?;
    }

    ensure!(!total_out.is_zero(), ContractError::FinalAmountIsNotPositive {});
    ensure!(
        total_out >= token_out_min_amount,
        ContractError::PriceImpactProtectionExactIn {
            min: token_out_min_amount,
            actual: total_out,
        }
    );

    messages.push(
        BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![coin(total_out.u128(), &token_out_denom)],
        }
        .into(),
    );

    Ok(Response::default()
        .add_messages(messages)
        .add_attribute("action", "split_route_swap_exact_amount_in")
        .add_event(
            Event::new("split_route_swap_exact_amount_in")
                .add_attribute("sender", info.sender.to_string())
                .add_attribute("token_in_denom", token_in_denom)
                .add_attribute("token_in_amount", paid.to_string())
                .add_attribute("token_out_denom", token_out_denom)
                .add_attribute("token_out_amount", total_out.to_string()),
        ))
}

/// Runs every leg of a split exact amount out swap, paying with the sent coin and refunding
/// what is left.
pub fn split_route_swap_exact_amount_out(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    manager: &PoolManager,
    routes: Vec<SwapAmountOutSplitRoute>,
    token_out_denom: String,
) -> Result<Response, ContractError> {
    validate_swap_amount_out_split_route(&routes)?;

    let token_in_denom = routes[0].pools[0].token_in_denom.clone();
    let paid = cw_utils::must_pay(&info, &token_in_denom)?;

    let mut messages: Vec<CosmosMsg> = vec![];
    let mut total_in = Uint128::zero();
    let mut total_out = Uint128::zero();
    for route in &routes {
        let execution = manager.route_exact_amount_out(
            deps.branch(),
            &env,
            &info.sender,
            &route.pools,
            Uint128::MAX,
            coin(route.token_out_amount.u128(), &token_out_denom),
        )?;
        messages.extend(execution.messages);
        total_in = total_in.checked_add(execution.amount)?;
        total_out = total_out.checked_add(route.token_out_amount)?;
    }

    ensure!(!total_in.is_zero(), ContractError::FinalAmountIsNotPositive {});
    ensure!(
        total_in <= paid,
        ContractError::PriceImpactProtectionExactOut {
            max: paid,
            actual: total_in,
        }
    );

    messages.push(
        BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![coin(total_out.u128(), &token_out_denom)],
        }
        .into(),
    );
    messages.extend(refund(&info, &token_in_denom, paid.checked_sub(total_in)?));

    Ok(Response::default()
        .add_messages(messages)
        .add_attribute("action", "split_route_swap_exact_amount_out")
        .add_event(
            Event::new("split_route_swap_exact_amount_out")
                .add_attribute("sender", info.sender.to_string())
                .add_attribute("token_in_denom", token_in_denom)
                .add_attribute("token_in_amount", total_in.to_string())
                .add_attribute("token_out_denom", token_out_denom)
                .add_attribute("token_out_amount", total_out.to_string()),
        ))
}

/// Single pool swap without taker fee, reserved to the taker fee collector.
#[allow(clippy::too_many_arguments)]
pub fn swap_exact_amount_in_no_taker_fee(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    manager: &PoolManager,
    pool_id: u64,
    token_out_denom: String,
    token_out_min_amount: Uint128,
) -> Result<Response, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    ensure!(
        info.sender == params.taker_fee_collector,
        ContractError::Unauthorized {}
    );

    let token_in = cw_utils::one_coin(&info)?;
    ensure!(token_in.denom != token_out_denom, ContractError::SameAsset {});

    let hops = manager.resolve_hops(
        deps.as_ref(),
        &[pool_id],
        &[],
        &token_in.denom,
        &token_out_denom,
    )?;
    let hop = &hops[0];

    let outcome = hop.module.swap_exact_amount_in(
        deps.branch(),
        &env,
        &hop.pool,
        &token_in,
        &token_out_denom,
        token_out_min_amount,
        hop.spread_factor,
    )?;
    manager.track_volume(deps.branch(), pool_id, &token_in)?;

    let token_out = coin(outcome.amount.u128(), token_out_denom);
    Ok(Response::default()
        .add_messages(outcome.messages)
        .add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![token_out.clone()],
        })
        .add_attributes(vec![
            ("action", "swap_exact_amount_in_no_taker_fee".to_string()),
            ("pool_id", pool_id.to_string()),
            ("token_in", token_in.to_string()),
            ("token_out", token_out.to_string()),
        ]))
}

fn refund(info: &MessageInfo, denom: &str, amount: Uint128) -> Option<CosmosMsg> {
    if amount.is_zero() {
        return None;
    }

    Some(
        BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![coin(amount.u128(), denom)],
        }
        .into(),
    )
}
