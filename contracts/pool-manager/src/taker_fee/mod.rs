use cosmwasm_std::{Addr, BankMsg, Coin, CosmosMsg, Decimal, Storage, Uint128};
use poolmanager_std::denom::canonical_pair;
use poolmanager_std::pool_manager::{Params, BASE_DENOM};
use poolmanager_std::taker_fee::{
    calc_taker_fee_exact_in, calc_taker_fee_exact_out, validate_taker_fee,
};

use crate::state::{
    increase_coin, DENOM_PAIR_TAKER_FEE, PARAMS, TAKER_FEES_FOR_COMMUNITY_POOL,
    TAKER_FEES_FOR_STAKERS,
};
use crate::ContractError;

pub mod commands;

/// Outcome of charging the taker fee on a swap input.
#[derive(Debug, PartialEq)]
pub struct TakerFeeCharge {
    /// For exact in swaps, what is left to swap. For exact out swaps, the input grossed up by
    /// the fee.
    pub token: Coin,
    /// The fee collected, zero when the sender is whitelisted.
    pub fee: Coin,
    /// Transfer of the fee to the taker fee collector.
    pub message: Option<CosmosMsg>,
}

/// Returns the taker fee of a pair, the pair override if any, the default otherwise.
pub fn get_trading_pair_taker_fee(
    storage: &dyn Storage,
    denom0: &str,
    denom1: &str,
) -> Result<Decimal, ContractError> {
    let pair = canonical_pair(denom0, denom1);
    match DENOM_PAIR_TAKER_FEE.may_load(storage, pair)? {
        Some(taker_fee) => Ok(taker_fee),
        None => Ok(PARAMS.load(storage)?.taker_fee_params.default_taker_fee),
    }
}

/// Sets the taker fee of a pair. Setting the default fee removes the override instead.
pub fn set_denom_pair_taker_fee(
    storage: &mut dyn Storage,
    denom0: &str,
    denom1: &str,
    taker_fee: Decimal,
) -> Result<(), ContractError> {
    validate_taker_fee(taker_fee).map_err(|_| ContractError::InvalidTakerFee { taker_fee })?;

    let pair = canonical_pair(denom0, denom1);
    let default_taker_fee = PARAMS.load(storage)?.taker_fee_params.default_taker_fee;
    if taker_fee == default_taker_fee {
        DENOM_PAIR_TAKER_FEE.remove(storage, pair);
    } else {
        DENOM_PAIR_TAKER_FEE.save(storage, pair, &taker_fee)?;
    }

    Ok(())
}

/// Charges the taker fee on `token_in`, sends it to the collector and books it in the staker
/// and community pool trackers.
///
/// Whitelisted senders skip the fee entirely, `token_in` is returned untouched.
pub fn charge_taker_fee(
    storage: &mut dyn Storage,
    params: &Params,
    token_in: &Coin,
    token_out_denom: &str,
    sender: &Addr,
    exact_in: bool,
) -> Result<TakerFeeCharge, ContractError> {
    let whitelisted = params
        .taker_fee_params
        .reduced_fee_whitelist
        .iter()
        .any(|address| address == sender.as_str());
    if whitelisted {
        return Ok(TakerFeeCharge {
            token: token_in.clone(),
            fee: Coin {
                denom: token_in.denom.clone(),
                amount: Uint128::zero(),
            },
            message: None,
        });
    }

    let taker_fee = get_trading_pair_taker_fee(storage, &token_in.denom, token_out_denom)?;
    let (token, fee) = if exact_in {
        calc_taker_fee_exact_in(token_in, taker_fee)?
    } else {
        calc_taker_fee_exact_out(token_in, taker_fee)?
    };

    if fee.amount.is_zero() {
        return Ok(TakerFeeCharge {
            token,
            fee,
            message: None,
        });
    }

    let distribution = if fee.denom == BASE_DENOM {
        &params.taker_fee_params.osmo_taker_fee_distribution
    } else {
        &params.taker_fee_params.non_osmo_taker_fee_distribution
    };
    let (for_stakers, for_community_pool) = distribution.split(fee.amount)?;
    increase_coin(storage, &TAKER_FEES_FOR_STAKERS, &fee.denom, for_stakers)?;
    increase_coin(
        storage,
        &TAKER_FEES_FOR_COMMUNITY_POOL,
        &fee.denom,
        for_community_pool,
    )?;

    let message = BankMsg::Send {
        to_address: params.taker_fee_collector.to_string(),
        amount: vec![fee.clone()],
    }
    .into();

    Ok(TakerFeeCharge {
        token,
        fee,
        message: Some(message),
    })
}
