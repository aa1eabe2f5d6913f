use cosmwasm_std::{Decimal, Decimal256, Uint128, Uint256};

use crate::error::ContractError;
use crate::math::{div_decimal_ceil, multiply_ratio_ceil, Decimal256Helper};

/// The amount of iterations to perform when calculating the Newton-Raphson approximation.
const NEWTON_ITERATIONS: u64 = 32;

// the number of assets in a stableswap pool
const N_COINS: Uint256 = Uint256::from_u128(2);

/// Constant product output for an equal weight pool. The spread factor is charged on the input.
///
/// `out = reserve_out * in_after_fee / (reserve_in + in_after_fee)`, rounded down.
pub fn balancer_out_given_in(
    reserve_in: Uint128,
    reserve_out: Uint128,
    amount_in: Uint128,
    spread_factor: Decimal,
) -> Result<Uint128, ContractError> {
    let amount_in_after_fee = amount_in * (Decimal::one() - spread_factor);

    Ok(reserve_out.checked_multiply_ratio(
        amount_in_after_fee,
        reserve_in.checked_add(amount_in_after_fee)?,
    )?)
}

/// Constant product input required to take `amount_out` out of an equal weight pool, grossed up
/// by the spread factor. Rounded up.
pub fn balancer_in_given_out(
    pool_id: u64,
    reserve_in: Uint128,
    reserve_out: Uint128,
    amount_out: Uint128,
    spread_factor: Decimal,
) -> Result<Uint128, ContractError> {
    if amount_out >= reserve_out {
        return Err(ContractError::InsufficientLiquidity { pool_id });
    }

    let amount_in_after_fee =
        multiply_ratio_ceil(reserve_in, amount_out, reserve_out.checked_sub(amount_out)?)?;

    div_decimal_ceil(amount_in_after_fee, Decimal::one() - spread_factor)
}

/// Price of `base` in `quote` units for an equal weight pool.
pub fn balancer_spot_price(
    reserve_quote: Uint128,
    reserve_base: Uint128,
) -> Result<Decimal, ContractError> {
    Ok(Decimal::checked_from_ratio(reserve_quote, reserve_base)?)
}

fn calculate_stableswap_d(
    offer_pool: Decimal256,
    ask_pool: Decimal256,
    amp: &u64,
    precision: u8,
) -> Result<Decimal256, ContractError> {
    let n_coins = Decimal256::from_ratio(N_COINS, Uint256::from_u128(1));

    let sum_pools = offer_pool.checked_add(ask_pool)?;
    if sum_pools.is_zero() {
        // there was nothing to swap, return `0`.
        return Ok(Decimal256::zero());
    }

    // ann = amp * n_coins
    let ann = Decimal256::from_ratio(Uint256::from_u128((*amp).into()).checked_mul(N_COINS)?, 1u8);

    // perform Newton-Raphson method
    let mut current_d = sum_pools;
    for _ in 0..NEWTON_ITERATIONS {
        // multiply each pool by the number of coins
        // and multiply together
        let new_d = [offer_pool, ask_pool]
            .into_iter()
            .try_fold::<_, _, Result<_, ContractError>>(current_d, |acc, pool| {
                let mul_pools = pool.checked_mul(n_coins)?;
                acc.checked_multiply_ratio(current_d, mul_pools)
            })?;

        let old_d = current_d;
        // current_d = ((ann * sum_pools + new_d * n_coins) * current_d) / ((ann - 1) * current_d + (n_coins + 1) * new_d)
        current_d = (ann
            .checked_mul(sum_pools)?
            .checked_add(new_d.checked_mul(n_coins)?)?
            .checked_mul(current_d)?)
        .checked_div(
            ann.checked_sub(Decimal256::one())?
                .checked_mul(current_d)?
                .checked_add(n_coins.checked_add(Decimal256::one())?.checked_mul(new_d)?)?,
        )?;

        let tolerance = Decimal256::decimal_with_precision(1u8, precision)?;
        let delta = if current_d >= old_d {
            current_d.checked_sub(old_d)?
        } else {
            old_d.checked_sub(current_d)?
        };
        if delta <= tolerance {
            return Ok(current_d);
        }
    }

    // completed iterations
    // but we never approximated correctly
    Err(ContractError::ConvergeError {})
}

/// Determines the direction of `offer_pool` -> `ask_pool`.
///
/// In a `ReverseSimulate`, the known pool is the ask pool minus the amount, and the solved value
/// is the new offer pool.
///
/// In a `Simulate`, the known pool is the offer pool plus the amount, and the solved value is
/// the new ask pool.
pub enum StableSwapDirection {
    Simulate,
    ReverseSimulate,
}

/// Calculates the new pool amount given the current pools and swap size, expressed with
/// `result_precision` decimals.
pub fn calculate_stableswap_y(
    offer_pool: Decimal256,
    ask_pool: Decimal256,
    amount: Decimal256,
    amp: &u64,
    result_precision: u8,
    direction: StableSwapDirection,
) -> Result<Uint128, ContractError> {
    let ann = Uint256::from_u128((*amp).into()).checked_mul(N_COINS)?;

    let d = calculate_stableswap_d(offer_pool, ask_pool, amp, result_precision)?
        .to_uint256_with_precision(u32::from(result_precision))?;

    let pool_sum = match direction {
        StableSwapDirection::Simulate => offer_pool.checked_add(amount)?,
        StableSwapDirection::ReverseSimulate => ask_pool.checked_sub(amount)?,
    }
    .to_uint256_with_precision(u32::from(result_precision))?;

    let c = d
        .checked_multiply_ratio(d, pool_sum.checked_mul(N_COINS)?)?
        .checked_multiply_ratio(d, ann.checked_mul(N_COINS)?)?;

    let b = pool_sum.checked_add(d.checked_div(ann)?)?;

    // attempt to converge solution using Newton-Raphson method
    let mut y = d;
    for _ in 0..NEWTON_ITERATIONS {
        let previous_y = y;
        // y = (y^2 + c) / (2y + b - d)
        y = y
            .checked_mul(y)?
            .checked_add(c)?
            .checked_div(y.checked_add(y)?.checked_add(b)?.checked_sub(d)?)?;

        let delta = if y >= previous_y {
            y.checked_sub(previous_y)?
        } else {
            previous_y.checked_sub(y)?
        };
        if delta <= Uint256::one() {
            return y
                .try_into()
                .map_err(|_| ContractError::SwapOverflowError {});
        }
    }

    Err(ContractError::ConvergeError {})
}

/// Reserves and decimals of the two sides of a stableswap trade.
pub struct StableswapSides {
    pub offer_pool: Uint128,
    pub offer_precision: u8,
    pub ask_pool: Uint128,
    pub ask_precision: u8,
    pub amp: u64,
}

/// Stableswap output for `amount_in`, spread factor charged on the input.
pub fn stableswap_out_given_in(
    sides: &StableswapSides,
    amount_in: Uint128,
    spread_factor: Decimal,
) -> Result<Uint128, ContractError> {
    let amount_in_after_fee = amount_in * (Decimal::one() - spread_factor);

    let offer_pool = Decimal256::decimal_with_precision(sides.offer_pool, sides.offer_precision)?;
    let ask_pool = Decimal256::decimal_with_precision(sides.ask_pool, sides.ask_precision)?;
    let offer_amount =
        Decimal256::decimal_with_precision(amount_in_after_fee, sides.offer_precision)?;

    let new_ask_pool = calculate_stableswap_y(
        offer_pool,
        ask_pool,
        offer_amount,
        &sides.amp,
        sides.ask_precision,
        StableSwapDirection::Simulate,
    )?;

    Ok(sides.ask_pool.saturating_sub(new_ask_pool))
}

/// Stableswap input needed for `amount_out`, grossed up by the spread factor.
pub fn stableswap_in_given_out(
    pool_id: u64,
    sides: &StableswapSides,
    amount_out: Uint128,
    spread_factor: Decimal,
) -> Result<Uint128, ContractError> {
    if amount_out >= sides.ask_pool {
        return Err(ContractError::InsufficientLiquidity { pool_id });
    }

    let offer_pool = Decimal256::decimal_with_precision(sides.offer_pool, sides.offer_precision)?;
    let ask_pool = Decimal256::decimal_with_precision(sides.ask_pool, sides.ask_precision)?;
    let ask_amount = Decimal256::decimal_with_precision(amount_out, sides.ask_precision)?;

    let new_offer_pool = calculate_stableswap_y(
        offer_pool,
        ask_pool,
        ask_amount,
        &sides.amp,
        sides.offer_precision,
        StableSwapDirection::ReverseSimulate,
    )?;

    let amount_in_after_fee = new_offer_pool.checked_sub(sides.offer_pool)?;
    div_decimal_ceil(amount_in_after_fee, Decimal::one() - spread_factor)
}

/// Marginal stableswap price of one `offer` unit in `ask` units, sampled with a trade of a
/// millionth of the offer reserve.
pub fn stableswap_spot_price(sides: &StableswapSides) -> Result<Decimal, ContractError> {
    let sample = std::cmp::max(
        sides.offer_pool.checked_div(Uint128::new(1_000_000))?,
        Uint128::one(),
    );
    let out = stableswap_out_given_in(sides, sample, Decimal::zero())?;

    Ok(Decimal::checked_from_ratio(out, sample)?)
}
