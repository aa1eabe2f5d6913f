use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Coin, Decimal, StdError, StdResult, Uint128, Uint256};

/// How a collected taker fee is split between stakers and the community pool.
#[cw_serde]
pub struct TakerFeeDistributionPercentage {
    pub staking_rewards: Decimal,
    pub community_pool: Decimal,
}

impl TakerFeeDistributionPercentage {
    /// Checks both shares add up to exactly one.
    pub fn validate(&self) -> StdResult<()> {
        if self.staking_rewards.checked_add(self.community_pool)? != Decimal::one() {
            return Err(StdError::generic_err(
                "taker fee distribution must add up to 1",
            ));
        }
        Ok(())
    }

    /// Splits `amount` into its staking rewards and community pool parts. The staking part is
    /// truncated, the community pool receives the remainder so nothing is lost.
    pub fn split(&self, amount: Uint128) -> StdResult<(Uint128, Uint128)> {
        let staking = amount * self.staking_rewards;
        let community = amount.checked_sub(staking)?;
        Ok((staking, community))
    }
}

/// Checks a taker fee lies in `[0, 1)`.
pub fn validate_taker_fee(fee: Decimal) -> StdResult<()> {
    if fee >= Decimal::one() {
        return Err(StdError::generic_err(format!(
            "invalid taker fee {fee}, must be lower than 1"
        )));
    }
    Ok(())
}

/// Charges the fee on an exact amount in swap.
///
/// Returns `(remainder, fee)` where `remainder = floor(amount * (1 - fee))` and
/// `fee = amount - remainder`, so the fee is never rounded in the trader's favour.
pub fn calc_taker_fee_exact_in(token_in: &Coin, taker_fee: Decimal) -> StdResult<(Coin, Coin)> {
    validate_taker_fee(taker_fee)?;

    let remainder = token_in.amount * (Decimal::one() - taker_fee);
    let fee = token_in.amount.checked_sub(remainder)?;

    Ok((
        Coin {
            denom: token_in.denom.clone(),
            amount: remainder,
        },
        Coin {
            denom: token_in.denom.clone(),
            amount: fee,
        },
    ))
}

/// Charges the fee on an exact amount out swap.
///
/// `token_in` is the net amount the pool needs. Returns `(gross, fee)` with
/// `gross = ceil(amount / (1 - fee))` and `fee = gross - amount`.
pub fn calc_taker_fee_exact_out(token_in: &Coin, taker_fee: Decimal) -> StdResult<(Coin, Coin)> {
    validate_taker_fee(taker_fee)?;

    let gross = div_ceil(token_in.amount, Decimal::one() - taker_fee)?;
    let fee = gross.checked_sub(token_in.amount)?;

    Ok((
        Coin {
            denom: token_in.denom.clone(),
            amount: gross,
        },
        Coin {
            denom: token_in.denom.clone(),
            amount: fee,
        },
    ))
}

/// `ceil(amount / rate)` computed on the decimal atomics.
fn div_ceil(amount: Uint128, rate: Decimal) -> StdResult<Uint128> {
    let numerator = amount.full_mul(Decimal::one().atomics());
    let denominator = Uint256::from(rate.atomics());
    let quotient = numerator.checked_div(denominator)?;

    let quotient = if quotient.checked_mul(denominator)? < numerator {
        quotient.checked_add(Uint256::one())?
    } else {
        quotient
    };

    Ok(quotient.try_into()?)
}
