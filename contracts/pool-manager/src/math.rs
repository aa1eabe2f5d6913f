use cosmwasm_std::{Decimal, Decimal256, Uint128, Uint256};

use crate::ContractError;

pub trait Decimal256Helper {
    fn decimal_with_precision(
        value: impl Into<Uint256>,
        precision: u8,
    ) -> Result<Decimal256, ContractError>;

    fn checked_multiply_ratio(
        &self,
        numerator: Decimal256,
        denominator: Decimal256,
    ) -> Result<Decimal256, ContractError>;

    fn to_uint256_with_precision(&self, precision: u32) -> Result<Uint256, ContractError>;
}

impl Decimal256Helper for Decimal256 {
    fn decimal_with_precision(
        value: impl Into<Uint256>,
        precision: u8,
    ) -> Result<Decimal256, ContractError> {
        Decimal256::from_atomics(value, u32::from(precision))
            .map_err(|_| ContractError::DecimalOverflow {})
    }

    fn checked_multiply_ratio(
        &self,
        numerator: Decimal256,
        denominator: Decimal256,
    ) -> Result<Decimal256, ContractError> {
        Ok(Decimal256::new(self.atomics().checked_multiply_ratio(
            numerator.atomics(),
            denominator.atomics(),
        )?))
    }

    fn to_uint256_with_precision(&self, precision: u32) -> Result<Uint256, ContractError> {
        let value = self.atomics();

        Ok(value.checked_div(10u128.pow(self.decimal_places() - precision).into())?)
    }
}

/// `ceil(value * numerator / denominator)`
pub fn multiply_ratio_ceil(
    value: Uint128,
    numerator: Uint128,
    denominator: Uint128,
) -> Result<Uint128, ContractError> {
    let product = value.full_mul(numerator);
    let denominator = Uint256::from(denominator);
    let quotient = product.checked_div(denominator)?;

    let quotient = if quotient.checked_mul(denominator)? < product {
        quotient.checked_add(Uint256::one())?
    } else {
        quotient
    };

    Ok(quotient.try_into()?)
}

/// `ceil(value / rate)`, used to gross an amount up for a fee charged on it.
pub fn div_decimal_ceil(value: Uint128, rate: Decimal) -> Result<Uint128, ContractError> {
    if rate.is_zero() {
        return Err(ContractError::DivideByZeroError(
            cosmwasm_std::DivideByZeroError::new(value),
        ));
    }
    multiply_ratio_ceil(value, Decimal::one().atomics(), rate.atomics())
}
