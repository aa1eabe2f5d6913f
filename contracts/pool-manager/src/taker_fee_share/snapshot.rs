use cosmwasm_std::{ensure, Addr, Coin, Decimal, Decimal256, Uint128};
use poolmanager_std::cosmwasm_pool::AssetConfig;
use poolmanager_std::pool_manager::{AlloyContractTakerFeeShareState, TakerFeeShareAgreement};

use crate::ContractError;

/// Computes the taker fee share snapshot of an alloyed pool.
///
/// Each constituent's liquidity is divided by its normalization factor. A constituent with a
/// standing agreement gets `skim_percent * normalized / total_normalized`. Constituents
/// without an agreement are left out, and the output keeps the liquidity order.
pub fn compute_alloyed_taker_fee_share<'a>(
    pool_id: u64,
    contract_address: &Addr,
    liquidity: &[Coin],
    asset_configs: &[AssetConfig],
    agreement_for: impl Fn(&str) -> Option<&'a TakerFeeShareAgreement>,
) -> Result<AlloyContractTakerFeeShareState, ContractError> {
    let normalized = liquidity
        .iter()
        .map(|coin| {
            let config = asset_configs
                .iter()
                .find(|config| config.denom == coin.denom)
                .ok_or_else(|| ContractError::MissingAssetConfig {
                    pool_id,
                    denom: coin.denom.clone(),
                })?;
            ensure!(
                !config.normalization_factor.is_zero(),
                ContractError::ZeroNormalizationFactor {
                    pool_id,
                    denom: coin.denom.clone(),
                }
            );

            Ok((
                coin.denom.as_str(),
                Decimal256::checked_from_ratio(coin.amount, config.normalization_factor)?,
            ))
        })
        .collect::<Result<Vec<_>, ContractError>>()?;

    let total = normalized
        .iter()
        .try_fold(Decimal256::zero(), |total, (_, amount)| {
            total.checked_add(*amount)
        })?;
    ensure!(
        !total.is_zero(),
        ContractError::ZeroTotalAlloyedLiquidity { pool_id }
    );

    let mut taker_fee_share_agreements = vec![];
    for (denom, amount) in normalized {
        let Some(agreement) = agreement_for(denom) else {
            continue;
        };

        let share = amount.checked_div(total)?;
        let scaled = share.checked_mul(Decimal256::from(agreement.skim_percent))?;

        taker_fee_share_agreements.push(TakerFeeShareAgreement {
            denom: agreement.denom.clone(),
            skim_percent: Decimal::new(Uint128::try_from(scaled.atomics())?),
            skim_address: agreement.skim_address.clone(),
        });
    }

    Ok(AlloyContractTakerFeeShareState {
        contract_address: contract_address.clone(),
        taker_fee_share_agreements,
    })
}
