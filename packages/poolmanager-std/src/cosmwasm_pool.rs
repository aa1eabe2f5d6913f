//! Messages understood by pool contracts (concentrated and programmable pools) that are
//! driven by the pool manager.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Coin, Decimal, Uint128};

#[cw_serde]
#[derive(QueryResponses)]
pub enum PoolQueryMsg {
    /// The share denom of the pool, for alloyed pools `factory/<contract>/alloyed/<subdenom>`.
    #[returns(GetShareDenomResponse)]
    GetShareDenom {},
    /// Every asset held by the pool.
    #[returns(TotalPoolLiquidityResponse)]
    GetTotalPoolLiquidity {},
    /// Per asset configuration, including the normalization factor of each asset.
    #[returns(ListAssetConfigsResponse)]
    ListAssetConfigs {},
    #[returns(SpotPriceResponse)]
    SpotPrice {
        quote_asset_denom: String,
        base_asset_denom: String,
    },
    #[returns(CalcOutAmtGivenInResponse)]
    CalcOutAmtGivenIn {
        token_in: Coin,
        token_out_denom: String,
        swap_fee: Decimal,
    },
    #[returns(CalcInAmtGivenOutResponse)]
    CalcInAmtGivenOut {
        token_out: Coin,
        token_in_denom: String,
        swap_fee: Decimal,
    },
    #[returns(GetSwapFeeResponse)]
    GetSwapFee {},
    #[returns(IsActiveResponse)]
    IsActive {},
    #[returns(GetTotalSharesResponse)]
    GetTotalShares {},
}

#[cw_serde]
pub enum PoolExecuteMsg {
    /// Swaps the attached funds, sending at least `token_out_min_amount` back to `sender`.
    SwapExactAmountIn {
        sender: String,
        token_in: Coin,
        token_out_denom: String,
        token_out_min_amount: Uint128,
        swap_fee: Decimal,
    },
    /// Swaps at most `token_in_max_amount` of the attached funds for exactly `token_out`.
    SwapExactAmountOut {
        sender: String,
        token_in_denom: String,
        token_in_max_amount: Uint128,
        token_out: Coin,
        swap_fee: Decimal,
    },
}

#[cw_serde]
pub struct GetShareDenomResponse {
    pub share_denom: String,
}

#[cw_serde]
pub struct TotalPoolLiquidityResponse {
    pub total_pool_liquidity: Vec<Coin>,
}

#[cw_serde]
pub struct AssetConfig {
    pub denom: String,
    pub normalization_factor: Uint128,
}

#[cw_serde]
pub struct ListAssetConfigsResponse {
    pub asset_configs: Vec<AssetConfig>,
}

#[cw_serde]
pub struct SpotPriceResponse {
    pub spot_price: Decimal,
}

#[cw_serde]
pub struct CalcOutAmtGivenInResponse {
    pub token_out: Coin,
}

#[cw_serde]
pub struct CalcInAmtGivenOutResponse {
    pub token_in: Coin,
}

#[cw_serde]
pub struct GetSwapFeeResponse {
    pub swap_fee: Decimal,
}

#[cw_serde]
pub struct IsActiveResponse {
    pub is_active: bool,
}

#[cw_serde]
pub struct GetTotalSharesResponse {
    pub total_shares: Uint128,
}
