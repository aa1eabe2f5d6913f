//! A programmable pool contract exchanging its assets at the ratio of their normalization
//! factors, the way an alloyed asset pool does. Liquidity is whatever the contract holds.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coin, ensure, to_json_binary, BankMsg, Binary, Coin, Decimal, Deps, DepsMut, Empty, Env,
    MessageInfo, Response, StdError, StdResult, Uint128, Uint256,
};
use cw_multi_test::{Contract, ContractWrapper};
use cw_storage_plus::Item;
use poolmanager_std::cosmwasm_pool::{
    AssetConfig, CalcInAmtGivenOutResponse, CalcOutAmtGivenInResponse, GetShareDenomResponse,
    GetSwapFeeResponse, GetTotalSharesResponse, IsActiveResponse, ListAssetConfigsResponse,
    PoolExecuteMsg, PoolQueryMsg, SpotPriceResponse, TotalPoolLiquidityResponse,
};

#[cw_serde]
pub struct InstantiateMsg {
    pub asset_configs: Vec<AssetConfig>,
    pub swap_fee: Decimal,
    /// Subdenom of the alloyed share, `factory/<contract>/alloyed/<subdenom>`.
    pub share_subdenom: String,
    /// Replaces the generated share denom, e.g. to return a malformed one.
    pub share_denom_override: Option<String>,
    pub is_active: bool,
}

#[cw_serde]
struct MockPoolConfig {
    asset_configs: Vec<AssetConfig>,
    swap_fee: Decimal,
    share_denom: String,
    is_active: bool,
}

const CONFIG: Item<MockPoolConfig> = Item::new("config");

pub fn alloyed_pool_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new_with_empty(execute, instantiate, query);

    Box::new(contract)
}

fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> StdResult<Response> {
    let share_denom = msg.share_denom_override.unwrap_or(format!(
        "factory/{}/alloyed/{}",
        env.contract.address, msg.share_subdenom
    ));

    CONFIG.save(
        deps.storage,
        &MockPoolConfig {
            asset_configs: msg.asset_configs,
            swap_fee: msg.swap_fee,
            share_denom,
            is_active: msg.is_active,
        },
    )?;

    Ok(Response::default())
}

fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: PoolExecuteMsg,
) -> StdResult<Response> {
    let config = CONFIG.load(deps.storage)?;

    let (sender, token_out) = match msg {
        PoolExecuteMsg::SwapExactAmountIn {
            sender,
            token_in,
            token_out_denom,
            token_out_min_amount,
            swap_fee,
        } => {
            ensure!(
                info.funds == vec![token_in.clone()],
                StdError::generic_err("funds must match token_in")
            );
            let token_out = out_given_in(&config, &token_in, &token_out_denom, swap_fee)?;
            ensure!(
                token_out.amount >= token_out_min_amount,
                StdError::generic_err("token_out_min_amount not met")
            );
            (sender, token_out)
        }
        PoolExecuteMsg::SwapExactAmountOut {
            sender,
            token_in_denom,
            token_in_max_amount,
            token_out,
            swap_fee,
        } => {
            let token_in = in_given_out(&config, &token_out, &token_in_denom, swap_fee)?;
            ensure!(
                token_in.amount <= token_in_max_amount
                    && info.funds == vec![token_in.clone()],
                StdError::generic_err("funds must match the required token_in")
            );
            (sender, token_out)
        }
    };

    Ok(Response::default().add_message(BankMsg::Send {
        to_address: sender,
        amount: vec![token_out],
    }))
}

fn query(deps: Deps, env: Env, msg: PoolQueryMsg) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;

    match msg {
        PoolQueryMsg::GetShareDenom {} => to_json_binary(&GetShareDenomResponse {
            share_denom: config.share_denom,
        }),
        PoolQueryMsg::GetTotalPoolLiquidity {} => {
            let total_pool_liquidity = config
                .asset_configs
                .iter()
                .map(|asset| deps.querier.query_balance(&env.contract.address, &asset.denom))
                .collect::<StdResult<Vec<Coin>>>()?;
            to_json_binary(&TotalPoolLiquidityResponse {
                total_pool_liquidity,
            })
        }
        PoolQueryMsg::ListAssetConfigs {} => to_json_binary(&ListAssetConfigsResponse {
            asset_configs: config.asset_configs,
        }),
        PoolQueryMsg::SpotPrice {
            quote_asset_denom,
            base_asset_denom,
        } => to_json_binary(&SpotPriceResponse {
            spot_price: Decimal::checked_from_ratio(
                factor(&config, &quote_asset_denom)?,
                factor(&config, &base_asset_denom)?,
            )
            .map_err(|err| StdError::generic_err(err.to_string()))?,
        }),
        PoolQueryMsg::CalcOutAmtGivenIn {
            token_in,
            token_out_denom,
            swap_fee,
        } => to_json_binary(&CalcOutAmtGivenInResponse {
            token_out: out_given_in(&config, &token_in, &token_out_denom, swap_fee)?,
        }),
        PoolQueryMsg::CalcInAmtGivenOut {
            token_out,
            token_in_denom,
            swap_fee,
        } => to_json_binary(&CalcInAmtGivenOutResponse {
            token_in: in_given_out(&config, &token_out, &token_in_denom, swap_fee)?,
        }),
        PoolQueryMsg::GetSwapFee {} => to_json_binary(&GetSwapFeeResponse {
            swap_fee: config.swap_fee,
        }),
        PoolQueryMsg::IsActive {} => to_json_binary(&IsActiveResponse {
            is_active: config.is_active,
        }),
        PoolQueryMsg::GetTotalShares {} => to_json_binary(&GetTotalSharesResponse {
            total_shares: Uint128::zero(),
        }),
    }
}

fn factor(config: &MockPoolConfig, denom: &str) -> StdResult<Uint128> {
    config
        .asset_configs
        .iter()
        .find(|asset| asset.denom == denom)
        .map(|asset| asset.normalization_factor)
        .ok_or_else(|| StdError::generic_err(format!("{denom} is not part of the pool")))
}

fn out_given_in(
    config: &MockPoolConfig,
    token_in: &Coin,
    token_out_denom: &str,
    swap_fee: Decimal,
) -> StdResult<Coin> {
    let amount_in = token_in.amount * (Decimal::one() - swap_fee);
    let amount_out = amount_in
        .checked_multiply_ratio(
            factor(config, token_out_denom)?,
            factor(config, &token_in.denom)?,
        )
        .map_err(|err| StdError::generic_err(err.to_string()))?;

    Ok(coin(amount_out.u128(), token_out_denom))
}

fn in_given_out(
    config: &MockPoolConfig,
    token_out: &Coin,
    token_in_denom: &str,
    swap_fee: Decimal,
) -> StdResult<Coin> {
    let amount_in = token_out
        .amount
        .checked_multiply_ratio(
            factor(config, token_in_denom)?,
            factor(config, &token_out.denom)?,
        )
        .map_err(|err| StdError::generic_err(err.to_string()))?;

    // gross up by the swap fee, rounding up
    let rate = Uint256::from((Decimal::one() - swap_fee).atomics());
    let numerator = amount_in.full_mul(Decimal::one().atomics());
    let gross = numerator.checked_add(rate - Uint256::one())?.checked_div(rate)?;

    Ok(coin(Uint128::try_from(gross)?.u128(), token_in_denom))
}
