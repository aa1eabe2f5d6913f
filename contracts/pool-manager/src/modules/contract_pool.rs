use cosmwasm_std::{
    ensure, to_json_binary, Addr, Coin, CosmosMsg, Decimal, Deps, DepsMut, Env, Uint128,
    WasmMsg,
};
use poolmanager_std::cosmwasm_pool::{
    CalcInAmtGivenOutResponse, CalcOutAmtGivenInResponse, GetShareDenomResponse,
    GetSwapFeeResponse, GetTotalSharesResponse, IsActiveResponse, PoolExecuteMsg, PoolQueryMsg,
    SpotPriceResponse, TotalPoolLiquidityResponse,
};
use poolmanager_std::pool_manager::{CreatePoolMsg, PoolInfo, PoolType};

use crate::registry::{PoolModule, SwapOutcome};
use crate::state::{ContractPool, CONTRACT_POOLS};
use crate::ContractError;

/// Pools living in their own contract (concentrated and programmable pools). The pool
/// manager forwards swaps to the contract and reads everything else through queries.
pub struct ContractPoolModule {
    pool_type: PoolType,
}

impl ContractPoolModule {
    pub fn new(pool_type: PoolType) -> Self {
        Self { pool_type }
    }

    fn load(&self, deps: Deps, pool_id: u64) -> Result<ContractPool, ContractError> {
        CONTRACT_POOLS
            .may_load(deps.storage, pool_id)?
            .filter(|pool| pool.pool_type == self.pool_type)
            .ok_or(ContractError::PoolNotFound { pool_id })
    }

    fn pool_info(&self, deps: Deps, pool: ContractPool) -> Result<PoolInfo, ContractError> {
        let querier = deps.querier;
        let address = &pool.contract_address;

        let liquidity: TotalPoolLiquidityResponse =
            querier.query_wasm_smart(address, &PoolQueryMsg::GetTotalPoolLiquidity {})?;
        let mut pool_denoms: Vec<String> = liquidity
            .total_pool_liquidity
            .into_iter()
            .map(|coin| coin.denom)
            .collect();
        pool_denoms.sort();

        let swap_fee: GetSwapFeeResponse =
            querier.query_wasm_smart(address, &PoolQueryMsg::GetSwapFee {})?;
        let is_active: IsActiveResponse =
            querier.query_wasm_smart(address, &PoolQueryMsg::IsActive {})?;

        // not every pool contract issues shares
        let total_shares = querier
            .query_wasm_smart::<GetShareDenomResponse>(address, &PoolQueryMsg::GetShareDenom {})
            .and_then(|share| {
                querier
                    .query_wasm_smart::<GetTotalSharesResponse>(
                        address,
                        &PoolQueryMsg::GetTotalShares {},
                    )
                    .map(|total| Coin {
                        denom: share.share_denom,
                        amount: total.total_shares,
                    })
            })
            .ok();

        Ok(PoolInfo {
            id: pool.id,
            address: pool.contract_address,
            pool_type: pool.pool_type,
            pool_denoms,
            spread_factor: swap_fee.swap_fee,
            total_shares,
            active: is_active.is_active,
        })
    }
}

impl PoolModule for ContractPoolModule {
    fn create_pool(
        &self,
        deps: DepsMut,
        _env: &Env,
        pool_id: u64,
        msg: &CreatePoolMsg,
    ) -> Result<PoolInfo, ContractError> {
        let contract_address = match (self.pool_type, msg) {
            (PoolType::Concentrated, CreatePoolMsg::Concentrated { contract_address })
            | (PoolType::CosmWasm, CreatePoolMsg::CosmWasm { contract_address }) => {
                deps.api.addr_validate(contract_address)?
            }
            _ => {
                return Err(ContractError::InvalidPoolType {
                    pool_type: msg.pool_type(),
                })
            }
        };

        let pool = ContractPool {
            id: pool_id,
            pool_type: self.pool_type,
            contract_address,
        };
        CONTRACT_POOLS.save(deps.storage, pool_id, &pool)?;

        self.pool_info(deps.as_ref(), pool)
    }

    fn initialize_pool(
        &self,
        _deps: DepsMut,
        _env: &Env,
        _pool: &PoolInfo,
        _creator: &Addr,
    ) -> Result<Vec<CosmosMsg>, ContractError> {
        // the pool contract was set up when it was instantiated
        Ok(vec![])
    }

    fn pool_address(&self, deps: Deps, _env: &Env, pool_id: u64) -> Result<Addr, ContractError> {
        Ok(self.load(deps, pool_id)?.contract_address)
    }

    fn get_pool(&self, deps: Deps, pool_id: u64) -> Result<PoolInfo, ContractError> {
        let pool = self.load(deps, pool_id)?;
        self.pool_info(deps, pool)
    }

    fn get_total_pool_liquidity(
        &self,
        deps: Deps,
        pool_id: u64,
    ) -> Result<Vec<Coin>, ContractError> {
        let pool = self.load(deps, pool_id)?;
        let response: TotalPoolLiquidityResponse = deps
            .querier
            .query_wasm_smart(pool.contract_address, &PoolQueryMsg::GetTotalPoolLiquidity {})?;

        Ok(response.total_pool_liquidity)
    }

    fn calculate_spot_price(
        &self,
        deps: Deps,
        pool_id: u64,
        quote_denom: &str,
        base_denom: &str,
    ) -> Result<Decimal, ContractError> {
        let pool = self.load(deps, pool_id)?;
        let response: SpotPriceResponse = deps.querier.query_wasm_smart(
            pool.contract_address,
            &PoolQueryMsg::SpotPrice {
                quote_asset_denom: quote_denom.to_string(),
                base_asset_denom: base_denom.to_string(),
            },
        )?;

        Ok(response.spot_price)
    }

    fn calc_out_amt_given_in(
        &self,
        deps: Deps,
        pool: &PoolInfo,
        token_in: &Coin,
        token_out_denom: &str,
        spread_factor: Decimal,
    ) -> Result<Coin, ContractError> {
        let response: CalcOutAmtGivenInResponse = deps.querier.query_wasm_smart(
            &pool.address,
            &PoolQueryMsg::CalcOutAmtGivenIn {
                token_in: token_in.clone(),
                token_out_denom: token_out_denom.to_string(),
                swap_fee: spread_factor,
            },
        )?;

        Ok(response.token_out)
    }

    fn calc_in_amt_given_out(
        &self,
        deps: Deps,
        pool: &PoolInfo,
        token_out: &Coin,
        token_in_denom: &str,
        spread_factor: Decimal,
    ) -> Result<Coin, ContractError> {
        let response: CalcInAmtGivenOutResponse = deps.querier.query_wasm_smart(
            &pool.address,
            &PoolQueryMsg::CalcInAmtGivenOut {
                token_out: token_out.clone(),
                token_in_denom: token_in_denom.to_string(),
                swap_fee: spread_factor,
            },
        )?;

        Ok(response.token_in)
    }

    fn swap_exact_amount_in(
        &self,
        deps: DepsMut,
        env: &Env,
        pool: &PoolInfo,
        token_in: &Coin,
        token_out_denom: &str,
        token_out_min_amount: Uint128,
        spread_factor: Decimal,
    ) -> Result<SwapOutcome, ContractError> {
        let token_out = self.calc_out_amt_given_in(
            deps.as_ref(),
            pool,
            token_in,
            token_out_denom,
            spread_factor,
        )?;
        ensure!(!token_out.amount.is_zero(), ContractError::InvalidZeroAmount {});
        ensure!(
            token_out.amount >= token_out_min_amount,
            ContractError::PriceImpactProtectionExactIn {
                min: token_out_min_amount,
                actual: token_out.amount,
            }
        );

        // the pool contract sends the output back to the pool manager
        let swap = WasmMsg::Execute {
            contract_addr: pool.address.to_string(),
            msg: to_json_binary(&PoolExecuteMsg::SwapExactAmountIn {
                sender: env.contract.address.to_string(),
                token_in: token_in.clone(),
                token_out_denom: token_out_denom.to_string(),
                token_out_min_amount: token_out.amount,
                swap_fee: spread_factor,
            })?,
            funds: vec![token_in.clone()],
        };

        Ok(SwapOutcome {
            amount: token_out.amount,
            messages: vec![swap.into()],
        })
    }

    fn swap_exact_amount_out(
        &self,
        deps: DepsMut,
        env: &Env,
        pool: &PoolInfo,
        token_in_denom: &str,
        token_in_max_amount: Uint128,
        token_out: &Coin,
        spread_factor: Decimal,
    ) -> Result<SwapOutcome, ContractError> {
        let token_in = self.calc_in_amt_given_out(
            deps.as_ref(),
            pool,
            token_out,
            token_in_denom,
            spread_factor,
        )?;
        ensure!(
            token_in.amount <= token_in_max_amount,
            ContractError::PriceImpactProtectionExactOut {
                max: token_in_max_amount,
                actual: token_in.amount,
            }
        );

        let swap = WasmMsg::Execute {
            contract_addr: pool.address.to_string(),
            msg: to_json_binary(&PoolExecuteMsg::SwapExactAmountOut {
                sender: env.contract.address.to_string(),
                token_in_denom: token_in_denom.to_string(),
                token_in_max_amount: token_in.amount,
                token_out: token_out.clone(),
                swap_fee: spread_factor,
            })?,
            funds: vec![token_in.clone()],
        };

        Ok(SwapOutcome {
            amount: token_in.amount,
            messages: vec![swap.into()],
        })
    }
}
