use std::collections::BTreeSet;

use cosmwasm_std::{
    ensure, Addr, Coin, CosmosMsg, Decimal, Deps, DepsMut, Env, Uint128,
};
use poolmanager_std::denom::validate_denom;
use poolmanager_std::pool_manager::{CreatePoolMsg, PoolInfo, PoolType};
use poolmanager_std::tokenfactory;

use crate::helpers::{
    balancer_in_given_out, balancer_out_given_in, balancer_spot_price, stableswap_in_given_out,
    stableswap_out_given_in, stableswap_spot_price, StableswapSides,
};
use crate::registry::{PoolModule, SwapOutcome};
use crate::state::{CfmmPool, Curve, CFMM_POOLS};
use crate::ContractError;

/// LP shares minted to the creator of a pool.
pub const INIT_POOL_SHARES: Uint128 = Uint128::new(100_000_000_000_000_000_000);
pub const MAX_POOL_ASSETS: usize = 8;
pub const MAX_AMP: u64 = 1_000_000;

/// Balancer and stableswap pools, whose reserves are held by the pool manager.
pub struct CfmmModule {
    pool_type: PoolType,
}

/// The custody account of a pool held by the pool manager at `contract`.
pub fn pool_account(contract: &Addr, pool_id: u64) -> Addr {
    Addr::unchecked(format!("{contract}/pool/{pool_id}"))
}

/// Tokenfactory subdenom of the LP share of a pool.
pub fn share_subdenom(pool_id: u64) -> String {
    format!("pool/{pool_id}")
}

impl CfmmModule {
    pub fn new(pool_type: PoolType) -> Self {
        Self { pool_type }
    }

    fn load(&self, deps: Deps, pool_id: u64) -> Result<CfmmPool, ContractError> {
        CFMM_POOLS
            .may_load(deps.storage, pool_id)?
            .filter(|pool| pool.pool_type == self.pool_type)
            .ok_or(ContractError::PoolNotFound { pool_id })
    }

    fn validate_assets(&self, pool_assets: &[Coin]) -> Result<(), ContractError> {
        let invalid = |reason: &str| ContractError::InvalidPoolAssets {
            reason: reason.to_string(),
        };

        match self.pool_type {
            PoolType::Stableswap => ensure!(
                pool_assets.len() == 2,
                invalid("stableswap pools hold exactly two assets")
            ),
            _ => ensure!(
                (2..=MAX_POOL_ASSETS).contains(&pool_assets.len()),
                invalid("pools hold between 2 and 8 assets")
            ),
        }

        let mut denoms = BTreeSet::new();
        for asset in pool_assets {
            validate_denom(&asset.denom)?;
            ensure!(!asset.amount.is_zero(), ContractError::InvalidZeroAmount {});
            ensure!(denoms.insert(asset.denom.as_str()), ContractError::SameAsset {});
        }

        Ok(())
    }
}

fn to_pool_info(pool: CfmmPool) -> PoolInfo {
    PoolInfo {
        id: pool.id,
        address: pool.address,
        pool_type: pool.pool_type,
        pool_denoms: pool.assets.iter().map(|asset| asset.denom.clone()).collect(),
        spread_factor: pool.spread_factor,
        total_shares: Some(pool.total_shares),
        active: pool.active,
    }
}

/// Positions of the two traded assets in the pool reserves.
fn asset_indexes(
    pool: &CfmmPool,
    denom_in: &str,
    denom_out: &str,
) -> Result<(usize, usize), ContractError> {
    ensure!(denom_in != denom_out, ContractError::SameAsset {});

    let position = |denom: &str| {
        pool.assets
            .iter()
            .position(|asset| asset.denom == denom)
            .ok_or_else(|| ContractError::DenomNotInPool {
                pool_id: pool.id,
                denom: denom.to_string(),
            })
    };

    Ok((position(denom_in)?, position(denom_out)?))
}

fn stableswap_sides(pool: &CfmmPool, offer: usize, ask: usize) -> Option<StableswapSides> {
    match &pool.curve {
        Curve::ConstantProduct => None,
        Curve::Stableswap {
            amp,
            asset_decimals,
        } => Some(StableswapSides {
            offer_pool: pool.assets[offer].amount,
            offer_precision: asset_decimals[offer],
            ask_pool: pool.assets[ask].amount,
            ask_precision: asset_decimals[ask],
            amp: *amp,
        }),
    }
}

fn out_given_in(
    pool: &CfmmPool,
    offer: usize,
    ask: usize,
    amount_in: Uint128,
    spread_factor: Decimal,
) -> Result<Uint128, ContractError> {
    match stableswap_sides(pool, offer, ask) {
        Some(sides) => stableswap_out_given_in(&sides, amount_in, spread_factor),
        None => balancer_out_given_in(
            pool.assets[offer].amount,
            pool.assets[ask].amount,
            amount_in,
            spread_factor,
        ),
    }
}

fn in_given_out(
    pool: &CfmmPool,
    offer: usize,
    ask: usize,
    amount_out: Uint128,
    spread_factor: Decimal,
) -> Result<Uint128, ContractError> {
    match stableswap_sides(pool, offer, ask) {
        Some(sides) => stableswap_in_given_out(pool.id, &sides, amount_out, spread_factor),
        None => balancer_in_given_out(
            pool.id,
            pool.assets[offer].amount,
            pool.assets[ask].amount,
            amount_out,
            spread_factor,
        ),
    }
}

/// Moves `amount_in` into and `amount_out` out of the reserves.
fn apply_swap(
    pool: &mut CfmmPool,
    offer: usize,
    ask: usize,
    amount_in: Uint128,
    amount_out: Uint128,
) -> Result<(), ContractError> {
    pool.assets[offer].amount = pool.assets[offer].amount.checked_add(amount_in)?;
    pool.assets[ask].amount = pool.assets[ask]
        .amount
        .checked_sub(amount_out)
        .map_err(|_| ContractError::InsufficientLiquidity { pool_id: pool.id })?;
    Ok(())
}

impl PoolModule for CfmmModule {
    fn create_pool(
        &self,
        deps: DepsMut,
        env: &Env,
        pool_id: u64,
        msg: &CreatePoolMsg,
    ) -> Result<PoolInfo, ContractError> {
        let (pool_assets, spread_factor, curve) = match (self.pool_type, msg) {
            (
                PoolType::Balancer,
                CreatePoolMsg::Balancer {
                    pool_assets,
                    spread_factor,
                },
            ) => (pool_assets, *spread_factor, Curve::ConstantProduct),
            (
                PoolType::Stableswap,
                CreatePoolMsg::Stableswap {
                    pool_assets,
                    asset_decimals,
                    spread_factor,
                    amp,
                },
            ) => {
                ensure!(
                    asset_decimals.len() == pool_assets.len(),
                    ContractError::InvalidPoolAssets {
                        reason: "one decimal value per asset is required".to_string(),
                    }
                );
                ensure!(
                    *amp > 0 && *amp <= MAX_AMP,
                    ContractError::InvalidPoolAssets {
                        reason: format!("amp must be between 1 and {MAX_AMP}"),
                    }
                );
                // decimals follow their asset through the sort below
                let mut paired: Vec<(&Coin, u8)> =
                    pool_assets.iter().zip(asset_decimals.iter().copied()).collect();
                paired.sort_by(|a, b| a.0.denom.cmp(&b.0.denom));

                (
                    pool_assets,
                    *spread_factor,
                    Curve::Stableswap {
                        amp: *amp,
                        asset_decimals: paired.into_iter().map(|(_, d)| d).collect(),
                    },
                )
            }
            _ => {
                return Err(ContractError::InvalidPoolType {
                    pool_type: msg.pool_type(),
                })
            }
        };

        self.validate_assets(pool_assets)?;
        ensure!(
            spread_factor < Decimal::one(),
            ContractError::InvalidPoolAssets {
                reason: "spread factor must be lower than 1".to_string(),
            }
        );

        let mut assets = pool_assets.to_vec();
        assets.sort_by(|a, b| a.denom.cmp(&b.denom));

        let pool = CfmmPool {
            id: pool_id,
            pool_type: self.pool_type,
            address: pool_account(&env.contract.address, pool_id),
            assets,
            curve,
            spread_factor,
            total_shares: Coin {
                denom: tokenfactory::factory_denom(
                    &env.contract.address,
                    &share_subdenom(pool_id),
                ),
                amount: INIT_POOL_SHARES,
            },
            active: true,
        };
        CFMM_POOLS.save(deps.storage, pool_id, &pool)?;

        Ok(to_pool_info(pool))
    }

    fn initialize_pool(
        &self,
        _deps: DepsMut,
        env: &Env,
        pool: &PoolInfo,
        creator: &Addr,
    ) -> Result<Vec<CosmosMsg>, ContractError> {
        let shares = pool
            .total_shares
            .as_ref()
            .ok_or(ContractError::PoolNotFound { pool_id: pool.id })?;

        Ok(vec![
            tokenfactory::create_denom(&env.contract.address, &share_subdenom(pool.id)),
            tokenfactory::mint(&env.contract.address, shares, creator),
        ])
    }

    fn pool_address(&self, _deps: Deps, env: &Env, pool_id: u64) -> Result<Addr, ContractError> {
        Ok(pool_account(&env.contract.address, pool_id))
    }

    fn get_pool(&self, deps: Deps, pool_id: u64) -> Result<PoolInfo, ContractError> {
        self.load(deps, pool_id).map(to_pool_info)
    }

    fn get_total_pool_liquidity(
        &self,
        deps: Deps,
        pool_id: u64,
    ) -> Result<Vec<Coin>, ContractError> {
        Ok(self.load(deps, pool_id)?.assets)
    }

    fn calculate_spot_price(
        &self,
        deps: Deps,
        pool_id: u64,
        quote_denom: &str,
        base_denom: &str,
    ) -> Result<Decimal, ContractError> {
        let pool = self.load(deps, pool_id)?;
        let (base, quote) = asset_indexes(&pool, base_denom, quote_denom)?;

        match stableswap_sides(&pool, base, quote) {
            Some(sides) => stableswap_spot_price(&sides),
            None => balancer_spot_price(pool.assets[quote].amount, pool.assets[base].amount),
        }
    }

    fn calc_out_amt_given_in(
        &self,
        deps: Deps,
        pool: &PoolInfo,
        token_in: &Coin,
        token_out_denom: &str,
        spread_factor: Decimal,
    ) -> Result<Coin, ContractError> {
        let pool = self.load(deps, pool.id)?;
        let (offer, ask) = asset_indexes(&pool, &token_in.denom, token_out_denom)?;
        let amount = out_given_in(&pool, offer, ask, token_in.amount, spread_factor)?;

        Ok(Coin {
            denom: token_out_denom.to_string(),
            amount,
        })
    }

    fn calc_in_amt_given_out(
        &self,
        deps: Deps,
        pool: &PoolInfo,
        token_out: &Coin,
        token_in_denom: &str,
        spread_factor: Decimal,
    ) -> Result<Coin, ContractError> {
        let pool = self.load(deps, pool.id)?;
        let (offer, ask) = asset_indexes(&pool, token_in_denom, &token_out.denom)?;
        let amount = in_given_out(&pool, offer, ask, token_out.amount, spread_factor)?;

        Ok(Coin {
            denom: token_in_denom.to_string(),
            amount,
        })
    }

    fn swap_exact_amount_in(
        &self,
        deps: DepsMut,
        _env: &Env,
        pool: &PoolInfo,
        token_in: &Coin,
        token_out_denom: &str,
        token_out_min_amount: Uint128,
        spread_factor: Decimal,
    ) -> Result<SwapOutcome, ContractError> {
        let mut pool = self.load(deps.as_ref(), pool.id)?;
        let (offer, ask) = asset_indexes(&pool, &token_in.denom, token_out_denom)?;

        let amount_out = out_given_in(&pool, offer, ask, token_in.amount, spread_factor)?;
        ensure!(!amount_out.is_zero(), ContractError::InvalidZeroAmount {});
        ensure!(
            amount_out >= token_out_min_amount,
            ContractError::PriceImpactProtectionExactIn {
                min: token_out_min_amount,
                actual: amount_out,
            }
        );

        apply_swap(&mut pool, offer, ask, token_in.amount, amount_out)?;
        CFMM_POOLS.save(deps.storage, pool.id, &pool)?;

        Ok(SwapOutcome {
            amount: amount_out,
            messages: vec![],
        })
    }

    fn swap_exact_amount_out(
        &self,
        deps: DepsMut,
        _env: &Env,
        pool: &PoolInfo,
        token_in_denom: &str,
        token_in_max_amount: Uint128,
        token_out: &Coin,
        spread_factor: Decimal,
    ) -> Result<SwapOutcome, ContractError> {
        let mut pool = self.load(deps.as_ref(), pool.id)?;
        let (offer, ask) = asset_indexes(&pool, token_in_denom, &token_out.denom)?;

        let amount_in = in_given_out(&pool, offer, ask, token_out.amount, spread_factor)?;
        ensure!(
            amount_in <= token_in_max_amount,
            ContractError::PriceImpactProtectionExactOut {
                max: token_in_max_amount,
                actual: amount_in,
            }
        );

        apply_swap(&mut pool, offer, ask, amount_in, token_out.amount)?;
        CFMM_POOLS.save(deps.storage, pool.id, &pool)?;

        Ok(SwapOutcome {
            amount: amount_in,
            messages: vec![],
        })
    }
}
