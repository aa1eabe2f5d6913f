use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use cosmwasm_std::{Addr, Coin, Decimal, Decimal256, Uint128};
use poolmanager_std::pool_manager::{PoolInfo, PoolType};
use poolmanager_std::routes::SwapAmountOutRoute;

use crate::config::IngesterConfig;
use crate::domain::{
    BlockPools, ChainReader, DenomPair, LiquidityDepthWithRange, TickLiquidityError,
};
use crate::IngestError;


pub const USDC_POOL_ID: u64 = 99;

pub fn config() -> IngesterConfig {
    IngesterConfig {
        default_usdc_pool_id: USDC_POOL_ID,
        usdc_denom: "uusdc".to_string(),
        stablecoin_denoms: vec!["uusdt".to_string()],
        route_overwrites: BTreeMap::from([(
            "ustatom".to_string(),
            vec![
                SwapAmountOutRoute {
                    pool_id: 7,
                    token_in_denom: "ustatom".to_string(),
                },
                SwapAmountOutRoute {
                    pool_id: 8,
                    token_in_denom: "uatom".to_string(),
                },
            ],
        )]),
        ..IngesterConfig::default()
    }
}

pub fn pool(id: u64, pool_type: PoolType, denoms: &[&str]) -> PoolInfo {
    PoolInfo {
        id,
        address: Addr::unchecked(format!("pool{id}")),
        pool_type,
        pool_denoms: denoms.iter().map(|denom| denom.to_string()).collect(),
        spread_factor: Decimal::permille(3),
        total_shares: None,
        active: true,
    }
}

pub fn price(value: &str) -> Decimal256 {
    value.parse().unwrap()
}

/// Chain state served from plain maps.
#[derive(Default)]
pub struct MockChain {
    pub precisions: BTreeMap<String, u32>,
    pub pools: BlockPools,
    pub balances: BTreeMap<u64, Vec<Coin>>,
    /// denom -> pool pairing it with the base denom
    pub base_pools: BTreeMap<String, u64>,
    /// (pool, quote, base) -> price
    pub spot_prices: BTreeMap<(u64, String, String), Decimal256>,
    /// first route denom -> amount in for one base unit out
    pub estimates: BTreeMap<String, Uint128>,
    pub pair_taker_fees: BTreeMap<DenomPair, Decimal>,
    pub default_taker_fee: Decimal,
    pub ticks: BTreeMap<u64, Result<(Vec<LiquidityDepthWithRange>, i64), TickLiquidityError>>,
    pub unreadable_pools: BTreeSet<u64>,
    pub spot_price_calls: Cell<usize>,
}

impl MockChain {
    pub fn new() -> Self {
        MockChain {
            precisions: BTreeMap::from([("uatom".to_string(), 6), ("uusdt".to_string(), 6)]),
            default_taker_fee: Decimal::permille(1),
            ..MockChain::default()
        }
        .with_spot_price(USDC_POOL_ID, "uusdc", "uosmo", "0.5")
    }

    pub fn with_pool(mut self, pool: PoolInfo, balances: Vec<Coin>) -> Self {
        self.balances.insert(pool.id, balances);
        match pool.pool_type {
            PoolType::Concentrated => self.pools.concentrated.push(pool),
            PoolType::CosmWasm => self.pools.cosmwasm.push(pool),
            PoolType::Balancer | PoolType::Stableswap => self.pools.cfmm.push(pool),
        }
        self
    }

    pub fn with_base_pool(mut self, denom: &str, pool_id: u64) -> Self {
        self.base_pools.insert(denom.to_string(), pool_id);
        self
    }

    pub fn with_spot_price(mut self, pool_id: u64, quote: &str, base: &str, value: &str) -> Self {
        self.spot_prices
            .insert((pool_id, quote.to_string(), base.to_string()), price(value));
        self
    }

    fn all_pools(&self) -> impl Iterator<Item = &PoolInfo> {
        self.pools
            .cfmm
            .iter()
            .chain(self.pools.concentrated.iter())
            .chain(self.pools.cosmwasm.iter())
    }
}

impl ChainReader for MockChain {
    fn denom_precisions(&self) -> Result<BTreeMap<String, u32>, IngestError> {
        Ok(self.precisions.clone())
    }

    fn block_pools(&self) -> Result<BlockPools, IngestError> {
        Ok(self.pools.clone())
    }

    fn pool_balances(&self, pool: &PoolInfo) -> Result<Vec<Coin>, IngestError> {
        Ok(self.balances.get(&pool.id).cloned().unwrap_or_default())
    }

    fn route_pool_denoms(&self, pool_id: u64) -> Result<Vec<String>, IngestError> {
        if self.unreadable_pools.contains(&pool_id) {
            return Err(IngestError::ChainRead {
                what: "pool denoms".to_string(),
                reason: format!("pool {pool_id}"),
            });
        }

        self.all_pools()
            .find(|pool| pool.id == pool_id)
            .map(|pool| pool.pool_denoms.clone())
            .ok_or_else(|| IngestError::ChainRead {
                what: "pool denoms".to_string(),
                reason: format!("pool {pool_id} not found"),
            })
    }

    fn pool_for_denom_pair(&self, base_denom: &str, denom: &str) -> Result<u64, IngestError> {
        self.base_pools
            .get(denom)
            .copied()
            .ok_or_else(|| IngestError::NoRouteForDenom {
                denom: denom.to_string(),
                base_denom: base_denom.to_string(),
            })
    }

    fn spot_price(
        &self,
        pool_id: u64,
        quote_denom: &str,
        base_denom: &str,
    ) -> Result<Decimal256, IngestError> {
        self.spot_price_calls.set(self.spot_price_calls.get() + 1);
        self.spot_prices
            .get(&(pool_id, quote_denom.to_string(), base_denom.to_string()))
            .copied()
            .ok_or_else(|| IngestError::ChainRead {
                what: "spot price".to_string(),
                reason: format!("pool {pool_id}"),
            })
    }

    fn estimate_in_given_exact_amount_out(
        &self,
        routes: &[SwapAmountOutRoute],
        _token_out: Coin,
    ) -> Result<Uint128, IngestError> {
        routes
            .first()
            .and_then(|route| self.estimates.get(&route.token_in_denom))
            .copied()
            .ok_or_else(|| IngestError::ChainRead {
                what: "estimate".to_string(),
                reason: "no liquidity".to_string(),
            })
    }

    fn denom_pair_taker_fee(&self, pair: &DenomPair) -> Result<Option<Decimal>, IngestError> {
        Ok(self.pair_taker_fees.get(pair).copied())
    }

    fn default_taker_fee(&self) -> Result<Decimal, IngestError> {
        Ok(self.default_taker_fee)
    }

    fn tick_liquidity_for_full_range(
        &self,
        pool_id: u64,
    ) -> Result<(Vec<LiquidityDepthWithRange>, i64), TickLiquidityError> {
        self.ticks
            .get(&pool_id)
            .cloned()
            .unwrap_or(Err(TickLiquidityError::RanOutOfTicks { pool_id }))
    }
}
