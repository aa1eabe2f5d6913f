//! Read side model of the ingester and the seams it reads the chain and writes the store through.

use std::collections::BTreeMap;

use cosmwasm_std::{Coin, Decimal, Decimal256, Uint128};
use poolmanager_std::pool_manager::{PoolInfo, PoolType};
use poolmanager_std::routes::SwapAmountOutRoute;
use serde::{Deserialize, Serialize};

use crate::IngestError;

/// Every pool on chain at a height, grouped by family.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockPools {
    pub cfmm: Vec<PoolInfo>,
    pub concentrated: Vec<PoolInfo>,
    pub cosmwasm: Vec<PoolInfo>,
}

impl BlockPools {
    pub fn len(&self) -> usize {
        self.cfmm.len() + self.concentrated.len() + self.cosmwasm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A pair of denoms, always stored with `denom0 < denom1`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DenomPair {
    pub denom0: String,
    pub denom1: String,
}

impl DenomPair {
    pub fn new(a: &str, b: &str) -> Self {
        let (denom0, denom1) = if a <= b { (a, b) } else { (b, a) };
        DenomPair {
            denom0: denom0.to_string(),
            denom1: denom1.to_string(),
        }
    }
}

pub type TakerFeeMap = BTreeMap<DenomPair, Decimal>;

/// Base denom price of a denom, cached for one ingestion pass.
#[derive(Clone, Debug, PartialEq)]
pub struct DenomRoutingInfo {
    pub pool_id: u64,
    /// Amount of the denom per unit of the base denom.
    pub price: Decimal256,
}

/// Liquidity of a concentrated pool over a tick range.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LiquidityDepthWithRange {
    pub lower_tick: i64,
    pub upper_tick: i64,
    pub liquidity_amount: Decimal256,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TickModel {
    pub ticks: Vec<LiquidityDepthWithRange>,
    pub current_tick_index: i64,
    pub has_no_liquidity: bool,
}

impl TickModel {
    pub fn no_liquidity() -> Self {
        TickModel {
            ticks: vec![],
            current_tick_index: -1,
            has_no_liquidity: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickLiquidityError {
    /// The pool has no initialized ticks at all.
    RanOutOfTicks { pool_id: u64 },
    Other(String),
}

/// What the query service stores for each pool.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PoolProjection {
    pub pool_id: u64,
    pub pool_type: PoolType,
    pub address: String,
    /// Sorted denoms as reported by the pool manager.
    pub pool_denoms: Vec<String>,
    pub spread_factor: Decimal,
    /// Balances of the pool restricted to its own denoms.
    pub balances: Vec<Coin>,
    /// TVL in the base denom.
    pub liquidity_cap_base: Uint128,
    /// TVL in whole USDC, rounded up.
    pub liquidity_cap_usdc: Uint128,
    /// Why the TVL is partial, empty when every balance could be priced.
    pub liquidity_cap_error: String,
    pub tick_model: Option<TickModel>,
}

/// Everything written to the store for one block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockProjection {
    pub height: u64,
    pub pools: Vec<PoolProjection>,
    pub taker_fees: TakerFeeMap,
}

/// Read access to chain state at the height being ingested.
pub trait ChainReader {
    /// Decimals of every known token.
    fn denom_precisions(&self) -> Result<BTreeMap<String, u32>, IngestError>;

    fn block_pools(&self) -> Result<BlockPools, IngestError>;

    /// Bank balances of custodied pools, reported liquidity for pool contracts.
    fn pool_balances(&self, pool: &PoolInfo) -> Result<Vec<Coin>, IngestError>;

    /// Denoms of a pool as routed by the pool manager.
    fn route_pool_denoms(&self, pool_id: u64) -> Result<Vec<String>, IngestError>;

    /// The pool the chain uses to trade `denom` against `base_denom`.
    fn pool_for_denom_pair(&self, base_denom: &str, denom: &str) -> Result<u64, IngestError>;

    /// Amount of `quote_denom` per unit of `base_denom` in the pool.
    fn spot_price(
        &self,
        pool_id: u64,
        quote_denom: &str,
        base_denom: &str,
    ) -> Result<Decimal256, IngestError>;

    fn estimate_in_given_exact_amount_out(
        &self,
        routes: &[SwapAmountOutRoute],
        token_out: Coin,
    ) -> Result<Uint128, IngestError>;

    /// The persisted override for the pair, if any.
    fn denom_pair_taker_fee(&self, pair: &DenomPair) -> Result<Option<Decimal>, IngestError>;

    fn default_taker_fee(&self) -> Result<Decimal, IngestError>;

    fn tick_liquidity_for_full_range(
        &self,
        pool_id: u64,
    ) -> Result<(Vec<LiquidityDepthWithRange>, i64), TickLiquidityError>;
}

/// Destination of the projections. A commit makes every key of the block visible at once or
/// none of them.
pub trait ProjectionStore {
    fn commit(&self, projection: &BlockProjection) -> Result<(), IngestError>;
}
