use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, Decimal, Order, StdResult, Storage, Uint128};
use cw_storage_plus::{Bound, Index, IndexList, IndexedMap, Item, Map, UniqueIndex};
use poolmanager_std::pool_manager::{
    DenomPairTakerFee, Params, PoolType, RegisteredAlloyedPool, TakerFeeShareAgreement,
};

pub const PARAMS: Item<Params> = Item::new("params");

/// Id the next created pool receives. Starts at 1.
pub const NEXT_POOL_ID: Item<u64> = Item::new("next_pool_id");

/// Pool id to the pool family owning it. Written once per pool at creation.
pub const POOL_ROUTES: Map<u64, PoolType> = Map::new("pool_routes");

/// Custody account of each pool.
pub const POOL_ACCOUNTS: Map<&Addr, u64> = Map::new("pool_accounts");

/// Taker fee overrides keyed by the lexicographically ordered denom pair.
pub const DENOM_PAIR_TAKER_FEE: Map<(&str, &str), Decimal> = Map::new("denom_pair_taker_fee");

// running taker fee totals since TAKER_FEE_TRACKER_START_HEIGHT, keyed by denom
pub const TAKER_FEES_FOR_STAKERS: Map<&str, Uint128> = Map::new("taker_fees_for_stakers");
pub const TAKER_FEES_FOR_COMMUNITY_POOL: Map<&str, Uint128> =
    Map::new("taker_fees_for_community_pool");
pub const TAKER_FEE_TRACKER_START_HEIGHT: Item<u64> = Item::new("taker_fee_tracker_start_height");

pub const TAKER_FEE_SHARE_AGREEMENTS: Map<&str, TakerFeeShareAgreement> =
    Map::new("taker_fee_share_agreements");

/// Skimmed taker fees keyed by (taker fee share denom, fee denom).
pub const TAKER_FEE_SHARE_ACCRUED: Map<(&str, &str), Uint128> =
    Map::new("taker_fee_share_accrued");

/// Cumulative volume per pool, in the base asset.
pub const POOL_VOLUME: Map<u64, Uint128> = Map::new("pool_volume");

/// Denom to the pool pairing it with the base asset that held the most base asset liquidity when
/// last compared. Refreshed when a pool is created and whenever a pool is swapped through.
pub const DIRECT_BASE_ROUTES: Map<&str, u64> = Map::new("direct_base_routes");

// Registered alloyed pools are keyed by alloyed denom, with a unique index on the pool id so
// both lookups hit a single record.
pub const REGISTERED_ALLOYED_POOLS: IndexedMap<String, RegisteredAlloyedPool, AlloyedPoolIndexes> =
    IndexedMap::new(
        "registered_alloyed_pools",
        AlloyedPoolIndexes {
            pool_id: UniqueIndex::new(|pool| pool.pool_id, "registered_alloyed_pools__pool_id"),
        },
    );

pub struct AlloyedPoolIndexes<'a> {
    pub pool_id: UniqueIndex<'a, u64, RegisteredAlloyedPool, String>,
}

impl<'a> IndexList<RegisteredAlloyedPool> for AlloyedPoolIndexes<'a> {
    fn get_indexes(&'_ self) -> Box<dyn Iterator<Item = &'_ dyn Index<RegisteredAlloyedPool>> + '_> {
        let v: Vec<&dyn Index<RegisteredAlloyedPool>> = vec![&self.pool_id];
        Box::new(v.into_iter())
    }
}

/// Gets the registered alloyed pool for the given pool id, if any.
pub fn get_registered_alloyed_pool(
    storage: &dyn Storage,
    pool_id: u64,
) -> StdResult<Option<RegisteredAlloyedPool>> {
    Ok(REGISTERED_ALLOYED_POOLS
        .idx
        .pool_id
        .item(storage, pool_id)?
        .map(|(_, pool)| pool))
}

/// Every registered alloyed pool, ordered by alloyed denom.
pub fn get_registered_alloyed_pools(storage: &dyn Storage) -> StdResult<Vec<RegisteredAlloyedPool>> {
    REGISTERED_ALLOYED_POOLS
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, pool)| pool))
        .collect()
}

// settings for pagination
const MAX_LIMIT: u32 = 100;
const DEFAULT_LIMIT: u32 = 10;

pub fn page_limit(limit: Option<u32>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize
}

/// Routes of the pools created after `start_after`, ordered by pool id.
pub fn read_pool_routes(
    storage: &dyn Storage,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Vec<(u64, PoolType)>> {
    let limit = page_limit(limit);
    let start = start_after.map(Bound::exclusive);

    POOL_ROUTES
        .range(storage, start, None, Order::Ascending)
        .take(limit)
        .collect()
}

pub fn read_denom_pair_taker_fees(
    storage: &dyn Storage,
    start_after: Option<(String, String)>,
    limit: Option<u32>,
) -> StdResult<Vec<DenomPairTakerFee>> {
    let limit = page_limit(limit);
    let start = start_after
        .as_ref()
        .map(|(denom0, denom1)| Bound::exclusive((denom0.as_str(), denom1.as_str())));

    DENOM_PAIR_TAKER_FEE
        .range(storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let ((denom0, denom1), taker_fee) = item?;
            Ok(DenomPairTakerFee {
                denom0,
                denom1,
                taker_fee,
            })
        })
        .collect()
}

/// Registered alloyed pools after the alloyed denom `start_after`, ordered by alloyed denom.
pub fn read_registered_alloyed_pools(
    storage: &dyn Storage,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Vec<RegisteredAlloyedPool>> {
    let limit = page_limit(limit);
    let start = start_after.map(Bound::exclusive);

    REGISTERED_ALLOYED_POOLS
        .range(storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, pool)| pool))
        .collect()
}

/// Reads a denom keyed running total as coins, skipping empty entries.
pub fn read_coins(storage: &dyn Storage, map: &Map<&str, Uint128>) -> StdResult<Vec<Coin>> {
    map.range(storage, None, None, Order::Ascending)
        .filter(|item| !matches!(item, Ok((_, amount)) if amount.is_zero()))
        .map(|item| item.map(|(denom, amount)| Coin { denom, amount }))
        .collect()
}

/// Adds `amount` to the denom keyed running total. Zero increments are not written.
pub fn increase_coin<'a>(
    storage: &mut dyn Storage,
    map: &Map<'a, &'a str, Uint128>,
    denom: &'a str,
    amount: Uint128,
) -> StdResult<()> {
    if amount.is_zero() {
        return Ok(());
    }

    map.update(storage, denom, |total| -> StdResult<_> {
        Ok(total.unwrap_or_default().checked_add(amount)?)
    })?;
    Ok(())
}

/// Invariant used by a pool custodied by the pool manager.
#[cw_serde]
pub enum Curve {
    /// Equal weight constant product.
    ConstantProduct,
    /// Two asset stableswap.
    Stableswap {
        amp: u64,
        /// Decimals of each asset, same order as the pool assets.
        asset_decimals: Vec<u8>,
    },
}

/// State of a pool custodied by the pool manager itself (balancer and stableswap).
#[cw_serde]
pub struct CfmmPool {
    pub id: u64,
    pub pool_type: PoolType,
    /// Custody account the reserves are attributed to.
    pub address: Addr,
    /// Reserves sorted by denom.
    pub assets: Vec<Coin>,
    pub curve: Curve,
    pub spread_factor: Decimal,
    pub total_shares: Coin,
    pub active: bool,
}

pub const CFMM_POOLS: Map<u64, CfmmPool> = Map::new("cfmm_pools");

/// A pool living in its own contract, reached through the pool contract interface.
#[cw_serde]
pub struct ContractPool {
    pub id: u64,
    pub pool_type: PoolType,
    pub contract_address: Addr,
}

pub const CONTRACT_POOLS: Map<u64, ContractPool> = Map::new("contract_pools");
