use std::fmt;

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, Decimal, Uint128};
use cw_ownable::{cw_ownable_execute, cw_ownable_query};

use crate::routes::{
    SwapAmountInRoute, SwapAmountInSplitRoute, SwapAmountOutRoute, SwapAmountOutSplitRoute,
};
use crate::taker_fee::TakerFeeDistributionPercentage;

/// The base asset of the chain. Fee discounts, volume and TVL are expressed in it.
pub const BASE_DENOM: &str = "uosmo";

/// The pool model families the pool manager can route to.
#[cw_serde]
#[derive(Copy, Eq, PartialOrd, Ord, Hash)]
pub enum PoolType {
    /// Equal weight constant product pool.
    Balancer,
    /// Two asset stableswap curve.
    Stableswap,
    /// Concentrated liquidity pool contract.
    Concentrated,
    /// Programmable pool contract, e.g. an alloyed asset pool.
    CosmWasm,
}

impl PoolType {
    pub const ALL: [PoolType; 4] = [
        PoolType::Balancer,
        PoolType::Stableswap,
        PoolType::Concentrated,
        PoolType::CosmWasm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolType::Balancer => "balancer",
            PoolType::Stableswap => "stableswap",
            PoolType::Concentrated => "concentrated",
            PoolType::CosmWasm => "cosmwasm",
        }
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform view over a pool, whichever module owns it.
#[cw_serde]
pub struct PoolInfo {
    /// The pool id assigned at creation.
    pub id: u64,
    /// The custody account of the pool.
    pub address: Addr,
    /// The family the pool belongs to.
    pub pool_type: PoolType,
    /// The denoms the pool trades, sorted.
    pub pool_denoms: Vec<String>,
    /// The spread factor charged by the pool on every swap.
    pub spread_factor: Decimal,
    /// The outstanding LP shares, if the pool issues any.
    pub total_shares: Option<Coin>,
    /// Inactive pools reject swaps.
    pub active: bool,
}

/// Pool creation request, one variant per pool family.
#[cw_serde]
pub enum CreatePoolMsg {
    Balancer {
        /// Initial liquidity, also defines the pool denoms. Must be sent as funds.
        pool_assets: Vec<Coin>,
        spread_factor: Decimal,
    },
    Stableswap {
        /// Initial liquidity for exactly two assets. Must be sent as funds.
        pool_assets: Vec<Coin>,
        /// Decimals of each asset, in the same order as `pool_assets`.
        asset_decimals: Vec<u8>,
        spread_factor: Decimal,
        /// The amplification of the constant sum part of the curve.
        amp: u64,
    },
    /// Registers an already instantiated concentrated liquidity pool contract.
    Concentrated { contract_address: String },
    /// Registers an already instantiated programmable pool contract.
    CosmWasm { contract_address: String },
}

impl CreatePoolMsg {
    pub fn pool_type(&self) -> PoolType {
        match self {
            CreatePoolMsg::Balancer { .. } => PoolType::Balancer,
            CreatePoolMsg::Stableswap { .. } => PoolType::Stableswap,
            CreatePoolMsg::Concentrated { .. } => PoolType::Concentrated,
            CreatePoolMsg::CosmWasm { .. } => PoolType::CosmWasm,
        }
    }

    /// The liquidity the creator must send along with the creation fee.
    pub fn initial_liquidity(&self) -> &[Coin] {
        match self {
            CreatePoolMsg::Balancer { pool_assets, .. }
            | CreatePoolMsg::Stableswap { pool_assets, .. } => pool_assets,
            CreatePoolMsg::Concentrated { .. } | CreatePoolMsg::CosmWasm { .. } => &[],
        }
    }
}

/// Taker fee configuration.
#[cw_serde]
pub struct TakerFeeParams {
    /// Fee charged on every pair without an override.
    pub default_taker_fee: Decimal,
    /// Distribution of fees collected in the base asset.
    pub osmo_taker_fee_distribution: TakerFeeDistributionPercentage,
    /// Distribution of fees collected in any other asset.
    pub non_osmo_taker_fee_distribution: TakerFeeDistributionPercentage,
    /// Addresses allowed to override pair taker fees.
    pub admin_addresses: Vec<String>,
    /// Denom the community pool share of non whitelisted assets is swapped to.
    pub community_pool_denom_to_swap_non_whitelisted_assets_to: String,
    /// Denoms the community pool accepts without swapping. Absent from params stored before 1.1.0.
    #[serde(default)]
    pub community_pool_denom_whitelist: Vec<String>,
    /// Senders that never pay the taker fee.
    pub reduced_fee_whitelist: Vec<String>,
}

/// Contract wide parameters.
#[cw_serde]
pub struct Params {
    /// Fee charged when creating a pool, sent to the community pool.
    pub pool_creation_fee: Vec<Coin>,
    pub taker_fee_params: TakerFeeParams,
    /// Quote denoms accepted for protocol price discovery.
    pub authorized_quote_denoms: Vec<String>,
    /// Receives every taker fee collected.
    pub taker_fee_collector: Addr,
    /// Receives pool creation fees.
    pub community_pool: Addr,
    /// Contract answering whether a pool is incentivized, used for the two hop fee discount.
    pub incentives: Option<Addr>,
    /// Creators exempt from the pool creation fee.
    pub unrestricted_pool_creators: Vec<Addr>,
}

#[cw_serde]
pub struct InstantiateMsg {
    pub pool_creation_fee: Vec<Coin>,
    pub taker_fee_params: TakerFeeParams,
    pub authorized_quote_denoms: Vec<String>,
    pub taker_fee_collector: String,
    pub community_pool: String,
    pub incentives: Option<String>,
    pub unrestricted_pool_creators: Vec<String>,
}

#[cw_serde]
pub struct MigrateMsg {}

/// A taker fee override for a denom pair.
#[cw_serde]
pub struct DenomPairTakerFee {
    pub denom0: String,
    pub denom1: String,
    pub taker_fee: Decimal,
}

/// A standing revenue share agreement for a denom.
#[cw_serde]
pub struct TakerFeeShareAgreement {
    pub denom: String,
    /// Share of the taker fee skimmed for the agreement, in `[0, 1]`.
    pub skim_percent: Decimal,
    pub skim_address: Addr,
}

/// Derived taker fee share agreements of an alloyed pool, scaled by each constituent's share
/// of the pool's normalized liquidity.
#[cw_serde]
pub struct AlloyContractTakerFeeShareState {
    pub contract_address: Addr,
    pub taker_fee_share_agreements: Vec<TakerFeeShareAgreement>,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Creates a pool. Initial liquidity and the creation fee are sent as funds.
    CreatePool { pool: CreatePoolMsg },
    /// Creates a concentrated pool without fee or initial liquidity. Only callable by the
    /// pool manager itself.
    CreateConcentratedPoolAsPoolManager { contract_address: String },
    /// Swaps the sent funds through `routes`.
    SwapExactAmountIn {
        routes: Vec<SwapAmountInRoute>,
        token_out_min_amount: Uint128,
    },
    /// Swaps at most the sent funds for exactly `token_out`, refunding the rest.
    SwapExactAmountOut {
        routes: Vec<SwapAmountOutRoute>,
        token_out: Coin,
    },
    /// Splits the sent funds across several routes ending in the same denom.
    SplitRouteSwapExactAmountIn {
        routes: Vec<SwapAmountInSplitRoute>,
        token_in_denom: String,
        token_out_min_amount: Uint128,
    },
    /// Buys the sum of each leg's output using at most the sent funds.
    SplitRouteSwapExactAmountOut {
        routes: Vec<SwapAmountOutSplitRoute>,
        token_out_denom: String,
    },
    /// Single pool swap that skips the taker fee. Only callable by the taker fee collector.
    SwapExactAmountInNoTakerFee {
        pool_id: u64,
        token_out_denom: String,
        token_out_min_amount: Uint128,
    },
    /// Overrides pair taker fees. Only callable by taker fee admins.
    SetDenomPairTakerFee {
        denom_pair_taker_fees: Vec<DenomPairTakerFee>,
    },
    /// Sets the taker fee share agreement for a denom.
    SetTakerFeeShareAgreementForDenom {
        denom: String,
        skim_percent: Decimal,
        skim_address: String,
    },
    /// Registers a programmable pool as an alloyed asset pool.
    SetRegisteredAlloyedPool { pool_id: u64 },
    /// Recomputes the snapshot of a registered alloyed pool, e.g. after a join or exit.
    RecalculateAlloyedPool { pool_id: u64 },
    /// Updates the contract params.
    UpdateParams {
        pool_creation_fee: Option<Vec<Coin>>,
        taker_fee_params: Option<TakerFeeParams>,
        authorized_quote_denoms: Option<Vec<String>>,
        taker_fee_collector: Option<String>,
        community_pool: Option<String>,
        incentives: Option<String>,
        unrestricted_pool_creators: Option<Vec<String>>,
    },
}

#[cw_serde]
pub enum SudoMsg {
    /// Warms the taker fee share caches.
    BeginBlock {},
    /// Recalculates the registered alloyed pools among the pools whose liquidity changed.
    EndBlock { changed_pool_ids: Vec<u64> },
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Params)]
    Params {},
    #[returns(NumPoolsResponse)]
    NumPools {},
    #[returns(PoolTypeResponse)]
    PoolType { pool_id: u64 },
    #[returns(PoolInfo)]
    Pool { pool_id: u64 },
    /// A page of pools, ordered by id.
    #[returns(PoolsResponse)]
    AllPools {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// A page of the pools trading `denom`, ordered by id.
    #[returns(PoolsResponse)]
    ListPoolsByDenom {
        denom: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(PoolDenomsResponse)]
    PoolDenoms { pool_id: u64 },
    /// Amount of `quote_asset_denom` per unit of `base_asset_denom`.
    #[returns(SpotPriceResponse)]
    SpotPrice {
        pool_id: u64,
        quote_asset_denom: String,
        base_asset_denom: String,
    },
    #[returns(LiquidityResponse)]
    TotalPoolLiquidity { pool_id: u64 },
    /// Liquidity summed across a page of pools, ordered by id.
    #[returns(LiquidityResponse)]
    TotalLiquidity {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(EstimateSwapExactAmountInResponse)]
    EstimateSwapExactAmountIn {
        routes: Vec<SwapAmountInRoute>,
        token_in: Coin,
    },
    #[returns(EstimateSwapExactAmountInResponse)]
    EstimateSwapExactAmountInWithoutTakerFee {
        routes: Vec<SwapAmountInRoute>,
        token_in: Coin,
    },
    #[returns(EstimateSwapExactAmountOutResponse)]
    EstimateSwapExactAmountOut {
        routes: Vec<SwapAmountOutRoute>,
        token_out: Coin,
    },
    #[returns(TradingPairTakerFeeResponse)]
    TradingPairTakerFee { denom0: String, denom1: String },
    /// Pair overrides ordered by (denom0, denom1).
    #[returns(Vec<DenomPairTakerFee>)]
    AllDenomPairTakerFees {
        start_after: Option<(String, String)>,
        limit: Option<u32>,
    },
    #[returns(TakerFeeTrackersResponse)]
    TakerFeeTrackers {},
    #[returns(Option<TakerFeeShareAgreement>)]
    TakerFeeShareAgreement { denom: String },
    #[returns(Vec<TakerFeeShareAgreement>)]
    AllTakerFeeShareAgreements {},
    #[returns(RegisteredAlloyedPool)]
    RegisteredAlloyedPool { pool_id: u64 },
    /// Ordered by alloyed denom.
    #[returns(Vec<RegisteredAlloyedPool>)]
    AllRegisteredAlloyedPools {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Skimmed taker fees accrued for a taker fee share denom.
    #[returns(Vec<Coin>)]
    TakerFeeShareAccumulators { denom: String },
    /// Cumulative swap volume of the pool in the base asset.
    #[returns(PoolVolumeResponse)]
    PoolVolume { pool_id: u64 },
}

#[cw_serde]
pub struct NumPoolsResponse {
    pub num_pools: u64,
}

#[cw_serde]
pub struct PoolTypeResponse {
    pub pool_type: PoolType,
}

#[cw_serde]
pub struct PoolsResponse {
    pub pools: Vec<PoolInfo>,
}

#[cw_serde]
pub struct PoolDenomsResponse {
    pub denoms: Vec<String>,
}

#[cw_serde]
pub struct SpotPriceResponse {
    pub spot_price: Decimal,
}

#[cw_serde]
pub struct LiquidityResponse {
    pub liquidity: Vec<Coin>,
}

#[cw_serde]
pub struct EstimateSwapExactAmountInResponse {
    pub token_out_amount: Uint128,
}

#[cw_serde]
pub struct EstimateSwapExactAmountOutResponse {
    pub token_in_amount: Uint128,
}

#[cw_serde]
pub struct TradingPairTakerFeeResponse {
    pub taker_fee: Decimal,
}

#[cw_serde]
pub struct TakerFeeTrackersResponse {
    pub for_staking_rewards: Vec<Coin>,
    pub for_community_pool: Vec<Coin>,
    pub start_height: u64,
}

/// A registered alloyed pool with its last computed taker fee share snapshot.
#[cw_serde]
pub struct RegisteredAlloyedPool {
    pub pool_id: u64,
    pub alloyed_denom: String,
    pub state: AlloyContractTakerFeeShareState,
}

#[cw_serde]
pub struct PoolVolumeResponse {
    pub volume: Uint128,
}
