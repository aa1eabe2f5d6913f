use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use cosmwasm_std::{
    to_json_vec, Addr, Coin, CosmosMsg, Decimal, Deps, DepsMut, Env, StdResult, Storage,
    Uint128,
};
use poolmanager_std::incentives::{IncentivesQueryMsg, IsPoolIncentivizedResponse};
use poolmanager_std::pool_manager::{CreatePoolMsg, Params, PoolInfo, PoolType};

use crate::modules::cfmm::CfmmModule;
use crate::modules::contract_pool::ContractPoolModule;
use crate::state::POOL_ROUTES;
use crate::taker_fee_share::TakerFeeShareCache;
use crate::ContractError;

/// Gas charged for every store read, mirroring the host's flat read cost.
pub const READ_COST_FLAT: u64 = 1_000;
/// Gas charged per byte read from the store.
pub const READ_COST_PER_BYTE: u64 = 3;

/// The result of executing a swap against a pool module.
#[derive(Debug, PartialEq)]
pub struct SwapOutcome {
    /// Amount received for exact in swaps, amount paid for exact out swaps.
    pub amount: Uint128,
    /// Messages the swap needs dispatched, e.g. a call into a pool contract.
    pub messages: Vec<CosmosMsg>,
}

/// The capability set every pool family exposes to the router.
pub trait PoolModule {
    /// Materializes the pool state for a creation request.
    fn create_pool(
        &self,
        deps: DepsMut,
        env: &Env,
        pool_id: u64,
        msg: &CreatePoolMsg,
    ) -> Result<PoolInfo, ContractError>;

    /// Runs the module's post creation work, e.g. minting LP shares to the creator.
    fn initialize_pool(
        &self,
        deps: DepsMut,
        env: &Env,
        pool: &PoolInfo,
        creator: &Addr,
    ) -> Result<Vec<CosmosMsg>, ContractError>;

    /// The custody account the module expects for the pool.
    fn pool_address(&self, deps: Deps, env: &Env, pool_id: u64) -> Result<Addr, ContractError>;

    fn get_pool(&self, deps: Deps, pool_id: u64) -> Result<PoolInfo, ContractError>;

    fn get_pool_denoms(&self, deps: Deps, pool_id: u64) -> Result<Vec<String>, ContractError> {
        Ok(self.get_pool(deps, pool_id)?.pool_denoms)
    }

    fn get_total_pool_liquidity(
        &self,
        deps: Deps,
        pool_id: u64,
    ) -> Result<Vec<Coin>, ContractError>;

    /// Amount of `quote_denom` per unit of `base_denom`.
    fn calculate_spot_price(
        &self,
        deps: Deps,
        pool_id: u64,
        quote_denom: &str,
        base_denom: &str,
    ) -> Result<Decimal, ContractError>;

    fn calc_out_amt_given_in(
        &self,
        deps: Deps,
        pool: &PoolInfo,
        token_in: &Coin,
        token_out_denom: &str,
        spread_factor: Decimal,
    ) -> Result<Coin, ContractError>;

    fn calc_in_amt_given_out(
        &self,
        deps: Deps,
        pool: &PoolInfo,
        token_out: &Coin,
        token_in_denom: &str,
        spread_factor: Decimal,
    ) -> Result<Coin, ContractError>;

    #[allow(clippy::too_many_arguments)]
    fn swap_exact_amount_in(
        &self,
        deps: DepsMut,
        env: &Env,
        pool: &PoolInfo,
        token_in: &Coin,
        token_out_denom: &str,
        token_out_min_amount: Uint128,
        spread_factor: Decimal,
    ) -> Result<SwapOutcome, ContractError>;

    #[allow(clippy::too_many_arguments)]
    fn swap_exact_amount_out(
        &self,
        deps: DepsMut,
        env: &Env,
        pool: &PoolInfo,
        token_in_denom: &str,
        token_in_max_amount: Uint128,
        token_out: &Coin,
        spread_factor: Decimal,
    ) -> Result<SwapOutcome, ContractError>;
}

/// Answers whether a pool receives liquidity incentives.
pub trait IncentiveOracle {
    fn is_pool_incentivized(&self, deps: Deps, pool_id: u64) -> Result<bool, ContractError>;
}

/// Queries the configured incentives contract. Without one no pool is incentivized.
pub struct IncentivesContract {
    pub address: Option<Addr>,
}

impl IncentiveOracle for IncentivesContract {
    fn is_pool_incentivized(&self, deps: Deps, pool_id: u64) -> Result<bool, ContractError> {
        let Some(address) = &self.address else {
            return Ok(false);
        };

        let response: IsPoolIncentivizedResponse = deps.querier.query_wasm_smart(
            address,
            &IncentivesQueryMsg::IsPoolIncentivized { pool_id },
        )?;
        Ok(response.is_incentivized)
    }
}

/// Counts the gas charged for route reads so cache hits can replay it.
#[derive(Default)]
pub struct GasMeter {
    consumed: Cell<u64>,
}

impl GasMeter {
    pub fn consume(&self, amount: u64) {
        self.consumed.set(self.consumed.get().saturating_add(amount));
    }

    pub fn consumed(&self) -> u64 {
        self.consumed.get()
    }
}

#[derive(Clone, Copy, Debug)]
struct CachedRoute {
    pool_type: PoolType,
    gas: u64,
}

/// Static table of pool type to the module implementing it.
pub type ModuleTable = BTreeMap<PoolType, Box<dyn PoolModule>>;

/// Owns the module table, the route cache and the taker fee share cache. Everything mutable
/// here is a cache over the store and can always be rebuilt from it.
pub struct PoolManager {
    pub(crate) modules: ModuleTable,
    route_cache: RefCell<BTreeMap<u64, CachedRoute>>,
    pub(crate) gas: GasMeter,
    pub(crate) incentives: Box<dyn IncentiveOracle>,
    pub(crate) taker_fee_share_cache: RefCell<Option<TakerFeeShareCache>>,
    /// Pool contracts already swapped through by the message being executed.
    pub(crate) swapped_pool_contracts: RefCell<BTreeSet<u64>>,
}

/// The modules compiled into the contract.
pub fn default_modules() -> ModuleTable {
    let mut modules: ModuleTable = BTreeMap::new();
    modules.insert(PoolType::Balancer, Box::new(CfmmModule::new(PoolType::Balancer)));
    modules.insert(
        PoolType::Stableswap,
        Box::new(CfmmModule::new(PoolType::Stableswap)),
    );
    modules.insert(
        PoolType::Concentrated,
        Box::new(ContractPoolModule::new(PoolType::Concentrated)),
    );
    modules.insert(
        PoolType::CosmWasm,
        Box::new(ContractPoolModule::new(PoolType::CosmWasm)),
    );
    modules
}

impl PoolManager {
    pub fn new(modules: ModuleTable, incentives: Box<dyn IncentiveOracle>) -> Self {
        Self {
            modules,
            route_cache: RefCell::new(BTreeMap::new()),
            gas: GasMeter::default(),
            incentives,
            taker_fee_share_cache: RefCell::new(None),
            swapped_pool_contracts: RefCell::new(BTreeSet::new()),
        }
    }

    /// Builds the manager used by the entry points, with every compiled module and the
    /// incentives contract from the params.
    pub fn from_params(params: &Params) -> Self {
        Self::new(
            default_modules(),
            Box::new(IncentivesContract {
                address: params.incentives.clone(),
            }),
        )
    }

    /// Persists the route for a pool and drops any cached binding for it.
    pub fn set_pool_route(
        &self,
        storage: &mut dyn Storage,
        pool_id: u64,
        pool_type: PoolType,
    ) -> StdResult<()> {
        POOL_ROUTES.save(storage, pool_id, &pool_type)?;
        self.route_cache.borrow_mut().remove(&pool_id);
        Ok(())
    }

    /// Resolves the module owning `pool_id`.
    pub fn get_pool_module(
        &self,
        storage: &dyn Storage,
        pool_id: u64,
    ) -> Result<&dyn PoolModule, ContractError> {
        self.resolve_route(storage, pool_id).map(|(_, module)| module)
    }

    pub fn get_pool_type(
        &self,
        storage: &dyn Storage,
        pool_id: u64,
    ) -> Result<PoolType, ContractError> {
        self.resolve_route(storage, pool_id)
            .map(|(pool_type, _)| pool_type)
    }

    fn resolve_route(
        &self,
        storage: &dyn Storage,
        pool_id: u64,
    ) -> Result<(PoolType, &dyn PoolModule), ContractError> {
        let cached = self.route_cache.borrow().get(&pool_id).copied();
        if let Some(cached) = cached {
            self.gas.consume(cached.gas);
            return Ok((cached.pool_type, self.module(cached.pool_type)?));
        }

        let before = self.gas.consumed();
        let pool_type = POOL_ROUTES
            .may_load(storage, pool_id)?
            .ok_or(ContractError::FailedToFindRoute { pool_id })?;
        self.gas.consume(route_read_cost(pool_id, pool_type)?);

        let module = self.module(pool_type)?;
        self.route_cache.borrow_mut().insert(
            pool_id,
            CachedRoute {
                pool_type,
                gas: self.gas.consumed() - before,
            },
        );

        Ok((pool_type, module))
    }

    /// Module registered for `pool_type` in this binary.
    pub fn module(&self, pool_type: PoolType) -> Result<&dyn PoolModule, ContractError> {
        self.modules
            .get(&pool_type)
            .map(|module| module.as_ref())
            .ok_or(ContractError::UndefinedRoute { pool_type })
    }

    pub fn get_pool(&self, deps: Deps, pool_id: u64) -> Result<PoolInfo, ContractError> {
        self.get_pool_module(deps.storage, pool_id)?
            .get_pool(deps, pool_id)
    }
}

fn route_read_cost(pool_id: u64, pool_type: PoolType) -> StdResult<u64> {
    let bytes = POOL_ROUTES.key(pool_id).len() + to_json_vec(&pool_type)?.len();
    Ok(READ_COST_FLAT + READ_COST_PER_BYTE * bytes as u64)
}
