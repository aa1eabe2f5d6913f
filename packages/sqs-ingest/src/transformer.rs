use std::collections::{BTreeMap, BTreeSet};

use cosmwasm_std::{coin, Coin, Decimal256, Uint128, Uint256};
use poolmanager_std::pool_manager::{PoolInfo, PoolType};
use tracing::{debug, warn};

use crate::config::IngesterConfig;
use crate::domain::{
    BlockPools, ChainReader, DenomPair, DenomRoutingInfo, PoolProjection, TakerFeeMap,
    TickLiquidityError, TickModel,
};
use crate::IngestError;

/// Converts chain pools into their query service projection, pricing every balance in the base
/// denom. Routing prices and pair taker fees are cached for the lifetime of the transformer,
/// which is one block.
pub struct PoolTransformer<'a, C: ChainReader> {
    chain: &'a C,
    config: &'a IngesterConfig,
    precisions: BTreeMap<String, u32>,
    routing: BTreeMap<String, DenomRoutingInfo>,
    taker_fees: TakerFeeMap,
}

impl<'a, C: ChainReader> PoolTransformer<'a, C> {
    pub fn new(chain: &'a C, config: &'a IngesterConfig, precisions: BTreeMap<String, u32>) -> Self {
        PoolTransformer {
            chain,
            config,
            precisions,
            routing: BTreeMap::new(),
            taker_fees: TakerFeeMap::new(),
        }
    }

    /// Seeds pair taker fees that win over anything read from the chain.
    pub fn with_taker_fees(mut self, taker_fees: TakerFeeMap) -> Self {
        self.taker_fees = taker_fees;
        self
    }

    /// Converts the pools of every family, cfmm first. Any pool failing conversion fails the
    /// whole block.
    pub fn transform(&mut self, pools: &BlockPools) -> Result<Vec<PoolProjection>, IngestError> {
        pools
            .cfmm
            .iter()
            .chain(pools.concentrated.iter())
            .chain(pools.cosmwasm.iter())
            .map(|pool| self.convert_pool(pool))
            .collect()
    }

    pub fn convert_pool(&mut self, pool: &PoolInfo) -> Result<PoolProjection, IngestError> {
        let conversion_error = |err: IngestError| IngestError::PoolConversion {
            pool_id: pool.id,
            reason: err.to_string(),
        };

        let balances = self.chain.pool_balances(pool).map_err(conversion_error)?;
        // the balances of pools with no liquidity are empty, so the denoms come from the router
        let mut denoms = self
            .chain
            .route_pool_denoms(pool.id)
            .map_err(conversion_error)?;
        denoms.sort();
        denoms.dedup();

        let balances = filter_balances(balances, &pool.pool_denoms);

        let (liquidity_cap_base, mut reasons) = self.liquidity_cap_base(&balances)?;
        let (liquidity_cap_usdc, usdc_reason) = self.liquidity_cap_usdc(liquidity_cap_base)?;
        reasons.extend(usdc_reason);

        if !reasons.is_empty() {
            warn!(
                pool_id = pool.id,
                reasons = ?reasons,
                "pool liquidity cap is partial"
            );
        }

        self.retrieve_taker_fees(&denoms)?;

        let tick_model = match pool.pool_type {
            PoolType::Concentrated => Some(self.tick_model(pool.id)?),
            _ => None,
        };

        Ok(PoolProjection {
            pool_id: pool.id,
            pool_type: pool.pool_type,
            address: pool.address.to_string(),
            pool_denoms: denoms,
            spread_factor: pool.spread_factor,
            balances,
            liquidity_cap_base,
            liquidity_cap_usdc,
            liquidity_cap_error: reasons.join("; "),
            tick_model,
        })
    }

    /// The taker fees gathered so far.
    pub fn into_taker_fees(self) -> TakerFeeMap {
        self.taker_fees
    }

    /// Sums the balances in the base denom. Balances that cannot be priced are left out and the
    /// reason recorded.
    fn liquidity_cap_base(
        &mut self,
        balances: &[Coin],
    ) -> Result<(Uint128, Vec<String>), IngestError> {
        let mut cap = Uint128::zero();
        let mut reasons = vec![];

        for balance in balances {
            if balance.denom == self.config.base_denom {
                cap = cap.checked_add(balance.amount)?;
                continue;
            }

            let routing = match self.routing.get(&balance.denom) {
                Some(routing) => routing.clone(),
                None => match self.base_price(&balance.denom) {
                    Ok(routing) => {
                        self.routing.insert(balance.denom.clone(), routing.clone());
                        routing
                    }
                    Err(reason) => {
                        debug!(denom = %balance.denom, %reason, "skipping balance");
                        reasons.push(reason);
                        continue;
                    }
                },
            };

            let contribution = Uint256::from(balance.amount)
                .checked_multiply_ratio(Decimal256::one().atomics(), routing.price.atomics())?;
            cap = cap.checked_add(Uint128::try_from(contribution)?)?;
        }

        Ok((cap, reasons))
    }

    /// Prices `denom` in the base denom: through the direct pool the chain routes it with, else
    /// a configured route, else at USDC parity for stablecoins.
    fn base_price(&self, denom: &str) -> Result<DenomRoutingInfo, String> {
        let base_denom = self.config.base_denom.as_str();

        let routing = match self.chain.pool_for_denom_pair(base_denom, denom) {
            Ok(pool_id) => {
                let precision = self
                    .precisions
                    .get(denom)
                    .ok_or_else(|| format!("error getting token precision {denom}"))?;
                let price = self
                    .chain
                    .spot_price(pool_id, denom, base_denom)
                    .map_err(|err| spot_price_error(denom, &err))?;
                let multiplier =
                    Decimal256::checked_from_ratio(self.config.base_precision, *precision)
                        .map_err(|err| spot_price_error(denom, &err))?;

                DenomRoutingInfo {
                    pool_id,
                    price: price
                        .checked_mul(multiplier)
                        .map_err(|err| spot_price_error(denom, &err))?,
                }
            }
            Err(no_route) => {
                if let Some(routes) = self.config.route_overwrites.get(denom) {
                    let one_base = self.config.one_base_unit();
                    let amount_in = self
                        .chain
                        .estimate_in_given_exact_amount_out(routes, coin(one_base, base_denom))
                        .map_err(|err| {
                            format!("error calculating spot price via multihop swap, {err}")
                        })?;
                    if amount_in.is_zero() {
                        return Err("error inverting price from route overwrite".to_string());
                    }

                    DenomRoutingInfo {
                        pool_id: routes.first().map(|route| route.pool_id).unwrap_or_default(),
                        price: Decimal256::from_ratio(amount_in, one_base),
                    }
                } else if self.config.stablecoin_denoms.iter().any(|d| d == denom) {
                    // priced like USDC, good enough to rank pools
                    let price = self
                        .chain
                        .spot_price(
                            self.config.default_usdc_pool_id,
                            &self.config.usdc_denom,
                            base_denom,
                        )
                        .map_err(|err| spot_price_error(denom, &err))?;

                    DenomRoutingInfo {
                        pool_id: self.config.default_usdc_pool_id,
                        price,
                    }
                } else {
                    return Err(no_route.to_string());
                }
            }
        };

        if routing.price.is_zero() {
            return Err(format!(
                "failed to calculate spot price due to it becoming zero from truncations {denom}"
            ));
        }

        Ok(routing)
    }

    /// Converts a base denom TVL into whole USDC, rounding up so pools with any liquidity keep a
    /// non zero cap.
    fn liquidity_cap_usdc(
        &self,
        cap_base: Uint128,
    ) -> Result<(Uint128, Option<String>), IngestError> {
        if cap_base.is_zero() {
            return Ok((Uint128::zero(), None));
        }

        let usdc_price = match self.chain.spot_price(
            self.config.default_usdc_pool_id,
            &self.config.usdc_denom,
            &self.config.base_denom,
        ) {
            Ok(price) => price,
            Err(err) => {
                return Ok((
                    Uint128::zero(),
                    Some(spot_price_error(&self.config.usdc_denom, &err)),
                ))
            }
        };

        let numerator = Uint256::from(cap_base).checked_mul(usdc_price.atomics())?;
        let denominator = Decimal256::one()
            .atomics()
            .checked_mul(Uint256::from(10u128.pow(self.config.usdc_precision)))?;
        let cap = numerator
            .checked_add(denominator)?
            .checked_sub(Uint256::one())?
            .checked_div(denominator)?;

        Ok((Uint128::try_from(cap)?, None))
    }

    /// Fills in the taker fee of every pair of `denoms` not already known.
    fn retrieve_taker_fees(&mut self, denoms: &[String]) -> Result<(), IngestError> {
        for (i, denom0) in denoms.iter().enumerate() {
            for denom1 in &denoms[i + 1..] {
                let pair = DenomPair::new(denom0, denom1);
                if self.taker_fees.contains_key(&pair) {
                    continue;
                }

                let taker_fee = match self.chain.denom_pair_taker_fee(&pair)? {
                    Some(taker_fee) => taker_fee,
                    None => self.chain.default_taker_fee()?,
                };
                self.taker_fees.insert(pair, taker_fee);
            }
        }

        Ok(())
    }

    fn tick_model(&self, pool_id: u64) -> Result<TickModel, IngestError> {
        match self.chain.tick_liquidity_for_full_range(pool_id) {
            Ok((ticks, current_tick_index)) => Ok(TickModel {
                ticks,
                current_tick_index,
                has_no_liquidity: false,
            }),
            Err(TickLiquidityError::RanOutOfTicks { .. }) => Ok(TickModel::no_liquidity()),
            Err(TickLiquidityError::Other(reason)) => {
                Err(IngestError::TickLiquidity { pool_id, reason })
            }
        }
    }
}

fn spot_price_error(denom: &str, err: &impl ToString) -> String {
    format!(
        "error calculating spot price for denom {denom}, {}",
        err.to_string()
    )
}

/// Drops balances of denoms the pool does not trade, e.g. dust sent to its address.
fn filter_balances(balances: Vec<Coin>, pool_denoms: &[String]) -> Vec<Coin> {
    let pool_denoms: BTreeSet<&str> = pool_denoms.iter().map(String::as_str).collect();

    let mut balances: Vec<Coin> = balances
        .into_iter()
        .filter(|balance| pool_denoms.contains(balance.denom.as_str()))
        .collect();
    balances.sort_by(|a, b| a.denom.cmp(&b.denom));
    balances
}
