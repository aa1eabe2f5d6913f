use std::collections::{BTreeMap, BTreeSet};

use cosmwasm_std::{ensure, Coin, Decimal, Order, StdResult, Storage, Uint128};
use poolmanager_std::pool_manager::{RegisteredAlloyedPool, TakerFeeShareAgreement};

use crate::registry::PoolManager;
use crate::state::{
    get_registered_alloyed_pools, TAKER_FEE_SHARE_ACCRUED, TAKER_FEE_SHARE_AGREEMENTS,
};
use crate::ContractError;

pub mod commands;
pub mod snapshot;

/// In memory view of the taker fee share agreements and the registered alloyed pools.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TakerFeeShareCache {
    pub agreements: BTreeMap<String, TakerFeeShareAgreement>,
    pub alloyed_by_denom: BTreeMap<String, RegisteredAlloyedPool>,
    pub alloyed_pool_ids: BTreeSet<u64>,
}

impl TakerFeeShareCache {
    /// Rebuilds the cache from the store.
    pub fn load(storage: &dyn Storage) -> StdResult<Self> {
        let agreements = TAKER_FEE_SHARE_AGREEMENTS
            .range(storage, None, None, Order::Ascending)
            .collect::<StdResult<BTreeMap<_, _>>>()?;

        let mut cache = Self {
            agreements,
            ..Default::default()
        };
        for pool in get_registered_alloyed_pools(storage)? {
            cache.insert_alloyed_pool(pool);
        }

        Ok(cache)
    }

    fn insert_alloyed_pool(&mut self, pool: RegisteredAlloyedPool) {
        self.alloyed_pool_ids.insert(pool.pool_id);
        self.alloyed_by_denom.insert(pool.alloyed_denom.clone(), pool);
    }

    fn remove_alloyed_pool(&mut self, pool_id: u64) {
        self.alloyed_pool_ids.remove(&pool_id);
        self.alloyed_by_denom.retain(|_, pool| pool.pool_id != pool_id);
    }
}

impl PoolManager {
    /// Runs `f` over the taker fee share cache, loading it from the store on first use.
    pub fn with_taker_fee_share_cache<R>(
        &self,
        storage: &dyn Storage,
        f: impl FnOnce(&TakerFeeShareCache) -> R,
    ) -> StdResult<R> {
        let mut slot = self.taker_fee_share_cache.borrow_mut();
        let cache = match slot.take() {
            Some(cache) => cache,
            None => TakerFeeShareCache::load(storage)?,
        };

        let result = f(&cache);
        *slot = Some(cache);
        Ok(result)
    }

    /// Persists an agreement and mirrors it in the cache.
    pub fn save_taker_fee_share_agreement(
        &self,
        storage: &mut dyn Storage,
        agreement: &TakerFeeShareAgreement,
    ) -> StdResult<()> {
        TAKER_FEE_SHARE_AGREEMENTS.save(storage, &agreement.denom, agreement)?;

        if let Some(cache) = self.taker_fee_share_cache.borrow_mut().as_mut() {
            cache
                .agreements
                .insert(agreement.denom.clone(), agreement.clone());
        }
        Ok(())
    }

    /// Replaces the cached record of an alloyed pool, dropping any entry under a stale denom.
    pub(crate) fn cache_alloyed_pool(&self, pool: &RegisteredAlloyedPool) {
        if let Some(cache) = self.taker_fee_share_cache.borrow_mut().as_mut() {
            cache.remove_alloyed_pool(pool.pool_id);
            cache.insert_alloyed_pool(pool.clone());
        }
    }

    /// Skims the taker fees charged on a swap for the taker fee share agreements of the denoms
    /// the swap went through.
    ///
    /// Denoms with their own agreement take precedence. Only when none of the involved denoms
    /// has one are the scaled agreements of involved alloyed denoms used.
    pub fn taker_fee_skim(
        &self,
        storage: &mut dyn Storage,
        involved_denoms: &[String],
        taker_fees: &[Coin],
    ) -> Result<(), ContractError> {
        if taker_fees.iter().all(|fee| fee.amount.is_zero()) {
            return Ok(());
        }

        let skims = self.skim_agreements(storage, involved_denoms)?;
        if skims.is_empty() {
            return Ok(());
        }

        let total = skims
            .iter()
            .try_fold(Decimal::zero(), |total, (_, skim)| total.checked_add(*skim))?;
        ensure!(
            total <= Decimal::one(),
            ContractError::TakerFeeShareExceedsOne { total }
        );

        for fee in taker_fees {
            for (denom, skim) in &skims {
                let amount = fee.amount * *skim;
                increase_coin_pair(storage, denom, &fee.denom, amount)?;
            }
        }

        Ok(())
    }

    /// The (denom, skim percent) pairs a swap through `involved_denoms` pays out to.
    fn skim_agreements(
        &self,
        storage: &dyn Storage,
        involved_denoms: &[String],
    ) -> StdResult<Vec<(String, Decimal)>> {
        let denoms: BTreeSet<&str> = involved_denoms.iter().map(String::as_str).collect();

        self.with_taker_fee_share_cache(storage, |cache| {
            let tier_one: Vec<(String, Decimal)> = denoms
                .iter()
                .filter_map(|denom| cache.agreements.get(*denom))
                .map(|agreement| (agreement.denom.clone(), agreement.skim_percent))
                .collect();
            if !tier_one.is_empty() {
                return tier_one;
            }

            denoms
                .iter()
                .filter_map(|denom| cache.alloyed_by_denom.get(*denom))
                .flat_map(|pool| pool.state.taker_fee_share_agreements.iter())
                .map(|agreement| (agreement.denom.clone(), agreement.skim_percent))
                .collect()
        })
    }
}

fn increase_coin_pair(
    storage: &mut dyn Storage,
    share_denom: &str,
    fee_denom: &str,
    amount: Uint128,
) -> StdResult<()> {
    if amount.is_zero() {
        return Ok(());
    }

    TAKER_FEE_SHARE_ACCRUED.update(storage, (share_denom, fee_denom), |total| -> StdResult<_> {
        Ok(total.unwrap_or_default().checked_add(amount)?)
    })?;
    Ok(())
}
