use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use cosmwasm_std::{Coin, Deps, Uint128};
use poolmanager_std::routes::{
    validate_swap_amount_in_route, validate_swap_amount_out_route, SwapAmountInRoute,
    SwapAmountOutRoute,
};
use poolmanager_std::taker_fee::calc_taker_fee_exact_in;

use crate::registry::PoolManager;
use crate::router::multihop::expected_ins;
use crate::taker_fee::get_trading_pair_taker_fee;
use crate::ContractError;

impl PoolManager {
    /// Output of swapping `token_in` through `routes`, without touching any pool.
    pub fn estimate_swap_exact_amount_in(
        &self,
        deps: Deps,
        routes: &[SwapAmountInRoute],
        token_in: &Coin,
        with_taker_fee: bool,
    ) -> Result<Uint128, ContractError> {
        recover_estimation(|| {
            validate_swap_amount_in_route(routes)?;

            let pool_ids: Vec<u64> = routes.iter().map(|route| route.pool_id).collect();
            let intermediate_denoms: Vec<&str> = routes[..routes.len() - 1]
                .iter()
                .map(|route| route.token_out_denom.as_str())
                .collect();
            let hops = self.resolve_hops(
                deps,
                &pool_ids,
                &intermediate_denoms,
                &token_in.denom,
                &routes[routes.len() - 1].token_out_denom,
            )?;

            let mut token = token_in.clone();
            for (route, hop) in routes.iter().zip(hops.iter()) {
                if with_taker_fee {
                    let taker_fee = get_trading_pair_taker_fee(
                        deps.storage,
                        &token.denom,
                        &route.token_out_denom,
                    )?;
                    token = calc_taker_fee_exact_in(&token, taker_fee)?.0;
                }

                token = hop.module.calc_out_amt_given_in(
                    deps,
                    &hop.pool,
                    &token,
                    &route.token_out_denom,
                    hop.spread_factor,
                )?;
            }

            Ok(token.amount)
        })
    }

    /// Input, taker fees included, needed to receive `token_out` through `routes`.
    pub fn estimate_swap_exact_amount_out(
        &self,
        deps: Deps,
        routes: &[SwapAmountOutRoute],
        token_out: &Coin,
    ) -> Result<Uint128, ContractError> {
        recover_estimation(|| {
            validate_swap_amount_out_route(routes)?;

            let hops = self.resolve_exact_out_hops(deps, routes, &token_out.denom)?;
            let ins = expected_ins(deps, routes, &hops, token_out)?;

            Ok(ins[0])
        })
    }
}

/// Runs an estimation, turning any panic raised by pool math into an error.
///
/// Only effective where panics unwind; contracts built with `panic = "abort"` still abort.
pub(crate) fn recover_estimation<T>(
    estimate: impl FnOnce() -> Result<T, ContractError>,
) -> Result<T, ContractError> {
    panic::catch_unwind(AssertUnwindSafe(estimate)).unwrap_or_else(|payload| {
        Err(ContractError::EstimationPanicked {
            reason: panic_reason(payload.as_ref()),
        })
    })
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        reason.to_string()
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason.clone()
    } else {
        "unknown panic".to_string()
    }
}
