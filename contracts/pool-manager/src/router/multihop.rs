use cosmwasm_std::{ensure, Addr, Coin, CosmosMsg, Deps, DepsMut, Env, Uint128};
use poolmanager_std::routes::{
    validate_swap_amount_in_route, validate_swap_amount_out_route, SwapAmountInRoute,
    SwapAmountOutRoute,
};
use poolmanager_std::taker_fee::calc_taker_fee_exact_out;

use crate::registry::PoolManager;
use crate::router::Hop;
use crate::state::PARAMS;
use crate::taker_fee::{charge_taker_fee, get_trading_pair_taker_fee};
use crate::ContractError;

/// The result of executing a route.
#[derive(Debug, Default, PartialEq)]
pub struct RouteExecution {
    /// Amount received for exact in routes, amount paid including taker fees for exact out
    /// routes.
    pub amount: Uint128,
    /// Taker fee transfers and pool contract calls, in execution order.
    pub messages: Vec<CosmosMsg>,
}

impl PoolManager {
    /// Swaps `token_in` through every hop of `routes`, charging the taker fee on each hop's
    /// input. Intermediate hops only require a non zero output, the last hop must yield at least
    /// `token_out_min_amount`.
    pub fn route_exact_amount_in(
        &self,
        mut deps: DepsMut,
        env: &Env,
        sender: &Addr,
        routes: &[SwapAmountInRoute],
        token_in: Coin,
        token_out_min_amount: Uint128,
    ) -> Result<RouteExecution, ContractError> {
        validate_swap_amount_in_route(routes)?;
        ensure!(!token_in.amount.is_zero(), ContractError::InvalidZeroAmount {});

        let params = PARAMS.load(deps.storage)?;
        let pool_ids: Vec<u64> = routes.iter().map(|route| route.pool_id).collect();
        let intermediate_denoms: Vec<&str> = routes[..routes.len() - 1]
            .iter()
            .map(|route| route.token_out_denom.as_str())
            .collect();
        let final_denom = &routes[routes.len() - 1].token_out_denom;

        let hops = self.resolve_hops(
            deps.as_ref(),
            &pool_ids,
            &intermediate_denoms,
            &token_in.denom,
            final_denom,
        )?;

        let mut execution = RouteExecution::default();
        let mut involved_denoms = vec![token_in.denom.clone()];
        let mut taker_fees = vec![];
        let mut token_in = token_in;

        for (i, (route, hop)) in routes.iter().zip(hops.iter()).enumerate() {
            self.claim_pool_swap(&hop.pool)?;

            let charge = charge_taker_fee(
                deps.storage,
                &params,
                &token_in,
                &route.token_out_denom,
                sender,
                true,
            )?;
            execution.messages.extend(charge.message);
            taker_fees.push(charge.fee);

            let min_out = if i == routes.len() - 1 {
                token_out_min_amount
            } else {
                Uint128::one()
            };
            let outcome = hop.module.swap_exact_amount_in(
                deps.branch(),
                env,
                &hop.pool,
                &charge.token,
                &route.token_out_denom,
                min_out,
                hop.spread_factor,
            )?;
            execution.messages.extend(outcome.messages);

            self.track_volume(deps.branch(), hop.pool.id, &token_in)?;

            token_in = Coin {
                denom: route.token_out_denom.clone(),
                amount: outcome.amount,
            };
            involved_denoms.push(route.token_out_denom.clone());
        }

        self.taker_fee_skim(deps.storage, &involved_denoms, &taker_fees)?;

        execution.amount = token_in.amount;
        Ok(execution)
    }

    /// Buys exactly `token_out` through `routes`, paying at most `token_in_max_amount`.
    ///
    /// The input of every hop is first solved backwards from `token_out`, taker fees included.
    /// The forward pass then executes each hop for the output the next hop needs, with the first
    /// hop bounded by the caller's maximum rather than the estimate.
    pub fn route_exact_amount_out(
        &self,
        mut deps: DepsMut,
        env: &Env,
        sender: &Addr,
        routes: &[SwapAmountOutRoute],
        token_in_max_amount: Uint128,
        token_out: Coin,
    ) -> Result<RouteExecution, ContractError> {
        validate_swap_amount_out_route(routes)?;
        ensure!(!token_out.amount.is_zero(), ContractError::InvalidZeroAmount {});

        let params = PARAMS.load(deps.storage)?;
        let hops = self.resolve_exact_out_hops(deps.as_ref(), routes, &token_out.denom)?;

        let mut ins_expected = expected_ins(deps.as_ref(), routes, &hops, &token_out)?;
        ins_expected[0] = token_in_max_amount;

        let mut execution = RouteExecution::default();
        let mut involved_denoms = vec![];
        let mut taker_fees = vec![];

        for (i, (route, hop)) in routes.iter().zip(hops.iter()).enumerate() {
            self.claim_pool_swap(&hop.pool)?;

            let hop_out = match routes.get(i + 1) {
                Some(next) => Coin {
                    denom: next.token_in_denom.clone(),
                    amount: ins_expected[i + 1],
                },
                None => token_out.clone(),
            };

            let outcome = hop.module.swap_exact_amount_out(
                deps.branch(),
                env,
                &hop.pool,
                &route.token_in_denom,
                ins_expected[i],
                &hop_out,
                hop.spread_factor,
            )?;

            let swapped_in = Coin {
                denom: route.token_in_denom.clone(),
                amount: outcome.amount,
            };
            let charge = charge_taker_fee(
                deps.storage,
                &params,
                &swapped_in,
                &hop_out.denom,
                sender,
                false,
            )?;
            if i == 0 {
                execution.amount = charge.token.amount;
            }
            execution.messages.extend(charge.message);
            execution.messages.extend(outcome.messages);
            taker_fees.push(charge.fee);

            self.track_volume(deps.branch(), hop.pool.id, &swapped_in)?;
            involved_denoms.push(route.token_in_denom.clone());
        }
        involved_denoms.push(token_out.denom);

        ensure!(
            execution.amount <= token_in_max_amount,
            ContractError::PriceImpactProtectionExactOut {
                max: token_in_max_amount,
                actual: execution.amount,
            }
        );

        self.taker_fee_skim(deps.storage, &involved_denoms, &taker_fees)?;

        Ok(execution)
    }

    pub(crate) fn resolve_exact_out_hops(
        &self,
        deps: Deps,
        routes: &[SwapAmountOutRoute],
        token_out_denom: &str,
    ) -> Result<Vec<Hop<'_>>, ContractError> {
        let pool_ids: Vec<u64> = routes.iter().map(|route| route.pool_id).collect();
        let intermediate_denoms: Vec<&str> = routes[1..]
            .iter()
            .map(|route| route.token_in_denom.as_str())
            .collect();

        self.resolve_hops(
            deps,
            &pool_ids,
            &intermediate_denoms,
            &routes[0].token_in_denom,
            token_out_denom,
        )
    }
}

/// Input each hop needs, taker fee included, to end up with `token_out`. Solved from the last
/// hop backwards.
pub(crate) fn expected_ins(
    deps: Deps,
    routes: &[SwapAmountOutRoute],
    hops: &[Hop],
    token_out: &Coin,
) -> Result<Vec<Uint128>, ContractError> {
    let mut ins = vec![Uint128::zero(); routes.len()];
    let mut hop_out = token_out.clone();

    for i in (0..routes.len()).rev() {
        let hop = &hops[i];
        let token_in = hop.module.calc_in_amt_given_out(
            deps,
            &hop.pool,
            &hop_out,
            &routes[i].token_in_denom,
            hop.spread_factor,
        )?;

        let taker_fee = get_trading_pair_taker_fee(deps.storage, &token_in.denom, &hop_out.denom)?;
        let (gross, _) = calc_taker_fee_exact_out(&token_in, taker_fee)?;

        ins[i] = gross.amount;
        hop_out = gross;
    }

    Ok(ins)
}
