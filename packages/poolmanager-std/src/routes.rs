use std::collections::BTreeSet;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;
use thiserror::Error;

use crate::denom::validate_denom;

/// A single hop of an exact amount in route.
#[cw_serde]
pub struct SwapAmountInRoute {
    /// The pool to swap through.
    pub pool_id: u64,
    /// The denom received from this hop.
    pub token_out_denom: String,
}

/// A single hop of an exact amount out route.
#[cw_serde]
pub struct SwapAmountOutRoute {
    /// The pool to swap through.
    pub pool_id: u64,
    /// The denom paid into this hop.
    pub token_in_denom: String,
}

/// One leg of a split exact amount in swap.
#[cw_serde]
pub struct SwapAmountInSplitRoute {
    pub pools: Vec<SwapAmountInRoute>,
    /// The amount of the common input denom sent down this leg.
    pub token_in_amount: Uint128,
}

/// One leg of a split exact amount out swap.
#[cw_serde]
pub struct SwapAmountOutSplitRoute {
    pub pools: Vec<SwapAmountOutRoute>,
    /// The amount of the common output denom expected from this leg.
    pub token_out_amount: Uint128,
}

#[derive(Error, Debug, PartialEq)]
pub enum RouteError {
    #[error("Swap routes must not be empty")]
    EmptyRoutes,

    #[error("Invalid denom {denom} in swap route")]
    InvalidDenom { denom: String },

    #[error("Duplicate routes are not allowed in a split route")]
    DuplicateRoutes,

    #[error("Split routes must all end with {expected}, got {actual}")]
    InvalidFinalTokenOut { expected: String, actual: String },

    #[error("Split routes must all start with {expected}, got {actual}")]
    InvalidFinalTokenIn { expected: String, actual: String },
}

fn check_denom(denom: &str) -> Result<(), RouteError> {
    validate_denom(denom).map_err(|_| RouteError::InvalidDenom {
        denom: denom.to_string(),
    })
}

/// Checks that the route has at least one hop and that every output denom is well formed.
pub fn validate_swap_amount_in_route(routes: &[SwapAmountInRoute]) -> Result<(), RouteError> {
    if routes.is_empty() {
        return Err(RouteError::EmptyRoutes);
    }

    routes
        .iter()
        .try_for_each(|route| check_denom(&route.token_out_denom))
}

/// Checks that the route has at least one hop and that every input denom is well formed.
pub fn validate_swap_amount_out_route(routes: &[SwapAmountOutRoute]) -> Result<(), RouteError> {
    if routes.is_empty() {
        return Err(RouteError::EmptyRoutes);
    }

    routes
        .iter()
        .try_for_each(|route| check_denom(&route.token_in_denom))
}

/// Validates a split exact amount in swap: non empty, every leg valid, a common final
/// output denom and no structurally identical legs.
pub fn validate_swap_amount_in_split_route(
    routes: &[SwapAmountInSplitRoute],
) -> Result<(), RouteError> {
    let first = routes.first().ok_or(RouteError::EmptyRoutes)?;
    validate_swap_amount_in_route(&first.pools)?;
    let expected = last_token_out(&first.pools);

    let mut seen = BTreeSet::new();
    for route in routes {
        validate_swap_amount_in_route(&route.pools)?;

        let actual = last_token_out(&route.pools);
        if actual != expected {
            return Err(RouteError::InvalidFinalTokenOut {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }

        let key: Vec<(u64, &str)> = route
            .pools
            .iter()
            .map(|hop| (hop.pool_id, hop.token_out_denom.as_str()))
            .collect();
        if !seen.insert(key) {
            return Err(RouteError::DuplicateRoutes);
        }
    }

    Ok(())
}

/// Validates a split exact amount out swap: non empty, every leg valid, a common initial
/// input denom and no structurally identical legs.
pub fn validate_swap_amount_out_split_route(
    routes: &[SwapAmountOutSplitRoute],
) -> Result<(), RouteError> {
    let first = routes.first().ok_or(RouteError::EmptyRoutes)?;
    validate_swap_amount_out_route(&first.pools)?;
    let expected = first_token_in(&first.pools);

    let mut seen = BTreeSet::new();
    for route in routes {
        validate_swap_amount_out_route(&route.pools)?;

        let actual = first_token_in(&route.pools);
        if actual != expected {
            return Err(RouteError::InvalidFinalTokenIn {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }

        let key: Vec<(u64, &str)> = route
            .pools
            .iter()
            .map(|hop| (hop.pool_id, hop.token_in_denom.as_str()))
            .collect();
        if !seen.insert(key) {
            return Err(RouteError::DuplicateRoutes);
        }
    }

    Ok(())
}

fn last_token_out(pools: &[SwapAmountInRoute]) -> &str {
    pools
        .last()
        .map(|hop| hop.token_out_denom.as_str())
        .unwrap_or_default()
}

fn first_token_in(pools: &[SwapAmountOutRoute]) -> &str {
    pools
        .first()
        .map(|hop| hop.token_in_denom.as_str())
        .unwrap_or_default()
}
