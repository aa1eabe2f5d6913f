use std::str::FromStr;

use cosmwasm_std::testing::{mock_env, mock_info};
use cosmwasm_std::{coin, Addr, Decimal, Deps, Uint128};
use poolmanager_std::pool_manager::{CreatePoolMsg, ExecuteMsg, PoolInfo, PoolType};
use poolmanager_std::routes::SwapAmountInRoute;
use test_case::test_case;

use crate::contract::execute;
use crate::registry::{default_modules, PoolManager};
use crate::state::DIRECT_BASE_ROUTES;
use crate::tests::mock_module::StaticIncentives;
use crate::ContractError;

use super::{create_balancer_pool, setup, OWNER};

fn spread_factors(
    manager: &PoolManager,
    deps: Deps,
    pool_ids: &[u64],
    intermediate_denoms: &[&str],
    token_in_denom: &str,
    token_out_denom: &str,
) -> Vec<Decimal> {
    manager
        .resolve_hops(
            deps,
            pool_ids,
            intermediate_denoms,
            token_in_denom,
            token_out_denom,
        )
        .map(|hops| hops.iter().map(|hop| hop.spread_factor).collect())
        .unwrap_or_else(|err| panic!("failed to resolve hops: {err}"))
}

#[test_case("0.01", "0.03", "0.0075", "0.0225" ; "larger fee sets the route fee")]
#[test_case("0.02", "0.02", "0.01", "0.01" ; "equal fees are halved")]
#[test_case("0", "0.02", "0", "0.02" ; "zero fee hop stays free")]
#[test_case("0", "0", "0", "0" ; "free pools stay free")]
fn base_routed_two_hop_pays_a_single_route_fee(
    first: &str,
    second: &str,
    expected_first: &str,
    expected_second: &str,
) {
    let mut deps = setup();
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(1_000_000, "uosmo")],
        Decimal::from_str(first).unwrap(),
    );
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uion"), coin(1_000_000, "uosmo")],
        Decimal::from_str(second).unwrap(),
    );

    let manager = PoolManager::new(default_modules(), Box::new(StaticIncentives(vec![1, 2])));
    assert_eq!(
        spread_factors(
            &manager,
            deps.as_ref(),
            &[1, 2],
            &["uosmo"],
            "uatom",
            "uion"
        ),
        vec![
            Decimal::from_str(expected_first).unwrap(),
            Decimal::from_str(expected_second).unwrap()
        ]
    );
}

#[test]
fn discount_needs_every_condition() {
    let mut deps = setup();
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(1_000_000, "uosmo")],
        Decimal::percent(1),
    );
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uion"), coin(1_000_000, "uosmo")],
        Decimal::percent(3),
    );
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(1_000_000, "uion")],
        Decimal::percent(1),
    );
    let undiscounted = vec![Decimal::percent(1), Decimal::percent(3)];

    // one pool without incentives
    let manager = PoolManager::new(default_modules(), Box::new(StaticIncentives(vec![1])));
    assert_eq!(
        spread_factors(
            &manager,
            deps.as_ref(),
            &[1, 2],
            &["uosmo"],
            "uatom",
            "uion"
        ),
        undiscounted
    );

    let manager = PoolManager::new(
        default_modules(),
        Box::new(StaticIncentives(vec![1, 2, 3])),
    );
    // not routed through the base asset
    assert_eq!(
        spread_factors(
            &manager,
            deps.as_ref(),
            &[3, 2],
            &["uion"],
            "uatom",
            "uosmo"
        ),
        vec![Decimal::percent(1), Decimal::percent(3)]
    );
    // round trip back into the input denom
    assert_eq!(
        spread_factors(
            &manager,
            deps.as_ref(),
            &[1, 1],
            &["uosmo"],
            "uatom",
            "uatom"
        ),
        vec![Decimal::percent(1), Decimal::percent(1)]
    );
    // single hop
    assert_eq!(
        spread_factors(&manager, deps.as_ref(), &[2], &[], "uion", "uosmo"),
        vec![Decimal::percent(3)]
    );
    // discounted
    assert_eq!(
        spread_factors(
            &manager,
            deps.as_ref(),
            &[1, 2],
            &["uosmo"],
            "uatom",
            "uion"
        ),
        vec![
            Decimal::from_str("0.0075").unwrap(),
            Decimal::from_str("0.0225").unwrap()
        ]
    );
}

#[test]
fn discount_ignores_pool_types() {
    let mut deps = setup();
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(1_000_000, "uosmo")],
        Decimal::percent(1),
    );
    execute(
        deps.as_mut(),
        mock_env(),
        mock_info(
            OWNER,
            &[coin(1_000_000, "uion"), coin(1_001_000, "uosmo")],
        ),
        ExecuteMsg::CreatePool {
            pool: CreatePoolMsg::Stableswap {
                pool_assets: vec![coin(1_000_000, "uion"), coin(1_000_000, "uosmo")],
                asset_decimals: vec![6, 6],
                spread_factor: Decimal::percent(3),
                amp: 100,
            },
        },
    )
    .unwrap();

    let manager = PoolManager::new(default_modules(), Box::new(StaticIncentives(vec![1, 2])));
    assert_eq!(manager.get_pool_type(&deps.storage, 2).unwrap(), PoolType::Stableswap);
    assert_eq!(
        spread_factors(
            &manager,
            deps.as_ref(),
            &[1, 2],
            &["uosmo"],
            "uatom",
            "uion"
        ),
        vec![
            Decimal::from_str("0.0075").unwrap(),
            Decimal::from_str("0.0225").unwrap()
        ]
    );
}

#[test]
fn direct_base_route_prefers_the_deepest_pool() {
    let mut deps = setup();
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(1_000_000, "uosmo")],
        Decimal::zero(),
    );
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(4_000_000, "uosmo")],
        Decimal::zero(),
    );
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(9_000_000, "uion")],
        Decimal::zero(),
    );

    let manager = PoolManager::new(default_modules(), Box::new(StaticIncentives(vec![])));
    assert_eq!(
        manager
            .get_direct_base_route_with_most_liquidity(deps.as_ref(), "uatom")
            .unwrap(),
        2
    );
    // 1 uatom is worth 4 uosmo in the deepest pool
    assert_eq!(
        manager
            .input_denom_to_base(deps.as_ref(), "uatom", 250u128.into())
            .unwrap(),
        Uint128::new(1_000)
    );
    // no base pool, no value
    assert_eq!(
        manager
            .input_denom_to_base(deps.as_ref(), "uion", 250u128.into())
            .unwrap(),
        Uint128::zero()
    );
    assert_eq!(
        manager
            .input_denom_to_base(deps.as_ref(), "uosmo", 250u128.into())
            .unwrap(),
        Uint128::new(250)
    );
}

#[test]
fn swaps_hand_the_direct_base_route_to_a_deeper_pool() {
    let mut deps = setup();
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(1_000_000, "uosmo")],
        Decimal::zero(),
    );
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(2_000_000, "uosmo")],
        Decimal::zero(),
    );
    // trades neither against the base asset, so it's never indexed
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(1_000_000, "uion")],
        Decimal::zero(),
    );
    assert_eq!(DIRECT_BASE_ROUTES.load(&deps.storage, "uatom").unwrap(), 2);
    assert_eq!(DIRECT_BASE_ROUTES.may_load(&deps.storage, "uion").unwrap(), None);

    // pool 1 ends up holding close to 3_000_000 uosmo
    execute(
        deps.as_mut(),
        mock_env(),
        mock_info("trader", &[coin(2_000_000, "uosmo")]),
        ExecuteMsg::SwapExactAmountIn {
            routes: vec![SwapAmountInRoute {
                pool_id: 1,
                token_out_denom: "uatom".to_string(),
            }],
            token_out_min_amount: Uint128::one(),
        },
    )
    .unwrap();

    let manager = PoolManager::new(default_modules(), Box::new(StaticIncentives(vec![])));
    assert_eq!(
        manager
            .get_direct_base_route_with_most_liquidity(deps.as_ref(), "uatom")
            .unwrap(),
        1
    );
}

#[test]
fn equally_deep_pools_keep_the_lowest_id() {
    let mut deps = setup();
    for _ in 0..2 {
        create_balancer_pool(
            &mut deps,
            vec![coin(1_000_000, "uatom"), coin(1_000_000, "uosmo")],
            Decimal::zero(),
        );
    }

    let manager = PoolManager::new(default_modules(), Box::new(StaticIncentives(vec![])));
    manager
        .refresh_direct_base_routes(deps.as_mut(), 2)
        .unwrap();
    assert_eq!(DIRECT_BASE_ROUTES.load(&deps.storage, "uatom").unwrap(), 1);
}

#[test]
fn pool_contracts_are_claimed_once_per_message() {
    let manager = PoolManager::new(default_modules(), Box::new(StaticIncentives(vec![])));
    let pool = |id: u64, pool_type: PoolType| PoolInfo {
        id,
        address: Addr::unchecked(format!("pool{id}")),
        pool_type,
        pool_denoms: vec!["uatom".to_string(), "uosmo".to_string()],
        spread_factor: Decimal::zero(),
        total_shares: None,
        active: true,
    };

    manager.claim_pool_swap(&pool(1, PoolType::Balancer)).unwrap();
    manager.claim_pool_swap(&pool(1, PoolType::Balancer)).unwrap();
    manager.claim_pool_swap(&pool(2, PoolType::CosmWasm)).unwrap();
    manager.claim_pool_swap(&pool(3, PoolType::Concentrated)).unwrap();

    assert_eq!(
        manager.claim_pool_swap(&pool(2, PoolType::CosmWasm)),
        Err(ContractError::PoolContractSwappedTwice { pool_id: 2 })
    );
    assert_eq!(
        manager.claim_pool_swap(&pool(3, PoolType::Concentrated)),
        Err(ContractError::PoolContractSwappedTwice { pool_id: 3 })
    );
}
