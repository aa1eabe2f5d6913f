use cosmwasm_std::testing::{
    mock_dependencies, mock_env, mock_info, MockApi, MockQuerier, MockStorage,
};
use cosmwasm_std::{coin, Coin, Decimal, OwnedDeps, Response, Uint128};
use poolmanager_std::pool_manager::{CreatePoolMsg, ExecuteMsg, InstantiateMsg, TakerFeeParams};
use poolmanager_std::taker_fee::TakerFeeDistributionPercentage;

use crate::contract::{execute, instantiate};

mod migrate;
mod registry;
mod router;
mod taker_fee;
mod taker_fee_share;

pub(crate) const OWNER: &str = "owner";
pub(crate) const TAKER_FEE_COLLECTOR: &str = "collector";
pub(crate) const COMMUNITY_POOL: &str = "community";

pub(crate) fn instantiate_msg() -> InstantiateMsg {
    let distribution = TakerFeeDistributionPercentage {
        staking_rewards: Decimal::percent(70),
        community_pool: Decimal::percent(30),
    };

    InstantiateMsg {
        pool_creation_fee: vec![coin(1_000, "uosmo")],
        taker_fee_params: TakerFeeParams {
            default_taker_fee: Decimal::permille(1),
            osmo_taker_fee_distribution: distribution.clone(),
            non_osmo_taker_fee_distribution: distribution,
            admin_addresses: vec![OWNER.to_string()],
            community_pool_denom_to_swap_non_whitelisted_assets_to: "uusdc".to_string(),
            community_pool_denom_whitelist: vec!["uusdc".to_string()],
            reduced_fee_whitelist: vec![],
        },
        authorized_quote_denoms: vec!["uosmo".to_string(), "uatom".to_string()],
        taker_fee_collector: TAKER_FEE_COLLECTOR.to_string(),
        community_pool: COMMUNITY_POOL.to_string(),
        incentives: None,
        unrestricted_pool_creators: vec![],
    }
}

pub(crate) fn setup() -> OwnedDeps<MockStorage, MockApi, MockQuerier> {
    let mut deps = mock_dependencies();
    instantiate(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &[]),
        instantiate_msg(),
    )
    .unwrap();

    deps
}

/// Creates a balancer pool paying the default creation fee on top of the liquidity.
pub(crate) fn create_balancer_pool(
    deps: &mut OwnedDeps<MockStorage, MockApi, MockQuerier>,
    pool_assets: Vec<Coin>,
    spread_factor: Decimal,
) -> Response {
    let mut funds = pool_assets.clone();
    match funds.iter_mut().find(|asset| asset.denom == "uosmo") {
        Some(osmo) => osmo.amount += Uint128::new(1_000),
        None => funds.push(coin(1_000, "uosmo")),
    }

    execute(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &funds),
        ExecuteMsg::CreatePool {
            pool: CreatePoolMsg::Balancer {
                pool_assets,
                spread_factor,
            },
        },
    )
    .unwrap()
}
