use std::collections::BTreeMap;

use cosmwasm_std::testing::{mock_env, mock_info};
use cosmwasm_std::{coin, coins, Addr, Decimal};
use poolmanager_std::pool_manager::{CreatePoolMsg, PoolType};

use crate::manager::commands::{
    create_concentrated_pool_as_pool_manager, create_pool, MAX_POOL_ID,
};
use crate::registry::{
    default_modules, IncentivesContract, ModuleTable, PoolManager, PoolModule, READ_COST_FLAT,
};
use crate::state::{NEXT_POOL_ID, POOL_ACCOUNTS, POOL_ROUTES};
use crate::tests::mock_module::{MockModule, MOCK_POOL_ADDRESS};
use crate::ContractError;

use super::{create_balancer_pool, setup, OWNER};

fn manager_with(modules: ModuleTable) -> PoolManager {
    PoolManager::new(modules, Box::new(IncentivesContract { address: None }))
}

fn mock_modules(module: MockModule) -> ModuleTable {
    let mut modules: ModuleTable = BTreeMap::new();
    modules.insert(module.pool_type, Box::new(module) as Box<dyn PoolModule>);
    modules
}

#[test]
fn route_cache_hits_charge_the_cold_read_gas() {
    let mut deps = setup();
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(1_000_000, "uosmo")],
        Decimal::zero(),
    );

    let manager = manager_with(default_modules());
    manager.get_pool_module(&deps.storage, 1).unwrap();
    let cold = manager.gas.consumed();
    assert!(cold > READ_COST_FLAT);

    assert_eq!(
        manager.get_pool_type(&deps.storage, 1).unwrap(),
        PoolType::Balancer
    );
    assert_eq!(manager.gas.consumed(), cold * 2);

    // a fresh manager pays the same for its own cold read
    let other = manager_with(default_modules());
    other.get_pool_module(&deps.storage, 1).unwrap();
    assert_eq!(other.gas.consumed(), cold);
}

#[test]
fn setting_a_route_drops_the_cached_binding() {
    let mut deps = setup();
    create_balancer_pool(
        &mut deps,
        vec![coin(1_000_000, "uatom"), coin(1_000_000, "uosmo")],
        Decimal::zero(),
    );

    let manager = manager_with(default_modules());
    assert_eq!(
        manager.get_pool_type(&deps.storage, 1).unwrap(),
        PoolType::Balancer
    );

    manager
        .set_pool_route(&mut deps.storage, 1, PoolType::Stableswap)
        .unwrap();
    assert_eq!(
        manager.get_pool_type(&deps.storage, 1).unwrap(),
        PoolType::Stableswap
    );
}

#[test]
fn unknown_pools_have_no_route() {
    let deps = setup();
    let manager = manager_with(default_modules());

    let err = manager.get_pool_module(&deps.storage, 9).err().unwrap();
    assert_eq!(err, ContractError::FailedToFindRoute { pool_id: 9 });
    assert_eq!(manager.gas.consumed(), 0);
}

#[test]
fn routes_to_unregistered_modules_are_rejected() {
    let mut deps = setup();
    POOL_ROUTES
        .save(&mut deps.storage, 4, &PoolType::Concentrated)
        .unwrap();

    let manager = manager_with(mock_modules(MockModule::new(PoolType::Balancer)));
    let err = manager.get_pool_module(&deps.storage, 4).err().unwrap();
    assert_eq!(
        err,
        ContractError::UndefinedRoute {
            pool_type: PoolType::Concentrated
        }
    );
}

#[test]
fn create_pool_assigns_ids_and_routes() {
    let mut deps = setup();
    let manager = manager_with(mock_modules(MockModule::new(PoolType::CosmWasm)));

    let response = create_pool(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &coins(1_000, "uosmo")),
        &manager,
        CreatePoolMsg::CosmWasm {
            contract_address: "alloy".to_string(),
        },
    )
    .unwrap();

    let event = &response.events[0];
    assert_eq!(event.ty, "pool_created");
    assert!(event
        .attributes
        .iter()
        .any(|attr| attr.key == "pool_id" && attr.value == "1"));

    assert_eq!(NEXT_POOL_ID.load(&deps.storage).unwrap(), 2);
    assert_eq!(
        POOL_ROUTES.load(&deps.storage, 1).unwrap(),
        PoolType::CosmWasm
    );
    assert_eq!(
        POOL_ACCOUNTS
            .load(&deps.storage, &Addr::unchecked(MOCK_POOL_ADDRESS))
            .unwrap(),
        1
    );
}

#[test]
fn create_pool_rejects_a_module_reporting_another_id() {
    let mut deps = setup();
    let manager = manager_with(mock_modules(MockModule {
        id_offset: 1,
        ..MockModule::new(PoolType::CosmWasm)
    }));

    let err = create_pool(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &coins(1_000, "uosmo")),
        &manager,
        CreatePoolMsg::CosmWasm {
            contract_address: "alloy".to_string(),
        },
    )
    .unwrap_err();

    assert_eq!(
        err,
        ContractError::IncorrectPoolId {
            expected: 1,
            actual: 2
        }
    );
}

#[test]
fn create_pool_rejects_a_module_reporting_another_address() {
    let mut deps = setup();
    let manager = manager_with(mock_modules(MockModule {
        address_override: Some(Addr::unchecked("elsewhere")),
        ..MockModule::new(PoolType::CosmWasm)
    }));

    let err = create_pool(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &coins(1_000, "uosmo")),
        &manager,
        CreatePoolMsg::CosmWasm {
            contract_address: "alloy".to_string(),
        },
    )
    .unwrap_err();

    assert_eq!(
        err,
        ContractError::IncorrectPoolAddress {
            expected: MOCK_POOL_ADDRESS.to_string(),
            actual: "elsewhere".to_string()
        }
    );
}

#[test]
fn create_pool_rejects_pool_types_without_module() {
    let mut deps = setup();
    let manager = manager_with(mock_modules(MockModule::new(PoolType::Balancer)));

    let err = create_pool(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &coins(1_000, "uosmo")),
        &manager,
        CreatePoolMsg::CosmWasm {
            contract_address: "alloy".to_string(),
        },
    )
    .unwrap_err();

    assert_eq!(
        err,
        ContractError::InvalidPoolType {
            pool_type: PoolType::CosmWasm
        }
    );
}

#[test]
fn create_pool_stops_at_the_max_pool_id() {
    let mut deps = setup();
    NEXT_POOL_ID
        .save(&mut deps.storage, &(MAX_POOL_ID + 1))
        .unwrap();
    let manager = manager_with(mock_modules(MockModule::new(PoolType::CosmWasm)));

    let err = create_pool(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &coins(1_000, "uosmo")),
        &manager,
        CreatePoolMsg::CosmWasm {
            contract_address: "alloy".to_string(),
        },
    )
    .unwrap_err();

    assert_eq!(err, ContractError::MaxPoolIdReached { max: MAX_POOL_ID });
}

#[test]
fn concentrated_pools_as_pool_manager_skip_the_fee() {
    let mut deps = setup();
    let env = mock_env();
    let manager = manager_with(mock_modules(MockModule::new(PoolType::Concentrated)));

    let err = create_concentrated_pool_as_pool_manager(
        deps.as_mut(),
        env.clone(),
        mock_info(OWNER, &[]),
        &manager,
        "cl_pool".to_string(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ContractError::InvalidPoolCreator {
            creator: OWNER.to_string(),
            expected: env.contract.address.to_string(),
        }
    );

    let response = create_concentrated_pool_as_pool_manager(
        deps.as_mut(),
        env.clone(),
        mock_info(env.contract.address.as_str(), &[]),
        &manager,
        "cl_pool".to_string(),
    )
    .unwrap();

    assert!(response.messages.is_empty());
    assert_eq!(
        POOL_ROUTES.load(&deps.storage, 1).unwrap(),
        PoolType::Concentrated
    );
}
