use cosmwasm_std::testing::mock_env;
use cosmwasm_std::{attr, to_json_vec, StdError, Storage};
use cw2::set_contract_version;
use poolmanager_std::pool_manager::MigrateMsg;
use semver::Version;

use crate::contract::{migrate, CONTRACT_NAME};
use crate::state::PARAMS;
use crate::ContractError;

use super::setup;

/// Writes params the way 1.0.0 stored them, before the community pool whitelist existed.
fn store_legacy_params(storage: &mut dyn Storage) {
    let params = PARAMS.load(storage).unwrap();
    let current = String::from_utf8(to_json_vec(&params).unwrap()).unwrap();
    let legacy = current.replace(r#","community_pool_denom_whitelist":["uusdc"]"#, "");
    assert_ne!(legacy, current);

    storage.set(b"params", legacy.as_bytes());
}

#[test]
fn legacy_params_load_with_an_empty_whitelist() {
    let mut deps = setup();
    store_legacy_params(&mut deps.storage);

    let params = PARAMS.load(&deps.storage).unwrap();
    assert!(params.taker_fee_params.community_pool_denom_whitelist.is_empty());
    assert_eq!(params.authorized_quote_denoms, vec!["uosmo", "uatom"]);
}

#[test]
fn migrating_from_1_0_seeds_the_community_pool_whitelist() {
    let mut deps = setup();
    set_contract_version(&mut deps.storage, CONTRACT_NAME, "1.0.0").unwrap();
    store_legacy_params(&mut deps.storage);

    let response = migrate(deps.as_mut(), mock_env(), MigrateMsg {}).unwrap();
    assert_eq!(
        response.attributes,
        vec![
            attr("action", "migrate"),
            attr("from_version", "1.0.0"),
            attr("to_version", env!("CARGO_PKG_VERSION")),
        ]
    );

    let params = PARAMS.load(&deps.storage).unwrap();
    assert_eq!(
        params.taker_fee_params.community_pool_denom_whitelist,
        vec!["uosmo".to_string(), "uatom".to_string()]
    );
    assert_eq!(
        cw2::get_contract_version(&deps.storage).unwrap().version,
        env!("CARGO_PKG_VERSION")
    );
}

#[test]
fn refuses_to_migrate_to_the_same_or_older_version() {
    let mut deps = setup();

    let err = migrate(deps.as_mut(), mock_env(), MigrateMsg {}).unwrap_err();
    let version: Version = env!("CARGO_PKG_VERSION").parse().unwrap();
    assert_eq!(
        err,
        ContractError::MigrateInvalidVersion {
            new_version: version.clone(),
            current_version: version,
        }
    );
}

#[test]
fn refuses_to_migrate_another_contract() {
    let mut deps = setup();
    set_contract_version(&mut deps.storage, "crates.io:fee-collector", "0.9.0").unwrap();

    let err = migrate(deps.as_mut(), mock_env(), MigrateMsg {}).unwrap_err();
    assert!(matches!(err, ContractError::Std(StdError::GenericErr { .. })));
}
