use std::str::FromStr;

use cosmwasm_std::testing::{mock_env, mock_info, MockStorage};
use cosmwasm_std::{coin, Addr, Decimal, Storage, Uint128};
use poolmanager_std::pool_manager::{
    AlloyContractTakerFeeShareState, ExecuteMsg, RegisteredAlloyedPool, TakerFeeShareAgreement,
};

use crate::contract::execute;
use crate::registry::{default_modules, IncentivesContract, PoolManager};
use crate::state::{REGISTERED_ALLOYED_POOLS, TAKER_FEE_SHARE_ACCRUED};
use crate::ContractError;

use super::{setup, OWNER};

const ALLOYED_DENOM: &str = "factory/alloy/alloyed/allusd";

fn manager() -> PoolManager {
    PoolManager::new(
        default_modules(),
        Box::new(IncentivesContract { address: None }),
    )
}

fn agreement(denom: &str, skim_percent: Decimal) -> TakerFeeShareAgreement {
    TakerFeeShareAgreement {
        denom: denom.to_string(),
        skim_percent,
        skim_address: Addr::unchecked(format!("{denom}_partner")),
    }
}

fn accrued(storage: &dyn Storage, share_denom: &str, fee_denom: &str) -> Uint128 {
    TAKER_FEE_SHARE_ACCRUED
        .may_load(storage, (share_denom, fee_denom))
        .unwrap()
        .unwrap_or_default()
}

fn register_alloyed_pool(storage: &mut MockStorage, agreements: Vec<TakerFeeShareAgreement>) {
    let pool = RegisteredAlloyedPool {
        pool_id: 5,
        alloyed_denom: ALLOYED_DENOM.to_string(),
        state: AlloyContractTakerFeeShareState {
            contract_address: Addr::unchecked("alloy"),
            taker_fee_share_agreements: agreements,
        },
    };
    REGISTERED_ALLOYED_POOLS
        .save(storage, pool.alloyed_denom.clone(), &pool)
        .unwrap();
}

#[test]
fn skims_every_fee_for_involved_agreements() {
    let mut deps = setup();
    let manager = manager();
    manager
        .save_taker_fee_share_agreement(&mut deps.storage, &agreement("uatom", Decimal::percent(10)))
        .unwrap();

    manager
        .taker_fee_skim(
            &mut deps.storage,
            &["uatom".to_string(), "uosmo".to_string()],
            &[coin(100, "uatom"), coin(50, "uosmo")],
        )
        .unwrap();

    assert_eq!(accrued(&deps.storage, "uatom", "uatom"), Uint128::new(10));
    assert_eq!(accrued(&deps.storage, "uatom", "uosmo"), Uint128::new(5));
    assert_eq!(accrued(&deps.storage, "uosmo", "uosmo"), Uint128::zero());
}

#[test]
fn direct_agreements_take_precedence_over_alloyed_ones() {
    let mut deps = setup();
    register_alloyed_pool(
        &mut deps.storage,
        vec![agreement("uusdc", Decimal::percent(10))],
    );
    let manager = manager();
    manager
        .save_taker_fee_share_agreement(&mut deps.storage, &agreement("uatom", Decimal::percent(20)))
        .unwrap();

    manager
        .taker_fee_skim(
            &mut deps.storage,
            &[ALLOYED_DENOM.to_string(), "uatom".to_string()],
            &[coin(100, ALLOYED_DENOM)],
        )
        .unwrap();
    assert_eq!(accrued(&deps.storage, "uatom", ALLOYED_DENOM), Uint128::new(20));
    assert_eq!(accrued(&deps.storage, "uusdc", ALLOYED_DENOM), Uint128::zero());

    // without a direct agreement the alloyed composition is used
    manager
        .taker_fee_skim(
            &mut deps.storage,
            &[ALLOYED_DENOM.to_string(), "uion".to_string()],
            &[coin(100, ALLOYED_DENOM)],
        )
        .unwrap();
    assert_eq!(accrued(&deps.storage, "uusdc", ALLOYED_DENOM), Uint128::new(10));
}

#[test]
fn rejects_skims_above_one() {
    let mut deps = setup();
    let manager = manager();
    manager
        .save_taker_fee_share_agreement(&mut deps.storage, &agreement("uatom", Decimal::percent(60)))
        .unwrap();
    manager
        .save_taker_fee_share_agreement(&mut deps.storage, &agreement("uion", Decimal::percent(60)))
        .unwrap();

    let err = manager
        .taker_fee_skim(
            &mut deps.storage,
            &["uatom".to_string(), "uion".to_string()],
            &[coin(100, "uatom")],
        )
        .unwrap_err();
    assert_eq!(
        err,
        ContractError::TakerFeeShareExceedsOne {
            total: Decimal::from_str("1.2").unwrap()
        }
    );

    // nothing to skim, nothing to check
    manager
        .taker_fee_skim(
            &mut deps.storage,
            &["uatom".to_string(), "uion".to_string()],
            &[coin(0, "uatom")],
        )
        .unwrap();
}

#[test]
fn cache_follows_the_store() {
    let mut deps = setup();
    let manager = manager();

    // warm the cache before anything is stored
    let agreements = manager
        .with_taker_fee_share_cache(&deps.storage, |cache| cache.agreements.len())
        .unwrap();
    assert_eq!(agreements, 0);

    manager
        .save_taker_fee_share_agreement(&mut deps.storage, &agreement("uatom", Decimal::percent(5)))
        .unwrap();
    let cached = manager
        .with_taker_fee_share_cache(&deps.storage, |cache| cache.agreements.get("uatom").cloned())
        .unwrap();
    assert_eq!(cached, Some(agreement("uatom", Decimal::percent(5))));
}

#[test]
fn agreements_are_owner_only_and_bounded() {
    let mut deps = setup();

    let err = execute(
        deps.as_mut(),
        mock_env(),
        mock_info("stranger", &[]),
        ExecuteMsg::SetTakerFeeShareAgreementForDenom {
            denom: "uatom".to_string(),
            skim_percent: Decimal::percent(10),
            skim_address: "partner".to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::OwnershipError(_)));

    let err = execute(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &[]),
        ExecuteMsg::SetTakerFeeShareAgreementForDenom {
            denom: "uatom".to_string(),
            skim_percent: Decimal::percent(101),
            skim_address: "partner".to_string(),
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        ContractError::InvalidSkimPercent {
            skim_percent: Decimal::percent(101)
        }
    );

    execute(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &[]),
        ExecuteMsg::SetTakerFeeShareAgreementForDenom {
            denom: "uatom".to_string(),
            skim_percent: Decimal::percent(10),
            skim_address: "partner".to_string(),
        },
    )
    .unwrap();
}
