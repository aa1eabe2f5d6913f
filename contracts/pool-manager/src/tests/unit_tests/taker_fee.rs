use cosmwasm_std::testing::{mock_env, mock_info};
use cosmwasm_std::{coin, Addr, BankMsg, CosmosMsg, Decimal, Uint128};
use poolmanager_std::pool_manager::{DenomPairTakerFee, ExecuteMsg};

use crate::contract::execute;
use crate::state::{
    read_coins, read_denom_pair_taker_fees, DENOM_PAIR_TAKER_FEE, PARAMS,
    TAKER_FEES_FOR_COMMUNITY_POOL, TAKER_FEES_FOR_STAKERS,
};
use crate::taker_fee::{charge_taker_fee, get_trading_pair_taker_fee, set_denom_pair_taker_fee};
use crate::ContractError;

use super::{setup, OWNER, TAKER_FEE_COLLECTOR};

#[test]
fn whitelisted_senders_skip_the_taker_fee() {
    let mut deps = setup();
    let mut params = PARAMS.load(&deps.storage).unwrap();
    params.taker_fee_params.reduced_fee_whitelist = vec!["router".to_string()];

    let charge = charge_taker_fee(
        &mut deps.storage,
        &params,
        &coin(10_000, "uatom"),
        "uosmo",
        &Addr::unchecked("router"),
        true,
    )
    .unwrap();

    assert_eq!(charge.token, coin(10_000, "uatom"));
    assert_eq!(charge.fee, coin(0, "uatom"));
    assert_eq!(charge.message, None);
    assert!(read_coins(&deps.storage, &TAKER_FEES_FOR_STAKERS)
        .unwrap()
        .is_empty());
}

#[test]
fn charges_and_books_the_taker_fee() {
    let mut deps = setup();
    let params = PARAMS.load(&deps.storage).unwrap();

    let charge = charge_taker_fee(
        &mut deps.storage,
        &params,
        &coin(10_000, "uatom"),
        "uosmo",
        &Addr::unchecked("trader"),
        true,
    )
    .unwrap();

    assert_eq!(charge.token, coin(9_990, "uatom"));
    assert_eq!(charge.fee, coin(10, "uatom"));
    assert_eq!(
        charge.message,
        Some(CosmosMsg::Bank(BankMsg::Send {
            to_address: TAKER_FEE_COLLECTOR.to_string(),
            amount: vec![coin(10, "uatom")],
        }))
    );
    assert_eq!(
        read_coins(&deps.storage, &TAKER_FEES_FOR_STAKERS).unwrap(),
        vec![coin(7, "uatom")]
    );
    assert_eq!(
        read_coins(&deps.storage, &TAKER_FEES_FOR_COMMUNITY_POOL).unwrap(),
        vec![coin(3, "uatom")]
    );

    // exact out grosses the input up instead
    let charge = charge_taker_fee(
        &mut deps.storage,
        &params,
        &coin(5_026, "uatom"),
        "uosmo",
        &Addr::unchecked("trader"),
        false,
    )
    .unwrap();
    assert_eq!(charge.token, coin(5_032, "uatom"));
    assert_eq!(charge.fee, coin(6, "uatom"));
    assert_eq!(
        read_coins(&deps.storage, &TAKER_FEES_FOR_STAKERS).unwrap(),
        vec![coin(11, "uatom")]
    );
}

#[test]
fn base_asset_fees_follow_their_own_distribution() {
    let mut deps = setup();
    let mut params = PARAMS.load(&deps.storage).unwrap();
    params
        .taker_fee_params
        .osmo_taker_fee_distribution
        .staking_rewards = Decimal::one();
    params
        .taker_fee_params
        .osmo_taker_fee_distribution
        .community_pool = Decimal::zero();

    charge_taker_fee(
        &mut deps.storage,
        &params,
        &coin(10_000, "uosmo"),
        "uatom",
        &Addr::unchecked("trader"),
        true,
    )
    .unwrap();

    assert_eq!(
        read_coins(&deps.storage, &TAKER_FEES_FOR_STAKERS).unwrap(),
        vec![coin(10, "uosmo")]
    );
    assert!(read_coins(&deps.storage, &TAKER_FEES_FOR_COMMUNITY_POOL)
        .unwrap()
        .is_empty());
}

#[test]
fn pair_overrides_are_order_independent() {
    let mut deps = setup();
    let override_fee = Decimal::permille(5);

    set_denom_pair_taker_fee(&mut deps.storage, "uosmo", "uatom", override_fee).unwrap();

    assert_eq!(
        get_trading_pair_taker_fee(&deps.storage, "uatom", "uosmo").unwrap(),
        override_fee
    );
    assert_eq!(
        get_trading_pair_taker_fee(&deps.storage, "uosmo", "uatom").unwrap(),
        override_fee
    );
    assert_eq!(
        get_trading_pair_taker_fee(&deps.storage, "uosmo", "uion").unwrap(),
        Decimal::permille(1)
    );
}

#[test]
fn setting_the_default_fee_deletes_the_override() {
    let mut deps = setup();

    set_denom_pair_taker_fee(&mut deps.storage, "uatom", "uosmo", Decimal::permille(5)).unwrap();
    assert!(DENOM_PAIR_TAKER_FEE
        .may_load(&deps.storage, ("uatom", "uosmo"))
        .unwrap()
        .is_some());

    set_denom_pair_taker_fee(&mut deps.storage, "uosmo", "uatom", Decimal::permille(1)).unwrap();
    assert_eq!(
        DENOM_PAIR_TAKER_FEE
            .may_load(&deps.storage, ("uatom", "uosmo"))
            .unwrap(),
        None
    );
    assert_eq!(
        get_trading_pair_taker_fee(&deps.storage, "uatom", "uosmo").unwrap(),
        Decimal::permille(1)
    );
}

#[test]
fn only_admins_set_pair_taker_fees() {
    let mut deps = setup();
    let msg = ExecuteMsg::SetDenomPairTakerFee {
        denom_pair_taker_fees: vec![DenomPairTakerFee {
            denom0: "uatom".to_string(),
            denom1: "uosmo".to_string(),
            taker_fee: Decimal::permille(2),
        }],
    };

    let err = execute(
        deps.as_mut(),
        mock_env(),
        mock_info("stranger", &[]),
        msg.clone(),
    )
    .unwrap_err();
    assert_eq!(err, ContractError::Unauthorized {});

    let response = execute(deps.as_mut(), mock_env(), mock_info(OWNER, &[]), msg).unwrap();
    assert_eq!(response.events[0].ty, "denom_pair_taker_fee");
    assert_eq!(
        get_trading_pair_taker_fee(&deps.storage, "uosmo", "uatom").unwrap(),
        Decimal::permille(2)
    );
}

#[test]
fn rejects_taker_fees_of_one_or_more() {
    let mut deps = setup();

    let err =
        set_denom_pair_taker_fee(&mut deps.storage, "uatom", "uosmo", Decimal::one()).unwrap_err();
    assert_eq!(
        err,
        ContractError::InvalidTakerFee {
            taker_fee: Decimal::one()
        }
    );

    let err = execute(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &[]),
        ExecuteMsg::SetDenomPairTakerFee {
            denom_pair_taker_fees: vec![DenomPairTakerFee {
                denom0: "uatom".to_string(),
                denom1: "uatom".to_string(),
                taker_fee: Decimal::permille(2),
            }],
        },
    )
    .unwrap_err();
    assert_eq!(err, ContractError::SameAsset {});
}

#[test]
fn fees_round_against_the_trader() {
    let mut deps = setup();
    let params = PARAMS.load(&deps.storage).unwrap();

    let charge = charge_taker_fee(
        &mut deps.storage,
        &params,
        &coin(5, "uatom"),
        "uosmo",
        &Addr::unchecked("trader"),
        true,
    )
    .unwrap();
    assert_eq!(charge.token.amount, Uint128::new(4));
    assert_eq!(charge.fee.amount, Uint128::one());

    // a free pair sends nothing to the collector
    set_denom_pair_taker_fee(&mut deps.storage, "uatom", "uosmo", Decimal::zero()).unwrap();
    let charge = charge_taker_fee(
        &mut deps.storage,
        &params,
        &coin(5, "uatom"),
        "uosmo",
        &Addr::unchecked("trader"),
        true,
    )
    .unwrap();
    assert_eq!(charge.token.amount, Uint128::new(5));
    assert!(charge.fee.amount.is_zero());
    assert_eq!(charge.message, None);
}

#[test]
fn pair_overrides_are_listed_in_bounded_pages() {
    let mut deps = setup();
    for i in 0..120 {
        DENOM_PAIR_TAKER_FEE
            .save(
                &mut deps.storage,
                (&format!("denom{i:03}"), "uosmo"),
                &Decimal::permille(5),
            )
            .unwrap();
    }

    let page = read_denom_pair_taker_fees(&deps.storage, None, None).unwrap();
    assert_eq!(page.len(), 10);
    assert_eq!(page[0].denom0, "denom000");

    let page = read_denom_pair_taker_fees(&deps.storage, None, Some(500)).unwrap();
    assert_eq!(page.len(), 100);

    let page = read_denom_pair_taker_fees(
        &deps.storage,
        Some(("denom009".to_string(), "uosmo".to_string())),
        Some(2),
    )
    .unwrap();
    let denoms: Vec<&str> = page.iter().map(|fee| fee.denom0.as_str()).collect();
    assert_eq!(denoms, vec!["denom010", "denom011"]);
}
