use cosmwasm_std::{ensure, DepsMut, Event, MessageInfo, Response};
use poolmanager_std::denom::validate_denom;
use poolmanager_std::pool_manager::DenomPairTakerFee;

use crate::state::PARAMS;
use crate::taker_fee::set_denom_pair_taker_fee;
use crate::ContractError;

/// Overrides the taker fee of each pair. Only taker fee admins can call this.
pub fn set_denom_pair_taker_fees(
    deps: DepsMut,
    info: MessageInfo,
    denom_pair_taker_fees: Vec<DenomPairTakerFee>,
) -> Result<Response, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    ensure!(
        params
            .taker_fee_params
            .admin_addresses
            .iter()
            .any(|admin| admin == info.sender.as_str()),
        ContractError::Unauthorized {}
    );

    let mut events = Vec::with_capacity(denom_pair_taker_fees.len());
    for pair in denom_pair_taker_fees {
        validate_denom(&pair.denom0)?;
        validate_denom(&pair.denom1)?;
        ensure!(pair.denom0 != pair.denom1, ContractError::SameAsset {});

        set_denom_pair_taker_fee(deps.storage, &pair.denom0, &pair.denom1, pair.taker_fee)?;

        events.push(
            Event::new("denom_pair_taker_fee")
                .add_attribute("denom0", pair.denom0)
                .add_attribute("denom1", pair.denom1)
                .add_attribute("taker_fee", pair.taker_fee.to_string()),
        );
    }

    Ok(Response::default()
        .add_attribute("action", "set_denom_pair_taker_fee")
        .add_events(events))
}
