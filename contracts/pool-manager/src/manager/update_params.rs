use cosmwasm_std::{Addr, Api, Coin, DepsMut, MessageInfo, Response, StdResult};
use poolmanager_std::denom::validate_denom;
use poolmanager_std::pool_manager::{Params, TakerFeeParams};
use poolmanager_std::taker_fee::validate_taker_fee;

use crate::state::PARAMS;
use crate::ContractError;

#[allow(clippy::too_many_arguments)]
pub fn update_params(
    deps: DepsMut,
    info: MessageInfo,
    pool_creation_fee: Option<Vec<Coin>>,
    taker_fee_params: Option<TakerFeeParams>,
    authorized_quote_denoms: Option<Vec<String>>,
    taker_fee_collector: Option<String>,
    community_pool: Option<String>,
    incentives: Option<String>,
    unrestricted_pool_creators: Option<Vec<String>>,
) -> Result<Response, ContractError> {
    // permission check
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let api = deps.api;
    PARAMS.update(deps.storage, |mut params| {
        if let Some(pool_creation_fee) = pool_creation_fee {
            params.pool_creation_fee = pool_creation_fee;
        }

        if let Some(taker_fee_params) = taker_fee_params {
            params.taker_fee_params = taker_fee_params;
        }

        if let Some(authorized_quote_denoms) = authorized_quote_denoms {
            params.authorized_quote_denoms = authorized_quote_denoms;
        }

        if let Some(taker_fee_collector) = taker_fee_collector {
            params.taker_fee_collector = api.addr_validate(&taker_fee_collector)?;
        }

        if let Some(community_pool) = community_pool {
            params.community_pool = api.addr_validate(&community_pool)?;
        }

        if let Some(incentives) = incentives {
            params.incentives = Some(api.addr_validate(&incentives)?);
        }

        if let Some(unrestricted_pool_creators) = unrestricted_pool_creators {
            params.unrestricted_pool_creators =
                validate_addresses(api, &unrestricted_pool_creators)?;
        }

        validate_params(api, &params)?;
        Ok::<Params, ContractError>(params)
    })?;

    Ok(Response::default().add_attribute("action", "update_params"))
}

/// Checks every denom, address and fee share in the params.
pub fn validate_params(api: &dyn Api, params: &Params) -> Result<(), ContractError> {
    for fee in &params.pool_creation_fee {
        validate_denom(&fee.denom)?;
    }

    let taker_fee_params = &params.taker_fee_params;
    validate_taker_fee(taker_fee_params.default_taker_fee).map_err(|_| {
        ContractError::InvalidTakerFee {
            taker_fee: taker_fee_params.default_taker_fee,
        }
    })?;
    taker_fee_params.osmo_taker_fee_distribution.validate()?;
    taker_fee_params.non_osmo_taker_fee_distribution.validate()?;

    validate_denom(&taker_fee_params.community_pool_denom_to_swap_non_whitelisted_assets_to)?;
    for denom in taker_fee_params
        .community_pool_denom_whitelist
        .iter()
        .chain(params.authorized_quote_denoms.iter())
    {
        validate_denom(denom)?;
    }

    validate_addresses(api, &taker_fee_params.admin_addresses)?;
    validate_addresses(api, &taker_fee_params.reduced_fee_whitelist)?;

    Ok(())
}

fn validate_addresses(api: &dyn Api, addresses: &[String]) -> StdResult<Vec<Addr>> {
    addresses
        .iter()
        .map(|address| api.addr_validate(address))
        .collect()
}
