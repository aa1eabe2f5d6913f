use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response, StdResult,
};
use cw_multi_test::{Contract, ContractWrapper};
use cw_storage_plus::Item;
use poolmanager_std::incentives::{IncentivesQueryMsg, IsPoolIncentivizedResponse};

#[cw_serde]
pub struct InstantiateMsg {
    pub incentivized_pool_ids: Vec<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    SetIncentivizedPoolIds { pool_ids: Vec<u64> },
}

const INCENTIVIZED: Item<Vec<u64>> = Item::new("incentivized");

/// An incentives contract answering from a fixed list of incentivized pools.
pub fn incentives_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new_with_empty(execute, instantiate, query);

    Box::new(contract)
}

fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> StdResult<Response> {
    INCENTIVIZED.save(deps.storage, &msg.incentivized_pool_ids)?;
    Ok(Response::default())
}

fn execute(deps: DepsMut, _env: Env, _info: MessageInfo, msg: ExecuteMsg) -> StdResult<Response> {
    match msg {
        ExecuteMsg::SetIncentivizedPoolIds { pool_ids } => {
            INCENTIVIZED.save(deps.storage, &pool_ids)?;
        }
    }
    Ok(Response::default())
}

fn query(deps: Deps, _env: Env, msg: IncentivesQueryMsg) -> StdResult<Binary> {
    match msg {
        IncentivesQueryMsg::IsPoolIncentivized { pool_id } => {
            to_json_binary(&IsPoolIncentivizedResponse {
                is_incentivized: INCENTIVIZED.load(deps.storage)?.contains(&pool_id),
            })
        }
    }
}
