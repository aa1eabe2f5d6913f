use std::fmt::Debug;

use anybuf::Bufany;
use anyhow::{anyhow, Result as AnyResult};
use cosmwasm_schema::schemars::JsonSchema;
use cosmwasm_schema::serde::de::DeserializeOwned;
use cosmwasm_std::{
    coins, to_json_binary, Addr, Api, Binary, BlockInfo, CustomQuery, Querier, Storage,
    SubMsgResponse, Uint128,
};
use cw_multi_test::{AppResponse, BankSudo, CosmosRouter, Stargate};
use poolmanager_std::tokenfactory::{factory_denom, MSG_CREATE_DENOM, MSG_MINT};

/// Handles the tokenfactory messages the pool manager emits, minting through the bank module.
pub struct StargateMock {}

impl Stargate for StargateMock {
    fn execute<ExecC, QueryC>(
        &self,
        api: &dyn Api,
        storage: &mut dyn Storage,
        router: &dyn CosmosRouter<ExecC = ExecC, QueryC = QueryC>,
        block: &BlockInfo,
        sender: Addr,
        type_url: String,
        value: Binary,
    ) -> AnyResult<AppResponse>
    where
        ExecC: Debug + Clone + PartialEq + JsonSchema + DeserializeOwned + 'static,
        QueryC: CustomQuery + DeserializeOwned + 'static,
    {
        let msg = Bufany::deserialize(value.as_slice())
            .map_err(|err| anyhow!("Undecodable {type_url}: {err:?}"))?;

        match type_url.as_str() {
            MSG_CREATE_DENOM => {
                let creator = msg.string(1).ok_or_else(|| anyhow!("missing sender"))?;
                let subdenom = msg.string(2).ok_or_else(|| anyhow!("missing subdenom"))?;
                let submsg_response = SubMsgResponse {
                    events: vec![],
                    data: Some(to_json_binary(&factory_denom(
                        &Addr::unchecked(creator),
                        &subdenom,
                    ))?),
                };
                Ok(submsg_response.into())
            }
            MSG_MINT => {
                let coin = msg.message(2).ok_or_else(|| anyhow!("missing amount"))?;
                let denom = coin.string(1).ok_or_else(|| anyhow!("missing denom"))?;
                let amount: Uint128 = coin
                    .string(2)
                    .ok_or_else(|| anyhow!("missing amount"))?
                    .parse()?;
                let mint_to = msg.string(3).ok_or_else(|| anyhow!("missing mint_to"))?;

                let bank_sudo = BankSudo::Mint {
                    to_address: mint_to,
                    amount: coins(amount.u128(), denom),
                };
                router.sudo(api, storage, block, bank_sudo.into())
            }
            _ => Err(anyhow!("Unexpected exec msg {type_url} from {sender:?}")),
        }
    }

    fn query(
        &self,
        _api: &dyn Api,
        _storage: &dyn Storage,
        _querier: &dyn Querier,
        _block: &BlockInfo,
        path: String,
        _data: Binary,
    ) -> AnyResult<Binary> {
        Err(anyhow!("Unexpected stargate query request {path}"))
    }
}
