use anybuf::Anybuf;
use cosmwasm_std::{Addr, Coin, CosmosMsg};

pub const MSG_CREATE_DENOM: &str = "/osmosis.tokenfactory.v1beta1.MsgCreateDenom";
pub const MSG_MINT: &str = "/osmosis.tokenfactory.v1beta1.MsgMint";

/// Returns the denom tokenfactory assigns to `subdenom` created by `creator`.
pub fn factory_denom(creator: &Addr, subdenom: &str) -> String {
    format!("factory/{creator}/{subdenom}")
}

/// Returns the MsgCreateDenom Stargate message
pub fn create_denom(sender: &Addr, subdenom: &str) -> CosmosMsg {
    let value = Anybuf::new()
        .append_string(1, sender.as_str())
        .append_string(2, subdenom)
        .into_vec();

    CosmosMsg::Stargate {
        type_url: MSG_CREATE_DENOM.to_string(),
        value: value.into(),
    }
}

/// Returns the MsgMint Stargate message
pub fn mint(sender: &Addr, coin: &Coin, mint_to: &Addr) -> CosmosMsg {
    let coin_buf = Anybuf::new()
        .append_string(1, &coin.denom)
        .append_string(2, coin.amount.to_string());

    let value = Anybuf::new()
        .append_string(1, sender.as_str())
        .append_message(2, &coin_buf)
        .append_string(3, mint_to.as_str())
        .into_vec();

    CosmosMsg::Stargate {
        type_url: MSG_MINT.to_string(),
        value: value.into(),
    }
}
