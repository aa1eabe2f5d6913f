use cosmwasm_schema::{cw_serde, QueryResponses};

/// The subset of the incentives contract queried by the pool manager.
#[cw_serde]
#[derive(QueryResponses)]
pub enum IncentivesQueryMsg {
    /// Whether the pool currently receives liquidity incentives.
    #[returns(IsPoolIncentivizedResponse)]
    IsPoolIncentivized { pool_id: u64 },
}

#[cw_serde]
pub struct IsPoolIncentivizedResponse {
    pub is_incentivized: bool,
}
