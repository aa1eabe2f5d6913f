use cosmwasm_std::{
    CheckedMultiplyRatioError, ConversionOverflowError, DivideByZeroError, OverflowError, StdError,
};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum IngestError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Failed to read {what} from the chain: {reason}")]
    ChainRead { what: String, reason: String },

    #[error("No pool pairs {denom} with {base_denom}")]
    NoRouteForDenom { denom: String, base_denom: String },

    #[error("Failed to read the tick liquidity of pool {pool_id}: {reason}")]
    TickLiquidity { pool_id: u64, reason: String },

    #[error("Failed to convert pool {pool_id}: {reason}")]
    PoolConversion { pool_id: u64, reason: String },

    #[error("Invalid ingester config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store read failed: {0}")]
    StoreRead(String),

    #[error("Store commit for height {height} failed: {reason}")]
    StoreCommit { height: u64, reason: String },

    #[error("{0}")]
    OverflowError(#[from] OverflowError),

    #[error(transparent)]
    CheckedMultiplyRatioError(#[from] CheckedMultiplyRatioError),

    #[error(transparent)]
    DivideByZeroError(#[from] DivideByZeroError),

    #[error(transparent)]
    ConversionOverflowError(#[from] ConversionOverflowError),
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
