use cosmwasm_std::{
    CheckedFromRatioError, CheckedMultiplyRatioError, ConversionOverflowError, Decimal,
    DivideByZeroError, OverflowError, StdError, Uint128,
};
use cw_ownable::OwnershipError;
use cw_utils::PaymentError;
use poolmanager_std::pool_manager::PoolType;
use poolmanager_std::routes::RouteError;
use semver::Version;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    // Handle all normal errors from the StdError
    #[error("{0}")]
    Std(#[from] StdError),

    // Handle errors specific to payments from cw-util
    #[error("{0}")]
    PaymentError(#[from] PaymentError),

    // Handle ownership errors from cw-ownable
    #[error("{0}")]
    OwnershipError(#[from] OwnershipError),

    #[error(transparent)]
    Route(#[from] RouteError),

    // Handle Upgrade/Migrate related semver errors
    #[error("Semver parsing error: {0}")]
    SemVer(String),

    #[error("Attempt to migrate to version {new_version}, but contract is on a higher version {current_version}")]
    MigrateInvalidVersion {
        new_version: Version,
        current_version: Version,
    },

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Failed to find route for pool id {pool_id}")]
    FailedToFindRoute { pool_id: u64 },

    #[error("No module registered for pool type {pool_type}")]
    UndefinedRoute { pool_type: PoolType },

    #[error("Invalid pool type {pool_type}")]
    InvalidPoolType { pool_type: PoolType },

    #[error("Pool {pool_id} not found")]
    PoolNotFound { pool_id: u64 },

    #[error("Pool {pool_id} is not active")]
    InactivePool { pool_id: u64 },

    #[error("Pool creator {creator} is not allowed, expected the pool manager {expected}")]
    InvalidPoolCreator { creator: String, expected: String },

    #[error("Pool id {actual} reported by the module does not match the assigned id {expected}")]
    IncorrectPoolId { expected: u64, actual: u64 },

    #[error("Pool address {actual} reported by the module does not match {expected}")]
    IncorrectPoolAddress { expected: String, actual: String },

    #[error("The pool id counter reached its limit of {max}")]
    MaxPoolIdReached { max: u64 },

    #[error("The provided pool assets are invalid: {reason}")]
    InvalidPoolAssets { reason: String },

    #[error("Invalid pool creation funds for {denom}, expected {expected} got {amount}")]
    InvalidPoolCreationFee {
        denom: String,
        amount: Uint128,
        expected: Uint128,
    },

    #[error("Denom {denom} is not part of pool {pool_id}")]
    DenomNotInPool { pool_id: u64, denom: String },

    #[error("The provided assets are both the same")]
    SameAsset {},

    #[error("Invalid zero amount")]
    InvalidZeroAmount {},

    #[error("Sent {actual} {denom} but the swap requires {expected}")]
    FundsMismatch {
        denom: String,
        expected: Uint128,
        actual: Uint128,
    },

    #[error("Final amount must be positive")]
    FinalAmountIsNotPositive {},

    #[error("Price impact protection: expected at least {min} out, got {actual}")]
    PriceImpactProtectionExactIn { min: Uint128, actual: Uint128 },

    #[error("Price impact protection: expected at most {max} in, got {actual}")]
    PriceImpactProtectionExactOut { max: Uint128, actual: Uint128 },

    #[error("Swap estimation aborted: {reason}")]
    EstimationPanicked { reason: String },

    #[error("Pool {pool_id} does not hold enough liquidity for the swap")]
    InsufficientLiquidity { pool_id: u64 },

    #[error("Failed to converge when performing newtons method")]
    ConvergeError {},

    #[error("An conversion overflow occurred when attempting to swap an asset")]
    SwapOverflowError {},

    #[error("An overflow occurred when attempting to construct a decimal")]
    DecimalOverflow {},

    #[error("Invalid taker fee {taker_fee}, must be lower than 1")]
    InvalidTakerFee { taker_fee: Decimal },

    #[error("Invalid skim percent {skim_percent}, must not exceed 1")]
    InvalidSkimPercent { skim_percent: Decimal },

    #[error("Total taker fee share skim {total} exceeds 1")]
    TakerFeeShareExceedsOne { total: Decimal },

    #[error("Pool {pool_id} is a {pool_type} pool, only cosmwasm pools can be alloyed")]
    NotCosmWasmPool { pool_id: u64, pool_type: PoolType },

    #[error("Alloyed denom {denom} must have exactly 4 parts separated by '/'")]
    InvalidAlloyedDenomFormat { denom: String },

    #[error("Alloyed denom {denom} must start with factory, got {part}")]
    InvalidAlloyedDenomPartPrefix { denom: String, part: String },

    #[error("Alloyed denom {denom} must be created by {expected}, got {part}")]
    InvalidAlloyedDenomPartContract {
        denom: String,
        expected: String,
        part: String,
    },

    #[error("Alloyed denom {denom} must have the alloyed namespace, got {part}")]
    InvalidAlloyedDenomPartAlloyed { denom: String, part: String },

    #[error("Total alloyed liquidity of pool {pool_id} is zero")]
    ZeroTotalAlloyedLiquidity { pool_id: u64 },

    #[error("Normalization factor of {denom} in pool {pool_id} is zero")]
    ZeroNormalizationFactor { pool_id: u64, denom: String },

    #[error("Pool {pool_id} has no asset config for {denom}")]
    MissingAssetConfig { pool_id: u64, denom: String },

    #[error("Pool {pool_id} is not a registered alloyed pool")]
    NoRegisteredAlloyedPool { pool_id: u64 },

    #[error("No direct base asset route for {denom}")]
    NoDirectBaseRoute { denom: String },

    #[error("Pool {pool_id} is a pool contract and can only be swapped through once per message")]
    PoolContractSwappedTwice { pool_id: u64 },

    #[error("{0}")]
    OverflowError(#[from] OverflowError),

    #[error(transparent)]
    CheckedMultiplyRatioError(#[from] CheckedMultiplyRatioError),

    #[error(transparent)]
    CheckedFromRatioError(#[from] CheckedFromRatioError),

    #[error(transparent)]
    DivideByZeroError(#[from] DivideByZeroError),

    #[error(transparent)]
    ConversionOverflowError(#[from] ConversionOverflowError),
}

impl From<semver::Error> for ContractError {
    fn from(err: semver::Error) -> Self {
        Self::SemVer(err.to_string())
    }
}
