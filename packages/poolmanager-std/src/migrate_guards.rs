use cosmwasm_std::{ensure, StdError, StdResult, Storage};
use cw2::get_contract_version;

/// Refuses a migration when the stored cw2 contract name differs from `expected`.
pub fn check_contract_name(storage: &dyn Storage, expected: &str) -> StdResult<()> {
    let stored = get_contract_version(storage)?;

    ensure!(
        stored.contract == expected,
        StdError::generic_err(format!(
            "Contract name mismatch: stored {}, migrating to {expected}",
            stored.contract
        ))
    );

    Ok(())
}
