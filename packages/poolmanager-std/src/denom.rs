use cosmwasm_std::{StdError, StdResult};

const MIN_DENOM_LEN: usize = 3;
const MAX_DENOM_LEN: usize = 128;

/// Validates a bank denom against the sdk rule `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> StdResult<()> {
    let invalid = || StdError::generic_err(format!("invalid denom: {denom}"));

    if denom.len() < MIN_DENOM_LEN || denom.len() > MAX_DENOM_LEN {
        return Err(invalid());
    }

    let mut chars = denom.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return Err(invalid()),
    }

    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-')) {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Returns the pair in lexicographic order, which is how pair-keyed state is stored.
pub fn canonical_pair<'a>(denom0: &'a str, denom1: &'a str) -> (&'a str, &'a str) {
    if denom0 <= denom1 {
        (denom0, denom1)
    } else {
        (denom1, denom0)
    }
}
