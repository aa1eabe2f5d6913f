use std::collections::BTreeMap;

use poolmanager_std::pool_manager::BASE_DENOM;
use poolmanager_std::routes::SwapAmountOutRoute;
use serde::{Deserialize, Serialize};

use crate::IngestError;

pub const USDC_DENOM: &str =
    "ibc/498A0751C798A0D9A389AA3691123DADA57DAA4FE165D5C75894505B876BA6E4";
pub const USDT_DENOM: &str =
    "ibc/2108F2D81CBE328F371AD0CEF56691B18A86E08C3651504E42487D9EE92DDE9C";
const ATOM_DENOM: &str = "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2";
const STATOM_DENOM: &str =
    "ibc/C140AFD542AE77BD7DCC83F13FDD8C5E5BB8C4929785E6EC2F4C636F98F17901";

/// Settings of the pool ingester. Every field has a default so a partial JSON document is
/// enough to override single values.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct IngesterConfig {
    /// Denom every TVL is expressed in.
    pub base_denom: String,
    /// Decimals of the base denom.
    pub base_precision: u32,
    /// Pool pricing USDC against the base denom.
    pub default_usdc_pool_id: u64,
    pub usdc_denom: String,
    pub usdc_precision: u32,
    /// Denoms assumed to trade at USDC parity when nothing else can price them.
    pub stablecoin_denoms: Vec<String>,
    /// Hand picked routes from a denom into the base denom, used when no direct pool exists.
    pub route_overwrites: BTreeMap<String, Vec<SwapAmountOutRoute>>,
}

impl Default for IngesterConfig {
    fn default() -> Self {
        IngesterConfig {
            base_denom: BASE_DENOM.to_string(),
            base_precision: 6,
            default_usdc_pool_id: 1263,
            usdc_denom: USDC_DENOM.to_string(),
            usdc_precision: 6,
            stablecoin_denoms: vec![USDT_DENOM.to_string(), USDC_DENOM.to_string()],
            route_overwrites: BTreeMap::from([(
                STATOM_DENOM.to_string(),
                vec![
                    SwapAmountOutRoute {
                        pool_id: 1283,
                        token_in_denom: STATOM_DENOM.to_string(),
                    },
                    SwapAmountOutRoute {
                        pool_id: 1265,
                        token_in_denom: ATOM_DENOM.to_string(),
                    },
                ],
            )]),
        }
    }
}

impl IngesterConfig {
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        let config: IngesterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.base_denom.is_empty() || self.usdc_denom.is_empty() {
            return Err(IngestError::InvalidConfig(
                "base and usdc denoms must be set".to_string(),
            ));
        }
        if self.base_precision == 0 || self.usdc_precision == 0 {
            return Err(IngestError::InvalidConfig(
                "precisions must be positive".to_string(),
            ));
        }
        if let Some((denom, _)) = self
            .route_overwrites
            .iter()
            .find(|(_, routes)| routes.is_empty())
        {
            return Err(IngestError::InvalidConfig(format!(
                "route overwrite for {denom} has no hops"
            )));
        }

        Ok(())
    }

    /// One whole base token, the amount route overwrites are quoted against.
    pub fn one_base_unit(&self) -> u128 {
        10u128.pow(self.base_precision)
    }
}
