use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use cosmwasm_std::Decimal;

use crate::domain::{BlockProjection, DenomPair, PoolProjection, ProjectionStore};
use crate::IngestError;

const HEIGHT_KEY: &str = "height";

fn pool_key(pool_id: u64) -> String {
    format!("pools/{pool_id}")
}

fn taker_fee_key(pair: &DenomPair) -> String {
    format!("taker_fee/{}/{}", pair.denom0, pair.denom1)
}

/// Key value store shared between the ingester and readers. Values are JSON.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, key: &str) -> Result<Option<String>, IngestError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| IngestError::StoreRead("lock poisoned".to_string()))?;

        Ok(entries.get(key).cloned())
    }

    pub fn latest_height(&self) -> Result<Option<u64>, IngestError> {
        self.read(HEIGHT_KEY)?
            .map(|height| serde_json::from_str(&height).map_err(IngestError::from))
            .transpose()
    }

    pub fn pool(&self, pool_id: u64) -> Result<Option<PoolProjection>, IngestError> {
        self.read(&pool_key(pool_id))?
            .map(|pool| serde_json::from_str(&pool).map_err(IngestError::from))
            .transpose()
    }

    pub fn taker_fee(&self, pair: &DenomPair) -> Result<Option<Decimal>, IngestError> {
        self.read(&taker_fee_key(pair))?
            .map(|fee| serde_json::from_str(&fee).map_err(IngestError::from))
            .transpose()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProjectionStore for InMemoryStore {
    fn commit(&self, projection: &BlockProjection) -> Result<(), IngestError> {
        let height = projection.height;
        let commit_error = |reason: String| IngestError::StoreCommit { height, reason };

        // nothing is inserted until the whole block serialized
        let mut batch = Vec::with_capacity(projection.pools.len() + projection.taker_fees.len() + 1);
        for pool in &projection.pools {
            let value = serde_json::to_string(pool).map_err(|err| commit_error(err.to_string()))?;
            batch.push((pool_key(pool.pool_id), value));
        }
        for (pair, taker_fee) in &projection.taker_fees {
            let value =
                serde_json::to_string(taker_fee).map_err(|err| commit_error(err.to_string()))?;
            batch.push((taker_fee_key(pair), value));
        }
        batch.push((HEIGHT_KEY.to_string(), height.to_string()));

        let mut entries = self
            .entries
            .lock()
            .map_err(|_| commit_error("lock poisoned".to_string()))?;
        entries.extend(batch);

        Ok(())
    }
}
