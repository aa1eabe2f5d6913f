use tracing::{error, info};

use crate::config::IngesterConfig;
use crate::domain::{BlockProjection, ChainReader, ProjectionStore};
use crate::transformer::PoolTransformer;
use crate::IngestError;

/// Projects every pool into the store once per block.
pub struct PoolIngester<C: ChainReader, S: ProjectionStore> {
    chain: C,
    store: S,
    config: IngesterConfig,
}

impl<C: ChainReader, S: ProjectionStore> PoolIngester<C, S> {
    pub fn new(chain: C, store: S, config: IngesterConfig) -> Self {
        PoolIngester {
            chain,
            store,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads, converts and commits every pool at `height`. Nothing is written unless every pool
    /// converts.
    pub fn process_block(&self, height: u64) -> Result<BlockProjection, IngestError> {
        let precisions = self.chain.denom_precisions()?;
        let pools = self.chain.block_pools()?;

        let mut transformer = PoolTransformer::new(&self.chain, &self.config, precisions);
        let projections = transformer.transform(&pools).map_err(|err| {
            error!(height, %err, "failed to convert pools");
            err
        })?;

        info!(
            height,
            num_cfmm = pools.cfmm.len(),
            num_concentrated = pools.concentrated.len(),
            num_cosmwasm = pools.cosmwasm.len(),
            "ingesting pools"
        );

        let projection = BlockProjection {
            height,
            pools: projections,
            taker_fees: transformer.into_taker_fees(),
        };

        if let Err(err) = self.store.commit(&projection) {
            error!(height, %err, "failed to commit pools");
            return Err(err);
        }

        Ok(projection)
    }
}
