use std::sync::Arc;

use crate::{
    config::Config,
    database::MongoSampleStore,
    error::StoreError,
    registry::RedisMembershipStore,
    store::{MembershipStore, SampleStore},
};

pub struct AppState {
    pub config: Config,
    pub samples: Arc<dyn SampleStore>,
    pub registry: Arc<dyn MembershipStore>,
}

impl AppState {
    pub async fn new() -> Result<Arc<Self>, StoreError> {
        let config = Config::load();

        let samples = MongoSampleStore::connect(&config.mongo_url).await?;
        let registry = RedisMembershipStore::connect(&config.redis_url).await?;

        Ok(Arc::new(Self {
            config,
            samples: Arc::new(samples),
            registry: Arc::new(registry),
        }))
    }
}
