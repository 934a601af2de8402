use std::sync::Arc;

use super::{config::Config, database::DocumentStore, error::AppError};

pub struct State {
    pub config: Config,
    pub store: DocumentStore,
}

impl State {
    pub fn new() -> Result<Arc<Self>, AppError> {
        let config = Config::load()?;

        let store = DocumentStore::connect(
            &config.meili_url,
            config.meili_key.as_deref(),
            &config.data_index,
        )?;

        Ok(Arc::new(Self { config, store }))
    }
}
