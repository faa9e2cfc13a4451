use std::sync::Arc;

use aoi_core::config::EngineConfig;
use aoi_query::SpatialQueryEngine;
use aoi_store::ports::AoiRepository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn AoiRepository>,
    pub engine: SpatialQueryEngine,
}

impl AppState {
    pub fn new(repository: Arc<dyn AoiRepository>, config: EngineConfig) -> Self {
        Self { repository, engine: SpatialQueryEngine::new(config) }
    }
}
