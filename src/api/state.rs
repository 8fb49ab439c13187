use std::sync::Arc;

use crate::application::SearchService;
use crate::domain::ports::DocumentStore;
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<SearchService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: AppConfig) -> Self {
        Self {
            search_service: Arc::new(SearchService::new(store)),
            config: Arc::new(config),
        }
    }
}
