use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::users::UserStore;
use crate::search::SearchStore;

/// Explicitly constructed application state, injected into handlers through
/// axum's `State` rather than reached through process-wide globals. Tests
/// substitute in-memory stores here.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub search: Arc<dyn SearchStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        search: Arc<dyn SearchStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            users,
            search,
        }
    }
}
