pub mod chat;
pub mod cli;
pub mod client;
pub mod config;
pub mod provider;
pub mod rest;
pub mod validate;

use std::sync::Arc;

use config::AtlasConfig;
use provider::ResponseClient;

/// Shared application state passed to every route handler.
pub struct AppContext {
    pub config: Arc<AtlasConfig>,
    /// Injected generation capability — swapped for a mock in tests.
    pub responses: Arc<dyn ResponseClient>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    pub fn new(config: Arc<AtlasConfig>, responses: Arc<dyn ResponseClient>) -> Self {
        Self {
            config,
            responses,
            started_at: std::time::Instant::now(),
        }
    }
}
