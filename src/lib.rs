pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::middleware::auth::AuthSettings;
use crate::services::ai_service::AiAssistant;
use crate::services::store_service::StateStore;

#[derive(Clone)]
pub struct AppState {
    /// Every dispatch goes through this one lock, so actions apply one at a time.
    pub store: Arc<Mutex<StateStore>>,
    pub ai: Option<Arc<dyn AiAssistant>>,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(store: StateStore, ai: Option<Arc<dyn AiAssistant>>, auth: AuthSettings) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            ai,
            auth,
        }
    }
}
