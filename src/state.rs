//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::effects::FeatureCache;
use crate::stages::StageService;
use crate::store::Datastore;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Stage operations over the configured datastore
    pub stages: StageService<Datastore>,

    /// Serialized features, invalidated by stage writes
    pub cache: Arc<FeatureCache>,

    /// JWT secret key for token verification
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(stages: StageService<Datastore>, cache: Arc<FeatureCache>, jwt_secret: String) -> Self {
        Self {
            stages,
            cache,
            jwt_secret,
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
