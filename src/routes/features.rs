//! Feature route handlers
//!
//! Features are served with their live stages from the feature cache, filled
//! on a miss. Stage writes invalidate the entry.

use crate::error::{ApiResult, AppError};
use crate::models::{FeatureView, SuccessResponse};
use crate::state::SharedState;
use crate::store::EntityStore;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

#[derive(Serialize)]
pub struct FeatureBody {
    pub feature: Value,
}

/// Get a feature through the cache
pub async fn get_feature(
    State(state): State<SharedState>,
    Path(feature_id): Path<i64>,
) -> ApiResult<Json<SuccessResponse<FeatureBody>>> {
    let key = state.stages.cache_key(feature_id);

    let feature = match state.cache.get(&key).await {
        Some(cached) => {
            debug!("Cache hit {}", key);
            cached
        }
        None => {
            let feature = state
                .stages
                .store()
                .get_feature(feature_id)
                .await?
                .ok_or(AppError::FeatureNotFound(feature_id))?;
            let stages = state.stages.store().stages_for_feature(feature_id).await?;
            let value = serde_json::to_value(FeatureView { feature, stages })?;
            state.cache.set(key, value.clone()).await;
            value
        }
    };

    Ok(Json(SuccessResponse::with_data(
        "Feature retrieved.",
        FeatureBody { feature },
    )))
}
