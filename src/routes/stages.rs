//! Stage route handlers
//!
//! Thin adapters from HTTP onto `StageService`.

use crate::auth::Actor;
use crate::error::ApiResult;
use crate::models::{MessageResponse, StageView, SuccessResponse};
use crate::stages::{ChangePayload, ChangedField, CreatedStage, NewStage};
use crate::state::SharedState;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
pub struct StageUpdated {
    pub updated: bool,
    pub changes: Vec<ChangedField>,
}

/// Create a stage on a feature
pub async fn create_stage(
    State(state): State<SharedState>,
    Extension(actor): Extension<Actor>,
    Path(feature_id): Path<i64>,
    Json(payload): Json<NewStage>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<CreatedStage>>)> {
    let created = state.stages.create(&actor, feature_id, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data("Stage created.", created)),
    ))
}

/// Get a stage and its extension stages
pub async fn get_stage(
    State(state): State<SharedState>,
    Path((feature_id, stage_id)): Path<(i64, i64)>,
) -> ApiResult<Json<SuccessResponse<StageView>>> {
    debug!("Reading stage {} of feature {}", stage_id, feature_id);
    let view = state.stages.get(stage_id).await?;

    Ok(Json(SuccessResponse::with_data("Stage retrieved.", view)))
}

/// Apply a partial update to a stage
pub async fn update_stage(
    State(state): State<SharedState>,
    Extension(actor): Extension<Actor>,
    Path((_feature_id, stage_id)): Path<(i64, i64)>,
    Json(payload): Json<ChangePayload>,
) -> ApiResult<Json<SuccessResponse<StageUpdated>>> {
    let outcome = state.stages.update(&actor, stage_id, &payload).await?;

    let message = if outcome.updated {
        "Stage values updated."
    } else {
        "No stage values changed."
    };
    Ok(Json(SuccessResponse::with_data(
        message,
        StageUpdated {
            updated: outcome.updated,
            changes: outcome.changes,
        },
    )))
}

/// Archive a stage
pub async fn archive_stage(
    State(state): State<SharedState>,
    Extension(actor): Extension<Actor>,
    Path((_feature_id, stage_id)): Path<(i64, i64)>,
) -> ApiResult<Json<MessageResponse>> {
    state.stages.archive(&actor, stage_id).await?;

    Ok(Json(MessageResponse::new("Stage archived.")))
}
