use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::services;
use crate::{
    dto::MessageResponse, error::AppResult, extract::IdPath, profiles::CurrentProfile,
    state::AppState, store::Job,
};

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs/unpaid", get(list_unpaid))
        .route("/jobs/:job_id/pay", post(pay_job))
}

#[instrument(skip_all, fields(profile_id = profile.id))]
pub async fn list_unpaid(
    State(state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
) -> AppResult<Json<Vec<Job>>> {
    let jobs = services::list_unpaid(state.store.as_ref(), &profile).await?;
    Ok(Json(jobs))
}

#[instrument(skip_all, fields(profile_id = profile.id, job_id = job_id))]
pub async fn pay_job(
    State(state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    IdPath(job_id): IdPath,
) -> AppResult<Json<MessageResponse>> {
    services::pay_job(state.store.as_ref(), &profile, job_id).await?;
    Ok(Json(MessageResponse::new("Job paid successfully")))
}
