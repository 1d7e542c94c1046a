use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{BestClient, ReportQuery},
    services,
};
use crate::{
    dates::ReportWindow, dto::MessageResponse, error::AppResult, state::AppState,
};

// Reports are open to any caller.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/best-profession", get(best_profession))
        .route("/admin/best-clients", get(best_clients))
}

#[instrument(skip(state))]
pub async fn best_profession(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> AppResult<Json<MessageResponse>> {
    let window = ReportWindow::from_params(q.start.as_deref(), q.end.as_deref())?;
    let profession = services::best_profession(state.store.as_ref(), &window).await?;
    Ok(Json(MessageResponse::new(format!(
        "The best profession is {profession}"
    ))))
}

#[instrument(skip(state))]
pub async fn best_clients(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> AppResult<Json<Vec<BestClient>>> {
    let window = ReportWindow::from_params(q.start.as_deref(), q.end.as_deref())?;
    let limit = services::parse_limit(q.limit.as_deref(), &state.config.reports)?;
    let clients = services::best_clients(state.store.as_ref(), &window, limit).await?;
    Ok(Json(clients))
}
