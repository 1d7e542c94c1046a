use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use super::services;
use crate::{
    dto::MessageResponse,
    error::AppResult,
    extract::{IdPath, ValidJson},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: Decimal,
}

// No profile guard: anyone may fund a client.
pub fn balance_routes() -> Router<AppState> {
    Router::new().route("/balances/deposit/:user_id", post(deposit))
}

#[instrument(skip(state))]
pub async fn deposit(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
    ValidJson(body): ValidJson<DepositRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::deposit(state.store.as_ref(), user_id, body.amount).await?;
    Ok(Json(MessageResponse::new(
        "Amount deposited on client account successfully",
    )))
}
