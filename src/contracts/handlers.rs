use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use super::services;
use crate::{
    error::AppResult, extract::IdPath, profiles::CurrentProfile, state::AppState,
    store::Contract,
};

pub fn contract_routes() -> Router<AppState> {
    Router::new()
        .route("/contracts", get(list_contracts))
        .route("/contracts/:id", get(get_contract))
}

#[instrument(skip_all, fields(profile_id = profile.id, contract_id = id))]
pub async fn get_contract(
    State(state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
    IdPath(id): IdPath,
) -> AppResult<Json<Contract>> {
    let contract = services::get_contract(state.store.as_ref(), &profile, id).await?;
    Ok(Json(contract))
}

#[instrument(skip_all, fields(profile_id = profile.id))]
pub async fn list_contracts(
    State(state): State<AppState>,
    CurrentProfile(profile): CurrentProfile,
) -> AppResult<Json<Vec<Contract>>> {
    let contracts = services::list_contracts(state.store.as_ref(), &profile).await?;
    debug!(count = contracts.len(), "contracts listed");
    Ok(Json(contracts))
}
