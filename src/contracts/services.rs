use crate::{
    error::{AppError, AppResult},
    store::{Contract, Profile, Store},
};

pub async fn get_contract(store: &dyn Store, profile: &Profile, id: i64) -> AppResult<Contract> {
    // Contracts owned by someone else are indistinguishable from missing ones.
    store
        .find_contract_for_profile(id, profile.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contract not found".into()))
}

pub async fn list_contracts(store: &dyn Store, profile: &Profile) -> AppResult<Vec<Contract>> {
    Ok(store.list_open_contracts(profile.id).await?)
}
