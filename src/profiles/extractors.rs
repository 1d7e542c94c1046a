use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::{error::AppError, state::AppState, store::Profile};

/// Header carrying the caller's profile id.
pub const PROFILE_HEADER: &str = "profile_id";

/// Resolves the `profile_id` header to a stored profile, re-read on every request.
#[derive(Debug)]
pub struct CurrentProfile(pub Profile);

#[async_trait]
impl FromRequestParts<AppState> for CurrentProfile {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(PROFILE_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("missing profile_id header".into()))?;

        let id = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Unauthenticated("invalid profile_id header".into()))?;

        match state.store.find_profile(id).await? {
            Some(profile) => Ok(CurrentProfile(profile)),
            None => {
                warn!(profile_id = id, "unknown profile");
                Err(AppError::Unauthenticated("unknown profile".into()))
            }
        }
    }
}
