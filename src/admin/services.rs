use tracing::debug;

use super::dto::BestClient;
use crate::{
    config::ReportConfig,
    dates::ReportWindow,
    error::{AppError, AppResult},
    store::Store,
};

pub const NO_JOBS_IN_RANGE: &str = "No jobs found in the range provided";

/// Parses the `limit` parameter: an integer in `1..=max_limit`, defaulting when absent.
pub fn parse_limit(raw: Option<&str>, cfg: &ReportConfig) -> AppResult<i64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(cfg.default_limit);
    };
    match raw.parse::<i64>() {
        Ok(n) if (1..=cfg.max_limit).contains(&n) => Ok(n),
        _ => Err(AppError::Validation(format!(
            "limit must be an integer between 1 and {}",
            cfg.max_limit
        ))),
    }
}

/// Contractor profession with the highest paid-job total in the window.
pub async fn best_profession(store: &dyn Store, window: &ReportWindow) -> AppResult<String> {
    let top = store
        .top_professions(window, 1)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BusinessRule(NO_JOBS_IN_RANGE.into()))?;
    debug!(profession = %top.profession, total = %top.total, "best profession");
    Ok(top.profession)
}

pub async fn best_clients(
    store: &dyn Store,
    window: &ReportWindow,
    limit: i64,
) -> AppResult<Vec<BestClient>> {
    let rows = store.top_clients(window, limit).await?;
    if rows.is_empty() {
        return Err(AppError::BusinessRule(NO_JOBS_IN_RANGE.into()));
    }
    Ok(rows.into_iter().map(BestClient::from).collect())
}
