use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    store::{ProfileKind, Store},
};

pub const USER_NOT_FOUND: &str = "User not found";
pub const NOTHING_OWED: &str = "This user cannot receive money at the moment";
pub const OVER_CAP: &str = "User cannot receive this amount of money at the moment";

/// Share of the outstanding unpaid total a client may deposit at once, in percent.
const DEPOSIT_CAP_PERCENT: i64 = 25;

/// `percent`% of `total`, rounded half away from zero to cents.
pub fn percentage(percent: i64, total: Decimal) -> Decimal {
    (Decimal::from(percent) / Decimal::ONE_HUNDRED * total)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn deposit_cap(outstanding: Decimal) -> Decimal {
    percentage(DEPOSIT_CAP_PERCENT, outstanding)
}

/// Credits `amount` to client `user_id`, capped at a quarter of what the client
/// still owes on in-progress contracts. Returns the cap that applied.
pub async fn deposit(store: &dyn Store, user_id: i64, amount: Decimal) -> AppResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(AppError::Validation("amount must be positive".into()));
    }
    // Balances are stored with two decimal places.
    if amount.normalize().scale() > 2 {
        return Err(AppError::Validation(
            "amount must have at most two decimal places".into(),
        ));
    }

    let client = store
        .find_profile(user_id)
        .await?
        .filter(|p| p.kind == ProfileKind::Client)
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;

    let outstanding = store.unpaid_total_for_client(client.id).await?;
    if outstanding <= Decimal::ZERO {
        warn!(user_id, "deposit refused: nothing outstanding");
        return Err(AppError::BusinessRule(NOTHING_OWED.into()));
    }

    let cap = deposit_cap(outstanding);
    if amount > cap {
        warn!(user_id, %amount, %cap, "deposit refused: over cap");
        return Err(AppError::BusinessRule(OVER_CAP.into()));
    }

    store.credit_balance(client.id, amount).await?;
    info!(user_id, %amount, %cap, "deposit credited");
    Ok(cap)
}
