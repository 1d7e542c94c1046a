use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    store::{Job, Profile, Store, UnitOfWork},
};

pub const JOB_NOT_ELIGIBLE: &str = "Job does not exist for authenticated user";
pub const INSUFFICIENT_FUNDS: &str = "Client does not have enough money to pay for the job";

/// Outcome of a committed job payment.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub job_id: i64,
    pub amount: Decimal,
    pub client_id: i64,
    pub contractor_id: i64,
    pub paid_at: OffsetDateTime,
}

pub async fn list_unpaid(store: &dyn Store, profile: &Profile) -> AppResult<Vec<Job>> {
    Ok(store.list_unpaid_jobs(profile.id).await?)
}

/// Pays `job_id` on behalf of `client`: marks the job paid and moves its price
/// from the client to the contractor inside one unit of work. On any error
/// nothing is written.
pub async fn pay_job(store: &dyn Store, client: &Profile, job_id: i64) -> AppResult<Payment> {
    let mut uow = store.begin().await?;
    match transfer(uow.as_mut(), client.id, job_id).await {
        Ok(payment) => {
            uow.commit().await?;
            info!(
                job_id,
                client_id = payment.client_id,
                contractor_id = payment.contractor_id,
                amount = %payment.amount,
                "job paid"
            );
            Ok(payment)
        }
        Err(e) => {
            if let Err(rb) = uow.rollback().await {
                warn!(error = %rb, job_id, "rollback failed");
            }
            Err(e)
        }
    }
}

async fn transfer(uow: &mut dyn UnitOfWork, client_id: i64, job_id: i64) -> AppResult<Payment> {
    let Some(job) = uow.find_payable_job(job_id, client_id).await? else {
        warn!(job_id, client_id, "job not payable by client");
        return Err(AppError::BusinessRule(JOB_NOT_ELIGIBLE.into()));
    };

    if job.client_balance < job.price {
        warn!(
            job_id,
            client_id,
            balance = %job.client_balance,
            price = %job.price,
            "insufficient funds"
        );
        return Err(AppError::BusinessRule(INSUFFICIENT_FUNDS.into()));
    }

    let paid_at = OffsetDateTime::now_utc();
    if !uow.mark_job_paid(job.job_id, paid_at).await? {
        return Err(AppError::BusinessRule(JOB_NOT_ELIGIBLE.into()));
    }
    uow.adjust_balance(job.client_id, -job.price).await?;
    uow.adjust_balance(job.contractor_id, job.price).await?;

    Ok(Payment {
        job_id: job.job_id,
        amount: job.price,
        client_id: job.client_id,
        contractor_id: job.contractor_id,
        paid_at,
    })
}
