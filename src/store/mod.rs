use async_trait::async_trait;
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::dates::ReportWindow;

pub mod fixtures;
#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod repo_types;

pub use repo_types::{
    ClientSpend, Contract, ContractStatus, Job, PayableJob, Profile, ProfileKind,
    ProfessionEarnings,
};

/// Relational store holding profiles, contracts and jobs.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_profile(&self, id: i64) -> anyhow::Result<Option<Profile>>;

    /// Contract `contract_id`, only if `profile_id` is its client or contractor.
    async fn find_contract_for_profile(
        &self,
        contract_id: i64,
        profile_id: i64,
    ) -> anyhow::Result<Option<Contract>>;

    /// Non-terminated contracts the profile is party to.
    async fn list_open_contracts(&self, profile_id: i64) -> anyhow::Result<Vec<Contract>>;

    /// Unpaid jobs on in-progress contracts the profile is party to.
    async fn list_unpaid_jobs(&self, profile_id: i64) -> anyhow::Result<Vec<Job>>;

    /// Sum of unpaid job prices on the client's in-progress contracts; zero when none.
    async fn unpaid_total_for_client(&self, client_id: i64) -> anyhow::Result<Decimal>;

    /// Atomically adds `amount` to the profile's balance.
    async fn credit_balance(&self, profile_id: i64, amount: Decimal) -> anyhow::Result<()>;

    /// Paid-job totals per contractor profession inside the window, highest first.
    async fn top_professions(
        &self,
        window: &ReportWindow,
        limit: i64,
    ) -> anyhow::Result<Vec<ProfessionEarnings>>;

    /// Paid-job totals per client inside the window, highest first.
    async fn top_clients(
        &self,
        window: &ReportWindow,
        limit: i64,
    ) -> anyhow::Result<Vec<ClientSpend>>;

    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>>;
}

/// Group of writes that commit together. Dropping without `commit` rolls back.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Locks and returns the job if it is unpaid, its contract is in progress
    /// and `client_id` is the contract's client.
    async fn find_payable_job(
        &mut self,
        job_id: i64,
        client_id: i64,
    ) -> anyhow::Result<Option<PayableJob>>;

    /// Marks an unpaid job as paid. Returns false if it was already paid.
    async fn mark_job_paid(&mut self, job_id: i64, paid_at: OffsetDateTime)
        -> anyhow::Result<bool>;

    /// Adds `delta` (possibly negative) to the profile's balance in place.
    async fn adjust_balance(&mut self, profile_id: i64, delta: Decimal) -> anyhow::Result<()>;

    async fn commit(self: Box<Self>) -> anyhow::Result<()>;

    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}
