use anyhow::Context;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use tracing::{debug, info};

use super::{
    fixtures::Dataset, ClientSpend, Contract, Job, PayableJob, Profile, ProfessionEarnings,
    Store, UnitOfWork,
};
use crate::dates::ReportWindow;

const PROFILE_COLUMNS: &str =
    "id, first_name, last_name, profession, balance, type, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_profile(&self, id: i64) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find profile")?;
        Ok(profile)
    }

    async fn find_contract_for_profile(
        &self,
        contract_id: i64,
        profile_id: i64,
    ) -> anyhow::Result<Option<Contract>> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            SELECT id, terms, status, client_id, contractor_id, created_at, updated_at
              FROM contracts
             WHERE id = $1
               AND (client_id = $2 OR contractor_id = $2)
            "#,
        )
        .bind(contract_id)
        .bind(profile_id)
        .fetch_optional(&self.db)
        .await
        .context("find contract for profile")?;
        Ok(contract)
    }

    async fn list_open_contracts(&self, profile_id: i64) -> anyhow::Result<Vec<Contract>> {
        let rows = sqlx::query_as::<_, Contract>(
            r#"
            SELECT id, terms, status, client_id, contractor_id, created_at, updated_at
              FROM contracts
             WHERE status <> 'terminated'
               AND (client_id = $1 OR contractor_id = $1)
             ORDER BY id
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.db)
        .await
        .context("list open contracts")?;
        Ok(rows)
    }

    async fn list_unpaid_jobs(&self, profile_id: i64) -> anyhow::Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, Job>(
            r#"
            SELECT j.id, j.description, j.price, j.paid, j.payment_date, j.contract_id,
                   j.created_at, j.updated_at
              FROM jobs j
              JOIN contracts c ON c.id = j.contract_id
             WHERE j.paid IS NULL
               AND c.status = 'in_progress'
               AND (c.client_id = $1 OR c.contractor_id = $1)
             ORDER BY j.id
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.db)
        .await
        .context("list unpaid jobs")?;
        Ok(rows)
    }

    async fn unpaid_total_for_client(&self, client_id: i64) -> anyhow::Result<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(j.price), 0)
              FROM jobs j
              JOIN contracts c ON c.id = j.contract_id
             WHERE j.paid IS NULL
               AND c.status = 'in_progress'
               AND c.client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_one(&self.db)
        .await
        .context("sum unpaid jobs")?;
        Ok(total)
    }

    async fn credit_balance(&self, profile_id: i64, amount: Decimal) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE profiles
               SET balance = balance + $2, updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(profile_id)
        .bind(amount)
        .execute(&self.db)
        .await
        .context("credit balance")?;
        anyhow::ensure!(res.rows_affected() == 1, "profile {profile_id} vanished");
        Ok(())
    }

    async fn top_professions(
        &self,
        window: &ReportWindow,
        limit: i64,
    ) -> anyhow::Result<Vec<ProfessionEarnings>> {
        let rows = sqlx::query_as::<_, ProfessionEarnings>(
            r#"
            SELECT p.profession, SUM(j.price) AS total
              FROM jobs j
              JOIN contracts c ON c.id = j.contract_id
              JOIN profiles p ON p.id = c.contractor_id
             WHERE j.paid IS TRUE
               AND p.type = 'contractor'
               AND ($1::timestamptz IS NULL OR j.payment_date >= $1)
               AND ($2::timestamptz IS NULL OR j.payment_date < $2)
             GROUP BY p.profession
             ORDER BY total DESC, p.profession COLLATE "C" ASC
             LIMIT $3
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("top professions")?;
        Ok(rows)
    }

    async fn top_clients(
        &self,
        window: &ReportWindow,
        limit: i64,
    ) -> anyhow::Result<Vec<ClientSpend>> {
        let rows = sqlx::query_as::<_, ClientSpend>(
            r#"
            SELECT p.id, p.first_name, p.last_name, SUM(j.price) AS paid
              FROM jobs j
              JOIN contracts c ON c.id = j.contract_id
              JOIN profiles p ON p.id = c.client_id
             WHERE j.paid IS TRUE
               AND p.type = 'client'
               AND ($1::timestamptz IS NULL OR j.payment_date >= $1)
               AND ($2::timestamptz IS NULL OR j.payment_date < $2)
             GROUP BY p.id, p.first_name, p.last_name
             ORDER BY paid DESC, p.id ASC
             LIMIT $3
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("top clients")?;
        Ok(rows)
    }

    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>> {
        let tx = self.db.begin().await.context("begin tx")?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// Read-committed transaction; rows read for payment are held with `FOR UPDATE`
/// so a concurrent payment of the same job re-evaluates `paid IS NULL` after
/// this one commits.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn find_payable_job(
        &mut self,
        job_id: i64,
        client_id: i64,
    ) -> anyhow::Result<Option<PayableJob>> {
        let row = sqlx::query_as::<_, PayableJob>(
            r#"
            SELECT j.id AS job_id, j.price, c.client_id, c.contractor_id,
                   p.balance AS client_balance
              FROM jobs j
              JOIN contracts c ON c.id = j.contract_id
              JOIN profiles p ON p.id = c.client_id
             WHERE j.id = $1
               AND j.paid IS NULL
               AND c.status = 'in_progress'
               AND c.client_id = $2
               FOR UPDATE OF j, p
            "#,
        )
        .bind(job_id)
        .bind(client_id)
        .fetch_optional(&mut *self.tx)
        .await
        .context("lock payable job")?;
        Ok(row)
    }

    async fn mark_job_paid(
        &mut self,
        job_id: i64,
        paid_at: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE jobs
               SET paid = TRUE, payment_date = $2, updated_at = $2
             WHERE id = $1 AND paid IS NULL
            "#,
        )
        .bind(job_id)
        .bind(paid_at)
        .execute(&mut *self.tx)
        .await
        .context("mark job paid")?;
        Ok(res.rows_affected() == 1)
    }

    async fn adjust_balance(&mut self, profile_id: i64, delta: Decimal) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE profiles
               SET balance = balance + $2, updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(profile_id)
        .bind(delta)
        .execute(&mut *self.tx)
        .await
        .with_context(|| format!("adjust balance of profile {profile_id}"))?;
        anyhow::ensure!(res.rows_affected() == 1, "profile {profile_id} vanished");
        Ok(())
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.tx.commit().await.context("commit tx")
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        self.tx.rollback().await.context("rollback tx")
    }
}

/// Loads `data` into an empty database. Does nothing if profiles already exist.
pub async fn seed(db: &PgPool, data: &Dataset) -> anyhow::Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(db)
        .await
        .context("count profiles")?;
    if existing > 0 {
        debug!(existing, "profiles present; skipping seed");
        return Ok(());
    }

    let mut tx = db.begin().await.context("begin tx")?;
    for p in &data.profiles {
        sqlx::query(
            r#"
            INSERT INTO profiles
                (id, first_name, last_name, profession, balance, type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(p.id)
        .bind(&p.first_name)
        .bind(&p.last_name)
        .bind(&p.profession)
        .bind(p.balance)
        .bind(p.kind)
        .bind(p.created_at)
        .bind(p.updated_at)
        .execute(&mut *tx)
        .await
        .context("insert profile")?;
    }
    for c in &data.contracts {
        sqlx::query(
            r#"
            INSERT INTO contracts
                (id, terms, status, client_id, contractor_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(c.id)
        .bind(&c.terms)
        .bind(c.status)
        .bind(c.client_id)
        .bind(c.contractor_id)
        .bind(c.created_at)
        .bind(c.updated_at)
        .execute(&mut *tx)
        .await
        .context("insert contract")?;
    }
    for j in &data.jobs {
        sqlx::query(
            r#"
            INSERT INTO jobs
                (id, description, price, paid, payment_date, contract_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(j.id)
        .bind(&j.description)
        .bind(j.price)
        .bind(j.paid)
        .bind(j.payment_date)
        .bind(j.contract_id)
        .bind(j.created_at)
        .bind(j.updated_at)
        .execute(&mut *tx)
        .await
        .context("insert job")?;
    }
    // Explicit ids bypass the identity sequences.
    for table in ["profiles", "contracts", "jobs"] {
        sqlx::query(&format!(
            "SELECT setval(pg_get_serial_sequence('{table}', 'id'), COALESCE(MAX(id), 1)) FROM {table}"
        ))
        .execute(&mut *tx)
        .await
        .with_context(|| format!("reset {table} sequence"))?;
    }
    tx.commit().await.context("commit tx")?;

    info!(
        profiles = data.profiles.len(),
        contracts = data.contracts.len(),
        jobs = data.jobs.len(),
        "demo data seeded"
    );
    Ok(())
}
