use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{
    fixtures::Dataset, ClientSpend, Contract, ContractStatus, Job, PayableJob, Profile,
    ProfileKind, ProfessionEarnings, Store, UnitOfWork,
};
use crate::dates::ReportWindow;

#[derive(Debug, Clone, Default)]
struct Tables {
    profiles: BTreeMap<i64, Profile>,
    contracts: BTreeMap<i64, Contract>,
    jobs: BTreeMap<i64, Job>,
}

impl Tables {
    fn paid_in_window<'a>(
        &'a self,
        window: &'a ReportWindow,
    ) -> impl Iterator<Item = (&'a Job, &'a Contract)> + 'a {
        self.jobs.values().filter_map(move |j| {
            let at = j.payment_date?;
            if !j.is_paid() || !window.contains(at) {
                return None;
            }
            self.contracts.get(&j.contract_id).map(|c| (j, c))
        })
    }

    fn adjust(&mut self, profile_id: i64, delta: Decimal) -> anyhow::Result<()> {
        let profile = self
            .profiles
            .get_mut(&profile_id)
            .ok_or_else(|| anyhow::anyhow!("profile {profile_id} vanished"))?;
        let next = profile.balance + delta;
        anyhow::ensure!(next >= Decimal::ZERO, "balance of profile {profile_id} would go negative");
        profile.balance = next;
        Ok(())
    }
}

/// Single-mutex store: a unit of work holds the lock until it finishes, so
/// units of work are serialised.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn from_dataset(data: Dataset) -> Self {
        let tables = Tables {
            profiles: data.profiles.into_iter().map(|p| (p.id, p)).collect(),
            contracts: data.contracts.into_iter().map(|c| (c.id, c)).collect(),
            jobs: data.jobs.into_iter().map(|j| (j.id, j)).collect(),
        };
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    pub async fn job(&self, id: i64) -> Option<Job> {
        self.tables.lock().await.jobs.get(&id).cloned()
    }

    pub async fn balance(&self, profile_id: i64) -> Option<Decimal> {
        self.tables
            .lock()
            .await
            .profiles
            .get(&profile_id)
            .map(|p| p.balance)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_profile(&self, id: i64) -> anyhow::Result<Option<Profile>> {
        Ok(self.tables.lock().await.profiles.get(&id).cloned())
    }

    async fn find_contract_for_profile(
        &self,
        contract_id: i64,
        profile_id: i64,
    ) -> anyhow::Result<Option<Contract>> {
        let t = self.tables.lock().await;
        Ok(t.contracts
            .get(&contract_id)
            .filter(|c| c.involves(profile_id))
            .cloned())
    }

    async fn list_open_contracts(&self, profile_id: i64) -> anyhow::Result<Vec<Contract>> {
        let t = self.tables.lock().await;
        Ok(t.contracts
            .values()
            .filter(|c| c.status != ContractStatus::Terminated && c.involves(profile_id))
            .cloned()
            .collect())
    }

    async fn list_unpaid_jobs(&self, profile_id: i64) -> anyhow::Result<Vec<Job>> {
        let t = self.tables.lock().await;
        Ok(t.jobs
            .values()
            .filter(|j| j.paid.is_none())
            .filter(|j| {
                t.contracts.get(&j.contract_id).is_some_and(|c| {
                    c.status == ContractStatus::InProgress && c.involves(profile_id)
                })
            })
            .cloned()
            .collect())
    }

    async fn unpaid_total_for_client(&self, client_id: i64) -> anyhow::Result<Decimal> {
        let t = self.tables.lock().await;
        Ok(t.jobs
            .values()
            .filter(|j| j.paid.is_none())
            .filter(|j| {
                t.contracts.get(&j.contract_id).is_some_and(|c| {
                    c.status == ContractStatus::InProgress && c.client_id == client_id
                })
            })
            .map(|j| j.price)
            .sum())
    }

    async fn credit_balance(&self, profile_id: i64, amount: Decimal) -> anyhow::Result<()> {
        self.tables.lock().await.adjust(profile_id, amount)
    }

    async fn top_professions(
        &self,
        window: &ReportWindow,
        limit: i64,
    ) -> anyhow::Result<Vec<ProfessionEarnings>> {
        let t = self.tables.lock().await;
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for (job, contract) in t.paid_in_window(window) {
            let Some(p) = t.profiles.get(&contract.contractor_id) else {
                continue;
            };
            if p.kind != ProfileKind::Contractor {
                continue;
            }
            *totals.entry(p.profession.clone()).or_default() += job.price;
        }
        let mut rows: Vec<_> = totals
            .into_iter()
            .map(|(profession, total)| ProfessionEarnings { profession, total })
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.profession.cmp(&b.profession)));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn top_clients(
        &self,
        window: &ReportWindow,
        limit: i64,
    ) -> anyhow::Result<Vec<ClientSpend>> {
        let t = self.tables.lock().await;
        let mut totals: BTreeMap<i64, Decimal> = BTreeMap::new();
        for (job, contract) in t.paid_in_window(window) {
            *totals.entry(contract.client_id).or_default() += job.price;
        }
        let mut rows: Vec<_> = totals
            .into_iter()
            .filter_map(|(id, paid)| {
                let p = t.profiles.get(&id).filter(|p| p.kind == ProfileKind::Client)?;
                Some(ClientSpend {
                    id,
                    first_name: p.first_name.clone(),
                    last_name: p.last_name.clone(),
                    paid,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.paid.cmp(&a.paid).then_with(|| a.id.cmp(&b.id)));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, staged }))
    }
}

/// Writes go to `staged`; only `commit` copies them back under the lock.
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_payable_job(
        &mut self,
        job_id: i64,
        client_id: i64,
    ) -> anyhow::Result<Option<PayableJob>> {
        let t = &self.staged;
        let Some(job) = t.jobs.get(&job_id).filter(|j| j.paid.is_none()) else {
            return Ok(None);
        };
        let Some(contract) = t.contracts.get(&job.contract_id).filter(|c| {
            c.status == ContractStatus::InProgress && c.client_id == client_id
        }) else {
            return Ok(None);
        };
        Ok(t.profiles.get(&client_id).map(|client| PayableJob {
            job_id,
            price: job.price,
            client_id,
            contractor_id: contract.contractor_id,
            client_balance: client.balance,
        }))
    }

    async fn mark_job_paid(
        &mut self,
        job_id: i64,
        paid_at: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        match self.staged.jobs.get_mut(&job_id) {
            Some(job) if job.paid.is_none() => {
                job.paid = Some(true);
                job.payment_date = Some(paid_at);
                job.updated_at = paid_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn adjust_balance(&mut self, profile_id: i64, delta: Decimal) -> anyhow::Result<()> {
        self.staged.adjust(profile_id, delta)
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let MemoryUnitOfWork { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }
}
