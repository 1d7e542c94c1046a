use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "profile_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Client,
    Contractor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "contract_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    New,
    InProgress,
    Terminated,
}

/// Profile record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub balance: Decimal,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: ProfileKind,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Contract record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: i64,
    pub terms: String,
    pub status: ContractStatus,
    #[serde(rename = "ClientId")]
    pub client_id: i64,
    #[serde(rename = "ContractorId")]
    pub contractor_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Contract {
    pub fn involves(&self, profile_id: i64) -> bool {
        self.client_id == profile_id || self.contractor_id == profile_id
    }
}

/// Job record in the database. `paid` is either unset or `true`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub description: String,
    pub price: Decimal,
    pub paid: Option<bool>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub payment_date: Option<OffsetDateTime>,
    #[serde(rename = "ContractId")]
    pub contract_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Job {
    pub fn is_paid(&self) -> bool {
        self.paid == Some(true)
    }
}

/// An unpaid job on an in-progress contract, locked for payment together with
/// the paying client's balance.
#[derive(Debug, Clone, FromRow)]
pub struct PayableJob {
    pub job_id: i64,
    pub price: Decimal,
    pub client_id: i64,
    pub contractor_id: i64,
    pub client_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProfessionEarnings {
    pub profession: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ClientSpend {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub paid: Decimal,
}
