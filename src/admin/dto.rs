use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::ClientSpend;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BestClient {
    pub id: i64,
    pub full_name: String,
    pub paid: Decimal,
}

impl From<ClientSpend> for BestClient {
    fn from(c: ClientSpend) -> Self {
        Self {
            id: c.id,
            full_name: format!("{} {}", c.first_name, c.last_name),
            paid: c.paid,
        }
    }
}
