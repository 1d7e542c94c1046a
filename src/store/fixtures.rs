//! Demo dataset loaded by `SEED_DEMO_DATA=true` and reused by tests.

use rust_decimal::Decimal;
use time::{macros::datetime, OffsetDateTime};

use super::{Contract, ContractStatus, Job, Profile, ProfileKind};

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub profiles: Vec<Profile>,
    pub contracts: Vec<Contract>,
    pub jobs: Vec<Job>,
}

const CREATED: OffsetDateTime = datetime!(2020-08-01 00:00 UTC);

pub fn profile(
    id: i64,
    first_name: &str,
    last_name: &str,
    profession: &str,
    balance_cents: i64,
    kind: ProfileKind,
) -> Profile {
    Profile {
        id,
        first_name: first_name.into(),
        last_name: last_name.into(),
        profession: profession.into(),
        balance: Decimal::new(balance_cents, 2),
        kind,
        created_at: CREATED,
        updated_at: CREATED,
    }
}

pub fn contract(id: i64, status: ContractStatus, client_id: i64, contractor_id: i64) -> Contract {
    Contract {
        id,
        terms: "bla bla bla".into(),
        status,
        client_id,
        contractor_id,
        created_at: CREATED,
        updated_at: CREATED,
    }
}

/// A job priced in cents; `paid_at` marks it as paid.
pub fn job(id: i64, contract_id: i64, price_cents: i64, paid_at: Option<OffsetDateTime>) -> Job {
    Job {
        id,
        description: "work".into(),
        price: Decimal::new(price_cents, 2),
        paid: paid_at.map(|_| true),
        payment_date: paid_at,
        contract_id,
        created_at: CREATED,
        updated_at: paid_at.unwrap_or(CREATED),
    }
}

pub fn demo() -> Dataset {
    use ContractStatus::{InProgress, New, Terminated};
    use ProfileKind::{Client, Contractor};

    let profiles = vec![
        profile(1, "Harry", "Potter", "Wizard", 115_000, Client),
        profile(2, "Mr", "Robot", "Hacker", 23_111, Client),
        profile(3, "John", "Snow", "Knows nothing", 45_130, Client),
        profile(4, "Ash", "Kethcum", "Pokemon master", 130, Client),
        profile(5, "John", "Lenon", "Musician", 6_400, Contractor),
        profile(6, "Linus", "Torvalds", "Programmer", 121_400, Contractor),
        profile(7, "Alan", "Turing", "Programmer", 2_200, Contractor),
        profile(8, "Aragorn", "II Elessar Telcontarion", "Fighter", 31_400, Contractor),
    ];

    let contracts = vec![
        contract(1, Terminated, 1, 5),
        contract(2, InProgress, 1, 6),
        contract(3, InProgress, 2, 6),
        contract(4, InProgress, 2, 7),
        contract(5, New, 3, 8),
        contract(6, InProgress, 3, 7),
        contract(7, InProgress, 4, 7),
        contract(8, InProgress, 4, 6),
        contract(9, InProgress, 4, 8),
    ];

    let mut jobs = vec![
        job(1, 1, 20_000, None),
        job(2, 2, 20_100, None),
        job(3, 3, 20_200, None),
        job(4, 4, 20_000, None),
        job(5, 7, 20_000, None),
        job(6, 7, 202_000, Some(datetime!(2020-08-15 19:11:26.737 UTC))),
        job(7, 2, 20_000, Some(datetime!(2020-08-15 19:11:26.737 UTC))),
        job(8, 3, 20_000, Some(datetime!(2020-08-16 19:11:26.737 UTC))),
        job(9, 1, 20_000, Some(datetime!(2020-08-17 19:11:26.737 UTC))),
        job(10, 5, 20_000, Some(datetime!(2020-08-17 19:11:26.737 UTC))),
        job(11, 1, 2_100, Some(datetime!(2020-08-10 19:11:26.737 UTC))),
        job(12, 2, 2_100, Some(datetime!(2020-08-15 19:11:26.737 UTC))),
        job(13, 3, 12_100, Some(datetime!(2020-08-15 19:11:26.737 UTC))),
        job(14, 3, 12_100, Some(datetime!(2020-08-14 23:11:26.737 UTC))),
    ];
    if let Some(last) = jobs.last_mut() {
        last.description = "Programming".into();
    }

    Dataset {
        profiles,
        contracts,
        jobs,
    }
}
