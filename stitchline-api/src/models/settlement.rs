use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A weekly payment reconciliation record for one worker. Settlements are
/// audit records: they can be created and read but never edited or deleted.
#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone, TS)]
#[diesel(table_name = crate::schema::settlements)]
#[ts(export)]
pub struct Settlement {
    pub id: i32,
    pub worker_contact_id: i32,
    #[ts(type = "string")]
    pub week_start: NaiveDate,
    #[ts(type = "string")]
    pub week_end: NaiveDate,
    pub gross_pay: f64,
    pub deductions: f64,
    pub net_pay: f64,
    pub entry_count: i32,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::settlements)]
pub struct NewSettlement {
    pub worker_contact_id: i32,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub gross_pay: f64,
    pub deductions: f64,
    pub net_pay: f64,
    pub entry_count: i32,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SettlementInput {
    pub worker_contact_id: i32,
    #[ts(type = "string")]
    pub week_start: NaiveDate,
    #[ts(type = "string")]
    pub week_end: NaiveDate,
    #[serde(default)]
    pub deductions: f64,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Computed pay figures for a settlement before it is written.
#[derive(Debug, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct SettlementPreview {
    pub worker_contact_id: i32,
    #[ts(type = "string")]
    pub week_start: NaiveDate,
    #[ts(type = "string")]
    pub week_end: NaiveDate,
    pub gross_pay: f64,
    pub deductions: f64,
    pub net_pay: f64,
    pub entry_count: i32,
}
