use chrono::NaiveDate;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A material purchase from one supplier. `total_cost` is derived from the
/// item lines at write time, never accepted from the client.
#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone, TS)]
#[diesel(table_name = crate::schema::purchase_batches)]
#[ts(export)]
pub struct PurchaseBatch {
    pub id: i32,
    pub supplier: String,
    #[ts(type = "string")]
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
    pub total_cost: f64,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::purchase_batches)]
pub struct NewPurchaseBatch {
    pub supplier: String,
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
    pub total_cost: f64,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone, TS)]
#[diesel(table_name = crate::schema::purchase_items)]
#[ts(export)]
pub struct PurchaseItem {
    pub id: i32,
    pub batch_id: i32,
    pub material: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_cost: f64,
    pub line_cost: f64,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::purchase_items)]
pub struct NewPurchaseItem {
    pub batch_id: i32,
    pub material: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_cost: f64,
    pub line_cost: f64,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct PurchaseItemInput {
    pub material: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_cost: f64,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct PurchaseBatchInput {
    pub supplier: String,
    #[ts(type = "string")]
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<PurchaseItemInput>,
}

/// Request payload for updating a batch header (all fields optional)
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UpdatePurchaseBatchRequest {
    pub supplier: Option<String>,
    #[ts(type = "string | null")]
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PurchaseBatchDetail {
    #[serde(flatten)]
    pub batch: PurchaseBatch,
    pub items: Vec<PurchaseItem>,
}
