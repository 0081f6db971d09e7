use chrono::NaiveDate;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An external manufacturing contract tracked for cost/profit reporting.
#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone, TS)]
#[diesel(table_name = crate::schema::job_orders)]
#[ts(export)]
pub struct JobOrder {
    pub id: i32,
    pub company_name: String,
    #[ts(type = "string")]
    pub order_date: NaiveDate,
    pub total_pieces: i32,
    pub rate_per_piece: f64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub payment_status: String, // 'pending', 'partial', 'paid'
    pub job_status: String,     // 'planned', 'in_progress', 'completed'
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::job_orders)]
pub struct NewJobOrder {
    pub company_name: String,
    pub order_date: NaiveDate,
    pub total_pieces: i32,
    pub rate_per_piece: f64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub payment_status: String,
    pub job_status: String,
}

/// Per-operation rate breakdown line under a job order.
#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone, TS)]
#[diesel(table_name = crate::schema::job_operations)]
#[ts(export)]
pub struct JobOperation {
    pub id: i32,
    pub job_order_id: i32,
    pub category: String,
    pub operation_name: String,
    pub rate: f64,
    pub pieces: i32,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::job_operations)]
pub struct NewJobOperation {
    pub job_order_id: i32,
    pub category: String,
    pub operation_name: String,
    pub rate: f64,
    pub pieces: i32,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct JobOperationInput {
    pub category: String,
    pub operation_name: String,
    pub rate: f64,
    pub pieces: i32,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct JobOrderInput {
    pub company_name: String,
    #[ts(type = "string")]
    pub order_date: NaiveDate,
    pub total_pieces: i32,
    pub rate_per_piece: f64,
    #[serde(default)]
    pub operations: Vec<JobOperationInput>,
}

/// Request payload for updating a job order (all fields optional)
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UpdateJobOrderRequest {
    pub company_name: Option<String>,
    #[ts(type = "string | null")]
    pub order_date: Option<NaiveDate>,
    pub total_pieces: Option<i32>,
    pub rate_per_piece: Option<f64>,
    pub job_status: Option<String>,
}

/// Payment recorded against an order; bumps `paid_amount` and the
/// payment status.
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct JobOrderPaymentInput {
    pub amount: f64,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Job order with its operation lines and their summed cost, as shown on
/// the order detail screen.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct JobOrderDetail {
    #[serde(flatten)]
    pub order: JobOrder,
    pub operations: Vec<JobOperation>,
    pub operation_cost: f64,
    pub pending_amount: f64,
}

/// Dashboard summary reduced from every job order row.
#[derive(Debug, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct JobOrderStats {
    pub order_count: i64,
    pub total_pieces: i64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
    pub pending_count: i64,
    pub partial_count: i64,
    pub paid_count: i64,
    pub planned_count: i64,
    pub in_progress_count: i64,
    pub completed_count: i64,
    pub completion_pct: f64,
    pub monthly: Vec<MonthlyOrderBucket>,
}

/// One `YYYY-MM` bucket in the dashboard time series.
#[derive(Debug, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct MonthlyOrderBucket {
    pub month: String,
    pub order_count: i64,
    pub pieces: i64,
    pub amount: f64,
}
