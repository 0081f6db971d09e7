use chrono::NaiveDate;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A cutting/production lot. `cut_quantity` is the hard ceiling on how many
/// pieces production entries may complete against this run.
#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone, TS)]
#[diesel(table_name = crate::schema::production_runs)]
#[ts(export)]
pub struct ProductionRun {
    pub id: i32,
    pub product_name: String,
    pub target_quantity: i32,
    pub cut_quantity: i32,
    pub status: String, // 'planned', 'in_progress', 'completed'
    #[ts(type = "string")]
    pub start_date: NaiveDate,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::production_runs)]
pub struct NewProductionRun {
    pub product_name: String,
    pub target_quantity: i32,
    pub cut_quantity: i32,
    pub status: String,
    pub start_date: NaiveDate,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone, TS)]
#[diesel(table_name = crate::schema::production_materials)]
#[ts(export)]
pub struct ProductionMaterial {
    pub id: i32,
    pub run_id: i32,
    pub material: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::production_materials)]
pub struct NewProductionMaterial {
    pub run_id: i32,
    pub material: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone, TS)]
#[diesel(table_name = crate::schema::production_costs)]
#[ts(export)]
pub struct ProductionCost {
    pub id: i32,
    pub run_id: i32,
    pub category: String,
    pub description: Option<String>,
    pub amount: f64,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::production_costs)]
pub struct NewProductionCost {
    pub run_id: i32,
    pub category: String,
    pub description: Option<String>,
    pub amount: f64,
}

/// A worker's daily completion record against a run. `settled` flips when a
/// weekly settlement covers the entry.
#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, Clone, TS)]
#[diesel(table_name = crate::schema::production_entries)]
#[ts(export)]
pub struct ProductionEntry {
    pub id: i32,
    pub run_id: i32,
    pub worker_contact_id: i32,
    #[ts(type = "string")]
    pub entry_date: NaiveDate,
    pub quantity_completed: i32,
    pub piece_rate: f64,
    pub settled: bool,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::production_entries)]
pub struct NewProductionEntry {
    pub run_id: i32,
    pub worker_contact_id: i32,
    pub entry_date: NaiveDate,
    pub quantity_completed: i32,
    pub piece_rate: f64,
    pub settled: bool,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ProductionMaterialInput {
    pub material: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ProductionRunInput {
    pub product_name: String,
    pub target_quantity: i32,
    pub cut_quantity: i32,
    #[ts(type = "string")]
    pub start_date: NaiveDate,
    #[serde(default)]
    pub materials: Vec<ProductionMaterialInput>,
}

/// Request payload for updating a run (all fields optional)
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UpdateProductionRunRequest {
    pub product_name: Option<String>,
    pub target_quantity: Option<i32>,
    pub cut_quantity: Option<i32>,
    pub status: Option<String>,
    #[ts(type = "string | null")]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ProductionCostInput {
    pub category: String,
    pub description: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub actor: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ProductionEntryInput {
    pub worker_contact_id: i32,
    #[ts(type = "string")]
    pub entry_date: NaiveDate,
    pub quantity_completed: i32,
    pub piece_rate: f64,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Run detail with children and progress, as shown on the run screen.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ProductionRunDetail {
    #[serde(flatten)]
    pub run: ProductionRun,
    pub materials: Vec<ProductionMaterial>,
    pub costs: Vec<ProductionCost>,
    pub completed_quantity: i64,
    pub remaining_quantity: i64,
}

/// Per-category cost rollup feeding the cost breakdown chart.
#[derive(Debug, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct CostBreakdown {
    pub categories: Vec<CostCategoryTotal>,
    pub total: f64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct CostCategoryTotal {
    pub category: String,
    pub amount: f64,
}
