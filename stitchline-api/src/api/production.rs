//! API endpoints for production runs.
//!
//! A run is one cutting/production lot. Its `cut_quantity` is a hard
//! ceiling: worker entries that would push the completed total past it are
//! rejected with 409 Conflict, and the ceiling can never be lowered below
//! what has already been completed. Entry writes also walk the run status
//! (`planned` → `in_progress` → `completed`) inside the same transaction.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, actor_name, api_error, db_error, validate_list_query};
use crate::list_query::{ListQuery, Page};
use crate::models::{
    CostBreakdown, ProductionCost, ProductionCostInput, ProductionEntry, ProductionEntryInput,
    ProductionRun, ProductionRunDetail, ProductionRunInput, UpdateProductionRunRequest,
};
use crate::orm::DbConn;
use crate::orm::production::{
    EntryError, RUN_STATUSES, RunUpdateError, add_cost, add_production_entry, cost_breakdown,
    delete_production_run, get_entries_for_run, get_run_by_id, insert_production_run,
    list_production_runs, update_production_run,
};

const SORT_KEYS: &[&str] = &["product_name", "start_date", "status"];

fn map_entry_error(e: EntryError) -> ApiError {
    match e {
        EntryError::RunNotFound => api_error(Status::NotFound, "Production run not found"),
        EntryError::WorkerNotFound => {
            api_error(Status::BadRequest, "Worker contact does not exist")
        }
        EntryError::WorkerInactive => {
            api_error(Status::Conflict, "Worker contact has been deactivated")
        }
        EntryError::NonPositiveQuantity => {
            api_error(Status::BadRequest, "quantity_completed must be positive")
        }
        EntryError::CeilingExceeded { remaining } => api_error(
            Status::Conflict,
            format!("Entry exceeds the cut quantity; {} pieces remain", remaining),
        ),
        EntryError::Db(e) => db_error(e),
    }
}

/// Create Production Run endpoint.
///
/// - **URL:** `/api/1/ProductionRuns`
/// - **Method:** `POST`
/// - **Purpose:** Starts a run with its planned material lines
///
/// # Request Format
///
/// ```json
/// {
///   "product_name": "Cargo Pants",
///   "target_quantity": 500,
///   "cut_quantity": 520,
///   "start_date": "2026-06-01",
///   "materials": [
///     { "material": "twill", "quantity": 800.0, "unit": "yd" }
///   ]
/// }
/// ```
#[post("/1/ProductionRuns?<actor>", data = "<new_run>")]
pub async fn create_run(
    db: DbConn,
    new_run: Json<ProductionRunInput>,
    actor: Option<String>,
) -> Result<status::Created<Json<ProductionRun>>, ApiError> {
    if new_run.target_quantity <= 0 || new_run.cut_quantity <= 0 {
        return Err(api_error(
            Status::BadRequest,
            "target_quantity and cut_quantity must be positive",
        ));
    }

    db.run(move |conn| {
        insert_production_run(conn, &new_run, &actor_name(actor))
            .map(|run| status::Created::new("/").body(Json(run)))
            .map_err(db_error)
    })
    .await
}

/// List Production Runs endpoint.
///
/// - **URL:** `/api/1/ProductionRuns`
/// - **Method:** `GET`
///
/// Accepts the shared list options (`sort` keys: `product_name`,
/// `start_date`, `status`).
#[get("/1/ProductionRuns?<query..>")]
pub async fn get_runs(
    db: DbConn,
    query: ListQuery,
) -> Result<Json<Page<ProductionRun>>, ApiError> {
    validate_list_query(&query, SORT_KEYS)?;

    db.run(move |conn| {
        let (rows, total) = list_production_runs(conn, &query).map_err(db_error)?;
        Ok(Json(Page::new(rows, total, &query)))
    })
    .await
}

/// Get Production Run endpoint.
///
/// - **URL:** `/api/1/ProductionRuns/<id>`
/// - **Method:** `GET`
/// - **Purpose:** Run detail with materials, costs, and progress figures
#[get("/1/ProductionRuns/<id>")]
pub async fn get_run(db: DbConn, id: i32) -> Result<Json<ProductionRunDetail>, ApiError> {
    db.run(move |conn| match crate::orm::production::get_run_detail(conn, id) {
        Ok(Some(detail)) => Ok(Json(detail)),
        Ok(None) => Err(api_error(Status::NotFound, "Production run not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Update Production Run endpoint.
///
/// - **URL:** `/api/1/ProductionRuns/<id>`
/// - **Method:** `PUT`
///
/// # Returns
/// * `409 Conflict` if `cut_quantity` would drop below the completed total
#[put("/1/ProductionRuns/<id>?<actor>", data = "<changes>")]
pub async fn update_run(
    db: DbConn,
    id: i32,
    changes: Json<UpdateProductionRunRequest>,
    actor: Option<String>,
) -> Result<Json<ProductionRun>, ApiError> {
    if let Some(run_status) = &changes.status {
        if !RUN_STATUSES.contains(&run_status.as_str()) {
            return Err(api_error(
                Status::BadRequest,
                format!("invalid status '{}'", run_status),
            ));
        }
    }

    db.run(move |conn| {
        update_production_run(conn, id, &changes, &actor_name(actor))
            .map(Json)
            .map_err(|e| match e {
                RunUpdateError::NotFound => {
                    api_error(Status::NotFound, "Production run not found")
                }
                RunUpdateError::CeilingBelowCompleted { completed } => api_error(
                    Status::Conflict,
                    format!("cut_quantity cannot drop below the {} pieces already completed", completed),
                ),
                RunUpdateError::Db(e) => db_error(e),
            })
    })
    .await
}

/// Delete Production Run endpoint.
///
/// - **URL:** `/api/1/ProductionRuns/<id>`
/// - **Method:** `DELETE`
///
/// Materials, costs, and entries cascade with the run.
#[delete("/1/ProductionRuns/<id>?<actor>")]
pub async fn delete_run(db: DbConn, id: i32, actor: Option<String>) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_production_run(conn, id, &actor_name(actor)) {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(api_error(Status::NotFound, "Production run not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Add Production Cost endpoint.
///
/// - **URL:** `/api/1/ProductionRuns/<id>/costs`
/// - **Method:** `POST`
/// - **Purpose:** Records an expense against the run under a category
#[post("/1/ProductionRuns/<id>/costs", data = "<new_cost>")]
pub async fn add_run_cost(
    db: DbConn,
    id: i32,
    new_cost: Json<ProductionCostInput>,
) -> Result<status::Created<Json<ProductionCost>>, ApiError> {
    if new_cost.amount <= 0.0 {
        return Err(api_error(Status::BadRequest, "amount must be positive"));
    }

    db.run(move |conn| {
        let actor = actor_name(new_cost.actor.clone());
        add_cost(conn, id, &new_cost, &actor)
            .map(|cost| status::Created::new("/").body(Json(cost)))
            .map_err(|e| crate::api::not_found_or_db(e, "Production run not found"))
    })
    .await
}

/// Cost Breakdown endpoint.
///
/// - **URL:** `/api/1/ProductionRuns/<id>/costs/breakdown`
/// - **Method:** `GET`
/// - **Purpose:** Per-category cost rollup for the run
#[get("/1/ProductionRuns/<id>/costs/breakdown")]
pub async fn get_cost_breakdown(db: DbConn, id: i32) -> Result<Json<CostBreakdown>, ApiError> {
    db.run(move |conn| {
        match get_run_by_id(conn, id) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(api_error(Status::NotFound, "Production run not found")),
            Err(e) => return Err(db_error(e)),
        }
        cost_breakdown(conn, id).map(Json).map_err(db_error)
    })
    .await
}

/// List Production Entries endpoint.
///
/// - **URL:** `/api/1/ProductionRuns/<id>/entries`
/// - **Method:** `GET`
/// - **Purpose:** Every worker completion entry recorded against the run
#[get("/1/ProductionRuns/<id>/entries")]
pub async fn get_run_entries(db: DbConn, id: i32) -> Result<Json<Vec<ProductionEntry>>, ApiError> {
    db.run(move |conn| {
        match get_run_by_id(conn, id) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(api_error(Status::NotFound, "Production run not found")),
            Err(e) => return Err(db_error(e)),
        }
        get_entries_for_run(conn, id).map(Json).map_err(db_error)
    })
    .await
}

/// Add Production Entry endpoint.
///
/// - **URL:** `/api/1/ProductionRuns/<id>/entries`
/// - **Method:** `POST`
/// - **Purpose:** Records a worker's daily completion against the run
///
/// The ceiling check, insert, and status bump happen in one transaction; a
/// rejected entry writes nothing.
///
/// # Returns
/// * `201 Created` with the stored entry
/// * `409 Conflict` if the entry would exceed `cut_quantity` or the worker
///   is inactive
#[post("/1/ProductionRuns/<id>/entries", data = "<new_entry>")]
pub async fn add_run_entry(
    db: DbConn,
    id: i32,
    new_entry: Json<ProductionEntryInput>,
) -> Result<status::Created<Json<ProductionEntry>>, ApiError> {
    db.run(move |conn| {
        let actor = actor_name(new_entry.actor.clone());
        add_production_entry(conn, id, &new_entry, &actor)
            .map(|entry| status::Created::new("/").body(Json(entry)))
            .map_err(map_entry_error)
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        create_run,
        get_runs,
        get_run,
        update_run,
        delete_run,
        add_run_cost,
        get_cost_breakdown,
        get_run_entries,
        add_run_entry
    ]
}
