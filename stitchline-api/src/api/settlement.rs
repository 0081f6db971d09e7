//! API endpoints for weekly worker settlements.
//!
//! A settlement pays out one worker's unsettled production entries for a
//! week. Settlements are append-only: there is no update or delete, and
//! the covered entries are marked settled in the same transaction that
//! writes the settlement row, so an entry can never be paid twice.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, actor_name, api_error, db_error, validate_list_query};
use crate::list_query::{ListQuery, Page};
use crate::models::{Settlement, SettlementInput, SettlementPreview};
use crate::orm::DbConn;
use crate::orm::settlement::{
    SettlementError, create_settlement, get_settlement_by_id, list_settlements, preview_settlement,
};

const SORT_KEYS: &[&str] = &["week_start", "net_pay"];

fn map_settlement_error(e: SettlementError) -> ApiError {
    match e {
        SettlementError::ContactNotFound => {
            api_error(Status::NotFound, "Worker contact not found")
        }
        SettlementError::InvalidWeek => {
            api_error(Status::BadRequest, "week_end must not precede week_start")
        }
        SettlementError::NoUnsettledEntries => api_error(
            Status::Conflict,
            "No unsettled entries fall in the given week",
        ),
        SettlementError::DeductionsExceedGross { gross_pay } => api_error(
            Status::Conflict,
            format!("Deductions exceed the gross pay of {}", gross_pay),
        ),
        SettlementError::Db(e) => db_error(e),
    }
}

/// Preview Settlement endpoint.
///
/// - **URL:** `/api/1/Settlements/preview`
/// - **Method:** `POST`
/// - **Purpose:** Computes the pay figures for a week without writing
///
/// # Request Format
///
/// ```json
/// {
///   "worker_contact_id": 3,
///   "week_start": "2026-06-08",
///   "week_end": "2026-06-14",
///   "deductions": 50.0
/// }
/// ```
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// {
///   "worker_contact_id": 3,
///   "week_start": "2026-06-08",
///   "week_end": "2026-06-14",
///   "gross_pay": 260.0,
///   "deductions": 50.0,
///   "net_pay": 210.0,
///   "entry_count": 2
/// }
/// ```
#[post("/1/Settlements/preview", data = "<input>")]
pub async fn preview_settlement_endpoint(
    db: DbConn,
    input: Json<SettlementInput>,
) -> Result<Json<SettlementPreview>, ApiError> {
    db.run(move |conn| {
        preview_settlement(conn, &input)
            .map(Json)
            .map_err(map_settlement_error)
    })
    .await
}

/// Create Settlement endpoint.
///
/// - **URL:** `/api/1/Settlements`
/// - **Method:** `POST`
/// - **Purpose:** Pays out the worker's unsettled entries for the week
///
/// # Returns
/// * `201 Created` with the settlement row
/// * `409 Conflict` if the week has no unsettled entries or deductions
///   exceed the gross pay
#[post("/1/Settlements", data = "<input>")]
pub async fn create_settlement_endpoint(
    db: DbConn,
    input: Json<SettlementInput>,
) -> Result<status::Created<Json<Settlement>>, ApiError> {
    db.run(move |conn| {
        let actor = actor_name(input.actor.clone());
        create_settlement(conn, &input, &actor)
            .map(|settlement| status::Created::new("/").body(Json(settlement)))
            .map_err(map_settlement_error)
    })
    .await
}

/// List Settlements endpoint.
///
/// - **URL:** `/api/1/Settlements`
/// - **Method:** `GET`
///
/// Accepts an optional `worker` contact id filter plus the shared list
/// options (`sort` keys: `week_start`, `net_pay`).
#[get("/1/Settlements?<worker>&<query..>")]
pub async fn get_settlements(
    db: DbConn,
    worker: Option<i32>,
    query: ListQuery,
) -> Result<Json<Page<Settlement>>, ApiError> {
    validate_list_query(&query, SORT_KEYS)?;

    db.run(move |conn| {
        let (rows, total) = list_settlements(conn, worker, &query).map_err(db_error)?;
        Ok(Json(Page::new(rows, total, &query)))
    })
    .await
}

/// Get Settlement endpoint.
///
/// - **URL:** `/api/1/Settlements/<id>`
/// - **Method:** `GET`
#[get("/1/Settlements/<id>")]
pub async fn get_settlement(db: DbConn, id: i32) -> Result<Json<Settlement>, ApiError> {
    db.run(move |conn| match get_settlement_by_id(conn, id) {
        Ok(Some(settlement)) => Ok(Json(settlement)),
        Ok(None) => Err(api_error(Status::NotFound, "Settlement not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        preview_settlement_endpoint,
        create_settlement_endpoint,
        get_settlements,
        get_settlement
    ]
}
