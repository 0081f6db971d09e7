//! API endpoints for the activity log.
//!
//! The log is append-only and written by the ORM layer inside each
//! mutation's transaction; these endpoints only read it.

use rocket::Route;
use rocket::serde::json::Json;

use crate::api::{ApiError, db_error, validate_list_query};
use crate::list_query::{ListQuery, Page};
use crate::models::ActivityLog;
use crate::orm::DbConn;
use crate::orm::activity_log::{ActivityFilter, get_entity_history, list_activity};

const SORT_KEYS: &[&str] = &["actor", "timestamp"];

/// List Activity endpoint.
///
/// - **URL:** `/api/1/Activity`
/// - **Method:** `GET`
/// - **Purpose:** Pages through the audit trail, newest first by default
///
/// Accepts `entity_type`, `actor`, and `action` filters plus the shared
/// list options.
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// {
///   "items": [
///     {
///       "id": 12,
///       "actor": "accounts",
///       "action": "update",
///       "entity_type": "job_orders",
///       "entity_id": 4,
///       "before": "{...}",
///       "after": "{...}",
///       "timestamp": "2026-08-20T10:15:00"
///     }
///   ],
///   "total": 12,
///   "page": 1,
///   "per_page": 25,
///   "total_pages": 1
/// }
/// ```
#[get("/1/Activity?<entity_type>&<actor>&<action>&<query..>")]
pub async fn get_activity(
    db: DbConn,
    entity_type: Option<String>,
    actor: Option<String>,
    action: Option<String>,
    query: ListQuery,
) -> Result<Json<Page<ActivityLog>>, ApiError> {
    validate_list_query(&query, SORT_KEYS)?;

    let filter = ActivityFilter { entity_type, actor, action };

    db.run(move |conn| {
        let (rows, total) = list_activity(conn, &filter, &query).map_err(db_error)?;
        Ok(Json(Page::new(rows, total, &query)))
    })
    .await
}

/// Entity History endpoint.
///
/// - **URL:** `/api/1/Activity/<entity_type>/<entity_id>`
/// - **Method:** `GET`
/// - **Purpose:** Full audit history for one entity, oldest first
#[get("/1/Activity/<entity_type>/<entity_id>")]
pub async fn get_history(
    db: DbConn,
    entity_type: String,
    entity_id: i32,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    db.run(move |conn| {
        get_entity_history(conn, &entity_type, entity_id)
            .map(Json)
            .map_err(db_error)
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![get_activity, get_history]
}
