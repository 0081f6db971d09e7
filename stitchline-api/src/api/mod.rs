//! HTTP API surface.
//!
//! Each submodule owns one entity's endpoints and exposes a `routes()`
//! vector; [`routes`] at this level aggregates them for mounting under
//! `/api`.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::Serialize;
use ts_rs::TS;

use crate::list_query::ListQuery;

pub mod activity_log;
pub mod branch;
pub mod contact;
pub mod job_order;
pub mod marker;
pub mod production;
pub mod purchase;
pub mod settlement;
pub mod staff;
pub mod status;

/// Error response structure for API failures.
#[derive(Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) type ApiError = Custom<Json<ErrorResponse>>;

pub(crate) fn api_error(http_status: Status, msg: impl Into<String>) -> ApiError {
    Custom(http_status, Json(ErrorResponse { error: msg.into() }))
}

pub(crate) fn db_error(e: diesel::result::Error) -> ApiError {
    eprintln!("Database error: {:?}", e);
    api_error(Status::InternalServerError, "Database error")
}

/// Maps diesel's row-missing error to 404 and everything else to 500.
pub(crate) fn not_found_or_db(e: diesel::result::Error, msg: &str) -> ApiError {
    match e {
        diesel::result::Error::NotFound => api_error(Status::NotFound, msg),
        e => db_error(e),
    }
}

/// Mutations attribute their audit entries to the caller-supplied `actor`
/// query parameter, falling back to "system".
pub(crate) fn actor_name(actor: Option<String>) -> String {
    actor.unwrap_or_else(|| "system".to_string())
}

/// Validate shared list options plus the entity's sortable properties.
pub(crate) fn validate_list_query(
    query: &ListQuery,
    sort_keys: &[&str],
) -> Result<(), ApiError> {
    query
        .validate()
        .map_err(|msg| api_error(Status::BadRequest, msg))?;
    if let Some(sort) = query.sort_key() {
        if !sort_keys.contains(&sort) {
            return Err(api_error(
                Status::BadRequest,
                format!("cannot sort by '{}'", sort),
            ));
        }
    }
    Ok(())
}

/// Returns a vector of all API routes for mounting.
pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(status::routes());
    routes.extend(branch::routes());
    routes.extend(contact::routes());
    routes.extend(job_order::routes());
    routes.extend(purchase::routes());
    routes.extend(production::routes());
    routes.extend(settlement::routes());
    routes.extend(staff::routes());
    routes.extend(activity_log::routes());
    routes.extend(marker::routes());
    routes
}
