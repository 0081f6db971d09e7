//! API endpoint for the cutting-marker planner.

use rocket::Route;
use rocket::http::Status;
use rocket::serde::json::Json;

use crate::api::{ApiError, api_error};
use crate::marker::{MarkerError, MarkerLayout, MarkerRequest, plan_marker};

/// Plan Marker endpoint.
///
/// - **URL:** `/api/1/Marker/plan`
/// - **Method:** `POST`
/// - **Purpose:** Lays pattern pieces onto a sheet of the given width and
///   reports the consumed length and efficiency
///
/// Pure computation; nothing is stored. `sheet_length` is optional; when
/// given, a layout that runs past it is rejected.
///
/// # Request Format
///
/// ```json
/// {
///   "sheet_width": 60.0,
///   "sheet_length": 200.0,
///   "pieces": [
///     { "label": "front panel", "width": 25.0, "length": 30.0, "count": 4 },
///     { "label": "pocket", "width": 8.0, "length": 9.0, "count": 8 }
///   ]
/// }
/// ```
///
/// # Returns
/// * `200 OK` with the layout
/// * `400 Bad Request` for a non-positive sheet dimension, an empty piece
///   list, a malformed piece, a piece wider than the sheet, or a layout
///   longer than the sheet
#[post("/1/Marker/plan", data = "<request>")]
pub async fn plan_marker_endpoint(
    request: Json<MarkerRequest>,
) -> Result<Json<MarkerLayout>, ApiError> {
    plan_marker(request.sheet_width, request.sheet_length, &request.pieces)
        .map(Json)
        .map_err(|e: MarkerError| api_error(Status::BadRequest, e.to_string()))
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![plan_marker_endpoint]
}
