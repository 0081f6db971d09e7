//! API endpoints for external job orders.
//!
//! Job orders are contracts taken from other companies. The server derives
//! `total_amount` from pieces and rate, walks the payment status as
//! payments come in, and aggregates every order into the dashboard stats.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, actor_name, api_error, db_error, not_found_or_db, validate_list_query};
use crate::list_query::{ListQuery, Page};
use crate::models::{
    JobOrder, JobOrderDetail, JobOrderInput, JobOrderPaymentInput, JobOrderStats,
    UpdateJobOrderRequest,
};
use crate::orm::DbConn;
use crate::orm::job_order::{
    JOB_STATUSES, PaymentError, delete_job_order, get_job_order_detail, get_job_order_stats,
    insert_job_order, list_job_orders, record_payment, update_job_order,
};

const SORT_KEYS: &[&str] = &["company_name", "order_date", "total_amount"];

/// Create Job Order endpoint.
///
/// - **URL:** `/api/1/JobOrders`
/// - **Method:** `POST`
/// - **Purpose:** Creates a job order with its operation rate lines
///
/// `total_amount` is computed server-side as `total_pieces *
/// rate_per_piece`; any amount in the payload is ignored. New orders start
/// with payment status `pending` and job status `planned`.
///
/// # Request Format
///
/// ```json
/// {
///   "company_name": "Dhaka Denim",
///   "order_date": "2026-05-04",
///   "total_pieces": 500,
///   "rate_per_piece": 12.0,
///   "operations": [
///     { "category": "stitching", "operation_name": "side seam", "rate": 2.5, "pieces": 500 }
///   ]
/// }
/// ```
#[post("/1/JobOrders?<actor>", data = "<new_order>")]
pub async fn create_job_order(
    db: DbConn,
    new_order: Json<JobOrderInput>,
    actor: Option<String>,
) -> Result<status::Created<Json<JobOrder>>, ApiError> {
    if new_order.total_pieces <= 0 || new_order.rate_per_piece < 0.0 {
        return Err(api_error(
            Status::BadRequest,
            "total_pieces must be positive and rate_per_piece non-negative",
        ));
    }

    db.run(move |conn| {
        insert_job_order(conn, &new_order, &actor_name(actor))
            .map(|order| status::Created::new("/").body(Json(order)))
            .map_err(db_error)
    })
    .await
}

/// List Job Orders endpoint.
///
/// - **URL:** `/api/1/JobOrders`
/// - **Method:** `GET`
///
/// Accepts the shared list options (`sort` keys: `company_name`,
/// `order_date`, `total_amount`).
#[get("/1/JobOrders?<query..>")]
pub async fn get_job_orders(
    db: DbConn,
    query: ListQuery,
) -> Result<Json<Page<JobOrder>>, ApiError> {
    validate_list_query(&query, SORT_KEYS)?;

    db.run(move |conn| {
        let (rows, total) = list_job_orders(conn, &query).map_err(db_error)?;
        Ok(Json(Page::new(rows, total, &query)))
    })
    .await
}

/// Job Order Stats endpoint.
///
/// - **URL:** `/api/1/JobOrders/stats`
/// - **Method:** `GET`
/// - **Purpose:** Dashboard rollup over every order
///
/// Returns totals, payment/job status counts, the completion percentage,
/// and a `YYYY-MM` monthly series. `pending_amount` always equals
/// `total_amount - paid_amount`.
#[get("/1/JobOrders/stats")]
pub async fn job_order_stats(db: DbConn) -> Result<Json<JobOrderStats>, ApiError> {
    db.run(|conn| get_job_order_stats(conn).map(Json).map_err(db_error))
        .await
}

/// Get Job Order endpoint.
///
/// - **URL:** `/api/1/JobOrders/<id>`
/// - **Method:** `GET`
/// - **Purpose:** Order detail with operation lines, their summed cost, and
///   the outstanding amount
#[get("/1/JobOrders/<id>")]
pub async fn get_job_order(db: DbConn, id: i32) -> Result<Json<JobOrderDetail>, ApiError> {
    db.run(move |conn| match get_job_order_detail(conn, id) {
        Ok(Some(detail)) => Ok(Json(detail)),
        Ok(None) => Err(api_error(Status::NotFound, "Job order not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Update Job Order endpoint.
///
/// - **URL:** `/api/1/JobOrders/<id>`
/// - **Method:** `PUT`
///
/// Changing pieces or rate recomputes `total_amount` and re-derives the
/// payment status against what has already been paid.
#[put("/1/JobOrders/<id>?<actor>", data = "<changes>")]
pub async fn update_job_order_endpoint(
    db: DbConn,
    id: i32,
    changes: Json<UpdateJobOrderRequest>,
    actor: Option<String>,
) -> Result<Json<JobOrder>, ApiError> {
    if let Some(job_status) = &changes.job_status {
        if !JOB_STATUSES.contains(&job_status.as_str()) {
            return Err(api_error(
                Status::BadRequest,
                format!("invalid job_status '{}'", job_status),
            ));
        }
    }

    db.run(move |conn| {
        update_job_order(conn, id, &changes, &actor_name(actor))
            .map(Json)
            .map_err(|e| not_found_or_db(e, "Job order not found"))
    })
    .await
}

/// Record Payment endpoint.
///
/// - **URL:** `/api/1/JobOrders/<id>/payments`
/// - **Method:** `POST`
/// - **Purpose:** Adds a payment against the order
///
/// # Returns
/// * `200 OK` with the updated order
/// * `400 Bad Request` for a non-positive amount
/// * `409 Conflict` if the payment would exceed the outstanding amount
#[post("/1/JobOrders/<id>/payments", data = "<payment>")]
pub async fn record_payment_endpoint(
    db: DbConn,
    id: i32,
    payment: Json<JobOrderPaymentInput>,
) -> Result<Json<JobOrder>, ApiError> {
    db.run(move |conn| {
        let actor = actor_name(payment.actor.clone());
        record_payment(conn, id, payment.amount, &actor)
            .map(Json)
            .map_err(|e| match e {
                PaymentError::NotFound => api_error(Status::NotFound, "Job order not found"),
                PaymentError::NonPositiveAmount => {
                    api_error(Status::BadRequest, "Payment amount must be positive")
                }
                PaymentError::Overpayment { pending } => api_error(
                    Status::Conflict,
                    format!("Payment exceeds the outstanding amount ({})", pending),
                ),
                PaymentError::Db(e) => db_error(e),
            })
    })
    .await
}

/// Delete Job Order endpoint.
///
/// - **URL:** `/api/1/JobOrders/<id>`
/// - **Method:** `DELETE`
///
/// Operation lines cascade with the order.
#[delete("/1/JobOrders/<id>?<actor>")]
pub async fn delete_job_order_endpoint(
    db: DbConn,
    id: i32,
    actor: Option<String>,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_job_order(conn, id, &actor_name(actor)) {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(api_error(Status::NotFound, "Job order not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        create_job_order,
        get_job_orders,
        job_order_stats,
        get_job_order,
        update_job_order_endpoint,
        record_payment_endpoint,
        delete_job_order_endpoint
    ]
}
