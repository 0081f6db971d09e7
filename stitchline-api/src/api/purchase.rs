//! API endpoints for material purchase batches.
//!
//! A purchase batch is one supplier receipt with its item lines. Line and
//! batch costs are always derived server-side from quantity and unit cost,
//! so client-supplied totals never reach storage.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, actor_name, api_error, db_error, not_found_or_db, validate_list_query};
use crate::list_query::{ListQuery, Page};
use crate::models::{
    PurchaseBatch, PurchaseBatchDetail, PurchaseBatchInput, PurchaseItemInput,
    UpdatePurchaseBatchRequest,
};
use crate::orm::DbConn;
use crate::orm::purchase::{
    delete_batch, get_batch_detail, insert_purchase_batch, list_purchase_batches, replace_items,
    update_batch_header,
};

const SORT_KEYS: &[&str] = &["supplier", "purchase_date", "total_cost"];

fn check_items(items: &[PurchaseItemInput]) -> Result<(), ApiError> {
    for item in items {
        if item.quantity <= 0.0 || item.unit_cost < 0.0 {
            return Err(api_error(
                Status::BadRequest,
                format!("item '{}' has a non-positive quantity or negative cost", item.material),
            ));
        }
    }
    Ok(())
}

/// Create Purchase Batch endpoint.
///
/// - **URL:** `/api/1/Purchases`
/// - **Method:** `POST`
/// - **Purpose:** Records a supplier purchase with its item lines
///
/// # Request Format
///
/// ```json
/// {
///   "supplier": "Narayanganj Textiles",
///   "purchase_date": "2026-07-14",
///   "notes": "monsoon stock",
///   "items": [
///     { "material": "denim 12oz", "quantity": 300.0, "unit": "yd", "unit_cost": 4.5 }
///   ]
/// }
/// ```
#[post("/1/Purchases?<actor>", data = "<new_batch>")]
pub async fn create_purchase(
    db: DbConn,
    new_batch: Json<PurchaseBatchInput>,
    actor: Option<String>,
) -> Result<status::Created<Json<PurchaseBatchDetail>>, ApiError> {
    check_items(&new_batch.items)?;

    db.run(move |conn| {
        let batch = insert_purchase_batch(conn, &new_batch, &actor_name(actor)).map_err(db_error)?;
        match get_batch_detail(conn, batch.id) {
            Ok(Some(detail)) => Ok(status::Created::new("/").body(Json(detail))),
            Ok(None) => Err(api_error(Status::InternalServerError, "Batch vanished after insert")),
            Err(e) => Err(db_error(e)),
        }
    })
    .await
}

/// List Purchase Batches endpoint.
///
/// - **URL:** `/api/1/Purchases`
/// - **Method:** `GET`
///
/// Accepts the shared list options (`sort` keys: `supplier`,
/// `purchase_date`, `total_cost`).
#[get("/1/Purchases?<query..>")]
pub async fn get_purchases(
    db: DbConn,
    query: ListQuery,
) -> Result<Json<Page<PurchaseBatch>>, ApiError> {
    validate_list_query(&query, SORT_KEYS)?;

    db.run(move |conn| {
        let (rows, total) = list_purchase_batches(conn, &query).map_err(db_error)?;
        Ok(Json(Page::new(rows, total, &query)))
    })
    .await
}

/// Get Purchase Batch endpoint.
///
/// - **URL:** `/api/1/Purchases/<id>`
/// - **Method:** `GET`
#[get("/1/Purchases/<id>")]
pub async fn get_purchase(db: DbConn, id: i32) -> Result<Json<PurchaseBatchDetail>, ApiError> {
    db.run(move |conn| match get_batch_detail(conn, id) {
        Ok(Some(detail)) => Ok(Json(detail)),
        Ok(None) => Err(api_error(Status::NotFound, "Purchase batch not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Update Purchase Batch endpoint.
///
/// - **URL:** `/api/1/Purchases/<id>`
/// - **Method:** `PUT`
/// - **Purpose:** Updates the batch header; item lines and totals stay put
#[put("/1/Purchases/<id>?<actor>", data = "<changes>")]
pub async fn update_purchase(
    db: DbConn,
    id: i32,
    changes: Json<UpdatePurchaseBatchRequest>,
    actor: Option<String>,
) -> Result<Json<PurchaseBatch>, ApiError> {
    db.run(move |conn| {
        update_batch_header(conn, id, &changes, &actor_name(actor))
            .map(Json)
            .map_err(|e| not_found_or_db(e, "Purchase batch not found"))
    })
    .await
}

/// Replace Purchase Items endpoint.
///
/// - **URL:** `/api/1/Purchases/<id>/items`
/// - **Method:** `PUT`
/// - **Purpose:** Replaces the batch's item lines wholesale and recomputes
///   its total cost
#[put("/1/Purchases/<id>/items?<actor>", data = "<items>")]
pub async fn replace_purchase_items(
    db: DbConn,
    id: i32,
    items: Json<Vec<PurchaseItemInput>>,
    actor: Option<String>,
) -> Result<Json<PurchaseBatchDetail>, ApiError> {
    check_items(&items)?;

    db.run(move |conn| {
        replace_items(conn, id, &items, &actor_name(actor))
            .map(Json)
            .map_err(|e| not_found_or_db(e, "Purchase batch not found"))
    })
    .await
}

/// Delete Purchase Batch endpoint.
///
/// - **URL:** `/api/1/Purchases/<id>`
/// - **Method:** `DELETE`
///
/// Item lines cascade with the batch.
#[delete("/1/Purchases/<id>?<actor>")]
pub async fn delete_purchase(
    db: DbConn,
    id: i32,
    actor: Option<String>,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_batch(conn, id, &actor_name(actor)) {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(api_error(Status::NotFound, "Purchase batch not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        create_purchase,
        get_purchases,
        get_purchase,
        update_purchase,
        replace_purchase_items,
        delete_purchase
    ]
}
