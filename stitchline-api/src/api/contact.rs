//! API endpoints for the employee contact list.
//!
//! Contacts are soft-deleted: DELETE clears `is_active` so payroll history
//! stays intact, and the default listing hides inactive rows unless
//! `include_inactive=true` is passed.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, actor_name, api_error, db_error, not_found_or_db, validate_list_query};
use crate::list_query::{ListQuery, Page};
use crate::models::{ContactInput, EmployeeContact, UpdateContactRequest};
use crate::orm::DbConn;
use crate::orm::contact::{
    deactivate_contact, get_contact_by_id, insert_contact, list_contacts, restore_contact,
    update_contact,
};

const SORT_KEYS: &[&str] = &["name", "department", "join_date"];

/// Create Contact endpoint.
///
/// - **URL:** `/api/1/Contacts`
/// - **Method:** `POST`
/// - **Purpose:** Adds an employee to the contact list, active by default
///
/// # Request Format
///
/// ```json
/// {
///   "name": "Rahima",
///   "phone": "01711-000000",
///   "department": "sewing",
///   "salary": 15000.0,
///   "join_date": "2024-03-01"
/// }
/// ```
#[post("/1/Contacts?<actor>", data = "<new_contact>")]
pub async fn create_contact(
    db: DbConn,
    new_contact: Json<ContactInput>,
    actor: Option<String>,
) -> Result<status::Created<Json<EmployeeContact>>, ApiError> {
    db.run(move |conn| {
        insert_contact(conn, &new_contact, &actor_name(actor))
            .map(|contact| status::Created::new("/").body(Json(contact)))
            .map_err(db_error)
    })
    .await
}

/// List Contacts endpoint.
///
/// - **URL:** `/api/1/Contacts`
/// - **Method:** `GET`
/// - **Purpose:** Returns one page of contacts, active only by default
///
/// Accepts `include_inactive=true` plus the shared list options (`sort`
/// keys: `name`, `department`, `join_date`).
#[get("/1/Contacts?<include_inactive>&<query..>")]
pub async fn get_contacts(
    db: DbConn,
    include_inactive: Option<bool>,
    query: ListQuery,
) -> Result<Json<Page<EmployeeContact>>, ApiError> {
    validate_list_query(&query, SORT_KEYS)?;

    db.run(move |conn| {
        let (rows, total) = list_contacts(conn, include_inactive.unwrap_or(false), &query)
            .map_err(db_error)?;
        Ok(Json(Page::new(rows, total, &query)))
    })
    .await
}

/// Get Contact endpoint.
///
/// - **URL:** `/api/1/Contacts/<id>`
/// - **Method:** `GET`
///
/// Finds the contact whether or not it is active.
#[get("/1/Contacts/<id>")]
pub async fn get_contact(db: DbConn, id: i32) -> Result<Json<EmployeeContact>, ApiError> {
    db.run(move |conn| match get_contact_by_id(conn, id) {
        Ok(Some(contact)) => Ok(Json(contact)),
        Ok(None) => Err(api_error(Status::NotFound, "Contact not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Update Contact endpoint.
///
/// - **URL:** `/api/1/Contacts/<id>`
/// - **Method:** `PUT`
/// - **Purpose:** Partially updates a contact; omitted fields are preserved
#[put("/1/Contacts/<id>?<actor>", data = "<changes>")]
pub async fn update_contact_endpoint(
    db: DbConn,
    id: i32,
    changes: Json<UpdateContactRequest>,
    actor: Option<String>,
) -> Result<Json<EmployeeContact>, ApiError> {
    db.run(move |conn| {
        update_contact(conn, id, &changes, &actor_name(actor))
            .map(Json)
            .map_err(|e| not_found_or_db(e, "Contact not found"))
    })
    .await
}

/// Delete Contact endpoint.
///
/// - **URL:** `/api/1/Contacts/<id>`
/// - **Method:** `DELETE`
/// - **Purpose:** Soft-deletes the contact; the row remains for history
#[delete("/1/Contacts/<id>?<actor>")]
pub async fn delete_contact_endpoint(
    db: DbConn,
    id: i32,
    actor: Option<String>,
) -> Result<Status, ApiError> {
    db.run(move |conn| match deactivate_contact(conn, id, &actor_name(actor)) {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(api_error(Status::NotFound, "Contact not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Restore Contact endpoint.
///
/// - **URL:** `/api/1/Contacts/<id>/restore`
/// - **Method:** `POST`
/// - **Purpose:** Reverses a soft delete
#[post("/1/Contacts/<id>/restore?<actor>")]
pub async fn restore_contact_endpoint(
    db: DbConn,
    id: i32,
    actor: Option<String>,
) -> Result<Json<EmployeeContact>, ApiError> {
    db.run(move |conn| {
        match restore_contact(conn, id, &actor_name(actor)) {
            Ok(true) => {}
            Ok(false) => return Err(api_error(Status::NotFound, "Contact not found")),
            Err(e) => return Err(db_error(e)),
        }
        match get_contact_by_id(conn, id) {
            Ok(Some(contact)) => Ok(Json(contact)),
            Ok(None) => Err(api_error(Status::NotFound, "Contact not found")),
            Err(e) => Err(db_error(e)),
        }
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        create_contact,
        get_contacts,
        get_contact,
        update_contact_endpoint,
        delete_contact_endpoint,
        restore_contact_endpoint
    ]
}
