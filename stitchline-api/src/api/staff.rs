//! API endpoints for staff payroll: salary entries, absences, and the
//! monthly summary.
//!
//! Salary entries and absences always belong to an existing contact;
//! writes against an unknown contact come back 404 without touching
//! storage.

use chrono::NaiveDate;
use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, actor_name, api_error, db_error};
use crate::models::{
    AbsenceInput, SalaryEntryInput, StaffAbsence, StaffMonthlySummary, StaffSalaryEntry,
};
use crate::orm::DbConn;
use crate::orm::staff::{
    StaffError, delete_absence, delete_salary_entry, insert_absence, insert_salary_entry,
    list_absences, list_salary_entries, monthly_summary,
};

fn map_staff_error(e: StaffError) -> ApiError {
    match e {
        StaffError::ContactNotFound => api_error(Status::NotFound, "Contact not found"),
        StaffError::InvalidRange => api_error(Status::BadRequest, "Invalid date range"),
        StaffError::NotFound => api_error(Status::NotFound, "Record not found"),
        StaffError::Db(e) => db_error(e),
    }
}

/// `YYYY-MM-DD` query parameter, if present.
fn parse_date(value: Option<String>, name: &str) -> Result<Option<NaiveDate>, ApiError> {
    match value {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| api_error(Status::BadRequest, format!("{} must be YYYY-MM-DD", name))),
    }
}

/// Create Salary Entry endpoint.
///
/// - **URL:** `/api/1/Staff/SalaryEntries`
/// - **Method:** `POST`
/// - **Purpose:** Records a salary payment, advance, or bonus for a contact
///
/// # Request Format
///
/// ```json
/// {
///   "contact_id": 3,
///   "entry_date": "2026-04-10",
///   "amount": 12000.0,
///   "category": "salary"
/// }
/// ```
#[post("/1/Staff/SalaryEntries?<actor>", data = "<new_entry>")]
pub async fn create_salary_entry(
    db: DbConn,
    new_entry: Json<SalaryEntryInput>,
    actor: Option<String>,
) -> Result<status::Created<Json<StaffSalaryEntry>>, ApiError> {
    if new_entry.amount <= 0.0 {
        return Err(api_error(Status::BadRequest, "amount must be positive"));
    }

    db.run(move |conn| {
        insert_salary_entry(conn, &new_entry, &actor_name(actor))
            .map(|entry| status::Created::new("/").body(Json(entry)))
            .map_err(map_staff_error)
    })
    .await
}

/// List Salary Entries endpoint.
///
/// - **URL:** `/api/1/Staff/<contact_id>/SalaryEntries`
/// - **Method:** `GET`
/// - **Purpose:** A contact's salary entries, newest first, optionally
///   bounded by `from`/`to` dates
#[get("/1/Staff/<contact_id>/SalaryEntries?<from>&<to>")]
pub async fn get_salary_entries(
    db: DbConn,
    contact_id: i32,
    from: Option<String>,
    to: Option<String>,
) -> Result<Json<Vec<StaffSalaryEntry>>, ApiError> {
    let from = parse_date(from, "from")?;
    let to = parse_date(to, "to")?;

    db.run(move |conn| {
        match crate::orm::contact::get_contact_by_id(conn, contact_id) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(api_error(Status::NotFound, "Contact not found")),
            Err(e) => return Err(db_error(e)),
        }
        list_salary_entries(conn, contact_id, from, to)
            .map(Json)
            .map_err(db_error)
    })
    .await
}

/// Delete Salary Entry endpoint.
///
/// - **URL:** `/api/1/Staff/SalaryEntries/<id>`
/// - **Method:** `DELETE`
#[delete("/1/Staff/SalaryEntries/<id>?<actor>")]
pub async fn delete_salary_entry_endpoint(
    db: DbConn,
    id: i32,
    actor: Option<String>,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_salary_entry(conn, id, &actor_name(actor)) {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(api_error(Status::NotFound, "Salary entry not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Create Absence endpoint.
///
/// - **URL:** `/api/1/Staff/Absences`
/// - **Method:** `POST`
/// - **Purpose:** Records a leave span for a contact
#[post("/1/Staff/Absences?<actor>", data = "<new_absence>")]
pub async fn create_absence(
    db: DbConn,
    new_absence: Json<AbsenceInput>,
    actor: Option<String>,
) -> Result<status::Created<Json<StaffAbsence>>, ApiError> {
    db.run(move |conn| {
        insert_absence(conn, &new_absence, &actor_name(actor))
            .map(|absence| status::Created::new("/").body(Json(absence)))
            .map_err(map_staff_error)
    })
    .await
}

/// List Absences endpoint.
///
/// - **URL:** `/api/1/Staff/<contact_id>/Absences`
/// - **Method:** `GET`
#[get("/1/Staff/<contact_id>/Absences")]
pub async fn get_absences(
    db: DbConn,
    contact_id: i32,
) -> Result<Json<Vec<StaffAbsence>>, ApiError> {
    db.run(move |conn| {
        match crate::orm::contact::get_contact_by_id(conn, contact_id) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(api_error(Status::NotFound, "Contact not found")),
            Err(e) => return Err(db_error(e)),
        }
        list_absences(conn, contact_id).map(Json).map_err(db_error)
    })
    .await
}

/// Delete Absence endpoint.
///
/// - **URL:** `/api/1/Staff/Absences/<id>`
/// - **Method:** `DELETE`
#[delete("/1/Staff/Absences/<id>?<actor>")]
pub async fn delete_absence_endpoint(
    db: DbConn,
    id: i32,
    actor: Option<String>,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_absence(conn, id, &actor_name(actor)) {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(api_error(Status::NotFound, "Absence not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Monthly Summary endpoint.
///
/// - **URL:** `/api/1/Staff/<contact_id>/summary?year=2026&month=4`
/// - **Method:** `GET`
/// - **Purpose:** One month of the contact's payroll calendar
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// {
///   "contact_id": 3,
///   "year": 2026,
///   "month": 4,
///   "salary_total": 15000.0,
///   "salary_entry_count": 2,
///   "salary_daily_average": 500.0,
///   "absence_days": 5
/// }
/// ```
///
/// Absence spans crossing a month boundary only count the days inside the
/// requested month.
#[get("/1/Staff/<contact_id>/summary?<year>&<month>")]
pub async fn get_monthly_summary(
    db: DbConn,
    contact_id: i32,
    year: i32,
    month: u32,
) -> Result<Json<StaffMonthlySummary>, ApiError> {
    db.run(move |conn| {
        monthly_summary(conn, contact_id, year, month)
            .map(Json)
            .map_err(map_staff_error)
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        create_salary_entry,
        get_salary_entries,
        delete_salary_entry_endpoint,
        create_absence,
        get_absences,
        delete_absence_endpoint,
        get_monthly_summary
    ]
}
