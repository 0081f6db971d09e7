//! API endpoints for managing company branches.
//!
//! Branches are the physical buildings of the business: the main office,
//! retail outlets, and manufacturing units. At most one branch may be
//! flagged as the main building; writes that would violate that rule are
//! rejected with 409 Conflict.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, actor_name, api_error, db_error, validate_list_query};
use crate::list_query::{ListQuery, Page};
use crate::models::{BranchInput, BranchView, UpdateBranchRequest};
use crate::orm::DbConn;
use crate::orm::branch::{
    BranchWriteError, delete_branch, get_branch_by_id, get_branch_by_name, insert_branch,
    list_branches, update_branch,
};

const SORT_KEYS: &[&str] = &["name", "rent"];

fn map_write_error(e: BranchWriteError) -> ApiError {
    match e {
        BranchWriteError::MainBranchExists => {
            api_error(Status::Conflict, "A main branch already exists")
        }
        BranchWriteError::NotFound => api_error(Status::NotFound, "Branch not found"),
        BranchWriteError::Db(e) => db_error(e),
    }
}

/// Create Branch endpoint.
///
/// - **URL:** `/api/1/Branches`
/// - **Method:** `POST`
/// - **Purpose:** Creates a new branch
///
/// # Request Format
///
/// ```json
/// {
///   "name": "Mirpur Unit",
///   "owner": "Karim",
///   "rent": 45000.0,
///   "size_sqft": 1800.0,
///   "is_main": false,
///   "is_outlet": false,
///   "is_manufacturing": true,
///   "facilities": ["cutting table", "generator"]
/// }
/// ```
///
/// # Returns
/// * `201 Created` with the stored branch
/// * `409 Conflict` if the name is taken or a second main branch is flagged
#[post("/1/Branches?<actor>", data = "<new_branch>")]
pub async fn create_branch(
    db: DbConn,
    new_branch: Json<BranchInput>,
    actor: Option<String>,
) -> Result<status::Created<Json<BranchView>>, ApiError> {
    db.run(move |conn| {
        match get_branch_by_name(conn, &new_branch.name) {
            Ok(Some(_)) => {
                return Err(api_error(
                    Status::Conflict,
                    format!("Branch with name '{}' already exists", new_branch.name),
                ));
            }
            Ok(None) => {}
            Err(e) => return Err(db_error(e)),
        }

        insert_branch(conn, &new_branch, &actor_name(actor))
            .map(|branch| status::Created::new("/").body(Json(branch.into_view())))
            .map_err(map_write_error)
    })
    .await
}

/// List Branches endpoint.
///
/// - **URL:** `/api/1/Branches`
/// - **Method:** `GET`
/// - **Purpose:** Returns one page of branches
///
/// Accepts the shared list options `page`, `per_page`, `sort` (`name`,
/// `rent`), and `dir`.
#[get("/1/Branches?<query..>")]
pub async fn get_branches(
    db: DbConn,
    query: ListQuery,
) -> Result<Json<Page<BranchView>>, ApiError> {
    validate_list_query(&query, SORT_KEYS)?;

    db.run(move |conn| {
        let (rows, total) = list_branches(conn, &query).map_err(db_error)?;
        let items = rows.into_iter().map(|b| b.into_view()).collect();
        Ok(Json(Page::new(items, total, &query)))
    })
    .await
}

/// Get Branch endpoint.
///
/// - **URL:** `/api/1/Branches/<id>`
/// - **Method:** `GET`
#[get("/1/Branches/<id>")]
pub async fn get_branch(db: DbConn, id: i32) -> Result<Json<BranchView>, ApiError> {
    db.run(move |conn| match get_branch_by_id(conn, id) {
        Ok(Some(branch)) => Ok(Json(branch.into_view())),
        Ok(None) => Err(api_error(Status::NotFound, "Branch not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Update Branch endpoint.
///
/// - **URL:** `/api/1/Branches/<id>`
/// - **Method:** `PUT`
/// - **Purpose:** Partially updates a branch; omitted fields are preserved
#[put("/1/Branches/<id>?<actor>", data = "<changes>")]
pub async fn update_branch_endpoint(
    db: DbConn,
    id: i32,
    changes: Json<UpdateBranchRequest>,
    actor: Option<String>,
) -> Result<Json<BranchView>, ApiError> {
    db.run(move |conn| {
        update_branch(conn, id, &changes, &actor_name(actor))
            .map(|branch| Json(branch.into_view()))
            .map_err(map_write_error)
    })
    .await
}

/// Delete Branch endpoint.
///
/// - **URL:** `/api/1/Branches/<id>`
/// - **Method:** `DELETE`
#[delete("/1/Branches/<id>?<actor>")]
pub async fn delete_branch_endpoint(
    db: DbConn,
    id: i32,
    actor: Option<String>,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_branch(conn, id, &actor_name(actor)) {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(api_error(Status::NotFound, "Branch not found")),
        Err(e) => Err(db_error(e)),
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        create_branch,
        get_branches,
        get_branch,
        update_branch_endpoint,
        delete_branch_endpoint
    ]
}
