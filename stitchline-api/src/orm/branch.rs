use diesel::prelude::*;

use crate::list_query::{ListQuery, OrderDirection};
use crate::models::{Branch, BranchInput, NewBranch, UpdateBranchRequest};
use crate::orm::activity_log::log_activity;
use crate::orm::snapshot;

/// Failure modes for branch writes.
#[derive(Debug)]
pub enum BranchWriteError {
    /// The write would leave two branches flagged `is_main`.
    MainBranchExists,
    NotFound,
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for BranchWriteError {
    fn from(e: diesel::result::Error) -> Self {
        BranchWriteError::Db(e)
    }
}

fn facilities_json(facilities: &[String]) -> String {
    serde_json::to_string(facilities).unwrap_or_else(|_| "[]".to_string())
}

/// True if a main branch other than `exclude_id` already exists.
fn main_branch_exists(
    conn: &mut SqliteConnection,
    exclude_id: Option<i32>,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::branches::dsl::*;

    let mut query = branches.filter(is_main.eq(true)).into_boxed();
    if let Some(eid) = exclude_id {
        query = query.filter(id.ne(eid));
    }
    let count: i64 = query.count().get_result(conn)?;
    Ok(count > 0)
}

/// Insert a new branch. The one-main-building rule is checked inside the
/// same transaction as the insert, so a conflicting create writes nothing.
pub fn insert_branch(
    conn: &mut SqliteConnection,
    input: &BranchInput,
    actor: &str,
) -> Result<Branch, BranchWriteError> {
    conn.transaction::<Branch, BranchWriteError, _>(|conn| {
        use crate::schema::branches::dsl::*;

        if input.is_main && main_branch_exists(conn, None)? {
            return Err(BranchWriteError::MainBranchExists);
        }

        let new_branch = NewBranch {
            name: input.name.clone(),
            owner: input.owner.clone(),
            rent: input.rent,
            size_sqft: input.size_sqft,
            is_main: input.is_main,
            is_outlet: input.is_outlet,
            is_manufacturing: input.is_manufacturing,
            facilities: facilities_json(&input.facilities),
        };

        diesel::insert_into(branches)
            .values(&new_branch)
            .execute(conn)?;

        let new_id = crate::orm::last_insert_rowid(conn)?;
        let branch = branches.filter(id.eq(new_id)).first::<Branch>(conn)?;

        log_activity(conn, actor, "create", "branches", branch.id, None, snapshot(&branch))?;

        Ok(branch)
    })
}

/// Try to find a branch by id.
pub fn get_branch_by_id(
    conn: &mut SqliteConnection,
    branch_id: i32,
) -> Result<Option<Branch>, diesel::result::Error> {
    use crate::schema::branches::dsl::*;
    branches.filter(id.eq(branch_id)).first::<Branch>(conn).optional()
}

/// Try to find a branch by name (exact match).
pub fn get_branch_by_name(
    conn: &mut SqliteConnection,
    branch_name: &str,
) -> Result<Option<Branch>, diesel::result::Error> {
    use crate::schema::branches::dsl::*;
    branches.filter(name.eq(branch_name)).first::<Branch>(conn).optional()
}

/// One page of branches plus the unpaged total.
pub fn list_branches(
    conn: &mut SqliteConnection,
    query: &ListQuery,
) -> Result<(Vec<Branch>, i64), diesel::result::Error> {
    use crate::schema::branches::dsl::*;

    let total: i64 = branches.count().get_result(conn)?;

    let mut rows_query = branches.into_boxed();
    rows_query = match (query.sort_key(), query.direction()) {
        (Some("name"), OrderDirection::Asc) => rows_query.order(name.asc()),
        (Some("name"), OrderDirection::Desc) => rows_query.order(name.desc()),
        (Some("rent"), OrderDirection::Asc) => rows_query.order(rent.asc()),
        (Some("rent"), OrderDirection::Desc) => rows_query.order(rent.desc()),
        (_, OrderDirection::Desc) => rows_query.order(id.desc()),
        _ => rows_query.order(id.asc()),
    };

    let rows = rows_query
        .limit(query.per_page())
        .offset(query.offset())
        .load::<Branch>(conn)?;

    Ok((rows, total))
}

/// Update a branch, preserving unspecified fields. Enforces the
/// one-main-building rule against every other branch.
pub fn update_branch(
    conn: &mut SqliteConnection,
    branch_id: i32,
    changes: &UpdateBranchRequest,
    actor: &str,
) -> Result<Branch, BranchWriteError> {
    conn.transaction::<Branch, BranchWriteError, _>(|conn| {
        use crate::schema::branches::dsl::*;

        let current = branches
            .filter(id.eq(branch_id))
            .first::<Branch>(conn)
            .optional()?
            .ok_or(BranchWriteError::NotFound)?;

        let becomes_main = changes.is_main.unwrap_or(current.is_main);
        if becomes_main && main_branch_exists(conn, Some(branch_id))? {
            return Err(BranchWriteError::MainBranchExists);
        }

        let before = snapshot(&current);

        diesel::update(branches.filter(id.eq(branch_id)))
            .set((
                name.eq(changes.name.clone().unwrap_or(current.name)),
                owner.eq(changes.owner.clone().unwrap_or(current.owner)),
                rent.eq(changes.rent.unwrap_or(current.rent)),
                size_sqft.eq(changes.size_sqft.unwrap_or(current.size_sqft)),
                is_main.eq(becomes_main),
                is_outlet.eq(changes.is_outlet.unwrap_or(current.is_outlet)),
                is_manufacturing.eq(changes
                    .is_manufacturing
                    .unwrap_or(current.is_manufacturing)),
                facilities.eq(changes
                    .facilities
                    .as_deref()
                    .map(facilities_json)
                    .unwrap_or(current.facilities)),
            ))
            .execute(conn)?;

        let branch = branches.filter(id.eq(branch_id)).first::<Branch>(conn)?;

        log_activity(conn, actor, "update", "branches", branch_id, before, snapshot(&branch))?;

        Ok(branch)
    })
}

/// Delete a branch by id.
/// Returns Ok(true) if the branch was found and deleted, Ok(false) if not found.
pub fn delete_branch(
    conn: &mut SqliteConnection,
    branch_id: i32,
    actor: &str,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::branches::dsl::*;

        let existing = branches
            .filter(id.eq(branch_id))
            .first::<Branch>(conn)
            .optional()?;

        let Some(branch) = existing else {
            return Ok(false);
        };

        diesel::delete(branches.filter(id.eq(branch_id))).execute(conn)?;

        log_activity(conn, actor, "delete", "branches", branch_id, snapshot(&branch), None)?;

        Ok(true)
    })
}
