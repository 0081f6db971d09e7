pub mod activity_log;
pub mod branch;
pub mod contact;
mod db;
pub mod job_order;
pub mod production;
pub mod purchase;
pub mod settlement;
pub mod staff;
pub mod testing;

pub use db::*;

use diesel::prelude::*;
use diesel::sql_types::BigInt;

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = BigInt)]
    last_insert_rowid: i64,
}

/// Row id of the most recent insert on this connection.
pub(crate) fn last_insert_rowid(
    conn: &mut SqliteConnection,
) -> Result<i32, diesel::result::Error> {
    let last_id = diesel::sql_query("SELECT last_insert_rowid() as last_insert_rowid")
        .get_result::<LastInsertRowId>(conn)?
        .last_insert_rowid;
    Ok(last_id as i32)
}

/// JSON snapshot of a row for the activity log; logging never fails a
/// mutation over a serialization problem.
pub(crate) fn snapshot<T: serde::Serialize>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}
