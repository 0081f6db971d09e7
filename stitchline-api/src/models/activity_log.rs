use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One row of the append-only audit trail. `before`/`after` hold JSON
/// snapshots of the touched row where the mutation has them.
#[derive(Queryable, Identifiable, Debug, Serialize, Deserialize, Clone, TS)]
#[diesel(table_name = crate::schema::activity_log)]
#[ts(export)]
pub struct ActivityLog {
    pub id: i32,
    pub actor: String,
    pub action: String, // 'create', 'update', 'delete', 'settle'
    pub entity_type: String,
    pub entity_id: i32,
    pub before: Option<String>,
    pub after: Option<String>,
    #[ts(type = "string")]
    pub timestamp: NaiveDateTime,
}

#[derive(Insertable, Debug, Deserialize)]
#[diesel(table_name = crate::schema::activity_log)]
pub struct NewActivityLog {
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i32,
    pub before: Option<String>,
    pub after: Option<String>,
    pub timestamp: Option<NaiveDateTime>, // Optional to use database default
}
