use diesel::prelude::*;

use crate::list_query::{ListQuery, OrderDirection};
use crate::models::{ActivityLog, NewActivityLog};

/// Filters accepted by the activity listing.
#[derive(Debug, Default, Clone)]
pub struct ActivityFilter {
    pub entity_type: Option<String>,
    pub actor: Option<String>,
    pub action: Option<String>,
}

/// Append an activity entry. Called by every ORM mutation inside the same
/// transaction as the write it records.
pub fn log_activity(
    conn: &mut SqliteConnection,
    actor_val: &str,
    action_val: &str,
    entity_type_val: &str,
    entity_id_val: i32,
    before_val: Option<serde_json::Value>,
    after_val: Option<serde_json::Value>,
) -> Result<ActivityLog, diesel::result::Error> {
    use crate::schema::activity_log::dsl::*;

    let new_entry = NewActivityLog {
        actor: actor_val.to_string(),
        action: action_val.to_string(),
        entity_type: entity_type_val.to_string(),
        entity_id: entity_id_val,
        before: before_val.map(|v| v.to_string()),
        after: after_val.map(|v| v.to_string()),
        timestamp: None, // Use database default (CURRENT_TIMESTAMP)
    };

    diesel::insert_into(activity_log)
        .values(&new_entry)
        .execute(conn)?;

    let new_id = crate::orm::last_insert_rowid(conn)?;
    activity_log.filter(id.eq(new_id)).first::<ActivityLog>(conn)
}

/// List activity entries, newest first by default, with optional filters
/// and pagination.
pub fn list_activity(
    conn: &mut SqliteConnection,
    filter: &ActivityFilter,
    query: &ListQuery,
) -> Result<(Vec<ActivityLog>, i64), diesel::result::Error> {
    use crate::schema::activity_log::dsl::*;

    // Boxed queries cannot be cloned, so the filters are applied twice:
    // once for the count, once for the page.
    let apply = |mut q: crate::schema::activity_log::BoxedQuery<'static, diesel::sqlite::Sqlite>| {
        if let Some(et) = &filter.entity_type {
            q = q.filter(entity_type.eq(et.clone()));
        }
        if let Some(a) = &filter.actor {
            q = q.filter(actor.eq(a.clone()));
        }
        if let Some(a) = &filter.action {
            q = q.filter(action.eq(a.clone()));
        }
        q
    };

    let total = apply(activity_log.into_boxed())
        .count()
        .get_result::<i64>(conn)?;

    let mut rows_query = apply(activity_log.into_boxed());
    rows_query = match (query.sort_key(), query.direction()) {
        (Some("actor"), OrderDirection::Asc) => rows_query.order(actor.asc()),
        (Some("actor"), OrderDirection::Desc) => rows_query.order(actor.desc()),
        (Some("timestamp"), OrderDirection::Asc) => rows_query.order(id.asc()),
        // Newest first: id order matches insertion order and is stable
        // within SQLite's 1-second timestamp resolution.
        _ => rows_query.order(id.desc()),
    };

    let rows = rows_query
        .limit(query.per_page())
        .offset(query.offset())
        .load::<ActivityLog>(conn)?;

    Ok((rows, total))
}

/// Full audit history for one entity, oldest first.
pub fn get_entity_history(
    conn: &mut SqliteConnection,
    entity_type_val: &str,
    entity_id_val: i32,
) -> Result<Vec<ActivityLog>, diesel::result::Error> {
    use crate::schema::activity_log::dsl::*;

    activity_log
        .filter(entity_type.eq(entity_type_val))
        .filter(entity_id.eq(entity_id_val))
        .order(id.asc())
        .load::<ActivityLog>(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::setup_test_db;

    #[test]
    fn test_log_activity() {
        let mut conn = setup_test_db();

        let entry = log_activity(&mut conn, "system", "create", "branches", 1, None, None)
            .expect("log should succeed");
        assert_eq!(entry.actor, "system");
        assert_eq!(entry.action, "create");
        assert_eq!(entry.entity_type, "branches");
        assert_eq!(entry.entity_id, 1);
        assert!(entry.before.is_none());
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_entity_history_is_chronological() {
        let mut conn = setup_test_db();

        log_activity(&mut conn, "ayesha", "create", "branches", 7, None, None).unwrap();
        log_activity(&mut conn, "ayesha", "update", "branches", 7, None, None).unwrap();
        log_activity(&mut conn, "ayesha", "delete", "branches", 7, None, None).unwrap();
        // Different entity, same id
        log_activity(&mut conn, "ayesha", "create", "job_orders", 7, None, None).unwrap();

        let history = get_entity_history(&mut conn, "branches", 7).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].action, "create");
        assert_eq!(history[1].action, "update");
        assert_eq!(history[2].action, "delete");
    }

    #[test]
    fn test_list_activity_filters_and_pages() {
        let mut conn = setup_test_db();

        for i in 0..7 {
            log_activity(&mut conn, "system", "create", "branches", i, None, None).unwrap();
        }
        log_activity(&mut conn, "rafiq", "update", "job_orders", 1, None, None).unwrap();

        let filter = ActivityFilter {
            entity_type: Some("branches".to_string()),
            ..Default::default()
        };
        let query = ListQuery { per_page: Some(5), ..Default::default() };

        let (rows, total) = list_activity(&mut conn, &filter, &query).unwrap();
        assert_eq!(total, 7);
        assert_eq!(rows.len(), 5);
        // Newest first
        assert_eq!(rows[0].entity_id, 6);

        let filter = ActivityFilter { actor: Some("rafiq".to_string()), ..Default::default() };
        let (rows, total) = list_activity(&mut conn, &filter, &ListQuery::default()).unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].action, "update");
    }
}
