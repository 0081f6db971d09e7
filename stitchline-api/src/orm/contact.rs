use diesel::prelude::*;

use crate::list_query::{ListQuery, OrderDirection};
use crate::models::{ContactInput, EmployeeContact, NewEmployeeContact, UpdateContactRequest};
use crate::orm::activity_log::log_activity;
use crate::orm::snapshot;

/// Insert a new employee contact, active by default.
pub fn insert_contact(
    conn: &mut SqliteConnection,
    input: &ContactInput,
    actor: &str,
) -> Result<EmployeeContact, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::employee_contacts::dsl::*;

        let new_contact = NewEmployeeContact {
            name: input.name.clone(),
            phone: input.phone.clone(),
            department: input.department.clone(),
            salary: input.salary,
            join_date: input.join_date,
            is_active: true,
        };

        diesel::insert_into(employee_contacts)
            .values(&new_contact)
            .execute(conn)?;

        let new_id = crate::orm::last_insert_rowid(conn)?;
        let contact = employee_contacts
            .filter(id.eq(new_id))
            .first::<EmployeeContact>(conn)?;

        log_activity(conn, actor, "create", "employee_contacts", contact.id, None, snapshot(&contact))?;

        Ok(contact)
    })
}

/// Try to find a contact by id, active or not.
pub fn get_contact_by_id(
    conn: &mut SqliteConnection,
    contact_id: i32,
) -> Result<Option<EmployeeContact>, diesel::result::Error> {
    use crate::schema::employee_contacts::dsl::*;
    employee_contacts
        .filter(id.eq(contact_id))
        .first::<EmployeeContact>(conn)
        .optional()
}

/// One page of contacts plus the unpaged total. The default listing hides
/// soft-deleted rows; `include_inactive` opts back in.
pub fn list_contacts(
    conn: &mut SqliteConnection,
    include_inactive: bool,
    query: &ListQuery,
) -> Result<(Vec<EmployeeContact>, i64), diesel::result::Error> {
    use crate::schema::employee_contacts::dsl::*;

    let apply = |mut q: crate::schema::employee_contacts::BoxedQuery<
        'static,
        diesel::sqlite::Sqlite,
    >| {
        if !include_inactive {
            q = q.filter(is_active.eq(true));
        }
        q
    };

    let total = apply(employee_contacts.into_boxed())
        .count()
        .get_result::<i64>(conn)?;

    let mut rows_query = apply(employee_contacts.into_boxed());
    rows_query = match (query.sort_key(), query.direction()) {
        (Some("name"), OrderDirection::Asc) => rows_query.order(name.asc()),
        (Some("name"), OrderDirection::Desc) => rows_query.order(name.desc()),
        (Some("department"), OrderDirection::Asc) => rows_query.order(department.asc()),
        (Some("department"), OrderDirection::Desc) => rows_query.order(department.desc()),
        (Some("join_date"), OrderDirection::Asc) => rows_query.order(join_date.asc()),
        (Some("join_date"), OrderDirection::Desc) => rows_query.order(join_date.desc()),
        (_, OrderDirection::Desc) => rows_query.order(id.desc()),
        _ => rows_query.order(id.asc()),
    };

    let rows = rows_query
        .limit(query.per_page())
        .offset(query.offset())
        .load::<EmployeeContact>(conn)?;

    Ok((rows, total))
}

/// Update a contact, preserving unspecified fields.
pub fn update_contact(
    conn: &mut SqliteConnection,
    contact_id: i32,
    changes: &UpdateContactRequest,
    actor: &str,
) -> Result<EmployeeContact, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::employee_contacts::dsl::*;

        let current = employee_contacts
            .filter(id.eq(contact_id))
            .first::<EmployeeContact>(conn)?;
        let before = snapshot(&current);

        diesel::update(employee_contacts.filter(id.eq(contact_id)))
            .set((
                name.eq(changes.name.clone().unwrap_or(current.name)),
                phone.eq(changes.phone.clone().unwrap_or(current.phone)),
                department.eq(changes.department.clone().unwrap_or(current.department)),
                salary.eq(changes.salary.unwrap_or(current.salary)),
                join_date.eq(changes.join_date.unwrap_or(current.join_date)),
            ))
            .execute(conn)?;

        let contact = employee_contacts
            .filter(id.eq(contact_id))
            .first::<EmployeeContact>(conn)?;

        log_activity(conn, actor, "update", "employee_contacts", contact_id, before, snapshot(&contact))?;

        Ok(contact)
    })
}

/// Soft-delete a contact: clears `is_active`, keeping the row for payroll
/// history. Returns Ok(false) if the contact does not exist.
pub fn deactivate_contact(
    conn: &mut SqliteConnection,
    contact_id: i32,
    actor: &str,
) -> Result<bool, diesel::result::Error> {
    set_contact_active(conn, contact_id, false, "delete", actor)
}

/// Reverse a soft delete.
pub fn restore_contact(
    conn: &mut SqliteConnection,
    contact_id: i32,
    actor: &str,
) -> Result<bool, diesel::result::Error> {
    set_contact_active(conn, contact_id, true, "update", actor)
}

fn set_contact_active(
    conn: &mut SqliteConnection,
    contact_id: i32,
    active: bool,
    action: &str,
    actor: &str,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::employee_contacts::dsl::*;

        let current = employee_contacts
            .filter(id.eq(contact_id))
            .first::<EmployeeContact>(conn)
            .optional()?;

        let Some(current) = current else {
            return Ok(false);
        };
        let before = snapshot(&current);

        diesel::update(employee_contacts.filter(id.eq(contact_id)))
            .set(is_active.eq(active))
            .execute(conn)?;

        let contact = employee_contacts
            .filter(id.eq(contact_id))
            .first::<EmployeeContact>(conn)?;

        log_activity(conn, actor, action, "employee_contacts", contact_id, before, snapshot(&contact))?;

        Ok(true)
    })
}
