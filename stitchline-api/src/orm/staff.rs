use chrono::{Datelike, NaiveDate};
use diesel::prelude::*;

use crate::models::{
    AbsenceInput, NewStaffAbsence, NewStaffSalaryEntry, SalaryEntryInput, StaffAbsence,
    StaffMonthlySummary, StaffSalaryEntry,
};
use crate::orm::activity_log::log_activity;
use crate::orm::snapshot;

/// Failure modes for staff payroll writes.
#[derive(Debug)]
pub enum StaffError {
    ContactNotFound,
    /// An absence whose `end_date` precedes its `start_date`.
    InvalidRange,
    NotFound,
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for StaffError {
    fn from(e: diesel::result::Error) -> Self {
        StaffError::Db(e)
    }
}

fn require_contact(conn: &mut SqliteConnection, cid: i32) -> Result<(), StaffError> {
    crate::orm::contact::get_contact_by_id(conn, cid)?
        .ok_or(StaffError::ContactNotFound)?;
    Ok(())
}

/// First and last day of a calendar month. None for out-of-range input
/// (month 0, month 13).
fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next.pred_opt()?))
}

pub fn insert_salary_entry(
    conn: &mut SqliteConnection,
    input: &SalaryEntryInput,
    actor: &str,
) -> Result<StaffSalaryEntry, StaffError> {
    conn.transaction::<StaffSalaryEntry, StaffError, _>(|conn| {
        use crate::schema::staff_salary_entries::dsl::*;

        require_contact(conn, input.contact_id)?;

        let new_entry = NewStaffSalaryEntry {
            contact_id: input.contact_id,
            entry_date: input.entry_date,
            amount: input.amount,
            category: input.category.clone(),
        };

        diesel::insert_into(staff_salary_entries)
            .values(&new_entry)
            .execute(conn)?;

        let new_id = crate::orm::last_insert_rowid(conn)?;
        let entry = staff_salary_entries
            .filter(id.eq(new_id))
            .first::<StaffSalaryEntry>(conn)?;

        log_activity(conn, actor, "create", "staff_salary_entries", entry.id, None, snapshot(&entry))?;

        Ok(entry)
    })
}

/// Salary entries for one contact, optionally narrowed to a date range,
/// newest first.
pub fn list_salary_entries(
    conn: &mut SqliteConnection,
    cid: i32,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<StaffSalaryEntry>, diesel::result::Error> {
    use crate::schema::staff_salary_entries::dsl::*;

    let mut q = staff_salary_entries
        .filter(contact_id.eq(cid))
        .into_boxed();
    if let Some(from) = from {
        q = q.filter(entry_date.ge(from));
    }
    if let Some(to) = to {
        q = q.filter(entry_date.le(to));
    }
    q.order((entry_date.desc(), id.desc()))
        .load::<StaffSalaryEntry>(conn)
}

pub fn delete_salary_entry(
    conn: &mut SqliteConnection,
    eid: i32,
    actor: &str,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::staff_salary_entries::dsl::*;

        let existing = staff_salary_entries
            .filter(id.eq(eid))
            .first::<StaffSalaryEntry>(conn)
            .optional()?;

        let Some(entry) = existing else {
            return Ok(false);
        };

        diesel::delete(staff_salary_entries.filter(id.eq(eid))).execute(conn)?;

        log_activity(conn, actor, "delete", "staff_salary_entries", eid, snapshot(&entry), None)?;

        Ok(true)
    })
}

pub fn insert_absence(
    conn: &mut SqliteConnection,
    input: &AbsenceInput,
    actor: &str,
) -> Result<StaffAbsence, StaffError> {
    conn.transaction::<StaffAbsence, StaffError, _>(|conn| {
        use crate::schema::staff_absences::dsl::*;

        if input.end_date < input.start_date {
            return Err(StaffError::InvalidRange);
        }
        require_contact(conn, input.contact_id)?;

        let new_absence = NewStaffAbsence {
            contact_id: input.contact_id,
            start_date: input.start_date,
            end_date: input.end_date,
            reason: input.reason.clone(),
        };

        diesel::insert_into(staff_absences)
            .values(&new_absence)
            .execute(conn)?;

        let new_id = crate::orm::last_insert_rowid(conn)?;
        let absence = staff_absences
            .filter(id.eq(new_id))
            .first::<StaffAbsence>(conn)?;

        log_activity(conn, actor, "create", "staff_absences", absence.id, None, snapshot(&absence))?;

        Ok(absence)
    })
}

/// Absences for one contact, most recent first.
pub fn list_absences(
    conn: &mut SqliteConnection,
    cid: i32,
) -> Result<Vec<StaffAbsence>, diesel::result::Error> {
    use crate::schema::staff_absences::dsl::*;
    staff_absences
        .filter(contact_id.eq(cid))
        .order((start_date.desc(), id.desc()))
        .load::<StaffAbsence>(conn)
}

pub fn delete_absence(
    conn: &mut SqliteConnection,
    aid: i32,
    actor: &str,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::staff_absences::dsl::*;

        let existing = staff_absences
            .filter(id.eq(aid))
            .first::<StaffAbsence>(conn)
            .optional()?;

        let Some(absence) = existing else {
            return Ok(false);
        };

        diesel::delete(staff_absences.filter(id.eq(aid))).execute(conn)?;

        log_activity(conn, actor, "delete", "staff_absences", aid, snapshot(&absence), None)?;

        Ok(true)
    })
}

/// One month of a contact's payroll calendar. Absence spans are clipped to
/// the month, so a leave crossing a month boundary only counts the days
/// that fall inside it.
pub fn monthly_summary(
    conn: &mut SqliteConnection,
    cid: i32,
    year: i32,
    month: u32,
) -> Result<StaffMonthlySummary, StaffError> {
    require_contact(conn, cid)?;
    let (month_start, month_end) =
        month_bounds(year, month).ok_or(StaffError::InvalidRange)?;

    let entries = list_salary_entries(conn, cid, Some(month_start), Some(month_end))?;
    let salary_total: f64 = entries.iter().map(|e| e.amount).sum();

    let days_in_month = month_end.day() as f64;
    let salary_daily_average = salary_total / days_in_month;

    let absences = {
        use crate::schema::staff_absences::dsl::*;
        staff_absences
            .filter(contact_id.eq(cid))
            .filter(start_date.le(month_end))
            .filter(end_date.ge(month_start))
            .load::<StaffAbsence>(conn)?
    };

    let absence_days: i64 = absences
        .iter()
        .map(|a| {
            let from = a.start_date.max(month_start);
            let to = a.end_date.min(month_end);
            (to - from).num_days() + 1
        })
        .sum();

    Ok(StaffMonthlySummary {
        contact_id: cid,
        year,
        month,
        salary_total,
        salary_entry_count: entries.len() as i64,
        salary_daily_average,
        absence_days,
    })
}
