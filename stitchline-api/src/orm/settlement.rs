use diesel::prelude::*;

use crate::list_query::{ListQuery, OrderDirection};
use crate::models::{
    NewSettlement, ProductionEntry, Settlement, SettlementInput, SettlementPreview,
};
use crate::orm::activity_log::log_activity;
use crate::orm::snapshot;

/// Failure modes for settlement writes.
#[derive(Debug)]
pub enum SettlementError {
    ContactNotFound,
    /// `week_end` precedes `week_start`.
    InvalidWeek,
    /// No unsettled entries fall in the week; there is nothing to pay.
    NoUnsettledEntries,
    /// Deductions exceed the gross pay, which would produce a negative wage.
    DeductionsExceedGross { gross_pay: f64 },
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for SettlementError {
    fn from(e: diesel::result::Error) -> Self {
        SettlementError::Db(e)
    }
}

/// The worker's unsettled entries covered by the week.
fn covered_entries(
    conn: &mut SqliteConnection,
    input: &SettlementInput,
) -> Result<Vec<ProductionEntry>, diesel::result::Error> {
    use crate::schema::production_entries::dsl::*;

    production_entries
        .filter(worker_contact_id.eq(input.worker_contact_id))
        .filter(settled.eq(false))
        .filter(entry_date.ge(input.week_start))
        .filter(entry_date.le(input.week_end))
        .order(id.asc())
        .load::<ProductionEntry>(conn)
}

fn preview_from_entries(input: &SettlementInput, entries: &[ProductionEntry]) -> SettlementPreview {
    let gross_pay: f64 = entries
        .iter()
        .map(|e| e.quantity_completed as f64 * e.piece_rate)
        .sum();

    SettlementPreview {
        worker_contact_id: input.worker_contact_id,
        week_start: input.week_start,
        week_end: input.week_end,
        gross_pay,
        deductions: input.deductions,
        net_pay: gross_pay - input.deductions,
        entry_count: entries.len() as i32,
    }
}

/// Compute the pay figures for a settlement without writing anything. A
/// week with no coverable entries previews as zero; only creation rejects it.
pub fn preview_settlement(
    conn: &mut SqliteConnection,
    input: &SettlementInput,
) -> Result<SettlementPreview, SettlementError> {
    if input.week_end < input.week_start {
        return Err(SettlementError::InvalidWeek);
    }

    crate::orm::contact::get_contact_by_id(conn, input.worker_contact_id)?
        .ok_or(SettlementError::ContactNotFound)?;

    let entries = covered_entries(conn, input)?;
    Ok(preview_from_entries(input, &entries))
}

/// Create a weekly settlement: compute gross/net pay over the worker's
/// unsettled entries in the week, insert the settlement row, and mark the
/// covered entries settled, all in one transaction; a failure at any step
/// leaves nothing half-written.
pub fn create_settlement(
    conn: &mut SqliteConnection,
    input: &SettlementInput,
    actor: &str,
) -> Result<Settlement, SettlementError> {
    conn.transaction::<Settlement, SettlementError, _>(|conn| {
        if input.week_end < input.week_start {
            return Err(SettlementError::InvalidWeek);
        }

        crate::orm::contact::get_contact_by_id(conn, input.worker_contact_id)?
            .ok_or(SettlementError::ContactNotFound)?;

        let entries = covered_entries(conn, input)?;
        if entries.is_empty() {
            return Err(SettlementError::NoUnsettledEntries);
        }

        let preview = preview_from_entries(input, &entries);
        if preview.net_pay < 0.0 {
            return Err(SettlementError::DeductionsExceedGross { gross_pay: preview.gross_pay });
        }

        use crate::schema::settlements::dsl::*;

        let new_settlement = NewSettlement {
            worker_contact_id: input.worker_contact_id,
            week_start: input.week_start,
            week_end: input.week_end,
            gross_pay: preview.gross_pay,
            deductions: preview.deductions,
            net_pay: preview.net_pay,
            entry_count: preview.entry_count,
        };

        diesel::insert_into(settlements)
            .values(&new_settlement)
            .execute(conn)?;

        let new_id = crate::orm::last_insert_rowid(conn)?;
        let settlement = settlements.filter(id.eq(new_id)).first::<Settlement>(conn)?;

        {
            use crate::schema::production_entries::dsl as entry_dsl;
            let entry_ids: Vec<i32> = entries.iter().map(|e| e.id).collect();
            diesel::update(
                entry_dsl::production_entries.filter(entry_dsl::id.eq_any(entry_ids)),
            )
            .set(entry_dsl::settled.eq(true))
            .execute(conn)?;
        }

        log_activity(conn, actor, "settle", "settlements", settlement.id, None, snapshot(&settlement))?;

        Ok(settlement)
    })
}

pub fn get_settlement_by_id(
    conn: &mut SqliteConnection,
    sid: i32,
) -> Result<Option<Settlement>, diesel::result::Error> {
    use crate::schema::settlements::dsl::*;
    settlements.filter(id.eq(sid)).first::<Settlement>(conn).optional()
}

/// One page of settlements plus the unpaged total, optionally narrowed to
/// one worker.
pub fn list_settlements(
    conn: &mut SqliteConnection,
    worker: Option<i32>,
    query: &ListQuery,
) -> Result<(Vec<Settlement>, i64), diesel::result::Error> {
    use crate::schema::settlements::dsl::*;

    let apply = |mut q: crate::schema::settlements::BoxedQuery<'static, diesel::sqlite::Sqlite>| {
        if let Some(wid) = worker {
            q = q.filter(worker_contact_id.eq(wid));
        }
        q
    };

    let total = apply(settlements.into_boxed())
        .count()
        .get_result::<i64>(conn)?;

    let mut rows_query = apply(settlements.into_boxed());
    rows_query = match (query.sort_key(), query.direction()) {
        (Some("week_start"), OrderDirection::Asc) => rows_query.order(week_start.asc()),
        (Some("week_start"), OrderDirection::Desc) => rows_query.order(week_start.desc()),
        (Some("net_pay"), OrderDirection::Asc) => rows_query.order(net_pay.asc()),
        (Some("net_pay"), OrderDirection::Desc) => rows_query.order(net_pay.desc()),
        (_, OrderDirection::Desc) => rows_query.order(id.desc()),
        _ => rows_query.order(id.asc()),
    };

    let rows = rows_query
        .limit(query.per_page())
        .offset(query.offset())
        .load::<Settlement>(conn)?;

    Ok((rows, total))
}
