use diesel::prelude::*;

use crate::list_query::{ListQuery, OrderDirection};
use crate::models::{
    NewPurchaseBatch, NewPurchaseItem, PurchaseBatch, PurchaseBatchDetail, PurchaseBatchInput,
    PurchaseItem, PurchaseItemInput, UpdatePurchaseBatchRequest,
};
use crate::orm::activity_log::log_activity;
use crate::orm::snapshot;

fn line_costs(items: &[PurchaseItemInput]) -> Vec<f64> {
    items.iter().map(|item| item.quantity * item.unit_cost).collect()
}

/// Insert a purchase batch and its item lines in one transaction. Line and
/// batch totals are derived server-side at submit time.
pub fn insert_purchase_batch(
    conn: &mut SqliteConnection,
    input: &PurchaseBatchInput,
    actor: &str,
) -> Result<PurchaseBatch, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::purchase_batches::dsl::*;

        let costs = line_costs(&input.items);
        let new_batch = NewPurchaseBatch {
            supplier: input.supplier.clone(),
            purchase_date: input.purchase_date,
            notes: input.notes.clone(),
            total_cost: costs.iter().sum(),
        };

        diesel::insert_into(purchase_batches)
            .values(&new_batch)
            .execute(conn)?;

        let new_id = crate::orm::last_insert_rowid(conn)?;

        for (item, cost) in input.items.iter().zip(costs) {
            let new_item = NewPurchaseItem {
                batch_id: new_id,
                material: item.material.clone(),
                quantity: item.quantity,
                unit: item.unit.clone(),
                unit_cost: item.unit_cost,
                line_cost: cost,
            };
            diesel::insert_into(crate::schema::purchase_items::table)
                .values(&new_item)
                .execute(conn)?;
        }

        let batch = purchase_batches.filter(id.eq(new_id)).first::<PurchaseBatch>(conn)?;

        log_activity(conn, actor, "create", "purchase_batches", batch.id, None, snapshot(&batch))?;

        Ok(batch)
    })
}

pub fn get_batch_by_id(
    conn: &mut SqliteConnection,
    bid: i32,
) -> Result<Option<PurchaseBatch>, diesel::result::Error> {
    use crate::schema::purchase_batches::dsl::*;
    purchase_batches.filter(id.eq(bid)).first::<PurchaseBatch>(conn).optional()
}

pub fn get_items_for_batch(
    conn: &mut SqliteConnection,
    bid: i32,
) -> Result<Vec<PurchaseItem>, diesel::result::Error> {
    use crate::schema::purchase_items::dsl::*;
    purchase_items
        .filter(batch_id.eq(bid))
        .order(id.asc())
        .load::<PurchaseItem>(conn)
}

pub fn get_batch_detail(
    conn: &mut SqliteConnection,
    bid: i32,
) -> Result<Option<PurchaseBatchDetail>, diesel::result::Error> {
    let Some(batch) = get_batch_by_id(conn, bid)? else {
        return Ok(None);
    };
    let items = get_items_for_batch(conn, bid)?;
    Ok(Some(PurchaseBatchDetail { batch, items }))
}

/// One page of purchase batches plus the unpaged total.
pub fn list_purchase_batches(
    conn: &mut SqliteConnection,
    query: &ListQuery,
) -> Result<(Vec<PurchaseBatch>, i64), diesel::result::Error> {
    use crate::schema::purchase_batches::dsl::*;

    let total: i64 = purchase_batches.count().get_result(conn)?;

    let mut rows_query = purchase_batches.into_boxed();
    rows_query = match (query.sort_key(), query.direction()) {
        (Some("supplier"), OrderDirection::Asc) => rows_query.order(supplier.asc()),
        (Some("supplier"), OrderDirection::Desc) => rows_query.order(supplier.desc()),
        (Some("purchase_date"), OrderDirection::Asc) => rows_query.order(purchase_date.asc()),
        (Some("purchase_date"), OrderDirection::Desc) => rows_query.order(purchase_date.desc()),
        (Some("total_cost"), OrderDirection::Asc) => rows_query.order(total_cost.asc()),
        (Some("total_cost"), OrderDirection::Desc) => rows_query.order(total_cost.desc()),
        (_, OrderDirection::Desc) => rows_query.order(id.desc()),
        _ => rows_query.order(id.asc()),
    };

    let rows = rows_query
        .limit(query.per_page())
        .offset(query.offset())
        .load::<PurchaseBatch>(conn)?;

    Ok((rows, total))
}

/// Update a batch header. Item lines and totals are untouched; use
/// [`replace_items`] to change them.
pub fn update_batch_header(
    conn: &mut SqliteConnection,
    bid: i32,
    changes: &UpdatePurchaseBatchRequest,
    actor: &str,
) -> Result<PurchaseBatch, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::purchase_batches::dsl::*;

        let current = purchase_batches.filter(id.eq(bid)).first::<PurchaseBatch>(conn)?;
        let before = snapshot(&current);

        diesel::update(purchase_batches.filter(id.eq(bid)))
            .set((
                supplier.eq(changes.supplier.clone().unwrap_or(current.supplier)),
                purchase_date.eq(changes.purchase_date.unwrap_or(current.purchase_date)),
                notes.eq(changes.notes.clone().or(current.notes)),
            ))
            .execute(conn)?;

        let batch = purchase_batches.filter(id.eq(bid)).first::<PurchaseBatch>(conn)?;

        log_activity(conn, actor, "update", "purchase_batches", bid, before, snapshot(&batch))?;

        Ok(batch)
    })
}

/// Replace a batch's item lines wholesale and recompute its total, in one
/// transaction.
pub fn replace_items(
    conn: &mut SqliteConnection,
    bid: i32,
    items: &[PurchaseItemInput],
    actor: &str,
) -> Result<PurchaseBatchDetail, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::purchase_batches::dsl::*;
        use crate::schema::purchase_items::dsl as item_dsl;

        let current = purchase_batches.filter(id.eq(bid)).first::<PurchaseBatch>(conn)?;
        let before = snapshot(&current);

        diesel::delete(item_dsl::purchase_items.filter(item_dsl::batch_id.eq(bid)))
            .execute(conn)?;

        let costs = line_costs(items);
        for (item, cost) in items.iter().zip(&costs) {
            let new_item = NewPurchaseItem {
                batch_id: bid,
                material: item.material.clone(),
                quantity: item.quantity,
                unit: item.unit.clone(),
                unit_cost: item.unit_cost,
                line_cost: *cost,
            };
            diesel::insert_into(item_dsl::purchase_items)
                .values(&new_item)
                .execute(conn)?;
        }

        diesel::update(purchase_batches.filter(id.eq(bid)))
            .set(total_cost.eq(costs.iter().sum::<f64>()))
            .execute(conn)?;

        let batch = purchase_batches.filter(id.eq(bid)).first::<PurchaseBatch>(conn)?;

        log_activity(conn, actor, "update", "purchase_batches", bid, before, snapshot(&batch))?;

        let items = get_items_for_batch(conn, bid)?;
        Ok(PurchaseBatchDetail { batch, items })
    })
}

/// Delete a batch; item lines cascade at the database level.
pub fn delete_batch(
    conn: &mut SqliteConnection,
    bid: i32,
    actor: &str,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::purchase_batches::dsl::*;

        let existing = purchase_batches
            .filter(id.eq(bid))
            .first::<PurchaseBatch>(conn)
            .optional()?;

        let Some(batch) = existing else {
            return Ok(false);
        };

        diesel::delete(purchase_batches.filter(id.eq(bid))).execute(conn)?;

        log_activity(conn, actor, "delete", "purchase_batches", bid, snapshot(&batch), None)?;

        Ok(true)
    })
}
