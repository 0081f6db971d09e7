use std::collections::BTreeMap;

use diesel::prelude::*;

use crate::list_query::{ListQuery, OrderDirection};
use crate::models::{
    JobOperation, JobOrder, JobOrderDetail, JobOrderInput, JobOrderStats, MonthlyOrderBucket,
    NewJobOperation, NewJobOrder, UpdateJobOrderRequest,
};
use crate::orm::activity_log::log_activity;
use crate::orm::snapshot;

pub const PAYMENT_STATUSES: &[&str] = &["pending", "partial", "paid"];
pub const JOB_STATUSES: &[&str] = &["planned", "in_progress", "completed"];

/// Failure modes for payment recording.
#[derive(Debug)]
pub enum PaymentError {
    NotFound,
    NonPositiveAmount,
    /// Payment would push `paid_amount` past `total_amount`.
    Overpayment { pending: f64 },
    Db(diesel::result::Error),
}

impl From<diesel::result::Error> for PaymentError {
    fn from(e: diesel::result::Error) -> Self {
        PaymentError::Db(e)
    }
}

/// Payment status implied by the paid/total amounts.
pub fn payment_status_for(total: f64, paid: f64) -> &'static str {
    if paid <= 0.0 {
        "pending"
    } else if paid >= total {
        "paid"
    } else {
        "partial"
    }
}

/// Insert a job order together with its operation lines in one transaction.
/// `total_amount` is derived from pieces and rate, never taken from the client.
pub fn insert_job_order(
    conn: &mut SqliteConnection,
    input: &JobOrderInput,
    actor: &str,
) -> Result<JobOrder, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::job_orders::dsl::*;

        let amount = input.total_pieces as f64 * input.rate_per_piece;
        let new_order = NewJobOrder {
            company_name: input.company_name.clone(),
            order_date: input.order_date,
            total_pieces: input.total_pieces,
            rate_per_piece: input.rate_per_piece,
            total_amount: amount,
            paid_amount: 0.0,
            payment_status: "pending".to_string(),
            job_status: "planned".to_string(),
        };

        diesel::insert_into(job_orders)
            .values(&new_order)
            .execute(conn)?;

        let new_id = crate::orm::last_insert_rowid(conn)?;

        for op in &input.operations {
            let new_op = NewJobOperation {
                job_order_id: new_id,
                category: op.category.clone(),
                operation_name: op.operation_name.clone(),
                rate: op.rate,
                pieces: op.pieces,
            };
            diesel::insert_into(crate::schema::job_operations::table)
                .values(&new_op)
                .execute(conn)?;
        }

        let order = job_orders.filter(id.eq(new_id)).first::<JobOrder>(conn)?;

        log_activity(conn, actor, "create", "job_orders", order.id, None, snapshot(&order))?;

        Ok(order)
    })
}

pub fn get_job_order_by_id(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<Option<JobOrder>, diesel::result::Error> {
    use crate::schema::job_orders::dsl::*;
    job_orders.filter(id.eq(order_id)).first::<JobOrder>(conn).optional()
}

/// Operation lines for one order, in insertion order.
pub fn get_operations_for_order(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<Vec<JobOperation>, diesel::result::Error> {
    use crate::schema::job_operations::dsl::*;
    job_operations
        .filter(job_order_id.eq(order_id))
        .order(id.asc())
        .load::<JobOperation>(conn)
}

/// Order with its operation lines, their summed cost, and the outstanding
/// amount.
pub fn get_job_order_detail(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<Option<JobOrderDetail>, diesel::result::Error> {
    let Some(order) = get_job_order_by_id(conn, order_id)? else {
        return Ok(None);
    };

    let operations = get_operations_for_order(conn, order_id)?;
    let operation_cost = operations.iter().map(|op| op.rate * op.pieces as f64).sum();
    let pending_amount = order.total_amount - order.paid_amount;

    Ok(Some(JobOrderDetail { order, operations, operation_cost, pending_amount }))
}

/// One page of job orders plus the unpaged total.
pub fn list_job_orders(
    conn: &mut SqliteConnection,
    query: &ListQuery,
) -> Result<(Vec<JobOrder>, i64), diesel::result::Error> {
    use crate::schema::job_orders::dsl::*;

    let total: i64 = job_orders.count().get_result(conn)?;

    let mut rows_query = job_orders.into_boxed();
    rows_query = match (query.sort_key(), query.direction()) {
        (Some("company_name"), OrderDirection::Asc) => rows_query.order(company_name.asc()),
        (Some("company_name"), OrderDirection::Desc) => rows_query.order(company_name.desc()),
        (Some("order_date"), OrderDirection::Asc) => rows_query.order(order_date.asc()),
        (Some("order_date"), OrderDirection::Desc) => rows_query.order(order_date.desc()),
        (Some("total_amount"), OrderDirection::Asc) => rows_query.order(total_amount.asc()),
        (Some("total_amount"), OrderDirection::Desc) => rows_query.order(total_amount.desc()),
        (_, OrderDirection::Desc) => rows_query.order(id.desc()),
        _ => rows_query.order(id.asc()),
    };

    let rows = rows_query
        .limit(query.per_page())
        .offset(query.offset())
        .load::<JobOrder>(conn)?;

    Ok((rows, total))
}

/// Update an order, preserving unspecified fields. Changing pieces or rate
/// recomputes `total_amount` and re-derives the payment status.
pub fn update_job_order(
    conn: &mut SqliteConnection,
    order_id: i32,
    changes: &UpdateJobOrderRequest,
    actor: &str,
) -> Result<JobOrder, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::job_orders::dsl::*;

        let current = job_orders.filter(id.eq(order_id)).first::<JobOrder>(conn)?;
        let before = snapshot(&current);

        let pieces = changes.total_pieces.unwrap_or(current.total_pieces);
        let rate = changes.rate_per_piece.unwrap_or(current.rate_per_piece);
        let amount = pieces as f64 * rate;

        diesel::update(job_orders.filter(id.eq(order_id)))
            .set((
                company_name.eq(changes.company_name.clone().unwrap_or(current.company_name)),
                order_date.eq(changes.order_date.unwrap_or(current.order_date)),
                total_pieces.eq(pieces),
                rate_per_piece.eq(rate),
                total_amount.eq(amount),
                payment_status.eq(payment_status_for(amount, current.paid_amount)),
                job_status.eq(changes.job_status.clone().unwrap_or(current.job_status)),
            ))
            .execute(conn)?;

        let order = job_orders.filter(id.eq(order_id)).first::<JobOrder>(conn)?;

        log_activity(conn, actor, "update", "job_orders", order_id, before, snapshot(&order))?;

        Ok(order)
    })
}

/// Record a payment against an order. The payment status follows the new
/// paid amount; overpayment is rejected without writing.
pub fn record_payment(
    conn: &mut SqliteConnection,
    order_id: i32,
    amount: f64,
    actor: &str,
) -> Result<JobOrder, PaymentError> {
    conn.transaction::<JobOrder, PaymentError, _>(|conn| {
        use crate::schema::job_orders::dsl::*;

        if amount <= 0.0 {
            return Err(PaymentError::NonPositiveAmount);
        }

        let current = job_orders
            .filter(id.eq(order_id))
            .first::<JobOrder>(conn)
            .optional()?
            .ok_or(PaymentError::NotFound)?;

        let pending = current.total_amount - current.paid_amount;
        if amount > pending {
            return Err(PaymentError::Overpayment { pending });
        }

        let before = snapshot(&current);
        let new_paid = current.paid_amount + amount;

        diesel::update(job_orders.filter(id.eq(order_id)))
            .set((
                paid_amount.eq(new_paid),
                payment_status.eq(payment_status_for(current.total_amount, new_paid)),
            ))
            .execute(conn)?;

        let order = job_orders.filter(id.eq(order_id)).first::<JobOrder>(conn)?;

        log_activity(conn, actor, "update", "job_orders", order_id, before, snapshot(&order))?;

        Ok(order)
    })
}

/// Delete an order; operation lines cascade at the database level.
pub fn delete_job_order(
    conn: &mut SqliteConnection,
    order_id: i32,
    actor: &str,
) -> Result<bool, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::job_orders::dsl::*;

        let existing = job_orders
            .filter(id.eq(order_id))
            .first::<JobOrder>(conn)
            .optional()?;

        let Some(order) = existing else {
            return Ok(false);
        };

        diesel::delete(job_orders.filter(id.eq(order_id))).execute(conn)?;

        log_activity(conn, actor, "delete", "job_orders", order_id, snapshot(&order), None)?;

        Ok(true)
    })
}

/// Reduce a set of order rows into the dashboard summary. Pure so the
/// aggregation invariants can be tested without a database.
pub fn compute_job_order_stats(orders: &[JobOrder]) -> JobOrderStats {
    let mut stats = JobOrderStats {
        order_count: orders.len() as i64,
        total_pieces: 0,
        total_amount: 0.0,
        paid_amount: 0.0,
        pending_amount: 0.0,
        pending_count: 0,
        partial_count: 0,
        paid_count: 0,
        planned_count: 0,
        in_progress_count: 0,
        completed_count: 0,
        completion_pct: 0.0,
        monthly: Vec::new(),
    };

    let mut buckets: BTreeMap<String, MonthlyOrderBucket> = BTreeMap::new();

    for order in orders {
        stats.total_pieces += order.total_pieces as i64;
        stats.total_amount += order.total_amount;
        stats.paid_amount += order.paid_amount;

        match order.payment_status.as_str() {
            "paid" => stats.paid_count += 1,
            "partial" => stats.partial_count += 1,
            _ => stats.pending_count += 1,
        }
        match order.job_status.as_str() {
            "completed" => stats.completed_count += 1,
            "in_progress" => stats.in_progress_count += 1,
            _ => stats.planned_count += 1,
        }

        let month = order.order_date.format("%Y-%m").to_string();
        let bucket = buckets.entry(month.clone()).or_insert(MonthlyOrderBucket {
            month,
            order_count: 0,
            pieces: 0,
            amount: 0.0,
        });
        bucket.order_count += 1;
        bucket.pieces += order.total_pieces as i64;
        bucket.amount += order.total_amount;
    }

    stats.pending_amount = stats.total_amount - stats.paid_amount;
    if stats.order_count > 0 {
        stats.completion_pct = stats.completed_count as f64 / stats.order_count as f64 * 100.0;
    }
    stats.monthly = buckets.into_values().collect();

    stats
}

/// Load every order and reduce it to the dashboard summary.
pub fn get_job_order_stats(
    conn: &mut SqliteConnection,
) -> Result<JobOrderStats, diesel::result::Error> {
    use crate::schema::job_orders::dsl::*;
    let orders = job_orders.load::<JobOrder>(conn)?;
    Ok(compute_job_order_stats(&orders))
}
